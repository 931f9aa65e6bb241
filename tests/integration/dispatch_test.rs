// tests/integration/dispatch_test.rs

use super::test_helpers::{EngineCall, RecordingEngine, TestContext, default_clips};
use deckbridge::config::Config;
use deckbridge::core::catalog::ClipSpec;
use deckbridge::core::commands::HandlerOutcome;
use deckbridge::core::feedback::{EngineOutcome, Telemetry};

#[test]
fn test_ping_replies_ok() {
    let ctx = TestContext::new();
    assert_eq!(ctx.reply("ping").to_wire(), "200 ok\r\n");
}

#[test]
fn test_verbs_are_case_insensitive() {
    let ctx = TestContext::new();
    assert_eq!(ctx.reply("PING").code, 200);
    assert_eq!(ctx.reply("Device Info").code, 204);
}

#[test]
fn test_unknown_verb_is_unsupported() {
    let ctx = TestContext::new();
    assert_eq!(ctx.reply("record: clip name: x").to_wire(), "103 unsupported\r\n");
    assert_eq!(ctx.reply("format").code, 103);
}

#[test]
fn test_device_info_reports_configured_identity() {
    let mut config = Config::default();
    config.device.model = "Playout".into();
    config.device.unique_id = "abc".into();
    let ctx = TestContext::with_config(config, RecordingEngine::default(), default_clips());

    let response = ctx.reply("device info");
    assert_eq!(
        response.to_wire(),
        "204 device info:\r\nprotocol version: 1.8\r\nmodel: Playout\r\nunique id: abc\r\n\r\n"
    );
}

#[test]
fn test_remote_and_remote_info_are_aliases() {
    let ctx = TestContext::new();
    let expected = "210 remote info:\r\nenabled: true\r\noverride: true\r\n\r\n";
    assert_eq!(ctx.reply("remote").to_wire(), expected);
    assert_eq!(ctx.reply("remote info").to_wire(), expected);
}

#[test]
fn test_quit_closes_without_reply() {
    let ctx = TestContext::new();
    assert_eq!(ctx.execute("quit"), HandlerOutcome::CloseConnection);
}

#[test]
fn test_transport_info_initial_state() {
    let ctx = TestContext::new();
    let response = ctx.reply("transport info");
    assert_eq!(
        response.to_wire(),
        "208 transport info:\r\n\
         status: stopped\r\n\
         speed: 0\r\n\
         slot id: 1\r\n\
         display timecode: 00:00:00:00\r\n\
         timecode: 00:00:00:00\r\n\
         clip id: 0\r\n\
         video format: 720p50\r\n\
         loop: false\r\n\r\n"
    );
}

#[test]
fn test_slot_info_for_active_slot() {
    let ctx = TestContext::new();
    let response = ctx.reply("slot info: slot id: 1");
    assert_eq!(response.code, 202);
    assert_eq!(response.get("slot id"), Some("1"));
    assert_eq!(response.get("status"), Some("mounted"));
    assert_eq!(response.get("volume name"), Some("CasparCG-1"));
    assert_eq!(response.get("recording time"), Some("0"));
    assert_eq!(response.get("video format"), Some("720p50"));
}

#[test]
fn test_slot_info_for_other_slots() {
    let ctx = TestContext::new();

    let response = ctx.reply("slot info: slot id: 2");
    assert_eq!(response.get("slot id"), Some("2"));
    assert_eq!(response.get("status"), Some("none"));
    assert_eq!(response.get("volume name"), Some("-"));

    let response = ctx.reply("slot info");
    assert_eq!(response.get("slot id"), Some("0"));
    assert_eq!(response.get("status"), Some("none"));
}

#[test]
fn test_slot_info_reports_none_when_another_slot_is_active() {
    let ctx = TestContext::new();
    ctx.state.deck.lock().slot_id = 2;
    let response = ctx.reply("slot info: slot id: 1");
    assert_eq!(response.get("status"), Some("none"));
    assert_eq!(response.get("volume name"), Some("CasparCG-1"));
}

#[test]
fn test_clips_count() {
    let ctx = TestContext::new();
    assert_eq!(
        ctx.reply("clips count").to_wire(),
        "214 clips count:\r\nclip count: 3\r\n\r\n"
    );

    ctx.state.deck.lock().slot_id = 2;
    assert_eq!(ctx.reply("clips count").get("clip count"), Some("0"));
}

#[test]
fn test_clips_get_lists_every_clip_in_order() {
    let ctx = TestContext::new();
    let response = ctx.reply("clips get");
    assert_eq!(
        response.to_wire(),
        "205 clips info:\r\n\
         clip count: 3\r\n\
         1: intro 00:00:00:00 00:00:10:00\r\n\
         2: news 00:00:00:00 00:00:30:00\r\n\
         3: weather 00:00:00:00 00:50:00:00\r\n\r\n"
    );
}

#[test]
fn test_clips_get_filters_by_id() {
    let ctx = TestContext::new();

    let response = ctx.reply("clips get: clip id: 2");
    assert_eq!(response.get("clip count"), Some("1"));
    assert_eq!(response.get("2"), Some("news 00:00:00:00 00:00:30:00"));
    assert_eq!(response.get("1"), None);

    assert_eq!(ctx.reply("clips get: clip id: 0").get("clip count"), Some("3"));
    assert_eq!(ctx.reply("clips get: clip id: 9").get("clip count"), Some("0"));
    assert_eq!(ctx.reply("clips get: clip id: abc").get("clip count"), Some("0"));
}

#[test]
fn test_clips_get_on_inactive_slot_is_empty() {
    let ctx = TestContext::new();
    ctx.state.deck.lock().slot_id = 2;
    assert_eq!(
        ctx.reply("clips get").to_wire(),
        "205 clips info:\r\nclip count: 0\r\n\r\n"
    );
}

#[test]
fn test_clips_on_empty_catalog() {
    let ctx = TestContext::with_clips(vec![]);
    assert_eq!(ctx.reply("clips count").get("clip count"), Some("0"));
    assert_eq!(ctx.reply("clips get").get("clip count"), Some("0"));
}

#[test]
fn test_goto_absolute_loads_clip() {
    let ctx = TestContext::new();
    assert_eq!(ctx.reply("goto: clip id: 2").code, 200);
    assert_eq!(ctx.calls(), vec![EngineCall::Load("news".into())]);
    // The current clip follows the engine's settlement, not the request.
    assert_eq!(ctx.current_clip_id(), None);

    ctx.feed(EngineOutcome::Loaded(ctx.clip(1)));
    assert_eq!(ctx.current_clip_id(), Some(2));
}

#[test]
fn test_goto_unknown_or_missing_id_is_invalid() {
    let ctx = TestContext::new();
    assert_eq!(ctx.reply("goto: clip id: 7").code, 102);
    assert_eq!(ctx.reply("goto: clip id: nope").code, 102);
    assert_eq!(ctx.reply("goto: timeline: start").code, 102);
    assert_eq!(ctx.reply("goto").code, 102);
    assert!(ctx.calls().is_empty());
}

#[test]
fn test_goto_slot_is_a_no_op() {
    let ctx = TestContext::new();
    assert_eq!(ctx.reply("goto: slot id: 1").code, 200);
    assert!(ctx.calls().is_empty());
}

#[test]
fn test_goto_relative_without_current_clip() {
    let ctx = TestContext::new();

    assert_eq!(ctx.reply("goto: clip id: +1").code, 200);
    assert_eq!(ctx.reply("goto: clip id: +3").code, 200);
    assert_eq!(ctx.reply("goto: clip id: +4").code, 102);
    assert_eq!(ctx.reply("goto: clip id: +0").code, 102);

    assert_eq!(ctx.reply("goto: clip id: -0").code, 200);
    assert_eq!(ctx.reply("goto: clip id: -2").code, 200);
    assert_eq!(ctx.reply("goto: clip id: -3").code, 102);

    assert_eq!(
        ctx.calls(),
        vec![
            EngineCall::Load("intro".into()),
            EngineCall::Load("weather".into()),
            EngineCall::Load("weather".into()),
            EngineCall::Load("intro".into()),
        ]
    );
}

#[test]
fn test_goto_relative_wraps_around_current_clip() {
    let ctx = TestContext::new();
    ctx.feed(EngineOutcome::Loaded(ctx.clip(2)));

    assert_eq!(ctx.reply("goto: clip id: +1").code, 200);
    assert_eq!(ctx.reply("goto: clip id: +7").code, 200);
    assert_eq!(ctx.reply("goto: clip id: -1").code, 200);
    assert_eq!(ctx.reply("goto: clip id: -5").code, 200);

    assert_eq!(
        ctx.calls(),
        vec![
            EngineCall::Load("intro".into()),
            EngineCall::Load("intro".into()),
            EngineCall::Load("news".into()),
            EngineCall::Load("intro".into()),
        ]
    );
}

#[test]
fn test_goto_negative_step_is_invalid() {
    let ctx = TestContext::new();
    assert_eq!(ctx.reply("goto: clip id: +-1").code, 102);
    assert_eq!(ctx.reply("goto: clip id: -+").code, 102);
}

#[test]
fn test_goto_on_empty_catalog_fails() {
    let ctx = TestContext::with_clips(vec![]);
    assert_eq!(ctx.reply("goto: clip id: +1").code, 102);
    assert_eq!(ctx.reply("goto: clip id: -1").code, 102);
    assert_eq!(ctx.reply("goto: clip id: 1").code, 102);
}

#[test]
fn test_goto_duplicate_names_resolve_by_id() {
    let ctx = TestContext::with_clips(vec![
        ClipSpec::new("same", 10, 25.0),
        ClipSpec::new("same", 20, 25.0),
        ClipSpec::new("other", 30, 25.0),
    ]);
    assert_eq!(ctx.reply("goto: clip id: 2").code, 200);
    assert_eq!(ctx.calls(), vec![EngineCall::Load("same".into())]);

    ctx.feed(EngineOutcome::Loaded(ctx.clip(1)));
    assert_eq!(ctx.reply("transport info").get("clip id"), Some("2"));

    ctx.clear_calls();
    assert_eq!(ctx.reply("goto: clip id: +1").code, 200);
    assert_eq!(ctx.calls(), vec![EngineCall::Load("other".into())]);
}

#[test]
fn test_now_playing_keeps_selected_duplicate() {
    let ctx = TestContext::with_clips(vec![
        ClipSpec::new("same", 10, 25.0),
        ClipSpec::new("same", 20, 25.0),
    ]);
    ctx.feed(EngineOutcome::Loaded(ctx.clip(1)));
    ctx.reply("notify: transport: true");

    assert_eq!(ctx.feed(Telemetry::NowPlaying("same.mov".into())), 0);
    assert_eq!(ctx.current_clip_id(), Some(2));
}

#[test]
fn test_play_runs_sub_actions_in_order() {
    let ctx = TestContext::new();
    ctx.feed(EngineOutcome::Loaded(ctx.clip(0)));

    let response = ctx.reply("play: loop: true speed: 50 single clip: true");
    assert_eq!(response.code, 200);
    assert_eq!(
        ctx.calls(),
        vec![
            EngineCall::SetLoop(true),
            EngineCall::SetSpeed(50),
            EngineCall::Play(Some(1)),
        ]
    );

    let transport = ctx.reply("transport info");
    assert_eq!(transport.get("loop"), Some("true"));
    assert_eq!(transport.get("speed"), Some("50"));
}

#[test]
fn test_play_succeeds_if_any_sub_action_succeeds() {
    let engine = RecordingEngine {
        accept_loop: false,
        ..RecordingEngine::default()
    };
    let ctx = TestContext::with_engine(engine, default_clips());

    assert_eq!(ctx.reply("play: loop: true single clip: true").code, 200);
    assert_eq!(ctx.reply("play: loop: false").code, 102);
}

#[test]
fn test_play_without_actions_is_invalid() {
    let ctx = TestContext::new();
    assert_eq!(ctx.reply("play").code, 102);
    assert_eq!(ctx.reply("play: speed: fast").code, 102);
    assert!(ctx.calls().is_empty());
}

#[test]
fn test_play_loop_other_than_true_disables_loop() {
    let ctx = TestContext::new();
    ctx.reply("play: loop: yes");
    assert_eq!(ctx.calls(), vec![EngineCall::SetLoop(false)]);
}

#[test]
fn test_play_refused_by_engine_is_invalid() {
    let ctx = TestContext::with_engine(RecordingEngine::refusing_everything(), default_clips());
    assert_eq!(ctx.reply("play: single clip: true").code, 102);
    assert_eq!(ctx.reply("stop").code, 102);
}

#[test]
fn test_stop_settles_through_feedback() {
    let ctx = TestContext::new();
    ctx.feed(EngineOutcome::Played);
    assert_eq!(ctx.reply("transport info").get("status"), Some("play"));

    assert_eq!(ctx.reply("stop").code, 200);
    assert_eq!(ctx.calls(), vec![EngineCall::Stop]);
    // Still playing until the engine confirms.
    assert_eq!(ctx.reply("transport info").get("status"), Some("play"));

    ctx.feed(EngineOutcome::Stopped);
    assert_eq!(ctx.reply("transport info").get("status"), Some("stopped"));
}

#[test]
fn test_notify_reports_and_updates_flags() {
    let ctx = TestContext::new();
    assert_eq!(
        ctx.reply("notify").to_wire(),
        "209 notify:\r\ntransport: false\r\nslot: false\r\nremote: false\r\nconfiguration: false\r\n\r\n"
    );

    let response = ctx.reply("notify: transport: true slot: true");
    assert_eq!(response.get("transport"), Some("true"));
    assert_eq!(response.get("slot"), Some("true"));
    assert_eq!(response.get("remote"), Some("false"));

    let response = ctx.reply("notify: slot: false configuration: true bogus: true");
    assert_eq!(response.get("transport"), Some("true"));
    assert_eq!(response.get("slot"), Some("false"));
    assert_eq!(response.get("configuration"), Some("true"));
}

#[test]
fn test_notify_only_touches_own_flags() {
    let ctx = TestContext::new();
    ctx.add_client(2);
    ctx.execute_as(2, "notify: transport: true");

    assert!(!ctx.state.notifications(ctx.session_id).transport);
    assert!(ctx.state.notifications(2).transport);
}
