// tests/integration/notify_test.rs

use super::test_helpers::TestContext;
use deckbridge::core::feedback::{EngineOutcome, Telemetry};
use deckbridge::core::notifier;
use deckbridge::core::state::{NotificationCategory, PUSH_QUEUE_CAPACITY};

#[test]
fn test_position_change_pushes_transport_info() {
    let mut ctx = TestContext::new();
    ctx.reply("notify: transport: true");

    assert_eq!(ctx.feed(Telemetry::Position(1.5)), 1);
    let pushes = ctx.drain_pushes();
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0].code, 508);
    assert_eq!(pushes[0].name, "transport info");
    assert_eq!(pushes[0].get("timecode"), Some("00:00:01:25"));
}

#[test]
fn test_non_finite_position_is_ignored() {
    let mut ctx = TestContext::new();
    ctx.reply("notify: transport: true");
    ctx.feed(Telemetry::Position(2.0));
    ctx.drain_pushes();

    for seconds in [f64::NAN, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert_eq!(ctx.feed(Telemetry::Position(seconds)), 0);
    }
    assert!(ctx.drain_pushes().is_empty());
    assert_eq!(
        ctx.reply("transport info").get("timecode"),
        Some("00:00:02:00")
    );
}

#[test]
fn test_position_within_same_second_is_not_recorded() {
    let mut ctx = TestContext::new();
    ctx.reply("notify: transport: true");

    ctx.feed(Telemetry::Position(1.2));
    assert_eq!(ctx.feed(Telemetry::Position(1.9)), 0);
    assert_eq!(ctx.drain_pushes().len(), 1);
    // The recorded position is still the first one of that second.
    assert_eq!(
        ctx.reply("transport info").get("timecode"),
        Some("00:00:01:10")
    );
}

#[test]
fn test_unsubscribed_clients_receive_nothing() {
    let mut ctx = TestContext::new();
    ctx.feed(Telemetry::Position(3.0));
    assert!(ctx.drain_pushes().is_empty());

    ctx.reply("notify: transport: true");
    ctx.reply("notify: transport: false");
    ctx.feed(Telemetry::Position(4.0));
    assert!(ctx.drain_pushes().is_empty());
}

#[test]
fn test_only_subscribed_clients_are_notified() {
    let ctx = TestContext::new();
    let mut other = ctx.add_client(2);
    let mut third = ctx.add_client(3);
    ctx.execute_as(2, "notify: transport: true");

    assert_eq!(ctx.feed(Telemetry::Position(2.0)), 1);
    assert_eq!(other.push_rx.try_recv().map(|r| r.code), Ok(508));
    assert!(third.push_rx.try_recv().is_err());
}

#[test]
fn test_now_playing_updates_current_clip_and_notifies() {
    let mut ctx = TestContext::new();
    ctx.reply("notify: transport: true");

    assert_eq!(ctx.feed(Telemetry::NowPlaying("news.mov".into())), 1);
    assert_eq!(ctx.current_clip_id(), Some(2));
    let pushes = ctx.drain_pushes();
    assert_eq!(pushes[0].get("clip id"), Some("2"));

    // Same clip again: nothing changes.
    assert_eq!(ctx.feed(Telemetry::NowPlaying("news.mxf".into())), 0);
    // Unknown clip: ignored.
    assert_eq!(ctx.feed(Telemetry::NowPlaying("other.mov".into())), 0);
    assert_eq!(ctx.current_clip_id(), Some(2));
}

#[test]
fn test_engine_outcomes_do_not_notify() {
    let mut ctx = TestContext::new();
    ctx.reply("notify: transport: true");
    assert_eq!(ctx.feed(EngineOutcome::Played), 0);
    assert_eq!(ctx.feed(EngineOutcome::Loaded(ctx.clip(0))), 0);
    assert!(ctx.drain_pushes().is_empty());
}

#[test]
fn test_slot_notification_is_unmounted_slot_info() {
    let mut ctx = TestContext::new();
    ctx.reply("notify: slot: true");

    let delivered = {
        let deck = ctx.state.deck.lock();
        notifier::notify(&ctx.state, &deck, NotificationCategory::Slot)
    };
    assert_eq!(delivered, 1);

    let pushes = ctx.drain_pushes();
    assert_eq!(pushes[0].code, 502);
    assert_eq!(pushes[0].get("slot id"), Some("1"));
    assert_eq!(pushes[0].get("status"), Some("none"));
    assert_eq!(pushes[0].get("volume name"), Some("-"));
}

#[test]
fn test_remote_and_configuration_have_no_payload() {
    let mut ctx = TestContext::new();
    ctx.reply("notify: remote: true configuration: true");

    let deck = ctx.state.deck.lock();
    assert_eq!(
        notifier::notify(&ctx.state, &deck, NotificationCategory::Remote),
        0
    );
    assert_eq!(
        notifier::notify(&ctx.state, &deck, NotificationCategory::Configuration),
        0
    );
    drop(deck);
    assert!(ctx.drain_pushes().is_empty());
}

#[test]
fn test_full_push_queue_drops_notifications() {
    let mut ctx = TestContext::new();
    ctx.reply("notify: transport: true");

    for second in 1..=(PUSH_QUEUE_CAPACITY + 5) {
        ctx.feed(Telemetry::Position(second as f64));
    }
    assert_eq!(ctx.drain_pushes().len(), PUSH_QUEUE_CAPACITY);

    // The queue drains and delivery resumes.
    assert_eq!(ctx.feed(Telemetry::Position(1000.0)), 1);
}
