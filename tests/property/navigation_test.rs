// tests/property/navigation_test.rs

//! Property-based tests for relative catalog navigation

use crate::test_helpers::{EngineCall, TestContext};
use deckbridge::core::catalog::{Catalog, ClipSpec, Navigation};
use deckbridge::core::feedback::EngineOutcome;
use proptest::prelude::*;

fn catalog(len: usize) -> Catalog {
    Catalog::from_specs((0..len).map(|i| ClipSpec::new(format!("clip{i}"), 100, 25.0)))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_forward_then_backward_returns_to_start(
        len in 1usize..40,
        start in 0usize..40,
        step in 0usize..200,
    ) {
        let catalog = catalog(len);
        let start = start % len;
        let forward = catalog.resolve(Navigation::Forward(step), Some(start)).unwrap();
        let index = catalog.position(forward.id).unwrap();
        let back = catalog.resolve(Navigation::Backward(step), Some(index)).unwrap();
        prop_assert_eq!(catalog.position(back.id), Some(start));
    }

    #[test]
    fn test_relative_navigation_with_current_always_resolves(
        len in 1usize..40,
        start in 0usize..40,
        step in 0usize..1000,
    ) {
        let catalog = catalog(len);
        let start = start % len;
        prop_assert!(catalog.resolve(Navigation::Forward(step), Some(start)).is_some());
        prop_assert!(catalog.resolve(Navigation::Backward(step), Some(start)).is_some());
    }

    #[test]
    fn test_goto_loads_the_resolved_clip(len in 1usize..10, start in 0usize..10, step in 1usize..30) {
        let ctx = TestContext::with_clips(
            (0..len).map(|i| ClipSpec::new(format!("clip{i}"), 100, 25.0)).collect(),
        );
        let start = start % len;
        ctx.feed(EngineOutcome::Loaded(ctx.clip(start)));

        let response = ctx.reply(&format!("goto: clip id: +{step}"));
        prop_assert_eq!(response.code, 200);
        let expected = format!("clip{}", (start + step) % len);
        prop_assert_eq!(ctx.calls(), vec![EngineCall::Load(expected)]);
    }
}
