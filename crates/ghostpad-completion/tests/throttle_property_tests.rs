/// Property-based tests for the completion request budget
///
/// Property: however requests are spaced, no window grants more than the
/// configured number of permits and every permit lies inside the window it
/// was counted against. A request arriving after a full window of idleness
/// always succeeds.
use ghostpad_completion::{CompletionRequestThrottler, ThrottleSettings};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

fn gaps_strategy() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(
        prop_oneof![4 => 0u64..800, 1 => 800u64..12_000],
        1..60,
    )
}

proptest! {
    #[test]
    fn prop_window_never_exceeds_quota(gaps in gaps_strategy()) {
        let settings = ThrottleSettings::default();
        let mut throttler = CompletionRequestThrottler::from_settings(&settings);
        let start = Instant::now();
        let mut now = start;
        let mut per_window: BTreeMap<Instant, u32> = BTreeMap::new();

        for gap in gaps {
            now += Duration::from_millis(gap);
            if throttler.try_acquire_at(now) {
                let window_start = throttler.budget().window_start.unwrap();
                prop_assert!(now >= window_start);
                prop_assert!(now.duration_since(window_start) < settings.window());
                *per_window.entry(window_start).or_default() += 1;
            }
        }

        for (_, granted) in per_window {
            prop_assert!(granted <= settings.max_requests);
        }
    }

    #[test]
    fn prop_idle_gap_always_grants(gaps in gaps_strategy(), idle_extra in 1u64..5_000) {
        let mut throttler = CompletionRequestThrottler::default();
        let mut now = Instant::now();
        for gap in gaps {
            now += Duration::from_millis(gap);
            throttler.try_acquire_at(now);
        }

        now += Duration::from_millis(10_000 + idle_extra);
        prop_assert!(throttler.try_acquire_at(now));
        prop_assert_eq!(throttler.budget().count, 1);
    }

    #[test]
    fn prop_denials_only_when_quota_spent(gaps in gaps_strategy()) {
        let mut throttler = CompletionRequestThrottler::default();
        let mut now = Instant::now();
        for gap in gaps {
            now += Duration::from_millis(gap);
            let remaining = throttler.remaining_at(now);
            let granted = throttler.try_acquire_at(now);
            prop_assert_eq!(granted, remaining > 0);
        }
    }
}

#[test]
fn test_six_in_three_seconds_then_idle() {
    let mut throttler = CompletionRequestThrottler::default();
    let start = Instant::now();
    for i in 0..6 {
        assert!(throttler.try_acquire_at(start + Duration::from_millis(i * 500)));
    }
    assert!(!throttler.try_acquire_at(start + Duration::from_secs(3)));

    let after_idle = start + Duration::from_millis(2_500) + Duration::from_millis(10_001);
    assert!(throttler.try_acquire_at(after_idle));
}
