//! Property-based tests for the reconnect policy

use proptest::prelude::*;
use quillnest::client::ReconnectPolicy;
use std::time::Duration;

fn policy() -> impl Strategy<Value = ReconnectPolicy> {
    (0u32..20, 1u64..5_000, 1u64..120_000).prop_map(|(max_attempts, base, max)| ReconnectPolicy {
        max_attempts,
        base_delay: Duration::from_millis(base),
        max_delay: Duration::from_millis(max),
    })
}

proptest! {
    #[test]
    fn test_delay_never_exceeds_cap(policy in policy(), attempt in any::<u32>()) {
        prop_assert!(policy.delay_for(attempt) <= policy.max_delay);
    }

    #[test]
    fn test_delay_is_monotonic(policy in policy(), attempt in 0u32..200) {
        prop_assert!(policy.delay_for(attempt) <= policy.delay_for(attempt + 1));
    }

    #[test]
    fn test_default_delay_formula(attempt in 0u32..30) {
        let expected = (1000u64 << attempt).min(10_000);
        prop_assert_eq!(
            ReconnectPolicy::default().delay_for(attempt),
            Duration::from_millis(expected)
        );
    }

    #[test]
    fn test_ceiling_allows_exactly_max_attempts(policy in policy()) {
        let allowed = (0..policy.max_attempts + 5)
            .take_while(|n| policy.allows(*n))
            .count() as u32;
        prop_assert_eq!(allowed, policy.max_attempts);
    }
}
