//! Core types shared across the progression engine.

use chrono::{DateTime, Duration, SubsecRound, Utc};

/// AgentId: Registry-assigned identifier of an agent
pub type AgentId = String;

/// ChallengeId: Catalog-assigned identifier of a challenge
pub type ChallengeId = String;

/// TokenId: Identifier of a minted NFT in the mock table
pub type TokenId = String;

/// Timestamp: UTC instant, persisted as an RFC 3339 string
pub type Timestamp = DateTime<Utc>;

/// Current time truncated to millisecond precision.
///
/// Persisted timestamps round-trip through RFC 3339 strings, so everything
/// the engine stamps is kept at the precision storage preserves.
pub fn now() -> Timestamp {
    Utc::now().trunc_subsecs(3)
}

/// Next timestamp strictly after `previous`.
pub fn next_after(previous: Timestamp) -> Timestamp {
    let current = now();
    if current > previous {
        current
    } else {
        previous + Duration::milliseconds(1)
    }
}

/// Short random suffix used in generated record ids.
pub(crate) fn record_id(prefix: &str) -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}", prefix, now().timestamp_millis(), &uuid[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_has_millisecond_precision() {
        let ts = now();
        assert_eq!(ts.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn test_next_after_is_strictly_later() {
        let future = now() + Duration::seconds(10);
        let next = next_after(future);
        assert!(next > future);
        assert_eq!(next - future, Duration::milliseconds(1));
    }

    #[test]
    fn test_record_ids_are_unique() {
        let a = record_id("exp");
        let b = record_id("exp");
        assert!(a.starts_with("exp-"));
        assert_ne!(a, b);
    }
}
