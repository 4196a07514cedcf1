//! Wall-clock helpers producing integer Unix timestamps.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Current Unix time in whole seconds (UTC).
///
/// A clock set before the epoch yields `0` rather than a negative value.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| saturating_secs(d))
        .unwrap_or(0)
}

/// Unix time in whole seconds `ttl` from now, saturating at `i64::MAX`.
pub fn unix_after(ttl: Duration) -> i64 {
    unix_now().saturating_add(saturating_secs(ttl))
}

fn saturating_secs(d: Duration) -> i64 {
    i64::try_from(d.as_secs()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_now_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(unix_now() > 1_577_836_800);
    }

    #[test]
    fn unix_after_adds_whole_seconds() {
        let now = unix_now();
        let later = unix_after(Duration::from_secs(900));
        assert!(later - now >= 900 && later - now <= 901);
    }

    #[test]
    fn unix_after_saturates_on_huge_ttls() {
        assert_eq!(unix_after(Duration::MAX), i64::MAX);
        assert_eq!(unix_after(Duration::from_secs(u64::MAX)), i64::MAX);
        assert!(unix_after(Duration::from_secs(i64::MAX as u64 - 1)) >= unix_now());
    }
}
