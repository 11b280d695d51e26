use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::warn;

use crate::time::{CUSTOM_EPOCH_MILLIS, TimeSource};

/// Resolution at which a [`WallClock`] advances.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Precision {
    /// Advance every millisecond. Uses the full 4096 IDs per millisecond the
    /// layout allows.
    #[default]
    Millis,
    /// Truncate to whole seconds, still reported in milliseconds. Only one
    /// tick per second is available, so at most 4096 IDs are issued per
    /// second. Matches deployments that issued IDs from a second-resolution
    /// clock.
    Seconds,
}

/// A time source backed by the system wall clock.
///
/// Unlike a monotonic timer, the wall clock follows external adjustments such
/// as NTP corrections, which means it can move backward. Generators turn that
/// into [`Error::ClockMovedBackward`] instead of issuing out-of-order IDs.
///
/// Readings before the custom epoch saturate to zero and log a warning. A
/// generator driven by such a clock issues 4096 IDs at timestamp `0` and then
/// blocks in `next_id` until the system clock passes the epoch.
///
/// # Example
///
/// ```
/// use flakegen::{Precision, TimeSource, WallClock};
///
/// let millis = WallClock::new();
/// let seconds = WallClock::with_precision(Precision::Seconds);
///
/// assert!(millis.current_millis() > 0);
/// assert_eq!(seconds.current_millis() % 1000, 0);
/// ```
///
/// [`Error::ClockMovedBackward`]: crate::Error::ClockMovedBackward
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WallClock {
    precision: Precision,
}

impl WallClock {
    /// Creates a millisecond-resolution wall clock.
    pub const fn new() -> Self {
        Self::with_precision(Precision::Millis)
    }

    pub const fn with_precision(precision: Precision) -> Self {
        Self { precision }
    }

    pub const fn precision(&self) -> Precision {
        self.precision
    }
}

impl TimeSource for WallClock {
    fn current_millis(&self) -> u64 {
        // Before 1970 is treated the same as before the custom epoch.
        let since_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        self.millis_since_epoch(since_unix)
    }
}

impl WallClock {
    fn millis_since_epoch(&self, since_unix: Duration) -> u64 {
        let unix_millis = match self.precision {
            Precision::Millis => u64::try_from(since_unix.as_millis()).unwrap_or(u64::MAX),
            Precision::Seconds => since_unix.as_secs().saturating_mul(1000),
        };
        if unix_millis < CUSTOM_EPOCH_MILLIS {
            cold_before_epoch(unix_millis);
            return 0;
        }
        unix_millis - CUSTOM_EPOCH_MILLIS
    }
}

#[cold]
#[inline(never)]
fn cold_before_epoch(unix_millis: u64) {
    warn!(
        unix_millis,
        epoch_millis = CUSTOM_EPOCH_MILLIS,
        "system clock is before the custom epoch, reading 0"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unix_now_millis() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64
    }

    #[test]
    fn millis_tracks_system_time() {
        let before = unix_now_millis() - CUSTOM_EPOCH_MILLIS;
        let now = WallClock::new().current_millis();
        let after = unix_now_millis() - CUSTOM_EPOCH_MILLIS;
        assert!(before <= now && now <= after, "{before} <= {now} <= {after}");
    }

    #[test]
    fn seconds_truncates() {
        let clock = WallClock::with_precision(Precision::Seconds);
        let now = clock.current_millis();
        assert_eq!(now % 1000, 0);
        assert!(now <= WallClock::new().current_millis());
        assert_eq!(clock.precision(), Precision::Seconds);
    }

    #[test]
    fn before_epoch_saturates() {
        let clock = WallClock::new();
        let before = Duration::from_millis(CUSTOM_EPOCH_MILLIS - 5);
        assert_eq!(clock.millis_since_epoch(before), 0);
        assert_eq!(clock.millis_since_epoch(Duration::ZERO), 0);
        assert_eq!(
            clock.millis_since_epoch(Duration::from_millis(CUSTOM_EPOCH_MILLIS + 7)),
            7
        );

        let seconds = WallClock::with_precision(Precision::Seconds);
        let after = Duration::from_millis(CUSTOM_EPOCH_MILLIS + 1_999);
        assert_eq!(seconds.millis_since_epoch(after), 1_000);
    }

    #[test]
    fn default_is_millis() {
        assert_eq!(WallClock::default(), WallClock::new());
        assert_eq!(WallClock::default().precision(), Precision::Millis);
    }
}
