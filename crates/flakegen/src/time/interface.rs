use core::time::Duration;

/// Custom epoch: Wednesday, December 31, 2014 16:00:00 UTC (midnight of
/// January 1, 2015 in UTC+8).
pub const CUSTOM_EPOCH: Duration = Duration::from_millis(CUSTOM_EPOCH_MILLIS);

/// [`CUSTOM_EPOCH`] in milliseconds since the Unix epoch.
pub const CUSTOM_EPOCH_MILLIS: u64 = 1_420_041_600_000;

/// A trait for time sources that return a wall-clock timestamp.
///
/// This abstraction allows you to plug in the system clock or a mocked time
/// source in tests.
///
/// The unit is **milliseconds** relative to [`CUSTOM_EPOCH`]. Implementations
/// are allowed to go backward; generators detect that and refuse to issue IDs.
///
/// # Example
///
/// ```
/// use flakegen::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the custom epoch.
    fn current_millis(&self) -> u64;
}
