use crate::id::SnowflakeId;

/// Represents the result of polling a generator for a new Snowflake ID.
///
/// - [`IdGenStatus::Ready`] indicates a new ID was successfully generated.
/// - [`IdGenStatus::Pending`] means all 4096 sequence values of the current
///   millisecond are spent and no ID can be issued until the clock reaches
///   `yield_until`.
///
/// This allows non-blocking generation loops and custom backoff strategies.
/// [`SnowflakeGenerator::next_id`] is the blocking loop that spins on
/// `Pending`.
///
/// # Example
///
/// ```
/// use flakegen::{IdGenStatus, IdGenerator, TimeSource};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1
///     }
/// }
///
/// let generator = IdGenerator::from_components(1, 0, 0, 4095, FixedTime).unwrap();
/// match generator.try_poll_id().unwrap() {
///     IdGenStatus::Ready { id } => println!("ID: {id}"),
///     IdGenStatus::Pending { yield_until } => println!("Back off until: {yield_until}"),
/// }
/// ```
///
/// [`SnowflakeGenerator::next_id`]: crate::SnowflakeGenerator::next_id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated Snowflake ID.
        id: SnowflakeId,
    },
    /// No ID could be generated because the sequence has been exhausted for the
    /// current millisecond.
    Pending {
        /// The next timestamp (inclusive, ms since the custom epoch) at which
        /// generation can resume.
        yield_until: u64,
    },
}
