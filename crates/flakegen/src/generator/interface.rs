use tracing::debug;

use crate::{
    error::Result,
    generator::IdGenStatus,
    id::{ParsedId, SnowflakeId, parse_id},
};

/// A minimal interface for generating Snowflake IDs.
///
/// Implementors only provide [`try_poll_id`]; the blocking [`next_id`] and
/// decoding come for free.
///
/// [`try_poll_id`]: SnowflakeGenerator::try_poll_id
/// [`next_id`]: SnowflakeGenerator::next_id
pub trait SnowflakeGenerator {
    /// The data-center ID encoded into every issued ID.
    fn data_center_id(&self) -> u8;

    /// The worker ID encoded into every issued ID.
    fn worker_id(&self) -> u8;

    /// Attempts to generate the next available ID without waiting.
    ///
    /// The returned [`IdGenStatus`] contains either:
    /// - the newly generated ID, or
    /// - the timestamp to wait for if the sequence is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockMovedBackward`] if the clock reads earlier than
    /// the last issued ID, or [`Error::TimestampOverflow`] if it reads past
    /// the 42-bit timestamp range. The generator stays halted afterward.
    ///
    /// [`Error::ClockMovedBackward`]: crate::Error::ClockMovedBackward
    /// [`Error::TimestampOverflow`]: crate::Error::TimestampOverflow
    fn try_poll_id(&self) -> Result<IdGenStatus>;

    /// Generates the next ID, busy-waiting for the next millisecond if the
    /// current one is exhausted.
    ///
    /// The wait lasts as long as the clock takes to advance. A clock stuck at
    /// one reading (such as a wall clock set before the custom epoch, which
    /// reads `0`) keeps this call spinning; use [`try_poll_id`] to bound it.
    ///
    /// [`try_poll_id`]: SnowflakeGenerator::try_poll_id
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockMovedBackward`] if the clock reads earlier than
    /// the last issued ID.
    ///
    /// [`Error::ClockMovedBackward`]: crate::Error::ClockMovedBackward
    fn next_id(&self) -> Result<SnowflakeId> {
        let mut waiting = false;
        loop {
            match self.try_poll_id()? {
                IdGenStatus::Ready { id } => return Ok(id),
                IdGenStatus::Pending { yield_until } => {
                    if !waiting {
                        debug!(yield_until, "sequence exhausted, waiting for next millisecond");
                        waiting = true;
                    }
                    core::hint::spin_loop();
                }
            }
        }
    }

    /// Decodes an ID into its fields. Does not touch generator state.
    fn parse_id(&self, id: impl Into<SnowflakeId>) -> ParsedId
    where
        Self: Sized,
    {
        parse_id(id)
    }
}
