use core::cmp;
use std::sync::OnceLock;

use portable_atomic::{AtomicU64, Ordering};
use tracing::{error, info, instrument};

use crate::{
    config::GeneratorConfig,
    error::{Error, Result},
    generator::{IdGenStatus, SnowflakeGenerator},
    id::{ParsedId, SnowflakeId, parse_id},
    time::{TimeSource, WallClock},
};

/// A lock-free Snowflake ID generator suitable for multi-threaded environments.
///
/// The last issued ID is stored as a single [`AtomicU64`] and advanced with a
/// compare-and-swap loop. A caller that loses the race reloads the state and
/// reads the clock again, so each issued ID is still linearized against all
/// others, exactly like [`IdGenerator`].
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ No lock on the hot path
/// - ❌ No fairness: a thread can lose the CAS race repeatedly under heavy
///   contention
///
/// ## Caveats
/// The state starts at timestamp `0`, sequence `0`. A clock reading exactly at
/// the custom epoch therefore issues sequence `1` first.
///
/// ## See Also
/// - [`IdGenerator`]
///
/// [`IdGenerator`]: crate::IdGenerator
#[derive(Debug)]
pub struct AtomicIdGenerator<T = WallClock>
where
    T: TimeSource,
{
    data_center_id: u8,
    worker_id: u8,
    state: AtomicU64,
    halted: OnceLock<Error>,
    time: T,
}

impl AtomicIdGenerator<WallClock> {
    /// Creates a generator reading the system wall clock at millisecond
    /// precision.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if either ID is outside
    /// `0..=31`.
    ///
    /// # Example
    /// ```
    /// use flakegen::AtomicIdGenerator;
    ///
    /// let generator = AtomicIdGenerator::new(4, 5).unwrap();
    /// let a = generator.next_id().unwrap();
    /// let b = generator.next_id().unwrap();
    /// assert!(a < b);
    /// ```
    pub fn new(data_center_id: i64, worker_id: i64) -> Result<Self> {
        Self::with_time(data_center_id, worker_id, WallClock::new())
    }

    /// Creates a wall-clock generator from a [`GeneratorConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the config does not
    /// validate.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        Self::new(config.data_center_id, config.worker_id)
    }
}

impl<T> AtomicIdGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator that reads time from `time`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if either ID is outside
    /// `0..=31`.
    pub fn with_time(data_center_id: i64, worker_id: i64, time: T) -> Result<Self> {
        Self::from_components(0, data_center_id, worker_id, 0, time)
    }

    /// Creates a generator whose last issued ID is preloaded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if either ID is outside
    /// `0..=31`.
    pub fn from_components(
        timestamp: u64,
        data_center_id: i64,
        worker_id: i64,
        sequence: u16,
        time: T,
    ) -> Result<Self> {
        let (data_center_id, worker_id) =
            GeneratorConfig::new(data_center_id, worker_id).validated()?;
        info!(data_center_id, worker_id, "atomic snowflake generator ready");
        let id = SnowflakeId::from_components(timestamp, data_center_id, worker_id, sequence);
        Ok(Self {
            data_center_id,
            worker_id,
            state: AtomicU64::new(id.to_raw()),
            halted: OnceLock::new(),
            time,
        })
    }

    pub const fn data_center_id(&self) -> u8 {
        self.data_center_id
    }

    pub const fn worker_id(&self) -> u8 {
        self.worker_id
    }

    /// Returns `true` once a fatal clock error has stopped this generator.
    pub fn is_halted(&self) -> bool {
        self.halted.get().is_some()
    }

    /// Generates the next ID, spinning until the next millisecond when the
    /// current one has no sequence values left.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockMovedBackward`] if the clock reads earlier than
    /// the last issued ID. Every later call fails the same way.
    pub fn next_id(&self) -> Result<SnowflakeId> {
        SnowflakeGenerator::next_id(self)
    }

    /// Attempts to generate the next ID without waiting.
    ///
    /// Retries internally while other threads win the CAS; returns
    /// [`IdGenStatus::Pending`] only when the millisecond is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockMovedBackward`] if the clock reads earlier than
    /// the last issued ID, or [`Error::TimestampOverflow`] if it reads past
    /// the 42-bit timestamp range.
    #[instrument(level = "trace", skip(self))]
    pub fn try_poll_id(&self) -> Result<IdGenStatus> {
        if let Some(err) = self.halted.get() {
            return Err(err.clone());
        }

        let mut current_raw = self.state.load(Ordering::Acquire);
        loop {
            let current = SnowflakeId::from_raw(current_raw);
            let current_ts = current.timestamp();
            // Read after the load so a timestamp stored by a faster thread is
            // never newer than our reading.
            let now = self.time.current_millis();
            if now > SnowflakeId::TIMESTAMP_MASK {
                return Err(self.cold_halt(Error::TimestampOverflow {
                    now,
                    max: SnowflakeId::TIMESTAMP_MASK,
                }));
            }

            let next = match now.cmp(&current_ts) {
                cmp::Ordering::Equal => {
                    if current.has_sequence_room() {
                        current.increment_sequence()
                    } else {
                        return Ok(IdGenStatus::Pending {
                            yield_until: current_ts + 1,
                        });
                    }
                }
                cmp::Ordering::Greater => current.rollover_to_timestamp(now),
                cmp::Ordering::Less => {
                    return Err(self.cold_halt(Error::ClockMovedBackward {
                        last: current_ts,
                        now,
                    }));
                }
            };

            match self.state.compare_exchange_weak(
                current_raw,
                next.to_raw(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(IdGenStatus::Ready { id: next }),
                Err(actual) => current_raw = actual,
            }
        }
    }

    /// Decodes an ID into its fields.
    pub fn parse_id(&self, id: impl Into<SnowflakeId>) -> ParsedId {
        parse_id(id)
    }

    #[cold]
    #[inline(never)]
    fn cold_halt(&self, err: Error) -> Error {
        error!(
            %err,
            data_center_id = self.data_center_id,
            worker_id = self.worker_id,
            "halting generator"
        );
        // The first fatal error wins; racing threads report the same one.
        self.halted.get_or_init(|| err).clone()
    }
}

impl<T> SnowflakeGenerator for AtomicIdGenerator<T>
where
    T: TimeSource,
{
    fn data_center_id(&self) -> u8 {
        self.data_center_id
    }

    fn worker_id(&self) -> u8 {
        self.worker_id
    }

    fn try_poll_id(&self) -> Result<IdGenStatus> {
        self.try_poll_id()
    }
}
