use core::cmp::Ordering;

use parking_lot::Mutex;
use tracing::{error, info, instrument};

use crate::{
    config::GeneratorConfig,
    error::{Error, Result},
    generator::{IdGenStatus, SnowflakeGenerator},
    id::{ParsedId, SnowflakeId, parse_id},
    time::{TimeSource, WallClock},
};

/// A lock-based Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// The last issued ID (which carries the last timestamp and sequence) lives
/// behind a single [`Mutex`]. Every call reads the clock and advances the
/// state while holding it, so concurrent callers are linearized and can never
/// observe the same pre-increment state.
///
/// ## Features
/// - ✅ Thread-safe (share it through an [`Arc`] or a `static`)
/// - ✅ Fair access across threads
/// - ✅ Halts on clock regression or timestamp overflow instead of reissuing
///   timestamps
///
/// ## See Also
/// - [`AtomicIdGenerator`]
///
/// [`Arc`]: std::sync::Arc
/// [`AtomicIdGenerator`]: crate::AtomicIdGenerator
#[derive(Debug)]
pub struct IdGenerator<T = WallClock>
where
    T: TimeSource,
{
    data_center_id: u8,
    worker_id: u8,
    state: Mutex<State>,
    time: T,
}

#[derive(Debug)]
struct State {
    /// `None` until the first ID is issued.
    last: Option<SnowflakeId>,
    /// Set once the clock moves backward or overflows; never cleared.
    halted: Option<Error>,
}

impl IdGenerator<WallClock> {
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
    /// use flakegen::IdGenerator;
    ///
    /// let generator = IdGenerator::new(1, 2).unwrap();
    /// let id = generator.next_id().unwrap();
    ///
    /// let parsed = generator.parse_id(id);
    /// assert_eq!(parsed.data_center_id, 1);
    /// assert_eq!(parsed.worker_id, 2);
    ///
    /// assert!(IdGenerator::new(32, 0).is_err());
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

impl<T> IdGenerator<T>
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
        let (data_center_id, worker_id) =
            GeneratorConfig::new(data_center_id, worker_id).validated()?;
        info!(data_center_id, worker_id, "snowflake generator ready");
        Ok(Self {
            data_center_id,
            worker_id,
            state: Mutex::new(State {
                last: None,
                halted: None,
            }),
            time,
        })
    }

    /// Creates a generator whose last issued ID is preloaded.
    ///
    /// The next ID issued in the same millisecond continues after `sequence`.
    /// Mostly useful for driving the generator into a specific state.
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
        let generator = Self::with_time(data_center_id, worker_id, time)?;
        generator.state.lock().last = Some(SnowflakeId::from_components(
            timestamp,
            generator.data_center_id,
            generator.worker_id,
            sequence,
        ));
        Ok(generator)
    }

    pub const fn data_center_id(&self) -> u8 {
        self.data_center_id
    }

    pub const fn worker_id(&self) -> u8 {
        self.worker_id
    }

    /// Returns `true` once a fatal clock error has stopped this generator.
    pub fn is_halted(&self) -> bool {
        self.state.lock().halted.is_some()
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
    /// # Returns
    /// - `Ok(IdGenStatus::Ready { id })`: a new ID is available
    /// - `Ok(IdGenStatus::Pending { yield_until })`: the millisecond is
    ///   exhausted; retry once the clock reaches `yield_until`
    /// - `Err(_)`: the generator has halted
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockMovedBackward`] if the clock reads earlier than
    /// the last issued ID, or [`Error::TimestampOverflow`] if it reads past
    /// the 42-bit timestamp range.
    ///
    /// # Example
    /// ```
    /// use flakegen::{IdGenStatus, IdGenerator};
    ///
    /// let generator = IdGenerator::new(0, 0).unwrap();
    ///
    /// let id = loop {
    ///     match generator.try_poll_id() {
    ///         Ok(IdGenStatus::Ready { id }) => break id,
    ///         Ok(IdGenStatus::Pending { .. }) => std::thread::yield_now(),
    ///         Err(e) => panic!("Generator error: {e}"),
    ///     }
    /// };
    /// assert_eq!(id.sequence(), 0);
    /// ```
    #[instrument(level = "trace", skip(self))]
    pub fn try_poll_id(&self) -> Result<IdGenStatus> {
        let mut state = self.state.lock();
        if let Some(err) = &state.halted {
            return Err(err.clone());
        }

        // Read under the lock: a reading taken before acquiring it could be
        // older than a timestamp another caller just stored.
        let now = self.time.current_millis();
        if now > SnowflakeId::TIMESTAMP_MASK {
            let err = Error::TimestampOverflow {
                now,
                max: SnowflakeId::TIMESTAMP_MASK,
            };
            return Err(self.cold_halt(&mut state, err));
        }

        let Some(last) = state.last else {
            let id = SnowflakeId::from_components(now, self.data_center_id, self.worker_id, 0);
            state.last = Some(id);
            return Ok(IdGenStatus::Ready { id });
        };

        let last_ts = last.timestamp();
        match now.cmp(&last_ts) {
            Ordering::Equal => {
                if last.has_sequence_room() {
                    let id = last.increment_sequence();
                    state.last = Some(id);
                    Ok(IdGenStatus::Ready { id })
                } else {
                    Ok(IdGenStatus::Pending {
                        yield_until: last_ts + 1,
                    })
                }
            }
            Ordering::Greater => {
                let id = last.rollover_to_timestamp(now);
                state.last = Some(id);
                Ok(IdGenStatus::Ready { id })
            }
            Ordering::Less => {
                let err = Error::ClockMovedBackward { last: last_ts, now };
                Err(self.cold_halt(&mut state, err))
            }
        }
    }

    /// Decodes an ID into its fields. Does not lock.
    pub fn parse_id(&self, id: impl Into<SnowflakeId>) -> ParsedId {
        parse_id(id)
    }

    #[cold]
    #[inline(never)]
    fn cold_halt(&self, state: &mut State, err: Error) -> Error {
        error!(
            %err,
            data_center_id = self.data_center_id,
            worker_id = self.worker_id,
            "halting generator"
        );
        state.halted = Some(err.clone());
        err
    }
}

impl<T> SnowflakeGenerator for IdGenerator<T>
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
