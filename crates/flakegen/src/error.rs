/// A result type defaulting to the crate [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `flakegen` can emit.
///
/// Configuration errors surface at construction time and never from a live
/// generator. [`Error::ClockMovedBackward`] and [`Error::TimestampOverflow`]
/// are runtime errors and both are fatal for the instance that raised them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A data-center or worker id was outside of its representable range.
    #[error("{field} must be in 0..={max}, got {value}")]
    InvalidConfiguration {
        /// Name of the offending parameter.
        field: &'static str,
        /// The rejected value.
        value: i64,
        /// Largest accepted value.
        max: u8,
    },

    /// The wall clock reported a time earlier than the last issued ID.
    ///
    /// The generator halts on this error and keeps returning it: issuing more
    /// IDs could duplicate or reorder ones that are already out.
    #[error("clock moved backward: last issued at {last}ms, clock reads {now}ms")]
    ClockMovedBackward {
        /// Timestamp (ms since the custom epoch) of the last issued ID.
        last: u64,
        /// Timestamp the clock reported.
        now: u64,
    },

    /// The clock reads past the largest timestamp the 42-bit field can hold.
    ///
    /// Masking the reading would wrap it to a small value and reissue old IDs,
    /// so the generator halts instead.
    #[error("timestamp overflow: clock reads {now}ms, layout holds up to {max}ms")]
    TimestampOverflow {
        /// Timestamp the clock reported.
        now: u64,
        /// Largest representable timestamp.
        max: u64,
    },

    /// A configuration environment variable was set but is not an integer.
    #[error("environment variable {var} is not an integer: {value:?}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Raw value found in the environment.
        value: String,
    },
}

impl Error {
    /// Returns `true` if the generator that produced this error can no longer
    /// issue IDs.
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ClockMovedBackward { .. } | Self::TimestampOverflow { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_clock_errors_are_fatal() {
        let config = Error::InvalidConfiguration {
            field: "worker_id",
            value: 32,
            max: 31,
        };
        let clock = Error::ClockMovedBackward { last: 10, now: 9 };
        let overflow = Error::TimestampOverflow { now: 8, max: 7 };
        let env = Error::InvalidEnv {
            var: "FLAKEGEN_WORKER_ID",
            value: "x".to_string(),
        };

        assert!(!config.is_fatal());
        assert!(!env.is_fatal());
        assert!(clock.is_fatal());
        assert!(overflow.is_fatal());
        assert_eq!(config.to_string(), "worker_id must be in 0..=31, got 32");
        assert_eq!(
            clock.to_string(),
            "clock moved backward: last issued at 10ms, clock reads 9ms"
        );
        assert_eq!(
            overflow.to_string(),
            "timestamp overflow: clock reads 8ms, layout holds up to 7ms"
        );
    }
}
