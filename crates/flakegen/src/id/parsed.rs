use core::fmt;

use chrono::{DateTime, Utc};

use crate::{id::SnowflakeId, time::CUSTOM_EPOCH_MILLIS};

/// The decoded fields of a [`SnowflakeId`].
///
/// Decoding is purely positional, so any 64-bit value yields a `ParsedId`,
/// including values no generator ever issued.
///
/// # Example
///
/// ```
/// use flakegen::{CUSTOM_EPOCH_MILLIS, SnowflakeId, parse_id};
///
/// let parsed = parse_id(SnowflakeId::from_components(1_500, 2, 9, 3));
/// assert_eq!(parsed.timestamp_ms, CUSTOM_EPOCH_MILLIS + 1_500);
/// assert_eq!(parsed.data_center_id, 2);
/// assert_eq!(parsed.worker_id, 9);
/// assert_eq!(parsed.sequence, 3);
/// assert_eq!(
///     parsed.to_string(),
///     "DateTime: 2014-12-31 16:00:01.500 -> dataCenter: 2 -> worker: 9 -> sequence: 3"
/// );
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParsedId {
    /// Absolute creation time in milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    pub data_center_id: u8,
    pub worker_id: u8,
    pub sequence: u16,
}

impl ParsedId {
    pub const fn from_id(id: SnowflakeId) -> Self {
        Self {
            timestamp_ms: id.timestamp() + CUSTOM_EPOCH_MILLIS,
            data_center_id: id.data_center_id(),
            worker_id: id.worker_id(),
            sequence: id.sequence(),
        }
    }

    /// Returns the creation time as a UTC date-time.
    ///
    /// The custom epoch is 2015-01-01 00:00 in UTC+8, so an ID from the
    /// first eight hours after it renders on 2014-12-31.
    ///
    /// The 42-bit timestamp field cannot reach past chrono's supported range,
    /// so this only returns `None` for hand-built values.
    pub fn date_time(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.timestamp_ms)
            .ok()
            .and_then(DateTime::from_timestamp_millis)
    }
}

impl From<SnowflakeId> for ParsedId {
    fn from(id: SnowflakeId) -> Self {
        Self::from_id(id)
    }
}

impl fmt::Display for ParsedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.date_time() {
            Some(dt) => write!(f, "DateTime: {}", dt.format("%Y-%m-%d %H:%M:%S%.3f"))?,
            None => write!(f, "DateTime: {}ms", self.timestamp_ms)?,
        }
        write!(
            f,
            " -> dataCenter: {} -> worker: {} -> sequence: {}",
            self.data_center_id, self.worker_id, self.sequence
        )
    }
}

/// Decodes any 64-bit value into its Snowflake fields.
///
/// Accepts [`SnowflakeId`], `u64` or `i64`. Negative `i64` values decode from
/// their two's-complement bit pattern.
pub fn parse_id(id: impl Into<SnowflakeId>) -> ParsedId {
    ParsedId::from_id(id.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_with_shifts_and_masks() {
        let raw: i64 = (5_000 << 22) | (17 << 17) | (3 << 12) | 0xABC;
        let parsed = parse_id(raw);
        assert_eq!(parsed.timestamp_ms, 5_000 + CUSTOM_EPOCH_MILLIS);
        assert_eq!(parsed.data_center_id, 17);
        assert_eq!(parsed.worker_id, 3);
        assert_eq!(parsed.sequence, 0xABC);
    }

    #[test]
    fn zero_decodes_to_epoch() {
        let parsed = parse_id(0_u64);
        assert_eq!(parsed.timestamp_ms, CUSTOM_EPOCH_MILLIS);
        assert_eq!(
            parsed.date_time().map(|dt| dt.to_rfc3339()),
            Some("2014-12-31T16:00:00+00:00".to_string())
        );
        assert_eq!(
            parsed.to_string(),
            "DateTime: 2014-12-31 16:00:00.000 -> dataCenter: 0 -> worker: 0 -> sequence: 0"
        );
    }

    #[test]
    fn negative_values_decode_deterministically() {
        let parsed = parse_id(-1_i64);
        assert_eq!(parsed.timestamp_ms, SnowflakeId::TIMESTAMP_MASK + CUSTOM_EPOCH_MILLIS);
        assert_eq!(parsed.data_center_id, 31);
        assert_eq!(parsed.worker_id, 31);
        assert_eq!(parsed.sequence, 4095);
        assert!(parsed.date_time().is_some());
        assert_eq!(parse_id(-1_i64), parse_id(u64::MAX));
    }

    #[test]
    fn out_of_range_timestamp_has_no_date_time() {
        let parsed = ParsedId {
            timestamp_ms: u64::MAX,
            data_center_id: 0,
            worker_id: 0,
            sequence: 0,
        };
        assert!(parsed.date_time().is_none());
        assert!(parsed.to_string().starts_with("DateTime: 18446744073709551615ms"));
    }
}
