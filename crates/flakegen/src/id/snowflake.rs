use core::fmt;

use crate::id::ParsedId;

/// A 64-bit Snowflake ID partitioned by data center and worker.
///
/// - 42 bits timestamp (ms since [`CUSTOM_EPOCH`])
/// - 5 bits data-center ID
/// - 5 bits worker ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63             22 21             17 16         12 11             0
///              +----------------+-----------------+-------------+---------------+
///  Field:      | timestamp (42) | data center (5) | worker (5)  | sequence (12) |
///              +----------------+-----------------+-------------+---------------+
///              |<----------- MSB ------------ 64 bits ------------ LSB -------->|
/// ```
///
/// IDs compare in issue order: the timestamp occupies the most significant
/// bits, so sorting by the raw value sorts by creation time. Converting to
/// [`i64`] keeps the same bit pattern.
///
/// # Example
///
/// ```
/// use flakegen::SnowflakeId;
///
/// let id = SnowflakeId::from_components(1000, 3, 7, 42);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.data_center_id(), 3);
/// assert_eq!(id.worker_id(), 7);
/// assert_eq!(id.sequence(), 42);
/// ```
///
/// [`CUSTOM_EPOCH`]: crate::CUSTOM_EPOCH
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    /// Bitmask for extracting the 42-bit timestamp field. Occupies bits 22
    /// through 63.
    pub const TIMESTAMP_MASK: u64 = (1 << 42) - 1;

    /// Bitmask for extracting the 5-bit data-center field. Occupies bits 17
    /// through 21.
    pub const DATA_CENTER_ID_MASK: u64 = (1 << 5) - 1;

    /// Bitmask for extracting the 5-bit worker field. Occupies bits 12 through
    /// 16.
    pub const WORKER_ID_MASK: u64 = (1 << 5) - 1;

    /// Bitmask for extracting the 12-bit sequence field. Occupies bits 0
    /// through 11.
    pub const SEQUENCE_MASK: u64 = (1 << 12) - 1;

    /// Number of bits to shift the timestamp to its correct position (bit 22).
    pub const TIMESTAMP_SHIFT: u64 = 22;

    /// Number of bits to shift the data-center ID to its correct position (bit
    /// 17).
    pub const DATA_CENTER_ID_SHIFT: u64 = 17;

    /// Number of bits to shift the worker ID to its correct position (bit 12).
    pub const WORKER_ID_SHIFT: u64 = 12;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u64 = 0;

    /// Largest data-center ID the layout can hold.
    pub const MAX_DATA_CENTER_ID: u8 = Self::DATA_CENTER_ID_MASK as u8;

    /// Largest worker ID the layout can hold.
    pub const MAX_WORKER_ID: u8 = Self::WORKER_ID_MASK as u8;

    /// Largest sequence value within a single millisecond.
    pub const MAX_SEQUENCE: u16 = Self::SEQUENCE_MASK as u16;

    /// Packs the four fields into an ID. Each field is truncated to its width.
    pub const fn from_components(
        timestamp: u64,
        data_center_id: u8,
        worker_id: u8,
        sequence: u16,
    ) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let data_center_id =
            (data_center_id as u64 & Self::DATA_CENTER_ID_MASK) << Self::DATA_CENTER_ID_SHIFT;
        let worker_id = (worker_id as u64 & Self::WORKER_ID_MASK) << Self::WORKER_ID_SHIFT;
        let sequence = (sequence as u64 & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | data_center_id | worker_id | sequence,
        }
    }

    /// Wraps a raw bit pattern. Every `u64` is a valid ID.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns the raw bit pattern.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Returns the bit pattern as a signed integer.
    pub const fn to_i64(&self) -> i64 {
        self.id as i64
    }

    /// Extracts the timestamp (ms since the custom epoch) from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the data-center ID from the packed ID.
    pub const fn data_center_id(&self) -> u8 {
        ((self.id >> Self::DATA_CENTER_ID_SHIFT) & Self::DATA_CENTER_ID_MASK) as u8
    }

    /// Extracts the worker ID from the packed ID.
    pub const fn worker_id(&self) -> u8 {
        ((self.id >> Self::WORKER_ID_SHIFT) & Self::WORKER_ID_MASK) as u8
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u16 {
        ((self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK) as u16
    }

    /// Returns true if the sequence can be incremented within the same
    /// millisecond.
    pub const fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::MAX_SEQUENCE
    }

    /// Returns the same ID with its sequence incremented.
    pub const fn increment_sequence(&self) -> Self {
        Self::from_components(
            self.timestamp(),
            self.data_center_id(),
            self.worker_id(),
            self.sequence() + 1,
        )
    }

    /// Returns an ID for a newer timestamp with the sequence reset to zero.
    pub const fn rollover_to_timestamp(&self, timestamp: u64) -> Self {
        Self::from_components(timestamp, self.data_center_id(), self.worker_id(), 0)
    }

    /// Decodes the ID into its fields with an absolute Unix timestamp.
    pub const fn parse(&self) -> ParsedId {
        ParsedId::from_id(*self)
    }
}

impl From<u64> for SnowflakeId {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<i64> for SnowflakeId {
    fn from(raw: i64) -> Self {
        Self::from_raw(raw as u64)
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl From<SnowflakeId> for i64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_i64()
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("data_center_id", &self.data_center_id())
            .field("worker_id", &self.worker_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}
