//! Serde support for [`SnowflakeId`].
//!
//! By default an ID serializes as its native signed 64-bit integer. Use
//! [`as_string`] for formats whose consumers cannot hold a full 64-bit integer
//! (JSON read by JavaScript, for instance).

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::SnowflakeId;

impl Serialize for SnowflakeId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_i64(self.to_i64())
    }
}

impl<'de> Deserialize<'de> for SnowflakeId {
    /// Accepts any signed or unsigned 64-bit integer; every bit pattern is a
    /// valid ID.
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NativeVisitor;

        impl de::Visitor<'_> for NativeVisitor {
            type Value = SnowflakeId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a 64-bit integer snowflake id")
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(SnowflakeId::from(v))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(SnowflakeId::from(v))
            }
        }

        d.deserialize_i64(NativeVisitor)
    }
}

/// Serialize a snowflake ID as a decimal string.
///
/// ```
/// use flakegen::SnowflakeId;
///
/// #[derive(serde::Serialize)]
/// struct Row {
///     #[serde(with = "flakegen::as_string")]
///     id: SnowflakeId,
/// }
/// ```
pub mod as_string {
    use super::{Deserializer, Serializer, de, fmt};
    use crate::SnowflakeId;

    /// Serialize a snowflake ID as its signed decimal representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(&id.to_i64())
    }

    /// Deserialize a snowflake ID from a decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The string is not a signed or unsigned 64-bit integer
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StringVisitor;

        impl de::Visitor<'_> for StringVisitor {
            type Value = SnowflakeId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a decimal string snowflake id")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                v.parse::<i64>()
                    .map(SnowflakeId::from)
                    .or_else(|_| v.parse::<u64>().map(SnowflakeId::from))
                    .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        d.deserialize_str(StringVisitor)
    }
}
