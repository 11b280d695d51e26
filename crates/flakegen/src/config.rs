//! Construction parameters for a generator.
//!
//! A generator needs exactly two values, both provisioned outside this crate:
//! the data-center ID and the worker ID. [`GeneratorConfig`] carries them from
//! wherever they come from (code, a deserialized config file, or the process
//! environment) and validates them once, before any generator exists.
//!
//! ## Environment
//! - `FLAKEGEN_DATA_CENTER_ID`: data-center ID, `0..=31`, defaults to `0`
//! - `FLAKEGEN_WORKER_ID`: worker ID, `0..=31`, defaults to `0`
//!
//! A `.env` file in the working directory is honored via `dotenvy`.

use crate::{
    error::{Error, Result},
    id::SnowflakeId,
};

/// Environment variable holding the data-center ID.
pub const DATA_CENTER_ID_ENV: &str = "FLAKEGEN_DATA_CENTER_ID";

/// Environment variable holding the worker ID.
pub const WORKER_ID_ENV: &str = "FLAKEGEN_WORKER_ID";

/// The (data-center, worker) pair that partitions the ID space.
///
/// Values are kept as loaded so that out-of-range input can be reported
/// exactly; [`GeneratorConfig::validate`] enforces the layout limits.
///
/// # Example
///
/// ```
/// use flakegen::{GeneratorConfig, IdGenerator};
///
/// let config = GeneratorConfig::new(3, 17);
/// let generator = IdGenerator::from_config(&config).unwrap();
/// assert_eq!(generator.data_center_id(), 3);
/// assert_eq!(generator.worker_id(), 17);
///
/// assert!(GeneratorConfig::new(32, 0).validate().is_err());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GeneratorConfig {
    pub data_center_id: i64,
    pub worker_id: i64,
}

impl GeneratorConfig {
    pub const fn new(data_center_id: i64, worker_id: i64) -> Self {
        Self {
            data_center_id,
            worker_id,
        }
    }

    /// Loads the configuration from the process environment (and `.env`).
    ///
    /// Unset variables default to `0`. The result is not validated yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEnv`] if a variable is set but is not an
    /// integer.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| dotenvy::var(var).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        Ok(Self {
            data_center_id: parse_id_var(DATA_CENTER_ID_ENV, lookup(DATA_CENTER_ID_ENV))?,
            worker_id: parse_id_var(WORKER_ID_ENV, lookup(WORKER_ID_ENV))?,
        })
    }

    /// Checks both IDs against the layout limits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first offending
    /// field.
    pub fn validate(&self) -> Result<()> {
        self.validated().map(|_| ())
    }

    /// Returns the `(data_center_id, worker_id)` pair narrowed to the layout
    /// width.
    pub(crate) fn validated(&self) -> Result<(u8, u8)> {
        let data_center_id = check_range(
            "data_center_id",
            self.data_center_id,
            SnowflakeId::MAX_DATA_CENTER_ID,
        )?;
        let worker_id = check_range("worker_id", self.worker_id, SnowflakeId::MAX_WORKER_ID)?;
        Ok((data_center_id, worker_id))
    }
}

fn check_range(field: &'static str, value: i64, max: u8) -> Result<u8> {
    match u8::try_from(value) {
        Ok(v) if v <= max => Ok(v),
        _ => Err(Error::InvalidConfiguration { field, value, max }),
    }
}

fn parse_id_var(var: &'static str, value: Option<String>) -> Result<i64> {
    match value {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| Error::InvalidEnv { var, value }),
        None => Ok(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_full_range() {
        for dc in 0..=31 {
            for worker in [0, 15, 31] {
                assert_eq!(
                    GeneratorConfig::new(dc, worker).validated(),
                    Ok((dc as u8, worker as u8))
                );
            }
        }
    }

    #[test]
    fn rejects_out_of_range() {
        let cases = [
            (32, 0, "data_center_id", 32),
            (0, 32, "worker_id", 32),
            (-1, 0, "data_center_id", -1),
            (0, -1, "worker_id", -1),
            (256, 0, "data_center_id", 256),
            (0, i64::MAX, "worker_id", i64::MAX),
        ];
        for (dc, worker, field, value) in cases {
            assert_eq!(
                GeneratorConfig::new(dc, worker).validate(),
                Err(Error::InvalidConfiguration {
                    field,
                    value,
                    max: 31
                }),
                "({dc}, {worker})"
            );
        }
    }

    fn lookup<'a>(vars: &'a [(&str, &str)]) -> impl Fn(&'static str) -> Option<String> + 'a {
        move |var| {
            vars.iter()
                .find(|(name, _)| *name == var)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn unset_vars_default_to_zero() {
        assert_eq!(
            GeneratorConfig::from_lookup(lookup(&[])),
            Ok(GeneratorConfig::new(0, 0))
        );
        assert_eq!(
            GeneratorConfig::from_lookup(lookup(&[(WORKER_ID_ENV, "4")])),
            Ok(GeneratorConfig::new(0, 4))
        );
    }

    #[test]
    fn parses_trimmed_values() {
        let vars = [(DATA_CENTER_ID_ENV, "7"), (WORKER_ID_ENV, " 12 ")];
        assert_eq!(
            GeneratorConfig::from_lookup(lookup(&vars)),
            Ok(GeneratorConfig::new(7, 12))
        );
    }

    #[test]
    fn rejects_non_integer_values() {
        let vars = [(DATA_CENTER_ID_ENV, "7"), (WORKER_ID_ENV, "twelve")];
        assert_eq!(
            GeneratorConfig::from_lookup(lookup(&vars)),
            Err(Error::InvalidEnv {
                var: WORKER_ID_ENV,
                value: "twelve".to_string()
            })
        );
    }

    #[test]
    fn out_of_range_env_loads_but_fails_validation() {
        let vars = [(DATA_CENTER_ID_ENV, "-3")];
        let config = GeneratorConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config, GeneratorConfig::new(-3, 0));
        assert!(config.validate().is_err());
    }
}
