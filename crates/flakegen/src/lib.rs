//! Time-ordered 64-bit Snowflake IDs partitioned by data center and worker.
//!
//! Every ID packs a millisecond timestamp (relative to [`CUSTOM_EPOCH`]), a
//! 5-bit data-center ID, a 5-bit worker ID and a 12-bit per-millisecond
//! sequence. Any process holding a distinct (data-center, worker) pair can
//! mint IDs without coordinating with anyone else.
//!
//! ```
//! use flakegen::IdGenerator;
//!
//! let generator = IdGenerator::new(1, 7)?;
//! let first = generator.next_id()?;
//! let second = generator.next_id()?;
//! assert!(first < second);
//!
//! let parsed = generator.parse_id(second);
//! assert_eq!((parsed.data_center_id, parsed.worker_id), (1, 7));
//! println!("{parsed}");
//! # Ok::<(), flakegen::Error>(())
//! ```
//!
//! Two generators are provided:
//! - [`IdGenerator`] serializes callers through a mutex.
//! - [`AtomicIdGenerator`] advances a packed atomic word with compare-and-swap.
//!
//! Both wait out an exhausted millisecond and refuse to issue IDs once the
//! clock has moved backward ([`Error::ClockMovedBackward`]).
//!
//! # Feature flags
//! `serde`: `Serialize`/`Deserialize` for [`SnowflakeId`], [`ParsedId`] and
//! [`GeneratorConfig`].
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod error;
mod generator;
mod id;
#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde;
mod time;

pub use crate::config::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::time::*;
