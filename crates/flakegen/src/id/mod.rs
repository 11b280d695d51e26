mod parsed;
mod snowflake;

pub use parsed::*;
pub use snowflake::*;
