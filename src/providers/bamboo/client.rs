mod core;
mod results;

pub use self::core::{parse_query, BambooClient};
pub use self::results::Expansion;
