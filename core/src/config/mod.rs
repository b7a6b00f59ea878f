pub mod load;
pub mod types;

pub use load::{load, load_with_env, parse_str, DEFAULT_CONFIG_FILE};
pub use types::*;
