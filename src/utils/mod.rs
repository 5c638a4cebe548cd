#[allow(clippy::module_inception)]
mod utils;

pub use utils::{format_time, format_timestamp, truncate_string};
