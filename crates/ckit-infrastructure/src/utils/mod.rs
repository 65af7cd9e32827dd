//! Utilities
//!
//! Small helpers shared by applications built on ckit.

pub mod codec;
pub mod collections;
pub mod locale;
pub mod random;

use std::time::Duration;

pub use codec::{from_base64_to_string, from_string_to_base64};
pub use collections::split_array;
pub use locale::get_lang_or_default;
pub use random::{make_complex_random_string, make_random_numbers, make_random_string, make_uuid};

/// Pause the current task
pub async fn sleep(seconds: u64) {
    tokio::time::sleep(Duration::from_secs(seconds)).await;
}
