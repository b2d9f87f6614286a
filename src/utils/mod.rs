pub mod constants;
pub mod string_utils;

pub use constants::*;
pub use string_utils::{compact_page_text, safe_truncate_boundary, safe_truncate_chars};
