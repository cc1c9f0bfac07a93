//! Shared utilities for paylink.

pub mod display;
pub mod logging;
pub mod time;

pub use display::{explorer_url, format_balance, truncate_address};
pub use logging::{init_logging, LogFormat, LoggingError};
pub use time::{format_duration, format_time_remaining};
