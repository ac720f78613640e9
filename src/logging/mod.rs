//! Logging infrastructure for console and file output.

mod subscriber;
mod utils;

pub use subscriber::init_subscriber;
