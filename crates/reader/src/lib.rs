//! Reader side of the olstap proximity exchange
//!
//! Drives the NFC radio to read identity announcements from a nearby
//! card-emulating device: one [`read_once`] call per exchange, wrapped in
//! a continuously-retrying [`ReaderService`] that isolates the inherently
//! noisy radio from its consumer. Transient hardware failures and protocol
//! failures alike become a fixed backoff followed by the next attempt;
//! only decoded payload texts leave this crate.
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod service;
pub mod session;

mod error;
pub use error::ReaderError;

#[cfg(test)]
mod testing;

pub use config::{DEFAULT_RETRY_BACKOFF, ReaderConfig};
pub use service::{ReaderService, StopHandle, TapStream};
pub use session::read_once;
