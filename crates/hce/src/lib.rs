//! Host card emulation side of the olstap proximity exchange
//!
//! The responder answers reader SELECT-AID commands with a fresh identity
//! announcement read from a device-local [`IdentityStore`]. All state
//! access sits behind the store trait so the responder is a pure function,
//! independently testable without a host NFC runtime.
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

pub mod loopback;
pub mod responder;
pub mod store;

pub use loopback::LoopbackTransport;
pub use responder::{DeactivationReason, HceResponder, deactivated, respond};
pub use store::{IdentityStore, MemoryStore, PrefsStore, StoreError};
