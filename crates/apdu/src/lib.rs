//! APDU framing for the olstap proximity token exchange
//!
//! Provides the byte-level command/response framing used between the two
//! devices of a tap, according to ISO/IEC 7816-4:
//!
//! - Building and parsing command APDUs (the protocol recognizes a single
//!   instruction, SELECT by AID)
//! - Splitting response APDUs into payload and status word
//! - The [`NfcTransport`] trait the reader session drives
//!
//! The codec is stateless; session and retry behavior live in
//! `olstap-reader`, the card-emulation side in `olstap-hce`.
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

pub mod command;
pub mod response;
pub mod status;
pub mod transport;

mod error;
pub use error::Error;

pub use command::{Command, is_select_aid};
pub use response::Response;
pub use status::StatusWord;
pub use transport::{NfcTransport, TransportError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reexports() {
        let cmd = Command::select_aid(Bytes::from_static(&[0xF0, 0x00]));
        assert_eq!(cmd.class(), 0x00);
        assert_eq!(cmd.instruction(), 0xA4);

        let resp = Response::success(Bytes::from_static(&[0x01, 0x02]));
        assert!(resp.is_success());
        assert_eq!(resp.status(), StatusWord::new(0x90, 0x00));
    }
}
