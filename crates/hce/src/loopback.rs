//! In-process loopback transport
//!
//! Routes every transceived command straight into a [`HceResponder`],
//! standing in for the radio when both halves of the exchange run in one
//! process (integration tests, demos). The "peer" is always present, so
//! acquisition never suspends.

use async_trait::async_trait;
use bytes::Bytes;
use olstap_apdu::{NfcTransport, TransportError};

use crate::responder::HceResponder;

/// Loopback `NfcTransport` answering through a local responder
#[derive(Debug)]
pub struct LoopbackTransport {
    responder: HceResponder,
    acquired: bool,
}

impl LoopbackTransport {
    /// Create a loopback transport answering through the given responder
    pub const fn new(responder: HceResponder) -> Self {
        Self {
            responder,
            acquired: false,
        }
    }
}

#[async_trait]
impl NfcTransport for LoopbackTransport {
    async fn acquire(&mut self) -> Result<(), TransportError> {
        self.acquired = true;
        Ok(())
    }

    async fn do_transceive(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        if !self.acquired {
            return Err(TransportError::Transmission);
        }
        self.responder
            .process_command(Some(command))
            .ok_or(TransportError::Transmission)
    }

    async fn release(&mut self) {
        self.acquired = false;
    }
}
