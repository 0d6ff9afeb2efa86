//! APDU response framing
//!
//! A response is `payload ++ status_word`; the 2-byte status word is
//! mandatory, the payload may be empty.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::{Error, StatusWord};

/// An APDU response: payload bytes plus the trailing status word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Response payload (possibly empty)
    payload: Bytes,
    /// Status word
    status: StatusWord,
}

impl Response {
    /// Create a new response with payload and status
    pub fn new(payload: impl Into<Bytes>, status: impl Into<StatusWord>) -> Self {
        Self {
            payload: payload.into(),
            status: status.into(),
        }
    }

    /// Create a success response (`90 00`)
    pub fn success(payload: impl Into<Bytes>) -> Self {
        Self::new(payload, StatusWord::SUCCESS)
    }

    /// Create a payload-less response carrying only a status word
    pub const fn status_only(status: StatusWord) -> Self {
        Self {
            payload: Bytes::new(),
            status,
        }
    }

    /// Parse a response from raw bytes (payload plus status word).
    ///
    /// Fails with [`Error::MalformedResponse`] when fewer than 2 bytes are
    /// present.
    pub fn from_bytes(frame: &[u8]) -> Result<Self, Error> {
        if frame.len() < 2 {
            return Err(Error::MalformedResponse(frame.len()));
        }

        let split = frame.len() - 2;
        let status = StatusWord::new(frame[split], frame[split + 1]);
        let payload = Bytes::copy_from_slice(&frame[..split]);

        trace!(
            sw1 = format_args!("{:#04x}", status.sw1),
            sw2 = format_args!("{:#04x}", status.sw2),
            payload_len = payload.len(),
            "parsed APDU response"
        );

        Ok(Self { payload, status })
    }

    /// Response payload bytes
    pub const fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// The trailing status word
    pub const fn status(&self) -> StatusWord {
        self.status
    }

    /// Check if the status word indicates success
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Serialize to raw bytes: payload followed by SW1 and SW2
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.payload.len() + 2);
        buf.put_slice(&self.payload);
        buf.put_u8(self.status.sw1);
        buf.put_u8(self.status.sw2);
        buf.freeze()
    }
}

impl From<Response> for Bytes {
    fn from(response: Response) -> Self {
        response.to_bytes()
    }
}

impl TryFrom<&[u8]> for Response {
    type Error = Error;

    fn try_from(frame: &[u8]) -> Result<Self, Error> {
        Self::from_bytes(frame)
    }
}
