//! Wire payload carried over the olstap APDU channel
//!
//! The responding device answers a SELECT-AID with a single message shape,
//! a UTF-8 JSON object announcing its ledger identity:
//!
//! ```json
//! {"type":"tap-announce","accountId":"<string>"}
//! ```
//!
//! There is no versioning field. Readers must ignore messages whose `type`
//! they do not recognize.
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

use serde::{Deserialize, Serialize};

/// Application identifier routing SELECT commands to the olstap responder
/// (proprietary AID, 7 bytes).
pub const OLSTAP_AID: [u8; 7] = [0xF0, 0x00, 0x15, 0x08, 0x05, 0x05, 0x08];

/// Message type of an identity announcement
pub const TAP_ANNOUNCE: &str = "tap-announce";

/// Errors raised when decoding a wire payload
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// Payload was not the expected JSON shape
    #[error("undecodable payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Identity announcement sent in reply to a SELECT-AID.
///
/// Created fresh by the responder on every SELECT; consumed immediately by
/// the reading side and discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapAnnounce {
    /// Message type; [`TAP_ANNOUNCE`] for announcements
    #[serde(rename = "type")]
    pub kind: String,
    /// Opaque account identifier on the remote ledger
    #[serde(rename = "accountId", default)]
    pub account_id: String,
}

impl TapAnnounce {
    /// Create an announcement for the given account id
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            kind: TAP_ANNOUNCE.to_string(),
            account_id: account_id.into(),
        }
    }

    /// True iff the message type is `tap-announce`
    pub fn is_announce(&self) -> bool {
        self.kind == TAP_ANNOUNCE
    }

    /// Encode as the UTF-8 JSON payload bytes
    pub fn to_payload(&self) -> Result<Vec<u8>, WireError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode from payload text
    pub fn from_payload(text: &str) -> Result<Self, WireError> {
        Ok(serde_json::from_str(text)?)
    }
}
