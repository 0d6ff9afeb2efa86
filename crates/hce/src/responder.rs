//! Card-emulation responder
//!
//! Answers platform-delivered command APDUs. The responder is a pure
//! function over an injected [`IdentityStore`], so it can be driven by any
//! host card-emulation binding (or by the loopback transport in tests)
//! without the platform runtime.
//!
//! Per-command state machine, stateless across commands (the platform
//! guarantees at most one in-flight command at a time):
//!
//! 1. absent command -> send nothing
//! 2. SELECT-AID -> fresh identity announcement, `90 00`
//! 3. anything else -> `6D 00`
//!
//! A failure while building the announcement is converted to `6F 00` and
//! never propagates to the platform.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use olstap_apdu::{Response, StatusWord, is_select_aid};
use olstap_wire::{TapAnnounce, WireError};
use tracing::{debug, warn};

use crate::store::{IdentityStore, StoreError};

/// Reason the platform deactivated the card-emulation session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeactivationReason {
    /// The NFC link was lost (peer moved away)
    LinkLoss,
    /// The reader selected a different application
    Deselected,
}

#[derive(Debug, thiserror::Error)]
enum RespondError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Wire(#[from] WireError),
}

/// Answer a single command APDU.
///
/// Returns the raw response bytes to transmit, or `None` when the platform
/// delivered no command (platform contract: no response is sent).
pub fn respond(command: Option<&[u8]>, store: &dyn IdentityStore) -> Option<Bytes> {
    let command = command?;
    debug!(len = command.len(), "processing command APDU");

    let response = if is_select_aid(command) {
        match announce(store) {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "failed to build announcement");
                Response::status_only(StatusWord::INTERNAL_ERROR)
            }
        }
    } else {
        // All non-SELECT instructions, including any future signed-nonce
        // command, are rejected.
        debug!("instruction not supported");
        Response::status_only(StatusWord::INS_NOT_SUPPORTED)
    };

    Some(response.to_bytes())
}

/// Observational hook for platform-signaled session teardown.
///
/// The responder keeps no state across commands, so there is nothing to
/// flush.
pub fn deactivated(reason: DeactivationReason) {
    debug!(?reason, "card emulation deactivated");
}

// The announcement is built fresh on every SELECT, never cached across taps.
fn announce(store: &dyn IdentityStore) -> Result<Response, RespondError> {
    let account_id = store.account_id()?;
    let payload = TapAnnounce::new(account_id).to_payload()?;
    Ok(Response::success(payload))
}

/// Responder bound to a store, the shape a platform card-emulation binding
/// registers.
#[derive(Clone)]
pub struct HceResponder {
    store: Arc<dyn IdentityStore>,
}

impl HceResponder {
    /// Create a responder reading identity from the given store
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    /// Answer a single command APDU; see [`respond`]
    pub fn process_command(&self, command: Option<&[u8]>) -> Option<Bytes> {
        respond(command, self.store.as_ref())
    }

    /// Platform-signaled deactivation; see [`deactivated`]
    pub fn on_deactivated(&self, reason: DeactivationReason) {
        deactivated(reason);
    }
}

impl fmt::Debug for HceResponder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HceResponder").finish_non_exhaustive()
    }
}
