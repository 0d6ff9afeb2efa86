//! Single read attempt
//!
//! One `read_once` call performs one full exchange: acquire the radio,
//! SELECT the olstap application, split the response, decode the payload
//! text. The technology handle is released on every exit path, including
//! a failed acquisition.

use bytes::Bytes;
use olstap_apdu::{Command, NfcTransport, Response};
use tracing::trace;

use crate::error::ReaderError;

/// Perform one exchange and return the decoded payload text.
///
/// The caller interprets the text; this layer does not gate on the status
/// word (it is traced), since the announcement payload carries the
/// information and an unsupported-instruction reply simply fails to parse
/// downstream.
pub async fn read_once<T: NfcTransport>(
    transport: &mut T,
    aid: &Bytes,
) -> Result<String, ReaderError> {
    let result = match transport.acquire().await {
        Ok(()) => exchange(transport, aid).await,
        Err(e) => Err(e.into()),
    };
    // Mandatory on every path: leaking the platform's exclusive NFC grant
    // would block all future acquisitions.
    transport.release().await;
    result
}

async fn exchange<T: NfcTransport>(transport: &mut T, aid: &Bytes) -> Result<String, ReaderError> {
    let select = Command::select_aid(aid.clone());
    let raw = transport.transceive(&select.to_bytes()).await?;

    let response = Response::from_bytes(&raw)?;
    trace!(status = %response.status(), payload_len = response.payload().len(), "peer replied");

    let text = std::str::from_utf8(response.payload())?;
    Ok(text.to_string())
}
