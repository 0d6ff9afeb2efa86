//! Read taps from an in-process responder over the loopback transport.
//!
//! Both halves of the exchange run in this process: a card-emulation
//! responder announcing `acct-demo`, and the reader loop repeatedly
//! selecting it and printing every decoded announcement.

use std::sync::Arc;

use olstap_hce::{HceResponder, LoopbackTransport, MemoryStore};
use olstap_reader::{ReaderConfig, ReaderService};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,olstap_reader=debug".into()),
        )
        .init();

    let store = Arc::new(MemoryStore::with_account_id("acct-demo"));
    let transport = LoopbackTransport::new(HceResponder::new(store));

    let (mut service, mut taps) = ReaderService::new(transport, ReaderConfig::default());
    service.start();

    for _ in 0..3 {
        if let Some(payload) = taps.recv().await {
            println!("tap: {payload}");
        }
    }

    service.stop();
    service.join().await;
    println!("reader stopped");
}
