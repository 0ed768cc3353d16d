//! Best-effort view-history recording.
//!
//! The read-modify-write against the store is not transactional: two
//! near-simultaneous records for the same channel can lose one append. That
//! is acceptable for telemetry, so failures are logged and abandoned, never
//! retried or surfaced.

use js_sys::Date;
use wasm_bindgen_futures::spawn_local;

use peeka_core::{decode_history, encode_history, ChannelId};

use crate::store;

pub(crate) struct Recorder;

impl Recorder {
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) fn record(&self, channel: ChannelId) {
        spawn_local(async move {
            if let Err(message) = persist(&channel).await {
                gloo::console::warn!("view history: record failed", message);
            }
        });
    }
}

async fn persist(channel: &ChannelId) -> Result<(), String> {
    let db = store::open().await.map_err(store::js_err)?;
    let bytes = store::read_history(&db).await.map_err(store::js_err)?;
    let mut history = bytes
        .as_deref()
        .and_then(decode_history)
        .unwrap_or_default();
    if !history.record(channel, Date::now() as u64) {
        // Inside the dedup window; nothing to write back.
        return Ok(());
    }
    let Some(encoded) = encode_history(&history) else {
        return Err("encode failed".to_string());
    };
    store::write_history(&db, &encoded)
        .await
        .map_err(store::js_err)?;
    gloo::console::log!("view history: recorded", channel.as_str());
    Ok(())
}
