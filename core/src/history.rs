use std::collections::BTreeMap;

use rkyv::rancor::Error;

use crate::channel::ChannelId;
use crate::tuning::{HISTORY_DEDUP_WINDOW_MS, HISTORY_MAX_ENTRIES};

pub const VIEW_HISTORY_VERSION: u32 = 1;
pub const VIEW_HISTORY_KEY: &str = "history.v1";

/// Per-channel viewing timestamps, ascending, capped at
/// `HISTORY_MAX_ENTRIES`. Append-only apart from the front truncation.
#[derive(Clone, Debug, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
pub struct ViewHistory {
    pub version: u32,
    pub channels: BTreeMap<String, Vec<u64>>,
}

impl Default for ViewHistory {
    fn default() -> Self {
        Self {
            version: VIEW_HISTORY_VERSION,
            channels: BTreeMap::new(),
        }
    }
}

impl ViewHistory {
    /// Append `now_ms` for the channel unless its last record is within the
    /// dedup window. Returns whether anything changed, so callers can skip
    /// the write-back.
    pub fn record(&mut self, channel: &ChannelId, now_ms: u64) -> bool {
        let entries = self.channels.entry(channel.as_str().to_string()).or_default();
        if let Some(last) = entries.last() {
            if now_ms.saturating_sub(*last) <= HISTORY_DEDUP_WINDOW_MS {
                return false;
            }
        }
        entries.push(now_ms);
        if entries.len() > HISTORY_MAX_ENTRIES {
            let excess = entries.len() - HISTORY_MAX_ENTRIES;
            entries.drain(..excess);
        }
        true
    }

    pub fn entries(&self, channel: &ChannelId) -> &[u64] {
        self.channels
            .get(channel.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

pub fn encode_history(history: &ViewHistory) -> Option<Vec<u8>> {
    rkyv::to_bytes::<Error>(history)
        .ok()
        .map(|bytes| bytes.into_vec())
}

pub fn decode_history(bytes: &[u8]) -> Option<ViewHistory> {
    let history = rkyv::from_bytes::<ViewHistory, Error>(bytes).ok()?;
    if history.version != VIEW_HISTORY_VERSION {
        return None;
    }
    Some(history)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(name: &str) -> ChannelId {
        ChannelId::new(name).unwrap()
    }

    #[test]
    fn records_inside_the_window_are_dropped() {
        let mut history = ViewHistory::default();
        let foo = channel("foo");
        assert!(history.record(&foo, 1_000));
        assert!(!history.record(&foo, 1_000 + HISTORY_DEDUP_WINDOW_MS));
        assert_eq!(history.entries(&foo).len(), 1);

        assert!(history.record(&foo, 1_000 + HISTORY_DEDUP_WINDOW_MS + 1));
        assert_eq!(
            history.entries(&foo),
            &[1_000, 1_000 + HISTORY_DEDUP_WINDOW_MS + 1]
        );
    }

    #[test]
    fn channels_deduplicate_independently() {
        let mut history = ViewHistory::default();
        assert!(history.record(&channel("foo"), 5_000));
        assert!(history.record(&channel("bar"), 5_000));
        assert_eq!(history.entries(&channel("foo")).len(), 1);
        assert_eq!(history.entries(&channel("bar")).len(), 1);
    }

    #[test]
    fn never_holds_more_than_the_cap() {
        let mut history = ViewHistory::default();
        let foo = channel("foo");
        let step = HISTORY_DEDUP_WINDOW_MS + 1;
        for i in 0..150u64 {
            history.record(&foo, i * step);
        }
        let entries = history.entries(&foo);
        assert_eq!(entries.len(), HISTORY_MAX_ENTRIES);
        // Oldest entries fall off the front; the newest survives.
        assert_eq!(*entries.last().unwrap(), 149 * step);
        assert_eq!(entries[0], 50 * step);
    }

    #[test]
    fn encode_decode_round_trip() {
        let mut history = ViewHistory::default();
        history.record(&channel("foo"), 1_000);
        history.record(&channel("bar"), 2_000);
        let bytes = encode_history(&history).unwrap();
        let decoded = decode_history(&bytes).unwrap();
        assert_eq!(decoded.channels, history.channels);
    }

    #[test]
    fn decode_rejects_unknown_versions() {
        let mut history = ViewHistory::default();
        history.version = VIEW_HISTORY_VERSION + 1;
        let bytes = encode_history(&history).unwrap();
        assert!(decode_history(&bytes).is_none());
        assert!(decode_history(b"not a history blob").is_none());
    }
}
