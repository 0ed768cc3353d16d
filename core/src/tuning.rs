//! Timing and geometry constants for the preview lifecycle.
//!
//! The PIP windows encode real protocol uncertainty: native PIP signals
//! arrive asynchronously, some time after the click that triggered them.

/// How long a hover must persist before a preview is confirmed.
pub const HOVER_DELAY_MS: u32 = 500;

/// How long the pointer must be off both anchor and surface before hiding.
pub const HIDE_DELAY_MS: u32 = 300;

/// Delay between a confirmed preview and its view-history record.
pub const VIEW_RECORD_DELAY_MS: u32 = 3_000;

/// Forced cache-busted reload of an inline embed that may have stalled.
pub const EMBED_RETRY_DELAY_MS: u32 = 1_500;

/// Grace period after a PIP-left signal before the container is torn down.
pub const PIP_EXIT_GRACE_MS: u32 = 100;

/// A click on the floating surface is treated as a PIP request for this long.
pub const PIP_CLICK_WINDOW_MS: f64 = 2_000.0;

/// Delay between a video starting to play and the passive history record.
pub const PLAYBACK_LOG_DELAY_MS: u32 = 1_000;

/// One-shot scan for already-playing videos, this long after startup.
pub const PLAYBACK_SCAN_DELAY_MS: u32 = 2_000;

/// Repeat records for a channel inside this window are dropped.
pub const HISTORY_DEDUP_WINDOW_MS: u64 = 60_000;

/// Oldest timestamps beyond this count are dropped per channel.
pub const HISTORY_MAX_ENTRIES: usize = 100;

pub const SURFACE_WIDTH_PX: f64 = 400.0;
pub const SURFACE_HEIGHT_PX: f64 = 225.0;
pub const EDGE_PADDING_PX: f64 = 20.0;

/// Opacity cross-fade between the loading overlay and a loaded inline embed.
pub const CROSS_FADE_MS: u32 = 300;
