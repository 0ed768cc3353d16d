pub mod channel;
pub mod embed;
pub mod floating;
pub mod grid;
pub mod history;
pub mod layout;
pub mod patch;
pub mod pip;
pub mod tuning;

pub use channel::{
    channel_from_embed_url, channel_from_href, channel_from_label, channel_from_page_path,
    ChannelId, RESERVED_ROUTES,
};
pub use embed::{embed_url, rebust, EMBED_PARENT, PLAYER_ORIGIN};
pub use floating::{FloatingController, FloatingDirective, FloatingPhase, FloatingTimer};
pub use grid::{GridDirective, GridPhase, GridSlot, GridTimer};
pub use history::{decode_history, encode_history, ViewHistory, VIEW_HISTORY_KEY, VIEW_HISTORY_VERSION};
pub use layout::{place_beside, AnchorRect, Viewport};
pub use patch::{PatchSurface, VisualPatch};
pub use pip::{PipSurface, PipWatch};
