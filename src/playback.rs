//! Passive playback logging: records the page's current channel when a
//! video starts playing, plus a one-shot scan for videos that were already
//! playing before the listeners attached.

use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlVideoElement};

use peeka_core::tuning::{PLAYBACK_LOG_DELAY_MS, PLAYBACK_SCAN_DELAY_MS};
use peeka_core::{channel_from_embed_url, channel_from_label, channel_from_page_path, ChannelId};

use crate::session::PreviewSession;

const PLAYER_LINK_SELECTORS: &str =
    ".persistent-player .channel-info a, .metadata-layout__support a";
const PLAYER_FRAME_SELECTOR: &str = "iframe[src*=\"player.twitch.tv\"]";

/// Channel the page itself is showing: the path when it names exactly one
/// segment and main content is present, else the persistent player's channel
/// link, else the embed iframe's query parameter.
pub(crate) fn current_channel(document: &Document) -> Option<ChannelId> {
    let window = web_sys::window()?;
    if let Ok(path) = window.location().pathname() {
        if let Some(channel) = channel_from_page_path(&path) {
            if matches!(document.query_selector("main"), Ok(Some(_))) {
                return Some(channel);
            }
        }
    }
    if let Ok(Some(link)) = document.query_selector(PLAYER_LINK_SELECTORS) {
        if let Some(text) = link.text_content() {
            if let Some(channel) = channel_from_label(&text) {
                return Some(channel);
            }
        }
    }
    let frame = document.query_selector(PLAYER_FRAME_SELECTOR).ok()??;
    let src = frame.get_attribute("src")?;
    channel_from_embed_url(&src)
}

/// Capture-phase `play` listener. The record is delayed so the page has
/// settled on whatever channel the playback belongs to.
pub(crate) fn watch(session: &Rc<PreviewSession>, document: &Document) -> EventListener {
    let session = Rc::clone(session);
    let options = EventListenerOptions {
        phase: EventListenerPhase::Capture,
        passive: true,
    };
    EventListener::new_with_options(document, "play", options, move |event| {
        if event
            .target()
            .and_then(|t| t.dyn_into::<HtmlVideoElement>().ok())
            .is_none()
        {
            return;
        }
        let session = Rc::clone(&session);
        Timeout::new(PLAYBACK_LOG_DELAY_MS, move || {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(channel) = current_channel(&document) {
                session.recorder.record(channel);
            }
        })
        .forget();
    })
}

/// One-shot sweep for videos that were already playing at startup.
pub(crate) fn scan_after_startup(session: &Rc<PreviewSession>) {
    let session = Rc::clone(session);
    Timeout::new(PLAYBACK_SCAN_DELAY_MS, move || {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Ok(videos) = document.query_selector_all("video") else {
            return;
        };
        for i in 0..videos.length() {
            let Some(video) = videos
                .get(i)
                .and_then(|node| node.dyn_into::<HtmlVideoElement>().ok())
            else {
                continue;
            };
            if !video.paused() {
                if let Some(channel) = current_channel(&document) {
                    session.recorder.record(channel);
                }
            }
        }
    })
    .forget();
}
