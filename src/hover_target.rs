use wasm_bindgen::JsCast;
use web_sys::{Element, EventTarget};

use peeka_core::{channel_from_href, channel_from_label, ChannelId};

/// Selector sets are configuration, not logic: they name the regions of the
/// host page that are hoverable.
pub(crate) const SIDEBAR_SELECTORS: &str =
    ".side-nav-card, .sidebar-channel-link, [data-a-target*=\"side-nav\"]";
pub(crate) const GRID_SELECTORS: &str = "[data-a-target=\"preview-card-image-link\"], \
     .live-channel-card, .offline-channel-card, [class*=\"card\"]";

pub(crate) enum HoverTarget {
    Sidebar { channel: ChannelId, element: Element },
    Grid { channel: ChannelId, card: Element },
}

/// Classify an event target. Sidebar wins over grid; a target matching
/// neither, or one without an extractable channel, is not a hoverable.
pub(crate) fn resolve(target: &EventTarget) -> Option<HoverTarget> {
    let element = target.dyn_ref::<Element>()?;
    if let Ok(Some(sidebar)) = element.closest(SIDEBAR_SELECTORS) {
        let channel = channel_from_element(&sidebar)?;
        return Some(HoverTarget::Sidebar {
            channel,
            element: sidebar,
        });
    }
    let card = element.closest(GRID_SELECTORS).ok().flatten()?;
    let channel = channel_from_element(&card)?;
    Some(HoverTarget::Grid { channel, card })
}

fn channel_from_element(element: &Element) -> Option<ChannelId> {
    if let Ok(Some(link)) = element.closest("a[href*=\"/\"]") {
        if let Some(href) = link.get_attribute("href") {
            if let Some(channel) = channel_from_href(&href) {
                return Some(channel);
            }
        }
    }
    let attr = element.get_attribute("data-a-target")?;
    if attr.contains("user") {
        return channel_from_label(&element.text_content().unwrap_or_default());
    }
    None
}
