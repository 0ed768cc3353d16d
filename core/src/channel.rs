use std::fmt;

/// Route names under the site root that are navigation pages, not channels.
pub const RESERVED_ROUTES: &[&str] = &[
    "directory",
    "videos",
    "downloads",
    "settings",
    "subscriptions",
    "inventory",
    "drops",
    "following",
];

/// Lower-cased channel name. Only constructed through the extraction
/// functions below, so a held `ChannelId` is always non-empty, lower-cased,
/// and not a reserved route.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(raw: &str) -> Option<Self> {
        let name = raw.trim().to_lowercase();
        if name.is_empty() || RESERVED_ROUTES.contains(&name.as_str()) {
            return None;
        }
        Some(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// First path component of an in-site href (`/name`, `/name/videos`,
/// `/name?tab=…`), if it names a channel.
pub fn channel_from_href(href: &str) -> Option<ChannelId> {
    let path = href.strip_prefix('/')?;
    let segment = path.split(['/', '?', '#']).next()?;
    ChannelId::new(segment)
}

/// Fallback for hoverables without a usable anchor: the element's own label
/// text (user-identifying attribute content).
pub fn channel_from_label(text: &str) -> Option<ChannelId> {
    ChannelId::new(text)
}

/// Channel for the page itself: a path with exactly one component.
pub fn channel_from_page_path(path: &str) -> Option<ChannelId> {
    let rest = path.strip_prefix('/')?;
    if rest.contains('/') {
        return None;
    }
    ChannelId::new(rest)
}

/// `channel` query parameter of an embed URL.
pub fn channel_from_embed_url(src: &str) -> Option<ChannelId> {
    let query = src.split_once('?')?.1;
    let query = query.split('#').next().unwrap_or(query);
    for pair in query.split('&') {
        if let Some(value) = pair.strip_prefix("channel=") {
            return ChannelId::new(value);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn href_takes_first_segment_lowercased() {
        let channel = channel_from_href("/SomeStreamer/videos").unwrap();
        assert_eq!(channel.as_str(), "somestreamer");
        let channel = channel_from_href("/other?referrer=raid").unwrap();
        assert_eq!(channel.as_str(), "other");
    }

    #[test]
    fn href_rejects_reserved_routes() {
        for route in RESERVED_ROUTES {
            assert!(channel_from_href(&format!("/{route}")).is_none());
            assert!(channel_from_href(&format!("/{route}/game")).is_none());
        }
    }

    #[test]
    fn href_rejects_non_rooted_and_empty() {
        assert!(channel_from_href("https://example.com/foo").is_none());
        assert!(channel_from_href("/").is_none());
        assert!(channel_from_href("").is_none());
    }

    #[test]
    fn label_is_trimmed_and_lowercased() {
        let channel = channel_from_label("  StreamerName \n").unwrap();
        assert_eq!(channel.as_str(), "streamername");
        assert!(channel_from_label("   ").is_none());
    }

    #[test]
    fn page_path_needs_exactly_one_segment() {
        assert_eq!(
            channel_from_page_path("/foo").unwrap().as_str(),
            "foo"
        );
        assert!(channel_from_page_path("/foo/clips").is_none());
        assert!(channel_from_page_path("/").is_none());
        assert!(channel_from_page_path("/directory").is_none());
    }

    #[test]
    fn embed_url_channel_parameter() {
        let src = "https://player.twitch.tv/?channel=Foo&parent=twitch.tv&muted=false";
        assert_eq!(channel_from_embed_url(src).unwrap().as_str(), "foo");
        assert!(channel_from_embed_url("https://player.twitch.tv/?parent=twitch.tv").is_none());
        assert!(channel_from_embed_url("no-query-here").is_none());
    }
}
