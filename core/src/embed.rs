use crate::channel::ChannelId;

pub const PLAYER_ORIGIN: &str = "https://player.twitch.tv";
pub const EMBED_PARENT: &str = "twitch.tv";

/// Embed endpoint for a channel. The trailing `time` parameter is a cache
/// buster so a fresh surface never resumes a stale player session.
pub fn embed_url(channel: &ChannelId, cache_buster: u64) -> String {
    format!(
        "{PLAYER_ORIGIN}/?channel={}&parent={EMBED_PARENT}&muted=false&time={cache_buster}",
        channel.as_str()
    )
}

/// Swap the cache buster on an existing embed URL, forcing a reload.
pub fn rebust(url: &str, cache_buster: u64) -> String {
    let base = url.split("&time=").next().unwrap_or(url);
    format!("{base}&time={cache_buster}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embed_url_carries_channel_and_buster() {
        let channel = ChannelId::new("foo").unwrap();
        let url = embed_url(&channel, 17);
        assert_eq!(
            url,
            "https://player.twitch.tv/?channel=foo&parent=twitch.tv&muted=false&time=17"
        );
    }

    #[test]
    fn rebust_replaces_only_the_buster() {
        let channel = ChannelId::new("foo").unwrap();
        let url = embed_url(&channel, 17);
        let again = rebust(&url, 99);
        assert_eq!(
            again,
            "https://player.twitch.tv/?channel=foo&parent=twitch.tv&muted=false&time=99"
        );
        assert_eq!(rebust("https://example/?a=1", 5), "https://example/?a=1&time=5");
    }
}
