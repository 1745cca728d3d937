use std::sync::OnceLock;

use regex::Regex;
use reqwest::Url;

const HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "youtube-nocookie.com",
    "www.youtube-nocookie.com",
];

const PATH_PREFIXES: &[&str] = &["embed", "shorts", "live", "v"];

fn video_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("video id pattern is valid")
    })
}

/// Extracts the video id from a URL or returns the input if it is already
/// a bare id.
pub fn parse_video_id(reference: &str) -> Option<String> {
    let reference = reference.trim();
    if video_id_regex().is_match(reference) {
        return Some(reference.to_owned());
    }

    let url = if reference.contains("://") {
        Url::parse(reference).ok()?
    } else {
        Url::parse(&format!("https://{reference}")).ok()?
    };
    let host = url.host_str()?.to_ascii_lowercase();
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());

    let candidate = if host == "youtu.be" || host == "www.youtu.be" {
        segments.next()?.to_owned()
    } else if HOSTS.contains(&host.as_str()) {
        match segments.next()? {
            "watch" => url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned())?,
            prefix if PATH_PREFIXES.contains(&prefix) => {
                segments.next()?.to_owned()
            }
            _ => return None,
        }
    } else {
        return None;
    };

    video_id_regex()
        .is_match(&candidate)
        .then_some(candidate)
}
