// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embed URL derivation for the maintenance page video.

use url::Url;

const YOUTUBE_EMBED: &str = "https://www.youtube.com/embed/";
const VIMEO_EMBED: &str = "https://player.vimeo.com/video/";

/// Derive a playable embed URL from a video page URL.
///
/// Returns `None` for an empty input, meaning no video section is rendered.
/// Recognized YouTube and Vimeo page URLs are rewritten to their embed form;
/// anything else, including unparseable input, is returned unchanged.
pub fn embed_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let derived = Url::parse(trimmed).ok().and_then(|url| {
        let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");
        match host {
            "youtube.com" => youtube_watch_id(&url).map(|id| format!("{YOUTUBE_EMBED}{id}")),
            "youtu.be" => first_segment(&url).map(|id| format!("{YOUTUBE_EMBED}{id}")),
            "vimeo.com" => first_segment(&url)
                .filter(|id| id.chars().all(|c| c.is_ascii_digit()))
                .map(|id| format!("{VIMEO_EMBED}{id}")),
            _ => None,
        }
    });

    Some(derived.unwrap_or_else(|| raw.to_string()))
}

/// The `v` query parameter of a `/watch` URL.
fn youtube_watch_id(url: &Url) -> Option<String> {
    if url.path() != "/watch" {
        return None;
    }
    url.query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty())
}

fn first_segment(url: &Url) -> Option<String> {
    url.path_segments()?
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}
