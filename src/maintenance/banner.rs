// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Top-of-page banner shown to privileged viewers while maintenance is on.
//!
//! The banner and the layout offset it needs are installed together by
//! [`BannerGuard::mount`] and removed together when the guard is dropped.

use std::sync::{Arc, Mutex, PoisonError};

/// Height reserved at the top of the page while the banner is mounted.
pub const BANNER_HEIGHT_PX: u32 = 40;

const BANNER_TEXT: &str =
    "Maintenance mode is active. Visitors currently see the maintenance page.";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct ChromeState {
    banner: Option<String>,
    top_offset_px: u32,
}

/// Page-level decoration for one rendering: an optional banner plus the
/// top offset that keeps content clear of it.
#[derive(Debug, Clone, Default)]
pub struct PageChrome {
    state: Arc<Mutex<ChromeState>>,
}

impl PageChrome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_banner(&self) -> bool {
        self.lock().banner.is_some()
    }

    pub fn top_offset_px(&self) -> u32 {
        self.lock().top_offset_px
    }

    /// Insert the mounted banner right after the opening `<body>` tag.
    ///
    /// Returns the document unchanged when no banner is mounted. A document
    /// without a `<body>` tag gets the banner prepended.
    pub fn decorate(&self, html: &str) -> String {
        let state = self.lock().clone();
        let Some(banner) = state.banner else {
            return html.to_string();
        };

        let chrome = format!(
            "<style>body{{padding-top:{}px}}</style>{banner}",
            state.top_offset_px
        );

        match body_content_start(html) {
            Some(at) => {
                let mut out = String::with_capacity(html.len() + chrome.len());
                out.push_str(&html[..at]);
                out.push_str(&chrome);
                out.push_str(&html[at..]);
                out
            }
            None => format!("{chrome}{html}"),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ChromeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Byte index just past the opening `<body ...>` tag.
fn body_content_start(html: &str) -> Option<usize> {
    let open = html.to_ascii_lowercase().find("<body")?;
    let close = html[open..].find('>')?;
    Some(open + close + 1)
}

/// A mounted banner. Dropping it unmounts the banner and its offset.
#[must_use = "the banner is removed as soon as the guard is dropped"]
pub struct BannerGuard {
    chrome: PageChrome,
}

impl BannerGuard {
    pub fn mount(chrome: &PageChrome) -> Self {
        {
            let mut state = chrome.lock();
            state.banner = Some(format!(
                "<div class=\"maintenance-banner\" role=\"status\" style=\"position:fixed;top:0;\
                 left:0;right:0;z-index:9999;height:{BANNER_HEIGHT_PX}px;line-height:{BANNER_HEIGHT_PX}px;\
                 text-align:center;background:#f59e0b;color:#111827;font:600 14px sans-serif\">\
                 {BANNER_TEXT}</div>"
            ));
            state.top_offset_px = BANNER_HEIGHT_PX;
        }
        Self {
            chrome: chrome.clone(),
        }
    }
}

impl Drop for BannerGuard {
    fn drop(&mut self) {
        *self.chrome.lock() = ChromeState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "<html><head></head><body class=\"app\"><h1>Portal</h1></body></html>";

    #[test]
    fn mount_installs_banner_and_offset() {
        let chrome = PageChrome::new();
        let _guard = BannerGuard::mount(&chrome);

        assert!(chrome.has_banner());
        assert_eq!(chrome.top_offset_px(), BANNER_HEIGHT_PX);
    }

    #[test]
    fn drop_removes_banner_and_offset() {
        let chrome = PageChrome::new();
        {
            let _guard = BannerGuard::mount(&chrome);
        }

        assert!(!chrome.has_banner());
        assert_eq!(chrome.top_offset_px(), 0);
    }

    #[test]
    fn guard_released_on_early_return() {
        fn render(chrome: &PageChrome, fail: bool) -> Result<(), ()> {
            let _guard = BannerGuard::mount(chrome);
            if fail {
                return Err(());
            }
            Ok(())
        }

        let chrome = PageChrome::new();
        assert!(render(&chrome, true).is_err());
        assert!(!chrome.has_banner());
    }

    #[test]
    fn decorate_inserts_after_body_tag() {
        let chrome = PageChrome::new();
        let _guard = BannerGuard::mount(&chrome);

        let html = chrome.decorate(DOC);
        let body_at = html.find("<body class=\"app\">").unwrap();
        let banner_at = html.find("maintenance-banner").unwrap();
        let heading_at = html.find("<h1>").unwrap();

        assert!(body_at < banner_at && banner_at < heading_at);
        assert!(html.contains("padding-top:40px"));
    }

    #[test]
    fn decorate_without_banner_is_identity() {
        let chrome = PageChrome::new();
        assert_eq!(chrome.decorate(DOC), DOC);
    }

    #[test]
    fn decorate_fragment_without_body() {
        let chrome = PageChrome::new();
        let _guard = BannerGuard::mount(&chrome);

        let html = chrome.decorate("<p>fragment</p>");
        assert!(html.ends_with("<p>fragment</p>"));
        assert!(html.contains("maintenance-banner"));
    }
}
