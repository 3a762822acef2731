// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Editable content of the maintenance page.
//!
//! Field names serialize in camelCase; this is both the admin API wire
//! format and the persisted record format.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Social profile links shown on the maintenance page.
///
/// Each link is rendered only when present and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
}

impl SocialLinks {
    /// Links with a non-empty URL, as `(network, url)` pairs in display order.
    pub fn present(&self) -> Vec<(&'static str, &str)> {
        [
            ("Twitter", self.twitter.as_deref()),
            ("LinkedIn", self.linkedin.as_deref()),
            ("Telegram", self.telegram.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, url)| match url.map(str::trim) {
            Some(url) if !url.is_empty() => Some((name, url)),
            _ => None,
        })
        .collect()
    }

    fn apply(&mut self, patch: SocialLinksPatch) {
        if let Some(twitter) = patch.twitter {
            self.twitter = Some(twitter);
        }
        if let Some(linkedin) = patch.linkedin {
            self.linkedin = Some(linkedin);
        }
        if let Some(telegram) = patch.telegram {
            self.telegram = Some(telegram);
        }
    }
}

/// Content record driving the maintenance page.
///
/// Missing fields in a stored or submitted record fall back to the
/// built-in default, so a deserialized record is always complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct MaintenanceContent {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub mission: String,
    pub vision: String,
    pub additional_info: String,
    pub estimated_time: String,
    pub contact_email: String,
    /// Video page URL; an embed URL is derived at render time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub social_links: SocialLinks,
    /// `#rrggbb`, not validated.
    pub background_color: String,
    pub text_color: String,
    pub accent_color: String,
}

impl Default for MaintenanceContent {
    fn default() -> Self {
        Self {
            title: "We'll Be Back Soon".to_string(),
            subtitle: "Scheduled maintenance in progress".to_string(),
            description: "We are upgrading the Relational platform to bring you a faster \
                          and more secure experience. Thank you for your patience."
                .to_string(),
            mission: "Make digital value transfer as simple and trustworthy as sending \
                      a message."
                .to_string(),
            vision: "An open financial network where every community can issue, hold \
                     and move tokens safely."
                .to_string(),
            additional_info: "Your wallets and balances are safe. No action is required \
                              on your side."
                .to_string(),
            estimated_time: "A few hours".to_string(),
            contact_email: "support@relational.network".to_string(),
            video_url: None,
            social_links: SocialLinks {
                twitter: Some("https://twitter.com/relationalnet".to_string()),
                linkedin: Some("https://www.linkedin.com/company/relational-network".to_string()),
                telegram: Some("https://t.me/relationalnetwork".to_string()),
            },
            background_color: "#0f172a".to_string(),
            text_color: "#f8fafc".to_string(),
            accent_color: "#6366f1".to_string(),
        }
    }
}

impl MaintenanceContent {
    /// Shallow-merge `patch` into this record.
    ///
    /// Only named fields are overwritten. `social_links` is merged key by key.
    pub fn apply(&mut self, patch: MaintenanceContentPatch) {
        let MaintenanceContentPatch {
            title,
            subtitle,
            description,
            mission,
            vision,
            additional_info,
            estimated_time,
            contact_email,
            video_url,
            social_links,
            background_color,
            text_color,
            accent_color,
        } = patch;

        overwrite(&mut self.title, title);
        overwrite(&mut self.subtitle, subtitle);
        overwrite(&mut self.description, description);
        overwrite(&mut self.mission, mission);
        overwrite(&mut self.vision, vision);
        overwrite(&mut self.additional_info, additional_info);
        overwrite(&mut self.estimated_time, estimated_time);
        overwrite(&mut self.contact_email, contact_email);
        overwrite(&mut self.background_color, background_color);
        overwrite(&mut self.text_color, text_color);
        overwrite(&mut self.accent_color, accent_color);

        if let Some(video_url) = video_url {
            self.video_url = Some(video_url);
        }
        if let Some(links) = social_links {
            self.social_links.apply(links);
        }
    }
}

fn overwrite(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value;
    }
}

/// Partial update for [`SocialLinks`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinksPatch {
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub telegram: Option<String>,
}

/// Partial update for [`MaintenanceContent`]; absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct MaintenanceContentPatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub mission: Option<String>,
    pub vision: Option<String>,
    pub additional_info: Option<String>,
    pub estimated_time: Option<String>,
    pub contact_email: Option<String>,
    pub video_url: Option<String>,
    pub social_links: Option<SocialLinksPatch>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub accent_color: Option<String>,
}
