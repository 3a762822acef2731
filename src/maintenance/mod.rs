// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Maintenance Mode
//!
//! - `content` - the editable maintenance page record
//! - `store` - process-wide flag and content, persisted on every change
//! - `policy` - who may bypass maintenance mode
//! - `gate` - per-request decision and the Axum middleware enforcing it
//! - `banner` - notice shown to privileged viewers during maintenance
//! - `page` - maintenance page rendering
//! - `countdown` - decorative countdown shown on the page
//! - `video` - embeddable URLs for video links

pub mod banner;
pub mod content;
pub mod countdown;
pub mod gate;
pub mod page;
pub mod policy;
pub mod store;
pub mod video;

pub use banner::{BannerGuard, PageChrome};
pub use content::{MaintenanceContent, MaintenanceContentPatch, SocialLinks, SocialLinksPatch};
pub use countdown::{Countdown, CountdownTicker};
pub use gate::{decide, maintenance_gate, GateState, GateView, Screen};
pub use page::render_page;
pub use policy::{can_bypass, Viewer};
pub use store::{
    FileStateBackend, MaintenanceState, MaintenanceStore, MemoryStateBackend, StateBackend,
};
