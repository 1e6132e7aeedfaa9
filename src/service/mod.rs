//! Service integrations for external APIs and clients.
//!
//! This module contains implementations for various services used by the notify-bot:
//! - Chat services (replies through the bot connector)
//! - Database services (the sent notification store on SurrealDB)
//! - Team data capture (forwarding team lifecycle events)
//! - Telemetry (named events with string properties)
//!
//! Each service module defines both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

use anyhow::anyhow;
use reqwest::Url;

use crate::base::types::Res;

pub mod capture;
pub mod chat;
pub mod db;
pub mod telemetry;

/// Appends path segments to `base`, percent-encoding each one.
pub(crate) fn append_path(base: &Url, segments: &[&str]) -> Res<Url> {
    let mut url = base.clone();

    url.path_segments_mut()
        .map_err(|_| anyhow!("`{}` cannot be used as a base URL.", base))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}
