// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire types for the upstream scheduling authority.
//!
//! Field casing follows the JSON the external tool emits; none of the
//! payloads are interpreted beyond what the runner needs to route them.

use serde::Deserialize;

/// Instance description, decoded from the first element of the
/// `get-info` reply.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteInfo {
    /// Boolean-valued integer: non-zero means a multisite install.
    #[serde(rename = "Multisite", default)]
    pub multisite: i64,
    /// Primary site URL; only meaningful when not multisite.
    #[serde(rename = "Siteurl", default)]
    pub siteurl: String,
    /// 0 = enabled, 1 = disabled indefinitely, >1 = disabled until this
    /// unix timestamp.
    #[serde(rename = "Disabled", default)]
    pub disabled: i64,
}

/// One logically independent tenant, identified by URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Site {
    pub url: String,
}

impl Site {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// One due-event row as returned by `list-due-batch`, before it is
/// associated with the site it was fetched for.
#[derive(Debug, Clone, Deserialize)]
pub struct DueEvent {
    #[serde(rename = "Timestamp", default)]
    pub timestamp: i64,
    #[serde(rename = "Action", default)]
    pub action: String,
    #[serde(rename = "Instance", default)]
    pub instance: String,
}

impl DueEvent {
    /// Stamp this row with the URL of the site it was fetched for.
    pub fn into_event(self, url: impl Into<String>) -> Event {
        Event {
            url: url.into(),
            timestamp: self.timestamp,
            action: self.action,
            instance: self.instance,
        }
    }
}

/// A scheduled job occurrence, ready to run against its site.
///
/// `action` and `instance` are opaque identifiers passed verbatim to the
/// external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub url: String,
    pub timestamp: i64,
    pub action: String,
    pub instance: String,
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
