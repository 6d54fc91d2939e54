// Site aggregate: identifier plus its monitors

use serde::{Deserialize, Serialize};

use super::Monitor;

fn default_monitoring() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    /// Stable key for lookup, selection and backend correlation.
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "default_monitoring")]
    pub monitoring: bool,
    #[serde(default)]
    pub monitors: Vec<Monitor>,
}

impl Site {
    pub fn new(identifier: impl Into<String>, name: Option<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name,
            monitoring: true,
            monitors: Vec::new(),
        }
    }

    /// Name if set and non-empty, otherwise the identifier.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(n) if !n.trim().is_empty() => n,
            _ => &self.identifier,
        }
    }

    pub fn with_updates(&self, updates: &SiteUpdate) -> Site {
        let mut next = self.clone();
        if let Some(name) = &updates.name {
            next.name = Some(name.clone());
        }
        if let Some(monitoring) = updates.monitoring {
            next.monitoring = monitoring;
        }
        if let Some(monitors) = &updates.monitors {
            next.monitors = monitors.clone();
        }
        next
    }
}

/// Partial site update sent to `sites.updateSite`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitoring: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitors: Option<Vec<Monitor>>,
}

impl SiteUpdate {
    pub fn monitors(monitors: Vec<Monitor>) -> Self {
        Self {
            monitors: Some(monitors),
            ..Default::default()
        }
    }
}
