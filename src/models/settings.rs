// Persisted application settings

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub theme: Theme,
    pub auto_start: bool,
    pub minimize_to_tray: bool,
    pub notifications: bool,
    pub sound_alerts: bool,
    pub in_app_alerts_enabled: bool,
    pub in_app_alerts_sound_enabled: bool,
    pub system_notifications_enabled: bool,
    pub system_notifications_sound_enabled: bool,
    /// Max history rows kept per monitor; 0 means unlimited.
    pub history_limit: u32,
}

impl AppSettings {
    pub const DEFAULT_HISTORY_LIMIT: u32 = 500;

    pub fn with_history_limit(history_limit: u32) -> Self {
        Self {
            history_limit,
            ..Self::default()
        }
    }

    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(v) = patch.theme {
            self.theme = v;
        }
        if let Some(v) = patch.auto_start {
            self.auto_start = v;
        }
        if let Some(v) = patch.minimize_to_tray {
            self.minimize_to_tray = v;
        }
        if let Some(v) = patch.notifications {
            self.notifications = v;
        }
        if let Some(v) = patch.sound_alerts {
            self.sound_alerts = v;
        }
        if let Some(v) = patch.in_app_alerts_enabled {
            self.in_app_alerts_enabled = v;
        }
        if let Some(v) = patch.in_app_alerts_sound_enabled {
            self.in_app_alerts_sound_enabled = v;
        }
        if let Some(v) = patch.system_notifications_enabled {
            self.system_notifications_enabled = v;
        }
        if let Some(v) = patch.system_notifications_sound_enabled {
            self.system_notifications_sound_enabled = v;
        }
        if let Some(v) = patch.history_limit {
            self.history_limit = v;
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            auto_start: false,
            minimize_to_tray: true,
            notifications: true,
            sound_alerts: false,
            in_app_alerts_enabled: true,
            in_app_alerts_sound_enabled: false,
            system_notifications_enabled: true,
            system_notifications_sound_enabled: false,
            history_limit: Self::DEFAULT_HISTORY_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub auto_start: Option<bool>,
    pub minimize_to_tray: Option<bool>,
    pub notifications: Option<bool>,
    pub sound_alerts: Option<bool>,
    pub in_app_alerts_enabled: Option<bool>,
    pub in_app_alerts_sound_enabled: Option<bool>,
    pub system_notifications_enabled: Option<bool>,
    pub system_notifications_sound_enabled: Option<bool>,
    pub history_limit: Option<u32>,
}
