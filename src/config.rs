//! Application configuration
//!
//! Every field has a default, so an empty JSON object (or no configuration
//! at all) wires up the two well-known containers with the stock marker
//! classes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::StackPanelResult;
use crate::panel::{InitialOpen, PanelGroupOptions};
use crate::ready::RetryPolicy;

/// Container id of the default multi-open stack panel
pub const MULTI_CONTAINER_ID: &str = "stackpanel-multi";
/// Container id of the default single-open stack panel
pub const SINGLE_CONTAINER_ID: &str = "stackpanel-single";

/// CSS marker classes shared with the stylesheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    /// On a panel: the panel is hidden
    pub hidden: String,
    /// On an item: the item is open
    pub active: String,
    /// Role marker of an item (`li`)
    pub item: String,
    /// Role marker of the clickable link inside an item
    pub link: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            hidden: "hide".to_string(),
            active: "accordeon_zone_actif".to_string(),
            item: "accordeon_zone".to_string(),
            link: "accordeon_zone_item".to_string(),
        }
    }
}

/// One container to enhance at start-up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub container_id: String,
    #[serde(default)]
    pub multi_open: bool,
    #[serde(default)]
    pub initial: InitialOpen,
}

impl GroupConfig {
    pub fn new(container_id: &str, multi_open: bool) -> Self {
        Self {
            container_id: container_id.to_string(),
            multi_open,
            initial: InitialOpen::default(),
        }
    }

    /// Set the initially open item policy
    pub fn with_initial(mut self, initial: InitialOpen) -> Self {
        self.initial = initial;
        self
    }
}

/// Page-ready detection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadyConfig {
    /// Ready-state polling interval in milliseconds
    pub poll_interval_ms: u64,
    /// Give up polling after this many checks (None = poll until ready)
    pub max_poll_attempts: Option<u32>,
    /// User-agent substring (case-insensitive) selecting the polling strategy
    pub polling_user_agent: String,
    /// Run the callback immediately if the document is already interactive
    pub fire_if_ready: bool,
}

impl Default for ReadyConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 10,
            max_poll_attempts: None,
            polling_user_agent: "WebKit".to_string(),
            fire_if_ready: true,
        }
    }
}

impl ReadyConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: self.max_poll_attempts,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub groups: Vec<GroupConfig>,
    pub markers: Markers,
    pub ready: ReadyConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            groups: vec![
                GroupConfig::new(MULTI_CONTAINER_ID, true),
                GroupConfig::new(SINGLE_CONTAINER_ID, false),
            ],
            markers: Markers::default(),
            ready: ReadyConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse a JSON configuration
    pub fn from_json(json: &str) -> StackPanelResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Panel group options for one configured container
    pub fn group_options(&self, group: &GroupConfig) -> PanelGroupOptions {
        PanelGroupOptions {
            multi_open: group.multi_open,
            initial: group.initial,
            markers: self.markers.clone(),
        }
    }
}
