use std::collections::HashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Lifecycle state Alertmanager reports for a group or a single alert.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Firing,
    Resolved,
}

// AlertManager webhook payload structures (version 4)
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AlertManagerWebhook {
    #[serde(default)]
    pub receiver: String,
    pub status: AlertStatus,
    #[serde(default)]
    pub alerts: Vec<AlertManagerAlert>,
    #[serde(rename = "groupLabels", default)]
    pub group_labels: HashMap<String, String>,
    #[serde(rename = "commonLabels", default)]
    pub common_labels: HashMap<String, String>,
    #[serde(rename = "commonAnnotations", default)]
    pub common_annotations: HashMap<String, String>,
    #[serde(rename = "externalURL", default)]
    pub external_url: String,
    #[serde(default)]
    pub version: String,
    #[serde(rename = "groupKey", default)]
    pub group_key: String,
    /// Number of alerts Alertmanager dropped because of `max_alerts`.
    #[serde(rename = "truncatedAlerts", default)]
    pub truncated_alerts: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AlertManagerAlert {
    pub status: AlertStatus,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub annotations: HashMap<String, String>,
    #[serde(rename = "startsAt", default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(rename = "endsAt", default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(rename = "generatorURL", default)]
    pub generator_url: String,
    #[serde(default)]
    pub fingerprint: String,
}

/// Parse a raw webhook body.
///
/// Parsing is strict: the first syntax or type error fails the whole
/// message and nothing is recovered from it.
pub fn decode(body: &[u8]) -> Result<AlertManagerWebhook> {
    Ok(serde_json::from_slice(body)?)
}

impl AlertManagerWebhook {
    /// True when the sender capped the batch and some alerts are missing.
    pub fn is_truncated(&self) -> bool {
        self.truncated_alerts > 0
    }

    pub fn firing(&self) -> impl Iterator<Item = &AlertManagerAlert> {
        self.alerts
            .iter()
            .filter(|alert| alert.status == AlertStatus::Firing)
    }

    pub fn resolved(&self) -> impl Iterator<Item = &AlertManagerAlert> {
        self.alerts
            .iter()
            .filter(|alert| alert.status == AlertStatus::Resolved)
    }
}

impl AlertManagerAlert {
    pub fn alert_name(&self) -> Option<&str> {
        self.labels.get("alertname").map(String::as_str)
    }
}
