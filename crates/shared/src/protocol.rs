//! Value types exchanged between the controller and whatever presents it:
//! transient notifications and confirmation prompts.

use serde::{Deserialize, Serialize};

pub const SUMMARY_SUCCESS: &str = "Correcto";
pub const SUMMARY_ERROR: &str = "Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

impl Notification {
    pub fn success(detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            summary: SUMMARY_SUCCESS.to_string(),
            detail: detail.into(),
        }
    }

    pub fn error(detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: SUMMARY_ERROR.to_string(),
            detail: detail.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// A destructive action waiting on explicit acceptance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub header: String,
    pub message: String,
}

impl Confirmation {
    pub fn new(header: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            message: message.into(),
        }
    }
}
