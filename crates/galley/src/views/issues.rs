//! Issue reporting.
//!
//! Reports are validated and echoed back but never stored; the recent-issues
//! list is fixed sample data.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    /// Item not on board.
    Missing,
    /// Item damaged.
    Damaged,
    /// Item past its expiry date.
    Expired,
    /// Less than the loading plan says.
    Shortage,
    /// Galley equipment fault (oven, chiller, trolley brake).
    Equipment,
    /// Anything else.
    Other,
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "missing"),
            Self::Damaged => write!(f, "damaged"),
            Self::Expired => write!(f, "expired"),
            Self::Shortage => write!(f, "shortage"),
            Self::Equipment => write!(f, "equipment"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// How urgent an issue is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Can wait for the next turnaround.
    Low,
    /// Should be handled on arrival.
    #[default]
    Medium,
    /// Affects service on this flight.
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Where a report stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    /// Just reported.
    Open,
    /// Ground staff are on it.
    InProgress,
    /// Closed.
    Resolved,
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::InProgress => write!(f, "in progress"),
            Self::Resolved => write!(f, "resolved"),
        }
    }
}

/// A report as filled in by the crew member.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IssueDraft {
    /// Category.
    pub category: Option<IssueCategory>,
    /// Severity.
    pub severity: Severity,
    /// Affected item, free text.
    pub item: Option<String>,
    /// Affected location code.
    pub location: Option<String>,
    /// What happened.
    pub description: String,
    /// Reporting crew member.
    pub reporter: Option<String>,
}

/// A submitted report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueReport {
    /// Short reference, e.g. `ISS-1A2B3C4D`.
    pub reference: String,
    /// Category.
    pub category: IssueCategory,
    /// Severity.
    pub severity: Severity,
    /// Status.
    pub status: IssueStatus,
    /// Affected item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    /// Affected location code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// What happened.
    pub description: String,
    /// Reporting crew member.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter: Option<String>,
    /// When it was reported.
    pub reported_at: DateTime<Utc>,
}

impl IssueReport {
    /// Validate a draft and stamp it.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the category is missing or the
    /// description is blank.
    pub fn submit(draft: IssueDraft, reported_at: DateTime<Utc>) -> Result<Self> {
        let category = draft
            .category
            .ok_or_else(|| Error::validation("category", "is required"))?;
        let description = draft.description.trim().to_string();
        if description.is_empty() {
            return Err(Error::validation("description", "is required"));
        }

        let clean = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        let item = clean(draft.item);
        let location = clean(draft.location);

        let report = Self {
            reference: reference(category, &description, reported_at),
            category,
            severity: draft.severity,
            status: IssueStatus::Open,
            item,
            location,
            description,
            reporter: clean(draft.reporter),
            reported_at,
        };
        info!(
            "Issue {} reported ({}, {})",
            report.reference, report.category, report.severity
        );
        Ok(report)
    }
}

fn reference(category: IssueCategory, description: &str, at: DateTime<Utc>) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(category.to_string().as_bytes());
    hasher.update(description.as_bytes());
    hasher.update(at.to_rfc3339().as_bytes());
    let hex = hasher.finalize().to_hex();
    format!("ISS-{}", hex.as_str()[..8].to_ascii_uppercase())
}

/// Recently reported issues shown on the issues page.
#[must_use]
pub fn recent_issues() -> Vec<IssueReport> {
    let sample = |category, severity, status, item: &str, location: &str, description: &str, day| {
        let reported_at = Utc
            .with_ymd_and_hms(2024, 3, day, 9, 30, 0)
            .single()
            .unwrap_or_default();
        IssueReport {
            reference: reference(category, description, reported_at),
            category,
            severity,
            status,
            item: Some(item.to_string()),
            location: Some(location.to_string()),
            description: description.to_string(),
            reporter: None,
            reported_at,
        }
    };

    vec![
        sample(
            IssueCategory::Equipment,
            Severity::High,
            IssueStatus::Open,
            "Oven",
            "G5-O2",
            "Oven does not heat past 80 degrees",
            14,
        ),
        sample(
            IssueCategory::Shortage,
            Severity::Medium,
            IssueStatus::InProgress,
            "Orange juice",
            "G1-T2",
            "Loaded 6 cartons instead of 12",
            12,
        ),
        sample(
            IssueCategory::Damaged,
            Severity::Low,
            IssueStatus::Resolved,
            "Half trolley",
            "G5-H1",
            "Brake pedal sticks",
            9,
        ),
    ]
}
