use reqwest::StatusCode;
use serde::Serialize;
use wbp_core::{
    memento::Boundaries,
    wayback::{human_date, WaybackHost},
};

/// Status line of the discovery probe.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ProbeStatus {
    pub code: u16,
    pub text: String,
}

impl From<StatusCode> for ProbeStatus {
    fn from(value: StatusCode) -> Self {
        Self {
            code: value.as_u16(),
            text: value.canonical_reason().unwrap_or_default().to_string(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Outcome {
    /// The target was looked up and the archive didn't report it as missing.
    ///
    /// Either boundary is unset when the archive didn't advertise it. Both are
    /// unset when the lookup responses carried no usable `Link` or `Location`
    /// header; that is not the same as [`Outcome::NotInArchive`], which needs
    /// a 404 without any discovery header.
    Fresh(Boundaries),
    /// The target is itself a Wayback Machine link and wasn't looked up.
    AlreadyArchived { host: WaybackHost },
    /// The archive has no captures of the target.
    NotInArchive,
}

/// Result of looking a target URL up in the Wayback Machine.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CaptureRecord {
    pub target: String,
    pub outcome: Outcome,
    pub save_url: String,
    pub response: Option<ProbeStatus>,
}

impl CaptureRecord {
    pub fn is_already_archived(&self) -> bool {
        matches!(self.outcome, Outcome::AlreadyArchived { .. })
    }

    pub fn is_not_in_archive(&self) -> bool {
        matches!(self.outcome, Outcome::NotInArchive)
    }

    pub fn earliest(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Fresh(boundaries) => boundaries.earliest.as_deref(),
            _ => None,
        }
    }

    pub fn latest(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Fresh(boundaries) => boundaries.latest.as_deref(),
            _ => None,
        }
    }

    pub fn earliest_date(&self) -> Option<String> {
        self.earliest().map(human_date)
    }

    pub fn latest_date(&self) -> Option<String> {
        self.latest().map(human_date)
    }
}

/// A save-now request the archive accepted.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SubmitResult {
    pub target: String,
    pub save_url: String,
    pub response: ProbeStatus,
    /// Location of the new capture, when the archive reported one.
    pub location: Option<String>,
}
