use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Capabilities keyed by their unique name.
pub type CapabilityCatalog = BTreeMap<String, Capability>;

/// A consulting capability and the consultants registered against it.
///
/// The name is not part of the record; it is the key in [`CapabilityCatalog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    pub description: String,
    pub practice_area: String,
    #[serde(default)]
    pub skill_levels: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub industry_verticals: Vec<String>,
    /// Team capacity in hours per week.
    pub capacity: u32,
    /// Registered consultant emails, unique ignoring ASCII case.
    #[serde(default)]
    pub consultants: Vec<String>,
    #[serde(default)]
    pub geographic_preferences: Vec<String>,
}

impl Capability {
    #[must_use]
    pub fn has_consultant(&self, email: &str) -> bool {
        self.consultants.iter().any(|c| c.eq_ignore_ascii_case(email))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

/// A consultant's request to join a capability roster, awaiting a practice lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub capability_name: String,
    pub email: String,
    /// Username of the consultant who asked.
    pub requested_by: String,
    /// Unix seconds.
    pub created_at: i64,
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<i64>,
}

impl RegistrationRequest {
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.status, RequestStatus::Pending)
    }

    /// Whether this request targets `email` on `capability` (email compared ignoring case).
    #[must_use]
    pub fn targets(&self, capability: &str, email: &str) -> bool {
        self.capability_name == capability && self.email.eq_ignore_ascii_case(email)
    }
}
