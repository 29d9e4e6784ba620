use crate::constants::{ALL_PRACTICE_AREAS, CONSULTANT, PRACTICE_LEAD};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of user roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    PracticeLead,
    Consultant,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PracticeLead => PRACTICE_LEAD,
            Self::Consultant => CONSULTANT,
        }
    }

    /// Actions this role may perform.
    #[must_use]
    pub const fn permissions(self) -> Permissions {
        match self {
            Self::PracticeLead => Permissions::ALL,
            Self::Consultant => Permissions::VIEW.union(Permissions::REGISTER_SELF),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Actions gated by role.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u8 {
        const VIEW = 1 << 0;
        /// Ask to join a capability roster with one's own email.
        const REGISTER_SELF = 1 << 1;
        /// Add any email to a roster directly.
        const REGISTER_OTHERS = 1 << 2;
        const UNREGISTER = 1 << 3;
        /// List, approve and reject pending registration requests.
        const REVIEW_REQUESTS = 1 << 4;

        const ALL = Self::VIEW.bits()
            | Self::REGISTER_SELF.bits()
            | Self::REGISTER_OTHERS.bits()
            | Self::UNREGISTER.bits()
            | Self::REVIEW_REQUESTS.bits();
    }
}

/// The public view of an authenticated user, as stored in a session and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Practice areas a lead may administer; `"*"` covers all of them.
    #[serde(default)]
    pub practice_areas: Vec<String>,
    /// The consultant's home practice area.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practice_area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_level: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certifications: Vec<String>,
    /// Hours per week the consultant can take on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_hours: Option<u32>,
}

impl UserProfile {
    /// A profile with only the identifying fields set.
    pub fn new(username: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            role,
            name: None,
            practice_areas: Vec::new(),
            practice_area: None,
            skill_level: None,
            certifications: Vec::new(),
            availability_hours: None,
        }
    }

    #[must_use]
    pub fn with_practice_areas<I, A>(mut self, areas: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.practice_areas = areas.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn can(&self, permissions: Permissions) -> bool {
        self.role.permissions().contains(permissions)
    }

    #[must_use]
    pub const fn is_practice_lead(&self) -> bool {
        matches!(self.role, Role::PracticeLead)
    }

    /// Whether `email` is this user's own address (case-insensitive).
    #[must_use]
    pub fn owns_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }

    /// Whether the user's practice areas include `area`.
    #[must_use]
    pub fn covers_practice_area(&self, area: &str) -> bool {
        self.practice_areas.iter().any(|a| a == ALL_PRACTICE_AREAS || a.eq_ignore_ascii_case(area))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(areas: &[&str]) -> UserProfile {
        UserProfile::new("practice.lead", "lead@example.com", Role::PracticeLead)
            .with_practice_areas(areas.iter().copied())
    }

    #[test]
    fn consultants_cannot_review_or_unregister() {
        let perms = Role::Consultant.permissions();
        assert!(perms.contains(Permissions::REGISTER_SELF));
        assert!(!perms.contains(Permissions::UNREGISTER));
        assert!(!perms.contains(Permissions::REVIEW_REQUESTS));
        assert!(!perms.contains(Permissions::REGISTER_OTHERS));
    }

    #[test]
    fn leads_hold_every_permission() {
        assert_eq!(Role::PracticeLead.permissions(), Permissions::ALL);
        assert!(lead(&["*"]).can(Permissions::UNREGISTER | Permissions::REVIEW_REQUESTS));
    }

    #[test]
    fn wildcard_covers_every_area() {
        assert!(lead(&["*"]).covers_practice_area("Strategy"));
        assert!(lead(&["technology"]).covers_practice_area("Technology"));
        assert!(!lead(&["Technology"]).covers_practice_area("Operations"));
        assert!(!lead(&[]).covers_practice_area("Technology"));
    }

    #[test]
    fn email_ownership_ignores_case() {
        let user = lead(&[]);
        assert!(user.owns_email("Lead@Example.com"));
        assert!(!user.owns_email("someone@example.com"));
    }

    #[test]
    fn empty_details_are_not_serialized() {
        let value = serde_json::to_value(lead(&["*"])).unwrap();
        assert_eq!(value["role"], "practice_lead");
        assert_eq!(value["practice_areas"][0], "*");
        assert!(value.get("certifications").is_none());
        assert!(value.get("name").is_none());
    }

    #[test]
    fn role_round_trips_through_json() {
        assert_eq!(serde_json::to_string(&Role::PracticeLead).unwrap(), "\"practice_lead\"");
        let role: Role = serde_json::from_str("\"consultant\"").unwrap();
        assert_eq!(role, Role::Consultant);
        assert_eq!(role.to_string(), "consultant");
    }
}
