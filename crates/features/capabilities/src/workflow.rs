//! Registration rules.
//!
//! Every operation takes the registry by `&mut` so the caller holds one write lock across
//! the whole check-then-mutate sequence. The acting user is `None` for anonymous callers.

use crate::error::CapabilityError;
use crate::requests::RequestLedger;
use crate::store::CapabilityStore;
use caphub_kernel::domain::catalog::{RegistrationRequest, RequestStatus};
use caphub_kernel::domain::identity::{Permissions, Role, UserProfile};
use tracing::info;

pub const LOGIN_REQUIRED: &str = "Please log in first";
pub const LEAD_REQUIRED: &str = "Practice lead permissions are required";
pub const AREA_FORBIDDEN: &str = "You do not have permissions for this capability's practice area";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const ALREADY_REGISTERED: &str = "Consultant is already registered for this capability";
pub const SELF_ONLY: &str = "Consultants can only request registration for themselves";
pub const ALREADY_PENDING: &str = "A pending registration request already exists";
pub const REQUEST_NOT_FOUND: &str = "Pending registration request not found";

/// Rosters plus the request ledger, guarded together.
#[derive(Debug, Clone, Default)]
pub struct CapabilityRegistry {
    pub store: CapabilityStore,
    pub requests: RequestLedger,
}

impl CapabilityRegistry {
    #[must_use]
    pub fn new(store: CapabilityStore) -> Self {
        Self { store, requests: RequestLedger::default() }
    }
}

/// What a successful `register` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// The email was added to the roster.
    Registered { capability: String, email: String },
    /// A consultant asked to join; a practice lead has to approve.
    Requested(RegistrationRequest),
}

impl Registration {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Registered { capability, email } => format!("Registered {email} for {capability}"),
            Self::Requested(request) => format!(
                "Registration request submitted for {} on {}. A practice lead must approve it.",
                request.email, request.capability_name
            ),
        }
    }
}

/// Adds `email` to a roster (practice leads) or files a request for approval (consultants).
pub fn register(
    registry: &mut CapabilityRegistry,
    capability: &str,
    email: &str,
    actor: Option<&UserProfile>,
    now: i64,
) -> Result<Registration, CapabilityError> {
    let user = require_user(actor)?;
    let email = required_email(email)?;
    let practice_area = registry.store.get(capability)?.practice_area.clone();

    if registry.store.is_registered(capability, email) {
        return Err(CapabilityError::validation(ALREADY_REGISTERED));
    }

    match user.role {
        Role::Consultant => {
            if !user.can(Permissions::REGISTER_SELF) || !user.owns_email(email) {
                return Err(CapabilityError::forbidden(SELF_ONLY));
            }
            if registry.requests.find_pending(capability, email).is_some() {
                return Err(CapabilityError::validation(ALREADY_PENDING));
            }

            let request = registry.requests.submit(capability, email, &user.username, now);
            info!(%capability, %email, requested_by = %user.username, "Registration requested");
            Ok(Registration::Requested(request))
        }
        Role::PracticeLead => {
            require_area(user, Permissions::REGISTER_OTHERS, &practice_area)?;
            registry.store.add_consultant(capability, email)?;

            // A lead registering directly settles any open request for the same pair.
            registry.requests.resolve(capability, email, RequestStatus::Approved, &user.username, now);

            info!(%capability, %email, by = %user.username, "Consultant registered");
            Ok(Registration::Registered { capability: capability.to_owned(), email: email.to_owned() })
        }
    }
}

/// Removes `email` from a roster. Practice leads only.
pub fn unregister(
    registry: &mut CapabilityRegistry,
    capability: &str,
    email: &str,
    actor: Option<&UserProfile>,
) -> Result<(), CapabilityError> {
    let user = require(actor, Permissions::UNREGISTER)?;
    let email = required_email(email)?;
    let practice_area = &registry.store.get(capability)?.practice_area;
    require_area(user, Permissions::UNREGISTER, practice_area)?;

    registry.store.remove_consultant(capability, email)?;
    info!(%capability, %email, by = %user.username, "Consultant unregistered");
    Ok(())
}

/// Accepts a pending request, adding the email to the roster.
pub fn approve(
    registry: &mut CapabilityRegistry,
    capability: &str,
    email: &str,
    actor: Option<&UserProfile>,
    now: i64,
) -> Result<RegistrationRequest, CapabilityError> {
    let (user, email) = review_preconditions(registry, capability, email, actor)?;

    registry.store.add_consultant(capability, email)?;
    let request = registry
        .requests
        .resolve(capability, email, RequestStatus::Approved, &user.username, now)
        .ok_or_else(|| CapabilityError::not_found(REQUEST_NOT_FOUND))?;

    info!(%capability, %email, by = %user.username, "Registration approved");
    Ok(request)
}

/// Declines a pending request. The roster is not touched.
pub fn reject(
    registry: &mut CapabilityRegistry,
    capability: &str,
    email: &str,
    actor: Option<&UserProfile>,
    now: i64,
) -> Result<RegistrationRequest, CapabilityError> {
    let (user, email) = review_preconditions(registry, capability, email, actor)?;

    let request = registry
        .requests
        .resolve(capability, email, RequestStatus::Rejected, &user.username, now)
        .ok_or_else(|| CapabilityError::not_found(REQUEST_NOT_FOUND))?;

    info!(%capability, %email, by = %user.username, "Registration rejected");
    Ok(request)
}

/// Pending requests on capabilities within the lead's practice areas.
pub fn list_pending(
    registry: &CapabilityRegistry,
    actor: Option<&UserProfile>,
) -> Result<Vec<RegistrationRequest>, CapabilityError> {
    let user = require(actor, Permissions::REVIEW_REQUESTS)?;

    Ok(registry
        .requests
        .pending()
        .filter(|request| {
            registry
                .store
                .get(&request.capability_name)
                .is_ok_and(|c| user.covers_practice_area(&c.practice_area))
        })
        .cloned()
        .collect())
}

fn review_preconditions<'a>(
    registry: &CapabilityRegistry,
    capability: &str,
    email: &'a str,
    actor: Option<&'a UserProfile>,
) -> Result<(&'a UserProfile, &'a str), CapabilityError> {
    let user = require(actor, Permissions::REVIEW_REQUESTS)?;
    let email = required_email(email)?;
    let practice_area = &registry.store.get(capability)?.practice_area;
    require_area(user, Permissions::REVIEW_REQUESTS, practice_area)?;

    if registry.requests.find_pending(capability, email).is_none() {
        return Err(CapabilityError::not_found(REQUEST_NOT_FOUND));
    }
    Ok((user, email))
}

fn require_user(actor: Option<&UserProfile>) -> Result<&UserProfile, CapabilityError> {
    actor.ok_or_else(|| CapabilityError::forbidden(LOGIN_REQUIRED))
}

fn require(
    actor: Option<&UserProfile>,
    permission: Permissions,
) -> Result<&UserProfile, CapabilityError> {
    let user = require_user(actor)?;
    if user.can(permission) { Ok(user) } else { Err(CapabilityError::forbidden(LEAD_REQUIRED)) }
}

fn require_area(
    user: &UserProfile,
    permission: Permissions,
    practice_area: &str,
) -> Result<(), CapabilityError> {
    if user.can(permission) && user.covers_practice_area(practice_area) {
        Ok(())
    } else {
        Err(CapabilityError::forbidden(AREA_FORBIDDEN))
    }
}

fn required_email(email: &str) -> Result<&str, CapabilityError> {
    let email = email.trim();
    if email.is_empty() { Err(CapabilityError::validation(EMAIL_REQUIRED)) } else { Ok(email) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::load_catalog;

    const NOW: i64 = 1_700_000_000;

    fn registry() -> CapabilityRegistry {
        CapabilityRegistry::new(CapabilityStore::new(load_catalog(None).unwrap()))
    }

    fn lead(areas: &[&str]) -> UserProfile {
        UserProfile::new("practice.lead", "lead@slalom.com", Role::PracticeLead)
            .with_practice_areas(areas.iter().copied())
    }

    fn consultant() -> UserProfile {
        UserProfile::new("consultant.user", "consultant@slalom.com", Role::Consultant)
    }

    fn roster(registry: &CapabilityRegistry, name: &str) -> Vec<String> {
        registry.store.get(name).unwrap().consultants.clone()
    }

    #[test]
    fn lead_registers_directly() {
        let mut registry = registry();
        let outcome =
            register(&mut registry, "Cybersecurity", "new@slalom.com", Some(&lead(&["*"])), NOW)
                .unwrap();

        assert_eq!(outcome.message(), "Registered new@slalom.com for Cybersecurity");
        assert!(registry.store.is_registered("Cybersecurity", "new@slalom.com"));
    }

    #[test]
    fn second_registration_is_rejected_and_roster_keeps_one_copy() {
        let mut registry = registry();
        let lead = lead(&["*"]);
        register(&mut registry, "Cybersecurity", "new@slalom.com", Some(&lead), NOW).unwrap();

        let err = register(&mut registry, "Cybersecurity", "NEW@slalom.com", Some(&lead), NOW)
            .unwrap_err();
        assert!(matches!(err, CapabilityError::Validation { .. }));

        let count = roster(&registry, "Cybersecurity")
            .iter()
            .filter(|e| e.eq_ignore_ascii_case("new@slalom.com"))
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn anonymous_callers_are_forbidden_everywhere() {
        let mut registry = registry();
        let email = "alice.smith@slalom.com";

        for err in [
            register(&mut registry, "Cloud Architecture", email, None, NOW).unwrap_err(),
            unregister(&mut registry, "Cloud Architecture", email, None).unwrap_err(),
            approve(&mut registry, "Cloud Architecture", email, None, NOW).unwrap_err(),
            reject(&mut registry, "Cloud Architecture", email, None, NOW).unwrap_err(),
            list_pending(&registry, None).unwrap_err(),
        ] {
            assert!(matches!(err, CapabilityError::Forbidden { .. }), "{err}");
        }
    }

    #[test]
    fn validation_and_lookup_failures() {
        let mut registry = registry();
        let lead = lead(&["*"]);

        let empty = register(&mut registry, "Cybersecurity", "  ", Some(&lead), NOW).unwrap_err();
        assert!(matches!(empty, CapabilityError::Validation { .. }));

        let unknown = register(&mut registry, "Knitting", "a@slalom.com", Some(&lead), NOW);
        assert!(matches!(unknown, Err(CapabilityError::NotFound { .. })));

        let taken =
            register(&mut registry, "Cloud Architecture", "alice.smith@slalom.com", Some(&lead), NOW);
        assert_eq!(
            taken.unwrap_err().to_string(),
            format!("Validation error: {ALREADY_REGISTERED}")
        );
    }

    #[test]
    fn consultant_request_then_approval() {
        let mut registry = registry();
        let consultant = consultant();

        let outcome = register(
            &mut registry,
            "Cybersecurity",
            "consultant@slalom.com",
            Some(&consultant),
            NOW,
        )
        .unwrap();
        assert!(matches!(outcome, Registration::Requested(ref r) if r.requested_by == "consultant.user"));
        assert!(!registry.store.is_registered("Cybersecurity", "consultant@slalom.com"));

        let pending = list_pending(&registry, Some(&lead(&["Technology"]))).unwrap();
        assert_eq!(pending.len(), 1);

        let approved = approve(
            &mut registry,
            "Cybersecurity",
            "consultant@slalom.com",
            Some(&lead(&["*"])),
            NOW + 5,
        )
        .unwrap();
        assert_eq!(approved.status, RequestStatus::Approved);
        assert_eq!(approved.resolved_by.as_deref(), Some("practice.lead"));
        assert!(registry.store.is_registered("Cybersecurity", "consultant@slalom.com"));
        assert!(list_pending(&registry, Some(&lead(&["*"]))).unwrap().is_empty());
    }

    #[test]
    fn consultant_rules() {
        let mut registry = registry();
        let consultant = consultant();

        let other =
            register(&mut registry, "Cybersecurity", "someone@slalom.com", Some(&consultant), NOW);
        assert_eq!(other.unwrap_err().to_string(), format!("Forbidden: {SELF_ONLY}"));

        register(&mut registry, "Cybersecurity", "consultant@slalom.com", Some(&consultant), NOW)
            .unwrap();
        let again =
            register(&mut registry, "Cybersecurity", "Consultant@Slalom.com", Some(&consultant), NOW);
        assert_eq!(again.unwrap_err().to_string(), format!("Validation error: {ALREADY_PENDING}"));

        for err in [
            unregister(&mut registry, "Cloud Architecture", "alice.smith@slalom.com", Some(&consultant))
                .unwrap_err(),
            approve(&mut registry, "Cybersecurity", "consultant@slalom.com", Some(&consultant), NOW)
                .unwrap_err(),
            list_pending(&registry, Some(&consultant)).unwrap_err(),
        ] {
            assert_eq!(err.to_string(), format!("Forbidden: {LEAD_REQUIRED}"));
        }
        assert!(registry.store.is_registered("Cloud Architecture", "alice.smith@slalom.com"));
    }

    #[test]
    fn rejection_leaves_roster_and_allows_a_new_request() {
        let mut registry = registry();
        let consultant = consultant();
        let lead = lead(&["*"]);
        let before = roster(&registry, "Agile Coaching");

        register(&mut registry, "Agile Coaching", "consultant@slalom.com", Some(&consultant), NOW)
            .unwrap();
        let rejected =
            reject(&mut registry, "Agile Coaching", "consultant@slalom.com", Some(&lead), NOW)
                .unwrap();

        assert_eq!(rejected.status, RequestStatus::Rejected);
        assert_eq!(roster(&registry, "Agile Coaching"), before);
        assert!(
            register(&mut registry, "Agile Coaching", "consultant@slalom.com", Some(&consultant), NOW)
                .is_ok()
        );
    }

    #[test]
    fn approving_without_a_request_is_not_found() {
        let mut registry = registry();
        let err = approve(&mut registry, "Cybersecurity", "x@slalom.com", Some(&lead(&["*"])), NOW)
            .unwrap_err();
        assert_eq!(err.to_string(), format!("Not found: {REQUEST_NOT_FOUND}"));
    }

    #[test]
    fn practice_areas_scope_leads() {
        let mut registry = registry();
        let tech_lead = lead(&["Technology"]);

        let strategy =
            register(&mut registry, "Digital Strategy", "x@slalom.com", Some(&tech_lead), NOW);
        assert_eq!(strategy.unwrap_err().to_string(), format!("Forbidden: {AREA_FORBIDDEN}"));

        let removal = unregister(
            &mut registry,
            "Change Management",
            "ava.garcia@slalom.com",
            Some(&tech_lead),
        );
        assert!(matches!(removal, Err(CapabilityError::Forbidden { .. })));

        register(&mut registry, "Agile Coaching", "consultant@slalom.com", Some(&consultant()), NOW)
            .unwrap();
        assert!(list_pending(&registry, Some(&tech_lead)).unwrap().is_empty());
        assert_eq!(list_pending(&registry, Some(&lead(&["Operations"]))).unwrap().len(), 1);
    }

    #[test]
    fn unregistering_an_absent_email_is_not_found() {
        let mut registry = registry();
        let before = roster(&registry, "Cybersecurity");

        let err =
            unregister(&mut registry, "Cybersecurity", "ghost@slalom.com", Some(&lead(&["*"])))
                .unwrap_err();

        assert!(matches!(err, CapabilityError::NotFound { .. }));
        assert_eq!(roster(&registry, "Cybersecurity"), before);
    }

    #[test]
    fn direct_registration_settles_an_open_request() {
        let mut registry = registry();
        register(&mut registry, "Cybersecurity", "consultant@slalom.com", Some(&consultant()), NOW)
            .unwrap();
        register(&mut registry, "Cybersecurity", "consultant@slalom.com", Some(&lead(&["*"])), NOW)
            .unwrap();

        assert!(registry.requests.find_pending("Cybersecurity", "consultant@slalom.com").is_none());
        assert_eq!(registry.requests.history()[0].status, RequestStatus::Approved);
    }
}
