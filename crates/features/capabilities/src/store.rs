use crate::error::CapabilityError;
use caphub_kernel::domain::catalog::{Capability, CapabilityCatalog};

pub(crate) const CAPABILITY_NOT_FOUND: &str = "Capability not found";
pub(crate) const NOT_REGISTERED: &str = "Consultant is not registered for this capability";

/// The capability catalog with its rosters. Capabilities are never added or removed after
/// construction; only rosters change.
#[derive(Debug, Clone, Default)]
pub struct CapabilityStore {
    capabilities: CapabilityCatalog,
}

impl CapabilityStore {
    /// Takes ownership of a catalog, dropping roster duplicates that differ only in case.
    #[must_use]
    pub fn new(mut capabilities: CapabilityCatalog) -> Self {
        for capability in capabilities.values_mut() {
            dedup_ignore_case(&mut capability.consultants);
        }
        Self { capabilities }
    }

    /// Every capability, ordered by name.
    #[must_use]
    pub const fn list(&self) -> &CapabilityCatalog {
        &self.capabilities
    }

    pub fn get(&self, name: &str) -> Result<&Capability, CapabilityError> {
        self.capabilities.get(name).ok_or_else(|| CapabilityError::not_found(CAPABILITY_NOT_FOUND))
    }

    /// Adds `email` to the roster unless already present. Returns whether it was inserted.
    pub fn add_consultant(&mut self, name: &str, email: &str) -> Result<bool, CapabilityError> {
        let capability = self.get_mut(name)?;
        if capability.has_consultant(email) {
            return Ok(false);
        }
        capability.consultants.push(email.to_owned());
        Ok(true)
    }

    pub fn remove_consultant(&mut self, name: &str, email: &str) -> Result<(), CapabilityError> {
        let capability = self.get_mut(name)?;
        let position = capability
            .consultants
            .iter()
            .position(|c| c.eq_ignore_ascii_case(email))
            .ok_or_else(|| CapabilityError::not_found(NOT_REGISTERED))?;

        capability.consultants.remove(position);
        Ok(())
    }

    #[must_use]
    pub fn is_registered(&self, name: &str, email: &str) -> bool {
        self.capabilities.get(name).is_some_and(|c| c.has_consultant(email))
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Capability, CapabilityError> {
        self.capabilities
            .get_mut(name)
            .ok_or_else(|| CapabilityError::not_found(CAPABILITY_NOT_FOUND))
    }
}

fn dedup_ignore_case(emails: &mut Vec<String>) {
    let mut seen: Vec<String> = Vec::with_capacity(emails.len());
    emails.retain(|email| {
        let key = email.to_ascii_lowercase();
        if seen.contains(&key) {
            false
        } else {
            seen.push(key);
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn store() -> CapabilityStore {
        let mut catalog = CapabilityCatalog::new();
        catalog.insert(
            "Cybersecurity".to_owned(),
            Capability {
                description: "Security strategy".to_owned(),
                practice_area: "Technology".to_owned(),
                skill_levels: Vec::new(),
                certifications: vec!["CISSP".to_owned()],
                industry_verticals: Vec::new(),
                capacity: 25,
                consultants: vec!["ella.clark@slalom.com".to_owned()],
                geographic_preferences: Vec::new(),
            },
        );
        CapabilityStore::new(catalog)
    }

    #[test]
    fn add_is_idempotent_ignoring_case() {
        let mut store = store();
        assert!(store.add_consultant("Cybersecurity", "new@slalom.com").unwrap());
        assert!(!store.add_consultant("Cybersecurity", "NEW@slalom.com").unwrap());

        let roster = &store.get("Cybersecurity").unwrap().consultants;
        assert_eq!(roster, &["ella.clark@slalom.com", "new@slalom.com"]);
    }

    #[test]
    fn unknown_capability_is_not_found() {
        let mut store = store();
        assert!(matches!(store.get("Basket Weaving"), Err(CapabilityError::NotFound { .. })));
        assert!(matches!(
            store.add_consultant("Basket Weaving", "a@b.c"),
            Err(CapabilityError::NotFound { .. })
        ));
        assert!(!store.is_registered("Basket Weaving", "a@b.c"));
    }

    #[test]
    fn removing_an_absent_email_leaves_the_roster_alone() {
        let mut store = store();
        let err = store.remove_consultant("Cybersecurity", "ghost@slalom.com").unwrap_err();

        assert_eq!(err.to_string(), format!("Not found: {NOT_REGISTERED}"));
        assert_eq!(store.get("Cybersecurity").unwrap().consultants.len(), 1);
    }

    #[test]
    fn remove_matches_ignoring_case() {
        let mut store = store();
        store.remove_consultant("Cybersecurity", "Ella.Clark@Slalom.com").unwrap();
        assert!(!store.is_registered("Cybersecurity", "ella.clark@slalom.com"));
    }

    #[test]
    fn seed_duplicates_are_collapsed() {
        let mut catalog = store().list().clone();
        if let Some(capability) = catalog.get_mut("Cybersecurity") {
            capability.consultants.push("ELLA.CLARK@slalom.com".to_owned());
        }
        let store = CapabilityStore::new(catalog);
        assert_eq!(store.get("Cybersecurity").unwrap().consultants.len(), 1);
    }

    proptest! {
        #[test]
        fn roster_never_holds_duplicates(
            ops in prop::collection::vec((any::<bool>(), "[a-cA-C]{1,2}@x\\.io"), 0..40)
        ) {
            let mut store = store();
            for (add, email) in ops {
                if add {
                    store.add_consultant("Cybersecurity", &email).unwrap();
                } else {
                    let _ = store.remove_consultant("Cybersecurity", &email);
                }
            }

            let roster = &store.get("Cybersecurity").unwrap().consultants;
            let mut lowered: Vec<_> = roster.iter().map(|e| e.to_ascii_lowercase()).collect();
            lowered.sort();
            lowered.dedup();
            prop_assert_eq!(lowered.len(), roster.len());
        }

        #[test]
        fn added_email_is_registered_until_removed(email in "[a-z]{1,8}@[a-z]{1,5}\\.com") {
            let mut store = store();
            store.add_consultant("Cybersecurity", &email).unwrap();
            prop_assert!(store.is_registered("Cybersecurity", &email.to_uppercase()));

            store.remove_consultant("Cybersecurity", &email).unwrap();
            prop_assert!(!store.is_registered("Cybersecurity", &email));
        }
    }
}
