use caphub_kernel::domain::catalog::{RegistrationRequest, RequestStatus};

/// Every registration request ever submitted, in submission order.
///
/// Resolved requests keep their final status; at most one request per
/// (capability, email) pair is pending at any time.
#[derive(Debug, Clone, Default)]
pub struct RequestLedger {
    requests: Vec<RegistrationRequest>,
}

impl RequestLedger {
    #[must_use]
    pub fn find_pending(&self, capability: &str, email: &str) -> Option<&RegistrationRequest> {
        self.requests.iter().find(|r| r.is_pending() && r.targets(capability, email))
    }

    /// Records a new pending request and returns a copy of it.
    ///
    /// Callers check [`RequestLedger::find_pending`] first.
    pub fn submit(
        &mut self,
        capability: &str,
        email: &str,
        requested_by: &str,
        now: i64,
    ) -> RegistrationRequest {
        let request = RegistrationRequest {
            capability_name: capability.to_owned(),
            email: email.to_owned(),
            requested_by: requested_by.to_owned(),
            created_at: now,
            status: RequestStatus::Pending,
            resolved_by: None,
            resolved_at: None,
        };
        self.requests.push(request.clone());
        request
    }

    /// Moves the pending request for the pair to `status`. Returns the resolved request,
    /// or `None` when nothing was pending.
    pub fn resolve(
        &mut self,
        capability: &str,
        email: &str,
        status: RequestStatus,
        resolved_by: &str,
        now: i64,
    ) -> Option<RegistrationRequest> {
        let request =
            self.requests.iter_mut().find(|r| r.is_pending() && r.targets(capability, email))?;

        request.status = status;
        request.resolved_by = Some(resolved_by.to_owned());
        request.resolved_at = Some(now);
        Some(request.clone())
    }

    pub fn pending(&self) -> impl Iterator<Item = &RegistrationRequest> {
        self.requests.iter().filter(|r| r.is_pending())
    }

    /// All requests including resolved ones.
    #[cfg(test)]
    pub(crate) fn history(&self) -> &[RegistrationRequest] {
        &self.requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolving_keeps_the_record() {
        let mut ledger = RequestLedger::default();
        ledger.submit("Cybersecurity", "c@slalom.com", "consultant.user", 10);

        let resolved = ledger
            .resolve("Cybersecurity", "C@Slalom.com", RequestStatus::Rejected, "practice.lead", 20)
            .unwrap();

        assert_eq!(resolved.status, RequestStatus::Rejected);
        assert_eq!(resolved.resolved_at, Some(20));
        assert_eq!(ledger.pending().count(), 0);
        assert_eq!(ledger.history().len(), 1);
        assert!(ledger.find_pending("Cybersecurity", "c@slalom.com").is_none());
    }

    #[test]
    fn nothing_pending_resolves_to_none() {
        let mut ledger = RequestLedger::default();
        assert!(
            ledger.resolve("Cybersecurity", "c@slalom.com", RequestStatus::Approved, "lead", 1).is_none()
        );
    }

    #[test]
    fn a_new_request_may_follow_a_rejection() {
        let mut ledger = RequestLedger::default();
        ledger.submit("Cybersecurity", "c@slalom.com", "consultant.user", 1);
        ledger.resolve("Cybersecurity", "c@slalom.com", RequestStatus::Rejected, "lead", 2);
        ledger.submit("Cybersecurity", "c@slalom.com", "consultant.user", 3);

        assert_eq!(ledger.find_pending("Cybersecurity", "c@slalom.com").unwrap().created_at, 3);
        assert_eq!(ledger.history().len(), 2);
    }
}
