use caphub_domain::catalog::{Capability, RegistrationRequest, RequestStatus};
use serde_json::json;

#[test]
fn capability_defaults_optional_lists() {
    let raw = json!({
        "description": "Org change",
        "practice_area": "Operations",
        "capacity": 20
    });

    let cap: Capability = serde_json::from_value(raw).unwrap();
    assert!(cap.consultants.is_empty());
    assert!(cap.geographic_preferences.is_empty());
    assert_eq!(cap.capacity, 20);
}

#[test]
fn roster_lookup_ignores_case() {
    let raw = json!({
        "description": "d",
        "practice_area": "Technology",
        "capacity": 1,
        "consultants": ["alice.smith@slalom.com"]
    });
    let cap: Capability = serde_json::from_value(raw).unwrap();

    assert!(cap.has_consultant("Alice.Smith@slalom.com"));
    assert!(!cap.has_consultant("bob@slalom.com"));
}

#[test]
fn pending_request_serializes_without_resolution() {
    let request = RegistrationRequest {
        capability_name: "Cybersecurity".to_owned(),
        email: "consultant@slalom.com".to_owned(),
        requested_by: "consultant.user".to_owned(),
        created_at: 1_700_000_000,
        status: RequestStatus::Pending,
        resolved_by: None,
        resolved_at: None,
    };

    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["status"], "pending");
    assert!(value.get("resolved_by").is_none());
    assert!(request.is_pending());
    assert!(request.targets("Cybersecurity", "Consultant@Slalom.com"));
    assert!(!request.targets("Data Analytics", "consultant@slalom.com"));
}
