use crate::error::{CapabilityError, CapabilityErrorExt};
use caphub_kernel::domain::catalog::CapabilityCatalog;
use std::path::Path;
use tracing::info;

/// The catalog shipped with the binary.
pub const EMBEDDED_CATALOG: &str = include_str!("../seed/capabilities.json");

/// Loads the starting catalog: `path` when given, the embedded catalog otherwise.
pub fn load_catalog(path: Option<&Path>) -> Result<CapabilityCatalog, CapabilityError> {
    let Some(path) = path else {
        return parse_catalog(EMBEDDED_CATALOG).context("Embedded catalog");
    };

    let raw = std::fs::read_to_string(path)
        .context(format!("Reading capability catalog from {}", path.display()))?;
    let catalog = parse_catalog(&raw).context(format!("Parsing {}", path.display()))?;

    info!(path = %path.display(), capabilities = catalog.len(), "Loaded capability catalog");
    Ok(catalog)
}

/// Parses a JSON object of capability name to capability.
pub fn parse_catalog(raw: &str) -> Result<CapabilityCatalog, CapabilityError> {
    let catalog: CapabilityCatalog = serde_json::from_str(raw)?;

    if let Some(name) = catalog.keys().find(|name| name.trim().is_empty()) {
        return Err(CapabilityError::validation(format!("Capability name {name:?} is blank")));
    }

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_has_the_nine_capabilities() {
        let catalog = load_catalog(None).unwrap();
        assert_eq!(catalog.len(), 9);

        let cloud = &catalog["Cloud Architecture"];
        assert_eq!(cloud.practice_area, "Technology");
        assert_eq!(cloud.capacity, 40);
        assert_eq!(cloud.consultants, ["alice.smith@slalom.com", "bob.johnson@slalom.com"]);
        assert_eq!(catalog["Change Management"].practice_area, "Operations");
        assert!(catalog.contains_key("UX/UI Design"));
    }

    #[test]
    fn file_overrides_the_embedded_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{"Pricing": {"description": "Pricing strategy", "practice_area": "Strategy", "capacity": 10}}"#,
        )
        .unwrap();

        let catalog = load_catalog(Some(&path)).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog["Pricing"].consultants.is_empty());
    }

    #[test]
    fn broken_catalog_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "[]").unwrap();

        assert!(matches!(load_catalog(Some(&path)), Err(CapabilityError::Json { .. })));
        assert!(matches!(
            load_catalog(Some(&dir.path().join("absent.json"))),
            Err(CapabilityError::Io { .. })
        ));
    }

    #[test]
    fn blank_names_are_rejected() {
        let raw = r#"{" ": {"description": "d", "practice_area": "p", "capacity": 1}}"#;
        assert!(matches!(parse_catalog(raw), Err(CapabilityError::Validation { .. })));
    }
}
