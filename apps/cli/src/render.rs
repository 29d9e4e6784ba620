//! Plain-text views written to any [`Write`] sink.

use crate::error::ClientError;
use caphub::domain::catalog::{Capability, CapabilityCatalog, RegistrationRequest};
use caphub::domain::identity::UserProfile;
use std::io::{self, Write};

pub const NETWORK_FAILURE: &str = "Could not reach the Capabilities Hub. Please try again.";

pub fn user(out: &mut impl Write, user: Option<&UserProfile>) -> io::Result<()> {
    let Some(user) = user else {
        return writeln!(out, "Not logged in. Run `caphub login <username>` to sign in.");
    };

    let name = user.name.as_deref().unwrap_or(&user.username);
    writeln!(out, "Logged in as {name} <{}> ({})", user.email, user.role)?;
    if user.is_practice_lead() && !user.practice_areas.is_empty() {
        writeln!(out, "Practice areas: {}", user.practice_areas.join(", "))?;
    }
    Ok(())
}

/// One card per capability. Practice leads also get the command that removes a consultant.
pub fn catalog(
    out: &mut impl Write,
    catalog: &CapabilityCatalog,
    viewer: Option<&UserProfile>,
) -> io::Result<()> {
    if catalog.is_empty() {
        return writeln!(out, "No capabilities available.");
    }

    let show_remove = viewer.is_some_and(UserProfile::is_practice_lead);
    for (index, (name, capability)) in catalog.iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        card(out, name, capability, show_remove)?;
    }
    Ok(())
}

fn card(
    out: &mut impl Write,
    name: &str,
    capability: &Capability,
    show_remove: bool,
) -> io::Result<()> {
    writeln!(out, "{name} [{}]", capability.practice_area)?;
    writeln!(out, "  {}", capability.description)?;
    writeln!(out, "  Capacity: {} hours/week", capability.capacity)?;
    list_line(out, "Skill levels", &capability.skill_levels)?;
    list_line(out, "Certifications", &capability.certifications)?;
    list_line(out, "Industry verticals", &capability.industry_verticals)?;
    list_line(out, "Locations", &capability.geographic_preferences)?;

    if capability.consultants.is_empty() {
        return writeln!(out, "  Consultants: none yet");
    }

    writeln!(out, "  Consultants ({}):", capability.consultants.len())?;
    for email in &capability.consultants {
        if show_remove {
            writeln!(out, "    - {email}  (remove: caphub unregister {name:?} {email})")?;
        } else {
            writeln!(out, "    - {email}")?;
        }
    }
    Ok(())
}

fn list_line(out: &mut impl Write, label: &str, values: &[String]) -> io::Result<()> {
    if values.is_empty() {
        return Ok(());
    }
    writeln!(out, "  {label}: {}", values.join(", "))
}

pub fn requests(out: &mut impl Write, requests: &[RegistrationRequest]) -> io::Result<()> {
    if requests.is_empty() {
        return writeln!(out, "No pending registration requests.");
    }

    writeln!(out, "Pending registration requests ({}):", requests.len())?;
    for request in requests {
        writeln!(
            out,
            "  - {} -> {} (requested by {})",
            request.email, request.capability_name, request.requested_by
        )?;
    }
    Ok(())
}

/// The one-line banner shown when a command fails.
#[must_use]
pub fn banner(error: &ClientError) -> String {
    match error {
        ClientError::Network { .. } => format!("Error: {NETWORK_FAILURE}"),
        other => format!("Error: {other}"),
    }
}
