//! Capabilities feature slice.
//!
//! Owns the capability catalog, the consultant rosters and the queue of registration
//! requests, all in memory behind one lock. State starts from the seed catalog on every
//! process start.

mod error;
mod requests;
mod seed;
#[cfg(feature = "server")]
pub mod server;
mod store;
pub mod workflow;

pub use crate::error::{CapabilityError, CapabilityErrorExt};
pub use crate::requests::RequestLedger;
pub use crate::seed::{EMBEDDED_CATALOG, load_catalog, parse_catalog};
pub use crate::store::CapabilityStore;
pub use crate::workflow::{CapabilityRegistry, Registration};

use caphub_kernel::domain::catalog::{Capability, CapabilityCatalog, RegistrationRequest};
use caphub_kernel::domain::config::ApiConfig;
use caphub_kernel::domain::identity::UserProfile;
use caphub_kernel::domain::registry::InitializedSlice;
use parking_lot::RwLock;
use tracing::info;

/// Capabilities feature state
#[caphub_derive::caphub_slice]
pub struct Capabilities {
    registry: RwLock<CapabilityRegistry>,
}

impl Capabilities {
    #[must_use]
    pub fn from_catalog(catalog: CapabilityCatalog) -> Self {
        let registry = CapabilityRegistry::new(CapabilityStore::new(catalog));
        Self::new(CapabilitiesInner { registry: RwLock::new(registry) })
    }
}

impl CapabilitiesInner {
    /// Snapshot of every capability with its current roster.
    #[must_use]
    pub fn list(&self) -> CapabilityCatalog {
        self.registry.read().store.list().clone()
    }

    pub fn get(&self, name: &str) -> Result<Capability, CapabilityError> {
        self.registry.read().store.get(name).cloned()
    }

    pub fn register(
        &self,
        capability: &str,
        email: &str,
        actor: Option<&UserProfile>,
    ) -> Result<Registration, CapabilityError> {
        workflow::register(&mut self.registry.write(), capability, email, actor, now())
    }

    pub fn unregister(
        &self,
        capability: &str,
        email: &str,
        actor: Option<&UserProfile>,
    ) -> Result<(), CapabilityError> {
        workflow::unregister(&mut self.registry.write(), capability, email, actor)
    }

    pub fn approve(
        &self,
        capability: &str,
        email: &str,
        actor: Option<&UserProfile>,
    ) -> Result<RegistrationRequest, CapabilityError> {
        workflow::approve(&mut self.registry.write(), capability, email, actor, now())
    }

    pub fn reject(
        &self,
        capability: &str,
        email: &str,
        actor: Option<&UserProfile>,
    ) -> Result<RegistrationRequest, CapabilityError> {
        workflow::reject(&mut self.registry.write(), capability, email, actor, now())
    }

    pub fn pending_requests(
        &self,
        actor: Option<&UserProfile>,
    ) -> Result<Vec<RegistrationRequest>, CapabilityError> {
        workflow::list_pending(&self.registry.read(), actor)
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Initialize the capabilities feature from `[catalog]`.
pub fn init(config: &ApiConfig) -> Result<InitializedSlice, CapabilityError> {
    let catalog = load_catalog(config.catalog.seed_file.as_deref())?;

    info!(capabilities = catalog.len(), "Capabilities slice initialized");

    Ok(InitializedSlice::new(Capabilities::from_catalog(catalog)))
}
