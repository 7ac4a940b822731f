//! Subnet allocation service.
//!
//! Thin orchestration over a [`Storage`] backend: load the in-use set, run
//! the allocator, persist the result. The list/compute/store sequence is
//! not atomic; two services racing against the same storage can hand out
//! the same subnet. Serialization belongs to the storage layer or to a
//! mutex around the service.

use std::sync::Arc;
use tracing::{debug, info};

use crate::allocator;
use crate::cidr::Cidr;
use crate::error::{IpamError, Result};
use crate::storage::{MemoryStorage, Storage};

/// Storage key prefix under which allocated subnets live.
pub const SUBNET_KEY_PREFIX: &str = "/ipam/subnet";

/// Storage key for a subnet.
///
/// The slash inside the CIDR is replaced with `-` so the key's own slashes
/// keep their path meaning for prefix listing:
/// `subnet_key(10.4.0.0/16)` is `/ipam/subnet/10.4.0.0-16`.
pub fn subnet_key(network: &Cidr) -> String {
    format!(
        "{}/{}",
        SUBNET_KEY_PREFIX,
        network.to_string().replace('/', "-")
    )
}

/// Configuration for [`Service::new`].
///
/// Both fields are required; construction fails with `InvalidConfig` when
/// either is missing.
pub struct Config {
    /// Backend the service persists allocations to.
    pub storage: Option<Arc<dyn Storage>>,

    /// Parent network all returned subnets must lie in.
    pub network: Option<Cidr>,
}

impl Config {
    /// Configuration backed by a fresh [`MemoryStorage`].
    pub fn in_memory(network: Cidr) -> Self {
        Config {
            storage: Some(Arc::new(MemoryStorage::new())),
            network: Some(network),
        }
    }
}

/// Hands out subnets of a parent network and records them in storage, so
/// later requests observe earlier allocations. Released subnets become
/// available again.
pub struct Service {
    storage: Arc<dyn Storage>,
    network: Cidr,
}

impl std::fmt::Debug for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("network", &self.network)
            .finish_non_exhaustive()
    }
}

impl Service {
    /// Create a service from `config`.
    pub fn new(config: Config) -> Result<Self> {
        let storage = config
            .storage
            .ok_or(IpamError::InvalidConfig("storage must not be empty"))?;
        let network = config
            .network
            .ok_or(IpamError::InvalidConfig("network must not be empty"))?;

        Ok(Service { storage, network })
    }

    /// Allocate the next free subnet of `prefix` length.
    pub fn allocate(&self, prefix: u8) -> Result<Cidr> {
        let existing = self.list_subnets()?;

        debug!(
            "computing next free /{} subnet in {} ({} in use)",
            prefix,
            self.network,
            existing.len()
        );
        let subnet = allocator::next_free(&self.network, prefix, &existing)?;

        self.storage
            .put(&subnet_key(&subnet), &subnet.to_string())?;
        info!("allocated subnet {}", subnet);

        Ok(subnet)
    }

    /// Release a previously allocated subnet so it can be handed out again.
    ///
    /// Releasing a subnet that was never allocated (or was already
    /// released) is a no-op.
    pub fn release(&self, network: &Cidr) -> Result<()> {
        info!("releasing subnet {}", network);
        self.storage.delete(&subnet_key(network))
    }

    /// The in-use set as recorded in storage.
    ///
    /// A `NotFound` from the list call means nothing has been allocated
    /// yet; any other storage failure propagates verbatim.
    fn list_subnets(&self) -> Result<Vec<Cidr>> {
        debug!("listing subnets under {}", SUBNET_KEY_PREFIX);

        let suffixes = match self.storage.list(SUBNET_KEY_PREFIX) {
            Ok(suffixes) => suffixes,
            Err(IpamError::NotFound(_)) => Vec::new(),
            Err(err) => return Err(err),
        };

        // Keys were stored with the CIDR slash flattened to a dash;
        // restore it before parsing.
        suffixes
            .iter()
            .map(|suffix| suffix.replace('-', "/").parse())
            .collect()
    }
}
