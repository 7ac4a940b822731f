//! # ipam-rs - First-Fit IPv4 Subnet Allocator
//!
//! `ipam-rs` hands out free subnets of a parent IPv4 network. Given the set
//! of subnets already in use, it returns the next free block of a requested
//! prefix length, or a typed failure when nothing fits:
//!
//! - **First-fit policy**: the numerically earliest gap with enough room
//!   wins; no fairness, reservations, or hints
//! - **Order-independent input**: the in-use set may arrive in any order
//!   and with duplicates; ordering is imposed internally
//! - **Pluggable persistence**: allocations are recorded through a small
//!   key/value [`Storage`] contract so later requests observe earlier ones
//! - **Typed failures**: exhaustion, oversized requests, and internal
//!   invariant violations are distinct [`IpamError`] variants
//!
//! ## Quick Start
//!
//! ```rust
//! use ipam_rs::{Config, Service};
//!
//! # fn main() -> ipam_rs::Result<()> {
//! let service = Service::new(Config::in_memory("10.4.0.0/16".parse()?))?;
//!
//! let first = service.allocate(24)?;
//! assert_eq!(first.to_string(), "10.4.0.0/24");
//!
//! let second = service.allocate(24)?;
//! assert_eq!(second.to_string(), "10.4.1.0/24");
//!
//! // Released subnets become available again.
//! service.release(&first)?;
//! assert_eq!(service.allocate(24)?, first);
//! # Ok(())
//! # }
//! ```
//!
//! The allocator core is pure and usable without a service when the caller
//! already holds the in-use set:
//!
//! ```rust
//! use ipam_rs::next_free;
//!
//! # fn main() -> ipam_rs::Result<()> {
//! let parent = "10.4.0.0/16".parse()?;
//! let in_use = vec!["10.4.1.0/24".parse()?];
//!
//! // The gap before 10.4.1.0/24 fits a /24.
//! let subnet = next_free(&parent, 24, &in_use)?;
//! assert_eq!(subnet.to_string(), "10.4.0.0/24");
//! # Ok(())
//! # }
//! ```

pub mod allocator;
pub mod cidr;
pub mod error;
pub mod service;
pub mod storage;

pub use allocator::{boundaries, free_ranges, next_free, place, FreeRange};
pub use cidr::{ip_to_u32, size, u32_to_ip, Cidr};
pub use error::{IpamError, Result};
pub use service::{subnet_key, Config, Service, SUBNET_KEY_PREFIX};
pub use storage::{MemoryStorage, Storage};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
