//! IPv4 CIDR values and prefix arithmetic.
//!
//! All allocator math runs on 32-bit big-endian integers. This module is the
//! boundary where `IpAddr` values are reduced to integers and reconstructed;
//! everything past it operates exclusively on `u32` addresses and `u64`
//! block sizes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use crate::error::{IpamError, Result};

/// Reduce an IP address to its 32-bit big-endian integer form.
///
/// IPv6 input is assumed to be an IPv4-mapped address; the trailing four
/// octets are used.
pub fn ip_to_u32(ip: IpAddr) -> u32 {
    match ip {
        IpAddr::V4(v4) => u32::from(v4),
        IpAddr::V6(v6) => {
            let octets = v6.octets();
            u32::from_be_bytes([octets[12], octets[13], octets[14], octets[15]])
        }
    }
}

/// Inverse of [`ip_to_u32`].
pub fn u32_to_ip(n: u32) -> Ipv4Addr {
    Ipv4Addr::from(n)
}

/// Number of addresses covered by a prefix length.
///
/// `/0` covers `2^32` addresses, which does not fit in a `u32`, so all size
/// arithmetic is done in `u64`. `prefix` must be at most 32.
pub fn size(prefix: u8) -> u64 {
    1u64 << (32 - u32::from(prefix))
}

/// An IPv4 CIDR block: base address plus prefix length.
///
/// Values built through [`Cidr::new`] or parsing are canonical, meaning the
/// host bits (the low `32 - prefix` bits) are cleared.
///
/// The derived ordering sorts by base address first and prefix length
/// second, so of two blocks with the same base the larger one sorts
/// earlier. The boundary builder relies on exactly this order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Cidr {
    base: Ipv4Addr,
    prefix: u8,
}

impl Cidr {
    /// Create a canonical CIDR block from a base address and prefix length.
    ///
    /// Host bits of `base` are cleared. Fails with `InvalidCidr` when
    /// `prefix` exceeds 32.
    pub fn new(base: Ipv4Addr, prefix: u8) -> Result<Self> {
        if prefix > 32 {
            return Err(IpamError::InvalidCidr(format!("{}/{}", base, prefix)));
        }

        let mask = (!0u64 << (32 - u32::from(prefix))) as u32;
        Ok(Cidr {
            base: u32_to_ip(u32::from(base) & mask),
            prefix,
        })
    }

    /// Build a CIDR without clearing host bits. `prefix` must be at most 32.
    pub(crate) fn from_parts(base: Ipv4Addr, prefix: u8) -> Self {
        Cidr { base, prefix }
    }

    /// Base address of the block.
    pub fn base(&self) -> Ipv4Addr {
        self.base
    }

    /// Prefix length of the block.
    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Number of addresses the block covers.
    pub fn size(&self) -> u64 {
        size(self.prefix)
    }

    /// Inclusive start and end addresses of the block, as integers.
    pub fn range(&self) -> (u32, u32) {
        let start = u32::from(self.base);
        let end = (u64::from(start) + self.size() - 1) as u32;
        (start, end)
    }

    /// Whether `ip` falls inside the block's inclusive range.
    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        let (start, end) = self.range();
        let n = u32::from(ip);
        start <= n && n <= end
    }

    /// The contiguous successor block at the same prefix length.
    ///
    /// Wraps modulo `2^32`: the block after `255.255.255.0/24` is
    /// `0.0.0.0/24`.
    pub fn next(&self) -> Cidr {
        Cidr {
            base: u32_to_ip(u32::from(self.base).wrapping_add(self.size() as u32)),
            prefix: self.prefix,
        }
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.prefix)
    }
}

impl FromStr for Cidr {
    type Err = IpamError;

    fn from_str(s: &str) -> Result<Self> {
        let (addr, prefix) = s
            .split_once('/')
            .ok_or_else(|| IpamError::InvalidCidr(s.to_string()))?;
        let base: Ipv4Addr = addr
            .parse()
            .map_err(|_| IpamError::InvalidCidr(s.to_string()))?;
        let prefix: u8 = prefix
            .parse()
            .map_err(|_| IpamError::InvalidCidr(s.to_string()))?;

        Cidr::new(base, prefix)
    }
}

impl TryFrom<String> for Cidr {
    type Error = IpamError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Cidr> for String {
    fn from(cidr: Cidr) -> String {
        cidr.to_string()
    }
}
