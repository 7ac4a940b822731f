//! First-fit subnet placement.
//!
//! Turns a parent network plus the set of subnets already in use into the
//! next free subnet of a requested prefix length. The pipeline has three
//! stages: boundary construction, free-range extraction, and a first-fit
//! scan. Each stage is pure; ordering of the in-use set is imposed here and
//! never assumed from the caller.

use crate::cidr::{size, u32_to_ip, Cidr};
use crate::error::{IpamError, Result};

/// A contiguous span of unallocated addresses.
///
/// The first range produced for a parent opens at the parent's own start
/// address, which is free. Every later range opens at the end address of an
/// in-use block, which is occupied; [`place`] compensates for that
/// asymmetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeRange {
    pub start: u32,
    pub end: u32,
}

/// Sort in-use networks into allocation order and collapse duplicates.
///
/// Ascending by base address; equal bases put the larger block first. The
/// allocator should never see equal bases, but the sort must be total.
fn sort_networks(existing: &[Cidr]) -> Vec<Cidr> {
    let mut sorted = existing.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted
}

/// Boundary endpoints delimiting the free regions inside `parent`.
///
/// Emits `[start(P), start(e1), end(e1), ..., start(ek), end(ek), end(P)]`
/// with the in-use blocks in ascending order. Adjacent or overlapping
/// blocks are not merged; callers guarantee the in-use set does not
/// overlap.
pub fn boundaries(parent: &Cidr, existing: &[Cidr]) -> Result<Vec<u32>> {
    let (parent_start, parent_end) = parent.range();

    let mut bounds = Vec::with_capacity(2 * existing.len() + 2);
    bounds.push(parent_start);
    for network in sort_networks(existing) {
        let (start, end) = network.range();
        bounds.push(start);
        bounds.push(end);
    }
    bounds.push(parent_end);

    if bounds.len() % 2 != 0 {
        return Err(IpamError::IncorrectNumberOfBoundaries(bounds.len()));
    }

    Ok(bounds)
}

/// Pair adjacent boundaries into free ranges.
pub fn free_ranges(bounds: &[u32]) -> Result<Vec<FreeRange>> {
    if bounds.len() % 2 != 0 {
        return Err(IpamError::IncorrectNumberOfBoundaries(bounds.len()));
    }

    let ranges: Vec<FreeRange> = bounds
        .chunks_exact(2)
        .map(|pair| FreeRange {
            start: pair[0],
            end: pair[1],
        })
        .collect();

    if ranges.len() != bounds.len() / 2 {
        return Err(IpamError::IncorrectNumberOfFreeRanges {
            expected: bounds.len() / 2,
            computed: ranges.len(),
        });
    }

    Ok(ranges)
}

/// First-fit scan over `ranges` for a block of `prefix` length.
///
/// Returns the base address of the placed block, or `SpaceExhausted` when
/// no range has the capacity.
pub fn place(ranges: &[FreeRange], prefix: u8) -> Result<u32> {
    let wanted = size(prefix);

    for (index, range) in ranges.iter().enumerate() {
        let capacity = u64::from(range.end) - u64::from(range.start) + 1;
        if capacity < wanted {
            continue;
        }

        // The first range starts on the parent's own start address, which
        // is free. Every later range starts on the end address of an
        // in-use block, so the placed base steps past it.
        let base = if index == 0 {
            range.start
        } else {
            range.start + 1
        };

        return Ok(base);
    }

    Err(IpamError::SpaceExhausted(wanted))
}

/// Return the next free subnet of `prefix` length inside `parent`.
///
/// `existing` may arrive in any order and may contain duplicates; its
/// blocks must lie inside `parent` and must not overlap each other.
/// Placement is strictly first-fit in ascending address order.
pub fn next_free(parent: &Cidr, prefix: u8, existing: &[Cidr]) -> Result<Cidr> {
    if prefix > 32 {
        return Err(IpamError::InvalidCidr(format!("/{}", prefix)));
    }
    if size(prefix) > parent.size() {
        return Err(IpamError::MaskTooBig {
            requested: prefix,
            parent: parent.prefix(),
        });
    }

    let bounds = boundaries(parent, existing)?;
    let ranges = free_ranges(&bounds)?;
    let base = place(&ranges, prefix)?;

    let network = Cidr::from_parts(u32_to_ip(base), prefix);

    // Placement bugs surface here as typed errors rather than as corrupt
    // allocations handed to the caller.
    if !parent.contains(network.base()) {
        return Err(IpamError::IpNotContained {
            ip: network.base(),
            network: *parent,
        });
    }
    if network.prefix() != prefix {
        return Err(IpamError::MaskIncorrectSize {
            expected: prefix,
            produced: network.prefix(),
        });
    }

    Ok(network)
}
