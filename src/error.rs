use std::net::Ipv4Addr;
use thiserror::Error;

use crate::cidr::Cidr;

#[derive(Error, Debug)]
pub enum IpamError {
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),

    #[error("invalid CIDR: {0}")]
    InvalidCidr(String),

    #[error("mask too big: /{requested} covers more addresses than parent /{parent}")]
    MaskTooBig { requested: u8, parent: u8 },

    #[error("space exhausted: no free range of {0} addresses remains")]
    SpaceExhausted(u64),

    #[error("incorrect number of boundaries: {0}")]
    IncorrectNumberOfBoundaries(usize),

    #[error("incorrect number of free ranges: expected {expected}, computed {computed}")]
    IncorrectNumberOfFreeRanges { expected: usize, computed: usize },

    #[error("ip {ip} not contained in {network}")]
    IpNotContained { ip: Ipv4Addr, network: Cidr },

    #[error("mask incorrect size: requested /{expected}, produced /{produced}")]
    MaskIncorrectSize { expected: u8, produced: u8 },

    #[error("not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, IpamError>;
