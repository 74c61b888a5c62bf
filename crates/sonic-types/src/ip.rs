//! IP address and prefix types used for route keys and ACL match fields.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Address family of an address or prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IpFamily {
    V4,
    V6,
}

impl IpFamily {
    /// Width of an address of this family in bits.
    pub const fn bits(&self) -> u8 {
        match self {
            IpFamily::V4 => 32,
            IpFamily::V6 => 128,
        }
    }
}

impl fmt::Display for IpFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpFamily::V4 => write!(f, "IPv4"),
            IpFamily::V6 => write!(f, "IPv6"),
        }
    }
}

/// An IPv4 address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ipv4Address(Ipv4Addr);

impl Ipv4Address {
    pub const UNSPECIFIED: Self = Ipv4Address(Ipv4Addr::UNSPECIFIED);

    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        Ipv4Address(Ipv4Addr::new(a, b, c, d))
    }

    pub const fn from_bits(bits: u32) -> Self {
        let o = bits.to_be_bytes();
        Ipv4Address(Ipv4Addr::new(o[0], o[1], o[2], o[3]))
    }

    pub const fn to_bits(&self) -> u32 {
        u32::from_be_bytes(self.0.octets())
    }

    pub const fn octets(&self) -> [u8; 4] {
        self.0.octets()
    }
}

impl fmt::Display for Ipv4Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Ipv4Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Ipv4Addr>()
            .map(Ipv4Address)
            .map_err(|_| ParseError::InvalidIpAddress(s.to_string()))
    }
}

impl From<Ipv4Addr> for Ipv4Address {
    fn from(addr: Ipv4Addr) -> Self {
        Ipv4Address(addr)
    }
}

/// An IPv6 address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ipv6Address(Ipv6Addr);

impl Ipv6Address {
    pub const UNSPECIFIED: Self = Ipv6Address(Ipv6Addr::UNSPECIFIED);

    pub const fn from_bits(bits: u128) -> Self {
        let s = bits.to_be_bytes();
        let mut segments = [0u16; 8];
        let mut i = 0;
        while i < 8 {
            segments[i] = u16::from_be_bytes([s[2 * i], s[2 * i + 1]]);
            i += 1;
        }
        Ipv6Address(Ipv6Addr::new(
            segments[0],
            segments[1],
            segments[2],
            segments[3],
            segments[4],
            segments[5],
            segments[6],
            segments[7],
        ))
    }

    pub const fn to_bits(&self) -> u128 {
        u128::from_be_bytes(self.0.octets())
    }

    pub const fn segments(&self) -> [u16; 8] {
        self.0.segments()
    }
}

impl fmt::Display for Ipv6Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Ipv6Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Ipv6Addr>()
            .map(Ipv6Address)
            .map_err(|_| ParseError::InvalidIpAddress(s.to_string()))
    }
}

impl From<Ipv6Addr> for Ipv6Address {
    fn from(addr: Ipv6Addr) -> Self {
        Ipv6Address(addr)
    }
}

/// An IP address that can be either IPv4 or IPv6.
///
/// Addresses order by family first (every IPv4 address sorts before any
/// IPv6 address), then numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IpAddress {
    V4(Ipv4Address),
    V6(Ipv6Address),
}

impl IpAddress {
    pub const fn family(&self) -> IpFamily {
        match self {
            IpAddress::V4(_) => IpFamily::V4,
            IpAddress::V6(_) => IpFamily::V6,
        }
    }

    pub const fn is_ipv4(&self) -> bool {
        matches!(self, IpAddress::V4(_))
    }

    pub const fn is_ipv6(&self) -> bool {
        matches!(self, IpAddress::V6(_))
    }

    /// Numeric value of the address, zero-extended for IPv4.
    pub const fn to_bits(&self) -> u128 {
        match self {
            IpAddress::V4(addr) => addr.to_bits() as u128,
            IpAddress::V6(addr) => addr.to_bits(),
        }
    }

    /// Builds an address of `family` from its numeric value.
    ///
    /// For IPv4 only the low 32 bits are used.
    pub const fn from_bits(family: IpFamily, bits: u128) -> Self {
        match family {
            IpFamily::V4 => IpAddress::V4(Ipv4Address::from_bits(bits as u32)),
            IpFamily::V6 => IpAddress::V6(Ipv6Address::from_bits(bits)),
        }
    }

    /// The all-zero address of `family`.
    pub const fn unspecified(family: IpFamily) -> Self {
        match family {
            IpFamily::V4 => IpAddress::V4(Ipv4Address::UNSPECIFIED),
            IpFamily::V6 => IpAddress::V6(Ipv6Address::UNSPECIFIED),
        }
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpAddress::V4(addr) => addr.fmt(f),
            IpAddress::V6(addr) => addr.fmt(f),
        }
    }
}

impl FromStr for IpAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(':') {
            s.parse::<Ipv6Address>().map(IpAddress::V6)
        } else {
            s.parse::<Ipv4Address>().map(IpAddress::V4)
        }
    }
}

impl From<Ipv4Address> for IpAddress {
    fn from(addr: Ipv4Address) -> Self {
        IpAddress::V4(addr)
    }
}

impl From<Ipv6Address> for IpAddress {
    fn from(addr: Ipv6Address) -> Self {
        IpAddress::V6(addr)
    }
}

impl From<Ipv4Addr> for IpAddress {
    fn from(addr: Ipv4Addr) -> Self {
        IpAddress::V4(Ipv4Address(addr))
    }
}

impl From<Ipv6Addr> for IpAddress {
    fn from(addr: Ipv6Addr) -> Self {
        IpAddress::V6(Ipv6Address(addr))
    }
}

/// An IP prefix in CIDR notation (e.g., 10.0.0.0/24 or 2001:db8::/32).
///
/// A prefix may carry host bits (`10.1.2.3/8`); [`IpPrefix::is_canonical`]
/// reports whether it does and [`IpPrefix::network`] strips them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IpPrefix {
    address: IpAddress,
    prefix_len: u8,
}

impl IpPrefix {
    /// Creates a new IP prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix length is longer than the address.
    pub fn new(address: IpAddress, prefix_len: u8) -> Result<Self, ParseError> {
        let max_len = address.family().bits();
        if prefix_len > max_len {
            return Err(ParseError::InvalidIpPrefix(format!(
                "{}/{}: prefix length exceeds {}",
                address, prefix_len, max_len
            )));
        }

        Ok(IpPrefix {
            address,
            prefix_len,
        })
    }

    /// The zero-length prefix of `family` (`0.0.0.0/0` or `::/0`).
    pub const fn default_route(family: IpFamily) -> Self {
        IpPrefix {
            address: IpAddress::unspecified(family),
            prefix_len: 0,
        }
    }

    pub const fn address(&self) -> &IpAddress {
        &self.address
    }

    pub const fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub const fn family(&self) -> IpFamily {
        self.address.family()
    }

    pub fn is_default(&self) -> bool {
        self.prefix_len == 0
    }

    pub fn is_host_route(&self) -> bool {
        self.prefix_len == self.family().bits()
    }

    /// Network mask of this prefix, right-aligned in a `u128` like
    /// [`IpAddress::to_bits`].
    pub fn mask(&self) -> u128 {
        mask_bits(self.family(), self.prefix_len)
    }

    /// True when no host bits are set.
    pub fn is_canonical(&self) -> bool {
        self.address.to_bits() & !self.mask() == 0
    }

    /// The prefix with host bits cleared.
    pub fn network(&self) -> IpPrefix {
        IpPrefix {
            address: IpAddress::from_bits(self.family(), self.address.to_bits() & self.mask()),
            prefix_len: self.prefix_len,
        }
    }

    /// True when `addr` is of the same family and falls inside the prefix.
    pub fn contains(&self, addr: &IpAddress) -> bool {
        addr.family() == self.family()
            && (addr.to_bits() ^ self.address.to_bits()) & self.mask() == 0
    }

    /// True when `other` is entirely inside this prefix.
    pub fn covers(&self, other: &IpPrefix) -> bool {
        other.prefix_len >= self.prefix_len && self.contains(&other.address)
    }
}

/// Mask with the top `len` bits of a `family`-wide address set.
pub(crate) fn mask_bits(family: IpFamily, len: u8) -> u128 {
    let width = u32::from(family.bits());
    let len = u32::from(len).min(width);
    if len == 0 {
        return 0;
    }
    let ones = if width == 128 { u128::MAX } else { (1u128 << width) - 1 };
    ones & !(ones >> len)
}

impl fmt::Display for IpPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_len)
    }
}

impl FromStr for IpPrefix {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr_str, len_str) = s
            .rsplit_once('/')
            .ok_or_else(|| ParseError::InvalidIpPrefix(s.to_string()))?;

        let address: IpAddress = addr_str
            .parse()
            .map_err(|_| ParseError::InvalidIpPrefix(s.to_string()))?;
        let prefix_len: u8 = len_str
            .parse()
            .map_err(|_| ParseError::InvalidIpPrefix(s.to_string()))?;

        IpPrefix::new(address, prefix_len)
    }
}

impl TryFrom<String> for IpPrefix {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<IpPrefix> for String {
    fn from(prefix: IpPrefix) -> String {
        prefix.to_string()
    }
}
