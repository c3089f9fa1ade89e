//! Route values for both address families, and the generic [`Route`] trait the trie is built
//! over.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use ipnet::{Ipv4Net, Ipv6Net};
use num_traits::{One, PrimInt, Unsigned, Zero};

/// Trait for route values stored in a [`SummaryTrie`](crate::SummaryTrie).
///
/// A route is a base address of [`width`](Route::width) bits together with a count of
/// significant bits. The trie only needs the bitwise primitives below, and those are
/// implemented once on top of `repr`/`bits`/`from_repr_bits` using native integer operations
/// (shift, XOR, leading-zero count).
///
/// Implementations must keep routes canonical: all bits of `repr()` below `bits()` are zero.
/// [`from_repr_bits`](Route::from_repr_bits) masks its input, so routes built through it are
/// canonical by construction.
pub trait Route: Copy + Eq {
    /// How the base address is represented. `u32` for IPv4, `u128` for IPv6.
    type Repr: Unsigned + PrimInt + Zero;

    /// The base address, with the mask already applied.
    fn repr(&self) -> Self::Repr;

    /// Number of significant bits, counted from the most significant bit.
    fn bits(&self) -> u8;

    /// Create a route from a base address and a significant-bit count. Bits below `bits` are
    /// masked off.
    fn from_repr_bits(repr: Self::Repr, bits: u8) -> Self;

    /// The address width of the family, in bits.
    fn width() -> u8 {
        Self::Repr::zero().count_zeros() as u8
    }

    /// Check if `self` covers every address that `other` covers. Also true if the two routes
    /// are identical.
    fn contains(&self, other: &Self) -> bool {
        if self.bits() > other.bits() {
            return false;
        }
        other.repr() & mask_from_bits(self.bits()) == self.repr()
    }

    /// The most-specific route that contains both `self` and `other`.
    fn common_ancestor(&self, other: &Self) -> Self {
        let a = self.repr();
        let b = other.repr();
        let bits = ((a ^ b).leading_zeros() as u8)
            .min(self.bits())
            .min(other.bits());
        Self::from_repr_bits(a, bits)
    }

    /// The nth bit of the base address, 1-indexed from the most significant bit:
    /// `nth_bit(1)` is the MSB. `n` must be in `1..=width()`.
    fn nth_bit(&self, n: u8) -> u8 {
        debug_assert!((1..=Self::width()).contains(&n));
        let bit = (self.repr() >> ((Self::width() - n) as usize)) & Self::Repr::one();
        if bit == Self::Repr::one() {
            1
        } else {
            0
        }
    }
}

/// A mask selecting the topmost `bits` bits of `R`. Total over the whole range, including
/// `bits == 0` and `bits == width`.
pub(crate) fn mask_from_bits<R>(bits: u8) -> R
where
    R: PrimInt + Zero,
{
    if bits as u32 == R::zero().count_zeros() {
        !R::zero()
    } else if bits == 0 {
        R::zero()
    } else {
        !((!R::zero()) >> bits as usize)
    }
}

/// The error returned when a line of input is neither a valid address nor a valid CIDR prefix.
///
/// Family dispatch is syntactic (a `:` selects IPv6), so the error carries the full offending
/// text and makes no claim about which family was intended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRouteError {
    input: String,
}

impl ParseRouteError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// The input that could not be parsed.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ParseRouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` was not understood", self.input)
    }
}

impl std::error::Error for ParseRouteError {}

/// An IPv4 route: a base address and a significant-bit count.
///
/// A route with all 32 bits significant is a host route and renders as a bare address;
/// anything else renders as `address/bits`. Routes are always canonical: host bits are zeroed
/// on construction.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ipv4Route {
    addr: u32,
    bits: u8,
}

impl Ipv4Route {
    /// Create a route from an address and a significant-bit count. Host bits are zeroed.
    /// Fails if `bits > 32`.
    pub fn new(addr: Ipv4Addr, bits: u8) -> Result<Self, ParseRouteError> {
        if bits > 32 {
            return Err(ParseRouteError::new(format!("{addr}/{bits}")));
        }
        Ok(Self::from_repr_bits(addr.into(), bits))
    }

    /// The base address.
    pub fn addr(&self) -> Ipv4Addr {
        self.addr.into()
    }

    /// True iff the route covers exactly one address.
    pub fn is_host(&self) -> bool {
        self.bits == 32
    }
}

impl Route for Ipv4Route {
    type Repr = u32;

    fn repr(&self) -> u32 {
        self.addr
    }

    fn bits(&self) -> u8 {
        self.bits
    }

    fn from_repr_bits(repr: u32, bits: u8) -> Self {
        Self {
            addr: repr & mask_from_bits::<u32>(bits),
            bits,
        }
    }
}

impl From<Ipv4Addr> for Ipv4Route {
    fn from(addr: Ipv4Addr) -> Self {
        Self {
            addr: addr.into(),
            bits: 32,
        }
    }
}

impl From<Ipv4Net> for Ipv4Route {
    fn from(net: Ipv4Net) -> Self {
        Self::from_repr_bits(net.addr().into(), net.prefix_len())
    }
}

impl FromStr for Ipv4Route {
    type Err = ParseRouteError;

    fn from_str(s: &str) -> Result<Self, ParseRouteError> {
        if s.contains('/') {
            s.parse::<Ipv4Net>()
                .map(Self::from)
                .map_err(|_| ParseRouteError::new(s))
        } else {
            s.parse::<Ipv4Addr>()
                .map(Self::from)
                .map_err(|_| ParseRouteError::new(s))
        }
    }
}

impl fmt::Display for Ipv4Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_host() {
            self.addr().fmt(f)
        } else {
            write!(f, "{}/{}", self.addr(), self.bits)
        }
    }
}

impl fmt::Debug for Ipv4Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// An IPv6 route: a base address and a significant-bit count.
///
/// IPv4-mapped addresses (`::ffff:a.b.c.d`) are IPv6 routes like any other; they are never
/// conflated with the IPv4 route of the embedded address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ipv6Route {
    addr: u128,
    bits: u8,
}

impl Ipv6Route {
    /// Create a route from an address and a significant-bit count. Host bits are zeroed.
    /// Fails if `bits > 128`.
    pub fn new(addr: Ipv6Addr, bits: u8) -> Result<Self, ParseRouteError> {
        if bits > 128 {
            return Err(ParseRouteError::new(format!("{addr}/{bits}")));
        }
        Ok(Self::from_repr_bits(addr.into(), bits))
    }

    /// The base address.
    pub fn addr(&self) -> Ipv6Addr {
        self.addr.into()
    }

    /// True iff the route covers exactly one address.
    pub fn is_host(&self) -> bool {
        self.bits == 128
    }
}

impl Route for Ipv6Route {
    type Repr = u128;

    fn repr(&self) -> u128 {
        self.addr
    }

    fn bits(&self) -> u8 {
        self.bits
    }

    fn from_repr_bits(repr: u128, bits: u8) -> Self {
        Self {
            addr: repr & mask_from_bits::<u128>(bits),
            bits,
        }
    }
}

impl From<Ipv6Addr> for Ipv6Route {
    fn from(addr: Ipv6Addr) -> Self {
        Self {
            addr: addr.into(),
            bits: 128,
        }
    }
}

impl From<Ipv6Net> for Ipv6Route {
    fn from(net: Ipv6Net) -> Self {
        Self::from_repr_bits(net.addr().into(), net.prefix_len())
    }
}

impl FromStr for Ipv6Route {
    type Err = ParseRouteError;

    fn from_str(s: &str) -> Result<Self, ParseRouteError> {
        if s.contains('/') {
            s.parse::<Ipv6Net>()
                .map(Self::from)
                .map_err(|_| ParseRouteError::new(s))
        } else {
            s.parse::<Ipv6Addr>()
                .map(Self::from)
                .map_err(|_| ParseRouteError::new(s))
        }
    }
}

impl fmt::Display for Ipv6Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_host() {
            self.addr().fmt(f)
        } else {
            write!(f, "{}/{}", self.addr(), self.bits)
        }
    }
}

impl fmt::Debug for Ipv6Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
