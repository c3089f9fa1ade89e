//! This crate summarizes a list of IPv4 and IPv6 routes (host addresses and CIDR prefixes)
//! into the shortest list that covers exactly the same address space.
//!
//! # Description of the trie
//!
//! The summary is held in one radix-2 trie per address family. A trie node is either a
//! *leaf*, carrying a route that is part of the summary, or an *internal* node, carrying the
//! common prefix of everything beneath it plus exactly two children indexed by the first bit
//! after that prefix. An internal node never has a single child: routes covered by other
//! routes are not stored, so there is never a reason for one.
//!
//! Every insertion restores the trie to its maximally simplified form:
//!
//! - a route covered by an existing leaf is ignored;
//! - a route covering existing nodes absorbs them and takes their place;
//! - two sibling leaves that together cover their parent exactly are merged into the parent,
//!   cascading toward the root.
//!
//! Because simplification is incremental, the output is independent of insertion order, and
//! the trie never holds more nodes than the simplified result needs.
//!
//! # Example
//!
//! ```
//! use routefold::RouteSummary;
//!
//! let mut summary = RouteSummary::new();
//! summary.insert_line("192.0.2.0")?;
//! summary.insert_line("192.0.2.1")?;
//! summary.insert_line("2001:db8::/32")?;
//!
//! let lines: Vec<String> = summary.lines().collect();
//! assert_eq!(lines, ["192.0.2.0/31", "2001:db8::/32"]);
//! # Ok::<(), routefold::ParseRouteError>(())
//! ```

mod fmt;
mod iter;
mod mem;
mod route;
#[cfg(feature = "serde")]
mod serde;
mod trie;

pub use iter::{Leaves, Lines};
pub use mem::MemStats;
pub use route::{Ipv4Route, Ipv6Route, ParseRouteError, Route};
pub use trie::SummaryTrie;

/// A streaming summarizer holding one trie per address family.
///
/// Lines are dispatched syntactically: text containing a `:` is parsed as IPv6, anything else
/// as IPv4. The two families never merge; `192.0.2.0` and `::ffff:192.0.2.0` are distinct
/// routes in distinct tries.
#[derive(Default)]
pub struct RouteSummary {
    v4: SummaryTrie<Ipv4Route>,
    v6: SummaryTrie<Ipv6Route>,
}

impl RouteSummary {
    /// Create an empty summarizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one line of input and insert it into the family's trie.
    ///
    /// Surrounding whitespace is stripped and empty lines are ignored. On failure the error
    /// carries the offending text.
    pub fn insert_line(&mut self, line: &str) -> Result<(), ParseRouteError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }
        if line.contains(':') {
            self.v6.insert(line.parse()?);
        } else {
            self.v4.insert(line.parse()?);
        }
        Ok(())
    }

    /// Insert an already-parsed IPv4 route.
    pub fn insert_v4(&mut self, route: Ipv4Route) {
        self.v4.insert(route);
    }

    /// Insert an already-parsed IPv6 route.
    pub fn insert_v6(&mut self, route: Ipv6Route) {
        self.v6.insert(route);
    }

    /// The IPv4 half of the summary.
    pub fn v4(&self) -> &SummaryTrie<Ipv4Route> {
        &self.v4
    }

    /// The IPv6 half of the summary.
    pub fn v6(&self) -> &SummaryTrie<Ipv6Route> {
        &self.v6
    }

    /// The rendered summary: all IPv4 routes in ascending order, then all IPv6 routes in
    /// ascending order. Host routes render as a bare address.
    pub fn lines(&self) -> Lines<'_> {
        Lines::new(self)
    }

    /// The number of routes in the summary, across both families.
    pub fn len(&self) -> usize {
        self.v4.len() + self.v6.len()
    }

    /// True iff nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.v4.is_empty() && self.v6.is_empty()
    }

    /// Memory usage aggregated over both tries.
    pub fn mem_stats(&self) -> MemStats {
        self.v4.mem_stats() + self.v6.mem_stats()
    }
}

/// Summarize a batch of lines through a fresh [`RouteSummary`].
///
/// ```
/// let summarized = routefold::summarize(["10.0.0.0/9", "10.128.0.0/9"])?;
/// assert_eq!(summarized, ["10.0.0.0/8"]);
/// # Ok::<(), routefold::ParseRouteError>(())
/// ```
pub fn summarize<I, S>(lines: I) -> Result<Vec<String>, ParseRouteError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut summary = RouteSummary::new();
    for line in lines {
        summary.insert_line(line.as_ref())?;
    }
    Ok(summary.lines().collect())
}
