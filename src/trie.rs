//! The route-summarization trie and its insertion algorithm.

use crate::route::Route;

/// A trie node. `children == None` means the node is a leaf and its route is part of the
/// summary. An internal node always has exactly two children, stored in a single allocation
/// and indexed by the first bit after the node's prefix.
pub(crate) struct Node<R> {
    pub(crate) route: R,
    pub(crate) children: Option<Box<[Node<R>; 2]>>,
}

impl<R> Node<R> {
    pub(crate) fn leaf(route: R) -> Self {
        Node {
            route,
            children: None,
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// A radix-2 trie whose leaves are the summarized routes.
///
/// The trie is kept maximally simplified under streaming insertion: after every
/// [`insert`](Self::insert) no leaf is contained in another leaf, no internal node has a
/// single child, and no internal node has two leaf children that together cover it exactly.
/// Because covered routes are never stored, every internal node has exactly two children.
pub struct SummaryTrie<R> {
    pub(crate) root: Option<Node<R>>,
}

impl<R> SummaryTrie<R> {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// True iff no route has been inserted.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
}

impl<R> Default for SummaryTrie<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Route> SummaryTrie<R> {
    /// Insert a route, keeping the trie in its maximally simplified form.
    ///
    /// A route already covered by an existing leaf is ignored; a route covering existing
    /// leaves absorbs them; two sibling leaves covering their parent exactly are merged into
    /// it, cascading toward the root. Insertion never fails.
    pub fn insert(&mut self, route: R) {
        match self.root.as_mut() {
            None => self.root = Some(Node::leaf(route)),
            Some(root) => {
                root.insert(route);
            }
        }
    }

    /// The number of routes in the summary.
    pub fn len(&self) -> usize {
        self.iter().count()
    }
}

impl<R: Route> Node<R> {
    /// Insert `r` into the subtree rooted at `self`. Returns true if the subtree was rewritten
    /// into a leaf, so the caller must re-check its own collapse condition.
    fn insert(&mut self, r: R) -> bool {
        // The requested route covers this whole subtree: drop it and keep the route.
        if r.contains(&self.route) {
            self.route = r;
            self.children = None;
            return true;
        }

        if self.route.contains(&r) {
            let Some(children) = self.children.as_mut() else {
                // A leaf covering the requested route; nothing to add.
                return false;
            };
            let slot = usize::from(r.nth_bit(self.route.bits() + 1));
            if children[slot].insert(r) {
                return self.collapse_if_complete();
            }
            return false;
        }

        // The requested route diverges from this node: split at the common ancestor.
        let ancestor = self.route.common_ancestor(&r);

        // If the split would allocate an internal node whose two children immediately
        // collapse back into it, rewrite this leaf in place instead.
        if self.is_leaf() && self.route.bits() == r.bits() && ancestor.bits() == self.route.bits() - 1
        {
            self.route = ancestor;
            return true;
        }

        let old = Node {
            route: self.route,
            children: self.children.take(),
        };
        let new = Node::leaf(r);
        let pair = if r.nth_bit(ancestor.bits() + 1) == 0 {
            [new, old]
        } else {
            [old, new]
        };
        self.route = ancestor;
        self.children = Some(Box::new(pair));
        false
    }

    /// If both children are leaves one bit longer than this node, they cover it exactly;
    /// replace the pair with this node's own route. Returns true if the node collapsed.
    fn collapse_if_complete(&mut self) -> bool {
        let Some(children) = &self.children else {
            return false;
        };
        let [zero, one] = &**children;
        if !zero.is_leaf() || !one.is_leaf() {
            return false;
        }
        if zero.route.bits() != one.route.bits() || zero.route.bits() != self.route.bits() + 1 {
            return false;
        }
        self.children = None;
        true
    }
}
