//! Formatting implementation for the trie.

use std::fmt::{Debug, Formatter, Result};

use crate::trie::{Node, SummaryTrie};

impl<R: Debug> Debug for SummaryTrie<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match &self.root {
            None => f.write_str("{}"),
            Some(root) => DebugNode(root).fmt(f),
        }
    }
}

struct DebugNode<'a, R>(&'a Node<R>);

impl<R: Debug> Debug for DebugNode<'_, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match &self.0.children {
            None => self.0.route.fmt(f),
            Some(children) => {
                let [zero, one] = &**children;
                f.debug_map()
                    .entry(&self.0.route, &(DebugNode(zero), DebugNode(one)))
                    .finish()
            }
        }
    }
}
