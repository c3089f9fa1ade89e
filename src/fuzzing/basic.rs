use std::collections::BTreeSet;
use std::fmt::Display;

use quickcheck::quickcheck;

use super::*;
use crate::route::mask_from_bits;
use crate::trie::Node;

fn v4_trie(list: &[PoolV4]) -> SummaryTrie<Ipv4Route> {
    let mut trie = SummaryTrie::new();
    for PoolV4(r) in list.iter().copied() {
        trie.insert(r);
    }
    trie
}

fn v6_trie(list: &[PoolV6]) -> SummaryTrie<Ipv6Route> {
    let mut trie = SummaryTrie::new();
    for PoolV6(r) in list.iter().copied() {
        trie.insert(r);
    }
    trie
}

fn render<R: Route + Display>(trie: &SummaryTrie<R>) -> Vec<String> {
    trie.iter().map(|r| r.to_string()).collect()
}

/// Check the structural invariants on every node: children are longer than and contained in
/// their parent, sit in the slot selected by the first bit after the parent's prefix, and a
/// complete sibling pair is never left uncollapsed.
fn structure_ok<R: Route>(trie: &SummaryTrie<R>) -> bool {
    fn node_ok<R: Route>(node: &Node<R>) -> bool {
        let Some(children) = &node.children else {
            return true;
        };
        let [zero, one] = &**children;
        for (i, child) in [zero, one].into_iter().enumerate() {
            if child.route.bits() <= node.route.bits()
                || !node.route.contains(&child.route)
                || usize::from(child.route.nth_bit(node.route.bits() + 1)) != i
            {
                return false;
            }
        }
        if zero.is_leaf()
            && one.is_leaf()
            && zero.route.bits() == one.route.bits()
            && zero.route.bits() == node.route.bits() + 1
        {
            return false;
        }
        node_ok(zero) && node_ok(one)
    }
    trie.root.as_ref().map_or(true, node_ok)
}

fn canonical_ok<R: Route>(trie: &SummaryTrie<R>) -> bool {
    trie.iter()
        .all(|r| r.repr() & mask_from_bits::<R::Repr>(r.bits()) == r.repr())
}

fn no_containment_ok<R: Route>(trie: &SummaryTrie<R>) -> bool {
    let leaves: Vec<R> = trie.iter().copied().collect();
    leaves.iter().enumerate().all(|(i, a)| {
        leaves
            .iter()
            .enumerate()
            .all(|(j, b)| i == j || !a.contains(b))
    })
}

/// Every address covered by any of the routes. Pool routes span at most 1024 addresses, so
/// plain enumeration is exact and cheap.
fn covered_v4<'a>(routes: impl Iterator<Item = &'a Ipv4Route>) -> BTreeSet<u32> {
    let mut set = BTreeSet::new();
    for r in routes {
        let span = 1u64 << (32 - r.bits());
        for off in 0..span {
            set.insert(r.repr() + off as u32);
        }
    }
    set
}

fn covered_v6<'a>(routes: impl Iterator<Item = &'a Ipv6Route>) -> BTreeSet<u128> {
    let mut set = BTreeSet::new();
    for r in routes {
        let span = 1u128 << (128 - r.bits());
        for off in 0..span {
            set.insert(r.repr() + off);
        }
    }
    set
}

quickcheck! {
    fn v4_structure(list: Vec<PoolV4>) -> bool {
        let trie = v4_trie(&list);
        structure_ok(&trie) && canonical_ok(&trie) && no_containment_ok(&trie)
    }

    fn v6_structure(list: Vec<PoolV6>) -> bool {
        let trie = v6_trie(&list);
        structure_ok(&trie) && canonical_ok(&trie) && no_containment_ok(&trie)
    }

    fn v4_insert_order_is_irrelevant(list: Vec<PoolV4>) -> bool {
        let forward = render(&v4_trie(&list));

        let mut reversed = list.clone();
        reversed.reverse();

        let mut sorted = list;
        sorted.sort_by_key(|PoolV4(r)| (r.repr(), r.bits()));

        render(&v4_trie(&reversed)) == forward && render(&v4_trie(&sorted)) == forward
    }

    fn v6_insert_order_is_irrelevant(list: Vec<PoolV6>) -> bool {
        let forward = render(&v6_trie(&list));

        let mut reversed = list;
        reversed.reverse();

        render(&v6_trie(&reversed)) == forward
    }

    fn v4_reinsertion_is_idempotent(list: Vec<PoolV4>) -> bool {
        let mut trie = v4_trie(&list);
        let once = render(&trie);
        for PoolV4(r) in list.iter().copied() {
            trie.insert(r);
        }
        render(&trie) == once
    }

    fn v4_coverage_is_preserved(list: Vec<PoolV4>) -> bool {
        let trie = v4_trie(&list);
        covered_v4(list.iter().map(|PoolV4(r)| r)) == covered_v4(trie.iter())
    }

    fn v6_coverage_is_preserved(list: Vec<PoolV6>) -> bool {
        let trie = v6_trie(&list);
        covered_v6(list.iter().map(|PoolV6(r)| r)) == covered_v6(trie.iter())
    }

    fn v4_render_parse_round_trip(route: AnyV4) -> bool {
        route.0.to_string().parse() == Ok(route.0)
    }

    fn v6_render_parse_round_trip(route: AnyV6) -> bool {
        route.0.to_string().parse() == Ok(route.0)
    }

    fn mem_stats_match_the_tree(list: Vec<PoolV4>) -> bool {
        let trie = v4_trie(&list);
        let stats = trie.mem_stats();
        stats.leaf_nodes == trie.len()
            && (trie.is_empty() || stats.internal_nodes + 1 == stats.leaf_nodes)
    }

    fn summary_output_round_trips(v4: Vec<PoolV4>, v6: Vec<PoolV6>) -> bool {
        let mut summary = RouteSummary::new();
        for PoolV4(r) in v4.iter().copied() {
            summary.insert_v4(r);
        }
        for PoolV6(r) in v6.iter().copied() {
            summary.insert_v6(r);
        }

        // every output line parses back and renders identically
        summary.lines().all(|line| {
            summarize([line.as_str()]).map(|again| again == [line.clone()]) == Ok(true)
        })
    }
}
