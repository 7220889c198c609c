//! Directed cycle detection from a single root.

use crate::graph::GraphIndex;
use std::collections::HashSet;

/// One DFS frame: a node and the index of the next outgoing edge to explore.
struct Frame<'a> {
    node: &'a str,
    next_edge: usize,
}

/// Returns true if the subgraph reachable from `start` contains a cycle.
///
/// Iterative depth-first search. `visited` holds every node ever entered;
/// `on_stack` only the nodes on the current path. A node leaves `on_stack`
/// once all of its outgoing edges have been explored, so reaching a visited
/// node that is no longer an ancestor is not a cycle.
///
/// An unknown `start` has nothing reachable and yields `false`.
pub fn has_cycle(index: &GraphIndex<'_>, start: &str) -> bool {
    let Some(root) = index.resolve_id(start) else {
        return false;
    };

    let mut visited: HashSet<&str> = HashSet::new();
    let mut on_stack: HashSet<&str> = HashSet::new();
    let mut stack = vec![Frame {
        node: root,
        next_edge: 0,
    }];
    visited.insert(root);
    on_stack.insert(root);

    while let Some(frame) = stack.last_mut() {
        let edges = index.edges_from(frame.node);
        let Some(&edge) = edges.get(frame.next_edge) else {
            on_stack.remove(frame.node);
            stack.pop();
            continue;
        };
        frame.next_edge += 1;

        let next = edge.target.as_str();
        if on_stack.contains(next) {
            return true;
        }
        if visited.insert(next) {
            on_stack.insert(next);
            stack.push(Frame {
                node: next,
                next_edge: 0,
            });
        }
    }

    false
}
