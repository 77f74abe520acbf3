//! Structural equality of feature structures.
//!
//! Two structures are equal when there is a one-to-one correspondence between
//! their reachable nodes that preserves types, literals, labelled arcs and
//! list elements. Because the correspondence must be one-to-one, structures of
//! the same shape but with different sharing are told apart: `[a: #1[], b: #1]`
//! is not equal to `[a: [], b: []]`.

use std::collections::HashMap;

use super::{FeatureArena, NodeId};

impl FeatureArena {
    /// For every node reachable from `root`, the number of distinct
    /// (parent, label) arcs pointing at it. List elements count as arcs.
    pub fn incoming_counts(&self, root: NodeId) -> HashMap<NodeId, usize> {
        let mut counts: HashMap<NodeId, usize> = HashMap::new();
        counts.insert(root, 0);
        let mut stack = vec![root];
        while let Some(n) = stack.pop() {
            for next in self.successors(n) {
                let seen = counts.contains_key(&next);
                *counts.entry(next).or_insert(0) += 1;
                if !seen {
                    stack.push(next);
                }
            }
        }
        counts
    }

    fn sharing_profile(&self, root: NodeId) -> Vec<usize> {
        let mut profile: Vec<usize> = self.incoming_counts(root).into_values().collect();
        profile.sort_unstable();
        profile
    }

    pub fn is_equal_to(&self, a: NodeId, b: NodeId) -> bool {
        a == b || self.equivalent_across(a, self, b)
    }

    /// Compares the structure at `a` in this arena with the one at `b` in
    /// `other`.
    pub fn equivalent_across(&self, a: NodeId, other: &FeatureArena, b: NodeId) -> bool {
        if self.sharing_profile(a) != other.sharing_profile(b) {
            return false;
        }

        let mut forward: HashMap<NodeId, NodeId> = HashMap::new();
        let mut backward: HashMap<NodeId, NodeId> = HashMap::new();
        let mut pending = vec![(a, b)];
        while let Some((x, y)) = pending.pop() {
            match (forward.get(&x), backward.get(&y)) {
                (Some(&y2), _) if y2 == y => continue,
                (None, None) => {}
                _ => return false,
            }
            forward.insert(x, y);
            backward.insert(y, x);

            let (nx, ny) = (&self.nodes[x.0], &other.nodes[y.0]);
            if nx.ty != ny.ty
                || nx.value != ny.value
                || nx.features.len() != ny.features.len()
                || nx.refs.len() != ny.refs.len()
            {
                return false;
            }
            for (label, &vx) in nx.features.iter() {
                match ny.features.get(label) {
                    Some(&vy) => pending.push((vx, vy)),
                    None => return false,
                }
            }
            pending.extend(nx.refs.iter().copied().zip(ny.refs.iter().copied()));
        }
        true
    }
}
