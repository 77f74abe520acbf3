//! Quasi-destructive graph unification.
//!
//! `unifiable` walks both graphs, redirecting nodes of the second argument to
//! nodes of the first through `forward` and collecting the merged type, arcs,
//! literal and list elements in the first node's `aux` record. Nothing of the
//! committed graph is touched. If the walk succeeds, `copy_unifact` builds the
//! result out of the forwarded view; if it fails, all scratch state simply
//! goes stale when the generation moves on.

use log::trace;

use super::{Aux, FeatureArena, Label, NodeId};
use crate::lattice::{TypeId, TypeLattice};

impl FeatureArena {
    /// Unifies the structures rooted at `a` and `b` into a fresh structure.
    ///
    /// Neither input is modified. On failure the result is a single node of
    /// type `TOP`; callers check it with `is_top`.
    pub fn unify(&mut self, lattice: &TypeLattice, a: NodeId, b: NodeId) -> NodeId {
        let generation = self.context.advance();
        if self.unifiable(lattice, generation, a, b) {
            self.copy_unifact(generation, a)
        } else {
            trace!("unification of {} and {} failed in generation {}", a, b, generation);
            self.top()
        }
    }

    /// Deep copy of the structure below `root`, preserving sharing and cycles.
    pub fn copy(&mut self, root: NodeId) -> NodeId {
        let generation = self.context.advance();
        self.copy_unifact(generation, root)
    }

    fn deref(&self, mut node: NodeId, generation: u64) -> NodeId {
        while let Some((g, to)) = self.nodes[node.0].forward {
            if g != generation {
                break;
            }
            node = to;
        }
        node
    }

    fn aux(&self, node: NodeId, generation: u64) -> Option<&Aux> {
        self.nodes[node.0].aux.as_ref().filter(|aux| aux.generation == generation)
    }

    fn aux_mut(&mut self, node: NodeId, generation: u64) -> &mut Aux {
        let n = &mut self.nodes[node.0];
        if n.aux.as_ref().map_or(false, |aux| aux.generation != generation) {
            n.aux = None;
        }
        let ty = n.ty;
        n.aux.get_or_insert_with(|| Aux {
            generation,
            ty,
            features: Vec::new(),
            value: None,
            refs: None,
        })
    }

    fn current_type(&self, node: NodeId, generation: u64) -> TypeId {
        self.aux(node, generation).map_or(self.nodes[node.0].ty, |aux| aux.ty)
    }

    fn current_value(&self, node: NodeId, generation: u64) -> Option<String> {
        self.aux(node, generation)
            .and_then(|aux| aux.value.clone())
            .or_else(|| self.nodes[node.0].value.clone())
    }

    fn current_refs(&self, node: NodeId, generation: u64) -> Vec<NodeId> {
        match self.aux(node, generation).and_then(|aux| aux.refs.as_ref()) {
            Some(refs) => refs.clone(),
            None => self.nodes[node.0].refs.clone(),
        }
    }

    fn current_feature(&self, node: NodeId, generation: u64, label: &str) -> Option<NodeId> {
        self.nodes[node.0].features.get(label).copied().or_else(|| {
            self.aux(node, generation)
                .and_then(|aux| aux.features.iter().find(|(l, _)| l == label).map(|&(_, v)| v))
        })
    }

    fn current_features(&self, node: NodeId, generation: u64) -> Vec<(Label, NodeId)> {
        let mut features: Vec<(Label, NodeId)> = self.nodes[node.0]
            .features
            .iter()
            .map(|(l, &v)| (l.clone(), v))
            .collect();
        if let Some(aux) = self.aux(node, generation) {
            features.extend(aux.features.iter().cloned());
        }
        features
    }

    // `b` is forwarded to `a` before any arc is visited, so a pair of nodes
    // reached again through a cycle dereferences to the same node and is done.
    fn unifiable(&mut self, lattice: &TypeLattice, generation: u64, a: NodeId, b: NodeId) -> bool {
        let a = self.deref(a, generation);
        let b = self.deref(b, generation);
        if a == b {
            return true;
        }

        let a_type = self.current_type(a, generation);
        let b_type = self.current_type(b, generation);
        let ty = lattice.lub(a_type, b_type);
        if ty == TypeId::TOP {
            return false;
        }

        let mut element_pairs = Vec::new();
        if ty == TypeId::STRING {
            match (self.current_value(a, generation), self.current_value(b, generation)) {
                (Some(x), Some(y)) if x != y => return false,
                (None, Some(y)) => self.aux_mut(a, generation).value = Some(y),
                _ => {}
            }
        } else if ty == TypeId::LIST {
            let b_refs = self.current_refs(b, generation);
            if a_type == TypeId::LIST && b_type == TypeId::LIST {
                let a_refs = self.current_refs(a, generation);
                if a_refs.len() != b_refs.len() {
                    return false;
                }
                element_pairs = a_refs.into_iter().zip(b_refs).collect();
            } else if b_type == TypeId::LIST {
                self.aux_mut(a, generation).refs = Some(b_refs);
            }
        }

        self.aux_mut(a, generation).ty = ty;
        self.nodes[b.0].forward = Some((generation, a));

        // A recursive step may forward `a` itself, so every arc goes to
        // wherever `a` currently leads.
        for (label, b_value) in self.current_features(b, generation) {
            let target = self.deref(a, generation);
            match self.current_feature(target, generation, &label) {
                Some(a_value) => {
                    if !self.unifiable(lattice, generation, a_value, b_value) {
                        return false;
                    }
                }
                None => self.aux_mut(target, generation).features.push((label, b_value)),
            }
        }

        if !element_pairs
            .into_iter()
            .all(|(x, y)| self.unifiable(lattice, generation, x, y))
        {
            return false;
        }

        // a type reached only through the lub brings its template along
        if ty != a_type && ty != b_type {
            if let Some(template) = lattice.get(ty).template() {
                let root = self.import(template.arena(), template.root());
                self.nodes[root.0].ty = ty;
                return self.unifiable(lattice, generation, a, root);
            }
        }
        true
    }

    /// Copies the forwarded view of `node` for the current generation. A node
    /// reached again while its copy is under construction gets that same copy,
    /// which is what closes cycles.
    pub(crate) fn copy_unifact(&mut self, generation: u64, node: NodeId) -> NodeId {
        let node = self.deref(node, generation);
        if let Some((g, copy)) = self.nodes[node.0].unifact {
            if g == generation {
                return copy;
            }
        }

        let copy = self.node(self.current_type(node, generation));
        self.nodes[copy.0].value = self.current_value(node, generation);
        self.nodes[node.0].unifact = Some((generation, copy));

        for (label, value) in self.current_features(node, generation) {
            let value = self.copy_unifact(generation, value);
            self.nodes[copy.0].features.insert(label, value);
        }
        let refs = self
            .current_refs(node, generation)
            .into_iter()
            .map(|r| self.copy_unifact(generation, r))
            .collect();
        self.nodes[copy.0].refs = refs;
        copy
    }
}
