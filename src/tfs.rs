//! Typed feature structures.
//!
//! Nodes live in a `FeatureArena` and refer to one another by `NodeId`, so a
//! structure may share substructure (coreference) and may contain cycles.
//! Once built, a node's type, features, string value and list elements are
//! never changed again; unification writes only to the generation-stamped
//! scratch fields and produces its result as a fresh copy.

use std::collections::HashMap;

use derive_more::Display;
use linear_map::LinearMap;

use crate::lattice::{TypeId, TypeLattice};

mod equality;
mod unify;

/// Label of a feature arc.
pub type Label = String;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display)]
#[display(fmt = "n{}", _0)]
pub struct NodeId(pub(crate) usize);

/// Scopes the validity of the forward/unifact/aux fields of the nodes in one
/// arena. Every `unify` and `copy` advances it, which retires all scratch
/// state of earlier calls at once.
#[derive(Copy, Clone, Default, Debug)]
pub struct UnificationContext {
    generation: u64,
}

impl UnificationContext {
    pub fn generation(&self) -> u64 { self.generation }

    fn advance(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) ty: TypeId,
    pub(crate) features: LinearMap<Label, NodeId>,
    /// Literal of a `string` node.
    pub(crate) value: Option<String>,
    /// Elements of a `list` node.
    pub(crate) refs: Vec<NodeId>,
    pub(crate) forward: Option<(u64, NodeId)>,
    pub(crate) unifact: Option<(u64, NodeId)>,
    pub(crate) aux: Option<Aux>,
}

/// Result of an in-progress unification, not yet committed by the copy.
#[derive(Clone, Debug)]
pub(crate) struct Aux {
    generation: u64,
    ty: TypeId,
    features: Vec<(Label, NodeId)>,
    value: Option<String>,
    refs: Option<Vec<NodeId>>,
}

impl Node {
    fn new(ty: TypeId) -> Self {
        Node {
            ty,
            features: LinearMap::new(),
            value: None,
            refs: Vec::new(),
            forward: None,
            unifact: None,
            aux: None,
        }
    }
}

#[derive(Clone, Default, Debug)]
pub struct FeatureArena {
    nodes: Vec<Node>,
    context: UnificationContext,
}

impl FeatureArena {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.nodes.len() }

    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    pub fn context(&self) -> UnificationContext { self.context }

    fn alloc(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// A fresh node of type `ty` without features.
    pub fn node(&mut self, ty: TypeId) -> NodeId {
        self.alloc(Node::new(ty))
    }

    /// A fresh node of type `ty` carrying a copy of the type's template.
    pub fn typed_node(&mut self, lattice: &TypeLattice, ty: TypeId) -> NodeId {
        match lattice.get(ty).template() {
            Some(template) => {
                let root = self.import(template.arena(), template.root());
                self.nodes[root.0].ty = ty;
                root
            }
            None => self.node(ty),
        }
    }

    /// The universal failure value.
    pub fn top(&mut self) -> NodeId {
        self.node(TypeId::TOP)
    }

    pub fn string(&mut self, value: impl Into<String>) -> NodeId {
        let id = self.node(TypeId::STRING);
        self.nodes[id.0].value = Some(value.into());
        id
    }

    pub fn list(&mut self, elements: Vec<NodeId>) -> NodeId {
        let id = self.node(TypeId::LIST);
        self.nodes[id.0].refs = elements;
        id
    }

    /// A `bottom` node whose only feature is `label`.
    pub fn wrap(&mut self, label: impl Into<Label>, value: NodeId) -> NodeId {
        let id = self.node(TypeId::BOTTOM);
        self.nodes[id.0].features.insert(label.into(), value);
        id
    }

    /// Sets a feature while a structure is being built.
    pub fn set_feature(&mut self, node: NodeId, label: impl Into<Label>, value: NodeId) -> Option<NodeId> {
        self.nodes[node.0].features.insert(label.into(), value)
    }

    pub fn ty(&self, node: NodeId) -> TypeId { self.nodes[node.0].ty }

    pub fn is_top(&self, node: NodeId) -> bool { self.nodes[node.0].ty == TypeId::TOP }

    pub fn value(&self, node: NodeId) -> Option<&str> { self.nodes[node.0].value.as_deref() }

    pub fn refs(&self, node: NodeId) -> &[NodeId] { &self.nodes[node.0].refs }

    pub fn feature(&self, node: NodeId, label: &str) -> Option<NodeId> {
        self.nodes[node.0].features.get(label).copied()
    }

    pub fn features(&self, node: NodeId) -> impl Iterator<Item = (&str, NodeId)> + '_ {
        self.nodes[node.0].features.iter().map(|(l, &v)| (l.as_str(), v))
    }

    pub fn follow<S: AsRef<str>>(&self, node: NodeId, path: &[S]) -> Option<NodeId> {
        path.iter().try_fold(node, |n, label| self.feature(n, label.as_ref()))
    }

    /// Walks `path` from `node`, creating `bottom` nodes where arcs are
    /// missing, and returns the node at its end.
    pub fn extend_path<S: AsRef<str>>(&mut self, node: NodeId, path: &[S]) -> NodeId {
        let mut current = node;
        for label in path {
            current = match self.feature(current, label.as_ref()) {
                Some(next) => next,
                None => {
                    let next = self.node(TypeId::BOTTOM);
                    self.set_feature(current, label.as_ref(), next);
                    next
                }
            };
        }
        current
    }

    pub(crate) fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let n = &self.nodes[node.0];
        n.features.values().copied().chain(n.refs.iter().copied())
    }

    /// Copies the structure below `root` in `other` into this arena,
    /// preserving sharing and cycles.
    pub fn import(&mut self, other: &FeatureArena, root: NodeId) -> NodeId {
        let mut mapping: HashMap<NodeId, NodeId> = HashMap::new();
        let mut reached = Vec::new();
        let mut stack = vec![root];
        while let Some(n) = stack.pop() {
            if mapping.contains_key(&n) {
                continue;
            }
            let id = self.node(other.nodes[n.0].ty);
            mapping.insert(n, id);
            reached.push(n);
            stack.extend(other.successors(n));
        }
        for old in reached {
            let src = &other.nodes[old.0];
            let dst = mapping[&old];
            let features = src.features.iter().map(|(l, v)| (l.clone(), mapping[v])).collect();
            let refs = src.refs.iter().map(|r| mapping[r]).collect();
            let node = &mut self.nodes[dst.0];
            node.value = src.value.clone();
            node.features = features;
            node.refs = refs;
        }
        mapping[&root]
    }
}

/// A structure that owns its nodes: the form in which type templates and
/// lexical tags are handed around before they enter a parse.
#[derive(Clone, Debug)]
pub struct FeatureStructure {
    arena: FeatureArena,
    root: NodeId,
}

impl FeatureStructure {
    pub fn new(arena: FeatureArena, root: NodeId) -> Self {
        FeatureStructure { arena, root }
    }

    pub fn arena(&self) -> &FeatureArena { &self.arena }

    pub fn root(&self) -> NodeId { self.root }

    pub fn is_equal_to(&self, other: &FeatureStructure) -> bool {
        self.arena.equivalent_across(self.root, &other.arena, other.root)
    }
}

#[cfg(test)]
#[path = "tests/tfs.rs"]
mod tests_for_tfs;
