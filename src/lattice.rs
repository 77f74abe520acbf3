//! The type hierarchy of a signature.
//!
//! Types are appended one at a time, supertypes first, and the table of least
//! upper bounds is extended incrementally on each insertion. Throughout this
//! crate "upper bound" is read in the unification order: `lub(a, b)` is the
//! most general type that is at least as specific as both `a` and `b`, and
//! `TOP` is the inconsistent type that sits above everything.

use std::collections::{HashMap, HashSet};

use derive_more::Display;
use log::trace;

use crate::error::{Error, Result};
use crate::tfs::FeatureStructure;

/// Position of a type in its lattice. Stable once assigned.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display)]
#[display(fmt = "t{}", _0)]
pub struct TypeId(pub(crate) usize);

impl TypeId {
    pub const BOTTOM: TypeId = TypeId(0);
    pub const TOP: TypeId = TypeId(1);
    pub const STRING: TypeId = TypeId(2);
    pub const LIST: TypeId = TypeId(3);
    pub const RULE: TypeId = TypeId(4);
    pub const CONSTITUENT: TypeId = TypeId(5);

    pub fn index(self) -> usize { self.0 }
}

const RESERVED: [(&str, TypeId); 6] = [
    ("bottom", TypeId::BOTTOM),
    ("top", TypeId::TOP),
    ("string", TypeId::STRING),
    ("list", TypeId::LIST),
    ("rule", TypeId::RULE),
    ("constituent", TypeId::CONSTITUENT),
];

#[derive(Debug)]
pub struct Type {
    name: String,
    index: TypeId,
    supertypes: Vec<TypeId>,
    template: Option<FeatureStructure>,
}

impl Type {
    pub fn name(&self) -> &str { &self.name }
    pub fn index(&self) -> TypeId { self.index }
    pub fn supertypes(&self) -> &[TypeId] { &self.supertypes }
    /// Structure every node of this type starts out with.
    pub fn template(&self) -> Option<&FeatureStructure> { self.template.as_ref() }
}

#[derive(Debug)]
pub struct TypeLattice {
    types: Vec<Type>,
    by_name: HashMap<String, TypeId>,
    /// `lub[i][j]` is the least upper bound of types `i` and `j`.
    lub: Vec<Vec<TypeId>>,
    /// When set, `resolve` creates unknown types as direct subtypes of `bottom`.
    pub implicit_types: bool,
}

impl Default for TypeLattice {
    fn default() -> Self { Self::new() }
}

impl TypeLattice {
    /// A lattice holding only the reserved types.
    pub fn new() -> Self {
        let mut lattice = TypeLattice {
            types: Vec::new(),
            by_name: HashMap::new(),
            lub: Vec::new(),
            implicit_types: false,
        };

        // bottom and top are wired by hand; every other type goes through
        // `add_type` so that the fixpoint sees them.
        for &(name, index) in &RESERVED[..2] {
            lattice.types.push(Type {
                name: name.to_string(),
                index,
                supertypes: if index == TypeId::BOTTOM { vec![] } else { vec![TypeId::BOTTOM] },
                template: None,
            });
            lattice.by_name.insert(name.to_string(), index);
        }
        lattice.lub = vec![
            vec![TypeId::BOTTOM, TypeId::TOP],
            vec![TypeId::TOP, TypeId::TOP],
        ];

        for &(name, index) in &RESERVED[2..] {
            let added = lattice.add_type(name, vec![], None);
            debug_assert_eq!(added.ok(), Some(index));
        }
        lattice
    }

    pub fn with_implicit_types(mut self, implicit: bool) -> Self {
        self.implicit_types = implicit;
        self
    }

    pub fn len(&self) -> usize { self.types.len() }

    pub fn is_empty(&self) -> bool { self.types.is_empty() }

    pub fn get(&self, ty: TypeId) -> &Type { &self.types[ty.0] }

    pub fn name(&self, ty: TypeId) -> &str { &self.types[ty.0].name }

    pub fn types(&self) -> impl Iterator<Item = &Type> { self.types.iter() }

    pub fn lookup(&self, name: &str) -> Result<TypeId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownType(name.to_string()))
    }

    /// Like `lookup`, but creates the type when implicit types are enabled.
    pub fn resolve(&mut self, name: &str) -> Result<TypeId> {
        match self.lookup(name) {
            Ok(ty) => Ok(ty),
            Err(_) if self.implicit_types => self.add_type(name, vec![], None),
            Err(e) => Err(e),
        }
    }

    /// Appends a type below the given supertypes (below `bottom` when none are
    /// given). All supertypes must already be present.
    pub fn add_type(
        &mut self,
        name: &str,
        supertypes: Vec<TypeId>,
        template: Option<FeatureStructure>,
    ) -> Result<TypeId> {
        if self.by_name.contains_key(name) {
            return Err(Error::DuplicateType(name.to_string()));
        }
        if supertypes.contains(&TypeId::TOP) {
            return Err(Error::MalformedGrammar(format!("type `{}` cannot specialise `top`", name)));
        }
        assert!(supertypes.iter().all(|s| s.0 < self.types.len()),
                "supertypes of `{}` must be registered first", name);

        let supertypes = if supertypes.is_empty() { vec![TypeId::BOTTOM] } else { supertypes };
        let new = TypeId(self.types.len());

        for row in self.lub.iter_mut() {
            row.push(TypeId::TOP);
        }
        self.lub.push(vec![TypeId::TOP; new.0 + 1]);
        self.set(new, TypeId::BOTTOM, new);
        self.set(new, new, new);
        for &s in &supertypes {
            self.set(new, s, new);
        }

        self.types.push(Type { name: name.to_string(), index: new, supertypes, template });
        self.by_name.insert(name.to_string(), new);
        self.close_over(new);
        trace!("added type {} as {}", name, new);
        Ok(new)
    }

    fn set(&mut self, a: TypeId, b: TypeId, to: TypeId) {
        self.lub[a.0][b.0] = to;
        self.lub[b.0][a.0] = to;
    }

    // Rule 1: new <= i and i <= j gives new <= j.
    // Rule 2: new <= i, new <= j and i, j incompatible makes new their lub.
    fn close_over(&mut self, new: TypeId) {
        let n = self.types.len();
        loop {
            let mut changed = false;
            for i in 0..n {
                if self.lub[new.0][i] != new {
                    continue;
                }
                for j in 0..n {
                    if self.lub[i][j] == TypeId(i) && self.lub[new.0][j] != new {
                        self.set(new, TypeId(j), new);
                        changed = true;
                    }
                }
            }
            for i in 0..n {
                if i == new.0 || self.lub[new.0][i] != new {
                    continue;
                }
                for j in (i + 1)..n {
                    if j != new.0
                        && self.lub[new.0][j] == new
                        && self.lub[i][j] == TypeId::TOP
                    {
                        self.set(TypeId(i), TypeId(j), new);
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }
    }

    pub fn lub(&self, a: TypeId, b: TypeId) -> TypeId {
        self.lub[a.0][b.0]
    }

    /// Does `a` subsume `b`, i.e. is `a` at least as general as `b`?
    pub fn subsumes(&self, a: TypeId, b: TypeId) -> bool {
        if a == b || a == TypeId::BOTTOM || b == TypeId::TOP {
            return true;
        }
        let mut seen = HashSet::new();
        let mut stack = vec![b];
        while let Some(t) = stack.pop() {
            if t == a {
                return true;
            }
            if seen.insert(t) {
                stack.extend(self.types[t.0].supertypes.iter().copied());
            }
        }
        false
    }
}

#[cfg(test)]
#[path = "tests/lattice.rs"]
mod tests_for_lattice;
