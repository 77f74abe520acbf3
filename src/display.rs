use std::collections::HashMap;
use std::fmt;

use crate::grammar::{Grammar, ProductionRule, Symbol};
use crate::item::Item;
use crate::lattice::{TypeId, TypeLattice};
use crate::tfs::{FeatureArena, NodeId};

impl fmt::Display for ProductionRule {
    fn fmt(&self, w: &mut fmt::Formatter) -> fmt::Result {
        write!(w, "{} ->", self.lhs())?;
        for (i, symbol) in self.rhs().iter().enumerate() {
            write!(w, " {}", symbol)?;
            if i == self.head() && self.head() != 0 {
                write!(w, "*")?;
            }
        }
        Ok(())
    }
}

/// An item as `[S -> NP . VP, 0, 2]`; needs the grammar to spell out rules.
pub struct ItemDisplay<'a> {
    item: &'a Item,
    grammar: &'a Grammar,
}

impl Item {
    pub fn display<'a>(&'a self, grammar: &'a Grammar) -> ItemDisplay<'a> {
        ItemDisplay { item: self, grammar }
    }
}

fn write_symbols(w: &mut fmt::Formatter, symbols: &[Symbol]) -> fmt::Result {
    for symbol in symbols {
        write!(w, " {}", symbol)?;
    }
    Ok(())
}

impl<'a> fmt::Display for ItemDisplay<'a> {
    fn fmt(&self, w: &mut fmt::Formatter) -> fmt::Result {
        match self.item {
            Item::Cyk(x) => write!(w, "[{}, {}, {}]", x.category, x.from, x.to),
            Item::Dotted(x) => {
                let rule = self.grammar.rule(x.rule);
                write!(w, "[{} ->", rule.lhs())?;
                write_symbols(w, &rule.rhs()[..x.dot])?;
                write!(w, " .")?;
                write_symbols(w, &rule.rhs()[x.dot..])?;
                write!(w, ", {}, {}]", x.from, x.to)
            }
            Item::DoubleDotted(x) => {
                let rule = self.grammar.rule(x.rule);
                write!(w, "[{} ->", rule.lhs())?;
                write_symbols(w, &rule.rhs()[..x.left_dot])?;
                write!(w, " .")?;
                write_symbols(w, &rule.rhs()[x.left_dot..x.right_dot])?;
                write!(w, " .")?;
                write_symbols(w, &rule.rhs()[x.right_dot..])?;
                write!(w, ", {}, {}]", x.from, x.to)
            }
            Item::Goal(x) => write!(w, "[goal {}, {}, {}]", x.nonterminal, x.from, x.to),
        }
    }
}

/// A feature structure in bracket notation. Labels are sorted; a node
/// reachable along more than one path is tagged `#k=` where it is first
/// printed and written `#k` afterwards.
pub struct FsDisplay<'a> {
    arena: &'a FeatureArena,
    lattice: &'a TypeLattice,
    root: NodeId,
}

impl FeatureArena {
    pub fn display<'a>(&'a self, lattice: &'a TypeLattice, root: NodeId) -> FsDisplay<'a> {
        FsDisplay { arena: self, lattice, root }
    }
}

impl<'a> FsDisplay<'a> {
    fn write_node(
        &self,
        w: &mut fmt::Formatter,
        node: NodeId,
        counts: &HashMap<NodeId, usize>,
        tags: &mut HashMap<NodeId, usize>,
    ) -> fmt::Result {
        let incoming = counts.get(&node).copied().unwrap_or(0);
        if incoming > 1 || (node == self.root && incoming > 0) {
            if let Some(tag) = tags.get(&node) {
                return write!(w, "#{}", tag);
            }
            let tag = tags.len() + 1;
            tags.insert(node, tag);
            write!(w, "#{}=", tag)?;
        }

        let arena = self.arena;
        let ty = arena.ty(node);
        if let Some(value) = arena.value(node) {
            return write!(w, "{:?}", value);
        }
        if ty == TypeId::LIST {
            write!(w, "<")?;
            for (i, &element) in arena.refs(node).iter().enumerate() {
                if i > 0 {
                    write!(w, ", ")?;
                }
                self.write_node(w, element, counts, tags)?;
            }
            return write!(w, ">");
        }

        let mut features: Vec<(&str, NodeId)> = arena.features(node).collect();
        features.sort_by(|a, b| a.0.cmp(b.0));
        if ty != TypeId::BOTTOM {
            write!(w, "{}", self.lattice.name(ty))?;
            if features.is_empty() {
                return Ok(());
            }
        }
        write!(w, "[")?;
        for (i, (label, value)) in features.into_iter().enumerate() {
            if i > 0 {
                write!(w, ", ")?;
            }
            write!(w, "{}: ", label)?;
            self.write_node(w, value, counts, tags)?;
        }
        write!(w, "]")
    }
}

impl<'a> fmt::Display for FsDisplay<'a> {
    fn fmt(&self, w: &mut fmt::Formatter) -> fmt::Result {
        let counts = self.arena.incoming_counts(self.root);
        self.write_node(w, self.root, &counts, &mut HashMap::new())
    }
}
