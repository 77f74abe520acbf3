//! Chart items.
//!
//! Every item records the span it covers, an optional feature structure
//! (a node of the chart's arena) and the items it was built from. Items that
//! stand for a rule (`Dotted`, `DoubleDotted`) carry the rule's whole
//! structure, with the left-hand side under `LHS_LABEL` and right-hand side
//! constituents under `rhs_label(i)`; `Cyk` items carry the structure of
//! their category only.

use derive_more::Display;

use crate::grammar::{Grammar, RuleId, Symbol, LHS_LABEL};
use crate::tfs::{FeatureArena, NodeId};

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display)]
#[display(fmt = "i{}", _0)]
pub struct ItemRef(pub(crate) usize);

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display)]
pub enum ItemKind { Cyk, Dotted, DoubleDotted, Goal }

/// Where a `Cyk` item comes from.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Origin {
    /// The word itself; its category is the word.
    Word,
    /// A tag of the word below it.
    Tag,
    Rule(RuleId),
}

/// `[X, i, j]`: an X was recognised over `[i, j)`. Always complete.
#[derive(Clone, Debug)]
pub struct CykItem {
    pub category: Symbol,
    pub origin: Origin,
    pub from: usize,
    pub to: usize,
    pub fs: Option<NodeId>,
    pub children: Vec<ItemRef>,
}

/// `[A -> α . β, i, j]`: α was recognised over `[i, j)`.
#[derive(Clone, Debug)]
pub struct DottedItem {
    pub rule: RuleId,
    pub dot: usize,
    pub from: usize,
    pub to: usize,
    pub fs: Option<NodeId>,
    pub children: Vec<ItemRef>,
}

/// `[A -> α . γ . β, i, j]`: γ, which contains the head, was recognised over
/// `[i, j)`. Complete when both α and β are empty.
#[derive(Clone, Debug)]
pub struct DoubleDottedItem {
    pub rule: RuleId,
    pub left_dot: usize,
    pub right_dot: usize,
    pub from: usize,
    pub to: usize,
    pub fs: Option<NodeId>,
    pub children: Vec<ItemRef>,
}

/// A request to look for `nonterminal` over `[i, j)`. Never complete.
#[derive(Clone, Debug)]
pub struct GoalItem {
    pub nonterminal: Symbol,
    pub from: usize,
    pub to: usize,
}

#[derive(Clone, Debug)]
pub enum Item {
    Cyk(CykItem),
    Dotted(DottedItem),
    DoubleDotted(DoubleDottedItem),
    Goal(GoalItem),
}

/// The structural identity of an item, leaving out its feature structure and
/// children. Items with equal keys share a chart bucket.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum ItemKey {
    Cyk { category: Symbol, from: usize, to: usize },
    Dotted { rule: RuleId, dot: usize, from: usize, to: usize },
    DoubleDotted { rule: RuleId, left_dot: usize, right_dot: usize, from: usize, to: usize },
    Goal { nonterminal: Symbol, from: usize, to: usize },
}

impl ItemKey {
    pub fn span(&self) -> (usize, usize) {
        match *self {
            ItemKey::Cyk { from, to, .. } |
            ItemKey::Dotted { from, to, .. } |
            ItemKey::DoubleDotted { from, to, .. } |
            ItemKey::Goal { from, to, .. } => (from, to),
        }
    }
}

/// What every item variant offers the chart and the parsers.
pub trait ChartItem {
    fn key(&self) -> ItemKey;
    fn span(&self) -> (usize, usize);
    fn fs(&self) -> Option<NodeId>;
    fn children(&self) -> &[ItemRef];
    fn is_complete(&self, grammar: &Grammar) -> bool;
}

impl ChartItem for CykItem {
    fn key(&self) -> ItemKey {
        ItemKey::Cyk { category: self.category.clone(), from: self.from, to: self.to }
    }
    fn span(&self) -> (usize, usize) { (self.from, self.to) }
    fn fs(&self) -> Option<NodeId> { self.fs }
    fn children(&self) -> &[ItemRef] { &self.children }
    fn is_complete(&self, _: &Grammar) -> bool { true }
}

impl ChartItem for DottedItem {
    fn key(&self) -> ItemKey {
        ItemKey::Dotted { rule: self.rule, dot: self.dot, from: self.from, to: self.to }
    }
    fn span(&self) -> (usize, usize) { (self.from, self.to) }
    fn fs(&self) -> Option<NodeId> { self.fs }
    fn children(&self) -> &[ItemRef] { &self.children }
    fn is_complete(&self, grammar: &Grammar) -> bool {
        self.dot == grammar.rule(self.rule).rhs().len()
    }
}

impl DottedItem {
    pub fn next_symbol<'g>(&self, grammar: &'g Grammar) -> Option<&'g Symbol> {
        grammar.rule(self.rule).rhs().get(self.dot)
    }
}

impl ChartItem for DoubleDottedItem {
    fn key(&self) -> ItemKey {
        ItemKey::DoubleDotted {
            rule: self.rule,
            left_dot: self.left_dot,
            right_dot: self.right_dot,
            from: self.from,
            to: self.to,
        }
    }
    fn span(&self) -> (usize, usize) { (self.from, self.to) }
    fn fs(&self) -> Option<NodeId> { self.fs }
    fn children(&self) -> &[ItemRef] { &self.children }
    fn is_complete(&self, grammar: &Grammar) -> bool {
        self.left_dot == 0 && self.right_dot == grammar.rule(self.rule).rhs().len()
    }
}

impl DoubleDottedItem {
    /// The symbol just left of the recognised part, if any.
    pub fn left_neighbour<'g>(&self, grammar: &'g Grammar) -> Option<&'g Symbol> {
        self.left_dot.checked_sub(1).map(|i| &grammar.rule(self.rule).rhs()[i])
    }

    /// The symbol just right of the recognised part, if any.
    pub fn right_neighbour<'g>(&self, grammar: &'g Grammar) -> Option<&'g Symbol> {
        grammar.rule(self.rule).rhs().get(self.right_dot)
    }
}

impl ChartItem for GoalItem {
    fn key(&self) -> ItemKey {
        ItemKey::Goal { nonterminal: self.nonterminal.clone(), from: self.from, to: self.to }
    }
    fn span(&self) -> (usize, usize) { (self.from, self.to) }
    fn fs(&self) -> Option<NodeId> { None }
    fn children(&self) -> &[ItemRef] { &[] }
    fn is_complete(&self, _: &Grammar) -> bool { false }
}

macro_rules! each_variant {
    ($item:expr, $x:ident => $e:expr) => {
        match $item {
            Item::Cyk($x) => $e,
            Item::Dotted($x) => $e,
            Item::DoubleDotted($x) => $e,
            Item::Goal($x) => $e,
        }
    }
}

impl ChartItem for Item {
    fn key(&self) -> ItemKey { each_variant!(self, x => x.key()) }
    fn span(&self) -> (usize, usize) { each_variant!(self, x => x.span()) }
    fn fs(&self) -> Option<NodeId> { each_variant!(self, x => x.fs()) }
    fn children(&self) -> &[ItemRef] { each_variant!(self, x => x.children()) }
    fn is_complete(&self, grammar: &Grammar) -> bool { each_variant!(self, x => x.is_complete(grammar)) }
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Cyk(_) => ItemKind::Cyk,
            Item::Dotted(_) => ItemKind::Dotted,
            Item::DoubleDotted(_) => ItemKind::DoubleDotted,
            Item::Goal(_) => ItemKind::Goal,
        }
    }

    pub fn from(&self) -> usize { self.span().0 }

    pub fn to(&self) -> usize { self.span().1 }

    /// The category the item stands for: the left-hand side for rule items.
    pub fn category<'a>(&'a self, grammar: &'a Grammar) -> &'a Symbol {
        match self {
            Item::Cyk(x) => &x.category,
            Item::Dotted(x) => grammar.rule(x.rule).lhs(),
            Item::DoubleDotted(x) => grammar.rule(x.rule).lhs(),
            Item::Goal(x) => &x.nonterminal,
        }
    }

    /// The feature structure of the category the item stands for.
    pub fn category_fs(&self, arena: &FeatureArena) -> Option<NodeId> {
        match self {
            Item::Cyk(x) => x.fs,
            Item::Dotted(DottedItem { fs, .. }) |
            Item::DoubleDotted(DoubleDottedItem { fs, .. }) => fs.and_then(|fs| arena.feature(fs, LHS_LABEL)),
            Item::Goal(_) => None,
        }
    }

    /// Deep structural equality: same key, same origin, same children, and
    /// equal feature structures.
    pub fn is_equal_to(&self, other: &Item, arena: &FeatureArena) -> bool {
        if self.key() != other.key() || self.children() != other.children() {
            return false;
        }
        if let (Item::Cyk(a), Item::Cyk(b)) = (self, other) {
            if a.origin != b.origin {
                return false;
            }
        }
        match (self.fs(), other.fs()) {
            (None, None) => true,
            (Some(a), Some(b)) => arena.is_equal_to(a, b),
            _ => false,
        }
    }
}
