use std::collections::{HashMap, HashSet};

use derive_more::{Display, From};
use log::debug;

use crate::error::{Error, Result};
use crate::tfs::{FeatureArena, Label, NodeId};

// A grammar G is a tuple (N, T, R, S), where
//   N is the set of nonterminals (every left-hand side),
//   T is the set of preterminals and words a tagger may produce,
//   R is an ordered list of production rules, each with a head daughter
//     and optional unification constraints, and
//   S in N is the start symbol (by default the first rule's left-hand side).

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Debug, Display, From)]
pub struct Symbol(pub(crate) String);

impl Symbol {
    pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&str> for Symbol { fn from(s: &str) -> Self { Symbol(s.to_string()) } }

impl PartialEq<str> for Symbol {
    fn eq(&self, other: &str) -> bool { self.0 == other }
}

/// Label under which a rule's feature structure keeps its left-hand side.
pub const LHS_LABEL: &str = "0";

/// Label under which a rule's feature structure keeps the right-hand side
/// constituent at `position` (zero-based).
pub fn rhs_label(position: usize) -> Label {
    (position + 1).to_string()
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display)]
#[display(fmt = "r{}", _0)]
pub struct RuleId(pub(crate) usize);

#[derive(Clone, Debug)]
pub struct ProductionRule {
    pub(crate) lhs: Symbol,
    pub(crate) rhs: Vec<Symbol>,
    pub(crate) head: usize,
    pub(crate) fs: Option<NodeId>,
}

impl ProductionRule {
    pub fn new(lhs: impl Into<Symbol>, rhs: Vec<Symbol>, head: usize) -> Self {
        ProductionRule { lhs: lhs.into(), rhs, head, fs: None }
    }

    /// Shorthand for rules written as string slices, head on the first symbol.
    pub fn simple(lhs: &str, rhs: &[&str]) -> Self {
        Self::new(lhs, rhs.iter().map(|&s| s.into()).collect(), 0)
    }

    /// Attaches constraints; `fs` must live in the arena of the grammar the
    /// rule is handed to.
    pub fn with_fs(mut self, fs: NodeId) -> Self {
        self.fs = Some(fs);
        self
    }

    pub fn lhs(&self) -> &Symbol { &self.lhs }
    pub fn rhs(&self) -> &[Symbol] { &self.rhs }
    pub fn head(&self) -> usize { self.head }
    pub fn fs(&self) -> Option<NodeId> { self.fs }

    pub fn is_epsilon(&self) -> bool { self.rhs.is_empty() }

    pub fn head_symbol(&self) -> Option<&Symbol> { self.rhs.get(self.head) }

    pub fn left_corner(&self) -> Option<&Symbol> { self.rhs.first() }

    /// Same lhs, rhs and head, and equivalent constraints.
    pub fn is_equal_to(&self, other: &ProductionRule, arena: &FeatureArena) -> bool {
        self.lhs == other.lhs
            && self.rhs == other.rhs
            && self.head == other.head
            && match (self.fs, other.fs) {
                (None, None) => true,
                (Some(a), Some(b)) => arena.is_equal_to(a, b),
                _ => false,
            }
    }
}

type Relation = HashMap<Symbol, HashSet<Symbol>>;

#[derive(Debug)]
pub struct Grammar {
    rules: Vec<ProductionRule>,
    nonterminals: HashSet<Symbol>,
    start: Symbol,
    features: FeatureArena,
    left_corner: Relation,
    head_corner: Relation,
    by_lhs: HashMap<Symbol, Vec<RuleId>>,
    by_head: HashMap<Symbol, Vec<RuleId>>,
    by_left_corner: HashMap<Symbol, Vec<RuleId>>,
    by_rhs: HashMap<Vec<Symbol>, Vec<RuleId>>,
    epsilon: Vec<RuleId>,
}

impl Grammar {
    /// Builds a grammar whose start symbol is the first rule's left-hand side.
    /// The rules' feature structures must live in `features`.
    pub fn new(rules: Vec<ProductionRule>, features: FeatureArena) -> Result<Grammar> {
        let start = match rules.first() {
            Some(rule) => rule.lhs.clone(),
            None => return Err(Error::MalformedGrammar("a grammar needs at least one rule".into())),
        };
        for rule in &rules {
            if !rule.rhs.is_empty() && rule.head >= rule.rhs.len() {
                return Err(Error::malformed_rule(
                    rule.to_string(),
                    format!("head index {} outside of a right-hand side of length {}",
                            rule.head, rule.rhs.len())));
            }
            if rule.rhs.is_empty() && rule.head != 0 {
                return Err(Error::malformed_rule(rule.to_string(), "an empty rule cannot have a head"));
            }
            if let Some(fs) = rule.fs {
                if fs.0 >= features.len() {
                    return Err(Error::malformed_rule(rule.to_string(), "constraints outside of the grammar's arena"));
                }
            }
        }

        let nonterminals = rules.iter().map(|r| r.lhs.clone()).collect();
        let mut grammar = Grammar {
            left_corner: closure(&rules, ProductionRule::left_corner),
            head_corner: closure(&rules, ProductionRule::head_symbol),
            rules,
            nonterminals,
            start,
            features,
            by_lhs: HashMap::new(),
            by_head: HashMap::new(),
            by_left_corner: HashMap::new(),
            by_rhs: HashMap::new(),
            epsilon: Vec::new(),
        };
        grammar.index_rules();
        debug!("grammar with {} rules over {} nonterminals, start symbol {}",
               grammar.rules.len(), grammar.nonterminals.len(), grammar.start);
        Ok(grammar)
    }

    pub fn with_start(mut self, start: impl Into<Symbol>) -> Self {
        self.start = start.into();
        self
    }

    fn index_rules(&mut self) {
        for (i, rule) in self.rules.iter().enumerate() {
            let id = RuleId(i);
            self.by_lhs.entry(rule.lhs.clone()).or_default().push(id);
            self.by_rhs.entry(rule.rhs.clone()).or_default().push(id);
            if let Some(head) = rule.head_symbol() {
                self.by_head.entry(head.clone()).or_default().push(id);
            }
            match rule.left_corner() {
                Some(lc) => self.by_left_corner.entry(lc.clone()).or_default().push(id),
                None => self.epsilon.push(id),
            }
        }
    }

    pub fn rules(&self) -> &[ProductionRule] { &self.rules }

    pub fn rule(&self, id: RuleId) -> &ProductionRule { &self.rules[id.0] }

    pub fn rule_ids(&self) -> impl Iterator<Item = RuleId> { (0..self.rules.len()).map(RuleId) }

    pub fn start_symbol(&self) -> &Symbol { &self.start }

    pub fn nonterminals(&self) -> &HashSet<Symbol> { &self.nonterminals }

    pub fn is_nonterminal(&self, symbol: &Symbol) -> bool { self.nonterminals.contains(symbol) }

    /// Arena holding the rules' feature structures.
    pub fn features(&self) -> &FeatureArena { &self.features }

    pub fn rules_for(&self, lhs: &Symbol) -> &[RuleId] {
        self.by_lhs.get(lhs).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn rules_headed_by(&self, head: &Symbol) -> &[RuleId] {
        self.by_head.get(head).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn rules_with_left_corner(&self, symbol: &Symbol) -> &[RuleId] {
        self.by_left_corner.get(symbol).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn rules_with_rhs(&self, rhs: &[Symbol]) -> &[RuleId] {
        self.by_rhs.get(rhs).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn epsilon_rules(&self) -> &[RuleId] { &self.epsilon }

    /// Is `corner` reachable from `symbol` by repeatedly taking the first
    /// symbol of a right-hand side?
    pub fn is_left_corner(&self, symbol: &Symbol, corner: &Symbol) -> bool {
        symbol == corner || self.left_corner.get(symbol).map_or(false, |s| s.contains(corner))
    }

    /// Is `corner` reachable from `symbol` by repeatedly taking the head of a
    /// right-hand side?
    pub fn is_head_corner(&self, symbol: &Symbol, corner: &Symbol) -> bool {
        symbol == corner || self.head_corner.get(symbol).map_or(false, |s| s.contains(corner))
    }

    pub fn left_corners(&self, symbol: &Symbol) -> Option<&HashSet<Symbol>> {
        self.left_corner.get(symbol)
    }

    pub fn head_corners(&self, symbol: &Symbol) -> Option<&HashSet<Symbol>> {
        self.head_corner.get(symbol)
    }
}

/// Reflexive-transitive closure of the relation "`direct(rule)` is a corner
/// of `rule.lhs`", computed by iterating until nothing changes.
fn closure<'r>(
    rules: &'r [ProductionRule],
    direct: impl Fn(&'r ProductionRule) -> Option<&'r Symbol>,
) -> Relation {
    let mut relation: Relation = HashMap::new();
    for rule in rules {
        relation.entry(rule.lhs.clone()).or_default().insert(rule.lhs.clone());
        for symbol in &rule.rhs {
            relation.entry(symbol.clone()).or_default().insert(symbol.clone());
        }
        if let Some(corner) = direct(rule) {
            relation.entry(rule.lhs.clone()).or_default().insert(corner.clone());
        }
    }

    let mut rounds = 0;
    loop {
        rounds += 1;
        let mut changed = false;
        let symbols: Vec<Symbol> = relation.keys().cloned().collect();
        for a in &symbols {
            let reached: Vec<Symbol> = relation[a].iter().cloned().collect();
            let mut extension = Vec::new();
            for b in reached.iter().filter(|&b| b != a) {
                for c in &relation[b] {
                    if !relation[a].contains(c) {
                        extension.push(c.clone());
                    }
                }
            }
            if !extension.is_empty() {
                changed = true;
                if let Some(set) = relation.get_mut(a) {
                    set.extend(extension);
                }
            }
        }
        if !changed {
            break;
        }
    }
    debug!("corner relation closed after {} rounds", rounds);
    relation
}

#[cfg(test)]
#[path = "tests/grammar.rs"]
mod tests_for_grammar;
