use std::fmt;

use linear_map::LinearMap;
use log::trace;

use crate::grammar::{Grammar, Symbol};
use crate::item::{ChartItem, Item, ItemKey, ItemKind, ItemRef, Origin};
use crate::rendering::{ParseTree, Rendered};
use crate::tfs::FeatureArena;

type CellMap<K, V> = LinearMap<K, V>;

/// The items recognised so far over a sentence of `size` tokens, indexed by
/// the positions they start and end at.
///
/// The chart owns the arena in which its items' feature structures live. It
/// starts out as a copy of the grammar's arena, so the rules' structures can
/// be unified with item structures directly.
#[derive(Debug)]
pub struct Chart {
    size: usize,
    items: Vec<Item>,
    /// `outgoing[i]` holds, per key, the items starting at position i.
    outgoing: Vec<CellMap<ItemKey, Vec<ItemRef>>>,
    /// `incoming[j]` holds, per key, the items ending at position j.
    incoming: Vec<CellMap<ItemKey, Vec<ItemRef>>>,
    ending_at: Vec<usize>,
    features: FeatureArena,
}

impl Chart {
    pub fn new(size: usize, features: FeatureArena) -> Self {
        Chart {
            size,
            items: Vec::new(),
            outgoing: (0..=size).map(|_| CellMap::new()).collect(),
            incoming: (0..=size).map(|_| CellMap::new()).collect(),
            ending_at: vec![0; size + 1],
            features,
        }
    }

    /// Number of tokens; positions run from 0 to `size`.
    pub fn size(&self) -> usize { self.size }

    pub fn len(&self) -> usize { self.items.len() }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn features(&self) -> &FeatureArena { &self.features }

    pub(crate) fn features_mut(&mut self) -> &mut FeatureArena { &mut self.features }

    pub fn item(&self, r: ItemRef) -> &Item { &self.items[r.0] }

    pub fn items(&self) -> impl Iterator<Item = (ItemRef, &Item)> {
        self.items.iter().enumerate().map(|(i, item)| (ItemRef(i), item))
    }

    /// Is an item deeply equal to `item` already on the chart?
    pub fn contains(&self, item: &Item) -> bool {
        self.find(item).is_some()
    }

    fn find(&self, item: &Item) -> Option<ItemRef> {
        let (from, _) = item.span();
        self.outgoing
            .get(from)?
            .get(&item.key())?
            .iter()
            .copied()
            .find(|&r| self.items[r.0].is_equal_to(item, &self.features))
    }

    /// Adds `item` unless an equal one is present; returns the new item's
    /// reference, or `None` when nothing was added.
    pub fn add_item(&mut self, item: Item) -> Option<ItemRef> {
        let (from, to) = item.span();
        assert!(from <= to && to <= self.size, "item span [{}, {}] outside of the chart", from, to);
        if self.contains(&item) {
            return None;
        }
        let r = ItemRef(self.items.len());
        let key = item.key();
        trace!("chart {}: {:?}", r, key);
        push_to(&mut self.outgoing[from], key.clone(), r);
        push_to(&mut self.incoming[to], key, r);
        self.ending_at[to] += 1;
        self.items.push(item);
        Some(r)
    }

    pub fn items_from(&self, i: usize) -> impl Iterator<Item = ItemRef> + '_ {
        self.outgoing[i].values().flat_map(|v| v.iter().copied())
    }

    pub fn items_to(&self, j: usize) -> impl Iterator<Item = ItemRef> + '_ {
        self.incoming[j].values().flat_map(|v| v.iter().copied())
    }

    pub fn items_spanning(&self, i: usize, j: usize) -> impl Iterator<Item = ItemRef> + '_ {
        self.outgoing[i]
            .iter()
            .filter(move |(key, _)| key.span().1 == j)
            .flat_map(|(_, v)| v.iter().copied())
    }

    /// Complete items over `[i, j]` that stand for `symbol`.
    pub fn complete_items_spanning<'c>(
        &'c self,
        grammar: &'c Grammar,
        i: usize,
        j: usize,
        symbol: &'c Symbol,
    ) -> impl Iterator<Item = ItemRef> + 'c {
        self.items_spanning(i, j).filter(move |&r| {
            let item = self.item(r);
            item.is_complete(grammar) && item.category(grammar) == symbol
        })
    }

    pub fn nr_items_to(&self, j: usize) -> usize { self.ending_at[j] }

    /// Complete items of the given kind spanning the whole sentence whose
    /// category is `start`.
    pub fn full_parse_items(&self, grammar: &Grammar, start: &Symbol, kind: ItemKind) -> Vec<ItemRef> {
        self.complete_items_spanning(grammar, 0, self.size, start)
            .filter(|&r| {
                let item = self.item(r);
                item.kind() == kind && !matches!(item, Item::Cyk(c) if c.origin == Origin::Word)
            })
            .collect()
    }

    /// Bracketed renderings of the full parses, sorted.
    pub fn parse_trees(&self, grammar: &Grammar, start: &Symbol, kind: ItemKind) -> Vec<String> {
        let mut trees: Vec<String> = self
            .full_parse_items(grammar, start, kind)
            .into_iter()
            .map(|root| ParseTree::new(self, grammar, root).rendered())
            .collect();
        trees.sort();
        trees
    }

    pub fn summary(&self) -> ChartSummary {
        let mut summary = ChartSummary { positions: self.size + 1, ..ChartSummary::default() };
        for item in &self.items {
            match item.kind() {
                ItemKind::Cyk => summary.cyk += 1,
                ItemKind::Dotted => summary.dotted += 1,
                ItemKind::DoubleDotted => summary.double_dotted += 1,
                ItemKind::Goal => summary.goal += 1,
            }
        }
        summary
    }
}

fn push_to(cell: &mut CellMap<ItemKey, Vec<ItemRef>>, key: ItemKey, r: ItemRef) {
    match cell.get_mut(&key) {
        Some(bucket) => bucket.push(r),
        None => { cell.insert(key, vec![r]); }
    }
}

/// Item counts per kind.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct ChartSummary {
    pub positions: usize,
    pub cyk: usize,
    pub dotted: usize,
    pub double_dotted: usize,
    pub goal: usize,
}

impl ChartSummary {
    pub fn total(&self) -> usize { self.cyk + self.dotted + self.double_dotted + self.goal }
}

impl fmt::Display for ChartSummary {
    fn fmt(&self, w: &mut fmt::Formatter) -> fmt::Result {
        write!(w, "{} items over {} positions (cyk: {}, dotted: {}, double-dotted: {}, goal: {})",
               self.total(), self.positions, self.cyk, self.dotted, self.double_dotted, self.goal)
    }
}

#[cfg(test)]
#[path = "tests/chart.rs"]
mod tests_for_chart;
