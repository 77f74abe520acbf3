//! Deduction rules of the parsing strategies, written down next to the
//! inference rules they implement.
//!
//! Notation: `[X, i, j]` is a `Cyk` item, `[A -> α . β, i, j]` a dotted item,
//! `[A -> α . γ . β, i, j]` a double-dotted item and `[goal X, i, j]` a goal.
//! Whenever two items combine, the feature structure of the consumed
//! constituent is unified into the slot it fills; combinations whose
//! unification fails are dropped.

use log::trace;

use crate::agenda::Agenda;
use crate::chart::Chart;
use crate::config::ParserConfig;
use crate::grammar::Grammar;
use crate::item::{ChartItem, Item, ItemRef};
use crate::lattice::TypeLattice;
use crate::parser::Strategy;
use crate::tfs::NodeId;

pub(crate) mod cyk;
pub(crate) mod earley;
pub(crate) mod head_corner;

/// A unification inside a deduction step failed.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) struct Clash;

/// Everything a deduction step reads or writes.
pub(crate) struct Deduction<'p> {
    pub(crate) grammar: &'p Grammar,
    pub(crate) lattice: &'p TypeLattice,
    pub(crate) config: &'p ParserConfig,
    pub(crate) chart: &'p mut Chart,
    /// Present for agenda-driven strategies; deduced items go here instead of
    /// straight onto the chart.
    pub(crate) agenda: Option<&'p mut Agenda>,
}

impl<'p> Deduction<'p> {
    /// Hands a deduced item on. Returns whether it was new.
    pub(crate) fn emit(&mut self, item: Item) -> bool {
        match self.agenda.as_deref_mut() {
            Some(agenda) => agenda.add_item(item, self.chart),
            None => self.chart.add_item(item).is_some(),
        }
    }

    /// Unifies `constituent` into `fs` under `label`.
    ///
    /// Without unification, or when either side carries no structure, there
    /// is nothing to check and `fs` is passed through.
    pub(crate) fn absorb(&mut self, fs: Option<NodeId>, label: &str, constituent: Option<NodeId>) -> Result<Option<NodeId>, Clash> {
        if !self.config.unification {
            return Ok(None);
        }
        match (fs, constituent) {
            (Some(fs), Some(constituent)) => {
                let arena = self.chart.features_mut();
                let wrapped = arena.wrap(label, constituent);
                let result = arena.unify(self.lattice, fs, wrapped);
                if arena.is_top(result) {
                    trace!("clash on {} of {}", label, fs);
                    Err(Clash)
                } else {
                    Ok(Some(result))
                }
            }
            (fs, _) => Ok(fs),
        }
    }

    /// The structure of a rule as a fresh item starts out with.
    pub(crate) fn rule_fs(&self, fs: Option<NodeId>) -> Option<NodeId> {
        if self.config.unification { fs } else { None }
    }
}

impl Item {
    /// Runs every deduction rule of `strategy` in which this item, already on
    /// the chart as `me`, takes part. Returns the number of new items.
    pub(crate) fn combine_with_chart(&self, me: ItemRef, strategy: Strategy, ded: &mut Deduction) -> usize {
        match strategy {
            // CYK fills the chart span by span instead; see `cyk::fill_span`.
            Strategy::Cyk => 0,
            Strategy::Earley | Strategy::LeftCorner => earley::combine(self, me, strategy, ded),
            Strategy::HeadCorner => head_corner::combine(self, me, ded),
        }
    }
}
