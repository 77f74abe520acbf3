use derive_more::Display;
use log::{debug, trace, warn};

use crate::agenda::Agenda;
use crate::chart::Chart;
use crate::config::ParserConfig;
use crate::grammar::Grammar;
use crate::item::{ChartItem, CykItem, DottedItem, GoalItem, Item, ItemKind, ItemRef, Origin};
use crate::lattice::TypeLattice;
use crate::lexicon::{Tag, TaggedSentence};
use crate::specification_rules::{cyk, Deduction};
use crate::tfs::NodeId;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display)]
pub enum Strategy {
    #[display(fmt = "CYK")]
    Cyk,
    #[display(fmt = "Earley")]
    Earley,
    #[display(fmt = "left-corner")]
    LeftCorner,
    #[display(fmt = "head-corner")]
    HeadCorner,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [Strategy::Cyk, Strategy::Earley, Strategy::LeftCorner, Strategy::HeadCorner];

    /// The kind of item a full parse shows up as.
    pub fn full_parse_kind(self) -> ItemKind {
        match self {
            Strategy::Cyk | Strategy::HeadCorner => ItemKind::Cyk,
            Strategy::Earley | Strategy::LeftCorner => ItemKind::Dotted,
        }
    }
}

/// A chart parser for one grammar, signature and strategy. Parsing never
/// changes the parser, so one parser can be used for any number of sentences.
pub struct Parser<'g> {
    strategy: Strategy,
    grammar: &'g Grammar,
    lattice: &'g TypeLattice,
    config: ParserConfig,
}

impl<'g> Parser<'g> {
    pub fn new(strategy: Strategy, grammar: &'g Grammar, lattice: &'g TypeLattice, config: ParserConfig) -> Self {
        Parser { strategy, grammar, lattice, config }
    }

    pub fn strategy(&self) -> Strategy { self.strategy }

    pub fn grammar(&self) -> &'g Grammar { self.grammar }

    pub fn config(&self) -> &ParserConfig { &self.config }

    pub fn full_parse_kind(&self) -> ItemKind { self.strategy.full_parse_kind() }

    pub fn parse(&self, sentence: &TaggedSentence) -> Chart {
        let mut chart = Chart::new(sentence.len(), self.grammar.features().clone());
        self.initialise(sentence, &mut chart);
        match self.strategy {
            Strategy::Cyk => self.run_cyk(&mut chart),
            Strategy::Earley | Strategy::LeftCorner => self.run_earley(&mut chart),
            Strategy::HeadCorner => self.run_head_corner(&mut chart),
        }
        debug!("{} parse of {} tokens: {}", self.strategy, sentence.len(), chart.summary());
        chart
    }

    pub fn full_parse_items(&self, chart: &Chart) -> Vec<ItemRef> {
        chart.full_parse_items(self.grammar, self.grammar.start_symbol(), self.full_parse_kind())
    }

    pub fn parse_trees(&self, chart: &Chart) -> Vec<String> {
        chart.parse_trees(self.grammar, self.grammar.start_symbol(), self.full_parse_kind())
    }

    /// Puts a word item and its tag items on the chart for every token.
    fn initialise(&self, sentence: &TaggedSentence, chart: &mut Chart) {
        let path = &self.config.lexical_category_path;
        for (i, token) in sentence.tokens().iter().enumerate() {
            let word = CykItem {
                category: token.word.as_str().into(),
                origin: Origin::Word,
                from: i,
                to: i + 1,
                fs: None,
                children: vec![],
            };
            let word = match chart.add_item(Item::Cyk(word)) {
                Some(r) => r,
                None => continue,
            };
            for tag in &token.tags {
                let category = match tag.category(path) {
                    Some(category) => category,
                    None => {
                        warn!("tag of `{}` has no category at {:?}", token.word, path);
                        continue;
                    }
                };
                let tagged = CykItem {
                    category,
                    origin: Origin::Tag,
                    from: i,
                    to: i + 1,
                    fs: self.tag_fs(tag, chart),
                    children: vec![word],
                };
                chart.add_item(Item::Cyk(tagged));
            }
        }
    }

    fn tag_fs(&self, tag: &Tag, chart: &mut Chart) -> Option<NodeId> {
        match tag {
            Tag::Structure(fs) if self.config.unification && !self.config.list_of_categories => {
                Some(chart.features_mut().import(fs.arena(), fs.root()))
            }
            _ => None,
        }
    }

    fn deduction<'p>(&'p self, chart: &'p mut Chart, agenda: Option<&'p mut Agenda>) -> Deduction<'p> {
        Deduction { grammar: self.grammar, lattice: self.lattice, config: &self.config, chart, agenda }
    }

    fn run_cyk(&self, chart: &mut Chart) {
        let n = chart.size();
        let mut ded = self.deduction(chart, None);
        for length in 1..=n {
            for i in 0..=(n - length) {
                let added = cyk::fill_span(&mut ded, i, i + length);
                trace!("cyk [{}, {}]: {} new items", i, i + length, added);
            }
        }
    }

    /// Seeds the start symbol's rules at position 0, then closes every
    /// position in turn until no item ending there is added any more.
    fn run_earley(&self, chart: &mut Chart) {
        for &rule in self.grammar.rules_for(self.grammar.start_symbol()) {
            let fs = if self.config.unification { self.grammar.rule(rule).fs() } else { None };
            chart.add_item(Item::Dotted(DottedItem { rule, dot: 0, from: 0, to: 0, fs, children: vec![] }));
        }

        let n = chart.size();
        let strategy = self.strategy;
        let mut ded = self.deduction(chart, None);
        for position in 0..=n {
            // Only a complete empty item at this position can meet partners
            // that show up after it was first combined.
            let mut done: Vec<ItemRef> = Vec::new();
            let mut rounds = 0;
            loop {
                rounds += 1;
                let before = ded.chart.nr_items_to(position);
                let ending: Vec<ItemRef> = ded.chart.items_to(position).collect();
                for r in ending {
                    let item = ded.chart.item(r).clone();
                    let empty = item.span() == (position, position) && item.is_complete(self.grammar);
                    if done.contains(&r) {
                        if !empty {
                            continue;
                        }
                    } else {
                        done.push(r);
                    }
                    item.combine_with_chart(r, strategy, &mut ded);
                }
                if ded.chart.nr_items_to(position) == before {
                    break;
                }
            }
            trace!("position {} closed after {} rounds", position, rounds);
        }
    }

    /// Seeds goals for the start symbol over every span and runs the agenda
    /// until it is empty.
    fn run_head_corner(&self, chart: &mut Chart) {
        let n = chart.size();
        let mut agenda = Agenda::new();
        for from in 0..=n {
            for to in from..=n {
                let goal = GoalItem { nonterminal: self.grammar.start_symbol().clone(), from, to };
                agenda.add_item(Item::Goal(goal), chart);
            }
        }

        let mut steps = 0;
        while let Some(item) = agenda.pop() {
            let r = match chart.add_item(item.clone()) {
                Some(r) => r,
                None => continue,
            };
            steps += 1;
            let mut ded = self.deduction(chart, Some(&mut agenda));
            item.combine_with_chart(r, Strategy::HeadCorner, &mut ded);
        }
        debug!("head-corner agenda drained after {} steps", steps);
    }
}

#[cfg(test)]
#[path = "tests/parser.rs"]
mod tests_for_parser;
