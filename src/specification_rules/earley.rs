//! Earley and Left-Corner deduction over dotted items.

use log::trace;

use crate::grammar::{rhs_label, LHS_LABEL};
use crate::item::{ChartItem, DottedItem, Item, ItemRef};
use crate::parser::Strategy;
use crate::tfs::NodeId;

use super::Deduction;

pub(crate) fn combine(item: &Item, me: ItemRef, strategy: Strategy, ded: &mut Deduction) -> usize {
    let mut added = 0;
    if item.is_complete(ded.grammar) {
        added += complete(item, me, ded);
        if strategy == Strategy::LeftCorner {
            added += left_corner_predict(item, me, ded);
        }
    } else if let Item::Dotted(dotted) = item {
        added += match strategy {
            Strategy::LeftCorner => left_corner_predict_empty(dotted, ded),
            _ => predict(dotted, ded),
        };
    }
    added
}

//  [A -> α . B β, i, j]
//  B -> γ
//  unify(B -> γ, B of the first item) succeeds
// ---------------------------------------------- Predict
//  [B -> . γ, j, j]
//
// The predicted item keeps the rule's own structure: the inherited
// constraints only decide whether the rule is predicted at all.
fn predict(item: &DottedItem, ded: &mut Deduction) -> usize {
    let grammar = ded.grammar;
    let symbol = match item.next_symbol(grammar) {
        Some(symbol) => symbol,
        None => return 0,
    };
    let inherited = slot_fs(ded, item.fs, item.dot);

    let mut added = 0;
    for &rule in grammar.rules_for(symbol) {
        let fs = ded.rule_fs(grammar.rule(rule).fs());
        if let (Some(fs), Some(inherited)) = (fs, inherited) {
            if ded.absorb(Some(fs), LHS_LABEL, Some(inherited)).is_err() {
                trace!("not predicting {} at {}", grammar.rule(rule), item.to);
                continue;
            }
        }
        let predicted = DottedItem { rule, dot: 0, from: item.to, to: item.to, fs, children: vec![] };
        if ded.emit(Item::Dotted(predicted)) {
            added += 1;
        }
    }
    added
}

//  [A -> α . B β, i, k]
//  [B, k, j]                 (any complete item standing for B)
// ------------------------------------------------------------- Complete
//  [A -> α B . β, i, j]
fn complete(item: &Item, me: ItemRef, ded: &mut Deduction) -> usize {
    let grammar = ded.grammar;
    let (from, to) = item.span();
    let category = item.category(grammar);
    let constituent = item.category_fs(ded.chart.features());

    let waiting: Vec<DottedItem> = ded
        .chart
        .items_to(from)
        .filter_map(|r| match ded.chart.item(r) {
            Item::Dotted(d) if d.next_symbol(grammar) == Some(category) => Some(d.clone()),
            _ => None,
        })
        .collect();

    let mut added = 0;
    for d in waiting {
        let fs = match ded.absorb(d.fs, &rhs_label(d.dot), constituent) {
            Ok(fs) => fs,
            Err(_) => continue,
        };
        let mut children = d.children.clone();
        children.push(me);
        let advanced = DottedItem { rule: d.rule, dot: d.dot + 1, from: d.from, to, fs, children };
        if ded.emit(Item::Dotted(advanced)) {
            added += 1;
        }
    }
    added
}

//  [C -> α . D β, i, j]
//  [B, j, k]                 (any complete item standing for B)
//  A -> B γ
//  A is a left corner of D
// ------------------------------------------------------------- LC-Predict
//  [A -> B . γ, j, k]
fn left_corner_predict(item: &Item, me: ItemRef, ded: &mut Deduction) -> usize {
    let grammar = ded.grammar;
    let (from, to) = item.span();
    let category = item.category(grammar);
    let constituent = item.category_fs(ded.chart.features());

    let wanted: Vec<_> = ded
        .chart
        .items_to(from)
        .filter_map(|r| match ded.chart.item(r) {
            Item::Dotted(d) => d.next_symbol(grammar),
            _ => None,
        })
        .collect();

    let mut added = 0;
    for &rule in grammar.rules_with_left_corner(category) {
        let lhs = grammar.rule(rule).lhs();
        if !wanted.iter().any(|&d| grammar.is_left_corner(d, lhs)) {
            continue;
        }
        let fs = ded.rule_fs(grammar.rule(rule).fs());
        let fs = match ded.absorb(fs, &rhs_label(0), constituent) {
            Ok(fs) => fs,
            Err(_) => continue,
        };
        let predicted = DottedItem { rule, dot: 1, from, to, fs, children: vec![me] };
        if ded.emit(Item::Dotted(predicted)) {
            added += 1;
        }
    }
    added
}

//  [C -> α . D β, i, j]
//  A -> ε
//  A is a left corner of D
// ------------------------------------------------------------- LC-Predict-Empty
//  [A -> ., j, j]
fn left_corner_predict_empty(item: &DottedItem, ded: &mut Deduction) -> usize {
    let grammar = ded.grammar;
    let wanted = match item.next_symbol(grammar) {
        Some(symbol) => symbol,
        None => return 0,
    };
    let mut added = 0;
    for &rule in grammar.epsilon_rules() {
        if !grammar.is_left_corner(wanted, grammar.rule(rule).lhs()) {
            continue;
        }
        let fs = ded.rule_fs(grammar.rule(rule).fs());
        let empty = DottedItem { rule, dot: 0, from: item.to, to: item.to, fs, children: vec![] };
        if ded.emit(Item::Dotted(empty)) {
            added += 1;
        }
    }
    added
}

/// The structure sitting in the slot of right-hand side position `position`.
fn slot_fs(ded: &Deduction, fs: Option<NodeId>, position: usize) -> Option<NodeId> {
    if !ded.config.unification {
        return None;
    }
    fs.and_then(|fs| ded.chart.features().feature(fs, &rhs_label(position)))
}
