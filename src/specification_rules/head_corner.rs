//! Head-Corner deduction: rules are recognised from their head outwards,
//! steered by goals.

use log::trace;

use crate::grammar::{rhs_label, Symbol, LHS_LABEL};
use crate::item::{ChartItem, CykItem, DoubleDottedItem, GoalItem, Item, ItemRef, Origin};

use super::Deduction;

pub(crate) fn combine(item: &Item, me: ItemRef, ded: &mut Deduction) -> usize {
    match item {
        Item::Goal(goal) => predict_within(goal, ded) + predict_empty(goal, ded),
        Item::Cyk(cyk) => predict_around(cyk, me, ded) + complete_neighbours_of(cyk, me, ded),
        Item::DoubleDotted(dd) if dd.is_complete(ded.grammar) => finish(dd, ded),
        Item::DoubleDotted(dd) => {
            predict_left(dd, ded) + predict_right(dd, ded) + complete_from_neighbours(dd, ded)
        }
        Item::Dotted(_) => 0,
    }
}

//  [goal X, i, j]
//  [Y, k, l]               i <= k, l <= j
//  A -> α Y β              Y the head
//  A is a head corner of X
// ------------------------------------------ HC-Predict
//  [A -> α . Y . β, k, l]
fn head_corner_predict(goal: &GoalItem, (r, cyk): (ItemRef, &CykItem), ded: &mut Deduction) -> usize {
    if cyk.from < goal.from || goal.to < cyk.to {
        return 0;
    }
    let grammar = ded.grammar;
    let mut added = 0;
    for &rule in grammar.rules_headed_by(&cyk.category) {
        let production = grammar.rule(rule);
        if !grammar.is_head_corner(&goal.nonterminal, production.lhs()) {
            continue;
        }
        let head = production.head();
        let fs = match ded.absorb(ded.rule_fs(production.fs()), &rhs_label(head), cyk.fs) {
            Ok(fs) => fs,
            Err(_) => continue,
        };
        let predicted = DoubleDottedItem {
            rule,
            left_dot: head,
            right_dot: head + 1,
            from: cyk.from,
            to: cyk.to,
            fs,
            children: vec![r],
        };
        if ded.emit(Item::DoubleDotted(predicted)) {
            added += 1;
        }
    }
    added
}

fn predict_within(goal: &GoalItem, ded: &mut Deduction) -> usize {
    let chart = &*ded.chart;
    let inside: Vec<(ItemRef, CykItem)> = (goal.from..=goal.to)
        .flat_map(|k| chart.items_from(k))
        .filter_map(|r| match chart.item(r) {
            Item::Cyk(c) if c.to <= goal.to => Some((r, c.clone())),
            _ => None,
        })
        .collect();
    inside.iter().map(|(r, c)| head_corner_predict(goal, (*r, c), ded)).sum()
}

fn predict_around(cyk: &CykItem, me: ItemRef, ded: &mut Deduction) -> usize {
    let chart = &*ded.chart;
    let size = chart.size();
    let goals: Vec<GoalItem> = (0..=cyk.from)
        .flat_map(|i| (cyk.to..=size).map(move |j| (i, j)))
        .flat_map(|(i, j)| chart.items_spanning(i, j))
        .filter_map(|r| match chart.item(r) {
            Item::Goal(g) => Some(g.clone()),
            _ => None,
        })
        .collect();
    goals.iter().map(|goal| head_corner_predict(goal, (me, cyk), ded)).sum()
}

//  [goal X, i, j]
//  A -> ε
//  A is a head corner of X
// ------------------------------------------ HC-Predict-Empty
//  [A -> . ., k, k]        i <= k <= j
fn predict_empty(goal: &GoalItem, ded: &mut Deduction) -> usize {
    let grammar = ded.grammar;
    let mut added = 0;
    for &rule in grammar.epsilon_rules() {
        if !grammar.is_head_corner(&goal.nonterminal, grammar.rule(rule).lhs()) {
            continue;
        }
        for k in goal.from..=goal.to {
            let empty = DoubleDottedItem {
                rule,
                left_dot: 0,
                right_dot: 0,
                from: k,
                to: k,
                fs: ded.rule_fs(grammar.rule(rule).fs()),
                children: vec![],
            };
            if ded.emit(Item::DoubleDotted(empty)) {
                added += 1;
            }
        }
    }
    added
}

//  [A -> α B . γ . β, k, l]
// ------------------------------------------ Left-Predict
//  [goal B, i, k]          i <= k
fn predict_left(dd: &DoubleDottedItem, ded: &mut Deduction) -> usize {
    match dd.left_neighbour(ded.grammar) {
        Some(wanted) => (0..=dd.from).map(|i| goal(ded, wanted, i, dd.from)).sum(),
        None => 0,
    }
}

//  [A -> α . γ . C β, i, k]
// ------------------------------------------ Right-Predict
//  [goal C, k, j]          k <= j
fn predict_right(dd: &DoubleDottedItem, ded: &mut Deduction) -> usize {
    let size = ded.chart.size();
    match dd.right_neighbour(ded.grammar) {
        Some(wanted) => (dd.to..=size).map(|j| goal(ded, wanted, dd.to, j)).sum(),
        None => 0,
    }
}

/// Words and tags are on the chart from the start, so only nonterminals are
/// worth a goal.
fn goal(ded: &mut Deduction, wanted: &Symbol, from: usize, to: usize) -> usize {
    if !ded.grammar.is_nonterminal(wanted) {
        return 0;
    }
    let goal = GoalItem { nonterminal: wanted.clone(), from, to };
    usize::from(ded.emit(Item::Goal(goal)))
}

//  [A -> α B . γ . β, k, l]
//  [B, i, k]
// ------------------------------------------ Left-Complete
//  [A -> α . B γ . β, i, l]
fn left_complete(dd: &DoubleDottedItem, (r, cyk): (ItemRef, &CykItem), ded: &mut Deduction) -> usize {
    let position = dd.left_dot - 1;
    let fs = match ded.absorb(dd.fs, &rhs_label(position), cyk.fs) {
        Ok(fs) => fs,
        Err(_) => return 0,
    };
    let mut children = Vec::with_capacity(dd.children.len() + 1);
    children.push(r);
    children.extend(dd.children.iter().copied());
    let extended = DoubleDottedItem { left_dot: position, from: cyk.from, fs, children, ..dd.clone() };
    usize::from(ded.emit(Item::DoubleDotted(extended)))
}

//  [A -> α . γ . C β, i, k]
//  [C, k, l]
// ------------------------------------------ Right-Complete
//  [A -> α . γ C . β, i, l]
fn right_complete(dd: &DoubleDottedItem, (r, cyk): (ItemRef, &CykItem), ded: &mut Deduction) -> usize {
    let fs = match ded.absorb(dd.fs, &rhs_label(dd.right_dot), cyk.fs) {
        Ok(fs) => fs,
        Err(_) => return 0,
    };
    let mut children = dd.children.clone();
    children.push(r);
    let extended = DoubleDottedItem { right_dot: dd.right_dot + 1, to: cyk.to, fs, children, ..dd.clone() };
    usize::from(ded.emit(Item::DoubleDotted(extended)))
}

fn complete_from_neighbours(dd: &DoubleDottedItem, ded: &mut Deduction) -> usize {
    let grammar = ded.grammar;
    let mut added = 0;
    if let Some(wanted) = dd.left_neighbour(grammar) {
        for (r, cyk) in constituents(ded, ded.chart.items_to(dd.from), wanted) {
            added += left_complete(dd, (r, &cyk), ded);
        }
    }
    if let Some(wanted) = dd.right_neighbour(grammar) {
        for (r, cyk) in constituents(ded, ded.chart.items_from(dd.to), wanted) {
            added += right_complete(dd, (r, &cyk), ded);
        }
    }
    added
}

fn complete_neighbours_of(cyk: &CykItem, me: ItemRef, ded: &mut Deduction) -> usize {
    let grammar = ded.grammar;
    let waiting_right: Vec<DoubleDottedItem> = double_dotted(ded, ded.chart.items_to(cyk.from))
        .into_iter()
        .filter(|dd| dd.right_neighbour(grammar) == Some(&cyk.category))
        .collect();
    let waiting_left: Vec<DoubleDottedItem> = double_dotted(ded, ded.chart.items_from(cyk.to))
        .into_iter()
        .filter(|dd| dd.left_neighbour(grammar) == Some(&cyk.category))
        .collect();

    let mut added = 0;
    for dd in &waiting_right {
        added += right_complete(dd, (me, cyk), ded);
    }
    for dd in &waiting_left {
        added += left_complete(dd, (me, cyk), ded);
    }
    added
}

//  [A -> . γ ., i, j]
// ------------------------------------------ HC-Complete
//  [A, i, j]
fn finish(dd: &DoubleDottedItem, ded: &mut Deduction) -> usize {
    let category = ded.grammar.rule(dd.rule).lhs().clone();
    trace!("head corner finished {} over [{}, {}]", category, dd.from, dd.to);
    let fs = dd.fs.and_then(|fs| ded.chart.features().feature(fs, LHS_LABEL));
    let item = CykItem {
        category,
        origin: Origin::Rule(dd.rule),
        from: dd.from,
        to: dd.to,
        fs,
        children: dd.children.clone(),
    };
    usize::from(ded.emit(Item::Cyk(item)))
}

fn constituents(
    ded: &Deduction,
    refs: impl Iterator<Item = ItemRef>,
    wanted: &Symbol,
) -> Vec<(ItemRef, CykItem)> {
    refs.filter_map(|r| match ded.chart.item(r) {
        Item::Cyk(c) if &c.category == wanted => Some((r, c.clone())),
        _ => None,
    })
    .collect()
}

fn double_dotted(ded: &Deduction, refs: impl Iterator<Item = ItemRef>) -> Vec<DoubleDottedItem> {
    refs.filter_map(|r| match ded.chart.item(r) {
        Item::DoubleDotted(dd) => Some(dd.clone()),
        _ => None,
    })
    .collect()
}
