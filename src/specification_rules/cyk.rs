//! Bottom-up CYK combination of complete items.
//!
//! Rules with one or two right-hand side symbols take part; longer rules and
//! empty rules are not used by this strategy.

use log::trace;

use crate::grammar::{rhs_label, RuleId, Symbol, LHS_LABEL};
use crate::item::{CykItem, Item, ItemRef, Origin};
use crate::tfs::NodeId;

use super::{Clash, Deduction};

/// Adds everything derivable over `[i, j]` from the items of its sub-spans,
/// then closes the span under unary rules.
pub(crate) fn fill_span(ded: &mut Deduction, i: usize, j: usize) -> usize {
    let mut added = 0;
    for k in (i + 1)..j {
        added += combine_binary(ded, i, k, j);
    }
    added + close_unary(ded, i, j)
}

//  [B, i, k]   [C, k, j]
//  A -> B C
// ----------------------- Combine
//  [A, i, j]
fn combine_binary(ded: &mut Deduction, i: usize, k: usize, j: usize) -> usize {
    let grammar = ded.grammar;
    let lefts = cyk_items(ded, i, k);
    let rights = cyk_items(ded, k, j);
    let mut added = 0;
    for (l, left) in &lefts {
        for (r, right) in &rights {
            let rhs = [left.category.clone(), right.category.clone()];
            for &rule in grammar.rules_with_rhs(&rhs) {
                let built = instantiate(ded, rule, &[(*l, left.fs), (*r, right.fs)], i, j);
                if let Ok(item) = built {
                    if ded.emit(Item::Cyk(item)) {
                        added += 1;
                    }
                }
            }
        }
    }
    added
}

//  [B, i, j]
//  A -> B
// ----------------------- Unary
//  [A, i, j]
fn close_unary(ded: &mut Deduction, i: usize, j: usize) -> usize {
    let grammar = ded.grammar;
    let mut added = 0;
    let mut done: Vec<ItemRef> = Vec::new();
    loop {
        let pending: Vec<(ItemRef, CykItem)> = cyk_items(ded, i, j)
            .into_iter()
            .filter(|(r, _)| !done.contains(r))
            .collect();
        if pending.is_empty() {
            break;
        }
        for (r, below) in pending {
            done.push(r);
            for &rule in grammar.rules_with_rhs(std::slice::from_ref(&below.category)) {
                if let Ok(item) = instantiate(ded, rule, &[(r, below.fs)], i, j) {
                    if ded.emit(Item::Cyk(item)) {
                        added += 1;
                    }
                }
            }
        }
    }
    added
}

fn cyk_items(ded: &Deduction, i: usize, j: usize) -> Vec<(ItemRef, CykItem)> {
    ded.chart
        .items_spanning(i, j)
        .filter_map(|r| match ded.chart.item(r) {
            Item::Cyk(c) => Some((r, c.clone())),
            _ => None,
        })
        .collect()
}

/// Builds the item for `rule` over `[i, j]` from its right-hand side
/// constituents, unifying each one into the rule's structure.
fn instantiate(
    ded: &mut Deduction,
    rule: RuleId,
    constituents: &[(ItemRef, Option<NodeId>)],
    i: usize,
    j: usize,
) -> Result<CykItem, Clash> {
    let mut fs = ded.rule_fs(ded.grammar.rule(rule).fs());
    for (position, &(_, constituent)) in constituents.iter().enumerate() {
        fs = ded.absorb(fs, &rhs_label(position), constituent)?;
    }
    let category: Symbol = ded.grammar.rule(rule).lhs().clone();
    trace!("cyk {} over [{}, {}]", category, i, j);
    Ok(CykItem {
        category,
        origin: Origin::Rule(rule),
        from: i,
        to: j,
        fs: fs.and_then(|fs| ded.chart.features().feature(fs, LHS_LABEL)),
        children: constituents.iter().map(|&(r, _)| r).collect(),
    })
}
