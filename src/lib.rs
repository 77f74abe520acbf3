//! Chart parsers over typed feature structures.
//!
//! A `TypeLattice` (the signature) orders the types of feature structures; a
//! `Grammar` holds production rules, each optionally constrained by a feature
//! structure; a `Lexicon` tags the words of a sentence. A `Parser` then fills
//! a `Chart` with items using one of four strategies:
//!
//! * CYK: bottom-up over spans of growing length,
//! * Earley: top-down prediction with completion,
//! * Left-Corner: bottom-up prediction filtered by the left-corner relation,
//! * Head-Corner: goal-driven recognition from heads outwards.
//!
//! Whenever two constituents combine, their feature structures are unified;
//! a failed unification blocks the combination.

#[macro_use] extern crate lalrpop_util;

lalrpop_mod!(surface); // synthesized by LALRPOP

pub mod agenda;
pub mod chart;
pub mod config;
pub mod error;
pub mod grammar;
pub mod item;
pub mod lattice;
pub mod lexicon;
pub mod notation;
pub mod parser;
pub mod rendering;
pub mod tfs;

mod display;
mod specification_rules;

pub use crate::agenda::Agenda;
pub use crate::chart::{Chart, ChartSummary};
pub use crate::config::ParserConfig;
pub use crate::display::{FsDisplay, ItemDisplay};
pub use crate::error::{Error, Result};
pub use crate::grammar::{Grammar, ProductionRule, RuleId, Symbol};
pub use crate::item::{ChartItem, Item, ItemKind, ItemRef};
pub use crate::lattice::{TypeId, TypeLattice};
pub use crate::lexicon::{Lexicon, Tag, TaggedSentence, Token};
pub use crate::parser::{Parser, Strategy};
pub use crate::rendering::{ParseTree, Rendered};
pub use crate::tfs::{FeatureArena, FeatureStructure, NodeId};

/// The type signature of a grammar.
pub type Signature = TypeLattice;
