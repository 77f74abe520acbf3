//! Loading signatures, grammars and lexicons from their text notation.
//!
//! All three share the equation syntax of constraint blocks:
//!
//! ```text
//! path = path ;       coreference
//! path = "value" ;    string value
//! path : type ;       type restriction
//! ```
//!
//! A path is a dot-separated list of labels. In grammar rules its first step
//! names a constituent: a symbol occurring once in the rule, or `$k` for the
//! k-th symbol (`$0` being the left-hand side). `%` starts a comment that
//! runs to the end of the line.

use std::borrow::Cow;
use std::path::Path as FsPath;

use log::debug;
use regex::Regex;

use crate::config::ParserConfig;
use crate::error::{Error, Result};
use crate::grammar::{rhs_label, Grammar, ProductionRule, Symbol, LHS_LABEL};
use crate::lattice::{TypeId, TypeLattice};
use crate::lexicon::{Lexicon, Tag};
use crate::surface;
use crate::tfs::{FeatureArena, FeatureStructure, Label, NodeId};

pub(crate) mod ast {
    #[derive(Clone, Debug)]
    pub struct TypeDecl {
        pub name: String,
        pub supertypes: Vec<String>,
        pub template: Vec<Equation>,
    }

    #[derive(Clone, Debug)]
    pub struct RuleDecl {
        pub lhs: String,
        pub alternatives: Vec<Alternative>,
    }

    /// One right-hand side; the flag marks the head symbol.
    #[derive(Clone, Debug)]
    pub struct Alternative {
        pub symbols: Vec<(String, bool)>,
        pub constraints: Vec<Equation>,
    }

    #[derive(Clone, Debug)]
    pub struct LexEntry {
        pub key: LexKey,
        pub tags: Vec<TagDecl>,
    }

    #[derive(Clone, Debug)]
    pub enum LexKey {
        Word(String),
        Pattern(String),
    }

    #[derive(Clone, Debug)]
    pub struct TagDecl {
        pub category: String,
        pub constraints: Option<Vec<Equation>>,
    }

    #[derive(Clone, Debug)]
    pub enum Equation {
        Share(Path, Path),
        Value(Path, String),
        Typed(Path, String),
    }

    #[derive(Clone, Debug)]
    pub struct Path {
        pub steps: Vec<Step>,
    }

    #[derive(Clone, Debug)]
    pub enum Step {
        Label(String),
        /// `$k`, kept as written.
        Position(String),
    }
}

use self::ast::{Equation, LexKey, Path, Step};

/// Blanks out comments, keeping byte offsets intact for error messages.
fn strip_comments(text: &str) -> Result<Cow<'_, str>> {
    let comment = Regex::new(r"%[^\n]*")?;
    Ok(comment.replace_all(text, |caps: &regex::Captures| " ".repeat(caps[0].len())))
}

impl TypeLattice {
    /// Adds the types declared in `text`, in order. Supertypes must be
    /// declared before their subtypes.
    pub fn load_notation(&mut self, text: &str) -> Result<()> {
        let source = strip_comments(text)?;
        let decls = surface::SignatureParser::new()
            .parse(&source)
            .map_err(|e| Error::notation("signature", e))?;
        for decl in decls {
            let supertypes = decl
                .supertypes
                .iter()
                .map(|name| self.lookup(name))
                .collect::<Result<Vec<TypeId>>>()?;
            let template = if decl.template.is_empty() {
                None
            } else {
                let mut arena = FeatureArena::new();
                let root = arena.node(TypeId::BOTTOM);
                let root = apply_equations(&mut arena, self, root, &decl.template, &feature_step)
                    .map_err(|reason| Error::MalformedGrammar(format!("template of `{}`: {}", decl.name, reason)))?;
                Some(FeatureStructure::new(arena, root))
            };
            self.add_type(&decl.name, supertypes, template)?;
        }
        debug!("signature has {} types", self.len());
        Ok(())
    }

    pub fn from_notation(text: &str) -> Result<TypeLattice> {
        let mut lattice = TypeLattice::new();
        lattice.load_notation(text)?;
        Ok(lattice)
    }
}

impl Grammar {
    /// Reads rules from `text`. Types named in constraints are looked up in
    /// (or, with implicit types, added to) `lattice`.
    pub fn from_notation(text: &str, lattice: &mut TypeLattice) -> Result<Grammar> {
        let source = strip_comments(text)?;
        let decls = surface::RulesParser::new()
            .parse(&source)
            .map_err(|e| Error::notation("grammar", e))?;

        let mut arena = FeatureArena::new();
        let mut rules = Vec::new();
        for decl in decls {
            for alternative in decl.alternatives {
                let rhs: Vec<Symbol> = alternative.symbols.iter().map(|(s, _)| s.as_str().into()).collect();
                let heads: Vec<usize> = alternative
                    .symbols
                    .iter()
                    .enumerate()
                    .filter(|(_, (_, head))| *head)
                    .map(|(i, _)| i)
                    .collect();
                let rule = ProductionRule::new(decl.lhs.as_str(), rhs, heads.first().copied().unwrap_or(0));
                if heads.len() > 1 {
                    return Err(Error::malformed_rule(rule.to_string(), "more than one head"));
                }
                if alternative.constraints.is_empty() {
                    rules.push(rule);
                    continue;
                }
                let root = arena.node(TypeId::RULE);
                let fs = apply_equations(&mut arena, lattice, root, &alternative.constraints, &|step: &Step, first: bool| {
                    constituent_step(&rule, step, first)
                })
                .map_err(|reason| Error::malformed_rule(rule.to_string(), reason))?;
                rules.push(rule.with_fs(fs));
            }
        }
        Grammar::new(rules, arena)
    }

    pub fn from_path(path: impl AsRef<FsPath>, lattice: &mut TypeLattice) -> Result<Grammar> {
        let text = fs_err::read_to_string(path.as_ref())?;
        Self::from_notation(&text, lattice)
    }
}

impl Lexicon {
    /// Reads lexical entries from `text`. The category of a tag with
    /// constraints is stored at the configured lexical category path.
    pub fn from_notation(text: &str, lattice: &mut TypeLattice, config: &ParserConfig) -> Result<Lexicon> {
        let source = strip_comments(text)?;
        let entries = surface::LexiconParser::new()
            .parse(&source)
            .map_err(|e| Error::notation("lexicon", e))?;

        let mut lexicon = Lexicon::new();
        for entry in entries {
            for decl in &entry.tags {
                let tag = match &decl.constraints {
                    None => Tag::Category(decl.category.as_str().into()),
                    Some(equations) => {
                        let mut arena = FeatureArena::new();
                        let root = arena.node(TypeId::BOTTOM);
                        let fs = apply_equations(&mut arena, lattice, root, equations, &feature_step)
                            .and_then(|fs| {
                                let category = arena.string(decl.category.as_str());
                                let piece = path_to(&mut arena, &config.lexical_category_path, category);
                                let fs = arena.unify(lattice, fs, piece);
                                if arena.is_top(fs) {
                                    Err(format!("category `{}` clashes with its constraints", decl.category))
                                } else {
                                    Ok(fs)
                                }
                            })
                            .map_err(|reason| Error::MalformedGrammar(format!("lexical entry `{}`: {}", decl.category, reason)))?;
                        Tag::Structure(FeatureStructure::new(arena, fs))
                    }
                };
                match &entry.key {
                    LexKey::Word(word) => lexicon.add_word(word.as_str(), tag),
                    LexKey::Pattern(pattern) => lexicon.add_pattern(pattern, tag)?,
                }
            }
        }
        Ok(lexicon)
    }
}

/// Path steps outside of rules are plain feature labels.
fn feature_step(step: &Step, _first: bool) -> std::result::Result<Label, String> {
    match step {
        Step::Label(label) => Ok(label.clone()),
        Step::Position(k) => Err(format!("`${}` only names constituents inside rules", k)),
    }
}

/// Maps the first step of a path in `rule` to the label of the constituent it
/// names.
fn constituent_step(rule: &ProductionRule, step: &Step, first: bool) -> std::result::Result<Label, String> {
    match (step, first) {
        (Step::Label(label), false) => Ok(label.clone()),
        (Step::Position(k), false) => Err(format!("`${}` can only start a path", k)),
        (Step::Position(k), true) => match k.parse::<usize>() {
            Ok(0) => Ok(LHS_LABEL.to_string()),
            Ok(k) if k <= rule.rhs().len() => Ok(rhs_label(k - 1)),
            _ => Err(format!("`${}` is not a constituent", k)),
        },
        (Step::Label(name), true) => {
            let positions: Vec<usize> = rule
                .rhs()
                .iter()
                .enumerate()
                .filter(|(_, symbol)| symbol.as_str() == name)
                .map(|(i, _)| i)
                .collect();
            match positions.as_slice() {
                [] if rule.lhs().as_str() == name => Ok(LHS_LABEL.to_string()),
                [] => Err(format!("`{}` is not a constituent", name)),
                [i] if rule.lhs().as_str() != name => Ok(rhs_label(*i)),
                _ => Err(format!("`{}` is ambiguous, use `$k`", name)),
            }
        }
    }
}

/// Builds a fresh structure whose `path` leads to `leaf`.
fn path_to<S: AsRef<str>>(arena: &mut FeatureArena, path: &[S], leaf: NodeId) -> NodeId {
    match path.split_last() {
        None => leaf,
        Some((last, init)) => {
            let root = arena.node(TypeId::BOTTOM);
            let parent = arena.extend_path(root, init);
            arena.set_feature(parent, last.as_ref(), leaf);
            root
        }
    }
}

fn resolve_path(
    path: &Path,
    step: &dyn Fn(&Step, bool) -> std::result::Result<Label, String>,
) -> std::result::Result<Vec<Label>, String> {
    path.steps.iter().enumerate().map(|(i, s)| step(s, i == 0)).collect()
}

/// Unifies one small structure per equation into `root`.
fn apply_equations(
    arena: &mut FeatureArena,
    lattice: &mut TypeLattice,
    root: NodeId,
    equations: &[Equation],
    step: &dyn Fn(&Step, bool) -> std::result::Result<Label, String>,
) -> std::result::Result<NodeId, String> {
    let mut current = root;
    for equation in equations {
        let piece = match equation {
            Equation::Share(l, r) => {
                let shared = arena.node(TypeId::BOTTOM);
                let left = path_to(arena, &resolve_path(l, step)?, shared);
                let right = path_to(arena, &resolve_path(r, step)?, shared);
                let both = arena.unify(lattice, left, right);
                if arena.is_top(both) {
                    return Err("paths cannot be shared".to_string());
                }
                both
            }
            Equation::Value(path, value) => {
                let leaf = arena.string(value.as_str());
                path_to(arena, &resolve_path(path, step)?, leaf)
            }
            Equation::Typed(path, name) => {
                let ty = lattice.resolve(name).map_err(|e| e.to_string())?;
                let leaf = arena.typed_node(lattice, ty);
                path_to(arena, &resolve_path(path, step)?, leaf)
            }
        };
        let unified = arena.unify(lattice, current, piece);
        if arena.is_top(unified) {
            return Err(format!("inconsistent constraints at `{}`", describe(equation)));
        }
        current = unified;
    }
    Ok(current)
}

fn describe(equation: &Equation) -> String {
    let path = |p: &Path| {
        p.steps
            .iter()
            .map(|s| match s {
                Step::Label(l) => l.clone(),
                Step::Position(k) => format!("${}", k),
            })
            .collect::<Vec<_>>()
            .join(".")
    };
    match equation {
        Equation::Share(l, r) => format!("{} = {}", path(l), path(r)),
        Equation::Value(l, v) => format!("{} = {:?}", path(l), v),
        Equation::Typed(l, t) => format!("{} : {}", path(l), t),
    }
}

#[cfg(test)]
#[path = "tests/notation.rs"]
mod tests_for_notation;
