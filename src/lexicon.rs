//! Words, their tags, and the tagged sentences the parsers consume.

use std::collections::HashMap;

use log::warn;
use regex::Regex;

use crate::error::Result;
use crate::grammar::Symbol;
use crate::tfs::FeatureStructure;

/// Words are runs of word characters (with inner apostrophes and hyphens);
/// every other non-space character stands alone.
const TOKEN: &str = r"[\w][\w'-]*|[^\w\s]";

#[derive(Clone, Debug)]
pub enum Tag {
    Category(Symbol),
    /// A tag whose category sits at the configured lexical-category path.
    Structure(FeatureStructure),
}

impl Tag {
    pub fn category<S: AsRef<str>>(&self, path: &[S]) -> Option<Symbol> {
        match self {
            Tag::Category(symbol) => Some(symbol.clone()),
            Tag::Structure(fs) => fs
                .arena()
                .follow(fs.root(), path)
                .and_then(|node| fs.arena().value(node))
                .map(Symbol::from),
        }
    }
}

impl From<&str> for Tag {
    fn from(category: &str) -> Self { Tag::Category(category.into()) }
}

#[derive(Clone, Debug)]
pub struct Token {
    pub word: String,
    pub tags: Vec<Tag>,
}

#[derive(Clone, Debug, Default)]
pub struct TaggedSentence {
    tokens: Vec<Token>,
}

impl TaggedSentence {
    pub fn new(tokens: Vec<Token>) -> Self { TaggedSentence { tokens } }

    /// Builds a sentence whose tags are bare categories.
    pub fn from_categories(words: &[(&str, &[&str])]) -> Self {
        let tokens = words
            .iter()
            .map(|&(word, tags)| Token {
                word: word.to_string(),
                tags: tags.iter().map(|&t| Tag::from(t)).collect(),
            })
            .collect();
        TaggedSentence { tokens }
    }

    pub fn push(&mut self, token: Token) { self.tokens.push(token) }

    pub fn len(&self) -> usize { self.tokens.len() }

    pub fn is_empty(&self) -> bool { self.tokens.is_empty() }

    pub fn tokens(&self) -> &[Token] { &self.tokens }

    pub fn words(&self) -> impl Iterator<Item = &str> { self.tokens.iter().map(|t| t.word.as_str()) }
}

#[derive(Debug)]
pub struct Lexicon {
    words: HashMap<String, Vec<Tag>>,
    /// Whole-token patterns for open word classes, tried after exact words.
    patterns: Vec<(Regex, Vec<Tag>)>,
    tokenizer: Regex,
}

impl Default for Lexicon {
    fn default() -> Self { Self::new() }
}

impl Lexicon {
    pub fn new() -> Self {
        Lexicon {
            words: HashMap::new(),
            patterns: Vec::new(),
            tokenizer: Regex::new(TOKEN).expect("token pattern is a valid regex"),
        }
    }

    pub fn add_word(&mut self, word: impl Into<String>, tag: Tag) {
        self.words.entry(word.into()).or_default().push(tag);
    }

    pub fn add_pattern(&mut self, pattern: &str, tag: Tag) -> Result<()> {
        let anchored = format!("^(?:{})$", pattern);
        match self.patterns.iter_mut().find(|(re, _)| re.as_str() == anchored) {
            Some((_, tags)) => tags.push(tag),
            None => self.patterns.push((Regex::new(&anchored)?, vec![tag])),
        }
        Ok(())
    }

    pub fn tags_for(&self, word: &str) -> Vec<Tag> {
        let mut tags: Vec<Tag> = self.words.get(word).cloned().unwrap_or_default();
        for (pattern, pattern_tags) in &self.patterns {
            if pattern.is_match(word) {
                tags.extend(pattern_tags.iter().cloned());
            }
        }
        tags
    }

    pub fn tag_words(&self, words: &[&str]) -> TaggedSentence {
        let tokens = words
            .iter()
            .map(|&word| {
                let tags = self.tags_for(word);
                if tags.is_empty() {
                    warn!("no tags for word `{}`", word);
                }
                Token { word: word.to_string(), tags }
            })
            .collect();
        TaggedSentence { tokens }
    }

    pub fn tokenize<'s>(&self, sentence: &'s str) -> Vec<&'s str> {
        self.tokenizer.find_iter(sentence).map(|m| m.as_str()).collect()
    }

    pub fn tag_sentence(&self, sentence: &str) -> TaggedSentence {
        self.tag_words(&self.tokenize(sentence))
    }
}

#[cfg(test)]
#[path = "tests/lexicon.rs"]
mod tests_for_lexicon;
