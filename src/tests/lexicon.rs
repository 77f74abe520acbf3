// This is actually defined at `crate::lexicon::tests_for_lexicon`

use crate::lexicon::*;
use crate::tests::*;
use crate::tfs::FeatureArena;

fn categories(tags: &[Tag]) -> Vec<String> {
    tags.iter()
        .filter_map(|t| t.category(&["category"]))
        .map(|s| s.to_string())
        .collect()
}

#[test]
fn tokenizer_splits_punctuation() {
    let lexicon = Lexicon::new();
    assert_eq!(lexicon.tokenize("I saw the man."), vec!["I", "saw", "the", "man", "."]);
    assert_eq!(lexicon.tokenize("2 + 3*4"), vec!["2", "+", "3", "*", "4"]);
    assert_eq!(lexicon.tokenize("  don't stop-gap  "), vec!["don't", "stop-gap"]);
    assert!(lexicon.tokenize("   ").is_empty());
}

#[test]
fn words_and_patterns() {
    let lexicon = arithmetic_lexicon();
    assert_eq!(categories(&lexicon.tags_for("42")), vec!["number"]);
    assert_eq!(categories(&lexicon.tags_for("+")), vec!["plus"]);
    assert!(lexicon.tags_for("4a").is_empty());
    assert!(lexicon.tags_for("x").is_empty());
}

#[test]
fn words_may_be_ambiguous() {
    let mut lexicon = attachment_lexicon();
    lexicon.add_word("saw", Tag::from("N"));
    assert_eq!(categories(&lexicon.tags_for("saw")), vec!["V", "N"]);
}

#[test]
fn tagging_a_sentence() {
    let sentence = attachment_lexicon().tag_sentence("I saw the man with the telescope");
    assert_eq!(sentence.len(), 7);
    assert_eq!(sentence.words().collect::<Vec<_>>(), vec!["I", "saw", "the", "man", "with", "the", "telescope"]);
    let tags: Vec<Vec<String>> = sentence.tokens().iter().map(|t| categories(&t.tags)).collect();
    assert_eq!(tags[0], vec!["NP"]);
    assert_eq!(tags[6], vec!["N"]);
}

#[test]
fn unknown_words_get_no_tags() {
    let sentence = attachment_lexicon().tag_words(&["I", "slept"]);
    assert_eq!(sentence.len(), 2);
    assert!(sentence.tokens()[1].tags.is_empty());
}

#[test]
fn structured_tags_name_their_category_by_path() {
    let mut arena = FeatureArena::new();
    let category = arena.string("N");
    let head = arena.wrap("cat", category);
    let root = arena.wrap("head", head);
    let tag = Tag::Structure(crate::tfs::FeatureStructure::new(arena, root));
    assert_eq!(tag.category(&["head", "cat"]).map(|s| s.to_string()), Some("N".to_string()));
    assert_eq!(tag.category(&["category"]), None);
}

#[test]
fn sentences_from_categories() {
    let sentence = TaggedSentence::from_categories(&[("I", &["NP"]), ("slept", &["V", "N"])]);
    assert_eq!(sentence.tokens()[1].tags.len(), 2);
    assert!(!sentence.is_empty());
}

#[test]
fn invalid_patterns_are_errors() {
    let mut lexicon = Lexicon::new();
    assert!(matches!(lexicon.add_pattern("[0-9", Tag::from("number")), Err(crate::Error::Pattern(_))));
}
