// This is actually defined at `crate::notation::tests_for_notation`

use expect_test::expect;

use crate::config::ParserConfig;
use crate::error::Error;
use crate::grammar::Grammar;
use crate::lattice::{TypeId, TypeLattice};
use crate::lexicon::Lexicon;
use crate::tests::*;
use crate::tfs::FeatureArena;

const SIGNS: &str = r#"
    type sign ;
    type noun : sign ;
    type verb : sign ;
    type gerund : noun, verb ;   % both at once
    type pronoun : noun { case = "nom"; } ;
"#;

fn rendered_rules(grammar: &Grammar) -> String {
    grammar.rules().iter().map(|r| r.to_string()).collect::<Vec<_>>().join("\n")
}

fn category(lexicon: &Lexicon, word: &str) -> Vec<String> {
    lexicon
        .tags_for(word)
        .iter()
        .filter_map(|t| t.category(&["category"]))
        .map(|s| s.to_string())
        .collect()
}

#[test]
fn signature_declarations() {
    let lattice = TypeLattice::from_notation(SIGNS).unwrap();
    let ty = |name| lattice.lookup(name).unwrap();
    assert_eq!(lattice.lub(ty("noun"), ty("verb")), ty("gerund"));
    assert!(lattice.subsumes(ty("sign"), ty("pronoun")));
    assert!(lattice.get(ty("sign")).template().is_none());

    let mut arena = FeatureArena::new();
    let node = arena.typed_node(&lattice, ty("pronoun"));
    expect![[r#"pronoun[case: "nom"]"#]].assert_eq(&arena.display(&lattice, node).to_string());
}

#[test]
fn signature_errors() {
    assert!(matches!(TypeLattice::from_notation("type noun : sign ;"), Err(Error::UnknownType(_))));
    assert!(matches!(TypeLattice::from_notation("type a ; type a ;"), Err(Error::DuplicateType(_))));
    assert!(matches!(
        TypeLattice::from_notation("type a { $1 = \"x\"; } ;"),
        Err(Error::MalformedGrammar(_))
    ));
    assert!(matches!(TypeLattice::from_notation("type ;"), Err(Error::Notation { what: "signature", .. })));
}

#[test]
fn rules_alternatives_and_heads() {
    let grammar = Grammar::from_notation(
        r#"
        S -> NP VP* ;
        VP -> V | V NP | VP PP ;
        NP -> DET N* | "Kim" ;
        ADJ -> ;
        "#,
        &mut TypeLattice::new(),
    )
    .unwrap();
    expect![[r#"
        S -> NP VP*
        VP -> V
        VP -> V NP
        VP -> VP PP
        NP -> DET N*
        NP -> Kim
        ADJ ->"#]]
    .assert_eq(&rendered_rules(&grammar));
    assert_eq!(grammar.start_symbol().as_str(), "S");
    assert_eq!(grammar.rules()[0].head(), 1);
    assert_eq!(grammar.epsilon_rules().len(), 1);
    assert!(grammar.rules().iter().all(|r| r.fs().is_none()));
}

#[test]
fn constraints_name_constituents() {
    let mut lattice = TypeLattice::new();
    let grammar = Grammar::from_notation(
        r#"
        S -> NP VP* { $1.agr = VP.agr; S.tense = $2.tense; } ;
        NP -> NP PP { $1.agr = $0.agr; $2.case = "obl"; } ;
        "#,
        &mut lattice,
    )
    .unwrap();
    let arena = grammar.features();

    let s = grammar.rules()[0].fs().unwrap();
    assert_eq!(arena.ty(s), TypeId::RULE);
    assert!(arena.follow(s, &["1", "agr"]).is_some());
    assert_eq!(arena.follow(s, &["1", "agr"]), arena.follow(s, &["2", "agr"]));
    assert_eq!(arena.follow(s, &["0", "tense"]), arena.follow(s, &["2", "tense"]));

    let np = grammar.rules()[1].fs().unwrap();
    assert_eq!(arena.follow(np, &["1", "agr"]), arena.follow(np, &["0", "agr"]));
    assert_eq!(arena.follow(np, &["2", "case"]).and_then(|n| arena.value(n)), Some("obl"));
}

#[test]
fn typed_constraints_use_the_signature() {
    let mut lattice = TypeLattice::from_notation(SIGNS).unwrap();
    let grammar = Grammar::from_notation("NP -> N { N : noun; NP.case : pronoun; } ;", &mut lattice).unwrap();
    let arena = grammar.features();
    let fs = grammar.rules()[0].fs().unwrap();
    let noun = lattice.lookup("noun").unwrap();
    assert_eq!(arena.follow(fs, &["1"]).map(|n| arena.ty(n)), Some(noun));
    // the template of `pronoun` comes along
    let case = arena.follow(fs, &["0", "case", "case"]);
    assert_eq!(case.and_then(|n| arena.value(n)), Some("nom"));

    let unknown = Grammar::from_notation("NP -> N { N : thing; } ;", &mut lattice);
    assert!(matches!(unknown, Err(Error::MalformedRule { .. })));

    let mut implicit = TypeLattice::new().with_implicit_types(true);
    assert!(Grammar::from_notation("NP -> N { N : thing; } ;", &mut implicit).is_ok());
    assert!(implicit.lookup("thing").is_ok());
}

#[test]
fn malformed_rules() {
    let cases = [
        ("S -> NP VP { PP.agr = NP.agr; } ;", "`PP` is not a constituent"),
        ("NP -> NP PP { NP.agr = PP.agr; } ;", "`NP` is ambiguous, use `$k`"),
        ("S -> NP VP { $3.agr = \"x\"; } ;", "`$3` is not a constituent"),
        ("S -> NP* VP* ;", "more than one head"),
        ("S -> NP { NP.num = \"sg\"; NP.num = \"pl\"; } ;", "inconsistent constraints at `NP.num = \"pl\"`"),
    ];
    for (text, expected) in cases {
        match Grammar::from_notation(text, &mut TypeLattice::new()) {
            Err(Error::MalformedRule { reason, .. }) => assert_eq!(reason, expected, "{}", text),
            other => panic!("`{}` gave {:?}", text, other.map(|g| g.rules().len())),
        }
    }
}

#[test]
fn syntax_errors_name_the_notation() {
    let error = Grammar::from_notation("S -> NP VP", &mut TypeLattice::new()).unwrap_err();
    assert!(matches!(error, Error::Notation { what: "grammar", .. }));
    assert!(error.to_string().starts_with("grammar notation:"));

    let error = Lexicon::from_notation("the DET ;", &mut TypeLattice::new(), &ParserConfig::default()).unwrap_err();
    assert!(matches!(error, Error::Notation { what: "lexicon", .. }));
}

#[test]
fn comments_are_ignored() {
    let grammar = Grammar::from_notation(ARITHMETIC, &mut TypeLattice::new()).unwrap();
    assert_eq!(grammar.rules().len(), 5);
    let commented = Grammar::from_notation("% S -> A ;\nS -> B ; % S -> C ;", &mut TypeLattice::new()).unwrap();
    expect!["S -> B"].assert_eq(&rendered_rules(&commented));
}

#[test]
fn lexicon_entries() {
    let mut lattice = TypeLattice::new();
    let lexicon = Lexicon::from_notation(
        r#"
        the : DET ;
        saw : V { tense = "past"; }, N ;
        /[0-9]+/ : number ;
        "+" : plus ;
        "#,
        &mut lattice,
        &ParserConfig::default(),
    )
    .unwrap();
    assert_eq!(category(&lexicon, "the"), vec!["DET"]);
    assert_eq!(category(&lexicon, "saw"), vec!["V", "N"]);
    assert_eq!(category(&lexicon, "2024"), vec!["number"]);
    assert_eq!(category(&lexicon, "+"), vec!["plus"]);

    let tags = lexicon.tags_for("saw");
    let verb = match &tags[0] {
        crate::lexicon::Tag::Structure(fs) => fs,
        other => panic!("expected a structure, got {:?}", other),
    };
    let tense = verb.arena().follow(verb.root(), &["tense"]);
    assert_eq!(tense.and_then(|n| verb.arena().value(n)), Some("past"));
}

#[test]
fn lexical_category_path_is_configurable() {
    let config = ParserConfig::default().with_lexical_category_path(["head", "cat"]);
    let lexicon = Lexicon::from_notation("dog : N { head.num = \"sg\"; } ;", &mut TypeLattice::new(), &config).unwrap();
    let tags = lexicon.tags_for("dog");
    assert_eq!(tags[0].category(&["head", "cat"]).map(|s| s.to_string()), Some("N".to_string()));
    assert_eq!(tags[0].category(&["category"]), None);

    let clash = Lexicon::from_notation("dog : N { head.cat = \"V\"; } ;", &mut TypeLattice::new(), &config);
    assert!(matches!(clash, Err(Error::MalformedGrammar(_))));
}

#[test]
fn grammars_load_from_files() {
    let file = temp_file::with_contents(ARITHMETIC.as_bytes());
    let grammar = Grammar::from_path(file.path(), &mut TypeLattice::new()).unwrap();
    assert_eq!(grammar.rules_for(&"E".into()).len(), 5);

    let missing = file.path().with_extension("missing");
    assert!(matches!(Grammar::from_path(missing, &mut TypeLattice::new()), Err(Error::Io(_))));
}
