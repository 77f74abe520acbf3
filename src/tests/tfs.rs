// This is actually defined at `crate::tfs::tests_for_tfs`

use expect_test::expect;
use proptest::prelude::*;

use crate::lattice::{TypeId, TypeLattice};
use crate::tfs::*;

/// `[label: "value"]`
fn with_string(arena: &mut FeatureArena, label: &str, value: &str) -> NodeId {
    let leaf = arena.string(value);
    arena.wrap(label, leaf)
}

fn render(arena: &FeatureArena, lattice: &TypeLattice, node: NodeId) -> String {
    arena.display(lattice, node).to_string()
}

#[test]
fn clashing_strings_give_top_and_leave_inputs_alone() {
    let lattice = TypeLattice::new();
    let mut arena = FeatureArena::new();
    let dog = with_string(&mut arena, "phon", "dog");
    let cat = with_string(&mut arena, "phon", "cat");
    let (dog_before, cat_before) = (arena.copy(dog), arena.copy(cat));

    let result = arena.unify(&lattice, dog, cat);
    assert!(arena.is_top(result));
    assert_eq!(arena.ty(result), TypeId::TOP);
    assert!(arena.is_equal_to(dog, dog_before));
    assert!(arena.is_equal_to(cat, cat_before));
    expect![[r#"[phon: "dog"]"#]].assert_eq(&render(&arena, &lattice, dog));
}

#[test]
fn unification_merges_features() {
    let lattice = TypeLattice::new();
    let mut arena = FeatureArena::new();
    let a = with_string(&mut arena, "num", "sg");
    let a = arena.wrap("agr", a);
    let b = with_string(&mut arena, "per", "3");
    let b = arena.wrap("agr", b);
    let cat = arena.string("N");
    arena.set_feature(b, "cat", cat);

    let ab = arena.unify(&lattice, a, b);
    assert!(!arena.is_top(ab));
    expect![[r#"[agr: [num: "sg", per: "3"], cat: "N"]"#]].assert_eq(&render(&arena, &lattice, ab));
    assert_eq!(arena.follow(ab, &["agr", "num"]).and_then(|n| arena.value(n)), Some("sg"));

    let ba = arena.unify(&lattice, b, a);
    assert!(arena.is_equal_to(ab, ba));
    // the inputs are untouched
    assert!(arena.feature(a, "cat").is_none());
    assert_eq!(arena.features(arena.feature(b, "agr").unwrap()).count(), 1);
}

#[test]
fn unifying_with_itself_is_a_copy() {
    let lattice = TypeLattice::new();
    let mut arena = FeatureArena::new();
    let x = with_string(&mut arena, "phon", "dog");
    let shared = arena.node(TypeId::BOTTOM);
    arena.set_feature(x, "a", shared);
    arena.set_feature(x, "b", shared);

    let xx = arena.unify(&lattice, x, x);
    let copy = arena.copy(x);
    assert_ne!(xx, x);
    assert!(arena.is_equal_to(xx, copy));
    assert!(arena.is_equal_to(xx, x));
}

#[test]
fn type_clash_fails() {
    let mut lattice = TypeLattice::new();
    let noun = lattice.add_type("noun", vec![], None).unwrap();
    let verb = lattice.add_type("verb", vec![], None).unwrap();
    let mut arena = FeatureArena::new();
    let n = arena.node(noun);
    let n = arena.wrap("head", n);
    let v = arena.node(verb);
    let v = arena.wrap("head", v);
    let result = arena.unify(&lattice, n, v);
    assert!(arena.is_top(result));
}

#[test]
fn unification_specialises_types() {
    let mut lattice = TypeLattice::new();
    let sign = lattice.add_type("sign", vec![], None).unwrap();
    let noun = lattice.add_type("noun", vec![sign], None).unwrap();
    let mut arena = FeatureArena::new();
    let a = arena.node(sign);
    let b = arena.node(noun);
    let result = arena.unify(&lattice, a, b);
    assert_eq!(arena.ty(result), noun);
}

#[test]
fn coreference_is_kept_and_propagated() {
    let lattice = TypeLattice::new();
    let mut arena = FeatureArena::new();
    // [subj: [agr: #1], agr: #1]
    let shared = arena.node(TypeId::BOTTOM);
    let subj = arena.wrap("agr", shared);
    let x = arena.wrap("subj", subj);
    arena.set_feature(x, "agr", shared);
    // [agr: [num: "pl"]]
    let num = with_string(&mut arena, "num", "pl");
    let y = arena.wrap("agr", num);

    let xy = arena.unify(&lattice, x, y);
    expect![[r#"[agr: #1=[num: "pl"], subj: [agr: #1]]"#]].assert_eq(&render(&arena, &lattice, xy));
    assert_eq!(arena.follow(xy, &["subj", "agr"]), arena.follow(xy, &["agr"]));
    assert_eq!(arena.follow(xy, &["subj", "agr", "num"]).and_then(|n| arena.value(n)), Some("pl"));
}

#[test]
fn equality_is_sensitive_to_sharing() {
    let mut arena = FeatureArena::new();
    let shared = arena.node(TypeId::BOTTOM);
    let tangled = arena.wrap("a", shared);
    arena.set_feature(tangled, "b", shared);

    let (l, r) = (arena.node(TypeId::BOTTOM), arena.node(TypeId::BOTTOM));
    let separate = arena.wrap("a", l);
    arena.set_feature(separate, "b", r);

    assert!(!arena.is_equal_to(tangled, separate));
    let copy = arena.copy(tangled);
    assert!(arena.is_equal_to(tangled, copy));
}

#[test]
fn cycles_survive_copy_and_unify() {
    let lattice = TypeLattice::new();
    let mut arena = FeatureArena::new();
    let cyclic = arena.node(TypeId::BOTTOM);
    arena.set_feature(cyclic, "next", cyclic);

    let copy = arena.copy(cyclic);
    assert_ne!(copy, cyclic);
    assert_eq!(arena.follow(copy, &["next"]), Some(copy));
    expect![[r#"#1=[next: #1]"#]].assert_eq(&render(&arena, &lattice, copy));

    // [next: [next: [tag: "x"]]]
    let leaf = with_string(&mut arena, "tag", "x");
    let inner = arena.wrap("next", leaf);
    let chain = arena.wrap("next", inner);
    let unified = arena.unify(&lattice, cyclic, chain);
    assert!(!arena.is_top(unified));
    assert_eq!(arena.follow(unified, &["next", "next"]), Some(unified));
    assert_eq!(arena.follow(unified, &["tag"]).and_then(|n| arena.value(n)), Some("x"));
    assert!(arena.feature(cyclic, "tag").is_none());
}

#[test]
fn lists_unify_elementwise() {
    let lattice = TypeLattice::new();
    let mut arena = FeatureArena::new();
    let (a1, a2) = (arena.string("a"), arena.node(TypeId::BOTTOM));
    let (b1, b2) = (arena.node(TypeId::BOTTOM), arena.string("b"));
    let xs = arena.list(vec![a1, a2]);
    let ys = arena.list(vec![b1, b2]);
    let zs = arena.unify(&lattice, xs, ys);
    expect![[r#"<"a", "b">"#]].assert_eq(&render(&arena, &lattice, zs));

    let short = arena.list(vec![b1]);
    let failed = arena.unify(&lattice, xs, short);
    assert!(arena.is_top(failed));
}

#[test]
fn templates_come_with_typed_nodes() {
    let mut lattice = TypeLattice::new();
    let mut template = FeatureArena::new();
    let root = with_string(&mut template, "case", "nom");
    let pronoun = lattice.add_type("pronoun", vec![], Some(FeatureStructure::new(template, root))).unwrap();

    let mut arena = FeatureArena::new();
    let node = arena.typed_node(&lattice, pronoun);
    expect![[r#"pronoun[case: "nom"]"#]].assert_eq(&render(&arena, &lattice, node));
}

#[test]
fn structures_compare_across_arenas() {
    let mut left = FeatureArena::new();
    let l = with_string(&mut left, "phon", "dog");
    let mut right = FeatureArena::new();
    right.node(TypeId::BOTTOM);
    let r = with_string(&mut right, "phon", "dog");
    let o = with_string(&mut right, "phon", "cat");

    let dog = FeatureStructure::new(left, l);
    assert!(dog.is_equal_to(&FeatureStructure::new(right.clone(), r)));
    assert!(!dog.is_equal_to(&FeatureStructure::new(right, o)));
}

/// `[f: #1=[a: #1, b: "<value>"]]`
fn looping_through_f(arena: &mut FeatureArena, value: &str) -> NodeId {
    let shared = with_string(arena, "b", value);
    arena.set_feature(shared, "a", shared);
    arena.wrap("f", shared)
}

#[test]
fn arcs_follow_a_node_forwarded_mid_walk() {
    let lattice = TypeLattice::new();
    let mut arena = FeatureArena::new();
    // [f: [a: []]]
    let empty = arena.node(TypeId::BOTTOM);
    let inner = arena.wrap("a", empty);
    let tree = arena.wrap("f", inner);
    let looping = looping_through_f(&mut arena, "1");

    let one = arena.unify(&lattice, tree, looping);
    let other = arena.unify(&lattice, looping, tree);
    expect![[r#"[f: #1=[a: #1, b: "1"]]"#]].assert_eq(&render(&arena, &lattice, one));
    expect![[r#"[f: #1=[a: #1, b: "1"]]"#]].assert_eq(&render(&arena, &lattice, other));
    assert!(arena.is_equal_to(one, other));
}

#[test]
fn clash_behind_a_forwarded_node_is_found() {
    let lattice = TypeLattice::new();
    let mut arena = FeatureArena::new();
    // [f: [a: [b: "1"]]]
    let leaf = with_string(&mut arena, "b", "1");
    let inner = arena.wrap("a", leaf);
    let tree = arena.wrap("f", inner);
    let looping = looping_through_f(&mut arena, "2");

    let one = arena.unify(&lattice, tree, looping);
    assert!(arena.is_top(one));
    let other = arena.unify(&lattice, looping, tree);
    assert!(arena.is_top(other));
}

#[test]
fn lub_types_bring_their_template() {
    let mut lattice = TypeLattice::new();
    let a = lattice.add_type("a", vec![], None).unwrap();
    let b = lattice.add_type("b", vec![], None).unwrap();
    let mut template = FeatureArena::new();
    let root = with_string(&mut template, "case", "nom");
    let c = lattice.add_type("c", vec![a, b], Some(FeatureStructure::new(template, root))).unwrap();

    let mut arena = FeatureArena::new();
    let x = arena.typed_node(&lattice, a);
    let y = arena.typed_node(&lattice, b);
    let xy = arena.unify(&lattice, x, y);
    assert_eq!(arena.ty(xy), c);
    expect![[r#"c[case: "nom"]"#]].assert_eq(&render(&arena, &lattice, xy));

    // the template constrains as well
    let z = arena.typed_node(&lattice, a);
    let acc = with_string(&mut arena, "case", "acc");
    let z = arena.unify(&lattice, z, acc);
    let clash = arena.unify(&lattice, z, y);
    assert!(arena.is_top(clash));
}

/// A small graph: `arcs[i]` are the (label, target) arcs of node `i`, node 0
/// is the root, and nodes without arcs may hold a literal.
#[derive(Clone, Debug)]
struct Shape {
    arcs: Vec<Vec<(usize, usize)>>,
    literals: Vec<Option<usize>>,
}

fn shapes() -> impl Strategy<Value = Shape> {
    (1usize..5)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(prop::collection::vec((0usize..3, 0..n), 0..3), n),
                prop::collection::vec(prop::option::of(0usize..2), n),
            )
        })
        .prop_map(|(arcs, literals)| Shape { arcs, literals })
}

fn build(arena: &mut FeatureArena, shape: &Shape) -> NodeId {
    let nodes: Vec<NodeId> = shape
        .arcs
        .iter()
        .zip(&shape.literals)
        .map(|(arcs, literal)| match literal {
            Some(v) if arcs.is_empty() => arena.string(["x", "y"][*v]),
            _ => arena.node(TypeId::BOTTOM),
        })
        .collect();
    for (i, arcs) in shape.arcs.iter().enumerate() {
        for &(label, target) in arcs {
            arena.set_feature(nodes[i], ["a", "b", "c"][label], nodes[target]);
        }
    }
    nodes[0]
}

proptest! {
    #[test]
    fn unification_is_commutative(x in shapes(), y in shapes()) {
        let lattice = TypeLattice::new();
        let mut arena = FeatureArena::new();
        let (a, b) = (build(&mut arena, &x), build(&mut arena, &y));
        let ab = arena.unify(&lattice, a, b);
        let ba = arena.unify(&lattice, b, a);
        prop_assert_eq!(arena.is_top(ab), arena.is_top(ba));
        if !arena.is_top(ab) {
            prop_assert!(
                arena.is_equal_to(ab, ba),
                "{} vs {}", render(&arena, &lattice, ab), render(&arena, &lattice, ba)
            );
        }
    }

    #[test]
    fn copies_equal_their_source(x in shapes()) {
        let mut arena = FeatureArena::new();
        let a = build(&mut arena, &x);
        let copy = arena.copy(a);
        prop_assert!(arena.is_equal_to(a, copy));
    }
}
