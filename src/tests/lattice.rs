// This is actually defined at `crate::lattice::tests_for_lattice`

use proptest::prelude::*;

use crate::error::Error;
use crate::lattice::*;

fn signs() -> TypeLattice {
    let mut lattice = TypeLattice::new();
    let sign = lattice.add_type("sign", vec![], None).unwrap();
    let noun = lattice.add_type("noun", vec![sign], None).unwrap();
    let verb = lattice.add_type("verb", vec![sign], None).unwrap();
    lattice.add_type("gerund", vec![noun, verb], None).unwrap();
    lattice.add_type("proper", vec![noun], None).unwrap();
    lattice
}

fn ty(lattice: &TypeLattice, name: &str) -> TypeId {
    lattice.lookup(name).unwrap()
}

#[test]
fn reserved_types() {
    let lattice = TypeLattice::new();
    assert_eq!(lattice.len(), 6);
    assert_eq!(ty(&lattice, "bottom"), TypeId::BOTTOM);
    assert_eq!(ty(&lattice, "top"), TypeId::TOP);
    assert_eq!(ty(&lattice, "string"), TypeId::STRING);
    assert_eq!(ty(&lattice, "list"), TypeId::LIST);
    assert_eq!(ty(&lattice, "rule"), TypeId::RULE);
    assert_eq!(ty(&lattice, "constituent"), TypeId::CONSTITUENT);
    assert_eq!(lattice.lub(TypeId::STRING, TypeId::LIST), TypeId::TOP);
}

#[test]
fn lub_of_related_types_is_the_more_specific() {
    let lattice = signs();
    let (sign, noun, proper) = (ty(&lattice, "sign"), ty(&lattice, "noun"), ty(&lattice, "proper"));
    assert_eq!(lattice.lub(sign, noun), noun);
    assert_eq!(lattice.lub(noun, proper), proper);
    // only through noun
    assert_eq!(lattice.lub(sign, proper), proper);
}

#[test]
fn lub_of_siblings_is_their_common_subtype() {
    let lattice = signs();
    let (noun, verb, gerund) = (ty(&lattice, "noun"), ty(&lattice, "verb"), ty(&lattice, "gerund"));
    assert_eq!(lattice.lub(noun, verb), gerund);
    assert_eq!(lattice.lub(ty(&lattice, "sign"), gerund), gerund);
    assert_eq!(lattice.lub(verb, ty(&lattice, "proper")), TypeId::TOP);
    assert_eq!(lattice.lub(noun, TypeId::STRING), TypeId::TOP);
}

#[test]
fn subsumption_follows_supertypes() {
    let lattice = signs();
    let (sign, noun, gerund) = (ty(&lattice, "sign"), ty(&lattice, "noun"), ty(&lattice, "gerund"));
    assert!(lattice.subsumes(sign, gerund));
    assert!(lattice.subsumes(noun, gerund));
    assert!(!lattice.subsumes(gerund, noun));
    assert!(!lattice.subsumes(ty(&lattice, "verb"), ty(&lattice, "proper")));
    assert!(lattice.subsumes(TypeId::BOTTOM, noun));
    assert!(lattice.subsumes(noun, TypeId::TOP));
}

#[test]
fn unknown_and_duplicate_types() {
    let mut lattice = signs();
    assert!(matches!(lattice.lookup("adjective"), Err(Error::UnknownType(name)) if name == "adjective"));
    assert!(matches!(lattice.add_type("noun", vec![], None), Err(Error::DuplicateType(_))));
    assert!(matches!(lattice.resolve("adjective"), Err(Error::UnknownType(_))));
}

#[test]
fn implicit_types_hang_below_bottom() {
    let mut lattice = signs().with_implicit_types(true);
    let before = lattice.len();
    let adjective = lattice.resolve("adjective").unwrap();
    assert_eq!(lattice.len(), before + 1);
    assert_eq!(lattice.get(adjective).supertypes(), &[TypeId::BOTTOM]);
    assert_eq!(lattice.resolve("adjective").unwrap(), adjective);
    assert_eq!(lattice.lub(adjective, ty(&lattice, "noun")), TypeId::TOP);
}

proptest! {
    #[test]
    fn lub_is_commutative_and_idempotent(a in 0usize..10, b in 0usize..10) {
        let lattice = signs();
        let (a, b) = (TypeId(a % lattice.len()), TypeId(b % lattice.len()));
        prop_assert_eq!(lattice.lub(a, b), lattice.lub(b, a));
        prop_assert_eq!(lattice.lub(a, a), a);
        prop_assert_eq!(lattice.lub(a, TypeId::BOTTOM), a);
        prop_assert_eq!(lattice.lub(a, TypeId::TOP), TypeId::TOP);
    }

    #[test]
    fn lub_is_subsumed_by_both_arguments(a in 0usize..10, b in 0usize..10) {
        let lattice = signs();
        let (a, b) = (TypeId(a % lattice.len()), TypeId(b % lattice.len()));
        let lub = lattice.lub(a, b);
        prop_assert!(lattice.subsumes(a, lub));
        prop_assert!(lattice.subsumes(b, lub));
    }
}

fn lub_table(lattice: &TypeLattice, upto: usize) -> Vec<((usize, usize), TypeId)> {
    (0..upto)
        .flat_map(|i| (0..upto).map(move |j| (i, j)))
        .map(|(i, j)| ((i, j), lattice.lub(TypeId(i), TypeId(j))))
        .collect()
}

#[test]
fn adding_a_type_leaves_earlier_lubs_alone() {
    let mut lattice = signs();
    let known = lattice.len();
    let before = lub_table(&lattice, known);
    lattice.add_type("adjective", vec![ty(&lattice, "sign")], None).unwrap();
    assert_eq!(lub_table(&lattice, known), before);
}

#[test]
fn adding_a_type_joins_only_the_pairs_it_makes_compatible() {
    let mut lattice = signs();
    let (proper, verb) = (ty(&lattice, "proper"), ty(&lattice, "verb"));
    let known = lattice.len();
    let before = lub_table(&lattice, known);
    let proper_verb = lattice.add_type("proper_verb", vec![proper, verb], None).unwrap();

    let changed: Vec<(usize, usize)> = lub_table(&lattice, known)
        .into_iter()
        .zip(before)
        .filter(|(now, then)| now != then)
        .map(|(now, _)| now.0)
        .collect();
    assert_eq!(changed, vec![(verb.index(), proper.index()), (proper.index(), verb.index())]);
    assert_eq!(lattice.lub(proper, verb), proper_verb);
    assert_eq!(lattice.lub(ty(&lattice, "noun"), verb), ty(&lattice, "gerund"));
}
