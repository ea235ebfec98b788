mod support;

use gramnorm::grammars::nullability::Nullability;
use support::{derives_empty, grammar, nt};

#[test]
fn test_nullability_matches_exhaustive_expansion() {
    let grammars = [
        grammar(&["S0 : A1B1 | a", "A1 : E | a", "B1 : A1A1", "C1 : A1b"]),
        grammar(&["S0 : A1B1C1", "A1 : B1C1 | a", "B1 : E", "C1 : B1 | c"]),
        grammar(&["S0 : A1b | B1", "A1 : E", "B1 : C1D1", "C1 : c | E", "D1 : d"]),
        grammar(&["S0 : EA1E", "A1 : B1E | b", "B1 : EE"]),
    ];

    for g in &grammars {
        let mut analysis = Nullability::new(g);
        for lhs in g.productions().keys() {
            assert_eq!(
                analysis.is_nullable(lhs),
                derives_empty(g, *lhs, 16),
                "nullability of {lhs} in\n{g}"
            );
        }
    }
}

#[test]
fn test_nullable_through_a_cycle_with_an_exit() {
    let g = grammar(&["S0 : A1B1", "A1 : B1 | a", "B1 : A1 | E"]);

    let nullable = Nullability::new(&g).nullable_set();

    assert_eq!(nullable.into_iter().collect::<Vec<_>>(), [nt("S0"), nt("A1"), nt("B1")]);
}

#[test]
fn test_cycle_alone_is_not_nullable() {
    let g = grammar(&["S0 : A1 | a", "A1 : B1", "B1 : A1"]);
    let mut analysis = Nullability::new(&g);

    assert!(!analysis.is_nullable(&nt("S0")));
    assert!(!analysis.is_nullable(&nt("A1")));
    assert!(!analysis.is_nullable(&nt("B1")));
}

#[test]
fn test_erasing_productions_are_eliminated() {
    let mut g = grammar(&["S0 : aA1b | A1", "A1 : c | E"]);

    g.eliminate_erasing_productions();

    assert_eq!(g.to_string(), "S0 : aA1b | ab | A1 | E\nA1 : c\n");
}

#[test]
fn test_empty_string_dropped_below_a_non_nullable_start() {
    let mut g = grammar(&["S0 : aA1", "A1 : b | E"]);

    g.eliminate_erasing_productions();

    assert_eq!(g.to_string(), "S0 : aA1 | a\nA1 : b\n");
}
