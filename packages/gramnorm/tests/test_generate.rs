mod support;

use std::time::{Duration, Instant};

use gramnorm::{ContextFreeGrammar, GeneratorConfig, GrammarError, WordGenerator};
use support::{grammar, sums, words};

#[test]
fn test_words_are_sorted_and_bounded() {
    let g = grammar(&["S0 : aS0b | E"]);

    assert_eq!(words(&g, 0), [""]);
    assert_eq!(words(&g, 3), ["", "ab"]);
    assert_eq!(words(&g, 6), ["", "aaabbb", "aabb", "ab"]);
}

#[test]
fn test_left_recursive_grammar_terminates() {
    assert_eq!(words(&sums(), 5), ["n", "n+n", "n+n+n"]);
}

#[test]
fn test_epsilon_loops_terminate() {
    let g = grammar(&["S0 : A1S0 | a", "A1 : A1A1 | E"]);

    assert_eq!(words(&g, 2), ["a"]);
}

#[test]
fn test_epsilon_markers_do_not_count() {
    let g = grammar(&["S0 : EaEA1E", "A1 : bE | EE"]);

    assert_eq!(words(&g, 2), ["a", "ab"]);
    assert_eq!(words(&g, 1), ["a"]);
}

#[test]
fn test_depth_factor_limits_expansions() {
    let g = grammar(&["S0 : A1", "A1 : B1", "B1 : C1", "C1 : a"]);

    let shallow = g
        .generate_words_with(1, GeneratorConfig { depth_factor: 1 })
        .unwrap();
    let deep = g
        .generate_words_with(1, GeneratorConfig { depth_factor: 2 })
        .unwrap();

    assert!(shallow.is_empty());
    assert_eq!(deep, ["a"]);
}

#[test]
fn test_no_start_symbol() {
    let g = ContextFreeGrammar::new();

    assert_eq!(g.generate_words(3), Err(GrammarError::NoStartSymbol));
    assert!(WordGenerator::new(&g, GeneratorConfig::default())
        .generate(3)
        .is_empty());
}

#[test]
fn test_unproductive_branches_are_ignored() {
    let g = grammar(&["S0 : aB1 | b", "B1 : B1c"]);

    assert_eq!(words(&g, 4), ["b"]);
}

#[test]
fn test_nullable_runs_stay_cheap() {
    let g = grammar(&["S0 : E | C1C1a", "A1 : E | S0C1", "C1 : C1C1C1 | E | A1"]);

    let started = Instant::now();
    let found = words(&g, 8);

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(
        found,
        ["", "a", "aa", "aaa", "aaaa", "aaaaa", "aaaaaa", "aaaaaaa", "aaaaaaaa"]
    );
}

#[test]
fn test_mutually_nullable_cycles_stay_cheap() {
    let g = grammar(&[
        "S0 : C1 | B1",
        "A1 : C1a | S0",
        "B1 : E | C1B1C1 | S0",
        "C1 : A1A1A1",
    ]);

    let started = Instant::now();
    let found = words(&g, 6);

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(found, ["", "a", "aa", "aaa", "aaaa", "aaaaa", "aaaaaa"]);
}
