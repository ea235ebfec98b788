mod support;

use gramnorm::{
    grammars::{chomsky_normal_form::CnfWord, TerminalIsolation},
    ChomskyNormalFormGrammar, ContextFreeGrammar, GrammarError, Production, Symbol, Terminal,
};
use gramnorm::names::NameAllocator;
use support::{crowded, grammar, is_chomsky_normal_form, nt, sums, words};

#[test]
fn test_balanced_pairs() {
    let g = grammar(&["S0 : aS0b | E"]);

    let cnf = g.to_chomsky_normal_form().unwrap();

    assert_eq!(
        cnf.to_string(),
        "A0 : E | A1A3\nA1 : a\nA2 : b\nA3 : S0A2 | b\nS0 : A1A3\n"
    );
    assert!(is_chomsky_normal_form(&cnf));
    assert_eq!(words(&cnf, 6), ["", "aaabbb", "aabb", "ab"]);
}

#[test]
fn test_single_word() {
    let g = grammar(&["S0 : A1B1", "A1 : a", "B1 : b"]);

    let cnf = g.to_chomsky_normal_form().unwrap();

    assert!(is_chomsky_normal_form(&cnf));
    assert_eq!(words(&cnf, 4), ["ab"]);
}

#[test]
fn test_language_is_preserved() {
    let grammars = [
        grammar(&["S0 : aS0bS0 | E"]),
        grammar(&["S0 : S0pT1 | T1", "T1 : T1mF1 | F1", "F1 : lS0r | n"]),
        grammar(&["S0 : A1S0a | b", "A1 : E | c"]),
        grammar(&["S0 : A1 | a", "A1 : B1 | b", "B1 : S0 | cc"]),
        grammar(&["S0 : aA1bcA1d | A1A1A1", "A1 : ab | E"]),
        sums(),
    ];

    for g in &grammars {
        let cnf = g.to_chomsky_normal_form().unwrap();

        assert!(is_chomsky_normal_form(&cnf), "not in CNF:\n{cnf}");
        assert_eq!(words(&cnf, 7), words(g, 7), "language changed for\n{g}");
    }
}

#[test]
fn test_identical_suffixes_share_a_non_terminal() {
    let mut g = grammar(&["S0 : A1B1C1 | B1B1C1", "A1 : a", "B1 : b", "C1 : c"]);

    g.binarize().unwrap();

    assert_eq!(g.to_string(), "S0 : A1A0 | B1A0\nA0 : B1C1\nA1 : a\nB1 : b\nC1 : c\n");
}

#[test]
fn test_unit_chains_are_closed() {
    let mut g = grammar(&["S0 : A1 | a", "A1 : B1 | b", "B1 : S0 | c"]);

    g.eliminate_unit_productions();

    assert_eq!(g.to_string(), "S0 : a | b | c\n");
}

#[test]
fn test_terminals_reuse_existing_non_terminals() {
    let mut g = grammar(&["S0 : aB1 | b", "B1 : b"]);

    g.replace_terminals(gramnorm::grammars::TerminalIsolation::All).unwrap();

    assert_eq!(g.to_string(), "S0 : A0B1 | b\nA0 : a\nB1 : b\n");
}

#[test]
fn test_normalization_is_deterministic() {
    let g = grammar(&["S0 : aS0bS0 | A1", "A1 : cA1 | E"]);

    let first = g.to_chomsky_normal_form().unwrap();
    let second = g.to_chomsky_normal_form().unwrap();

    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn test_typed_view() {
    let g = grammar(&["S0 : aS0b | E"]);

    let cnf = ChomskyNormalFormGrammar::from_context_free_grammar(&g).unwrap();

    assert_eq!(cnf.start_symbol(), &nt("A0"));
    assert!(cnf.is_start_symbol_erasable());
    assert!(cnf.productions()[&nt("A1")].contains(&CnfWord::Terminal(Terminal('a'))));
    assert!(cnf.productions()[&nt("S0")].contains(&CnfWord::NonTerminals(nt("A1"), nt("A3"))));
    assert_eq!(
        cnf.to_string(),
        "A0 : E | A1A3\nA1 : a\nA2 : b\nA3 : S0A2 | b\nS0 : A1A3\n"
    );
    assert_eq!(
        cnf.to_context_free_grammar().to_string(),
        g.to_chomsky_normal_form().unwrap().to_string()
    );
}

#[test]
fn test_typed_view_rejects_other_shapes() {
    let g = grammar(&["S0 : aS0b | E"]);

    let error = ChomskyNormalFormGrammar::try_from(&g).unwrap_err();

    assert!(matches!(error, GrammarError::NotInNormalForm { .. }));
}

#[test]
fn test_empty_grammar_has_no_start_symbol() {
    assert_eq!(
        ContextFreeGrammar::new().to_chomsky_normal_form(),
        Err(GrammarError::NoStartSymbol)
    );
}

#[test]
fn test_exhausted_name_space() {
    let mut g = ContextFreeGrammar::new();
    for name in NameAllocator::candidates() {
        g.add_production(name, Production::new([Symbol::Terminal(Terminal('a'))]));
    }

    assert_eq!(g.to_chomsky_normal_form(), Err(GrammarError::ExhaustedNameSpace));
}

#[test]
fn test_failed_passes_leave_the_grammar_intact() {
    let g = crowded(0);
    let productions = g.production_count();

    let mut isolated = g.clone();
    assert_eq!(
        isolated.replace_terminals(TerminalIsolation::All),
        Err(GrammarError::ExhaustedNameSpace)
    );
    assert_eq!(isolated.production_count(), productions);
    assert_eq!(isolated, g);

    let mut binarized = g.clone();
    assert_eq!(binarized.binarize(), Err(GrammarError::ExhaustedNameSpace));
    assert_eq!(binarized.production_count(), productions);
    assert_eq!(binarized, g);
}
