#![allow(dead_code)]

use gramnorm::{names::NameAllocator, ContextFreeGrammar, NonTerminal, Production, Symbol, Terminal};

pub fn grammar(lines: &[&str]) -> ContextFreeGrammar {
    ContextFreeGrammar::from_productions(lines).unwrap()
}

pub fn nt(name: &str) -> NonTerminal {
    name.parse().unwrap()
}

pub fn n(name: &str) -> Symbol {
    Symbol::NonTerminal(nt(name))
}

pub fn t(c: char) -> Symbol {
    Symbol::Terminal(Terminal(c))
}

pub fn word(symbols: &[Symbol]) -> Production {
    Production::new(symbols.iter().copied())
}

/// `S0 : S0+n | n`, which the rule-line syntax cannot spell.
pub fn sums() -> ContextFreeGrammar {
    let mut g = ContextFreeGrammar::new();
    g.add_rule(
        nt("S0"),
        [word(&[n("S0"), t('+'), t('n')]), word(&[t('n')])],
    );
    g
}

/// `S0 : S0a | aN`, then `N : aaN' | a` chained through every other name
/// except the last `spare` ones, ending in `aa | a`. No non-terminal stands for
/// a lone terminal.
pub fn crowded(spare: usize) -> ContextFreeGrammar {
    let start = nt("S0");
    let names = NameAllocator::candidates()
        .filter(|name| *name != start)
        .collect::<Vec<_>>();
    let chain = &names[..names.len() - spare];

    let mut g = ContextFreeGrammar::new();
    g.add_rule(
        start,
        [
            word(&[n("S0"), t('a')]),
            word(&[t('a'), Symbol::NonTerminal(chain[0])]),
        ],
    );
    for (name, next) in chain.iter().zip(&chain[1..]) {
        g.add_rule(
            *name,
            [word(&[t('a'), t('a'), Symbol::NonTerminal(*next)]), word(&[t('a')])],
        );
    }
    g.add_rule(
        chain[chain.len() - 1],
        [word(&[t('a'), t('a')]), word(&[t('a')])],
    );
    g
}

pub fn words(g: &ContextFreeGrammar, max_length: usize) -> Vec<String> {
    g.generate_words(max_length).unwrap()
}

fn only_start_is_erasable(g: &ContextFreeGrammar, lhs: &NonTerminal, word: &Production) -> bool {
    word.is_epsilon() && g.start_symbol() == Some(lhs)
}

fn start_is_not_referenced(g: &ContextFreeGrammar) -> bool {
    let start = g.start_symbol().copied();
    g.productions()
        .values()
        .flatten()
        .all(|word| word.non_terminals().all(|nt| Some(nt) != start))
}

pub fn is_chomsky_normal_form(g: &ContextFreeGrammar) -> bool {
    let shapes = g.productions().iter().all(|(lhs, rhs)| {
        rhs.iter().all(|word| match word.symbols() {
            [Symbol::Terminal(_)] => true,
            [Symbol::NonTerminal(_), Symbol::NonTerminal(_)] => true,
            _ => only_start_is_erasable(g, lhs, word),
        })
    });

    shapes && start_is_not_referenced(g)
}

pub fn is_greibach_normal_form(g: &ContextFreeGrammar) -> bool {
    g.productions().iter().all(|(lhs, rhs)| {
        rhs.iter().all(|word| match word.symbols() {
            [Symbol::Terminal(_), rest @ ..] => {
                rest.iter().all(|symbol| matches!(symbol, Symbol::NonTerminal(_)))
            }
            _ => only_start_is_erasable(g, lhs, word),
        })
    })
}

/// Whether `nt` derives the empty string, by expanding sentential forms up to
/// `depth` times.
pub fn derives_empty(g: &ContextFreeGrammar, nt: NonTerminal, depth: usize) -> bool {
    fn expand(g: &ContextFreeGrammar, form: Vec<Symbol>, depth: usize) -> bool {
        let form = form
            .into_iter()
            .filter(|symbol| *symbol != Symbol::Epsilon)
            .collect::<Vec<_>>();

        if form.iter().any(Symbol::is_terminal) {
            return false;
        }
        let Some((head, rest)) = form.split_first() else {
            return true;
        };
        if depth == 0 {
            return false;
        }

        let head = head.as_non_terminal().unwrap();
        g.productions_of(&head).into_iter().flatten().any(|word| {
            let next = word.symbols().iter().chain(rest).copied().collect();
            expand(g, next, depth - 1)
        })
    }

    expand(g, vec![Symbol::NonTerminal(nt)], depth)
}
