use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gramnorm::{
    read_grammar, ChomskyNormalFormGrammar, ContextFreeGrammar, GeneratorConfig,
    GrammarSummary, GreibachNormalFormGrammar,
};
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Writes the Chomsky and Greibach normal forms next to the grammar file.
    Normalize {
        #[arg(value_name = "GRAMMAR")]
        file: PathBuf,
    },

    /// Prints every word of at most LENGTH symbols, one per line.
    Generate {
        length: usize,

        #[arg(value_name = "GRAMMAR")]
        file: PathBuf,

        /// Derivation tree levels allowed per output symbol.
        #[arg(long, default_value_t = GeneratorConfig::default().depth_factor)]
        depth_factor: usize,
    },

    /// Prints a table describing each non-terminal.
    Inspect {
        #[arg(value_name = "GRAMMAR")]
        file: PathBuf,
    },
}

fn load(path: &Path) -> Result<ContextFreeGrammar> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not read grammar from {}", path.display()))?;

    // Bad lines have already been logged by the reader.
    let (grammar, errors) = read_grammar(&text);
    if !errors.is_empty() {
        info!("{} lines of {} were skipped", errors.len(), path.display());
    }

    Ok(grammar)
}

fn normalize(path: &Path) -> Result<()> {
    let grammar = load(path)?;

    let cnf = ChomskyNormalFormGrammar::from_context_free_grammar(&grammar)?;
    let cnf_path = path.with_extension("chomsky");
    fs::write(&cnf_path, cnf.to_string())
        .with_context(|| format!("Could not write {}", cnf_path.display()))?;
    info!("Chomsky normal form written to {}", cnf_path.display());

    let gnf = GreibachNormalFormGrammar::from_context_free_grammar(&grammar)?;
    let gnf_path = path.with_extension("greibach");
    fs::write(&gnf_path, gnf.to_string())
        .with_context(|| format!("Could not write {}", gnf_path.display()))?;
    info!("Greibach normal form written to {}", gnf_path.display());

    Ok(())
}

fn generate(length: usize, path: &Path, depth_factor: usize) -> Result<()> {
    let grammar = load(path)?;

    for word in grammar.generate_words_with(length, GeneratorConfig { depth_factor })? {
        println!("{word}");
    }

    Ok(())
}

fn inspect(path: &Path) -> Result<()> {
    let grammar = load(path)?;

    print!("{grammar}");
    println!();
    print!("{}", GrammarSummary::new(&grammar));

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Command::Normalize { file } => normalize(&file),
        Command::Generate {
            length,
            file,
            depth_factor,
        } => generate(length, &file, depth_factor),
        Command::Inspect { file } => inspect(&file),
    }
}
