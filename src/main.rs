//! flashdeck - spaced repetition flashcards from the command line
//!
//! A thin front end over the flashdeck engine: create decks, add or import
//! cards, and review whatever is currently due.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use flashdeck::config::Config;
use flashdeck::{Deck, DeckStore, SrsMethod};

// ══════════════════════════════════════════════════════════════════════════
// CLI Arguments
// ══════════════════════════════════════════════════════════════════════════

#[derive(Parser, Debug)]
#[command(name = "flashdeck")]
#[command(author, version, about = "Spaced repetition flashcards from the command line", long_about = None)]
struct Cli {
    /// Directory containing deck files
    #[arg(long, global = true)]
    decks_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List stored decks
    List,

    /// Create a new, empty deck
    Create {
        /// Deck name
        name: String,

        /// Scheduling method
        #[arg(long, default_value = "fibonacci")]
        method: SrsMethod,
    },

    /// Add a card to a deck
    Add {
        /// Deck name
        deck: String,

        /// Front of the card (the prompt)
        front: String,

        /// Back of the card (the answer)
        back: String,
    },

    /// Show deck statistics
    Stats {
        /// Deck name
        deck: String,
    },

    /// Review the pending cards of a deck
    Review {
        /// Deck name
        deck: String,
    },

    /// Import cards from a CSV file (front,back per line)
    Import {
        /// Deck name; created if it does not exist yet
        deck: String,

        /// Path to the CSV file
        csv: PathBuf,
    },
}

// ══════════════════════════════════════════════════════════════════════════
// Main Entry Point
// ══════════════════════════════════════════════════════════════════════════

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    // The flag wins over the config file, the config file over the
    // platform default.
    let decks_dir = match cli.decks_dir {
        Some(dir) => dir,
        None => Config::load().unwrap_or_default().resolved_decks_dir(),
    };
    let store = DeckStore::new(decks_dir)?;

    match cli.command {
        Command::List => cmd_list(&store),
        Command::Create { name, method } => cmd_create(store, &name, method),
        Command::Add { deck, front, back } => cmd_add(store, &deck, front, back),
        Command::Stats { deck } => cmd_stats(store, &deck),
        Command::Review { deck } => cmd_review(store, &deck),
        Command::Import { deck, csv } => cmd_import(store, &deck, &csv),
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Commands
// ══════════════════════════════════════════════════════════════════════════

fn cmd_list(store: &DeckStore) -> Result<()> {
    let names = store.list()?;
    if names.is_empty() {
        println!("No decks yet. Create one with 'flashdeck create <name>'.");
        return Ok(());
    }

    for name in names {
        match Deck::open(store.clone(), &name) {
            Ok(deck) => println!(
                "{:<24} {:>4} cards, {:>4} pending",
                name,
                deck.total_count(),
                deck.pending_count()
            ),
            Err(e) => println!("{:<24} (unreadable: {})", name, e),
        }
    }
    Ok(())
}

fn cmd_create(store: DeckStore, name: &str, method: SrsMethod) -> Result<()> {
    if store.exists(name) {
        bail!("deck '{}' already exists", name);
    }

    Deck::create(store, name, method)?;
    println!("✓ Created deck '{}' ({})", name, method);
    Ok(())
}

fn cmd_add(store: DeckStore, name: &str, front: String, back: String) -> Result<()> {
    let mut deck = Deck::open(store, name)?;
    deck.add_card(front, back)?;
    println!(
        "✓ Added card to '{}' ({} total, {} pending)",
        name,
        deck.total_count(),
        deck.pending_count()
    );
    Ok(())
}

fn cmd_stats(store: DeckStore, name: &str) -> Result<()> {
    let deck = Deck::open(store, name)?;
    let stats = deck.stats();

    println!("Deck '{}' ({})", deck.name(), deck.method());
    println!("  Total:    {}", stats.total_cards);
    println!("  Pending:  {}", stats.pending_cards);
    println!("  Learning: {}", stats.learning_cards);
    println!("  Mature:   {}", stats.mature_cards);
    Ok(())
}

fn cmd_review(store: DeckStore, name: &str) -> Result<()> {
    let mut deck = Deck::open(store, name)?;
    if deck.pending_count() == 0 {
        println!("Nothing is pending in '{}'.", name);
        return Ok(());
    }

    println!(
        "Reviewing '{}': {} of {} cards pending. Answer y/n, or q to stop.",
        name,
        deck.pending_count(),
        deck.total_count()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut reviewed = 0u32;

    loop {
        // Missed cards stay due, so the loop keeps serving the deck until
        // everything pending has been answered correctly or the user quits.
        let (handle, front, back) = match deck.next_pending_card() {
            Some((handle, card)) => (handle, card.front().to_string(), card.back().to_string()),
            None => break,
        };

        println!();
        println!("Q: {}", front);
        print!("  [Enter] to reveal: ");
        io::stdout().flush()?;
        match lines.next() {
            Some(line) => {
                if is_quit(&line?) {
                    break;
                }
            }
            None => break,
        }

        println!("A: {}", back);
        print!("  Did you recall it? [y/n/q]: ");
        io::stdout().flush()?;
        let answer = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        if is_quit(&answer) {
            break;
        }

        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => {
                deck.record_outcome(handle, true)?;
                reviewed += 1;
            }
            "n" | "no" => {
                deck.record_outcome(handle, false)?;
                println!("  It will come around again before the session ends.");
                reviewed += 1;
            }
            _ => println!("  Please answer y or n."),
        }
    }

    println!(
        "\nDone: {} answered, {} still pending.",
        reviewed,
        deck.pending_count()
    );
    Ok(())
}

/// Either quit spelling, any case, surrounding whitespace ignored.
fn is_quit(input: &str) -> bool {
    let cmd = input.trim().to_lowercase();
    cmd == "q" || cmd == "quit"
}

fn cmd_import(store: DeckStore, name: &str, csv_path: &Path) -> Result<()> {
    let mut deck = if store.exists(name) {
        Deck::open(store, name)?
    } else {
        Deck::create(store, name, SrsMethod::Fibonacci)?
    };

    let content = fs::read_to_string(csv_path)
        .with_context(|| format!("Failed to read CSV file: {:?}", csv_path))?;

    let mut imported = 0;
    for (i, line) in content.lines().enumerate() {
        // Skip header
        if i == 0 && line.to_lowercase().contains("front") {
            continue;
        }

        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() >= 2 {
            let front = parts[0].trim();
            let back = parts[1].trim();

            if !front.is_empty() && !back.is_empty() {
                deck.add_card(front.to_string(), back.to_string())?;
                imported += 1;
            }
        }
    }

    println!("✓ Imported {} cards into '{}'", imported, name);
    Ok(())
}
