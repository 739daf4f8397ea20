//! Terminal front-end for playing a game folder
//!
//! Prints each screen as text and reads commands from standard input:
//! `<category> <row>` (1-based) picks a clue, an empty line acknowledges the
//! current screen and `q` leaves the session.

use std::{
    cell::Cell,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};
use garde::Validate;
use jeopardy::{
    Game, IncomingMessage, Presenter, UpdateMessage,
    board::{
        clue::ClueKey,
        loader::{list_games, load_game_catalog},
        media::Media,
    },
    config::Options,
    game::{Acknowledgement, ClueMessage},
};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "jeopardy")]
#[command(about = "Host a Jeopardy-style trivia game from a folder of tables")]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the games inside a directory
    List {
        /// Directory holding one folder per game
        dir: PathBuf,
    },
    /// Play a game folder
    Play {
        /// Game folder containing order.csv
        folder: PathBuf,

        /// Value of the first row
        #[arg(long)]
        base_value: Option<u64>,

        /// Multiplier applied in the double round
        #[arg(long)]
        double_multiplier: Option<u64>,

        /// Play without daily doubles
        #[arg(long)]
        no_daily_doubles: bool,
    },
}

/// Prints screens to standard output
#[derive(Default)]
struct TerminalPresenter {
    finished: Cell<bool>,
}

impl TerminalPresenter {
    fn print_clue(heading: &str, clue: &ClueMessage) {
        match clue.value {
            Some(value) => println!("\n{heading}: {} for {value}", clue.category),
            None => println!("\n{heading}: {}", clue.category),
        }
        if clue.daily_double {
            println!("(daily double)");
        }
        println!("  {}", clue.text);
        if let Some(warning) = &clue.warning {
            println!("  [{warning}]");
        }
    }
}

impl Presenter for TerminalPresenter {
    fn send_message(&self, message: &UpdateMessage) {
        match message {
            UpdateMessage::Board(board) => {
                println!("\n== {} ==", board.round);
                for (index, column) in board.columns.iter().enumerate() {
                    let tiles = column
                        .tiles
                        .iter()
                        .map(|tile| match tile {
                            Some(tile) if !tile.spent => format!("{:>6}", tile.value),
                            _ => format!("{:>6}", "-"),
                        })
                        .collect::<String>();
                    println!("{:>2}. {:<24}{tiles}", index + 1, column.category);
                }
            }
            UpdateMessage::DailyDouble {
                text,
                category,
                value,
            } => println!("\n*** {text} *** {category} for {value}"),
            UpdateMessage::Clue(clue) => Self::print_clue("Clue", clue),
            UpdateMessage::RoundTransition { text, .. } => println!("\n{text}"),
            UpdateMessage::FinalCategory { category } => {
                println!("\nFinal category: {category}");
            }
            UpdateMessage::FinalClue(clue) => Self::print_clue("Final clue", clue),
            UpdateMessage::Ended => println!("\nGame over."),
        }
    }

    fn play_media(&self, media: &Media) {
        println!("  <{} {}>", media.kind, media.path.display());
    }

    fn stop_media(&self) {}

    fn return_to_menu(&self) {
        self.finished.set(true);
    }
}

fn parse_command(line: &str) -> Option<IncomingMessage> {
    let line = line.trim();
    if line.is_empty() {
        return Some(Acknowledgement::Confirm.into());
    }
    if line.eq_ignore_ascii_case("q") {
        return Some(IncomingMessage::Exit);
    }

    let (category, row) = line.split_once(char::is_whitespace)?;
    let category = category.trim().parse::<usize>().ok()?.checked_sub(1)?;
    let row = row.trim().parse::<usize>().ok()?.checked_sub(1)?;
    Some(ClueKey::new(category, row).into())
}

fn play(folder: &Path, options: Options) -> Result<(), Box<dyn std::error::Error>> {
    options.validate()?;
    let catalog = load_game_catalog(folder)?;
    if catalog.is_empty() {
        warn!(folder = %folder.display(), "game has no playable rounds");
    } else if catalog.len() < catalog.manifest().rounds().len() {
        warn!(
            listed = catalog.manifest().rounds().len(),
            loaded = catalog.len(),
            "some rounds could not be loaded"
        );
    }

    let presenter = TerminalPresenter::default();
    let mut game = Game::new(catalog, options);
    game.play(&presenter);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while !presenter.finished.get() {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            game.receive_message(IncomingMessage::Exit, &presenter);
            break;
        };
        match parse_command(&line?) {
            Some(message) => game.receive_message(message, &presenter),
            None => println!("Enter `<category> <row>`, an empty line to continue or `q` to quit."),
        }
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match args.command {
        Command::List { dir } => {
            let games = list_games(&dir)?;
            info!(count = games.len(), "games listed");
            for game in games {
                println!("{}", game.name);
            }
        }
        Command::Play {
            folder,
            base_value,
            double_multiplier,
            no_daily_doubles,
        } => {
            let defaults = Options::default();
            let options = Options {
                base_value: base_value.unwrap_or(defaults.base_value),
                double_multiplier: double_multiplier.unwrap_or(defaults.double_multiplier),
                daily_doubles: !no_daily_doubles,
            };
            play(&folder, options)?;
        }
    }

    Ok(())
}
