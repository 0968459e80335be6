//! Terminal front end for Pokesweep.
//!
//! Reads one command per line from stdin and prints the board after every move.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use pokesweep_core::{CellCount, Coord, GameConfig, GameSession, ScoreStore};

use crate::app::{App, Flow, format_elapsed};
use crate::command::Command;

mod app;
mod command;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Side length of the square board
    #[arg(long, default_value_t = GameConfig::DEFAULT_SIZE)]
    size: Coord,

    /// Number of hidden pokemon
    #[arg(long, default_value_t = GameConfig::DEFAULT_ITEMS)]
    items: CellCount,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Where `save` and `load` keep the game
    #[arg(long, default_value = "game_save.txt")]
    save_file: PathBuf,

    /// Append-only list of winners
    #[arg(long, default_value = "winner_record.txt")]
    scores_file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();
    log::debug!("seed: {:?}", args.seed);

    let config = GameConfig::new(args.size, args.items).context("Invalid board configuration")?;
    let session = match args.seed {
        Some(seed) => GameSession::with_seed(config, seed),
        None => GameSession::new(config),
    };
    let mut app = App::new(session, args.save_file, ScoreStore::new(args.scores_file));

    let mut lines = io::stdin().lock().lines();
    let mut out = io::stdout().lock();

    writeln!(out, "Pokemon: Got 2 Find Them All! Type `help` for commands.")?;
    app.render(&mut out)?;
    prompt(&mut out)?;

    while let Some(line) = lines.next() {
        let line = line?;
        if line.trim().is_empty() {
            prompt(&mut out)?;
            continue;
        }

        match line
            .parse::<Command>()
            .and_then(|command| app.update(command, &mut out))
        {
            Ok(Flow::Quit) => break,
            Ok(Flow::Won) => {
                let elapsed = app.session().elapsed_secs();
                writeln!(out, "You won in {}! Enter your name:", format_elapsed(elapsed))?;
                out.flush()?;
                let name = lines.next().transpose()?.unwrap_or_default();
                if let Err(err) = app.record_win(&name).and_then(|()| app.render_scores(&mut out)) {
                    log::error!("{err:#}");
                }
            }
            Ok(Flow::Continue) => {}
            Err(err) => writeln!(out, "error: {err:#}")?,
        }
        prompt(&mut out)?;
    }

    Ok(())
}

fn prompt(out: &mut impl Write) -> io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}
