use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use pokesweep_core::*;

use crate::command::{self, Command};

/// What the input loop should do after a command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The last move won the game, ask for a name.
    Won,
    Quit,
}

pub struct App {
    session: GameSession,
    save_path: PathBuf,
    scores: ScoreStore,
}

impl App {
    pub fn new(session: GameSession, save_path: PathBuf, scores: ScoreStore) -> Self {
        Self {
            session,
            save_path,
            scores,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn update(&mut self, command: Command, out: &mut impl Write) -> anyhow::Result<Flow> {
        use Command::*;

        let status_before = self.session.status();
        let size = self.session.engine().size();
        let is_move = matches!(command, Reveal(_) | Flag(_));

        match command {
            Reveal(coords) => {
                let index = command::cell_index(coords, size)?;
                let outcome = self.session.reveal(index)?;
                log::debug!("reveal {:?}: {:?}", coords, outcome);
            }
            Flag(coords) => {
                let index = command::cell_index(coords, size)?;
                let outcome = self.session.toggle_flag(index)?;
                log::debug!("flag {:?}: {:?}", coords, outcome);
                if outcome == FlagOutcome::BudgetExhausted {
                    writeln!(out, "No pokeballs left, take one back first.")?;
                }
            }
            Restart => self.session.restart(),
            NewGame(params) => {
                let config = match params {
                    Some((size, items)) => GameConfig::new(size, items)?,
                    None => self.session.config(),
                };
                self.session.new_game(config);
            }
            Save => {
                fs::write(&self.save_path, self.session.save().to_string()).with_context(|| {
                    format!("Could not write save file {}", self.save_path.display())
                })?;
                writeln!(out, "Game saved to {}", self.save_path.display())?;
                return Ok(Flow::Continue);
            }
            Load => {
                let text = fs::read_to_string(&self.save_path).with_context(|| {
                    format!("Could not read save file {}", self.save_path.display())
                })?;
                self.session.load(&text).context("Save file is corrupt")?;
            }
            Scores => {
                self.render_scores(out)?;
                return Ok(Flow::Continue);
            }
            Help => {
                writeln!(out, "{}", command::HELP)?;
                return Ok(Flow::Continue);
            }
            Quit => return Ok(Flow::Quit),
        }

        self.render(out)?;

        // only a move played here can end the game; a loaded board keeps its old result
        let status_after = self.session.status();
        if !is_move || status_before == status_after {
            return Ok(Flow::Continue);
        }
        Ok(match status_after {
            GameStatus::Won => Flow::Won,
            GameStatus::Lost => {
                writeln!(out, "You lose! Type `new` to play again or `quit`.")?;
                Flow::Continue
            }
            GameStatus::InProgress => Flow::Continue,
        })
    }

    pub fn record_win(&self, name: &str) -> anyhow::Result<()> {
        let record = ScoreRecord::new(name, self.session.elapsed_secs());
        self.scores
            .append(&record)
            .with_context(|| format!("Could not record score in {}", self.scores.path().display()))
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        let snapshot = self.session.engine().snapshot();

        write!(out, "   ")?;
        for col in 0..snapshot.size {
            write!(out, "{col:>3}")?;
        }
        writeln!(out)?;
        for (row, cells) in snapshot.rows().enumerate() {
            write!(out, "{row:>3}")?;
            for cell in cells {
                write!(out, "{:>3}", cell.symbol())?;
            }
            writeln!(out)?;
        }

        writeln!(
            out,
            "{} attempted catches, {} pokeballs left, {}",
            snapshot.flags_placed,
            snapshot.flags_remaining(),
            format_elapsed(self.session.elapsed_secs())
        )
    }

    pub fn render_scores(&self, out: &mut impl Write) -> anyhow::Result<()> {
        let board = self.scores.load()?;
        writeln!(out, "High Scores")?;
        if board.is_empty() {
            writeln!(out, "  nobody has caught them all yet")?;
        }
        for record in board.top(TOP_SCORES) {
            writeln!(out, "  {}: {}", record.name, format_elapsed(record.elapsed_secs))?;
        }
        Ok(())
    }
}

pub fn format_elapsed(secs: u64) -> String {
    format!("{}m {}s", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(size: Coord, items: &[CellIndex]) -> App {
        let layout = ItemLayout::from_indices(size, items).unwrap();
        let session = GameSession::from_engine(BoardEngine::new(layout), 0);
        let dir = std::env::temp_dir();
        let id = std::process::id();
        App::new(
            session,
            dir.join(format!("pokesweep-cli-save-{id}.txt")),
            ScoreStore::new(dir.join(format!("pokesweep-cli-scores-{id}.txt"))),
        )
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_elapsed(5), "0m 5s");
        assert_eq!(format_elapsed(125), "2m 5s");
    }

    #[test]
    fn renders_grid_and_status_line() {
        let mut app = app(2, &[3]);
        let mut out = Vec::new();

        app.update(Command::Reveal((1, 0)), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("  0  ~  1\n"));
        assert!(text.contains("0 attempted catches, 1 pokeballs left"));
    }

    #[test]
    fn winning_move_reports_won() {
        let mut app = app(2, &[0]);
        let mut out = Vec::new();

        app.update(Command::Flag((0, 0)), &mut out).unwrap();
        app.update(Command::Reveal((1, 0)), &mut out).unwrap();
        app.update(Command::Reveal((0, 1)), &mut out).unwrap();
        let flow = app.update(Command::Reveal((1, 1)), &mut out).unwrap();

        assert_eq!(flow, Flow::Won);
    }

    #[test]
    fn off_board_coordinates_are_an_error() {
        let mut app = app(2, &[0]);
        let mut out = Vec::new();

        assert!(app.update(Command::Reveal((2, 0)), &mut out).is_err());
        assert!(app.session().engine().cells().all(Cell::is_hidden));
    }

    #[test]
    fn save_and_load_through_the_save_file() {
        let mut app = app(3, &[4]);
        let mut out = Vec::new();

        app.update(Command::Reveal((0, 0)), &mut out).unwrap();
        app.update(Command::Save, &mut out).unwrap();
        app.update(Command::Restart, &mut out).unwrap();
        app.update(Command::Load, &mut out).unwrap();

        assert_eq!(app.session().engine().cell(0).unwrap(), Cell::Revealed(1));
        fs::remove_file(&app.save_path).unwrap();
    }

    #[test]
    fn loading_a_won_game_does_not_ask_for_a_name() {
        let mut app = app(2, &[0]);
        app.save_path = std::env::temp_dir().join(format!("pokesweep-cli-won-{}.txt", std::process::id()));
        let mut out = Vec::new();

        app.update(Command::Flag((0, 0)), &mut out).unwrap();
        for coords in [(1, 0), (0, 1), (1, 1)] {
            app.update(Command::Reveal(coords), &mut out).unwrap();
        }
        app.update(Command::Save, &mut out).unwrap();
        app.update(Command::Restart, &mut out).unwrap();
        let flow = app.update(Command::Load, &mut out).unwrap();

        assert_eq!(flow, Flow::Continue);
        assert_eq!(app.session().status(), GameStatus::Won);
        fs::remove_file(&app.save_path).unwrap();
    }
}
