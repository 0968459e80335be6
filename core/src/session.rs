use web_time::Instant;

use crate::*;

/// Pull-based game timer. Readers ask for the elapsed time; stopping it freezes the value.
#[derive(Clone, Debug)]
pub struct GameClock {
    started: Instant,
    offset_secs: u64,
    stopped_at: Option<u64>,
}

impl GameClock {
    pub fn start() -> Self {
        Self::resume_from(0)
    }

    /// Continues counting from time already spent on a loaded game.
    pub fn resume_from(offset_secs: u64) -> Self {
        Self {
            started: Instant::now(),
            offset_secs,
            stopped_at: None,
        }
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.stopped_at
            .unwrap_or_else(|| self.offset_secs + self.started.elapsed().as_secs())
    }

    pub fn is_running(&self) -> bool {
        self.stopped_at.is_none()
    }

    pub fn stop(&mut self) {
        if self.is_running() {
            self.stopped_at = Some(self.elapsed_secs());
        }
    }
}

/// Game controller logic: owns the engine and the clock, and handles new, restart, save and load.
///
/// The engine has no reference back to the session; front ends call in here and read state after each call.
#[derive(Clone, Debug)]
pub struct GameSession {
    engine: BoardEngine,
    clock: GameClock,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Self {
        Self::with_seed(config, rand::random())
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::from_engine(BoardEngine::with_seed(config, seed), 0)
    }

    /// Wraps an existing engine; the clock starts stopped when the game is already over.
    pub fn from_engine(engine: BoardEngine, elapsed_secs: u64) -> Self {
        let mut clock = GameClock::resume_from(elapsed_secs);
        if engine.is_finished() {
            clock.stop();
        }
        Self { engine, clock }
    }

    /// Fresh layout, possibly with a different configuration.
    pub fn new_game(&mut self, config: GameConfig) {
        self.new_game_with_seed(config, rand::random());
    }

    pub fn new_game_with_seed(&mut self, config: GameConfig, seed: u64) {
        *self = Self::with_seed(config, seed);
    }

    /// Same layout, every cell hidden again and the clock back at zero.
    pub fn restart(&mut self) {
        self.engine.restart();
        self.clock = GameClock::start();
    }

    pub fn reveal(&mut self, index: CellIndex) -> Result<RevealOutcome> {
        let outcome = self.engine.reveal(index)?;
        self.check_finished();
        Ok(outcome)
    }

    pub fn toggle_flag(&mut self, index: CellIndex) -> Result<FlagOutcome> {
        let outcome = self.engine.toggle_flag(index)?;
        self.check_finished();
        Ok(outcome)
    }

    pub fn status(&self) -> GameStatus {
        self.engine.status()
    }

    pub fn engine(&self) -> &BoardEngine {
        &self.engine
    }

    pub fn config(&self) -> GameConfig {
        self.engine.config()
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.clock.elapsed_secs()
    }

    pub fn save(&self) -> SaveData {
        SaveData::from_engine(&self.engine, self.elapsed_secs())
    }

    /// Replaces the current game with a saved one. On error the current game is left untouched.
    pub fn load(&mut self, text: &str) -> Result<()> {
        let save: SaveData = text.parse()?;
        let engine = save.restore()?;
        log::debug!(
            "Loaded {}x{} board with {} items at {}s",
            save.grid_size,
            save.grid_size,
            save.item_count,
            save.elapsed_secs
        );
        *self = Self::from_engine(engine, save.elapsed_secs);
        Ok(())
    }

    fn check_finished(&mut self) {
        if !self.clock.is_running() {
            return;
        }
        match self.engine.status() {
            GameStatus::InProgress => {}
            GameStatus::Won => {
                self.clock.stop();
                log::info!("Game won in {}s", self.clock.elapsed_secs());
            }
            GameStatus::Lost => {
                self.clock.stop();
                log::info!("Game lost after {}s", self.clock.elapsed_secs());
            }
        }
    }
}
