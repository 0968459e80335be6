use core::fmt;
use core::str::{FromStr, Lines};
use serde::{Deserialize, Serialize};

use crate::*;

/// Field label, plus the name older save files used for it.
#[derive(Copy, Clone)]
struct Label {
    name: &'static str,
    legacy: &'static str,
}

impl Label {
    const fn new(name: &'static str, legacy: &'static str) -> Self {
        Self { name, legacy }
    }

    fn matches(self, label: &str) -> bool {
        label == self.name || label == self.legacy
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

const GRID_SIZE: Label = Label::new("grid_size", "grid_size");
const ITEM_COUNT: Label = Label::new("item_count", "pokemon_num");
const ELAPSED: Label = Label::new("elapsed", "timer");
const ITEM_LOCATIONS: Label = Label::new("item_locations", "pokemon_locations");
const FLAGS_PLACED: Label = Label::new("flags_placed", "attempted_num");
const FLAGS_REMAINING: Label = Label::new("flags_remaining", "pokeball_leave");
const CELLS: Label = Label::new("cells", "board");

/// Saved game: seven `label: value` lines, always in this field order.
///
/// Reading also accepts the older labels (`pokemon_num`, `timer`, `pokemon_locations`, `attempted_num`,
/// `pokeball_leave` and `board`).
///
/// ```text
/// grid_size: 3
/// item_count: 1
/// elapsed: 42
/// item_locations: 4
/// flags_placed: 1
/// flags_remaining: 0
/// cells: 1~~~♥~~~~
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    pub grid_size: Coord,
    pub item_count: CellCount,
    pub elapsed_secs: u64,
    pub item_locations: Vec<CellIndex>,
    pub flags_placed: CellCount,
    pub flags_remaining: CellCount,
    /// Cell states in linear index order.
    pub cells: Vec<Cell>,
}

impl SaveData {
    pub fn from_engine(engine: &BoardEngine, elapsed_secs: u64) -> Self {
        Self {
            grid_size: engine.size(),
            item_count: engine.total_items(),
            elapsed_secs,
            item_locations: engine.item_locations().to_vec(),
            flags_placed: engine.flags_placed(),
            flags_remaining: engine.flags_remaining(),
            cells: engine.cells().collect(),
        }
    }

    /// Rebuilds the saved board. Nothing is derived besides the engine's internal counters, which must agree with
    /// the stored flag fields.
    pub fn restore(&self) -> Result<BoardEngine> {
        if self.grid_size == 0 {
            return Err(GameError::CorruptSaveData("grid size is zero"));
        }
        if self.item_locations.len() != usize::from(self.item_count) {
            return Err(GameError::CorruptSaveData(
                "item list does not match item count",
            ));
        }

        let layout =
            ItemLayout::from_indices(self.grid_size, &self.item_locations).map_err(|err| match err {
                GameError::IndexOutOfRange => GameError::CorruptSaveData("item location out of range"),
                GameError::DuplicateItem => GameError::CorruptSaveData("duplicate item location"),
                other => other,
            })?;
        let engine = BoardEngine::restore(layout, self.cells.clone())?;

        if engine.flags_placed() != self.flags_placed {
            return Err(GameError::CorruptSaveData(
                "placed flags do not match the board",
            ));
        }
        if engine.flags_remaining() != self.flags_remaining {
            return Err(GameError::CorruptSaveData(
                "remaining flags do not match the board",
            ));
        }

        Ok(engine)
    }
}

impl fmt::Display for SaveData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{GRID_SIZE}: {}", self.grid_size)?;
        writeln!(f, "{ITEM_COUNT}: {}", self.item_count)?;
        writeln!(f, "{ELAPSED}: {}", self.elapsed_secs)?;
        write!(f, "{ITEM_LOCATIONS}:")?;
        for (i, index) in self.item_locations.iter().enumerate() {
            let separator = if i == 0 { " " } else { ", " };
            write!(f, "{separator}{index}")?;
        }
        writeln!(f)?;
        writeln!(f, "{FLAGS_PLACED}: {}", self.flags_placed)?;
        writeln!(f, "{FLAGS_REMAINING}: {}", self.flags_remaining)?;
        write!(f, "{CELLS}: ")?;
        for cell in &self.cells {
            write!(f, "{cell}")?;
        }
        writeln!(f)
    }
}

impl FromStr for SaveData {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let mut fields = FieldReader { lines: s.lines() };

        let grid_size = parse_number(fields.field(GRID_SIZE)?, "invalid grid size")?;
        let item_count = parse_number(fields.field(ITEM_COUNT)?, "invalid item count")?;
        let elapsed_secs = parse_number(fields.field(ELAPSED)?, "invalid elapsed time")?;
        let item_locations = parse_locations(fields.field(ITEM_LOCATIONS)?)?;
        let flags_placed = parse_number(fields.field(FLAGS_PLACED)?, "invalid placed flag count")?;
        let flags_remaining =
            parse_number(fields.field(FLAGS_REMAINING)?, "invalid remaining flag count")?;
        let cells = fields
            .field(CELLS)?
            .chars()
            .map(|symbol| {
                Cell::from_symbol(symbol).ok_or(GameError::CorruptSaveData("unknown cell symbol"))
            })
            .collect::<Result<Vec<_>>>()?;

        if fields.lines.any(|line| !line.trim().is_empty()) {
            return Err(GameError::CorruptSaveData("unexpected trailing data"));
        }

        Ok(Self {
            grid_size,
            item_count,
            elapsed_secs,
            item_locations,
            flags_placed,
            flags_remaining,
            cells,
        })
    }
}

struct FieldReader<'a> {
    lines: Lines<'a>,
}

impl<'a> FieldReader<'a> {
    /// Value of the next line, which must carry `label`.
    fn field(&mut self, label: Label) -> Result<&'a str> {
        let line = self
            .lines
            .next()
            .ok_or(GameError::CorruptSaveData("missing field"))?;
        let (name, value) = line
            .split_once(':')
            .ok_or(GameError::CorruptSaveData("line without a label"))?;
        if !label.matches(name.trim()) {
            return Err(GameError::CorruptSaveData("unexpected field label"));
        }
        Ok(value.trim())
    }
}

fn parse_number<T: FromStr>(value: &str, reason: &'static str) -> Result<T> {
    value.parse().map_err(|_| GameError::CorruptSaveData(reason))
}

/// Comma-separated indices; a surrounding tuple's parentheses are tolerated.
fn parse_locations(value: &str) -> Result<Vec<CellIndex>> {
    value
        .trim_start_matches('(')
        .trim_end_matches(')')
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| parse_number(part, "invalid item location"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MID_GAME: &str = "\
grid_size: 3
item_count: 1
elapsed: 42
item_locations: 4
flags_placed: 1
flags_remaining: 0
cells: 1~~~♥~~~~
";

    fn mid_game_engine() -> BoardEngine {
        let mut engine = BoardEngine::new(ItemLayout::from_indices(3, &[4]).unwrap());
        engine.reveal(0).unwrap();
        engine.toggle_flag(4).unwrap();
        engine
    }

    #[test]
    fn writes_seven_labeled_lines() {
        let save = SaveData::from_engine(&mid_game_engine(), 42);

        assert_eq!(save.to_string(), MID_GAME);
    }

    #[test]
    fn parses_and_restores_saved_board() {
        let save: SaveData = MID_GAME.parse().unwrap();
        let engine = save.restore().unwrap();

        assert_eq!(save.elapsed_secs, 42);
        assert_eq!(engine, mid_game_engine());
        assert_eq!(engine.cell(0).unwrap(), Cell::Revealed(1));
        assert_eq!(engine.flags_placed(), 1);
    }

    #[test]
    fn round_trip_preserves_reachable_states() {
        let mut engine = BoardEngine::with_seed(GameConfig::new(8, 10).unwrap(), 99);
        let moves = [(true, 0), (false, 9), (true, 63), (false, 20), (true, 35), (false, 9)];

        for (reveal, index) in moves {
            if reveal {
                engine.reveal(index).unwrap();
            } else {
                engine.toggle_flag(index).unwrap();
            }

            let text = SaveData::from_engine(&engine, 7).to_string();
            let restored = text.parse::<SaveData>().unwrap().restore().unwrap();

            assert_eq!(restored.snapshot(), engine.snapshot());
            assert_eq!(restored.item_locations(), engine.item_locations());
            assert_eq!(restored.flags_placed(), engine.flags_placed());
            assert_eq!(restored.flags_remaining(), engine.flags_remaining());
            assert_eq!(restored.status(), engine.status());
        }
    }

    #[test]
    fn lost_board_round_trips() {
        let mut engine = BoardEngine::new(ItemLayout::from_indices(2, &[1, 2]).unwrap());
        engine.toggle_flag(2).unwrap();
        engine.reveal(1).unwrap();

        let text = SaveData::from_engine(&engine, 3).to_string();
        let restored = text.parse::<SaveData>().unwrap().restore().unwrap();

        assert!(text.contains("item_locations: 1, 2\n"));
        assert!(text.ends_with("cells: ~☺☺~\n"));
        assert_eq!(restored, engine);
        assert_eq!(restored.status(), GameStatus::Lost);
    }

    #[test]
    fn empty_item_list_is_accepted() {
        let text = "grid_size: 1\nitem_count: 0\nelapsed: 0\nitem_locations:\nflags_placed: 0\nflags_remaining: 0\ncells: ~";

        let engine = text.parse::<SaveData>().unwrap().restore().unwrap();

        assert!(engine.item_locations().is_empty());
        assert_eq!(engine.status(), GameStatus::InProgress);
    }

    #[test]
    fn reads_files_with_older_labels() {
        let text = "\
grid_size: 3
pokemon_num: 1
timer: 42
pokemon_locations: (4,)
attempted_num: 1
pokeball_leave: 0
board: 1~~~♥~~~~";

        let save: SaveData = text.parse().unwrap();

        assert_eq!(save.restore().unwrap(), mid_game_engine());
        assert_eq!(save.to_string(), MID_GAME);
    }

    #[test]
    fn tuple_style_locations_are_accepted() {
        assert_eq!(parse_locations("(3, 17, 42)").unwrap(), [3, 17, 42]);
        assert_eq!(parse_locations("(5,)").unwrap(), [5]);
        assert_eq!(parse_locations("()").unwrap(), Vec::<CellIndex>::new());
    }

    fn corrupt(text: &str) -> GameError {
        text.parse::<SaveData>()
            .and_then(|save| save.restore())
            .unwrap_err()
    }

    #[test]
    fn rejects_malformed_files() {
        let cases = [
            (MID_GAME.replace("grid_size: 3", "grid_size: -3"), "invalid grid size"),
            (MID_GAME.replace("elapsed", "clock"), "unexpected field label"),
            (MID_GAME.replace("cells: 1~~~♥~~~~\n", ""), "missing field"),
            (MID_GAME.replace("item_locations: 4", "item_locations: 4, x"), "invalid item location"),
            (MID_GAME.replace("item_locations: 4", "item_locations: 9"), "item location out of range"),
            (MID_GAME.replace("item_locations: 4", "item_locations: 4, 5"), "item list does not match item count"),
            (MID_GAME.replace("1~~~♥~~~~", "1~~~♥~~~"), "cell count does not match grid size"),
            (MID_GAME.replace("1~~~♥~~~~", "1~~~♥~~~X"), "unknown cell symbol"),
            (MID_GAME.replace("1~~~♥~~~~", "1~~~0~~~~"), "item cell shown as safe"),
            (
                MID_GAME
                    .replace("item_locations: 4", "item_locations: 8")
                    .replace("flags_placed: 1", "flags_placed: 0")
                    .replace("flags_remaining: 0", "flags_remaining: 1")
                    .replace("1~~~♥~~~~", "~~~~0~~~~"),
                "stale adjacent count",
            ),
            (MID_GAME.replace("1~~~♥~~~~", "2~~~♥~~~~"), "stale adjacent count"),
            (MID_GAME.replace("flags_placed: 1", "flags_placed: 0"), "placed flags do not match the board"),
            (MID_GAME.replace("flags_remaining: 0", "flags_remaining: 1"), "remaining flags do not match the board"),
            (format!("{MID_GAME}extra: 1\n"), "unexpected trailing data"),
        ];

        for (text, reason) in cases {
            assert_eq!(corrupt(&text), GameError::CorruptSaveData(reason), "{text}");
        }
    }
}
