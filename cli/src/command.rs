use std::str::FromStr;

use anyhow::{Context, bail};
use pokesweep_core::{CellCount, CellIndex, Coord, Coord2, to_index};

pub const HELP: &str = "\
r COL ROW        reveal a cell
f COL ROW        throw a pokeball (toggle a flag)
restart          same board, everything hidden again
new [SIZE ITEMS] new random board
save / load      write or read the save file
scores           show the high scores
quit             leave the game";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    Restart,
    NewGame(Option<(Coord, CellCount)>),
    Save,
    Load,
    Scores,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<Self> {
        use Command::*;

        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            bail!("Empty command");
        };

        let command = match name {
            "r" | "reveal" => Reveal(parse_coords(&mut words)?),
            "f" | "flag" => Flag(parse_coords(&mut words)?),
            "restart" => Restart,
            "new" => match (words.next(), words.next()) {
                (None, _) => NewGame(None),
                (Some(size), Some(items)) => NewGame(Some((
                    size.parse().context("Invalid grid size")?,
                    items.parse().context("Invalid item count")?,
                ))),
                (Some(_), None) => bail!("Usage: new [SIZE ITEMS]"),
            },
            "save" => Save,
            "load" => Load,
            "scores" => Scores,
            "help" | "?" => Help,
            "q" | "quit" => Quit,
            other => bail!("Unknown command `{other}`, type `help` for a list"),
        };

        if words.next().is_some() {
            bail!("Too many arguments for `{name}`");
        }
        Ok(command)
    }
}

fn parse_coords<'a>(words: &mut impl Iterator<Item = &'a str>) -> anyhow::Result<Coord2> {
    let (Some(col), Some(row)) = (words.next(), words.next()) else {
        bail!("Expected a column and a row");
    };
    Ok((
        col.parse().context("Invalid column")?,
        row.parse().context("Invalid row")?,
    ))
}

/// Maps typed coordinates to a cell index, rejecting anything off the board.
pub fn cell_index((col, row): Coord2, size: Coord) -> anyhow::Result<CellIndex> {
    if col >= size || row >= size {
        bail!("({col}, {row}) is outside the {size}x{size} board");
    }
    Ok(to_index((col, row), size))
}
