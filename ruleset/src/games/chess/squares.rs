/*
 *  Ruleset, game rules as seen by a search.
 *  Copyright (C) 2024 ToTheAnd
 *
 *  Ruleset is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  Ruleset is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with Ruleset. If not, see <https://www.gnu.org/licenses/>.
 */

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chess::{File, Rank, Square};

use crate::OracleError;

pub const NUM_ROWS: usize = 8;
pub const NUM_COLUMNS: usize = 8;
pub const NUM_SQUARES: usize = NUM_ROWS * NUM_COLUMNS;

/// Square index in little-endian rank-file order: a1 is 0, h1 is 7, a8 is 56.
#[derive(Default, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Copy, Clone)]
pub struct ChessSquare {
    idx: u8,
}

impl ChessSquare {
    pub const fn new(idx: usize) -> Self {
        debug_assert!(idx < NUM_SQUARES);
        Self { idx: idx as u8 }
    }

    pub const fn from_rank_file(rank: usize, file: usize) -> Self {
        debug_assert!(rank < NUM_ROWS && file < NUM_COLUMNS);
        Self::new(rank * NUM_COLUMNS + file)
    }

    pub const fn index(self) -> usize {
        self.idx as usize
    }

    pub const fn rank(self) -> usize {
        self.index() / NUM_COLUMNS
    }

    pub const fn file(self) -> usize {
        self.index() % NUM_COLUMNS
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0..NUM_SQUARES).map(Self::new)
    }

    pub fn to_chess(self) -> Square {
        Square::make_square(Rank::from_index(self.rank()), File::from_index(self.file()))
    }

    pub fn from_chess(square: Square) -> Self {
        Self::new(square.to_index())
    }
}

impl Display for ChessSquare {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{file}{rank}",
            file = (b'a' + self.file() as u8) as char,
            rank = self.rank() + 1
        )
    }
}

impl FromStr for ChessSquare {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(OracleError::notation(
                s,
                "a square consists of a file and a rank, e.g. 'e4'",
            ));
        };
        let file = file.to_ascii_lowercase();
        if !('a'..='h').contains(&file) {
            return Err(OracleError::notation(s, format!("invalid file '{file}'")));
        }
        if !('1'..='8').contains(&rank) {
            return Err(OracleError::notation(s, format!("invalid rank '{rank}'")));
        }
        Ok(Self::from_rank_file(
            rank as usize - '1' as usize,
            file as usize - 'a' as usize,
        ))
    }
}
