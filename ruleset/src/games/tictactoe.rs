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

use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::general::common::{EntityList, StaticallyNamedEntity};
use crate::general::moves::Move;
use crate::general::position::{MoveList, NameToPos, Position};
use crate::{OracleError, Outcome, Side};

pub const SIZE: usize = 3;
pub const NUM_SQUARES: usize = SIZE * SIZE;

const FULL: u16 = (1 << NUM_SQUARES) - 1;

/// Rows, columns and both diagonals, with square `a1` as bit 0 and `c3` as bit 8.
pub const LINES: [u16; 8] = [
    0b000_000_111,
    0b000_111_000,
    0b111_000_000,
    0b001_001_001,
    0b010_010_010,
    0b100_100_100,
    0b100_010_001,
    0b001_010_100,
];

/// Squares are numbered row by row, starting with `a1` in the bottom left corner.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TicTacToeMove(u8);

impl TicTacToeMove {
    pub fn new(idx: usize) -> Self {
        debug_assert!(idx < NUM_SQUARES);
        Self(idx as u8)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    fn bit(self) -> u16 {
        1 << self.0
    }
}

impl Display for TicTacToeMove {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.format_compact(f)
    }
}

impl Move<TicTacToeBoard> for TicTacToeMove {
    /// Moves that complete a line.
    fn is_tactical(self, pos: &TicTacToeBoard) -> bool {
        let mine = pos.bitboard(pos.active_player()) | self.bit();
        LINES.iter().any(|&line| line & self.bit() != 0 && mine & line == line)
    }

    fn format_compact(self, f: &mut Formatter<'_>) -> fmt::Result {
        let file = (b'a' + (self.index() % SIZE) as u8) as char;
        write!(f, "{file}{}", self.index() / SIZE + 1)
    }

    fn from_compact_text(s: &str) -> Result<Self, OracleError> {
        let text = s.trim();
        let mut chars = text.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(OracleError::notation(s, "expected a square from 'a1' to 'c3'"));
        };
        let file = file.to_ascii_lowercase();
        if !('a'..='c').contains(&file) || !('1'..='3').contains(&rank) {
            return Err(OracleError::notation(s, "expected a square from 'a1' to 'c3'"));
        }
        Ok(Self::new((rank as usize - '1' as usize) * SIZE + file as usize - 'a' as usize))
    }
}

/// The first player (`x`) is [`Side::White`].
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TicTacToeBoard {
    x: u16,
    o: u16,
}

impl TicTacToeBoard {
    pub fn bitboard(&self, side: Side) -> u16 {
        match side {
            Side::White => self.x,
            Side::Black => self.o,
        }
    }

    pub fn empty_squares(&self) -> u16 {
        !(self.x | self.o) & FULL
    }

    pub fn has_won(&self, side: Side) -> bool {
        let bb = self.bitboard(side);
        LINES.iter().any(|&line| bb & line == line)
    }

    /// Lines that `side` could still complete, i.e. that contain no mark of the opponent.
    pub fn open_lines(&self, side: Side) -> usize {
        let theirs = self.bitboard(side.other());
        LINES.iter().filter(|&&line| line & theirs == 0).count()
    }

    fn symbol(&self, idx: usize) -> char {
        if self.x & (1 << idx) != 0 {
            'x'
        } else if self.o & (1 << idx) != 0 {
            'o'
        } else {
            '.'
        }
    }
}

impl Display for TicTacToeBoard {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_fen())
    }
}

impl FromStr for TicTacToeBoard {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl StaticallyNamedEntity for TicTacToeBoard {
    fn static_short_name() -> &'static str
    where
        Self: Sized,
    {
        "tictactoe"
    }

    fn static_long_name() -> String
    where
        Self: Sized,
    {
        "Tic-Tac-Toe".to_string()
    }

    fn static_description() -> String
    where
        Self: Sized,
    {
        "Tic-Tac-Toe on a 3x3 board, x moves first".to_string()
    }
}

impl Position for TicTacToeBoard {
    type Move = TicTacToeMove;

    fn startpos() -> Self {
        Self::default()
    }

    /// Three rows separated by `/`, top row first, each consisting of `x`, `o` and `.`.
    /// The player to move follows from the number of marks.
    fn from_fen(fen: &str) -> Result<Self, OracleError> {
        let text = fen.trim();
        let rows: Vec<&str> = text.split('/').collect();
        if rows.len() != SIZE {
            return Err(OracleError::fen(fen, format!("expected {SIZE} rows separated by '/'")));
        }
        let mut board = Self::default();
        for (row_idx, row) in rows.iter().enumerate() {
            let rank = SIZE - 1 - row_idx;
            if row.chars().count() != SIZE {
                return Err(OracleError::fen(fen, format!("row '{row}' doesn't have {SIZE} squares")));
            }
            for (file, c) in row.chars().enumerate() {
                let bit = 1 << (rank * SIZE + file);
                match c.to_ascii_lowercase() {
                    'x' => board.x |= bit,
                    'o' => board.o |= bit,
                    '.' => {}
                    _ => return Err(OracleError::fen(fen, format!("invalid square '{c}'"))),
                }
            }
        }
        let (x, o) = (board.x.count_ones(), board.o.count_ones());
        if x != o && x != o + 1 {
            return Err(OracleError::fen(fen, format!("impossible number of marks: {x} x and {o} o")));
        }
        if board.has_won(Side::White) && board.has_won(Side::Black) {
            return Err(OracleError::fen(fen, "both players have a line"));
        }
        // the game ends with the move that completes a line
        let to_move = board.active_player();
        if board.has_won(to_move) {
            return Err(OracleError::fen(fen, format!("play continued after {to_move} won")));
        }
        Ok(board)
    }

    fn as_fen(&self) -> String {
        (0..SIZE)
            .rev()
            .map(|rank| (0..SIZE).map(|file| self.symbol(rank * SIZE + file)).collect::<String>())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn name_to_pos_map() -> EntityList<NameToPos<Self>> {
        vec![
            NameToPos {
                name: "startpos",
                val: || Ok(Self::startpos()),
            },
            NameToPos {
                name: "win_in_1",
                val: || Self::from_fen("xx./oo./..."),
            },
            NameToPos {
                name: "must_block",
                val: || Self::from_fen("oo./.x./x.."),
            },
        ]
    }

    fn active_player(&self) -> Side {
        if self.x.count_ones() == self.o.count_ones() {
            Side::White
        } else {
            Side::Black
        }
    }

    fn legal_moves(&self) -> MoveList<Self> {
        if self.has_won(Side::White) || self.has_won(Side::Black) {
            return MoveList::<Self>::new();
        }
        let empty = self.empty_squares();
        (0..NUM_SQUARES)
            .filter(|&idx| empty & (1 << idx) != 0)
            .map(TicTacToeMove::new)
            .collect()
    }

    fn make_move(&self, mov: TicTacToeMove) -> Result<Self, OracleError> {
        if !self.is_move_legal(mov) {
            return Err(OracleError::IllegalMove {
                mov: mov.to_string(),
                position: self.as_fen(),
            });
        }
        let mut res = *self;
        match self.active_player() {
            Side::White => res.x |= mov.bit(),
            Side::Black => res.o |= mov.bit(),
        }
        Ok(res)
    }

    /// The player to move has lost if the opponent has completed a line.
    fn is_in_check(&self) -> bool {
        self.has_won(self.active_player().other())
    }

    fn outcome(&self) -> Outcome {
        if self.has_won(Side::White) {
            Outcome::WhiteWin
        } else if self.has_won(Side::Black) {
            Outcome::BlackWin
        } else if self.empty_squares() == 0 {
            Outcome::Draw
        } else {
            Outcome::Undecided
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlayerResult;

    #[test]
    fn startpos_test() {
        let pos = TicTacToeBoard::startpos();
        assert_eq!(pos.as_fen(), ".../.../...");
        assert_eq!(pos.legal_moves().len(), 9);
        assert_eq!(pos.active_player(), Side::White);
        assert_eq!(pos.outcome(), Outcome::Undecided);
        assert_eq!(pos.open_lines(Side::White), 8);
    }

    #[test]
    fn notation_test() {
        for idx in 0..NUM_SQUARES {
            let mov = TicTacToeMove::new(idx);
            assert_eq!(TicTacToeMove::from_compact_text(&mov.to_compact_text()).unwrap(), mov);
        }
        assert_eq!(TicTacToeMove::new(0).to_string(), "a1");
        assert_eq!(TicTacToeMove::new(8).to_string(), "c3");
        for invalid in ["", "a", "d1", "a4", "a11"] {
            assert!(TicTacToeMove::from_compact_text(invalid).is_err(), "{invalid}");
        }
    }

    #[test]
    fn fen_test() {
        let pos = TicTacToeBoard::from_fen("xx./oo./...").unwrap();
        assert_eq!(pos.as_fen(), "xx./oo./...");
        assert_eq!(pos.active_player(), Side::White);
        assert!(TicTacToeBoard::from_fen("xxx/.../...").is_err());
        assert!(TicTacToeBoard::from_fen("xx/.../...").is_err());
        assert!(TicTacToeBoard::from_fen("xx./.../...").is_err());
        assert!(TicTacToeBoard::from_fen("xxx/ooo/x..").is_err());
        assert!(TicTacToeBoard::from_fen("xy./.../...").is_err());
        assert!(TicTacToeBoard::from_fen("xxx/oo./...").is_ok());
        assert!(TicTacToeBoard::from_fen("ooo/xx./x..").is_ok());
        // one more move was played after a line was completed
        assert!(matches!(TicTacToeBoard::from_fen("xxx/oo./o.."), Err(OracleError::InvalidFen { .. })));
        assert!(matches!(TicTacToeBoard::from_fen("ooo/xx./xx."), Err(OracleError::InvalidFen { .. })));
    }

    #[test]
    fn win_test() {
        let pos = TicTacToeBoard::from_name("win_in_1").unwrap();
        let winning = TicTacToeMove::from_text("c3", &pos).unwrap();
        assert!(winning.is_tactical(&pos));
        assert!(!TicTacToeMove::from_text("a1", &pos).unwrap().is_tactical(&pos));
        let won = pos.make_move(winning).unwrap();
        assert_eq!(won.outcome(), Outcome::WhiteWin);
        assert!(won.legal_moves().is_empty());
        assert!(won.is_checkmate());
        assert_eq!(won.player_result(), Some(PlayerResult::Lose));
        assert!(matches!(
            won.make_move(TicTacToeMove::new(0)),
            Err(OracleError::IllegalMove { .. })
        ));
    }

    #[test]
    fn draw_test() {
        let pos = TicTacToeBoard::from_fen("xox/xoo/ox.").unwrap();
        let drawn = pos.make_move(TicTacToeMove::from_compact_text("c1").unwrap()).unwrap();
        assert_eq!(drawn.as_fen(), "xox/xoo/oxx");
        assert_eq!(drawn.outcome(), Outcome::Draw);
        assert!(drawn.is_stalemate());
        assert!(!drawn.is_checkmate());
    }
}
