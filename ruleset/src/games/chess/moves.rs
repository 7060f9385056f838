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

use chess::Piece;
use strum_macros::EnumIter;

use crate::games::chess::squares::ChessSquare;
use crate::games::chess::ChessPosition;
use crate::general::moves::Move;
use crate::OracleError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, EnumIter)]
pub enum PromotionPiece {
    Knight,
    Bishop,
    Rook,
    Queen,
}

impl PromotionPiece {
    pub fn to_char(self) -> char {
        match self {
            PromotionPiece::Knight => 'n',
            PromotionPiece::Bishop => 'b',
            PromotionPiece::Rook => 'r',
            PromotionPiece::Queen => 'q',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'n' => Some(PromotionPiece::Knight),
            'b' => Some(PromotionPiece::Bishop),
            'r' => Some(PromotionPiece::Rook),
            'q' => Some(PromotionPiece::Queen),
            _ => None,
        }
    }

    pub fn to_chess(self) -> Piece {
        match self {
            PromotionPiece::Knight => Piece::Knight,
            PromotionPiece::Bishop => Piece::Bishop,
            PromotionPiece::Rook => Piece::Rook,
            PromotionPiece::Queen => Piece::Queen,
        }
    }

    pub fn from_chess(piece: Piece) -> Option<Self> {
        match piece {
            Piece::Knight => Some(PromotionPiece::Knight),
            Piece::Bishop => Some(PromotionPiece::Bishop),
            Piece::Rook => Some(PromotionPiece::Rook),
            Piece::Queen => Some(PromotionPiece::Queen),
            Piece::Pawn | Piece::King => None,
        }
    }
}

/// A chess move as a plain value. Castling is written as the king's two-square move (`e1g1`),
/// en passant as the pawn's diagonal step.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ChessMove {
    pub from: ChessSquare,
    pub to: ChessSquare,
    pub promotion: Option<PromotionPiece>,
}

impl ChessMove {
    pub fn new(from: ChessSquare, to: ChessSquare, promotion: Option<PromotionPiece>) -> Self {
        Self { from, to, promotion }
    }

    pub fn to_chess(self) -> chess::ChessMove {
        chess::ChessMove::new(
            self.from.to_chess(),
            self.to.to_chess(),
            self.promotion.map(PromotionPiece::to_chess),
        )
    }

    pub fn from_chess(mov: chess::ChessMove) -> Self {
        Self {
            from: ChessSquare::from_chess(mov.get_source()),
            to: ChessSquare::from_chess(mov.get_dest()),
            promotion: mov.get_promotion().and_then(PromotionPiece::from_chess),
        }
    }

    /// Also true for en passant, which doesn't land on an occupied square.
    pub fn is_capture(self, pos: &ChessPosition) -> bool {
        let board = pos.board();
        let to = self.to.to_chess();
        if board.piece_on(to).is_some() {
            return true;
        }
        board.piece_on(self.from.to_chess()) == Some(Piece::Pawn) && self.from.file() != self.to.file()
    }

    pub fn gives_check(self, pos: &ChessPosition) -> bool {
        pos.board().make_move_new(self.to_chess()).checkers().popcnt() > 0
    }
}

impl Move<ChessPosition> for ChessMove {
    fn is_tactical(self, pos: &ChessPosition) -> bool {
        self.is_capture(pos) || self.gives_check(pos)
    }

    fn format_compact(self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(piece) = self.promotion {
            write!(f, "{}", piece.to_char())?;
        }
        Ok(())
    }

    fn from_compact_text(s: &str) -> Result<Self, OracleError> {
        let text = s.trim();
        if !text.is_ascii() || !(4..=5).contains(&text.len()) {
            return Err(OracleError::notation(
                s,
                "a move is written as <from square><to square>, optionally followed by a promotion piece, e.g. 'e7e8q'",
            ));
        }
        let from = ChessSquare::from_str(&text[..2])?;
        let to = ChessSquare::from_str(&text[2..4])?;
        let promotion = match text[4..].chars().next() {
            None => None,
            Some(c) => Some(PromotionPiece::from_char(c).ok_or_else(|| {
                OracleError::notation(s, format!("invalid promotion piece '{c}', expected one of 'n', 'b', 'r', 'q'"))
            })?),
        };
        Ok(Self { from, to, promotion })
    }
}

impl Display for ChessMove {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.format_compact(f)
    }
}

impl FromStr for ChessMove {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_compact_text(s)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use strum::IntoEnumIterator;

    use super::*;
    use crate::games::chess::squares::NUM_SQUARES;
    use crate::general::position::Position;

    #[test]
    fn notation_test() {
        let mov = ChessMove::from_compact_text("e2e4").unwrap();
        assert_eq!(mov.from.to_string(), "e2");
        assert_eq!(mov.to.to_string(), "e4");
        assert_eq!(mov.promotion, None);
        let promo = ChessMove::from_compact_text("e7e8Q").unwrap();
        assert_eq!(promo.promotion, Some(PromotionPiece::Queen));
        assert_eq!(promo.to_compact_text(), "e7e8q");
        for invalid in ["", "e2", "e2e", "e2e4e5", "e2e9", "z2e4", "e7e8k", "e7e8p", "é2e4"] {
            assert!(
                matches!(ChessMove::from_compact_text(invalid), Err(OracleError::InvalidNotation { .. })),
                "{invalid}"
            );
        }
    }

    #[test]
    fn all_promotions_test() {
        for piece in PromotionPiece::iter() {
            let mov = ChessMove::new(ChessSquare::new(52), ChessSquare::new(60), Some(piece));
            let text = mov.to_compact_text();
            assert_eq!(text.len(), 5);
            assert_eq!(ChessMove::from_compact_text(&text).unwrap(), mov);
            assert_eq!(ChessMove::from_compact_text(&text.to_uppercase()).unwrap(), mov);
            assert_eq!(PromotionPiece::from_chess(piece.to_chess()), Some(piece));
        }
    }

    #[test]
    fn from_text_checks_legality_test() {
        let pos = ChessPosition::startpos();
        assert!(ChessMove::from_text("e2e4", &pos).is_ok());
        assert!(matches!(
            ChessMove::from_text("e2e5", &pos),
            Err(OracleError::IllegalMove { .. })
        ));
    }

    #[test]
    fn tactical_moves_test() {
        let pos = ChessPosition::from_name("kiwipete").unwrap();
        let capture = ChessMove::from_text("e5f7", &pos).unwrap();
        assert!(capture.is_capture(&pos));
        assert!(capture.is_tactical(&pos));
        let quiet = ChessMove::from_text("a2a3", &pos).unwrap();
        assert!(!quiet.is_tactical(&pos));
        let ep = ChessPosition::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        let ep_capture = ChessMove::from_text("e5d6", &ep).unwrap();
        assert!(ep_capture.is_capture(&ep));
        let check = ChessPosition::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        assert!(ChessMove::from_text("a1a8", &check).unwrap().gives_check(&check));
    }

    proptest! {
        #[test]
        fn notation_round_trip(from in 0..NUM_SQUARES, to in 0..NUM_SQUARES, promo in 0_usize..5) {
            let promotion = PromotionPiece::iter().nth(promo);
            let mov = ChessMove::new(ChessSquare::new(from), ChessSquare::new(to), promotion);
            let text = mov.to_compact_text();
            prop_assert_eq!(ChessMove::from_compact_text(&text).unwrap(), mov);
            prop_assert_eq!(ChessMove::from_chess(mov.to_chess()), mov);
        }
    }
}
