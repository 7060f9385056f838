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

//! Chess, as an adapter over the `chess` crate. Move generation, check detection and FEN parsing are
//! delegated; this module adds the clocks, the repetition history and the draw rules that the `chess` crate
//! leaves to its users.

use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use chess::{BitBoard, Board, BoardStatus, Color, MoveGen, Piece, Rank, Square, EMPTY};
use itertools::Itertools;

use crate::games::chess::moves::ChessMove;
use crate::general::common::{EntityList, StaticallyNamedEntity};
use crate::general::position::{MoveList, NameToPos, Position};
use crate::{OracleError, Outcome, Side};

pub mod moves;
pub mod squares;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// After this many plies without a capture or pawn move, the game is drawn automatically.
pub const SEVENTY_FIVE_MOVE_RULE_PLIES: u32 = 150;

/// The game is drawn automatically once the same position has occurred this many times.
pub const FIVEFOLD_REPETITION: usize = 5;

#[derive(Clone)]
pub struct ChessPosition {
    board: Board,
    halfmove_clock: u32,
    fullmove_number: u32,
    /// Hashes of all positions since the last capture or pawn move, including the current one.
    history: Vec<u64>,
}

impl ChessPosition {
    fn from_board(board: Board, halfmove_clock: u32, fullmove_number: u32) -> Self {
        Self {
            board,
            halfmove_clock,
            fullmove_number,
            history: vec![board.get_hash()],
        }
    }

    /// The wrapped `chess` crate board, for evaluation functions.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn pieces_of(&self, piece: Piece, side: Side) -> BitBoard {
        *self.board.pieces(piece) & *self.board.color_combined(side_to_color(side))
    }

    pub fn piece_count(&self, piece: Piece, side: Side) -> u32 {
        self.pieces_of(piece, side).popcnt()
    }

    pub fn repetition_count(&self) -> usize {
        let current = self.board.get_hash();
        self.history.iter().filter(|&&hash| hash == current).count()
    }

    /// Only the dead positions that can be recognized from the material alone:
    /// lone kings, a single minor piece, or any number of bishops that all stand on the same square color.
    pub fn is_insufficient_material(&self) -> bool {
        let board = &self.board;
        let heavy = *board.pieces(Piece::Pawn) | *board.pieces(Piece::Rook) | *board.pieces(Piece::Queen);
        if heavy != EMPTY {
            return false;
        }
        let knights = board.pieces(Piece::Knight).popcnt();
        let bishops = *board.pieces(Piece::Bishop);
        if knights + bishops.popcnt() <= 1 {
            return true;
        }
        knights == 0 && bishops.map(|sq| (sq.get_rank().to_index() + sq.get_file().to_index()) % 2).all_equal()
    }

    pub fn is_seventy_five_move_rule(&self) -> bool {
        self.halfmove_clock >= SEVENTY_FIVE_MOVE_RULE_PLIES
    }

    pub fn is_fivefold_repetition(&self) -> bool {
        self.repetition_count() >= FIVEFOLD_REPETITION
    }

    fn illegal(&self, mov: ChessMove) -> OracleError {
        OracleError::IllegalMove {
            mov: mov.to_string(),
            position: self.as_fen(),
        }
    }
}

pub fn side_to_color(side: Side) -> Color {
    match side {
        Side::White => Color::White,
        Side::Black => Color::Black,
    }
}

pub fn color_to_side(color: Color) -> Side {
    match color {
        Color::White => Side::White,
        Color::Black => Side::Black,
    }
}

/// Checks the fields that the `chess` crate would otherwise silently ignore or misread.
fn validate_fen_fields(fen: &str, words: &[&str]) -> Result<(), OracleError> {
    let ranks = words[0].split('/').collect_vec();
    if ranks.len() != 8 {
        return Err(OracleError::fen(fen, format!("expected 8 ranks, got {}", ranks.len())));
    }
    for rank in ranks {
        let mut files = 0;
        for c in rank.chars() {
            files += match c {
                '1'..='8' => c as usize - '0' as usize,
                'p' | 'n' | 'b' | 'r' | 'q' | 'k' | 'P' | 'N' | 'B' | 'R' | 'Q' | 'K' => 1,
                _ => return Err(OracleError::fen(fen, format!("invalid piece '{c}'"))),
            };
        }
        if files != 8 {
            return Err(OracleError::fen(fen, format!("rank '{rank}' covers {files} files instead of 8")));
        }
    }
    let castling = words[2];
    if castling != "-" && !(castling.chars().all(|c| "KQkq".contains(c)) && castling.chars().all_unique()) {
        return Err(OracleError::fen(fen, format!("invalid castling rights '{castling}'")));
    }
    let ep = words[3];
    if ep != "-" {
        let expected = match words[1] {
            "b" => Rank::Third,
            _ => Rank::Sixth,
        };
        match Square::from_str(ep) {
            Ok(sq) if sq.get_rank() == expected => {}
            _ => return Err(OracleError::fen(fen, format!("invalid en passant square '{ep}'"))),
        }
    }
    Ok(())
}

impl Default for ChessPosition {
    fn default() -> Self {
        Self::from_board(Board::default(), 0, 1)
    }
}

// The history only matters for the draw rules; two positions reached through different move orders are the same
// position as long as the pieces, the clocks and the repetition count agree.
impl PartialEq for ChessPosition {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
            && self.halfmove_clock == other.halfmove_clock
            && self.fullmove_number == other.fullmove_number
            && self.repetition_count() == other.repetition_count()
    }
}

impl Eq for ChessPosition {}

impl Debug for ChessPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ChessPosition({})", self.as_fen())
    }
}

impl Display for ChessPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_fen())
    }
}

impl FromStr for ChessPosition {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl StaticallyNamedEntity for ChessPosition {
    fn static_short_name() -> &'static str
    where
        Self: Sized,
    {
        "chess"
    }

    fn static_long_name() -> String
    where
        Self: Sized,
    {
        "Chess".to_string()
    }

    fn static_description() -> String
    where
        Self: Sized,
    {
        "Standard chess, with the automatic draw rules (75 moves, fivefold repetition, insufficient material)"
            .to_string()
    }
}

impl Position for ChessPosition {
    type Move = ChessMove;

    fn startpos() -> Self {
        Self::default()
    }

    fn from_fen(fen: &str) -> Result<Self, OracleError> {
        let fen = fen.trim();
        let words = fen.split_whitespace().collect_vec();
        if words.len() < 4 || words.len() > 6 {
            return Err(OracleError::fen(
                fen,
                format!("expected between 4 and 6 space-separated fields, got {}", words.len()),
            ));
        }
        validate_fen_fields(fen, &words)?;
        let board = Board::from_str(&words[..4].join(" "))
            .map_err(|err| OracleError::fen(fen, format!("{err:?}")))?;
        let parse_counter = |idx: usize, name: &str, default: u32| match words.get(idx) {
            None => Ok(default),
            Some(word) => word
                .parse::<u32>()
                .map_err(|_| OracleError::fen(fen, format!("invalid {name} '{word}'"))),
        };
        let halfmove_clock = parse_counter(4, "halfmove clock", 0)?;
        let fullmove_number = parse_counter(5, "fullmove number", 1)?.max(1);
        Ok(Self::from_board(board, halfmove_clock, fullmove_number))
    }

    fn as_fen(&self) -> String {
        let board_fen = self.board.to_string();
        let fields = board_fen.split_whitespace().take(3).join(" ");
        // the `chess` crate stores the square of the pawn that can be captured, FEN wants the square behind it
        let ep = match self.board.en_passant() {
            None => "-".to_string(),
            Some(pawn) => {
                let rank = match self.board.side_to_move() {
                    Color::White => Rank::Sixth,
                    Color::Black => Rank::Third,
                };
                Square::make_square(rank, pawn.get_file()).to_string()
            }
        };
        format!("{fields} {ep} {} {}", self.halfmove_clock, self.fullmove_number)
    }

    fn name_to_pos_map() -> EntityList<NameToPos<Self>> {
        vec![
            NameToPos {
                name: "startpos",
                val: || Ok(Self::startpos()),
            },
            NameToPos {
                name: "kiwipete",
                val: || Self::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"),
            },
            NameToPos {
                name: "mate_in_1",
                val: || Self::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1"),
            },
            NameToPos {
                name: "lucena",
                val: || Self::from_fen("1K1k4/1P6/8/8/8/8/r7/2R5 w - - 0 1"),
            },
            NameToPos {
                name: "philidor",
                val: || Self::from_fen("3K4/r7/7R/2kp4/8/8/8/8 w - - 0 1"),
            },
        ]
    }

    fn active_player(&self) -> Side {
        color_to_side(self.board.side_to_move())
    }

    fn legal_moves(&self) -> MoveList<Self> {
        MoveGen::new_legal(&self.board).map(ChessMove::from_chess).collect()
    }

    fn has_legal_moves(&self) -> bool {
        MoveGen::new_legal(&self.board).len() > 0
    }

    fn is_move_legal(&self, mov: ChessMove) -> bool {
        self.board.legal(mov.to_chess())
    }

    fn make_move(&self, mov: ChessMove) -> Result<Self, OracleError> {
        if !self.is_move_legal(mov) {
            return Err(self.illegal(mov));
        }
        let irreversible = mov.is_capture(self) || self.board.piece_on(mov.from.to_chess()) == Some(Piece::Pawn);
        let board = self.board.make_move_new(mov.to_chess());
        let fullmove_number = self.fullmove_number + u32::from(self.board.side_to_move() == Color::Black);
        let (halfmove_clock, mut history) = if irreversible {
            (0, Vec::with_capacity(16))
        } else {
            (self.halfmove_clock + 1, self.history.clone())
        };
        history.push(board.get_hash());
        Ok(Self {
            board,
            halfmove_clock,
            fullmove_number,
            history,
        })
    }

    fn is_in_check(&self) -> bool {
        self.board.checkers().popcnt() > 0
    }

    fn is_checkmate(&self) -> bool {
        self.board.status() == BoardStatus::Checkmate
    }

    fn is_stalemate(&self) -> bool {
        self.board.status() == BoardStatus::Stalemate
    }

    fn outcome(&self) -> Outcome {
        match self.board.status() {
            BoardStatus::Checkmate => Outcome::win_for(self.active_player().other()),
            BoardStatus::Stalemate => Outcome::Draw,
            BoardStatus::Ongoing => {
                if self.is_seventy_five_move_rule() || self.is_fivefold_repetition() || self.is_insufficient_material()
                {
                    Outcome::Draw
                } else {
                    Outcome::Undecided
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::general::moves::Move;
    use crate::PlayerResult;

    fn play(pos: &ChessPosition, moves: &str) -> ChessPosition {
        moves.split_whitespace().fold(pos.clone(), |pos, text| {
            let mov = ChessMove::from_text(text, &pos).unwrap();
            pos.make_move(mov).unwrap()
        })
    }

    #[test]
    fn startpos_test() {
        let pos = ChessPosition::startpos();
        assert_eq!(pos.as_fen(), START_FEN);
        assert_eq!(pos.legal_moves().len(), 20);
        assert_eq!(pos.active_player(), Side::White);
        assert!(!pos.is_game_over());
        assert_eq!(pos.outcome(), Outcome::Undecided);
        assert_eq!(ChessPosition::from_fen(START_FEN).unwrap(), pos);
        assert_eq!(ChessPosition::from_name("kiwipete").unwrap().legal_moves().len(), 48);
    }

    #[test]
    fn fen_test() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R b KQkq - 7 42";
        let pos = ChessPosition::from_fen(fen).unwrap();
        assert_eq!(pos.as_fen(), fen);
        assert_eq!(pos.halfmove_clock(), 7);
        assert_eq!(pos.fullmove_number(), 42);
        let short = ChessPosition::from_fen("8/8/8/8/8/8/8/K1k5 w - -").unwrap();
        assert_eq!(short.halfmove_clock(), 0);
        assert_eq!(short.fullmove_number(), 1);
        for invalid in ["", "8/8/8 w", "not a fen at all", "8/8/8/8/8/8/8/K1k5 w - - x 1", START_FEN.replace('w', "x").as_str()] {
            assert!(
                matches!(ChessPosition::from_fen(invalid), Err(OracleError::InvalidFen { .. })),
                "{invalid}"
            );
        }
    }

    #[test]
    fn malformed_fen_test() {
        for invalid in [
            "K1k5 w - - 0 1",
            "8/8/8/8/8/8/8/8/8/K1k5 w - - 0 1",
            "8/8/8/8/8/8/8 w - - 0 1",
            "rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w KQkq - 0 1",
            "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - z9 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - e4 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w XYZ - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KKq - 0 1",
        ] {
            assert!(
                matches!(ChessPosition::from_fen(invalid), Err(OracleError::InvalidFen { .. })),
                "{invalid}"
            );
        }
        assert!(ChessPosition::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w Kq - 0 1").is_ok());
    }

    #[test]
    fn en_passant_fen_test() {
        let pos = play(&ChessPosition::startpos(), "e2e4 a7a6 e4e5 d7d5");
        let fen = "rnbqkbnr/1pp1pppp/p7/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3";
        assert_eq!(pos.as_fen(), fen);
        assert_eq!(ChessPosition::from_fen(fen).unwrap().as_fen(), fen);
        let ep_capture = ChessMove::from_text("e5d6", &pos).unwrap();
        assert_eq!(pos.make_move(ep_capture).unwrap().piece_count(Piece::Pawn, Side::Black), 7);

        let pos = play(&pos, "g1f3 b7b5 a2a4 b5b4 c2c4");
        assert_eq!(pos.as_fen(), "rnbqkbnr/2p1pppp/p7/3pP3/PpP5/5N2/1P1P1PPP/RNBQKB1R b KQkq c3 0 5");
        // no pawn can capture, so there is no en passant square
        let pos = play(&ChessPosition::startpos(), "e2e4");
        assert_eq!(pos.as_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1");
    }

    #[test]
    fn legal_move_order_is_deterministic_test() {
        let pos = ChessPosition::from_name("kiwipete").unwrap();
        assert_eq!(pos.legal_moves(), pos.clone().legal_moves());
        assert_eq!(pos.legal_moves(), ChessPosition::from_name("kiwipete").unwrap().legal_moves());
    }

    #[test]
    fn make_move_test() {
        let pos = ChessPosition::startpos();
        let after = play(&pos, "e2e4");
        assert_eq!(pos.as_fen(), START_FEN, "make_move must not change the original");
        assert_eq!(after.active_player(), Side::Black);
        assert_eq!(after.fullmove_number(), 1);
        let after = play(&after, "g8f6 g1f3");
        assert_eq!(after.halfmove_clock(), 2);
        assert_eq!(after.fullmove_number(), 2);
        let illegal = ChessMove::from_compact_text("e2e4").unwrap();
        assert!(matches!(after.make_move(illegal), Err(OracleError::IllegalMove { .. })));
    }

    #[test]
    fn checkmate_and_stalemate_test() {
        let mate = play(&ChessPosition::from_name("mate_in_1").unwrap(), "a1a8");
        assert!(mate.is_in_check());
        assert!(mate.is_checkmate());
        assert!(mate.legal_moves().is_empty());
        assert_eq!(mate.outcome(), Outcome::WhiteWin);
        assert_eq!(mate.player_result(), Some(PlayerResult::Lose));

        let stalemate = ChessPosition::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(!stalemate.is_in_check());
        assert!(stalemate.is_stalemate());
        assert!(stalemate.is_game_over());
        assert_eq!(stalemate.outcome(), Outcome::Draw);
    }

    #[test]
    fn draw_rules_test() {
        let kings = ChessPosition::from_fen("8/8/4k3/8/8/3K4/8/8 w - - 0 1").unwrap();
        assert!(kings.is_insufficient_material());
        assert_eq!(kings.outcome(), Outcome::Draw);
        let knight = ChessPosition::from_fen("8/8/4k3/8/8/3K4/8/6N1 w - - 0 1").unwrap();
        assert!(knight.is_insufficient_material());
        let same_color_bishops = ChessPosition::from_fen("8/8/4k3/8/8/3K4/1b6/6B1 w - - 0 1").unwrap();
        assert!(same_color_bishops.is_insufficient_material());
        let opposite_bishops = ChessPosition::from_fen("8/8/4k3/8/8/3K4/b7/6B1 w - - 0 1").unwrap();
        assert!(!opposite_bishops.is_insufficient_material());
        let rook = ChessPosition::from_fen("8/8/4k3/8/8/3K4/8/6R1 w - - 0 1").unwrap();
        assert!(!rook.is_insufficient_material());
        assert!(!rook.is_game_over());

        let clock = ChessPosition::from_fen("8/8/4k3/8/8/3K4/8/6R1 w - - 149 100").unwrap();
        assert!(!clock.is_game_over());
        let clock = play(&clock, "g1g2");
        assert!(clock.is_seventy_five_move_rule());
        assert_eq!(clock.outcome(), Outcome::Draw);
    }

    #[test]
    fn fivefold_repetition_test() {
        let mut pos = ChessPosition::startpos();
        for _ in 0..3 {
            pos = play(&pos, "g1f3 g8f6 f3g1 f6g8");
        }
        assert_eq!(pos.repetition_count(), 4);
        assert!(!pos.is_game_over());
        pos = play(&pos, "g1f3 g8f6 f3g1 f6g8");
        assert_eq!(pos.repetition_count(), 5);
        assert!(pos.is_fivefold_repetition());
        assert_eq!(pos.outcome(), Outcome::Draw);
        // a pawn move resets the history
        let pos = play(&pos, "e2e4");
        assert_eq!(pos.repetition_count(), 1);
        assert!(!pos.is_game_over());
    }

    #[test]
    fn piece_count_test() {
        let pos = ChessPosition::startpos();
        assert_eq!(pos.piece_count(Piece::Pawn, Side::White), 8);
        assert_eq!(pos.piece_count(Piece::Queen, Side::Black), 1);
        let pos = play(&pos, "e2e4 d7d5 e4d5");
        assert_eq!(pos.piece_count(Piece::Pawn, Side::Black), 7);
        assert_eq!(pos.halfmove_clock(), 0);
    }
}
