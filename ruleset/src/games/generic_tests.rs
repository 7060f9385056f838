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

//! Tests of the [`Position`] contract that hold for every game. Each game instantiates them at the bottom.

use std::marker::PhantomData;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::games::chess::ChessPosition;
use crate::games::tictactoe::TicTacToeBoard;
use crate::general::moves::Move;
use crate::general::position::Position;

pub struct GenericTests<P: Position> {
    _phantom: PhantomData<P>,
}

impl<P: Position> GenericTests<P> {
    pub fn notation_roundtrip_test() {
        for pos in P::bench_positions() {
            for mov in pos.legal_moves() {
                let encoded = mov.to_compact_text();
                let decoded = P::Move::from_text(&encoded, &pos);
                assert_eq!(decoded, Ok(mov), "{encoded} in {pos}");
            }
        }
    }

    pub fn fen_roundtrip_test() {
        for pos in P::bench_positions() {
            assert_eq!(pos, P::from_fen(&pos.as_fen()).unwrap());
            assert_eq!(pos.as_fen(), P::from_fen(&pos.as_fen()).unwrap().as_fen());
        }
    }

    /// Playing a move must never change the position it was played in, and every generated move must be playable.
    pub fn value_semantics_test() {
        for pos in P::bench_positions() {
            let copy = pos.clone();
            for mov in pos.legal_moves() {
                let child = pos.make_move(mov).unwrap();
                assert_ne!(child, pos);
                assert_eq!(child.active_player(), pos.active_player().other());
            }
            assert_eq!(copy, pos);
            assert_eq!(copy.legal_moves(), pos.legal_moves());
        }
    }

    pub fn random_games_terminate_test(max_plies: usize) {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            let mut pos = P::startpos();
            for _ in 0..max_plies {
                if pos.is_game_over() {
                    break;
                }
                // an undecided game always has a legal move
                let mov = pos.random_legal_move(&mut rng).unwrap();
                pos = pos.make_move(mov).unwrap();
            }
            if !pos.has_legal_moves() {
                assert!(pos.is_game_over());
                assert!(pos.outcome().is_decided());
                assert_ne!(pos.is_checkmate(), pos.is_stalemate());
            }
        }
    }
}

#[test]
fn chess_generic_test() {
    GenericTests::<ChessPosition>::notation_roundtrip_test();
    GenericTests::<ChessPosition>::fen_roundtrip_test();
    GenericTests::<ChessPosition>::value_semantics_test();
    GenericTests::<ChessPosition>::random_games_terminate_test(400);
}

#[test]
fn tictactoe_generic_test() {
    GenericTests::<TicTacToeBoard>::notation_roundtrip_test();
    GenericTests::<TicTacToeBoard>::fen_roundtrip_test();
    GenericTests::<TicTacToeBoard>::value_semantics_test();
    GenericTests::<TicTacToeBoard>::random_games_terminate_test(9);
}
