use std::fmt::{Display, Formatter};

use colored::Colorize;
use log::{debug, info};

use ruleset::general::moves::Move;
use ruleset::general::position::Position;
use ruleset::search::{SearchError, SearchLimit};
use ruleset::{OracleError, Outcome, PlayerResult, Side};

use crate::search::Engine;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, strum_macros::Display)]
pub enum GameEndReason {
    /// The player to move has lost, e.g. by checkmate or because the opponent completed a line in tic-tac-toe.
    #[strum(to_string = "checkmate")]
    Checkmate,
    #[strum(to_string = "draw")]
    Draw,
    /// The game was adjudicated as a draw after the ply limit.
    #[strum(to_string = "max plies")]
    MaxPlies,
}

#[derive(Debug, Clone)]
pub struct GameRecord<P: Position> {
    pub white: String,
    pub black: String,
    pub start: P,
    pub moves: Vec<P::Move>,
    pub outcome: Outcome,
    pub reason: GameEndReason,
}

impl<P: Position> GameRecord<P> {
    /// Replays the moves from the start position.
    pub fn final_position(&self) -> Result<P, OracleError> {
        self.moves.iter().try_fold(self.start.clone(), |pos, &mov| pos.make_move(mov))
    }

    pub fn winner(&self) -> Option<&str> {
        match self.outcome {
            Outcome::WhiteWin => Some(&self.white),
            Outcome::BlackWin => Some(&self.black),
            _ => None,
        }
    }
}

impl<P: Position> Display for GameRecord<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} vs {} from '{}'", self.white.bold(), self.black.bold(), self.start.as_fen())?;
        let mut ply = 0;
        if !self.start.active_player().is_first() {
            if let Some(first) = self.moves.first() {
                write!(f, "1... {} ", first.to_compact_text())?;
                ply = 1;
            }
        }
        for (i, mov) in self.moves.iter().enumerate().skip(ply) {
            let move_number = (i + ply) / 2 + 1;
            if (i + ply) % 2 == 0 {
                write!(f, "{move_number}. ")?;
            }
            write!(f, "{} ", mov.to_compact_text())?;
        }
        write!(f, "{} ({})", self.outcome.to_string().bold(), self.reason)
    }
}

/// Lets `white` and `black` play a game starting from `start`, giving each move the same `limit`.
/// A game that is still going on after `max_plies` plies is counted as a draw.
pub fn play_game<P: Position>(
    white: &mut dyn Engine<P>,
    black: &mut dyn Engine<P>,
    start: &P,
    limit: SearchLimit,
    max_plies: Option<usize>,
) -> Result<GameRecord<P>, SearchError> {
    let mut pos = start.clone();
    let mut moves = vec![];
    let (outcome, reason) = loop {
        if pos.is_game_over() {
            let reason = if pos.is_checkmate() { GameEndReason::Checkmate } else { GameEndReason::Draw };
            break (pos.outcome(), reason);
        }
        if max_plies.is_some_and(|max| moves.len() >= max) {
            break (Outcome::Draw, GameEndReason::MaxPlies);
        }
        let engine = match pos.active_player() {
            Side::White => &mut *white,
            Side::Black => &mut *black,
        };
        let res = engine.search(&pos, limit)?;
        debug!("{}. {}: {res}", moves.len() + 1, engine.short_name());
        pos = pos.make_move(res.chosen_move)?;
        moves.push(res.chosen_move);
    };
    info!("{} vs {}: {outcome} ({reason}) after {} plies", white.short_name(), black.short_name(), moves.len());
    Ok(GameRecord {
        white: white.short_name(),
        black: black.short_name(),
        start: start.clone(),
        moves,
        outcome,
        reason,
    })
}

/// Wins, draws and losses of the first engine of a match.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct MatchScore {
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

impl MatchScore {
    pub fn games(&self) -> usize {
        self.wins + self.draws + self.losses
    }

    pub fn points(&self) -> f64 {
        self.wins as f64 + self.draws as f64 / 2.0
    }

    fn add(&mut self, result: PlayerResult) {
        match result {
            PlayerResult::Win => self.wins += 1,
            PlayerResult::Draw => self.draws += 1,
            PlayerResult::Lose => self.losses += 1,
        }
    }
}

impl Display for MatchScore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "+{} ={} -{} ({}/{})",
            self.wins.to_string().green(),
            self.draws,
            self.losses.to_string().red(),
            self.points(),
            self.games()
        )
    }
}

/// Plays `games` games between `first` and `second`. The first engine plays the first player in every even
/// numbered game, starting with game 0.
pub fn play_match<P: Position>(
    first: &mut dyn Engine<P>,
    second: &mut dyn Engine<P>,
    start: &P,
    games: usize,
    limit: SearchLimit,
    max_plies: Option<usize>,
) -> Result<(Vec<GameRecord<P>>, MatchScore), SearchError> {
    let mut score = MatchScore::default();
    let mut records = Vec::with_capacity(games);
    for game in 0..games {
        let first_side = if game % 2 == 0 { Side::White } else { Side::Black };
        let record = match first_side {
            Side::White => play_game(&mut *first, &mut *second, start, limit, max_plies)?,
            Side::Black => play_game(&mut *second, &mut *first, start, limit, max_plies)?,
        };
        // adjudicated games are draws, so the outcome is always decided
        if let Some(result) = record.outcome.for_player(first_side) {
            score.add(result);
        }
        records.push(record);
    }
    Ok((records, score))
}
