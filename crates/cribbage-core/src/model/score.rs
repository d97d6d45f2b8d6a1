use crate::model::player::PlayerPosition;
use serde::Serialize;

pub const WINNING_SCORE: u32 = 121;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Won {
        winner: PlayerPosition,
        winner_score: u32,
        loser_score: u32,
    },
}

impl GameStatus {
    pub const fn is_over(self) -> bool {
        matches!(self, GameStatus::Won { .. })
    }

    pub const fn winner(self) -> Option<PlayerPosition> {
        match self {
            GameStatus::Won { winner, .. } => Some(winner),
            GameStatus::InProgress => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBoard {
    totals: [u32; 2],
    target: u32,
}

impl ScoreBoard {
    pub const fn new() -> Self {
        Self::with_target(WINNING_SCORE)
    }

    pub const fn with_target(target: u32) -> Self {
        Self {
            totals: [0; 2],
            target,
        }
    }

    /// Adds points and reports whether the game has been decided.
    ///
    /// Once a player has reached the target the board stops accepting points.
    pub fn add(&mut self, seat: PlayerPosition, points: u32) -> GameStatus {
        if self.status().is_over() {
            return self.status();
        }
        self.totals[seat.index()] += points;
        self.status()
    }

    pub fn set_totals(&mut self, totals: [u32; 2]) {
        self.totals = totals;
    }

    pub fn score(&self, seat: PlayerPosition) -> u32 {
        self.totals[seat.index()]
    }

    pub fn standings(&self) -> &[u32; 2] {
        &self.totals
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn status(&self) -> GameStatus {
        PlayerPosition::LOOP
            .iter()
            .copied()
            .find(|seat| self.score(*seat) >= self.target)
            .map(|winner| GameStatus::Won {
                winner,
                winner_score: self.score(winner),
                loser_score: self.score(winner.other()),
            })
            .unwrap_or(GameStatus::InProgress)
    }
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{GameStatus, ScoreBoard};
    use crate::model::player::PlayerPosition;

    #[test]
    fn reaching_121_ends_the_game() {
        let cases = [
            ([100, 121], true),
            ([121, 0], true),
            ([130, 100], true),
            ([43, 140], true),
            ([120, 120], false),
        ];

        for (totals, over) in cases {
            let mut board = ScoreBoard::new();
            board.set_totals(totals);
            assert_eq!(board.status().is_over(), over, "totals {totals:?}");
        }
    }

    #[test]
    fn add_reports_winner_and_margin() {
        let mut board = ScoreBoard::new();
        board.set_totals([118, 90]);
        assert_eq!(board.add(PlayerPosition::Second, 2), GameStatus::InProgress);
        let status = board.add(PlayerPosition::First, 4);
        assert_eq!(
            status,
            GameStatus::Won {
                winner: PlayerPosition::First,
                winner_score: 122,
                loser_score: 92,
            }
        );
    }

    #[test]
    fn points_after_game_over_are_ignored() {
        let mut board = ScoreBoard::new();
        board.set_totals([121, 10]);
        board.add(PlayerPosition::Second, 200);
        assert_eq!(board.score(PlayerPosition::Second), 10);
        assert_eq!(board.status().winner(), Some(PlayerPosition::First));
    }
}
