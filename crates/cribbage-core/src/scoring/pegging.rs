use crate::model::card::Card;
use crate::scoring::{ScoreError, ensure_unique};
use serde::Serialize;

pub const FIFTEEN: u8 = 15;
pub const THIRTY_ONE: u8 = 31;

/// Points earned by the most recently played card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlayScore {
    pub pairs: u8,
    pub run: u8,
    pub fifteen: u8,
    pub thirty_one: u8,
}

impl PlayScore {
    pub fn points(&self) -> u8 {
        self.pairs + self.run + self.fifteen + self.thirty_one
    }

    pub fn reaches_thirty_one(&self) -> bool {
        self.thirty_one > 0
    }
}

/// Scores the last card of `sequence`, the cards played since the count last
/// reset, given the running `total` after that card.
pub fn score_last_play(sequence: &[Card], total: u8) -> Result<PlayScore, ScoreError> {
    if total > THIRTY_ONE {
        return Err(ScoreError::TotalExceedsThirtyOne { total });
    }
    ensure_unique(sequence.iter().copied())?;

    let matches = trailing_pair_count(sequence);
    let run = trailing_run_length(sequence);
    Ok(PlayScore {
        pairs: ((matches + 1) * matches) as u8,
        run: if sequence.len() >= 3 && run >= 3 { run as u8 } else { 0 },
        fifteen: if total == FIFTEEN { 2 } else { 0 },
        thirty_one: if total == THIRTY_ONE { 2 } else { 0 },
    })
}

/// How many cards immediately before the last one share its face value.
pub fn trailing_pair_count(sequence: &[Card]) -> usize {
    let Some((last, earlier)) = sequence.split_last() else {
        return 0;
    };
    earlier
        .iter()
        .rev()
        .take_while(|card| card.face_value() == last.face_value())
        .count()
}

/// Length of the run ending at the last card, read most recent first with each
/// older card exactly one face value below the card after it.
pub fn trailing_run_length(sequence: &[Card]) -> usize {
    let mut faces = sequence.iter().rev().map(|card| card.face_value());
    let Some(mut newer) = faces.next() else {
        return 0;
    };
    let mut length = 1;
    for older in faces {
        if older + 1 != newer {
            break;
        }
        length += 1;
        newer = older;
    }
    length
}

#[cfg(test)]
mod tests {
    use super::{PlayScore, score_last_play, trailing_pair_count, trailing_run_length};
    use crate::model::card::Card;
    use crate::scoring::ScoreError;

    fn cards(ids: &[u8]) -> Vec<Card> {
        ids.iter().map(|&id| Card::from_id(id).unwrap()).collect()
    }

    fn total(sequence: &[Card]) -> u8 {
        sequence.iter().map(|card| card.count_value()).sum()
    }

    fn points(ids: &[u8]) -> u8 {
        let sequence = cards(ids);
        score_last_play(&sequence, total(&sequence)).unwrap().points()
    }

    #[test]
    fn single_card_scores_nothing() {
        assert_eq!(points(&[0]), 0);
    }

    #[test]
    fn pairs_grow_with_each_match() {
        assert_eq!(points(&[0, 13]), 2);
        assert_eq!(points(&[0, 13, 26]), 6);
        assert_eq!(points(&[0, 13, 26, 39]), 12);
        // The earlier ace is separated by a two.
        assert_eq!(points(&[0, 1, 13]), 0);
    }

    #[test]
    fn runs_must_end_with_the_last_card() {
        assert_eq!(points(&[0, 1, 2]), 3);
        assert_eq!(points(&[0, 1, 3, 4]), 0);
        // A 2 3 4 5 is also fifteen.
        assert_eq!(points(&[0, 1, 2, 3, 4]), 7);
    }

    #[test]
    fn runs_are_read_in_descending_play_order() {
        // 3 then 2 then A reads as a descending sequence from the newest card.
        assert_eq!(trailing_run_length(&cards(&[2, 1, 0])), 1);
        assert_eq!(trailing_run_length(&cards(&[0, 1, 2])), 3);
    }

    #[test]
    fn pair_of_fours_after_a_run_scores_the_pair() {
        // A 2 3 4 4: total 14, trailing pair of fours.
        assert_eq!(points(&[0, 1, 2, 3, 16]), 2);
    }

    #[test]
    fn fifteen_and_thirty_one_score_two() {
        let fifteen = cards(&[9, 4]);
        assert_eq!(
            score_last_play(&fifteen, 15).unwrap(),
            PlayScore {
                fifteen: 2,
                ..PlayScore::default()
            }
        );

        // K Q J A: 31 with no pair or run.
        let thirty_one = cards(&[12, 11, 10, 0]);
        let score = score_last_play(&thirty_one, 31).unwrap();
        assert!(score.reaches_thirty_one());
        assert_eq!(score.points(), 2);
    }

    #[test]
    fn trailing_helpers_handle_empty_sequences() {
        assert_eq!(trailing_pair_count(&[]), 0);
        assert_eq!(trailing_run_length(&[]), 0);
    }

    #[test]
    fn totals_above_thirty_one_are_rejected() {
        assert_eq!(
            score_last_play(&cards(&[12, 11, 10, 9]), 40),
            Err(ScoreError::TotalExceedsThirtyOne { total: 40 })
        );
    }
}
