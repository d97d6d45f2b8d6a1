use cribbage_bot::{EvaluatedPolicy, PeggingStyle, PlayContext, Policy, RandomPolicy};
use cribbage_core::discard::DiscardObjective;
use cribbage_core::game::match_state::MatchState;
use cribbage_core::model::player::PlayerPosition;
use cribbage_core::model::round::RoundPhase;
use cribbage_core::model::score::GameStatus;
use cribbage_core::scoring::{HandScorer, ScorerConfig};

fn run_match(seed: u64, policies: &mut [Box<dyn Policy>; 2]) -> (GameStatus, [u32; 2]) {
    let mut state = MatchState::with_seed(PlayerPosition::First, seed).unwrap();
    let mut counter = HandScorer::new(ScorerConfig::default());

    loop {
        for seat in PlayerPosition::LOOP {
            let owns_crib = seat == state.dealer();
            let deal = state.round().dealt(seat).to_vec();
            let option = policies[seat.index()]
                .choose_discard(&deal, owns_crib)
                .unwrap();
            state
                .round_mut()
                .submit_discard(seat, option.discarded)
                .unwrap();
        }

        let mut events = state.round_mut().cut_turn().unwrap();
        while state.round().phase() == RoundPhase::Pegging {
            let seat = state.round().to_play();
            let choice = {
                let ctx = PlayContext::from_round(state.round(), state.scores(), seat);
                policies[seat.index()].choose_play(&ctx)
            };
            events.extend(state.round_mut().play(seat, choice).unwrap());
        }
        events.extend(state.round_mut().count(&mut counter).unwrap());

        let (_, status) = state.apply(&events);
        if status.is_over() {
            return (status, *state.scores().standings());
        }
        state.finish_round_and_start_next().unwrap();
    }
}

fn evaluated(objective: DiscardObjective) -> Box<dyn Policy> {
    Box::new(EvaluatedPolicy::new(
        objective,
        PeggingStyle::Rules,
        ScorerConfig::default(),
    ))
}

#[test]
fn evaluated_and_random_policies_finish_a_match() {
    let mut policies: [Box<dyn Policy>; 2] = [
        evaluated(DiscardObjective::BestExpected),
        Box::new(RandomPolicy::new(4)),
    ];
    let (status, standings) = run_match(12, &mut policies);
    let winner = status.winner().unwrap();
    assert!(standings[winner.index()] >= 121);
}

#[test]
fn identical_seeds_give_identical_results() {
    let mut first: [Box<dyn Policy>; 2] = [
        evaluated(DiscardObjective::BestWorstCase),
        Box::new(RandomPolicy::new(9)),
    ];
    let mut second: [Box<dyn Policy>; 2] = [
        evaluated(DiscardObjective::BestWorstCase),
        Box::new(RandomPolicy::new(9)),
    ];
    assert_eq!(run_match(77, &mut first), run_match(77, &mut second));
}
