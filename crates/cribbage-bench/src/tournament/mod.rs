mod seating;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::analytics::{AnalyticsCollector, AnalyticsError};
use crate::config::{AgentConfig, BenchmarkConfig, ResolvedOutputs};
use crate::logging::TELEMETRY_FILE;
use cribbage_bot::policy::{
    EvaluatedPolicy, PeggingStyle, PlayContext, Policy, PolicyError, RandomPolicy,
};
use cribbage_core::discard::DiscardObjective;
use cribbage_core::game::match_state::MatchState;
use cribbage_core::model::player::PlayerPosition;
use cribbage_core::model::round::{RoundError, RoundPhase};
use cribbage_core::scoring::{HandScorer, ScorerConfig};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

pub use seating::Seating;

const REQUIRED_AGENTS: usize = 2;

/// Primary entry point for orchestrating tournaments.
pub struct TournamentRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    agents: Vec<AgentBlueprint>,
    logging_enabled: bool,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub games_played: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
}

impl TournamentRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let agents = AgentBlueprint::from_configs(&config.agents)?;

        if agents.len() != REQUIRED_AGENTS {
            return Err(RunnerError::SeatCount {
                found: agents.len(),
            });
        }

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            agents,
        })
    }

    /// Play every configured game, streaming one JSONL row per game to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let mut rows_written = 0usize;
        let mut analytics = AnalyticsCollector::new(&self.config);

        for game_index in 0..self.config.games.count {
            let game_seed = rng.next_u64();
            let seating = Seating::for_game(game_index);
            let outcome = self.play_game(game_index, game_seed, seating)?;
            analytics.record_game(&outcome)?;
            write_game_row(&mut writer, &self.config, game_index, game_seed, &outcome)?;
            rows_written += 1;
        }

        writer.flush()?;

        let summary = analytics.finalize()?;
        summary.write_markdown(&self.outputs.summary_md)?;

        let telemetry_path = self
            .logging_enabled
            .then(|| self.outputs.summary_dir().join(TELEMETRY_FILE));

        Ok(RunSummary {
            games_played: self.config.games.count,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            telemetry_path,
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_game_row(
    writer: &mut BufWriter<File>,
    config: &BenchmarkConfig,
    game_index: usize,
    game_seed: u64,
    outcome: &GameOutcome,
) -> Result<(), RunnerError> {
    let seats = outcome
        .seat_results
        .iter()
        .map(|seat| SeatLogRow {
            seat: seat_label(seat.seat),
            bot: seat.agent_name.clone(),
            score: seat.score,
            decisions: seat.metrics.decisions,
            speed_ms_decision: seat.metrics.avg_ms_per_decision,
        })
        .collect();

    let row = GameLogRow {
        run_id: config.run_id.clone(),
        game_id: format!("G{game_index:05}"),
        game_index,
        game_seed,
        winner: outcome.winner_name().to_string(),
        winner_seat: seat_label(outcome.winner),
        margin: outcome.margin(),
        rounds: outcome.rounds,
        seats,
    };

    serde_json::to_writer(&mut *writer, &row)?;
    writer.write_all(b"\n")?;
    Ok(())
}

impl TournamentRunner {
    fn play_game(
        &self,
        game_index: usize,
        game_seed: u64,
        seating: Seating,
    ) -> Result<GameOutcome, RunnerError> {
        let mut match_state = MatchState::with_seed(PlayerPosition::First, game_seed)?;
        let mut seats = build_seat_states(seating, &self.agents, self.config.scorer, game_seed)?;
        let mut counter = HandScorer::new(self.config.scorer);

        let winner = loop {
            let round_number = match_state.round_number();

            for seat_state in &mut seats {
                let seat = seat_state.seat;
                let owns_crib = seat == match_state.dealer();
                let deal = match_state.round().dealt(seat).to_vec();

                let start = Instant::now();
                let option = seat_state.policy.choose_discard(&deal, owns_crib)?;
                let elapsed_ms = seat_state.metrics.record(start.elapsed());

                if self.logging_enabled && tracing::enabled!(Level::INFO) {
                    event!(
                        target: "cribbage_bench::game",
                        Level::INFO,
                        run_id = %self.config.run_id,
                        game_index = game_index as u32,
                        round = round_number,
                        seat = seat_label(seat),
                        agent = %seat_state.agent_name,
                        owns_crib,
                        discarded = %format!("{},{}", option.discarded[0], option.discarded[1]),
                        elapsed_ms
                    );
                }

                match_state
                    .round_mut()
                    .submit_discard(seat, option.discarded)?;
            }

            let mut events = match_state.round_mut().cut_turn()?;

            while match_state.round().phase() == RoundPhase::Pegging {
                let seat = match_state.round().to_play();
                let seat_state = &mut seats[seat.index()];
                let choice = {
                    let ctx = PlayContext::from_round(
                        match_state.round(),
                        match_state.scores(),
                        seat,
                    );
                    let start = Instant::now();
                    let choice = seat_state.policy.choose_play(&ctx);
                    let elapsed_ms = seat_state.metrics.record(start.elapsed());

                    if self.logging_enabled && tracing::enabled!(Level::DEBUG) {
                        event!(
                            target: "cribbage_bench::game",
                            Level::DEBUG,
                            run_id = %self.config.run_id,
                            game_index = game_index as u32,
                            round = round_number,
                            seat = seat_label(seat),
                            card = ?choice,
                            count = ctx.pegging.total(),
                            elapsed_ms
                        );
                    }

                    choice
                };

                let scored = match_state.round_mut().play(seat, choice).map_err(|err| {
                    RunnerError::game(format!(
                        "invalid pegging play: {err} (seat: {seat}, card: {choice:?}, count: {})",
                        match_state.round().pegging().total()
                    ))
                })?;
                events.extend(scored);
            }

            events.extend(match_state.round_mut().count(&mut counter)?);

            let (_, status) = match_state.apply(&events);
            if let Some(winner) = status.winner() {
                break winner;
            }
            match_state.finish_round_and_start_next()?;
        };

        let standings = *match_state.scores().standings();
        let rounds = match_state.round_number();

        let seat_results: Vec<SeatResult> = seats
            .into_iter()
            .map(|seat| SeatResult {
                score: standings[seat.seat.index()],
                agent_name: seat.agent_name,
                seat: seat.seat,
                metrics: seat.metrics.finalize(),
            })
            .collect();

        let outcome = GameOutcome {
            seat_results,
            winner,
            rounds,
        };

        if self.logging_enabled && tracing::enabled!(Level::INFO) {
            event!(
                target: "cribbage_bench::game",
                Level::INFO,
                run_id = %self.config.run_id,
                game_index = game_index as u32,
                game_seed,
                winner = %outcome.winner_name(),
                first = standings[0],
                second = standings[1],
                rounds,
                "game complete"
            );
        }

        Ok(outcome)
    }
}

fn build_seat_states(
    seating: Seating,
    agents: &[AgentBlueprint],
    scorer: ScorerConfig,
    game_seed: u64,
) -> Result<Vec<SeatState>, RunnerError> {
    let mut seats = Vec::with_capacity(REQUIRED_AGENTS);
    for (seat_idx, agent_idx) in seating.agents().into_iter().enumerate() {
        let seat = PlayerPosition::from_index(seat_idx).ok_or_else(|| {
            RunnerError::game(format!("invalid seat index generated: {seat_idx}"))
        })?;
        let agent = agents.get(agent_idx).ok_or(RunnerError::InvalidSeating {
            index: seat_idx,
            agent_index: agent_idx,
        })?;
        let policy_seed = game_seed.wrapping_add(seat_idx as u64 + 1);
        seats.push(SeatState::new(seat, agent, scorer, policy_seed));
    }
    Ok(seats)
}

fn seat_label(position: PlayerPosition) -> &'static str {
    match position {
        PlayerPosition::First => "first",
        PlayerPosition::Second => "second",
    }
}

struct SeatState {
    seat: PlayerPosition,
    agent_name: String,
    policy: Box<dyn Policy>,
    metrics: DecisionMetrics,
}

impl SeatState {
    fn new(seat: PlayerPosition, agent: &AgentBlueprint, scorer: ScorerConfig, seed: u64) -> Self {
        Self {
            seat,
            agent_name: agent.name.clone(),
            policy: agent.spawn_policy(scorer, seed),
            metrics: DecisionMetrics::default(),
        }
    }
}

/// Result of one game, seats in seat order.
pub struct GameOutcome {
    pub seat_results: Vec<SeatResult>,
    pub winner: PlayerPosition,
    pub rounds: u32,
}

impl GameOutcome {
    pub fn winner_name(&self) -> &str {
        self.seat_results
            .iter()
            .find(|seat| seat.seat == self.winner)
            .map(|seat| seat.agent_name.as_str())
            .unwrap_or_default()
    }

    /// Winner's score minus the loser's.
    pub fn margin(&self) -> u32 {
        let winning = self
            .seat_results
            .iter()
            .filter(|seat| seat.seat == self.winner)
            .map(|seat| seat.score)
            .sum::<u32>();
        let losing = self
            .seat_results
            .iter()
            .filter(|seat| seat.seat != self.winner)
            .map(|seat| seat.score)
            .sum::<u32>();
        winning.saturating_sub(losing)
    }
}

pub struct SeatResult {
    pub agent_name: String,
    pub seat: PlayerPosition,
    pub score: u32,
    pub metrics: DecisionSummary,
}

#[derive(Default)]
struct DecisionMetrics {
    total: Duration,
    decisions: u32,
}

impl DecisionMetrics {
    fn record(&mut self, duration: Duration) -> f64 {
        self.total += duration;
        self.decisions += 1;
        duration.as_secs_f64() * 1000.0
    }

    fn finalize(self) -> DecisionSummary {
        let avg_ms = if self.decisions == 0 {
            0.0
        } else {
            self.total.as_secs_f64() * 1000.0 / f64::from(self.decisions)
        };

        DecisionSummary {
            decisions: self.decisions,
            avg_ms_per_decision: avg_ms,
            total_ms: self.total.as_secs_f64() * 1000.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DecisionSummary {
    pub decisions: u32,
    pub avg_ms_per_decision: f64,
    pub total_ms: f64,
}

#[derive(Serialize)]
struct GameLogRow {
    run_id: String,
    game_id: String,
    game_index: usize,
    game_seed: u64,
    winner: String,
    winner_seat: &'static str,
    margin: u32,
    rounds: u32,
    seats: Vec<SeatLogRow>,
}

#[derive(Serialize)]
struct SeatLogRow {
    seat: &'static str,
    bot: String,
    score: u32,
    decisions: u32,
    speed_ms_decision: f64,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Agent(#[from] AgentError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("round rejected an action: {0}")]
    Round(#[from] RoundError),
    #[error("policy failed: {0}")]
    Policy(#[from] PolicyError),
    #[error("game execution failed: {message}")]
    Game { message: String },
    #[error("configuration requires exactly 2 agents but found {found}")]
    SeatCount { found: usize },
    #[error("seat {index} references invalid agent index {agent_index}")]
    InvalidSeating { index: usize, agent_index: usize },
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}

impl RunnerError {
    fn game(message: String) -> Self {
        RunnerError::Game { message }
    }
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid parameter for agent '{name}': {message}")]
    InvalidParam { name: String, message: String },
}

struct AgentBlueprint {
    name: String,
    implementation: AgentImplementation,
}

enum AgentImplementation {
    Random(RandomOptions),
    Evaluated(EvaluatedOptions),
}

impl AgentBlueprint {
    fn from_configs(configs: &[AgentConfig]) -> Result<Vec<Self>, AgentError> {
        configs.iter().map(Self::from_config).collect()
    }

    fn from_config(config: &AgentConfig) -> Result<Self, AgentError> {
        let implementation = match config.kind.objective() {
            None => AgentImplementation::Random(RandomOptions::from_params(
                &config.name,
                &config.params,
            )?),
            Some(objective) => AgentImplementation::Evaluated(EvaluatedOptions::from_params(
                &config.name,
                objective,
                &config.params,
            )?),
        };

        Ok(Self {
            name: config.name.clone(),
            implementation,
        })
    }

    fn spawn_policy(&self, scorer: ScorerConfig, seed: u64) -> Box<dyn Policy> {
        match &self.implementation {
            AgentImplementation::Random(opts) => {
                Box::new(RandomPolicy::new(opts.seed.unwrap_or(seed)))
            }
            AgentImplementation::Evaluated(opts) => {
                Box::new(EvaluatedPolicy::new(opts.objective, opts.pegging, scorer))
            }
        }
    }
}

fn params_mapping<'a>(
    name: &str,
    params: &'a serde_yaml::Value,
) -> Result<Option<&'a serde_yaml::Mapping>, AgentError> {
    if params.is_null() {
        return Ok(None);
    }
    params
        .as_mapping()
        .map(Some)
        .ok_or_else(|| AgentError::InvalidParam {
            name: name.to_string(),
            message: "expected mapping for agent params".to_string(),
        })
}

fn param<'a>(mapping: &'a serde_yaml::Mapping, key: &str) -> Option<&'a serde_yaml::Value> {
    mapping
        .iter()
        .find_map(|(k, value)| (k.as_str() == Some(key)).then_some(value))
}

struct RandomOptions {
    seed: Option<u64>,
}

impl RandomOptions {
    fn from_params(name: &str, params: &serde_yaml::Value) -> Result<Self, AgentError> {
        let Some(mapping) = params_mapping(name, params)? else {
            return Ok(Self { seed: None });
        };

        let seed = match param(mapping, "seed") {
            None => None,
            Some(value) => Some(value.as_u64().ok_or_else(|| AgentError::InvalidParam {
                name: name.to_string(),
                message: "seed must be an unsigned integer".to_string(),
            })?),
        };

        Ok(Self { seed })
    }
}

struct EvaluatedOptions {
    objective: DiscardObjective,
    pegging: PeggingStyle,
}

impl EvaluatedOptions {
    fn from_params(
        name: &str,
        objective: DiscardObjective,
        params: &serde_yaml::Value,
    ) -> Result<Self, AgentError> {
        let pegging = match params_mapping(name, params)?.and_then(|m| param(m, "pegging")) {
            None => PeggingStyle::default(),
            Some(value) => {
                let text = value.as_str().ok_or_else(|| AgentError::InvalidParam {
                    name: name.to_string(),
                    message: "pegging must be a string".to_string(),
                })?;
                match text.to_ascii_lowercase().as_str() {
                    "rules" | "priority" => PeggingStyle::Rules,
                    "first_legal" | "first" => PeggingStyle::FirstLegal,
                    other => {
                        return Err(AgentError::InvalidParam {
                            name: name.to_string(),
                            message: format!("unknown pegging style '{other}'"),
                        });
                    }
                }
            }
        };

        Ok(Self { objective, pegging })
    }
}
