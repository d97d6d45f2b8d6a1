use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use statrs::statistics::Statistics;
use thiserror::Error;

use crate::config::{AgentKind, BenchmarkConfig};
use crate::tournament::GameOutcome;

const CONFIDENCE_Z: f64 = 1.96; // 95% CI
/// A loser below this score has been skunked.
const SKUNK_LINE: u32 = 91;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("agent '{0}' defined in results but missing from configuration")]
    UnknownAgent(String),
    #[error("statistics error: {0}")]
    Statistics(#[from] statrs::StatsError),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

pub struct AnalyticsCollector {
    agents: HashMap<String, AgentAccumulator>,
    agent_order: Vec<String>,
    games: usize,
}

impl AnalyticsCollector {
    pub fn new(config: &BenchmarkConfig) -> Self {
        let mut agents = HashMap::new();
        let mut order = Vec::new();
        for agent in &config.agents {
            agents.insert(agent.name.clone(), AgentAccumulator::new(agent.kind));
            order.push(agent.name.clone());
        }

        Self {
            agents,
            agent_order: order,
            games: 0,
        }
    }

    pub fn record_game(&mut self, outcome: &GameOutcome) -> Result<(), AnalyticsError> {
        let total: u32 = outcome.seat_results.iter().map(|seat| seat.score).sum();

        for seat in &outcome.seat_results {
            let acc = self
                .agents
                .get_mut(&seat.agent_name)
                .ok_or_else(|| AnalyticsError::UnknownAgent(seat.agent_name.clone()))?;

            let opponent = total - seat.score;
            let won = seat.seat == outcome.winner;
            acc.record_game(
                f64::from(seat.score) - f64::from(opponent),
                won,
                won && opponent < SKUNK_LINE,
                seat.metrics.total_ms,
                seat.metrics.decisions,
            );
        }

        self.games += 1;
        Ok(())
    }

    pub fn finalize(mut self) -> Result<AnalyticsSummary, AnalyticsError> {
        let normal = Normal::new(0.0, 1.0)?;
        let mut reports = Vec::new();
        for name in &self.agent_order {
            if let Some(acc) = self.agents.remove(name) {
                reports.push(acc.into_report(name.clone(), &normal));
            }
        }

        Ok(AnalyticsSummary {
            games: self.games,
            agents: reports,
        })
    }
}

struct AgentAccumulator {
    kind: AgentKind,
    games: u32,
    wins: u32,
    skunks: u32,
    margins: Vec<f64>,
    total_latency_ms: f64,
    total_decisions: u64,
}

impl AgentAccumulator {
    fn new(kind: AgentKind) -> Self {
        Self {
            kind,
            games: 0,
            wins: 0,
            skunks: 0,
            margins: Vec::new(),
            total_latency_ms: 0.0,
            total_decisions: 0,
        }
    }

    fn record_game(
        &mut self,
        margin: f64,
        won: bool,
        skunk: bool,
        latency_ms: f64,
        decisions: u32,
    ) {
        self.games += 1;
        self.margins.push(margin);
        if won {
            self.wins += 1;
        }
        if skunk {
            self.skunks += 1;
        }
        self.total_latency_ms += latency_ms;
        self.total_decisions += u64::from(decisions);
    }

    fn into_report(self, name: String, normal: &Normal) -> AgentReport {
        let win_rate = if self.games == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.games)
        };
        let mean_margin = if self.margins.is_empty() {
            0.0
        } else {
            self.margins.iter().mean()
        };
        let average_ms_per_decision = if self.total_decisions == 0 {
            0.0
        } else {
            self.total_latency_ms / self.total_decisions as f64
        };

        AgentReport {
            name,
            kind: self.kind,
            games: self.games as usize,
            wins: self.wins as usize,
            skunks: self.skunks as usize,
            win_rate,
            win_rate_ci95: proportion_interval(win_rate, self.games),
            p_value: even_odds_p_value(self.wins, self.games, normal),
            mean_margin,
            average_ms_per_decision,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    pub games: usize,
    pub agents: Vec<AgentReport>,
}

impl AnalyticsSummary {
    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        let mut rows = String::new();
        rows.push_str("# Tournament Summary\n\n");
        rows.push_str(&format!(
            "Games played: {} (seats alternate every game)\n\n",
            self.games
        ));
        rows.push_str("| Agent | Kind | Games | Wins | Win % | 95% CI | Mean margin | Skunks | Avg ms/decision | p-value |\n");
        rows.push_str("|-------|------|-------|------|-------|--------|-------------|--------|-----------------|---------|\n");

        for agent in &self.agents {
            rows.push_str(&format!(
                "| {name} | {kind} | {games} | {wins} | {win:.1}% | [{ci_low:.1}%, {ci_high:.1}%] | {margin:+.2} | {skunks} | {latency:.3} | {pval:.3} |\n",
                name = agent.name,
                kind = agent.kind.label(),
                games = agent.games,
                wins = agent.wins,
                win = agent.win_rate * 100.0,
                ci_low = agent.win_rate_ci95.0 * 100.0,
                ci_high = agent.win_rate_ci95.1 * 100.0,
                margin = agent.mean_margin,
                skunks = agent.skunks,
                latency = agent.average_ms_per_decision,
                pval = agent.p_value,
            ));
        }

        fs::write(path.as_ref(), rows).map_err(|e| AnalyticsError::Io {
            context: "writing summary markdown",
            source: e,
        })?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    pub name: String,
    pub kind: AgentKind,
    pub games: usize,
    pub wins: usize,
    pub skunks: usize,
    pub win_rate: f64,
    pub win_rate_ci95: (f64, f64),
    /// Two-sided normal-approximation test against a 50% win rate.
    pub p_value: f64,
    pub mean_margin: f64,
    pub average_ms_per_decision: f64,
}

/// Normal-approximation interval for a proportion, clamped to [0, 1].
fn proportion_interval(rate: f64, samples: u32) -> (f64, f64) {
    if samples == 0 {
        return (0.0, 0.0);
    }
    let std_error = (rate * (1.0 - rate) / f64::from(samples)).sqrt();
    let margin = CONFIDENCE_Z * std_error;
    ((rate - margin).max(0.0), (rate + margin).min(1.0))
}

fn even_odds_p_value(wins: u32, games: u32, normal: &Normal) -> f64 {
    if games == 0 {
        return 1.0;
    }
    let n = f64::from(games);
    let expected = n / 2.0;
    let std_dev = (n / 4.0).sqrt();
    // Continuity correction.
    let z = ((f64::from(wins) - expected).abs() - 0.5).max(0.0) / std_dev;
    let p = 2.0 * (1.0 - normal.cdf(z));
    p.clamp(0.0, 1.0)
}
