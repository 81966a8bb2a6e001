//! Scoring and platform services
//!
//! The session reports finished runs and aggregate counters here and forwards
//! the leaderboard, achievements and share buttons. Failures stay inside the
//! implementation; nothing is returned to the simulation.

use serde::{Deserialize, Serialize};

use crate::highscores::HighScores;
use crate::sim::SessionSummary;

/// Score submission, statistics and platform screens
pub trait GameServices {
    fn submit_score(&mut self, summary: &SessionSummary);
    fn add_game_played(&mut self);
    fn add_jump_count(&mut self, count: u32);
    fn add_double_jump_count(&mut self, count: u32);
    fn add_power_stomp_count(&mut self, count: u32);
    fn display_leaderboard(&mut self);
    fn display_achievements(&mut self);
    fn share(&mut self);
}

/// Aggregate counters across all sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayStats {
    pub games_played: u32,
    pub jumps: u32,
    pub double_jumps: u32,
    pub power_stomps: u32,
}

/// In-process services: local leaderboard and counters
#[derive(Debug, Clone, Default)]
pub struct LocalServices {
    pub high_scores: HighScores,
    pub stats: PlayStats,
    /// Every summary submitted, in order
    pub submitted: Vec<SessionSummary>,
    pub leaderboard_requests: u32,
    pub achievements_requests: u32,
    pub share_requests: u32,
}

impl LocalServices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing leaderboard
    pub fn with_high_scores(high_scores: HighScores) -> Self {
        Self {
            high_scores,
            ..Self::default()
        }
    }

    /// Most recent submission
    pub fn last_submitted(&self) -> Option<&SessionSummary> {
        self.submitted.last()
    }
}

impl GameServices for LocalServices {
    fn submit_score(&mut self, summary: &SessionSummary) {
        self.submitted.push(*summary);
        let game = self.stats.games_played + 1;
        match self.high_scores.add_summary(summary, game) {
            Some(rank) => log::info!("Score {} ranked #{}", summary.score, rank),
            None => log::debug!("Score {} did not make the leaderboard", summary.score),
        }
    }

    fn add_game_played(&mut self) {
        self.stats.games_played += 1;
    }

    fn add_jump_count(&mut self, count: u32) {
        self.stats.jumps += count;
    }

    fn add_double_jump_count(&mut self, count: u32) {
        self.stats.double_jumps += count;
    }

    fn add_power_stomp_count(&mut self, count: u32) {
        self.stats.power_stomps += count;
    }

    fn display_leaderboard(&mut self) {
        self.leaderboard_requests += 1;
        for (i, entry) in self.high_scores.entries.iter().enumerate() {
            log::info!(
                "#{} {} (x{}, level {})",
                i + 1,
                entry.score,
                entry.multiplier,
                entry.difficulty_level
            );
        }
    }

    fn display_achievements(&mut self) {
        self.achievements_requests += 1;
        log::info!(
            "Achievements: {} games, {} jumps, {} double jumps, {} power stomps",
            self.stats.games_played,
            self.stats.jumps,
            self.stats.double_jumps,
            self.stats.power_stomps
        );
    }

    fn share(&mut self) {
        self.share_requests += 1;
        match self.high_scores.top_score() {
            Some(best) => log::info!("Sharing best score {}", best),
            None => log::info!("Sharing (no score yet)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_and_counters() {
        let mut services = LocalServices::new();
        let summary = SessionSummary {
            score: 12,
            multiplier: 5,
            jumps: 3,
            double_jumps: 1,
            power_stomps: 2,
            difficulty_level: 2,
            difficulty_scale: 1,
        };

        services.submit_score(&summary);
        services.add_game_played();
        services.add_jump_count(summary.jumps);
        services.add_double_jump_count(summary.double_jumps);
        services.add_power_stomp_count(summary.power_stomps);

        assert_eq!(services.last_submitted(), Some(&summary));
        assert_eq!(services.high_scores.top_score(), Some(12));
        assert_eq!(services.high_scores.entries[0].game, 1);
        assert_eq!(
            services.stats,
            PlayStats {
                games_played: 1,
                jumps: 3,
                double_jumps: 1,
                power_stomps: 2,
            }
        );
    }

    #[test]
    fn test_screen_requests_are_counted() {
        let mut services = LocalServices::new();
        services.display_leaderboard();
        services.display_achievements();
        services.share();
        services.share();
        assert_eq!(services.leaderboard_requests, 1);
        assert_eq!(services.achievements_requests, 1);
        assert_eq!(services.share_requests, 2);
    }
}
