//! Leaderboard
//!
//! The remote board keeps the top 10 distances with a player's initials.
//! The game only talks to it after a run ends and never lets a failure
//! get in the way of the game over screen: errors are logged and the board
//! is reported as unavailable.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{LEADERBOARD_SIZE, MAX_INITIAL_LEN};

/// A ranked entry as returned by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub initial: String,
    /// Distance in meters
    pub score: u32,
}

/// A score to submit. Construct with [`ScoreSubmission::new`] to get a normalized initial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub score: u32,
    pub initial: String,
}

impl ScoreSubmission {
    pub fn new(score: u32, initial: &str) -> Result<Self, LeaderboardError> {
        Ok(Self {
            score,
            initial: normalize_initial(initial)?,
        })
    }

    /// Form fields for the `addScore` request
    pub fn form_fields(&self) -> [(&'static str, String); 3] {
        [
            ("action", "addScore".to_string()),
            ("score", self.score.to_string()),
            ("initial", self.initial.clone()),
        ]
    }
}

/// Trim and uppercase an initial, which must be 1 to 3 ASCII letters
pub fn normalize_initial(initial: &str) -> Result<String, LeaderboardError> {
    let trimmed = initial.trim();
    let valid = !trimmed.is_empty()
        && trimmed.len() <= MAX_INITIAL_LEN
        && trimmed.chars().all(|c| c.is_ascii_alphabetic());
    if !valid {
        return Err(LeaderboardError::InvalidInitial(initial.to_string()));
    }
    Ok(trimmed.to_ascii_uppercase())
}

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("leaderboard is disabled or not configured")]
    Disabled,

    #[error("initial must be 1-3 ASCII letters, got {0:?}")]
    InvalidInitial(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("service reported an error: {0}")]
    Service(String),

    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The remote score service.
///
/// Calls may block on the network; drive them from outside the tick loop.
pub trait LeaderboardService {
    /// Current top entries, best first
    fn fetch_top(&self) -> Result<Vec<ScoreEntry>, LeaderboardError>;

    /// Submit a score. `Ok(false)` means the service declined it.
    fn submit(&self, submission: &ScoreSubmission) -> Result<bool, LeaderboardError>;
}

#[derive(Debug, Deserialize)]
struct TopScoresResponse {
    success: bool,
    #[serde(default)]
    scores: Vec<ScoreEntry>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    success: bool,
}

/// Decode a `getTop10` response body
pub fn parse_top_scores(body: &str) -> Result<Vec<ScoreEntry>, LeaderboardError> {
    let response: TopScoresResponse = serde_json::from_str(body)?;
    if !response.success {
        return Err(LeaderboardError::Service(
            response.error.unwrap_or_else(|| "unknown error".to_string()),
        ));
    }
    Ok(response.scores)
}

/// Decode an `addScore` response body
pub fn parse_submit_response(body: &str) -> Result<bool, LeaderboardError> {
    let response: SubmitResponse = serde_json::from_str(body)?;
    Ok(response.success)
}

/// HTTP plumbing for [`RemoteLeaderboard`], supplied by the host
pub trait LeaderboardTransport {
    /// `GET {endpoint}?action={action}`, returning the response body
    fn get(&self, action: &str) -> Result<String, LeaderboardError>;

    /// `POST {endpoint}` with a url-encoded form body, returning the response body
    fn post_form(&self, fields: &[(&'static str, String)]) -> Result<String, LeaderboardError>;
}

/// Leaderboard backed by the score web service
#[derive(Debug)]
pub struct RemoteLeaderboard<T> {
    transport: T,
}

impl<T: LeaderboardTransport> RemoteLeaderboard<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }
}

impl<T: LeaderboardTransport> LeaderboardService for RemoteLeaderboard<T> {
    fn fetch_top(&self) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        let body = self.transport.get("getTop10")?;
        parse_top_scores(&body)
    }

    fn submit(&self, submission: &ScoreSubmission) -> Result<bool, LeaderboardError> {
        let body = self.transport.post_form(&submission.form_fields())?;
        parse_submit_response(&body)
    }
}

/// Stand-in for a leaderboard that was never configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledLeaderboard;

impl LeaderboardService for DisabledLeaderboard {
    fn fetch_top(&self) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        Err(LeaderboardError::Disabled)
    }

    fn submit(&self, _submission: &ScoreSubmission) -> Result<bool, LeaderboardError> {
        Err(LeaderboardError::Disabled)
    }
}

/// In-process leaderboard for offline play and tests
#[derive(Debug, Default)]
pub struct LocalLeaderboard {
    entries: Mutex<Vec<ScoreEntry>>,
}

impl LocalLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LeaderboardService for LocalLeaderboard {
    fn fetch_top(&self) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        Ok(self.entries.lock().clone())
    }

    fn submit(&self, submission: &ScoreSubmission) -> Result<bool, LeaderboardError> {
        let mut entries = self.entries.lock();
        let entry = ScoreEntry {
            initial: submission.initial.clone(),
            score: submission.score,
        };

        // Sorted descending; ties keep the earlier entry ahead
        let pos = entries
            .iter()
            .position(|e| submission.score > e.score)
            .unwrap_or(entries.len());
        entries.insert(pos, entry);
        entries.truncate(LEADERBOARD_SIZE);

        Ok(true)
    }
}

/// Whether the cached board reflects the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeaderboardStatus {
    #[default]
    NotLoaded,
    Ready,
    Unavailable,
}

/// Outcome of submitting a score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stored; `rank` is the 1-indexed position after a refresh, if it made the board
    Accepted { rank: Option<usize> },
    Rejected,
    Unavailable,
}

/// Cached copy of the remote board
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
    status: LeaderboardStatus,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn status(&self) -> LeaderboardStatus {
        self.status
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best score on the board
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Reload from the service. Failures leave an empty, unavailable board.
    pub fn refresh(&mut self, service: &dyn LeaderboardService) -> LeaderboardStatus {
        match service.fetch_top() {
            Ok(mut entries) => {
                entries.sort_by(|a, b| b.score.cmp(&a.score));
                entries.truncate(LEADERBOARD_SIZE);
                log::info!("Loaded {} leaderboard entries", entries.len());
                self.entries = entries;
                self.status = LeaderboardStatus::Ready;
            }
            Err(LeaderboardError::Disabled) => {
                log::info!("Leaderboard is disabled");
                self.entries.clear();
                self.status = LeaderboardStatus::Unavailable;
            }
            Err(e) => {
                log::error!("Error loading leaderboard: {e}");
                self.entries.clear();
                self.status = LeaderboardStatus::Unavailable;
            }
        }
        self.status
    }

    /// Whether a score would make the top 10
    pub fn is_top_ten(&self, score: u32) -> bool {
        match self.entries.get(LEADERBOARD_SIZE - 1) {
            Some(last) => score > last.score,
            None => true,
        }
    }

    /// Rank a score would achieve (1-indexed), if it makes the board
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.is_top_ten(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Send a score and refresh the board on success
    pub fn submit(
        &mut self,
        service: &dyn LeaderboardService,
        submission: &ScoreSubmission,
    ) -> SubmitOutcome {
        match service.submit(submission) {
            Ok(true) => {
                log::info!(
                    "Submitted {}m for {}",
                    submission.score,
                    submission.initial
                );
                self.refresh(service);
                let rank = self
                    .entries
                    .iter()
                    .position(|e| e.initial == submission.initial && e.score == submission.score)
                    .map(|i| i + 1);
                SubmitOutcome::Accepted { rank }
            }
            Ok(false) => {
                log::warn!("Leaderboard declined score {}", submission.score);
                SubmitOutcome::Rejected
            }
            Err(e) => {
                log::error!("Error submitting score: {e}");
                SubmitOutcome::Unavailable
            }
        }
    }
}
