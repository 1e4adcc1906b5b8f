use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The outcome of a coin flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoinResult {
    Heads,
    Tails,
}

impl CoinResult {
    /// The stored and rendered form of the outcome.
    pub fn as_str(&self) -> &'static str {
        match self {
            CoinResult::Heads => "heads",
            CoinResult::Tails => "tails",
        }
    }
}

impl fmt::Display for CoinResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoinResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "heads" => Ok(CoinResult::Heads),
            "tails" => Ok(CoinResult::Tails),
            other => Err(format!("unknown coin result '{}'", other)),
        }
    }
}

/// Where a session stands when it is read at a given moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The scheduled moment has not arrived and no result is stored.
    Pending,
    /// The scheduled moment has arrived but no result is stored yet.
    Due,
    /// A result is stored. Terminal.
    Resolved(CoinResult),
}

/// A scheduled coin-flip session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The unguessable token addressing this session.
    pub token: String,
    /// Epoch seconds at which the coin may be flipped.
    pub scheduled_at: i64,
    /// The stored outcome, if the session has been resolved.
    pub result: Option<CoinResult>,
    /// The timestamp when the session was created.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Classifies the session as seen at `now` (epoch seconds).
    ///
    /// `grace_secs` lets a session become due that many seconds early.
    pub fn state_at(&self, now: i64, grace_secs: i64) -> SessionState {
        match self.result {
            Some(result) => SessionState::Resolved(result),
            None if now.saturating_add(grace_secs) >= self.scheduled_at => SessionState::Due,
            None => SessionState::Pending,
        }
    }

    /// The client-facing rendering of this session.
    pub fn view(&self) -> SessionView {
        SessionView {
            timestamp: self.scheduled_at,
            coin_result: self
                .result
                .map(|r| r.as_str().to_string())
                .unwrap_or_default(),
        }
    }
}

/// The JSON record returned to viewers.
///
/// `coin_result` is empty while the session is unresolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub timestamp: i64,
    pub coin_result: String,
}
