//! Signed game sessions.
//!
//! Answer counters travel with the client inside an HS256 token. Each
//! `/result` call restores the counters, records the new answer, and hands
//! back a freshly signed token.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use knowlift_domain::{calculate_statistics, change_level, DomainError, LevelCatalog, Statistics};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Session management error
#[derive(Debug, Error)]
pub enum SessionError {
    /// JWT encoding failed
    #[error("Failed to encode JWT: {0}")]
    JwtEncode(#[from] jsonwebtoken::errors::Error),

    /// Token expired
    #[error("Session token expired")]
    TokenExpired,

    /// Invalid token
    #[error("Invalid session token")]
    InvalidToken,
}

/// Answer counters for one player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    /// Correct answers in the current window
    pub correct_answers: u32,

    /// Incorrect answers in the current window
    pub incorrect_answers: u32,

    /// Correct answers since the session started
    pub total_correct: u32,

    /// Incorrect answers since the session started
    pub total_incorrect: u32,
}

impl GameSession {
    /// Record one answer and return the level for the next round
    ///
    /// Once `window` answers have accumulated the level is reassessed and
    /// the window counters start over. Until then `current_level` is kept,
    /// clamped to the catalog.
    pub fn record(
        &mut self,
        outcome: bool,
        current_level: usize,
        catalog: &LevelCatalog,
        window: u32,
    ) -> usize {
        let current_level = current_level.min(catalog.max_index());
        if outcome {
            self.correct_answers = self.correct_answers.saturating_add(1);
            self.total_correct = self.total_correct.saturating_add(1);
        } else {
            self.incorrect_answers = self.incorrect_answers.saturating_add(1);
            self.total_incorrect = self.total_incorrect.saturating_add(1);
        }

        let answered = self.correct_answers.saturating_add(self.incorrect_answers);
        if answered < window {
            return current_level;
        }

        let next = change_level(
            catalog,
            self.correct_answers,
            self.incorrect_answers,
            current_level,
        );
        debug!(
            correct = self.correct_answers,
            incorrect = self.incorrect_answers,
            from = current_level,
            to = next,
            "Answer window complete"
        );
        self.correct_answers = 0;
        self.incorrect_answers = 0;
        next
    }

    /// Accuracy over the whole session
    pub fn statistics(&self) -> Result<Statistics, DomainError> {
        calculate_statistics(self.total_incorrect, self.total_correct)
    }
}

/// JWT claims for session tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Answer counters
    #[serde(flatten)]
    pub session: GameSession,

    /// Token expiration timestamp (Unix epoch)
    pub exp: u64,

    /// Issued at timestamp (Unix epoch)
    pub iat: u64,
}

/// Session manager handles JWT token generation and validation
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_secs: u64,
}

impl SessionManager {
    /// Create a new session manager with the given secret and expiry
    pub fn new(secret: &str, token_expiry_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_expiry_secs,
        }
    }

    /// Sign the session's counters into a token
    pub fn issue(&self, session: &GameSession) -> Result<String, SessionError> {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        let claims = SessionClaims {
            session: *session,
            exp: now.saturating_add(self.token_expiry_secs),
            iat: now,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a token and extract the counters
    pub fn restore(&self, token: &str) -> Result<GameSession, SessionError> {
        let validation = Validation::default();
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::TokenExpired,
                _ => SessionError::InvalidToken,
            })?;

        Ok(token_data.claims.session)
    }

    /// Restore a session, starting a fresh one when the token is absent or unusable
    pub fn resume(&self, token: Option<&str>) -> GameSession {
        match token.map(str::trim).filter(|t| !t.is_empty()) {
            None => GameSession::default(),
            Some(token) => self.restore(token).unwrap_or_else(|e| {
                warn!(reason = %e, "Discarding session token, starting a new session");
                GameSession::default()
            }),
        }
    }
}
