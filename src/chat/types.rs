//! Chat types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Conversation Types
// ============================================================================

/// Who a conversation turn is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the conversation log. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationTurn {
    pub role: Role,

    pub content: String,

    /// When the turn was appended
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

// ============================================================================
// Generation Types
// ============================================================================

/// Models accepted by the hosted generation endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationModel {
    Command,
    CommandLight,
    CommandNightly,
    CommandLightNightly,
}

impl GenerationModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::CommandLight => "command-light",
            Self::CommandNightly => "command-nightly",
            Self::CommandLightNightly => "command-light-nightly",
        }
    }
}

impl std::str::FromStr for GenerationModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "command" => Ok(Self::Command),
            "command-light" => Ok(Self::CommandLight),
            "command-nightly" => Ok(Self::CommandNightly),
            "command-light-nightly" => Ok(Self::CommandLightNightly),
            other => Err(format!("Unknown generation model: {}", other)),
        }
    }
}

impl std::fmt::Display for GenerationModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generation error types
///
/// These never reach an HTTP response directly: the generator converts
/// every variant into a fallback chat message embedding the detail.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Malformed API response: {0}")]
    MalformedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_round_trips_through_str() {
        for model in [
            GenerationModel::Command,
            GenerationModel::CommandLight,
            GenerationModel::CommandNightly,
            GenerationModel::CommandLightNightly,
        ] {
            assert_eq!(model.as_str().parse::<GenerationModel>(), Ok(model));
        }
        assert!("gpt-4".parse::<GenerationModel>().is_err());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }
}
