use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for a revision store.
///
/// Loaded from `config.toml` in the store root. Secrets (the email API key)
/// are never stored here; they are read from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Whether to skip markdown files in the store that cannot be parsed as
    /// problems, instead of failing to load.
    pub allow_unrecognised: bool,

    /// Settings for importing accepted submissions.
    pub sync: SyncConfig,

    /// Settings for reminder emails.
    pub email: EmailConfig,

    /// Settings for the motivational quote shown when nothing is due.
    pub quotes: QuoteConfig,
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }
}

/// Where and how to poll for accepted submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// LeetCode username. Sync does nothing while this is empty.
    pub username: String,
    /// How many recent submissions to request.
    pub limit: u32,
    /// Only submissions newer than this many hours are processed.
    pub window_hours: u32,
    /// GraphQL endpoint.
    pub endpoint: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            limit: 15,
            window_hours: 24,
            endpoint: "https://leetcode.com/graphql".to_string(),
        }
    }
}

/// Reminder email settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// Recipient address. The `USER_EMAIL` environment variable takes
    /// precedence.
    pub to: String,
    /// Sender, in `Name <address>` form.
    pub from: String,
    /// Email API endpoint.
    pub endpoint: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            to: String::new(),
            from: "Spaced Revision <onboarding@resend.dev>".to_string(),
            endpoint: "https://api.resend.com/emails".to_string(),
        }
    }
}

impl EmailConfig {
    /// The effective recipient, preferring `USER_EMAIL` from the environment.
    #[must_use]
    pub fn recipient(&self) -> Option<String> {
        std::env::var("USER_EMAIL")
            .ok()
            .filter(|to| !to.trim().is_empty())
            .or_else(|| (!self.to.trim().is_empty()).then(|| self.to.clone()))
    }
}

/// Quote API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    /// Endpoint returning `[{"q": quote, "a": author}]`.
    pub endpoint: String,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://zenquotes.io/api/random".to_string(),
        }
    }
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        allow_unrecognised: bool,

        #[serde(default)]
        sync: SyncConfig,

        #[serde(default)]
        email: EmailConfig,

        #[serde(default)]
        quotes: QuoteConfig,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                allow_unrecognised,
                sync,
                email,
                quotes,
            } => Self {
                allow_unrecognised,
                sync,
                email,
                quotes,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            allow_unrecognised: config.allow_unrecognised,
            sync: config.sync,
            email: config.email,
            quotes: config.quotes,
        }
    }
}
