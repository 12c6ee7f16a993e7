use std::{fmt, time::Duration};

use reqwest::blocking::Client;
use serde::Deserialize;

const TIMEOUT: Duration = Duration::from_secs(10);

/// A motivational quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    /// The quote itself.
    pub text: String,
    /// Who said it.
    pub author: String,
}

impl Quote {
    /// The quote used when none can be fetched.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            text: "The secret of getting ahead is getting started.".to_string(),
            author: "Mark Twain".to_string(),
        }
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" - {}", self.text, self.author)
    }
}

/// Somewhere quotes can be fetched from.
pub trait QuoteSource {
    /// Fetch a quote.
    ///
    /// # Errors
    ///
    /// Returns an error if no quote could be fetched.
    fn quote(&self) -> Result<Quote, QuoteError>;

    /// Fetch a quote, falling back to [`Quote::fallback`] on failure.
    fn quote_or_fallback(&self) -> Quote {
        self.quote().unwrap_or_else(|e| {
            tracing::warn!("Failed to fetch quote: {e}");
            Quote::fallback()
        })
    }
}

/// Errors raised while fetching a quote.
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    /// The request failed or the response could not be decoded.
    #[error("request failed")]
    Request(#[from] reqwest::Error),

    /// The response held no usable quote.
    #[error("no quote in response")]
    Empty,
}

/// Fetches random quotes from the ZenQuotes API.
#[derive(Debug, Clone)]
pub struct ZenQuotes {
    client: Client,
    endpoint: String,
}

impl ZenQuotes {
    /// Create a client for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, QuoteError> {
        let client = Client::builder()
            .timeout(TIMEOUT)
            .build()
            .map_err(QuoteError::Client)?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ZenQuote {
    q: String,
    a: String,
}

fn first_quote(quotes: Vec<ZenQuote>) -> Result<Quote, QuoteError> {
    quotes
        .into_iter()
        .find(|quote| !quote.q.trim().is_empty())
        .map(|quote| Quote {
            text: quote.q.trim().to_string(),
            author: quote.a.trim().to_string(),
        })
        .ok_or(QuoteError::Empty)
}

impl QuoteSource for ZenQuotes {
    fn quote(&self) -> Result<Quote, QuoteError> {
        let quotes: Vec<ZenQuote> = self
            .client
            .get(&self.endpoint)
            .send()?
            .error_for_status()?
            .json()?;
        first_quote(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unavailable;

    impl QuoteSource for Unavailable {
        fn quote(&self) -> Result<Quote, QuoteError> {
            Err(QuoteError::Empty)
        }
    }

    #[test]
    fn decodes_zenquotes_response() {
        let body = r#"[{"q": "Well begun is half done. ", "a": "Aristotle", "h": "<blockquote>...</blockquote>"}]"#;
        let quotes: Vec<ZenQuote> = serde_json::from_str(body).unwrap();

        let quote = first_quote(quotes).unwrap();

        assert_eq!(quote.text, "Well begun is half done.");
        assert_eq!(quote.author, "Aristotle");
    }

    #[test]
    fn empty_response_is_an_error() {
        assert!(matches!(first_quote(Vec::new()), Err(QuoteError::Empty)));
    }

    #[test]
    fn falls_back_on_failure() {
        assert_eq!(Unavailable.quote_or_fallback(), Quote::fallback());
    }

    #[test]
    fn display() {
        assert_eq!(
            Quote::fallback().to_string(),
            "\"The secret of getting ahead is getting started.\" - Mark Twain"
        );
    }
}
