//! Coinbase environment configuration.
//!
//! Supports production and sandbox environments with appropriate URLs.

use std::fmt;
use std::str::FromStr;

/// Coinbase environment (production or sandbox).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Production environment (real money).
    #[default]
    Production,
    /// Sandbox environment (fake money for testing).
    Sandbox,
}

impl Environment {
    /// REST API base URL.
    pub fn api_base_url(&self) -> &'static str {
        match self {
            Self::Production => "https://api.coinbase.com",
            Self::Sandbox => "https://api.sandbox.coinbase.com",
        }
    }

    /// OAuth base URL for token exchange, refresh, and revocation.
    pub fn oauth_base_url(&self) -> &'static str {
        match self {
            Self::Production => "https://api.coinbase.com/oauth",
            Self::Sandbox => "https://api.sandbox.coinbase.com/oauth",
        }
    }

    /// Returns true if this is the production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Returns true if this is the sandbox environment.
    pub fn is_sandbox(&self) -> bool {
        matches!(self, Self::Sandbox)
    }

    /// Load environment from `COINBASE_ENVIRONMENT` env var.
    ///
    /// Returns `Production` if not set or invalid.
    pub fn from_env() -> Self {
        std::env::var("COINBASE_ENVIRONMENT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Sandbox => write!(f, "sandbox"),
        }
    }
}

impl FromStr for Environment {
    type Err = ParseEnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" | "live" | "mainnet" => Ok(Self::Production),
            "sandbox" | "test" => Ok(Self::Sandbox),
            _ => Err(ParseEnvironmentError(s.to_string())),
        }
    }
}

/// Error parsing environment string.
#[derive(Debug, Clone)]
pub struct ParseEnvironmentError(String);

impl fmt::Display for ParseEnvironmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid environment '{}', expected 'production' or 'sandbox'",
            self.0
        )
    }
}

impl std::error::Error for ParseEnvironmentError {}
