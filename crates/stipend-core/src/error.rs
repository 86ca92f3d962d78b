//! Error types for Stipend

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    #[error("Advice unavailable: {0}")]
    AdviceUnavailable(String),

    #[error("Cannot {action} during onboarding step '{from}'")]
    InvalidTransition { from: String, action: String },

    #[error("Onboarding is not complete")]
    OnboardingIncomplete,

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
