//! Centralized error types for WeatherDesk.
//!
//! Every error carries a `user_message()` suitable for printing to the
//! terminal; the `Display` form keeps the full detail for logs.

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Favorites error: {0}")]
    Favorites(#[from] FavoritesError),
}

impl AppError {
    /// Returns a message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => e.user_message().to_string(),
            AppError::Storage(e) => e.user_message().to_string(),
            AppError::Weather(e) => e.user_message(),
            AppError::Favorites(e) => e.user_message(),
        }
    }
}

/// Configuration errors. The payload lists every failed check.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
        }
    }
}

/// Local persistence errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to open store: {0}")]
    OpenFailed(String),

    #[error("Failed to write store: {0}")]
    WriteFailed(String),
}

impl StorageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StorageError::OpenFailed(_) => "Unable to access saved cities. Try restarting the app.",
            StorageError::WriteFailed(_) => "Could not save your change. Please try again.",
        }
    }
}

/// Weather lookup errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Provider said no, or the request never completed. Not distinguished.
    #[error("Lookup failed for {0}")]
    LookupFailed(String),
}

impl WeatherError {
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::LookupFailed(label) => format!("City '{}' not found", label),
        }
    }
}

/// Favorites list errors.
#[derive(Debug, Error)]
pub enum FavoritesError {
    #[error("Duplicate favorite: {0}")]
    Duplicate(String),

    #[error("No weather result is displayed")]
    NothingToSave,

    #[error("No entry at position {0}")]
    NoSuchEntry(usize),
}

impl FavoritesError {
    pub fn user_message(&self) -> String {
        match self {
            FavoritesError::Duplicate(name) => format!("City '{}' is already saved.", name),
            FavoritesError::NothingToSave => "Search for a city before saving it.".to_string(),
            FavoritesError::NoSuchEntry(n) => format!("There is no entry number {}.", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_conversion() {
        let err = FavoritesError::Duplicate("Paris".into());
        let app_err: AppError = err.into();
        assert!(matches!(app_err, AppError::Favorites(FavoritesError::Duplicate(_))));
    }

    #[test]
    fn test_config_error_conversion_keeps_details() {
        let app_err: AppError = ConfigError::Invalid("provider.timeout_secs: must be > 0".into()).into();
        assert!(app_err.to_string().contains("provider.timeout_secs"));
        assert_eq!(app_err.user_message(), "Invalid configuration. Check your settings.");
    }

    #[test]
    fn test_duplicate_message_names_city() {
        let app_err = AppError::Favorites(FavoritesError::Duplicate("Paris".into()));
        assert_eq!(app_err.user_message(), "City 'Paris' is already saved.");
    }

    #[test]
    fn test_lookup_failed_message_names_label() {
        let app_err = AppError::Weather(WeatherError::LookupFailed("Atlantis".into()));
        assert_eq!(app_err.user_message(), "City 'Atlantis' not found");
    }

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors = vec![
            AppError::Config(ConfigError::Invalid("x".into())),
            AppError::Storage(StorageError::WriteFailed("disk full".into())),
            AppError::Favorites(FavoritesError::NothingToSave),
            AppError::Favorites(FavoritesError::NoSuchEntry(7)),
        ];

        for e in errors {
            assert!(!e.user_message().is_empty(), "empty message for {e}");
        }
    }
}
