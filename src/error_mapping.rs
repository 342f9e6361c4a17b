//! Maps service errors to weatherdesk_core::AppError for consistent user-facing messages.

use weatherdesk_core::{AppError, FavoritesError, StorageError, WeatherError};
use weatherdesk_services::{DeskError, FavoriteError, StoreError};

/// Both types are foreign to this crate, so this is a function rather than a `From` impl.
pub fn from_desk(e: DeskError) -> AppError {
    match e {
        DeskError::Favorite(FavoriteError::Duplicate(name)) => {
            AppError::Favorites(FavoritesError::Duplicate(name))
        }
        DeskError::Favorite(FavoriteError::Store(e)) | DeskError::Store(e) => {
            AppError::Storage(StorageError::WriteFailed(e.to_string()))
        }
        DeskError::NothingToSave => AppError::Favorites(FavoritesError::NothingToSave),
        DeskError::NoSuchEntry { index, .. } => {
            AppError::Favorites(FavoritesError::NoSuchEntry(index + 1))
        }
    }
}

pub fn from_store_open(e: StoreError) -> AppError {
    AppError::Storage(StorageError::OpenFailed(e.to_string()))
}

pub fn lookup_failed(label: String) -> AppError {
    AppError::Weather(WeatherError::LookupFailed(label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use weatherdesk_services::View;

    #[test]
    fn test_duplicate_keeps_city_name() {
        let err = from_desk(DeskError::Favorite(FavoriteError::Duplicate("Paris".into())));
        assert_eq!(err.user_message(), "City 'Paris' is already saved.");
    }

    #[test]
    fn test_entry_numbers_are_one_based() {
        let err = from_desk(DeskError::NoSuchEntry {
            view: View::History,
            index: 2,
        });
        assert_eq!(err.user_message(), "There is no entry number 3.");
    }

    #[test]
    fn test_store_failure_is_storage_error() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = from_desk(DeskError::Store(StoreError::Io(io)));
        assert!(matches!(err, AppError::Storage(StorageError::WriteFailed(ref s)) if s.contains("disk full")));
    }

    #[test]
    fn test_lookup_failure_message() {
        assert_eq!(lookup_failed("Atlantis".into()).user_message(), "City 'Atlantis' not found");
    }
}
