use std::path::PathBuf;

/// Errors raised while loading translations or parsing language codes.
///
/// Resolving a key never produces one of these: a missing translation
/// renders as its key path instead.
#[derive(Debug, thiserror::Error)]
pub enum I18nError {
    #[error("unknown language code '{0}'")]
    UnknownLanguage(String),

    #[error("messages folder not found: {}", .0.display())]
    MissingFolder(PathBuf),

    #[error("failed to read translations: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid translation file {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("translation data for '{0}' must be a JSON object")]
    InvalidRoot(String),
}
