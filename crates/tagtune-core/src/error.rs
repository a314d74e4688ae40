//! Error types for tagtune.

use thiserror::Error;

/// Result type alias using tagtune's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for tagtune operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading the catalog from the settings store failed
    #[error("Failed to load tag settings: {0}")]
    Load(String),

    /// Writing the override set to the settings store failed
    #[error("Failed to save tag settings: {0}")]
    Save(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The settings store never reported ready
    #[error("Settings store not ready after {attempts} attempts")]
    NotReady { attempts: u32 },

    /// The plugin owning the settings namespace is not active
    #[error("Plugin {plugin} is {status}: {message}")]
    PluginInactive {
        plugin: String,
        status: String,
        message: String,
    },
}

impl Error {
    /// Message suitable for showing to the operator.
    ///
    /// Operation-boundary and request failures carry the store's own wording,
    /// which is returned without the variant prefix.
    pub fn user_message(&self) -> String {
        match self {
            Error::Load(msg) | Error::Save(msg) | Error::Request(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_load() {
        let err = Error::Load("connection refused".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to load tag settings: connection refused"
        );
    }

    #[test]
    fn test_error_display_save() {
        let err = Error::Save("Request failed with status 500".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to save tag settings: Request failed with status 500"
        );
    }

    #[test]
    fn test_error_display_not_ready() {
        let err = Error::NotReady { attempts: 10 };
        assert_eq!(err.to_string(), "Settings store not ready after 10 attempts");
    }

    #[test]
    fn test_error_display_plugin_inactive() {
        let err = Error::PluginInactive {
            plugin: "skier_aitagging".to_string(),
            status: "error".to_string(),
            message: "Plugin did not activate successfully.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Plugin skier_aitagging is error: Plugin did not activate successfully."
        );
    }

    #[test]
    fn test_user_message_strips_boundary_prefix() {
        let err = Error::Save("store rejected write".to_string());
        assert_eq!(err.user_message(), "store rejected write");

        let err = Error::Request("Request failed with status 503".to_string());
        assert_eq!(err.user_message(), "Request failed with status 503");

        let err = Error::Config("missing base_url".to_string());
        assert_eq!(err.user_message(), "Configuration error: missing base_url");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
