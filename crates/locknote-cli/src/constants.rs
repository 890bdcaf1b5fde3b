//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Note id not found.
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Wrong password.
    pub const AUTH_FAILED: i32 = 5;

    /// Note is in the trash.
    pub const TRASHED: i32 = 6;

    /// Ciphertext could not be decrypted.
    pub const DECRYPTION_FAILED: i32 = 7;

    /// Missing or malformed master key.
    pub const CONFIGURATION: i32 = 8;

    /// Notes document could not be read or written, or another instance is running.
    pub const STORAGE: i32 = 9;
}

/// Environment variable for a non-interactive note password.
pub const PASSWORD_ENV: &str = "LOCKNOTE_PASSWORD";

/// Environment variable for the tracing filter.
pub const LOG_ENV: &str = "LOCKNOTE_LOG";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "LOCKNOTE_CONFIG";
