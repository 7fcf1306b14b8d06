// ── Core error types ──
//
// The interaction logic itself never fails: unavailable picks, missing
// play-state data and a disconnected link are silent no-ops. Errors only
// come from validating configuration before anything is spawned.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Key '{key}' is bound to both {first} and {second}")]
    DuplicateBinding {
        key: char,
        first: String,
        second: String,
    },
}
