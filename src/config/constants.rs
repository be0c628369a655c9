// Project-wide constants
//
// Centralised here so defaults have one source of truth. Import via
// `use crate::config::constants::*;`.

/// Personas generated per cycle (the `k` of the interview panel).
pub const DEFAULT_PERSONA_COUNT: usize = 5;

/// Upper bound on generate → interview → evaluate cycles per run.
pub const DEFAULT_MAX_ITERATIONS: u32 = 5;

/// Default maximum tokens for generation requests.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// In-flight requests allowed per interview batch.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 8;

/// Directory under $HOME holding `config.toml`.
pub const CONFIG_DIR_NAME: &str = ".elicit";

pub const CONFIG_FILE_NAME: &str = "config.toml";
