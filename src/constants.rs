/// Global constants used across launchwatch
///
/// Program ids and mints here are defaults; the configurable ones are
/// overridable through `config::Config`.

// ============================================================================
// SOLANA BLOCKCHAIN CONSTANTS
// ============================================================================

/// Wrapped SOL mint, the quote side of launchpad pools
pub const SOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// Lamports per SOL (10^9)
pub const LAMPORTS_PER_SOL: u64 = solana_sdk::native_token::LAMPORTS_PER_SOL;

/// Metaplex Token Metadata program
pub const METADATA_PROGRAM_ID: &str = "metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s";

// ============================================================================
// LAUNCHPAD CONSTANTS
// ============================================================================

/// Raydium LaunchLab program (owns launchpad pools)
pub const RAYDIUM_LAUNCHPAD_PROGRAM_ID: &str = "LanMV9sAd7wArD4vJFi2qDdfnVhFxYSUg6eADduJ3uj";

/// LetsBonk platform program whose logs are watched
pub const LETSBONK_PROGRAM_ID: &str = "WLHv2UAZm6z4KyaaELi5pjdbJh6RESMva1Rnn8pJVVh";

/// Vanity suffix carried by LetsBonk mints
pub const LETSBONK_MINT_SUFFIX: &str = "bonk";

/// Seed prefix of LaunchLab pool PDAs
pub const LAUNCHLAB_POOL_SEED: &[u8] = b"pool";

/// Seed prefix of Metaplex metadata PDAs
pub const METADATA_SEED: &[u8] = b"metadata";

// ============================================================================
// PIPELINE DEFAULTS
// ============================================================================

/// Only transactions younger than this are treated as new launches (seconds)
pub const NEW_TOKEN_WINDOW_SECS: i64 = 5 * 60;

/// Signatures pulled when logging a new mint's first transactions
pub const EARLY_TRANSACTION_LIMIT: usize = 10;

pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 5_000;

/// Off-chain metadata fetch timeout (seconds)
pub const METADATA_URI_TIMEOUT_SECS: u64 = 10;

/// Browser-like user agent; several metadata hosts reject bare clients
pub const METADATA_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Log lines emitted by launchpad create instructions
pub const DEFAULT_CREATION_LOG_PATTERNS: &[&str] = &[
    "Instruction: Initialize",
    "Instruction: InitializeV2",
    "Instruction: InitializeWithToken2022",
];

/// Fallback name/symbol when metadata cannot be resolved
pub const UNKNOWN_TOKEN_LABEL: &str = "Unknown";
