pub mod arguments;
pub mod cache;
pub mod config;
pub mod constants;
pub mod errors; // Structured error handling
pub mod logger;
pub mod monitor;
pub mod pools; // LaunchLab pool decoding and bonding-curve progress
pub mod retry;
pub mod rpc;
pub mod shutdown;
pub mod tokens;
pub mod utils;
pub mod websocket;

pub use errors::{MonitorError, MonitorResult};
pub use monitor::{EventOutcome, MonitorStats, TokenMonitor};
pub use tokens::{TokenAnalytics, TokenEvent};
