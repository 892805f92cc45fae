/// Centralized command-line argument handling
///
/// Arguments are captured once into `CMD_ARGS` and read from anywhere in the
/// process. Tests and tools can override them with `set_cmd_args`.
///
/// Recognized flags:
/// - `--config <path>`  configuration file (default `data/config.toml`)
/// - `--env <path>`     dotenv file to load before reading the environment
/// - `--debug-<tag>`    per-subsystem debug logging (see `logger`)
/// - `--verbose`, `--quiet`
/// - `--help`
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Global command-line arguments storage
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Sets the global command-line arguments
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Gets a copy of the current command-line arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        // Poisoned mutex: fall back to the real process arguments
        Err(_) => env::args().collect(),
    }
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    get_cmd_args().iter().any(|a| a == arg)
}

/// Gets the value following a flag, e.g. `--config custom.toml`
pub fn get_arg_value(flag: &str) -> Option<String> {
    arg_value_in(&get_cmd_args(), flag)
}

fn arg_value_in(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .filter(|value| !value.starts_with("--"))
        .cloned()
}

// =============================================================================
// DEBUG FLAG CHECKING FUNCTIONS
// =============================================================================

pub fn is_debug_monitor_enabled() -> bool {
    has_arg("--debug-monitor")
}

pub fn is_debug_websocket_enabled() -> bool {
    has_arg("--debug-websocket")
}

pub fn is_debug_rpc_enabled() -> bool {
    has_arg("--debug-rpc")
}

pub fn is_help_requested() -> bool {
    has_arg("--help") || has_arg("-h")
}

/// Config file path from `--config`, if given
pub fn config_path_arg() -> Option<String> {
    get_arg_value("--config")
}

/// Dotenv file path from `--env`, if given
pub fn env_path_arg() -> Option<String> {
    get_arg_value("--env")
}

pub fn print_help() {
    println!("launchwatch - real-time launchpad token monitor");
    println!();
    println!("USAGE:");
    println!("    launchwatch [--config <path>] [--env <path>] [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    --config <path>      Configuration file (default: data/config.toml)");
    println!("    --env <path>         Dotenv file loaded before reading RPC_URL etc.");
    println!("    --debug-<tag>        Debug output for monitor|websocket|rpc|metadata|launchpad|analytics|config");
    println!("    --verbose            Verbose output for every subsystem");
    println!("    --quiet              Only warnings and errors");
    println!("    -h, --help           Print this help");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_arg_value_follows_flag() {
        let list = args(&["launchwatch", "--config", "custom.toml", "--verbose"]);
        assert_eq!(arg_value_in(&list, "--config"), Some("custom.toml".to_string()));
    }

    #[test]
    fn test_arg_value_missing_or_flag() {
        let list = args(&["launchwatch", "--config", "--verbose"]);
        assert_eq!(arg_value_in(&list, "--config"), None);
        assert_eq!(arg_value_in(&list, "--env"), None);
    }
}
