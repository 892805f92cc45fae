/// Configuration system
///
/// - `macros`: the `config_struct!` macro
/// - `schemas`: every configuration section with its defaults
/// - `utils`: loading, environment overrides and validation
pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::*;
pub use utils::{
    apply_env_overrides, apply_overrides_from, load_config, load_config_from_path,
    CONFIG_FILE_PATH,
};
