pub mod loader;
pub mod schema;

pub use loader::{
    apply_env_overrides, default_config_path, load_config, load_config_from_str,
    load_config_from_yaml_str, load_default_config,
};
pub use schema::{
    Config, DependencyConfig, ExportConfig, QueryConfig, ScheduleConfig, StoreConfig,
};
