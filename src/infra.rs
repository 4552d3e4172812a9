pub mod compose_adapter;
pub mod config;
pub mod settings;
pub mod workdir;

pub use compose_adapter::ComposeAdapter;
pub use config::ConfigStore;
pub use settings::{Settings, SettingsOverrides};
pub use workdir::Workdir;
