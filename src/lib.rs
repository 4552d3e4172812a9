pub mod cli;
pub mod domain;
pub mod error;
pub mod infra;
pub mod services;

// Recording runtime used by unit and integration tests
pub mod test_support;

pub use domain::{
    ComposeAction, ComposeInvocation, ComposeRuntime, Service, resolve_dependency_closure,
    topological_sort, validate_set,
};
pub use error::{ComposerError, Result};
pub use infra::{ComposeAdapter, ConfigStore, Workdir};
pub use services::Orchestrator;
