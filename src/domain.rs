pub mod graph;
mod invocation;
mod service;
pub mod traits;

pub use graph::{resolve_dependency_closure, topological_sort, validate_set};
pub use invocation::{ComposeAction, ComposeInvocation};
pub use service::{Service, validate_name};
pub use traits::ComposeRuntime;
