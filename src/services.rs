mod orchestrator;

pub use orchestrator::{Orchestrator, select_services};
