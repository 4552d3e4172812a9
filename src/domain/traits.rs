use super::ComposeInvocation;
use crate::error::Result;
use std::fmt::Debug;

/// Trait for the external orchestration tool
pub trait ComposeRuntime: Send + Sync + Debug {
    /// Runs the invocation to completion and returns the tool's exit code.
    ///
    /// A non-zero code is not an error here; failing to spawn the tool is.
    fn run(&self, invocation: &ComposeInvocation) -> Result<i32>;

    /// Check if the orchestration executable can be started
    fn is_available(&self) -> bool;
}
