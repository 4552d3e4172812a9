use crate::domain::{ComposeInvocation, ComposeRuntime};
use crate::error::{ComposerError, Result};
use std::io;
use std::sync::RwLock;

/// Records invocations instead of spawning the orchestration tool
#[derive(Debug)]
pub struct MockComposeRuntime {
    invocations: RwLock<Vec<ComposeInvocation>>,
    exit_code: RwLock<i32>,
    fail: RwLock<bool>,
}

impl MockComposeRuntime {
    pub fn new() -> Self {
        Self {
            invocations: RwLock::new(Vec::new()),
            exit_code: RwLock::new(0),
            fail: RwLock::new(false),
        }
    }

    /// Exit code returned by subsequent runs
    pub fn set_exit_code(&self, code: i32) {
        *self.exit_code.write().unwrap() = code;
    }

    /// Makes subsequent runs fail as if the executable were missing
    pub fn set_fail(&self, fail: bool) {
        *self.fail.write().unwrap() = fail;
    }

    pub fn invocations(&self) -> Vec<ComposeInvocation> {
        self.invocations.read().unwrap().clone()
    }
}

impl Default for MockComposeRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ComposeRuntime for MockComposeRuntime {
    fn run(&self, invocation: &ComposeInvocation) -> Result<i32> {
        self.invocations.write().unwrap().push(invocation.clone());

        if *self.fail.read().unwrap() {
            return Err(ComposerError::Invocation {
                program: "mock-compose".into(),
                source: io::Error::new(io::ErrorKind::NotFound, "mock failure"),
            });
        }

        Ok(*self.exit_code.read().unwrap())
    }

    fn is_available(&self) -> bool {
        !*self.fail.read().unwrap()
    }
}
