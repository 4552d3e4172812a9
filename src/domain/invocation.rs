use std::ffi::OsString;
use std::path::PathBuf;

/// Verb passed to the orchestration tool, with its flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeAction {
    Up { detach: bool },
    Down { force: bool, volumes: bool },
    Build,
}

impl ComposeAction {
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Up { .. } => "up",
            Self::Down { .. } => "down",
            Self::Build => "build",
        }
    }

    pub fn flags(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        match *self {
            Self::Up { detach } => {
                if detach {
                    flags.push("-d");
                }
            }
            Self::Down { force, volumes } => {
                if force {
                    flags.extend(["-t", "0"]);
                }
                if volumes {
                    flags.push("-v");
                }
            }
            Self::Build => {}
        }
        flags
    }
}

impl std::fmt::Display for ComposeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.verb())
    }
}

/// A fully resolved call: the ordered compose files and the action to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeInvocation {
    pub files: Vec<PathBuf>,
    pub action: ComposeAction,
}

impl ComposeInvocation {
    pub fn new(files: Vec<PathBuf>, action: ComposeAction) -> Self {
        Self { files, action }
    }

    /// `-f <file>...` followed by the verb and its flags
    pub fn args(&self) -> Vec<OsString> {
        let mut args = Vec::with_capacity(self.files.len() * 2 + 3);
        for file in &self.files {
            args.push(OsString::from("-f"));
            args.push(file.as_os_str().to_os_string());
        }
        args.push(self.action.verb().into());
        args.extend(self.action.flags().into_iter().map(OsString::from));
        args
    }
}
