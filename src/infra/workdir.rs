use crate::domain::Service;
use crate::error::{ComposerError, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const BASE_COMPOSE_FILE: &str = "compose.yml";
pub const SERVICES_DIR: &str = "services";
pub const DEBUG_DIR: &str = "debug";

/// On-disk layout of compose files:
///
/// ```text
/// <root>/compose.yml
/// <root>/services/compose.<compose_name>.yml
/// <root>/debug/compose.debug.<compose_name>.yml
/// ```
#[derive(Debug, Clone)]
pub struct Workdir {
    root: PathBuf,
}

impl Workdir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn base_compose_path(&self) -> PathBuf {
        self.root.join(BASE_COMPOSE_FILE)
    }

    pub fn services_dir(&self) -> PathBuf {
        self.root.join(SERVICES_DIR)
    }

    pub fn debug_dir(&self) -> PathBuf {
        self.root.join(DEBUG_DIR)
    }

    pub fn service_overlay_path(&self, service: &Service) -> PathBuf {
        self.services_dir().join(service.overlay_file_name())
    }

    pub fn debug_overlay_path(&self, service: &Service) -> PathBuf {
        self.debug_dir().join(service.debug_overlay_file_name())
    }

    /// Creates the directories and the base compose file. Existing entries
    /// are left untouched.
    pub fn ensure_layout(&self) -> Result<()> {
        for dir in [self.root.clone(), self.services_dir(), self.debug_dir()] {
            fs::create_dir_all(&dir).map_err(|e| ComposerError::persistence(&dir, e))?;
        }
        touch(&self.base_compose_path())?;
        debug!("Workdir layout ready at {:?}", self.root);
        Ok(())
    }

    /// Creates empty overlay and debug overlay files for a new service.
    pub fn add_compose_files_for_service(&self, service: &Service) -> Result<()> {
        self.ensure_layout()?;
        touch(&self.service_overlay_path(service))?;
        touch(&self.debug_overlay_path(service))?;
        info!(
            "Overlay files for '{}' ready in {:?}",
            service.short_name, self.root
        );
        Ok(())
    }

    /// Base file followed by each service overlay, in the given order.
    /// Debug overlays are appended after their service only when `debug` is
    /// set and the file exists.
    pub fn compose_files(&self, services: &[Service], debug: bool) -> Vec<PathBuf> {
        let mut files = Vec::with_capacity(services.len() * 2 + 1);
        files.push(self.base_compose_path());

        for service in services {
            files.push(self.service_overlay_path(service));

            if debug {
                let debug_path = self.debug_overlay_path(service);
                if debug_path.exists() {
                    files.push(debug_path);
                } else {
                    debug!("No debug overlay for '{}'", service.short_name);
                }
            }
        }

        files
    }
}

fn touch(path: &Path) -> Result<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| ())
        .map_err(|e| ComposerError::persistence(path, e))
}
