use crate::domain::{
    ComposeAction, ComposeInvocation, ComposeRuntime, Service, resolve_dependency_closure,
};
use crate::error::{ComposerError, Result};
use crate::infra::{ConfigStore, Workdir};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Ties the service store, the compose file layout and the orchestration tool
/// together for the user-facing actions.
pub struct Orchestrator {
    store: ConfigStore,
    workdir: Workdir,
    runtime: Arc<dyn ComposeRuntime>,
}

impl Orchestrator {
    pub fn new(store: ConfigStore, workdir: Workdir, runtime: Arc<dyn ComposeRuntime>) -> Self {
        Self {
            store,
            workdir,
            runtime,
        }
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn workdir(&self) -> &Workdir {
        &self.workdir
    }

    /// Persists a new service, then creates its overlay files.
    ///
    /// The service stays registered when the overlays cannot be created.
    pub fn add_service(&self, service: Service) -> Result<()> {
        self.store.add(service.clone())?;
        self.workdir
            .add_compose_files_for_service(&service)
            .inspect_err(|e| {
                warn!(
                    "Service '{}' was saved to {:?} but its overlay files are missing: {}",
                    service.short_name,
                    self.store.path(),
                    e
                );
            })
    }

    /// Starts the requested services and their dependencies.
    pub fn up(&self, names: &[String], debug: bool, detach: bool) -> Result<i32> {
        self.run_selected(names, ComposeAction::Up { detach }, debug)
    }

    pub fn up_all(&self, debug: bool, detach: bool) -> Result<i32> {
        self.run_all(ComposeAction::Up { detach }, debug)
    }

    /// Stops the requested services and their dependencies.
    pub fn down(&self, names: &[String], force: bool, volumes: bool) -> Result<i32> {
        self.run_selected(names, ComposeAction::Down { force, volumes }, false)
    }

    pub fn down_all(&self, force: bool, volumes: bool) -> Result<i32> {
        self.run_all(ComposeAction::Down { force, volumes }, false)
    }

    /// Builds the requested services and their dependencies.
    pub fn build(&self, names: &[String]) -> Result<i32> {
        self.run_selected(names, ComposeAction::Build, false)
    }

    pub fn build_all(&self) -> Result<i32> {
        self.run_all(ComposeAction::Build, false)
    }

    fn run_selected(&self, names: &[String], action: ComposeAction, debug: bool) -> Result<i32> {
        let services = self.store.load_and_validate()?;
        let selected = select_services(names, &services)?;
        self.invoke(&selected, action, debug)
    }

    fn run_all(&self, action: ComposeAction, debug: bool) -> Result<i32> {
        let services = self.store.load_and_validate()?;
        if services.is_empty() {
            warn!("No services configured in {:?}", self.store.path());
        }
        let names: Vec<String> = services.iter().map(|s| s.short_name.clone()).collect();
        let selected = select_services(&names, &services)?;
        self.invoke(&selected, action, debug)
    }

    fn invoke(&self, services: &[Service], action: ComposeAction, debug: bool) -> Result<i32> {
        info!(
            "{} {} service(s): {}",
            action,
            services.len(),
            services
                .iter()
                .map(|s| s.short_name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let files = self.workdir.compose_files(services, debug);
        let invocation = ComposeInvocation::new(files, action);
        let code = self.runtime.run(&invocation)?;
        debug!("{} finished with status {}", action, code);
        Ok(code)
    }
}

/// Resolves user-supplied names into the services to pass to the tool.
///
/// Unknown names are reported together before anything is resolved.
/// Repeated names keep their first position.
pub fn select_services(requested: &[String], all_services: &[Service]) -> Result<Vec<Service>> {
    let known: HashSet<&str> = all_services.iter().map(|s| s.short_name.as_str()).collect();

    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(requested.len());
    let mut missing = Vec::new();

    for name in requested {
        if !seen.insert(name.as_str()) {
            continue;
        }
        if known.contains(name.as_str()) {
            unique.push(name.clone());
        } else {
            missing.push(name.clone());
        }
    }

    if !missing.is_empty() {
        return Err(ComposerError::ServiceNotFound(missing));
    }

    resolve_dependency_closure(&unique, all_services)
}
