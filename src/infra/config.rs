use crate::domain::{Service, validate_set};
use crate::error::{ComposerError, Result};
use serde::{Deserialize, Serialize};
use serde_yml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_CONFIG_FILE_NAME: &str = "composer.yml";

const SERVICES_KEY: &str = "services";
const EMPTY_DOCUMENT: &str = "services:\n";

/// On-disk shape of one entry under `services:`
#[derive(Serialize, Deserialize, Debug, Default)]
struct ServiceEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    compose_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    depends_on: Option<Vec<String>>,
}

/// The YAML file holding the declared service set
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Opens an existing store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !Self::exists(&path) {
            return Err(ComposerError::ConfigMissing(path));
        }
        Ok(Self { path })
    }

    /// Opens the store, creating it (and its parent directories) with an
    /// empty services section if it does not exist yet.
    pub fn open_or_create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !Self::exists(&path) {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .map_err(|e| ComposerError::persistence(parent, e))?;
            }
            fs::write(&path, EMPTY_DOCUMENT).map_err(|e| ComposerError::persistence(&path, e))?;
            info!("Created config file {:?}", path);
        }
        Ok(Self { path })
    }

    pub fn exists(path: &Path) -> bool {
        path.is_file()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the declared services in file order, without graph validation.
    pub fn load(&self) -> Result<Vec<Service>> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| ComposerError::persistence(&self.path, e))?;
        let services = parse_services(&content)?;
        debug!("Loaded {} service(s) from {:?}", services.len(), self.path);
        Ok(services)
    }

    /// Loads the services and returns them in dependency order.
    pub fn load_and_validate(&self) -> Result<Vec<Service>> {
        let services = self.load()?;
        validate_set(&services)
    }

    /// Adds a service. Nothing is written unless the combined set validates.
    pub fn add(&self, service: Service) -> Result<()> {
        let mut services = self.load()?;
        validate_set(&services)?;

        let name = service.short_name.clone();
        services.push(service);
        validate_set(&services)?;

        self.persist(&services)?;
        info!("Service '{}' added to {:?}", name, self.path);
        Ok(())
    }

    fn persist(&self, services: &[Service]) -> Result<()> {
        let content = render_services(services).map_err(|e| {
            ComposerError::persistence(&self.path, std::io::Error::other(e))
        })?;
        write_document(&self.path, &content)
    }
}

/// Writes `content` next to `path` first and renames it into place, so a
/// failed write leaves the previous document intact.
fn write_document(path: &Path, content: &str) -> Result<()> {
    let staging = staging_path(path);
    fs::write(&staging, content).map_err(|e| ComposerError::persistence(&staging, e))?;
    fs::rename(&staging, path).map_err(|e| {
        let _ = fs::remove_file(&staging);
        ComposerError::persistence(path, e)
    })
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Parses a config document. Service order follows the document.
pub fn parse_services(content: &str) -> Result<Vec<Service>> {
    if content.trim().is_empty() {
        return Err(ComposerError::ConfigMalformed("file is empty".into()));
    }

    let document: Value = serde_yml::from_str(content)
        .map_err(|e| ComposerError::ConfigMalformed(e.to_string()))?;

    let root = match document {
        Value::Mapping(root) => root,
        Value::Null => return Err(ComposerError::ConfigMalformed("file is empty".into())),
        _ => {
            return Err(ComposerError::ConfigMalformed(
                "top level must be a mapping".into(),
            ));
        }
    };

    let section = root
        .get(SERVICES_KEY)
        .ok_or_else(|| ComposerError::ConfigMalformed("no services section".into()))?;

    let entries = match section {
        Value::Null => return Ok(Vec::new()),
        Value::Mapping(entries) => entries,
        _ => {
            return Err(ComposerError::ConfigMalformed(
                "services section must be a mapping".into(),
            ));
        }
    };

    let mut services = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        let short_name = key
            .as_str()
            .ok_or_else(|| {
                ComposerError::ConfigMalformed(format!("service name {key:?} is not a string"))
            })?
            .to_string();

        let entry: ServiceEntry = match value {
            Value::Null => ServiceEntry::default(),
            other => serde_yml::from_value(other.clone()).map_err(|e| {
                ComposerError::ConfigMalformed(format!("service '{short_name}': {e}"))
            })?,
        };

        let compose_name = entry.compose_name.ok_or_else(|| ComposerError::MissingField {
            service: short_name.clone(),
            field: "compose_name",
        })?;

        services.push(Service::new(
            short_name,
            compose_name,
            entry.depends_on.unwrap_or_default(),
        ));
    }

    Ok(services)
}

/// Renders services as a config document, keeping their order.
pub fn render_services(services: &[Service]) -> std::result::Result<String, serde_yml::Error> {
    let mut entries = Mapping::new();
    for service in services {
        let entry = ServiceEntry {
            compose_name: Some(service.compose_name.clone()),
            depends_on: (!service.depends_on.is_empty()).then(|| service.depends_on.clone()),
        };
        entries.insert(
            Value::String(service.short_name.clone()),
            serde_yml::to_value(entry)?,
        );
    }

    let mut root = Mapping::new();
    root.insert(Value::String(SERVICES_KEY.to_string()), Value::Mapping(entries));
    serde_yml::to_string(&root)
}
