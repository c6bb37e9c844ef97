use crate::constants::COLLECTIONS_FILE;
use crate::error::{ConsoleError, Result};
use crate::models::{RequestDefinition, StatusFilter};
use serde_yaml::Mapping;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Keeps request definitions in a single YAML file keyed by id
pub struct CollectionStore {
    definitions: BTreeMap<String, RequestDefinition>,
    path: PathBuf,
    /// False when an unreadable file could not be backed up
    writable: bool,
}

impl CollectionStore {
    /// Open the store under `dir`. A missing file yields an empty store.
    ///
    /// Records that fail to deserialize are skipped. When anything was
    /// skipped the file is first copied aside, so a later write cannot lose it.
    pub fn open(dir: &Path) -> Self {
        let path = dir.join(COLLECTIONS_FILE);
        let mut store = CollectionStore {
            definitions: BTreeMap::new(),
            path,
            writable: true,
        };

        match store.load() {
            Ok(0) => {}
            Ok(skipped) => {
                tracing::warn!(path = %store.path.display(), skipped, "Some request definitions could not be read");
                store.back_up();
            }
            Err(e) => {
                tracing::warn!(path = %store.path.display(), error = %e, "Could not load collections");
                store.back_up();
            }
        }
        store
    }

    /// Open the store in the default config directory
    pub fn open_default() -> Self {
        Self::open(&crate::config::config_dir())
    }

    /// Load every readable record, returning how many were skipped
    fn load(&mut self) -> Result<usize> {
        if !self.path.exists() {
            return Ok(0);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(0);
        }

        let records: Mapping = serde_yaml::from_str(&content)?;
        let mut skipped = 0;
        for (key, value) in records {
            // The map key is authoritative
            let Some(id) = key.as_str().map(str::to_string) else {
                tracing::warn!(key = ?key, "Skipping record with a non-text id");
                skipped += 1;
                continue;
            };
            match serde_yaml::from_value::<RequestDefinition>(value) {
                Ok(mut definition) => {
                    definition.id = id.clone();
                    self.definitions.insert(id, definition);
                }
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "Skipping unreadable request definition");
                    skipped += 1;
                }
            }
        }
        tracing::debug!(count = self.definitions.len(), skipped, "Loaded collections");
        Ok(skipped)
    }

    /// Copy the current file next to itself. Without a copy the store stays read-only.
    fn back_up(&mut self) {
        let backup = self.path.with_file_name(format!(
            "{}.{}.bak",
            COLLECTIONS_FILE,
            chrono::Utc::now().timestamp_millis()
        ));
        match fs::copy(&self.path, &backup) {
            Ok(_) => tracing::warn!(backup = %backup.display(), "Saved a copy of the collections file"),
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "Could not back up collections file");
                self.writable = false;
            }
        }
    }

    fn persist(&self) -> Result<()> {
        if !self.writable {
            return Err(ConsoleError::ReadOnly(self.path.display().to_string()));
        }
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_yaml::to_string(&self.definitions)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn list(&self) -> Vec<RequestDefinition> {
        self.list_filtered(StatusFilter::All)
    }

    pub fn list_filtered(&self, filter: StatusFilter) -> Vec<RequestDefinition> {
        self.definitions
            .values()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&RequestDefinition> {
        self.definitions.get(id)
    }

    /// Store a new definition. A blank id is replaced with `api-<unix millis>`.
    pub fn create(&mut self, mut definition: RequestDefinition) -> Result<RequestDefinition> {
        if definition.id.trim().is_empty() {
            definition.id = self.generate_id();
        }
        self.definitions
            .insert(definition.id.clone(), definition.clone());
        self.persist()?;
        tracing::info!(id = %definition.id, "Created request definition");
        Ok(definition)
    }

    /// Replace the definition stored under `id`, keeping that id
    pub fn update(&mut self, id: &str, mut definition: RequestDefinition) -> Result<RequestDefinition> {
        if !self.definitions.contains_key(id) {
            return Err(ConsoleError::NotFound(id.to_string()));
        }
        definition.id = id.to_string();
        self.definitions.insert(id.to_string(), definition.clone());
        self.persist()?;
        tracing::info!(id, "Updated request definition");
        Ok(definition)
    }

    /// Remove a definition. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        if self.definitions.remove(id).is_none() {
            return Ok(false);
        }
        self.persist()?;
        tracing::info!(id, "Deleted request definition");
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    fn generate_id(&self) -> String {
        let base = format!("api-{}", chrono::Utc::now().timestamp_millis());
        if !self.definitions.contains_key(&base) {
            return base;
        }
        (1..)
            .map(|n| format!("{}-{}", base, n))
            .find(|candidate| !self.definitions.contains_key(candidate))
            .unwrap_or(base)
    }
}
