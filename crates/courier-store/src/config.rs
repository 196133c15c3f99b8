//! Configuration for the record store

use crate::{FileSlot, MemorySlot, RecordStore, StoreError};
use courier_domain::DurableSlot;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default slot key for the record collection
pub const DEFAULT_KEY: &str = "courier_records";

/// Default directory for file slots
pub const DEFAULT_DIR: &str = ".courier";

/// Which slot backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotBackend {
    /// One file per key on disk
    File,
    /// Process memory only; lost at exit
    Memory,
}

impl Default for SlotBackend {
    fn default() -> Self {
        SlotBackend::File
    }
}

/// Configuration for the record store
///
/// ```toml
/// [store]
/// backend = "file"
/// dir = "/var/lib/courier"
/// key = "courier_records"
/// max_bytes = 5242880
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Slot backend
    #[serde(default)]
    pub backend: SlotBackend,

    /// Directory for the file backend
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// Slot key holding the collection
    #[serde(default = "default_key")]
    pub key: String,

    /// Optional size quota for the serialized collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bytes: Option<usize>,
}

fn default_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DIR)
}

fn default_key() -> String {
    DEFAULT_KEY.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: SlotBackend::File,
            dir: default_dir(),
            key: default_key(),
            max_bytes: None,
        }
    }
}

impl StoreConfig {
    /// In-memory configuration (tests, dry runs)
    pub fn in_memory() -> Self {
        Self {
            backend: SlotBackend::Memory,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.max_bytes == Some(0) {
            return Err(StoreError::Config("max_bytes must be greater than 0".to_string()));
        }
        if self.backend == SlotBackend::File {
            FileSlot::new(&self.dir).path_for(&self.key)?;
        } else if self.key.is_empty() {
            return Err(StoreError::InvalidKey(self.key.clone()));
        }
        Ok(())
    }

    /// Build the configured slot
    pub fn build_slot(&self) -> Result<ConfiguredSlot, StoreError> {
        self.validate()?;
        let slot = match self.backend {
            SlotBackend::File => {
                let slot = FileSlot::new(&self.dir);
                ConfiguredSlot::File(match self.max_bytes {
                    Some(limit) => slot.with_quota(limit),
                    None => slot,
                })
            }
            SlotBackend::Memory => ConfiguredSlot::Memory(match self.max_bytes {
                Some(limit) => MemorySlot::with_quota(limit),
                None => MemorySlot::new(),
            }),
        };
        Ok(slot)
    }

    /// Build the slot and open a store on it
    pub fn open(&self) -> Result<RecordStore<ConfiguredSlot>, StoreError> {
        let slot = self.build_slot()?;
        tracing::info!(backend = ?self.backend, key = %self.key, "Opening record store");
        Ok(RecordStore::open(slot, self.key.clone()))
    }
}

/// Slot chosen at runtime from [`StoreConfig`]
#[derive(Debug, Clone)]
pub enum ConfiguredSlot {
    /// File backend
    File(FileSlot),
    /// Memory backend
    Memory(MemorySlot),
}

impl DurableSlot for ConfiguredSlot {
    type Error = StoreError;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        match self {
            ConfiguredSlot::File(slot) => slot.read(key),
            ConfiguredSlot::Memory(slot) => slot.read(key),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        match self {
            ConfiguredSlot::File(slot) => slot.write(key, value),
            ConfiguredSlot::Memory(slot) => slot.write(key, value),
        }
    }
}
