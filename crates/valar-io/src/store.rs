//! Key-addressed JSON document store
//!
//! Datasets and pipeline outputs are flat JSON files under a root
//! directory, addressed by a logical name (`"characters"`,
//! `"ml-data/chars-to-train"`). The store performs no schema validation;
//! a malformed document surfaces as a parse error carrying the offending
//! path.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use valar_model::Corpus;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum StoreError {
    #[display("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[display("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[display("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[display("failed to serialize {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// A directory of JSON documents addressed by logical name.
#[derive(Debug, Clone)]
pub struct DataStore {
    root: PathBuf,
}

impl DataStore {
    pub fn new<P>(root: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { root: root.into() }
    }

    /// Filesystem path of a named document.
    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }

    /// Loads a named document into any deserializable type.
    pub fn load<T>(&self, name: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let path = self.path_for(name);
        let file = File::open(&path).map_err(|source| StoreError::Read {
            path: path.clone(),
            source,
        })?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|source| StoreError::Parse { path, source })
    }

    /// Loads a named document as a dynamic entity corpus.
    pub fn load_corpus(&self, name: &str) -> Result<Corpus, StoreError> {
        self.load(name)
    }

    /// Writes a named document, creating parent directories as needed.
    pub fn write<T>(&self, name: &str, value: &T) -> Result<(), StoreError>
    where
        T: Serialize + ?Sized,
    {
        let path = self.path_for(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: path.clone(),
                source,
            })?;
        }
        let file = File::create(&path).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })?;
        let writer = BufWriter::new(file);
        serde_json::to_writer(writer, value).map_err(|source| StoreError::Serialize { path, source })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}
