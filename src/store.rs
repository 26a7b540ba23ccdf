use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::error::Result;
use crate::parser::Record;

const SITES_FILE: &str = "data.json";
const MATRIX_FILE: &str = "port-matrices.json";

/// Process-wide state: the site list and the brand -> matrix-rows mapping,
/// each mirrored to its own pretty-printed JSON file.
///
/// Sites are held as raw JSON values rather than typed records so that
/// hand-edited data files with odd entries still load; search skips
/// anything that is not an object. Matrices are a JSON object keyed by
/// brand, in insertion order, each value an array of records.
///
/// Every mutation rewrites the whole backing file before returning. The
/// in-memory collection is swapped first and is not rolled back if the
/// write fails; the caller surfaces the failure and the next successful
/// upload restores consistency.
pub struct Store {
    sites: Vec<Value>,
    matrices: Map<String, Value>,
    sites_path: PathBuf,
    matrix_path: PathBuf,
}

impl Store {
    /// Load both collections from `data_dir`. A missing file leaves its
    /// collection empty; a present but unparsable file is an error.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Store> {
        let dir = data_dir.as_ref();
        let sites_path = dir.join(SITES_FILE);
        let matrix_path = dir.join(MATRIX_FILE);

        let sites: Vec<Value> = if sites_path.exists() {
            serde_json::from_str(&fs::read_to_string(&sites_path)?)?
        } else {
            Vec::new()
        };
        let matrices: Map<String, Value> = if matrix_path.exists() {
            serde_json::from_str(&fs::read_to_string(&matrix_path)?)?
        } else {
            Map::new()
        };

        info!("Loaded {} sites", sites.len());
        info!("Loaded port matrices for {} brands", matrices.len());

        Ok(Store {
            sites,
            matrices,
            sites_path,
            matrix_path,
        })
    }

    pub fn sites(&self) -> &[Value] {
        &self.sites
    }

    pub fn matrices(&self) -> &Map<String, Value> {
        &self.matrices
    }

    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    pub fn matrix_count(&self) -> usize {
        self.matrices.len()
    }

    /// Replace the whole site collection and persist it. Returns the new
    /// site count.
    pub fn replace_sites(&mut self, records: Vec<Record>) -> Result<usize> {
        self.sites = records.into_iter().map(Value::Object).collect();
        write_json(&self.sites_path, &self.sites)?;
        Ok(self.sites.len())
    }

    /// Set (or overwrite) one brand's matrix rows and persist the entire
    /// mapping. Other brands are untouched. Returns the row count for the
    /// uploaded brand.
    pub fn set_matrix(&mut self, brand: &str, records: Vec<Record>) -> Result<usize> {
        let rows = records.len();
        let rows_value = Value::Array(records.into_iter().map(Value::Object).collect());
        self.matrices.insert(brand.trim().to_string(), rows_value);
        write_json(&self.matrix_path, &self.matrices)?;
        Ok(rows)
    }
}

/// Whole-file rewrite, made atomic by writing to a temp file in the same
/// directory and renaming over the target. A crash mid-write leaves the
/// previous file intact rather than a truncated one.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let tmp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(tmp.as_file(), value)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
