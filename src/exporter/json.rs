// file: src/exporter/json.rs
// description: json export of lookup results with a small envelope

use crate::error::Result;
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ExportEnvelope<'a, T: Serialize> {
    pub exported_at: String,
    pub operation: &'a str,
    pub item_count: usize,
    pub payload: &'a T,
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes `<operation>-<timestamp>.json` and returns its path.
    pub fn export<T: Serialize>(
        &self,
        operation: &str,
        item_count: usize,
        payload: &T,
        pretty: bool,
    ) -> Result<PathBuf> {
        let now = Utc::now();
        let envelope = ExportEnvelope {
            exported_at: now.to_rfc3339(),
            operation,
            item_count,
            payload,
        };

        let json = if pretty {
            serde_json::to_string_pretty(&envelope)?
        } else {
            serde_json::to_string(&envelope)?
        };

        let file_name = format!("{}-{}.json", operation, now.format("%Y%m%dT%H%M%S%.3fZ"));
        let path = self.output_dir.join(file_name);
        fs::write(&path, json)?;

        info!("Exported {} {} item(s) to {}", item_count, operation, path.display());
        Ok(path)
    }
}
