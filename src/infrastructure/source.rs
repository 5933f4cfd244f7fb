//! Layer sources: engine JSON dumps and the docker CLI

use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use itertools::Itertools;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::domain::RawLayer;
use crate::infrastructure::traits::{CommandRunner, FileSystem, LayerSource};

/// Reads a JSON array of engine image records (`GET /images/json?all=1`).
///
/// The path `-` reads from stdin.
pub struct JsonFileSource {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    fn read(&self) -> io::Result<String> {
        if self.path.as_os_str() == "-" {
            let mut content = String::new();
            io::stdin().read_to_string(&mut content)?;
            return Ok(content);
        }
        if !self.fs.exists(&self.path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("layer file does not exist: {}", self.path.display()),
            ));
        }
        self.fs.read_to_string(&self.path)
    }
}

impl LayerSource for JsonFileSource {
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    fn fetch(&self) -> io::Result<Vec<RawLayer>> {
        let content = self.read()?;
        parse_layers(&content)
    }

    fn describe(&self) -> String {
        if self.path.as_os_str() == "-" {
            "stdin".to_string()
        } else {
            self.path.display().to_string()
        }
    }
}

/// Parse an engine JSON dump into normalized layer records.
pub fn parse_layers(content: &str) -> io::Result<Vec<RawLayer>> {
    let layers: Vec<RawLayer> = serde_json::from_str(content)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(layers.into_iter().map(RawLayer::normalized).collect())
}

/// Record shape of `docker image inspect`.
#[derive(Debug, Deserialize)]
struct InspectRecord {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Parent", default)]
    parent: String,
    #[serde(rename = "RepoTags", default)]
    repo_tags: Option<Vec<String>>,
    #[serde(rename = "VirtualSize", default)]
    virtual_size: Option<u64>,
    #[serde(rename = "Size", default)]
    size: Option<u64>,
}

impl From<InspectRecord> for RawLayer {
    fn from(record: InspectRecord) -> Self {
        RawLayer {
            id: record.id,
            parent_id: record.parent,
            repo_tags: record.repo_tags.unwrap_or_default(),
            virtual_size: record.virtual_size,
            size: record.size,
        }
        .normalized()
    }
}

/// Queries the local engine through its CLI (`docker`, or a compatible one like `podman`).
pub struct DockerCliSource {
    cmd: Arc<dyn CommandRunner>,
    program: String,
}

impl DockerCliSource {
    pub fn new(cmd: Arc<dyn CommandRunner>, program: impl Into<String>) -> Self {
        Self {
            cmd,
            program: program.into(),
        }
    }

    fn run(&self, args: &[&str]) -> io::Result<String> {
        debug!("running {} {}", self.program, args.iter().take(4).join(" "));
        let output = self.cmd.run(&self.program, args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!(
                    "{} {} failed: {}",
                    self.program,
                    args.iter().take(2).join(" "),
                    stderr.trim()
                ),
            ));
        }
        String::from_utf8(output.stdout).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl LayerSource for DockerCliSource {
    #[instrument(level = "debug", skip(self), fields(program = %self.program))]
    fn fetch(&self) -> io::Result<Vec<RawLayer>> {
        let listing = self.run(&["image", "ls", "--all", "--quiet", "--no-trunc"])?;
        let ids: Vec<&str> = listing
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .unique()
            .collect();
        debug!("engine reports {} images", ids.len());
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut args = vec!["image", "inspect"];
        args.extend(ids);
        let inspected = self.run(&args)?;
        let records: Vec<InspectRecord> = serde_json::from_str(&inspected)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(records.into_iter().map(RawLayer::from).collect())
    }

    fn describe(&self) -> String {
        format!("{} engine", self.program)
    }
}
