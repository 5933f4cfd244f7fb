//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::AnalysisService;
use crate::config::Settings;
use crate::infrastructure::source::{DockerCliSource, JsonFileSource};
use crate::infrastructure::traits::{
    CommandRunner, FileSystem, LayerSource, RealCommandRunner, RealFileSystem,
};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Command runner abstraction
    pub cmd: Arc<dyn CommandRunner>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(RealCommandRunner),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs, cmd }
    }

    /// Layer source selected by the settings: a JSON dump if `input` is set,
    /// the engine CLI otherwise.
    pub fn layer_source(&self) -> Arc<dyn LayerSource> {
        match &self.settings.input {
            Some(path) => Arc::new(JsonFileSource::new(Arc::clone(&self.fs), path.clone())),
            None => Arc::new(DockerCliSource::new(
                Arc::clone(&self.cmd),
                self.settings.docker_command.clone(),
            )),
        }
    }

    pub fn analysis_service(&self) -> AnalysisService {
        AnalysisService::new(self.layer_source())
    }
}
