//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{DatasetFormat, DatasetService, GraphService, HierarchyService};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding application settings and I/O boundaries.
///
/// Services are cheap to build and created on demand from the settings.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs }
    }

    pub fn dataset_service(&self) -> ApplicationResult<DatasetService> {
        let format = DatasetFormat::from_settings(&self.settings)?;
        Ok(DatasetService::new(Arc::clone(&self.fs), format))
    }

    pub fn hierarchy_service(&self) -> HierarchyService {
        HierarchyService::from_settings(&self.settings)
    }

    pub fn graph_service(&self) -> ApplicationResult<GraphService> {
        GraphService::new(
            self.settings.indicators.clone(),
            self.settings.missing_values.clone(),
        )
    }
}
