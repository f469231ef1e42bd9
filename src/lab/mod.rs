//! The simulation lab as this crate consumes it. The lab itself (projects,
//! importers, simulator, operation execution) lives elsewhere.

pub mod client;
pub mod models;


use crate::common::errors::AppError;
use async_trait::async_trait;
use models::{Connectivity, Operation, Project, SimulationParams};
use std::path::Path;

pub use client::LabClient;

#[async_trait]
pub trait Lab: Send + Sync {
    async fn new_project(&self, name: &str) -> Result<Project, AppError>;

    async fn import_conn_zip(&self, project_id: i64, path: &Path) -> Result<(), AppError>;

    /// First connectivity in the project with the given region count.
    async fn connectivity_by_regions(
        &self,
        project_id: i64,
        number_of_regions: u32,
    ) -> Result<Connectivity, AppError>;

    async fn fire_simulation(
        &self,
        project_id: i64,
        params: &SimulationParams,
    ) -> Result<Operation, AppError>;

    async fn get_operation_by_id(&self, operation_id: i64) -> Result<Operation, AppError>;
}
