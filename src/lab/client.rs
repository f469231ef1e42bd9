use super::Lab;
use super::models::{Connectivity, Operation, Project, SimulationParams};
use crate::common::errors::AppError;
use async_trait::async_trait;
use reqwest::{Client, Response, multipart};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::path::Path;
use std::time::Duration;

/// HTTP client for the lab REST API.
#[derive(Debug, Clone)]
pub struct LabClient {
    base_url: String,
    client: Client,
}

impl LabClient {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, AppError> {
        let response = self.client.get(self.url(endpoint)).send().await?;
        Self::parse(endpoint, response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<T, AppError> {
        let response = self
            .client
            .post(self.url(endpoint))
            .json(body)
            .send()
            .await?;
        Self::parse(endpoint, response).await
    }

    async fn check(endpoint: &str, response: Response) -> Result<Response, AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let error_text = response.text().await.unwrap_or_default();
        Err(AppError::Lab {
            endpoint: endpoint.to_string(),
            message: format!("HTTP {status}: {error_text}"),
        })
    }

    async fn parse<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T, AppError> {
        let response = Self::check(endpoint, response).await?;
        response.json::<T>().await.map_err(|e| AppError::Lab {
            endpoint: endpoint.to_string(),
            message: format!("JSON parse error: {e}"),
        })
    }
}

#[async_trait]
impl Lab for LabClient {
    async fn new_project(&self, name: &str) -> Result<Project, AppError> {
        self.post_json("/projects", &json!({ "name": name })).await
    }

    async fn import_conn_zip(&self, project_id: i64, path: &Path) -> Result<(), AppError> {
        let endpoint = format!("/projects/{project_id}/connectivities");
        let bytes = tokio::fs::read(path).await.map_err(|e| AppError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "connectivity.zip".to_string(), |n| n.to_string_lossy().into_owned());

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/zip")?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.url(&endpoint))
            .multipart(form)
            .send()
            .await?;
        Self::check(&endpoint, response).await?;
        tracing::info!(project_id, path = %path.display(), "Imported connectivity");
        Ok(())
    }

    async fn connectivity_by_regions(
        &self,
        project_id: i64,
        number_of_regions: u32,
    ) -> Result<Connectivity, AppError> {
        let endpoint =
            format!("/projects/{project_id}/connectivities?number_of_regions={number_of_regions}");
        let found: Vec<Connectivity> = self.get_json(&endpoint).await?;
        found
            .into_iter()
            .find(|c| c.number_of_regions == number_of_regions)
            .ok_or_else(|| AppError::Lab {
                endpoint,
                message: format!("no connectivity with {number_of_regions} regions"),
            })
    }

    async fn fire_simulation(
        &self,
        project_id: i64,
        params: &SimulationParams,
    ) -> Result<Operation, AppError> {
        let endpoint = format!("/projects/{project_id}/simulations");
        self.post_json(&endpoint, &json!(params)).await
    }

    async fn get_operation_by_id(&self, operation_id: i64) -> Result<Operation, AppError> {
        self.get_json(&format!("/operations/{operation_id}")).await
    }
}
