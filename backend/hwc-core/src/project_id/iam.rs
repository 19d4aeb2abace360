//! Identity service project listing.

use crate::IAM_PROJECTS_PATH;
use crate::classify::ErrorClassifier;
use crate::config::Credentials;
use crate::error::CloudError;
use crate::signing::Signer;

use std::time::Duration;

use log::{debug, info};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IamProject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub domain_id: String,
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
struct ProjectList {
    #[serde(default)]
    projects: Vec<IamProject>,
}

/// Signed client for `GET /v3/projects`.
#[derive(Debug, Clone)]
pub struct IamClient {
    http: Client,
    base_url: Url,
    signer: Signer,
}

impl IamClient {
    /// # Errors
    ///
    /// Returns a `Validation` [`CloudError`] for an unparseable URL and a
    /// `Network` one if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, CloudError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            CloudError::validation(format!("invalid IAM endpoint '{base_url}': {e}"))
        })?;

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CloudError::from_reqwest(&e))?;

        Ok(Self {
            http,
            base_url,
            signer: Signer::default(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn list_projects(
        &self,
        credentials: &Credentials,
    ) -> Result<Vec<IamProject>, CloudError> {
        let url = self.base_url.join(IAM_PROJECTS_PATH).map_err(|e| {
            CloudError::validation(format!("cannot build projects URL from {}: {e}", self.base_url))
        })?;

        let mut request = self
            .http
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .build()
            .map_err(|e| CloudError::from_reqwest(&e))?;

        self.signer.sign(&mut request, credentials)?;

        debug!("Listing IAM projects at {}", request.url());
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| CloudError::from_reqwest(&e))?;

        let status = response.status();
        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(
                ErrorClassifier::classify_response(status.as_u16(), &body)
                    .with_request_id(request_id),
            );
        }

        let list: ProjectList = response.json().await.map_err(|e| {
            CloudError::server(format!("malformed project list: {e}")).with_request_id(request_id)
        })?;

        Ok(list.projects)
    }

    /// Id of the first enabled project named after the credentials' region.
    /// Projects listed without an id are skipped.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` [`CloudError`] when no such project exists, or the
    /// classified error of the listing call.
    pub async fn project_id_for_region(
        &self,
        credentials: &Credentials,
    ) -> Result<String, CloudError> {
        let projects = self.list_projects(credentials).await?;

        let project = projects
            .into_iter()
            .find(|p| p.enabled && !p.id.is_empty() && p.name == credentials.region)
            .ok_or_else(|| {
                CloudError::not_found(format!("project for region {}", credentials.region))
            })?;

        info!("Resolved project {} for region {}", project.id, credentials.region);
        Ok(project.id)
    }
}
