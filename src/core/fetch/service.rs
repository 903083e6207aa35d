//! Course/grade service clients
//!
//! [`GradeService`] is the seam between the analytics pipeline and wherever
//! gradebooks come from. [`HttpGradeService`] talks to the LMS REST API;
//! [`FileGradeService`] reads a saved gradebook payload from disk.

use crate::core::error::{GradebookError, Result};
use crate::core::models::{activity_columns, Activity, StudentGradebook};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Source of course activities and gradebooks
#[async_trait]
pub trait GradeService {
    /// List the gradable activities of a course
    ///
    /// # Errors
    /// Returns an error if the service cannot be reached or rejects the request
    async fn course_activities(&self, course_id: &str) -> Result<Vec<Activity>>;

    /// Fetch every enrolled student's grades for a course
    ///
    /// # Errors
    /// Returns an error if the service cannot be reached or rejects the request
    async fn course_gradebook(&self, course_id: &str) -> Result<Vec<StudentGradebook>>;
}

/// Authenticated client for the LMS course endpoints
#[derive(Debug, Clone)]
pub struct HttpGradeService {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl HttpGradeService {
    /// Create a client for `endpoint` (e.g. `http://localhost:8080`) using a bearer token.
    ///
    /// # Errors
    /// Returns an error if no endpoint is given or the HTTP client cannot be
    /// constructed
    pub fn new(endpoint: &str, token: &str, timeout: Duration) -> Result<Self> {
        if endpoint.trim().is_empty() {
            return Err(GradebookError::Config(
                "no service endpoint configured (set `endpoint` or pass --input FILE)".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| GradebookError::Http {
                url: endpoint.to_string(),
                source,
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// URL of a course sub-resource
    #[must_use]
    pub fn course_url(&self, course_id: &str, resource: &str) -> String {
        format!("{}/api/courses/{course_id}/{resource}", self.endpoint)
    }

    async fn get_json<T: DeserializeOwned>(&self, course_id: &str, resource: &'static str) -> Result<T> {
        let url = self.course_url(course_id, resource);
        crate::debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|source| GradebookError::Http {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GradebookError::Status {
                resource,
                status: status.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| GradebookError::Http { url, source })?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl GradeService for HttpGradeService {
    async fn course_activities(&self, course_id: &str) -> Result<Vec<Activity>> {
        self.get_json(course_id, "activities").await
    }

    async fn course_gradebook(&self, course_id: &str) -> Result<Vec<StudentGradebook>> {
        self.get_json(course_id, "gradebook").await
    }
}

/// Gradebook loaded from a JSON file holding the gradebook endpoint's payload
///
/// The file is the same for every course id. Activities are derived from the
/// first student's grade records.
#[derive(Debug, Clone)]
pub struct FileGradeService {
    path: PathBuf,
}

impl FileGradeService {
    /// Serve the gradebook stored at `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path being served
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<StudentGradebook>> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| GradebookError::io(&self.path, e))?;
        parse_gradebook_json(&content)
    }
}

#[async_trait]
impl GradeService for FileGradeService {
    async fn course_activities(&self, _course_id: &str) -> Result<Vec<Activity>> {
        let students = self.load()?;
        Ok(activity_columns(&students)
            .into_iter()
            .map(|c| Activity::new(c.activity_id, c.title, ""))
            .collect())
    }

    async fn course_gradebook(&self, _course_id: &str) -> Result<Vec<StudentGradebook>> {
        self.load()
    }
}

/// Parse the gradebook endpoint's JSON payload
///
/// # Errors
/// Returns an error if the text is not a JSON array of student gradebooks
pub fn parse_gradebook_json(content: &str) -> Result<Vec<StudentGradebook>> {
    Ok(serde_json::from_str(content)?)
}
