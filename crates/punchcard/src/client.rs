//! HTTP clients for the attendance and user-management services.
//!
//! Both services answer JSON with a `data` payload; list endpoints add a
//! `meta` pagination block, and error bodies carry a `msg` field. Every
//! request is authenticated with a bearer token fetched fresh from the
//! injected [`CredentialProvider`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use tracing::debug;

use crate::capture::Photo;
use crate::config::Config;
use crate::credentials::CredentialProvider;
use crate::error::{Error, Result};
use crate::records::{
    AttendanceRecord, Employee, EmployeeUpdate, Envelope, NewEmployee, Page, RecordFilter,
};
use crate::workflow::AttendanceApi;

/// The error body shape both backends use.
#[derive(Debug, Deserialize)]
struct ServerMessage {
    msg: String,
}

/// Turn a non-success response into an error, preferring the server's
/// own `msg` over a generic description.
async fn rejection(response: reqwest::Response) -> Error {
    let status = response.status();
    let message = match response.json::<ServerMessage>().await {
        Ok(body) => body.msg,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    Error::rejected(status.as_u16(), message)
}

/// Client for the attendance service.
#[derive(Clone)]
pub struct AttendanceClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl std::fmt::Debug for AttendanceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttendanceClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl AttendanceClient {
    /// Create a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &Config, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.attendance_url().to_string(),
            credentials,
        })
    }

    /// Create a client against an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_base_url(
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// List all attendance records (admin), filtered and paginated.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success answer.
    pub async fn all_records(
        &self,
        filter: RecordFilter,
        page: u64,
        page_size: u64,
    ) -> Result<Page<AttendanceRecord>> {
        let token = self.credentials.bearer_token()?;
        let url = format!("{}/all", self.base_url);
        debug!(%url, %filter, page, "fetching attendance records");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("filter", filter.query_value().to_string()),
                ("page", page.to_string()),
                ("pageSize", page_size.to_string()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl AttendanceApi for AttendanceClient {
    async fn my_history(&self) -> Result<Vec<AttendanceRecord>> {
        let token = self.credentials.bearer_token()?;
        let url = format!("{}/my-history", self.base_url);
        debug!(%url, "fetching attendance history");

        let response = self.http.get(&url).bearer_auth(token).send().await?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        let envelope: Envelope<Vec<AttendanceRecord>> = response.json().await?;
        Ok(envelope.data)
    }

    async fn clock_in(&self, photo: &Photo) -> Result<()> {
        let token = self.credentials.bearer_token()?;
        let url = format!("{}/clock-in", self.base_url);
        debug!(%url, bytes = photo.len(), "submitting clock-in photo");

        let part = multipart::Part::bytes(photo.bytes.clone())
            .file_name(photo.file_name.clone())
            .mime_str(&photo.mime)?;
        let form = multipart::Form::new().part("photo", part);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        Ok(())
    }
}

/// Client for the user-management service's employee endpoints.
#[derive(Clone)]
pub struct EmployeeClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl std::fmt::Debug for EmployeeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmployeeClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl EmployeeClient {
    /// Create a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &Config, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.user_url().to_string(),
            credentials,
        })
    }

    /// Create a client against an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_base_url(
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// List employee accounts, paginated.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success answer.
    pub async fn list(&self, page: u64, page_size: u64) -> Result<Page<Employee>> {
        let token = self.credentials.bearer_token()?;
        let url = format!("{}/users", self.base_url);
        debug!(%url, page, "fetching employees");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[("page", page.to_string()), ("pageSize", page_size.to_string())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        Ok(response.json().await?)
    }

    /// Create an employee account.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success answer.
    pub async fn create(&self, employee: &NewEmployee) -> Result<()> {
        let token = self.credentials.bearer_token()?;
        let url = format!("{}/users", self.base_url);
        debug!(%url, email = %employee.email, "creating employee");

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(employee)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        Ok(())
    }

    /// Update an employee account.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success answer.
    pub async fn update(&self, id: i64, update: &EmployeeUpdate) -> Result<()> {
        let token = self.credentials.bearer_token()?;
        let url = format!("{}/users/{id}", self.base_url);
        debug!(%url, "updating employee");

        let response = self
            .http
            .put(&url)
            .bearer_auth(token)
            .json(update)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        Ok(())
    }

    /// Delete an employee account.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success answer.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let token = self.credentials.bearer_token()?;
        let url = format!("{}/users/{id}", self.base_url);
        debug!(%url, "deleting employee");

        let response = self.http.delete(&url).bearer_auth(token).send().await?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        Ok(())
    }
}
