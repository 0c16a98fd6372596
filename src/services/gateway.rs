// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Remote activities API.
//!
//! The cache only talks to the [`Gateway`] trait. [`HttpGateway`] is the
//! production implementation:
//! - `GET    {base}/activities`
//! - `POST   {base}/activities`
//! - `PUT    {base}/activities/{id}`
//! - `DELETE {base}/activities/{id}`

use crate::error::GatewayError;
use crate::models::{Activity, ActivityRecord};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

/// Remote CRUD operations consumed by the activity cache.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Fetch the full collection.
    async fn list(&self) -> Result<Vec<ActivityRecord>, GatewayError>;

    /// Create an activity whose id was assigned by the caller.
    async fn create(&self, activity: &Activity) -> Result<(), GatewayError>;

    /// Replace an existing activity.
    async fn update(&self, activity: &Activity) -> Result<(), GatewayError>;

    /// Delete an activity by id.
    async fn delete(&self, id: &str) -> Result<(), GatewayError>;
}

/// Activities API client over HTTP.
#[derive(Clone)]
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpGateway {
    /// Create a client for the API rooted at `base_url`.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, GatewayError> {
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::Network(format!(
                "Not a usable base URL: {}",
                base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            timeout,
        })
    }

    /// `{base}/activities` or `{base}/activities/{id}`.
    fn endpoint(&self, id: Option<&str>) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| GatewayError::Network(format!("Bad base URL: {}", self.base_url)))?;
            segments.pop_if_empty().push("activities");
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    fn map_send_error(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout(self.timeout)
        } else {
            GatewayError::Network(err.to_string())
        }
    }

    /// Check response status and return error if not successful.
    async fn check_response(&self, response: reqwest::Response) -> Result<(), GatewayError> {
        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "Activities API returned an error");

        Err(GatewayError::Server {
            status: status.as_u16(),
            body,
        })
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Activities API returned an error");

            return Err(GatewayError::Server {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(format!("JSON parse error: {}", e)))
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn list(&self) -> Result<Vec<ActivityRecord>, GatewayError> {
        let url = self.endpoint(None)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        self.check_response_json(response).await
    }

    async fn create(&self, activity: &Activity) -> Result<(), GatewayError> {
        let url = self.endpoint(None)?;
        let response = self
            .http
            .post(url)
            .json(activity)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        self.check_response(response).await
    }

    async fn update(&self, activity: &Activity) -> Result<(), GatewayError> {
        let url = self.endpoint(Some(&activity.id))?;
        let response = self
            .http
            .put(url)
            .json(activity)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        self.check_response(response).await
    }

    async fn delete(&self, id: &str) -> Result<(), GatewayError> {
        let url = self.endpoint(Some(id))?;
        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        self.check_response(response).await
    }
}
