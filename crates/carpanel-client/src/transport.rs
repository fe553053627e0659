//! HTTP transport to the vehicle's web server

use carpanel_core::{CarStatus, CommandReply, CommandRequest, PanelError, UploadTarget};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace};

/// Endpoint accepting `{execute, value}` commands
pub const CAR_PATH: &str = "car";
/// Endpoint reporting the vehicle status
pub const STATUS_PATH: &str = "car_status";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The three exchanges the panel has with a vehicle
pub trait VehicleApi: Send + Sync {
    /// `POST car`, returning the command the vehicle actually executed
    fn send_command(
        &self,
        request: &CommandRequest,
    ) -> impl Future<Output = Result<CommandReply, PanelError>> + Send;

    /// `GET car_status`
    fn fetch_status(&self) -> impl Future<Output = Result<CarStatus, PanelError>> + Send;

    /// `POST /upload/<kind>/<file_name>` with the raw file, returning the reply text
    fn upload(
        &self,
        target: UploadTarget,
        file_name: &str,
        body: Vec<u8>,
    ) -> impl Future<Output = Result<String, PanelError>> + Send;
}

/// reqwest-backed vehicle connection
#[derive(Debug, Clone)]
pub struct HttpVehicle {
    client: reqwest::Client,
    base_url: String,
}

impl HttpVehicle {
    /// Create a client for the vehicle at `base_url` (e.g. "http://192.168.4.1")
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PanelError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PanelError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve an endpoint path against the base URL
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Read the body of a reply, turning non-success statuses into `PanelError::Http`
    async fn read_body(response: reqwest::Response) -> Result<String, PanelError> {
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            debug!(status = %status, body = %body, "Vehicle returned an error");
            return Err(PanelError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, PanelError> {
        let body = Self::read_body(response).await?;
        serde_json::from_str(&body).map_err(|e| PanelError::InvalidReply(e.to_string()))
    }
}

fn transport_error(e: reqwest::Error) -> PanelError {
    PanelError::Transport(e.to_string())
}

impl VehicleApi for HttpVehicle {
    async fn send_command(&self, request: &CommandRequest) -> Result<CommandReply, PanelError> {
        let url = self.url(CAR_PATH);
        trace!(url = %url, execute = %request.execute, "Posting command");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        Self::read_json(response).await
    }

    async fn fetch_status(&self) -> Result<CarStatus, PanelError> {
        let url = self.url(STATUS_PATH);
        trace!(url = %url, "Fetching vehicle status");

        let response = self.client.get(&url).send().await.map_err(transport_error)?;
        Self::read_json(response).await
    }

    async fn upload(
        &self,
        target: UploadTarget,
        file_name: &str,
        body: Vec<u8>,
    ) -> Result<String, PanelError> {
        let url = self.url(&target.path_for(file_name));
        debug!(url = %url, size = body.len(), "Uploading file");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(body)
            .send()
            .await
            .map_err(transport_error)?;

        Self::read_body(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let vehicle = HttpVehicle::new("http://192.168.4.1/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(vehicle.base_url(), "http://192.168.4.1");
        assert_eq!(vehicle.url(CAR_PATH), "http://192.168.4.1/car");
        assert_eq!(
            vehicle.url(&UploadTarget::Html.path_for("index.html")),
            "http://192.168.4.1/upload/html/index.html"
        );
    }
}
