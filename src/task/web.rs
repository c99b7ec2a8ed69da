use tracing::debug;

use crate::error::TaskError;
use crate::resource::UrlResource;

/// Fetches the body of a URL with an HTTP GET
#[derive(Debug)]
pub struct WebRequestTask {
    resource: UrlResource,
    client: reqwest::Client,
    last_value: Option<String>,
}

impl WebRequestTask {
    pub fn new(resource: UrlResource, client: reqwest::Client) -> Self {
        Self {
            resource,
            client,
            last_value: None,
        }
    }

    pub fn resource(&self) -> &UrlResource {
        &self.resource
    }

    pub fn last_value(&self) -> Option<&str> {
        self.last_value.as_deref()
    }

    pub async fn perform(&mut self) -> Result<String, TaskError> {
        let url = &self.resource.url;
        let to_error = |source| TaskError::Http {
            url: url.clone(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(to_error)?;

        // Treat anything but 2xx as a failed fetch
        let status = response.status();
        if !status.is_success() {
            self.last_value = None;
            return Err(TaskError::HttpStatus {
                url: url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(to_error)?;
        debug!("Fetched {} (length: {})", url, body.len());

        self.last_value = Some(body.clone());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a loopback port and return its URL
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buffer = [0u8; 1024];
            let _ = socket.read(&mut buffer).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}/status", address)
    }

    #[tokio::test]
    async fn test_perform_returns_body() {
        let url = serve_once("200 OK", "{\"healthy\":true}").await;
        let mut task = WebRequestTask::new(UrlResource { url }, reqwest::Client::new());

        let body = task.perform().await.unwrap();
        assert_eq!(body, "{\"healthy\":true}");
        assert_eq!(task.last_value(), Some("{\"healthy\":true}"));
    }

    #[tokio::test]
    async fn test_perform_rejects_error_status() {
        let url = serve_once("503 Service Unavailable", "down").await;
        let mut task = WebRequestTask::new(UrlResource { url }, reqwest::Client::new());

        let error = task.perform().await.unwrap_err();
        assert!(matches!(error, TaskError::HttpStatus { status: 503, .. }));
        assert!(task.last_value().is_none());
    }

    #[tokio::test]
    async fn test_perform_connection_refused() {
        // Bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let mut task = WebRequestTask::new(
            UrlResource {
                url: format!("http://{}/", address),
            },
            reqwest::Client::new(),
        );

        assert!(matches!(
            task.perform().await.unwrap_err(),
            TaskError::Http { .. }
        ));
    }
}
