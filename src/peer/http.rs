/*
 *  peer/http.rs
 *
 *  vestaglove - controller log display
 *  (c) 2026 vestaglove contributors
 *
 *  reqwest backed transport
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::time::Duration;

use log::debug;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;

use crate::error::TransportError;
use crate::peer::PeerTransport;

/// A client for the controller's JSON endpoints.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a client with populated headers. Timeouts are per request.
    pub fn new() -> Result<Self, TransportError> {
        const VERSION: &str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static(VERSION));
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        headers.insert(header::CONNECTION, header::HeaderValue::from_static("close"));

        // peers always sit on the local segment
        let client = Client::builder()
            .no_proxy()
            .http1_only()
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }
}

impl PeerTransport for HttpTransport {
    async fn get<T: DeserializeOwned>(&self, url: &str, timeout: Duration) -> Result<T, TransportError> {
        let response = self.client.get(url).timeout(timeout).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status { url: url.to_string(), status: status.as_u16() });
        }

        let body = response.text().await?;
        debug!("GET {} -> {} bytes", url, body.len());
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peer::{DiscoverReply, ModeReply};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a loopback port.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = sock.read(&mut buf).await;
            let reply = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            sock.write_all(reply.as_bytes()).await.unwrap();
            sock.shutdown().await.ok();
        });
        format!("http://{}/discover", addr)
    }

    #[tokio::test]
    async fn test_get_parses_json_body() {
        let url = serve_once("200 OK", r#"{"service":"vesta"}"#).await;
        let transport = HttpTransport::new().unwrap();
        let reply: DiscoverReply = transport.get(&url, Duration::from_secs(2)).await.unwrap();
        assert_eq!(reply.service, "vesta");
    }

    #[tokio::test]
    async fn test_get_reports_malformed_body() {
        let url = serve_once("200 OK", r#"{"service":"vesta"}"#).await;
        let transport = HttpTransport::new().unwrap();
        let err = transport.get::<ModeReply>(&url, Duration::from_secs(2)).await.unwrap_err();
        assert!(matches!(err, TransportError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_get_reports_http_status() {
        let url = serve_once("404 Not Found", "{}").await;
        let transport = HttpTransport::new().unwrap();
        let err = transport.get::<DiscoverReply>(&url, Duration::from_secs(2)).await.unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_get_reports_refused_connection() {
        // bind then drop so the port is closed
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::new().unwrap();
        let url = format!("http://{}/mode", addr);
        let err = transport.get::<ModeReply>(&url, Duration::from_millis(500)).await.unwrap_err();
        assert!(matches!(err, TransportError::Http(_)));
    }
}
