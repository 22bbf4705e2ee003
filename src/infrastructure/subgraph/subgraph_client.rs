use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::shared::errors::SourceError;

/// Retries for failed subgraph requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    /// Base delay, multiplied by the attempt number
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff * attempt
    }
}

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorEntry {
    message: String,
}

impl<T> GraphQlResponse<T> {
    fn into_result(self) -> Result<T, SourceError> {
        if !self.errors.is_empty() {
            let messages: Vec<String> = self.errors.into_iter().map(|e| e.message).collect();
            return Err(SourceError::GraphQl(messages.join("; ")));
        }
        self.data
            .ok_or_else(|| SourceError::Decode("response has neither data nor errors".to_string()))
    }
}

/// GraphQL client for one subgraph endpoint
#[derive(Debug, Clone)]
pub struct SubgraphClient {
    http_client: Client,
    url: String,
    retry: RetryPolicy,
}

impl SubgraphClient {
    pub fn new(url: impl Into<String>, timeout: Duration, retry: RetryPolicy) -> Result<Self, SourceError> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            url: url.into(),
            retry,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Run `query` and decode its `data` into `T`, retrying transient failures
    pub async fn query<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T, SourceError> {
        let mut attempt = 0;
        loop {
            match self.post_once(query, &variables).await {
                Ok(data) => return Ok(data),
                Err(e) if is_retryable(&e) && attempt < self.retry.max_retries => {
                    attempt += 1;
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        "⚠️ Subgraph request to {} failed ({}), retry {}/{} in {:?}",
                        self.url, e, attempt, self.retry.max_retries, delay
                    );
                    sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn post_once<T: DeserializeOwned>(&self, query: &str, variables: &Value) -> Result<T, SourceError> {
        debug!("POST {} variables={}", self.url, variables);

        let response = self
            .http_client
            .post(&self.url)
            .json(&GraphQlRequest {
                query,
                variables: variables.clone(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        decode_response(&body)
    }
}

fn decode_response<T: DeserializeOwned>(body: &str) -> Result<T, SourceError> {
    let parsed: GraphQlResponse<T> =
        serde_json::from_str(body).map_err(|e| SourceError::Decode(e.to_string()))?;
    parsed.into_result()
}

fn is_retryable(err: &SourceError) -> bool {
    match err {
        SourceError::Transport(_) => true,
        SourceError::Status { status, .. } => {
            *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || *status >= 500
        }
        SourceError::GraphQl(_) | SourceError::Decode(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Data {
        value: u32,
    }

    #[test]
    fn test_decode_data() {
        let data: Data = decode_response(r#"{"data":{"value":7}}"#).unwrap();
        assert_eq!(data, Data { value: 7 });
    }

    #[test]
    fn test_decode_graphql_errors() {
        let err = decode_response::<Data>(
            r#"{"data":null,"errors":[{"message":"bad block"},{"message":"indexing"}]}"#,
        )
        .unwrap_err();
        match err {
            SourceError::GraphQl(msg) => assert_eq!(msg, "bad block; indexing"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            decode_response::<Data>("<html>"),
            Err(SourceError::Decode(_))
        ));
    }

    #[test]
    fn test_retryable_errors() {
        assert!(is_retryable(&SourceError::Transport("timeout".into())));
        assert!(is_retryable(&SourceError::Status { status: 503, body: String::new() }));
        assert!(is_retryable(&SourceError::Status { status: 429, body: String::new() }));
        assert!(!is_retryable(&SourceError::Status { status: 400, body: String::new() }));
        assert!(!is_retryable(&SourceError::GraphQl("syntax".into())));
    }

    #[test]
    fn test_linear_backoff() {
        let retry = RetryPolicy {
            max_retries: 3,
            backoff: Duration::from_millis(200),
        };
        assert_eq!(retry.delay_for(1), Duration::from_millis(200));
        assert_eq!(retry.delay_for(3), Duration::from_millis(600));
    }

    mod against_local_server {
        use super::super::{RetryPolicy, SubgraphClient};
        use super::Data;
        use crate::shared::errors::SourceError;
        use serde_json::{json, Value};
        use std::time::Duration;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::{TcpListener, TcpStream};

        /// Read one request: headers, then `Content-Length` bytes of body
        async fn read_request(socket: &mut TcpStream) {
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap_or(0);
                if n == 0 {
                    return;
                }
                buf.extend_from_slice(&chunk[..n]);
                if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                    let body_len = head
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if buf.len() >= end + 4 + body_len {
                        return;
                    }
                }
            }
        }

        /// Answer every connection with the same response, counting connections
        async fn serve(status_line: &'static str, body: &'static str) -> (String, Arc<AtomicUsize>) {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let url = format!("http://{}", listener.local_addr().unwrap());
            let hits = Arc::new(AtomicUsize::new(0));
            let counter = hits.clone();

            tokio::spawn(async move {
                while let Ok((mut socket, _)) = listener.accept().await {
                    counter.fetch_add(1, Ordering::SeqCst);
                    read_request(&mut socket).await;
                    let response = format!(
                        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status_line,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                }
            });

            (url, hits)
        }

        fn client(url: &str, max_retries: u32) -> SubgraphClient {
            let retry = RetryPolicy {
                max_retries,
                backoff: Duration::ZERO,
            };
            SubgraphClient::new(url, Duration::from_secs(5), retry).unwrap()
        }

        #[tokio::test]
        async fn test_server_errors_retried_max_retries_times() {
            let (url, hits) = serve("503 Service Unavailable", "busy").await;

            let err = client(&url, 2)
                .query::<Value>("{ pairs { id } }", json!({}))
                .await
                .unwrap_err();

            assert!(matches!(err, SourceError::Status { status: 503, .. }));
            assert_eq!(hits.load(Ordering::SeqCst), 3);
        }

        #[tokio::test]
        async fn test_zero_retries_means_one_attempt() {
            let (url, hits) = serve("503 Service Unavailable", "busy").await;

            assert!(client(&url, 0)
                .query::<Value>("{ pairs { id } }", json!({}))
                .await
                .is_err());
            assert_eq!(hits.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn test_graphql_errors_are_not_retried() {
            let (url, hits) = serve("200 OK", r#"{"data":null,"errors":[{"message":"bad query"}]}"#).await;

            let err = client(&url, 5)
                .query::<Value>("{ pairs { id } }", json!({}))
                .await
                .unwrap_err();

            assert!(matches!(err, SourceError::GraphQl(ref msg) if msg == "bad query"));
            assert_eq!(hits.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn test_success_after_no_failures() {
            let (url, hits) = serve("200 OK", r#"{"data":{"value":3}}"#).await;

            let data: Data = client(&url, 5)
                .query("{ value }", json!({}))
                .await
                .unwrap();

            assert_eq!(data, Data { value: 3 });
            assert_eq!(hits.load(Ordering::SeqCst), 1);
        }
    }
}
