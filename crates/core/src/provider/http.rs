use crate::config::Settings;
use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) stocklens/0.1";
const BASE_BACKOFF: Duration = Duration::from_secs(1);

/// Thin JSON GET client with exponential backoff, shared by the providers.
#[derive(Debug, Clone)]
pub struct JsonHttp {
    http: reqwest::Client,
    retries: u32,
    base_backoff: Duration,
}

impl JsonHttp {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            Duration::from_secs(settings.provider_timeout_secs),
            settings.provider_retries,
            BASE_BACKOFF,
        )
    }

    pub fn new(timeout: Duration, retries: u32, base_backoff: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build provider http client")?;

        Ok(Self {
            http,
            retries: retries.max(1),
            base_backoff,
        })
    }

    pub async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value> {
        self.request(url, query, false).await.map(|(_, body)| body)
    }

    /// Like `get_json`, but a 404 that carries a JSON body is returned to the
    /// caller instead of failing. Vendors use it to describe unknown symbols.
    pub async fn get_json_allow_not_found(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<(StatusCode, Value)> {
        self.request(url, query, true).await
    }

    async fn request(
        &self,
        url: &str,
        query: &[(&str, &str)],
        allow_not_found: bool,
    ) -> Result<(StatusCode, Value)> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;

            let res = match self.http.get(url).query(query).send().await {
                Ok(r) => r,
                Err(err) => {
                    if attempt >= self.retries {
                        return Err(err).with_context(|| format!("request to {url} failed"));
                    }
                    let backoff = backoff_for(self.base_backoff, attempt);
                    tracing::warn!(attempt, ?backoff, %url, error = %err, "provider request failed; retrying");
                    tokio::time::sleep(backoff).await;
                    continue;
                }
            };

            let status = res.status();
            let text = res
                .text()
                .await
                .with_context(|| format!("failed to read response from {url}"))?;

            if status == StatusCode::NOT_FOUND && allow_not_found {
                if let Ok(body) = serde_json::from_str::<Value>(&text) {
                    return Ok((status, body));
                }
            }

            if !status.is_success() {
                let retryable = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
                if retryable && attempt < self.retries {
                    let backoff = backoff_for(self.base_backoff, attempt);
                    tracing::warn!(attempt, ?backoff, %url, http_status = %status, "provider HTTP error; retrying");
                    tokio::time::sleep(backoff).await;
                    continue;
                }
                anyhow::bail!("{url} returned HTTP {status}: {}", truncate(&text, 300));
            }

            let body = serde_json::from_str::<Value>(&text).with_context(|| {
                format!("{url} response is not valid JSON: {}", truncate(&text, 300))
            })?;
            return Ok((status, body));
        }
    }
}

fn backoff_for(base: Duration, attempt: u32) -> Duration {
    base * (1u32 << (attempt - 1).min(5))
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Minimal HTTP/1.1 server answering with canned responses, one per connection.
#[cfg(test)]
pub(crate) mod canned {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    pub struct CannedServer {
        pub base_url: String,
        hits: Arc<AtomicUsize>,
    }

    impl CannedServer {
        /// The n-th request gets `responses[n]`; the last response repeats.
        pub fn start(responses: Vec<(u16, &'static str)>) -> Self {
            assert!(!responses.is_empty());
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let addr = listener.local_addr().unwrap();
            let hits = Arc::new(AtomicUsize::new(0));
            let counter = hits.clone();

            std::thread::spawn(move || {
                for stream in listener.incoming() {
                    let Ok(mut stream) = stream else { break };
                    read_head(&mut stream);
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    let (status, body) = responses[n.min(responses.len() - 1)];
                    let response = format!(
                        "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = stream.write_all(response.as_bytes());
                    let _ = stream.flush();
                }
            });

            Self {
                base_url: format!("http://{addr}"),
                hits,
            }
        }

        pub fn hits(&self) -> usize {
            self.hits.load(Ordering::SeqCst)
        }
    }

    fn read_head(stream: &mut std::net::TcpStream) {
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => return,
                Ok(n) => head.extend_from_slice(&buf[..n]),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use super::canned::CannedServer;

    fn fast_client(retries: u32) -> JsonHttp {
        JsonHttp::new(Duration::from_secs(5), retries, Duration::from_millis(1)).unwrap()
    }

    #[test]
    fn backoff_doubles_and_caps() {
        assert_eq!(backoff_for(BASE_BACKOFF, 1), Duration::from_secs(1));
        assert_eq!(backoff_for(BASE_BACKOFF, 2), Duration::from_secs(2));
        assert_eq!(backoff_for(BASE_BACKOFF, 3), Duration::from_secs(4));
        assert_eq!(backoff_for(BASE_BACKOFF, 20), Duration::from_secs(32));
        assert_eq!(backoff_for(Duration::from_millis(10), 2), Duration::from_millis(20));
    }

    #[tokio::test]
    async fn server_error_is_retried_until_success() {
        let server = CannedServer::start(vec![(503, r#"{"error":"busy"}"#), (200, r#"{"ok":true}"#)]);
        let body = fast_client(3).get_json(&server.base_url, &[]).await.unwrap();
        assert_eq!(body["ok"], true);
        assert_eq!(server.hits(), 2);
    }

    #[tokio::test]
    async fn client_error_fails_without_retry() {
        let server = CannedServer::start(vec![(400, r#"{"error":"bad request"}"#)]);
        let err = fast_client(3).get_json(&server.base_url, &[]).await.unwrap_err();
        assert!(err.to_string().contains("400"), "{err}");
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn rate_limit_stops_after_configured_attempts() {
        let server = CannedServer::start(vec![(429, r#"{"error":"slow down"}"#)]);
        let err = fast_client(3).get_json(&server.base_url, &[]).await.unwrap_err();
        assert!(err.to_string().contains("429"), "{err}");
        assert_eq!(server.hits(), 3);
    }

    #[tokio::test]
    async fn transport_error_is_retried_then_reported() {
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let err = fast_client(2)
            .get_json(&format!("http://{addr}/"), &[])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("request to"), "{err}");
    }

    #[tokio::test]
    async fn not_found_body_is_returned_only_when_allowed() {
        let server = CannedServer::start(vec![(404, r#"{"error":"Not Found"}"#)]);
        let client = fast_client(3);

        let (status, body) = client
            .get_json_allow_not_found(&server.base_url, &[])
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not Found");

        assert!(client.get_json(&server.base_url, &[]).await.is_err());
        assert_eq!(server.hits(), 2);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("abcdef", 3), "abc");
        assert_eq!(truncate("ab", 3), "ab");
        assert_eq!(truncate("äöüß", 2), "äö");
    }
}
