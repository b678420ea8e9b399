use crate::utils::millis2;
use std::time::{Duration, Instant};

/// Outcome of the plain HTTP probe
#[derive(Debug, Clone, PartialEq)]
pub enum TimingSample {
    /// The server answered
    Response { status_code: u16, elapsed_ms: f64 },
    /// No answer within the probe timeout
    Timeout,
    /// Transport-level failure other than a timeout
    RequestError(String),
}

impl TimingSample {
    pub fn is_response(&self) -> bool {
        matches!(self, TimingSample::Response { .. })
    }
}

/// Issues one GET against `url` and times it until the response headers arrive.
///
/// Never fails: every outcome is a `TimingSample`. No retries.
pub async fn probe(url: &str, timeout: Duration) -> TimingSample {
    ::log::info!("Probing {} (timeout {}s)", url, timeout.as_secs_f64());

    let client = match reqwest::Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => return TimingSample::RequestError(e.to_string()),
    };

    let start = Instant::now();
    let sample = match client.get(url).send().await {
        Ok(resp) => TimingSample::Response {
            status_code: resp.status().as_u16(),
            elapsed_ms: millis2(start.elapsed()),
        },
        Err(e) if e.is_timeout() => TimingSample::Timeout,
        Err(e) => TimingSample::RequestError(e.to_string()),
    };

    match &sample {
        TimingSample::Response {
            status_code,
            elapsed_ms,
        } => ::log::info!("Probe answered {} in {} ms", status_code, elapsed_ms),
        TimingSample::Timeout => ::log::warn!("Probe timed out for {}", url),
        TimingSample::RequestError(e) => ::log::warn!("Probe failed for {}: {}", url, e),
    }

    sample
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_probe_records_status() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            socket
                .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                .await
                .unwrap();
        });

        let sample = probe(&format!("http://{}/", addr), Duration::from_secs(5)).await;
        match sample {
            TimingSample::Response {
                status_code,
                elapsed_ms,
            } => {
                assert_eq!(status_code, 404);
                assert!(elapsed_ms >= 0.0);
                assert_eq!(elapsed_ms, (elapsed_ms * 100.0).round() / 100.0);
            }
            other => panic!("expected a response, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_probe_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            // Accept and hold the connection without answering
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let sample = probe(&format!("http://{}/", addr), Duration::from_millis(200)).await;
        assert_eq!(sample, TimingSample::Timeout);
    }

    #[tokio::test]
    async fn test_probe_request_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let sample = probe(&format!("http://{}/", addr), Duration::from_secs(5)).await;
        assert!(matches!(sample, TimingSample::RequestError(_)));
        assert!(!sample.is_response());
    }

    #[tokio::test]
    async fn test_probe_invalid_url_is_request_error() {
        let sample = probe("not a url", Duration::from_secs(1)).await;
        assert!(matches!(sample, TimingSample::RequestError(_)));
    }
}
