//! HTTP client wrapper - dispatches compiled requests and captures outcomes

use std::future::Future;
use std::time::{Duration, Instant};

use url::Url;

use crate::compiler::{compile, CompiledBody, CompiledRequest, MultipartPart, PartValue};
use crate::error::{ConsoleError, Result};
use crate::models::{EditBuffers, RequestDefinition, ResponseBody, ResponseInfo, ResponseStatus};

/// Raw result of one network round trip, body fully read
#[derive(Clone, Debug, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub ok: bool,
    pub text: String,
}

/// Performs the actual network call for a [`CompiledRequest`]
pub trait Transport: Send + Sync + 'static {
    fn dispatch(
        &self,
        request: CompiledRequest,
    ) -> impl Future<Output = Result<TransportResponse>> + Send;
}

/// reqwest-backed transport
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        HttpTransport {
            client: create_client(timeout),
        }
    }
}

impl Transport for HttpTransport {
    async fn dispatch(&self, request: CompiledRequest) -> Result<TransportResponse> {
        let mut req_builder = self.client.request(request.method.into(), request.url);

        for (key, value) in request.headers.iter() {
            req_builder = req_builder.header(key, value);
        }

        req_builder = match request.body {
            None => req_builder,
            Some(CompiledBody::Text(text)) => req_builder.body(text),
            Some(CompiledBody::Bytes(attachment)) => req_builder.body(attachment.bytes().to_vec()),
            Some(CompiledBody::Multipart(parts)) => req_builder.multipart(build_form(parts)),
        };

        let resp = req_builder.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        Ok(TransportResponse {
            status: status.as_u16(),
            ok: status.is_success(),
            text,
        })
    }
}

fn build_form(parts: Vec<MultipartPart>) -> reqwest::multipart::Form {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        form = match part.value {
            PartValue::Text(text) => form.text(part.name, text),
            PartValue::File(attachment) => {
                let file = reqwest::multipart::Part::bytes(attachment.bytes().to_vec())
                    .file_name(attachment.file_name().to_string());
                form.part(part.name, file)
            }
        };
    }
    form
}

/// Compile and send one request attempt.
///
/// Never fails: a blank endpoint becomes an `INVALID_ENDPOINT` outcome without
/// touching the transport, URL and transport failures become `NETWORK_ERROR`,
/// and every HTTP status, 4xx/5xx included, is captured as-is.
pub async fn execute_request<T: Transport>(
    transport: &T,
    definition: &RequestDefinition,
    live: &EditBuffers,
    origin: &Url,
) -> ResponseInfo {
    let endpoint = definition.endpoint.trim();
    let start = Instant::now();

    let compiled = match compile(definition, live, origin) {
        Ok(compiled) => compiled,
        Err(ConsoleError::InvalidEndpoint) => return ResponseInfo::invalid_endpoint(),
        Err(e) => return ResponseInfo::network_error(e.to_string(), endpoint, elapsed_ms(start)),
    };

    let url = compiled.url.to_string();
    let dispatched_at = Instant::now();
    match transport.dispatch(compiled).await {
        Ok(resp) => ResponseInfo {
            status: ResponseStatus::Code(resp.status),
            ok: resp.ok,
            body: ResponseBody::from_text(resp.text),
            url,
            duration_ms: elapsed_ms(dispatched_at),
        },
        Err(e) => ResponseInfo::network_error(e.to_string(), endpoint, elapsed_ms(dispatched_at)),
    }
}

fn elapsed_ms(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}

/// Create an HTTP client with default configuration
pub fn create_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::models::HttpMethod;

    /// Records what it was asked to send and replies with a canned result
    struct FakeTransport {
        calls: AtomicUsize,
        last: Mutex<Option<CompiledRequest>>,
        reply: std::result::Result<TransportResponse, String>,
    }

    impl FakeTransport {
        fn replying(reply: std::result::Result<TransportResponse, String>) -> Self {
            FakeTransport {
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
                reply,
            }
        }
    }

    impl Transport for FakeTransport {
        async fn dispatch(&self, request: CompiledRequest) -> Result<TransportResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(request);
            self.reply.clone().map_err(ConsoleError::Network)
        }
    }

    fn origin() -> Url {
        Url::parse("http://localhost:8080").unwrap()
    }

    fn definition(endpoint: &str) -> RequestDefinition {
        RequestDefinition {
            endpoint: endpoint.to_string(),
            method: HttpMethod::POST,
            ..RequestDefinition::default()
        }
    }

    #[tokio::test]
    async fn test_blank_endpoint_never_reaches_transport() {
        let transport = FakeTransport::replying(Ok(TransportResponse { status: 200, ok: true, text: String::new() }));
        let info = execute_request(&transport, &definition("  "), &EditBuffers::default(), &origin()).await;

        assert_eq!(info.status, ResponseStatus::InvalidEndpoint);
        assert!(!info.ok);
        assert_eq!(info.body, ResponseBody::Text("Endpoint cannot be empty.".into()));
        assert_eq!(info.url, "");
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_error_status_is_captured() {
        let transport = FakeTransport::replying(Ok(TransportResponse {
            status: 404,
            ok: false,
            text: r#"{"error":"missing"}"#.into(),
        }));
        let info = execute_request(&transport, &definition("/users/9"), &EditBuffers::default(), &origin()).await;

        assert_eq!(info.status, ResponseStatus::Code(404));
        assert!(!info.ok);
        assert_eq!(info.body, ResponseBody::Json(serde_json::json!({"error": "missing"})));
        assert_eq!(info.url, "http://localhost:8080/users/9");
        assert_eq!(
            transport.last.lock().unwrap().as_ref().map(|r| r.url.as_str().to_string()),
            Some("http://localhost:8080/users/9".to_string())
        );
    }

    #[tokio::test]
    async fn test_plain_text_body_is_kept() {
        let transport = FakeTransport::replying(Ok(TransportResponse { status: 200, ok: true, text: "pong".into() }));
        let info = execute_request(&transport, &definition("https://x.io/ping"), &EditBuffers::default(), &origin()).await;
        assert!(info.ok);
        assert_eq!(info.body, ResponseBody::Text("pong".into()));
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        let transport = FakeTransport::replying(Err("Connection failed: refused".into()));
        let info = execute_request(&transport, &definition(" https://down.example.com "), &EditBuffers::default(), &origin()).await;

        assert_eq!(info.status, ResponseStatus::NetworkError);
        assert!(!info.ok);
        assert_eq!(info.body, ResponseBody::Text("Connection failed: refused".into()));
        assert_eq!(info.url, "https://down.example.com");
    }

    #[tokio::test]
    async fn test_malformed_url_is_network_error_without_dispatch() {
        let transport = FakeTransport::replying(Ok(TransportResponse { status: 200, ok: true, text: String::new() }));
        let info = execute_request(&transport, &definition("http://[::1"), &EditBuffers::default(), &origin()).await;

        assert_eq!(info.status, ResponseStatus::NetworkError);
        assert!(matches!(info.body, ResponseBody::Text(ref msg) if msg.starts_with("Invalid URL")));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }
}
