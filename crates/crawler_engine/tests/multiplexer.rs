use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use futures_util::stream::{self, StreamExt};

use crawler_core::{CompletedTransfer, TransferFailure, TransferResponse};
use crawler_engine::{
    HttpClient, HttpResponse, ReqwestClient, TransferMultiplexer, TransferSettings,
    DEFAULT_USER_AGENT,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn reqwest_multiplexer(settings: TransferSettings) -> TransferMultiplexer<ReqwestClient> {
    let client = ReqwestClient::new(&settings).expect("client");
    TransferMultiplexer::new(client, &settings)
}

async fn drain<C: HttpClient + 'static>(mux: &mut TransferMultiplexer<C>) -> Vec<CompletedTransfer> {
    let mut all = Vec::new();
    while mux.active_count() > 0 {
        let (completed, _active) = mux.poll().await;
        all.extend(completed);
    }
    all
}

fn response_of(transfer: &CompletedTransfer) -> &TransferResponse {
    transfer.result.as_ref().expect("transfer succeeded")
}

#[tokio::test]
async fn transfer_reports_status_type_body_and_effective_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/doc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>ok</html>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let mut mux = reqwest_multiplexer(TransferSettings::default());
    let url = format!("{}/doc", server.uri());
    mux.submit(7, url.clone());
    assert_eq!(mux.active_count(), 1);

    let (completed, active) = mux.poll().await;
    assert_eq!(active, 0);
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].transfer_id, 7);
    assert_eq!(completed[0].url, url);

    let response = response_of(&completed[0]);
    assert_eq!(response.status, 200);
    assert_eq!(response.effective_url, url);
    assert!(response
        .content_type
        .as_deref()
        .unwrap()
        .starts_with("text/html"));
    assert_eq!(response.body.as_bytes(), b"<html>ok</html>");
}

#[tokio::test]
async fn redirects_are_followed_and_effective_url_tracked() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/new"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("moved", "text/plain"))
        .mount(&server)
        .await;

    let mut mux = reqwest_multiplexer(TransferSettings::default());
    mux.submit(1, format!("{}/old", server.uri()));
    let completed = drain(&mut mux).await;

    let response = response_of(&completed[0]);
    assert_eq!(completed[0].url, format!("{}/old", server.uri()));
    assert_eq!(response.effective_url, format!("{}/new", server.uri()));
    assert_eq!(response.body.as_bytes(), b"moved");
}

#[tokio::test]
async fn redirect_loop_fails_after_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/loop"))
        .mount(&server)
        .await;

    let mut mux = reqwest_multiplexer(TransferSettings::default());
    mux.submit(1, format!("{}/loop", server.uri()));
    let completed = drain(&mut mux).await;

    assert_eq!(completed[0].result, Err(TransferFailure::TooManyRedirects));
}

/// Mounts `/h0 -> /h1 -> ... -> /h{hops}`, with the last one serving a body.
async fn mount_redirect_chain(server: &MockServer, hops: usize) {
    for hop in 0..hops {
        Mock::given(method("GET"))
            .and(path(format!("/h{hop}")))
            .respond_with(
                ResponseTemplate::new(302).insert_header("Location", format!("/h{}", hop + 1)),
            )
            .mount(server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path(format!("/h{hops}")))
        .respond_with(ResponseTemplate::new(200).set_body_raw("end", "text/plain"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn five_redirect_hops_are_followed() {
    let server = MockServer::start().await;
    mount_redirect_chain(&server, 5).await;

    let mut mux = reqwest_multiplexer(TransferSettings::default());
    mux.submit(1, format!("{}/h0", server.uri()));
    let completed = drain(&mut mux).await;

    let response = response_of(&completed[0]);
    assert_eq!(response.effective_url, format!("{}/h5", server.uri()));
    assert_eq!(response.body.as_bytes(), b"end");
}

#[tokio::test]
async fn sixth_redirect_hop_fails() {
    let server = MockServer::start().await;
    mount_redirect_chain(&server, 6).await;

    let mut mux = reqwest_multiplexer(TransferSettings::default());
    mux.submit(1, format!("{}/h0", server.uri()));
    let completed = drain(&mut mux).await;

    assert_eq!(completed[0].result, Err(TransferFailure::TooManyRedirects));
}

#[tokio::test]
async fn fixed_user_agent_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_raw("hi", "text/plain"))
        .mount(&server)
        .await;

    let mut mux = reqwest_multiplexer(TransferSettings::default());
    mux.submit(1, format!("{}/ua", server.uri()));
    let completed = drain(&mut mux).await;

    assert_eq!(response_of(&completed[0]).status, 200);
}

#[tokio::test]
async fn error_status_is_a_response_not_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut mux = reqwest_multiplexer(TransferSettings::default());
    mux.submit(1, format!("{}/missing", server.uri()));
    let completed = drain(&mut mux).await;

    let response = response_of(&completed[0]);
    assert_eq!(response.status, 404);
    assert_eq!(response.content_type, None);
}

#[tokio::test]
async fn completions_follow_network_timing_not_submission_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(300))
                .set_body_raw("slow", "text/plain"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fast"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("fast", "text/plain"))
        .mount(&server)
        .await;

    let mut mux = reqwest_multiplexer(TransferSettings::default());
    mux.submit(1, format!("{}/slow", server.uri()));
    mux.submit(2, format!("{}/fast", server.uri()));

    let (first, active) = mux.poll().await;
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].transfer_id, 2);
    assert_eq!(active, 1);

    let rest = drain(&mut mux).await;
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].transfer_id, 1);
}

#[tokio::test]
async fn invalid_url_fails_the_transfer_only() {
    let mut mux = reqwest_multiplexer(TransferSettings::default());
    mux.submit(1, "not a url".to_string());
    let completed = drain(&mut mux).await;

    assert!(matches!(
        completed[0].result,
        Err(TransferFailure::InvalidUrl(_))
    ));
}

#[tokio::test]
async fn poll_with_nothing_active_returns_immediately() {
    let mut mux = reqwest_multiplexer(TransferSettings::default());
    let (completed, active) = mux.poll().await;
    assert!(completed.is_empty());
    assert_eq!(active, 0);
}

/// Serves canned chunked bodies without touching the network.
struct ChunkedClient {
    bodies: HashMap<String, Vec<&'static [u8]>>,
}

#[async_trait::async_trait]
impl HttpClient for ChunkedClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransferFailure> {
        let chunks = self
            .bodies
            .get(url)
            .cloned()
            .ok_or_else(|| TransferFailure::Network(format!("no route to {url}")))?;
        let body = stream::iter(chunks.into_iter().map(|chunk| Ok(Bytes::from_static(chunk))));
        Ok(HttpResponse {
            status: 200,
            content_type: Some("application/octet-stream".to_string()),
            effective_url: url.to_string(),
            body: body.boxed(),
        })
    }
}

fn chunked_client() -> ChunkedClient {
    let mut bodies = HashMap::new();
    bodies.insert(
        "http://stub.example/chunks".to_string(),
        vec![&b"0123"[..], &b"456789abcdef"[..], &b"ghij"[..]],
    );
    ChunkedClient { bodies }
}

#[tokio::test]
async fn streamed_chunks_accumulate_with_buffer_growth() {
    let settings = TransferSettings {
        initial_buffer_capacity: 8,
        buffer_increment: 4,
        ..TransferSettings::default()
    };
    let mut mux = TransferMultiplexer::new(chunked_client(), &settings);
    mux.submit(1, "http://stub.example/chunks".to_string());
    mux.submit(2, "http://stub.example/unknown".to_string());

    let mut completed = drain(&mut mux).await;
    completed.sort_by_key(|transfer| transfer.transfer_id);

    let body = &response_of(&completed[0]).body;
    assert_eq!(body.as_bytes(), b"0123456789abcdefghij");
    assert!(body.reallocations() >= 1);
    assert!(body.capacity() > body.len());

    assert!(matches!(completed[1].result, Err(TransferFailure::Network(_))));
}

#[tokio::test]
async fn buffer_allocation_failure_aborts_that_transfer() {
    let settings = TransferSettings {
        initial_buffer_capacity: usize::MAX,
        ..TransferSettings::default()
    };
    let mut mux = TransferMultiplexer::new(chunked_client(), &settings);
    mux.submit(1, "http://stub.example/chunks".to_string());
    let completed = drain(&mut mux).await;

    assert_eq!(
        completed[0].result,
        Err(TransferFailure::Allocation {
            requested: usize::MAX
        })
    );
}
