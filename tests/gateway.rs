//! Integration tests for the translation gateway
//!
//! These run against an in-process provider on tokio's paused clock:
//! - validation before any remote call
//! - envelope unwrapping for success and provider failures
//! - throttling of sequential and concurrent callers

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{timeout, Instant};
use tmt_translator::{
    Lang, RateLimiter, TextTranslateRequest, TranslationError, TranslationGateway,
    TranslationProvider, TransportError, TransportErrorKind,
};

// =============================================================================
// Mock Provider
// =============================================================================

enum Reply {
    Envelope(&'static str),
    Transport(TransportErrorKind),
}

struct MockProvider {
    reply: Reply,
    latency: Duration,
    calls: AtomicUsize,
    started_at: Mutex<Vec<Instant>>,
}

impl MockProvider {
    fn new(reply: Reply, latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            reply,
            latency,
            calls: AtomicUsize::new(0),
            started_at: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn started_at(&self) -> Vec<Instant> {
        self.started_at.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranslationProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn text_translate(
        &self,
        _request: &TextTranslateRequest,
    ) -> Result<String, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started_at.lock().unwrap().push(Instant::now());
        tokio::time::sleep(self.latency).await;
        match self.reply {
            Reply::Envelope(body) => Ok(body.to_string()),
            Reply::Transport(kind) => Err(TransportError::new(kind, "signature expired")),
        }
    }
}

const SUCCESS: &str = r#"{"Response":{"RequestId":"r1","Source":"en","Target":"zh","TargetText":"这是一次测试"}}"#;
const SIGNATURE_FAILURE: &str = r#"{"Response":{"RequestId":"r2","Error":{"Code":"AuthFailure.SignatureFailure","Message":"The provided credentials could not be validated. Please check your signature is correct."}}}"#;

const INTERVAL: Duration = Duration::from_millis(200);

fn gateway(provider: Arc<MockProvider>) -> TranslationGateway {
    let limiter = Arc::new(RateLimiter::new(5.0, Duration::from_millis(5)));
    TranslationGateway::new(provider, limiter, 2000)
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_overlong_input_never_reaches_provider() {
    let provider = MockProvider::new(Reply::Envelope(SUCCESS), Duration::ZERO);
    let gateway = gateway(provider.clone());

    for len in [2000, 2001, 4096] {
        let err = gateway.translate_en_to_zh(&"x".repeat(len)).await.unwrap_err();
        assert!(matches!(err, TranslationError::InputTooLong { .. }));
    }

    assert_eq!(provider.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_short_input_reaches_provider() {
    let provider = MockProvider::new(Reply::Envelope(SUCCESS), Duration::ZERO);
    let gateway = gateway(provider.clone());

    for len in [0, 1, 1999] {
        tokio_test::assert_ok!(gateway.translate_en_to_zh(&"x".repeat(len)).await);
    }

    assert_eq!(provider.calls(), 3);
}

// =============================================================================
// Envelope handling
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_success_envelope_roundtrip() {
    let provider = MockProvider::new(Reply::Envelope(SUCCESS), Duration::from_millis(20));
    let gateway = gateway(provider);

    let result = gateway.translate_en_to_zh("This is a test").await.unwrap();
    assert_eq!(result.request_id, "r1");
    assert_eq!(result.source_lang, "en");
    assert_eq!(result.target_lang, "zh");
    assert_eq!(result.translated_text, "这是一次测试");
}

#[tokio::test(start_paused = true)]
async fn test_signature_failure_envelope() {
    let provider = MockProvider::new(Reply::Envelope(SIGNATURE_FAILURE), Duration::ZERO);
    let gateway = gateway(provider);

    let err = gateway.translate_zh_to_en("测试").await.unwrap_err();
    assert_eq!(err.remote_code(), Some("AuthFailure.SignatureFailure"));
    assert!(!err.is_retryable());
}

#[tokio::test(start_paused = true)]
async fn test_transport_failure_is_distinct() {
    let provider = MockProvider::new(Reply::Transport(TransportErrorKind::Auth), Duration::ZERO);
    let gateway = gateway(provider);

    let err = gateway.translate_en_to_zh("hello").await.unwrap_err();
    match err {
        TranslationError::RemoteTransport(e) => {
            assert_eq!(e.kind, TransportErrorKind::Auth);
            assert_eq!(e.message, "signature expired");
        }
        other => panic!("expected transport error, got {:?}", other),
    }
}

// =============================================================================
// Throttling
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_duration_recorded_after_every_outcome() {
    for reply in [
        Reply::Envelope(SUCCESS),
        Reply::Envelope(SIGNATURE_FAILURE),
        Reply::Envelope("{}"),
        Reply::Transport(TransportErrorKind::Network),
    ] {
        let provider = MockProvider::new(reply, Duration::from_millis(70));
        let gateway = gateway(provider);

        let _ = gateway.translate_en_to_zh("hello").await;
        assert_eq!(
            gateway.limiter().last_call_duration().await,
            Duration::from_millis(70)
        );

        // the next call sees the recorded duration
        let start = Instant::now();
        let _ = gateway.translate_en_to_zh("hello").await;
        // 200 - 70 + 5 of throttling, then the call itself
        assert_eq!(start.elapsed(), Duration::from_millis(205));
    }
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_calls_still_throttle() {
    let provider = MockProvider::new(Reply::Envelope(SUCCESS), Duration::from_secs(1));
    let gateway = gateway(provider.clone());

    let budget = Duration::from_millis(10);
    assert!(timeout(budget, gateway.translate_en_to_zh("a")).await.is_err());
    assert_eq!(gateway.limiter().last_call_duration().await, budget);

    assert!(timeout(budget * 50, gateway.translate_en_to_zh("b")).await.is_err());

    let starts = provider.started_at();
    assert_eq!(starts.len(), 2);
    assert!(starts[1] - starts[0] >= INTERVAL);
}

#[tokio::test(start_paused = true)]
async fn test_aborted_task_still_throttles() {
    let provider = MockProvider::new(Reply::Envelope(SUCCESS), Duration::from_secs(1));
    let gateway = gateway(provider.clone());

    let task = {
        let gateway = gateway.clone();
        tokio::spawn(async move { gateway.translate_en_to_zh("a").await })
    };
    tokio::time::sleep(Duration::from_millis(30)).await;
    task.abort();
    assert!(task.await.unwrap_err().is_cancelled());

    assert_eq!(gateway.limiter().last_call_duration().await, Duration::from_millis(30));
}

#[tokio::test(start_paused = true)]
async fn test_slow_calls_are_not_throttled() {
    let provider = MockProvider::new(Reply::Envelope(SUCCESS), Duration::from_millis(300));
    let gateway = gateway(provider);

    let start = Instant::now();
    for _ in 0..3 {
        gateway.translate_en_to_zh("hello").await.unwrap();
    }
    assert_eq!(start.elapsed(), Duration::from_millis(900));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_calls_respect_rate() {
    const N: u32 = 6;

    let provider = MockProvider::new(Reply::Envelope(SUCCESS), Duration::ZERO);
    let gateway = gateway(provider.clone());

    let start = Instant::now();
    let handles: Vec<_> = (0..N)
        .map(|i| {
            let gateway = gateway.clone();
            tokio::spawn(async move { gateway.translate_en_to_zh(&format!("text {}", i)).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(provider.calls(), N as usize);
    assert!(start.elapsed() >= INTERVAL * (N - 1));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_is_reported() {
    let provider = MockProvider::new(Reply::Envelope(SUCCESS), Duration::from_secs(5));
    let gateway = gateway(provider);

    let token = tokio_util::sync::CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        trigger.cancel();
    });

    let err = gateway
        .translate_with_cancel(Lang::En, Lang::Zh, "hello", &token)
        .await
        .unwrap_err();
    assert!(matches!(err, TranslationError::Cancelled));
}
