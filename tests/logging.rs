use std::sync::{ Mutex, OnceLock };
use std::time::Duration;

use axum::body::Bytes;
use axum::http::StatusCode;
use chat_relay::config::RelayConfig;
use chat_relay::relay::Relay;
use log::{ Level, LevelFilter, Log, Metadata, Record };
use wiremock::matchers::{ method, path };
use wiremock::{ Mock, MockServer, ResponseTemplate };

/// Keeps every record so tests can assert on what operators would see.
struct CapturingLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut records) = self.records.lock() {
            records.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

fn logger() -> &'static CapturingLogger {
    static LOGGER: OnceLock<&'static CapturingLogger> = OnceLock::new();
    LOGGER.get_or_init(|| {
        let logger: &'static CapturingLogger = Box::leak(
            Box::new(CapturingLogger { records: Mutex::new(Vec::new()) })
        );
        log::set_logger(logger).expect("logger installed once");
        log::set_max_level(LevelFilter::Trace);
        logger
    })
}

#[tokio::test]
async fn upstream_error_body_is_logged_but_not_returned() {
    let logger = logger();

    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(1)
        .mount(&upstream).await;

    let relay = Relay::new(RelayConfig::new(&upstream.uri(), Duration::from_secs(5)).unwrap()).unwrap();
    let response = relay
        .relay_chat(Ok(Bytes::from_static(br#"{"messages":[{"role":"user","content":"hi"}]}"#))).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(!String::from_utf8_lossy(&bytes).contains("overloaded"));

    let records = logger.records.lock().unwrap();
    assert!(
        records.iter().any(|(level, msg)| *level == Level::Error && msg.contains("overloaded")),
        "no error record mentions the upstream body: {:?}",
        *records
    );
}
