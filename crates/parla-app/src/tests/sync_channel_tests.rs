use std::time::Duration;

use parla_types::{AppEvent, TextSource};
use tokio::time::timeout;

use crate::io::forward;

#[tokio::test]
async fn test_forward_from_sync_callback() {
    let (tx, rx) = kanal::unbounded_async::<AppEvent>();

    // Watchers call back from sync code; forwarding must not block them
    let on_text = move |text: String| {
        tracing::debug!("Sync callback: forwarding");
        forward(&tx, text, TextSource::Clipboard);
        tracing::debug!("Sync callback: returned immediately");
    };

    on_text("olá".to_string());

    let result = timeout(Duration::from_secs(2), rx.recv()).await;

    match result {
        Ok(Ok(AppEvent::RawTextInput { text, source })) => {
            assert_eq!(text, "olá");
            assert_eq!(source, TextSource::Clipboard);
        }
        Ok(Ok(_)) => panic!("Wrong event type"),
        Ok(Err(e)) => panic!("Channel error: {}", e),
        Err(_) => panic!("Timeout - forward from sync context failed!"),
    }
}

#[tokio::test]
async fn test_forward_keeps_order_per_source() {
    let (tx, rx) = kanal::unbounded_async::<AppEvent>();

    forward(&tx, "first".to_string(), TextSource::Websocket);
    tokio::time::sleep(Duration::from_millis(50)).await;
    forward(&tx, "second".to_string(), TextSource::Websocket);

    let mut received = Vec::new();
    for _ in 0..2 {
        match timeout(Duration::from_secs(2), rx.recv()).await {
            Ok(Ok(AppEvent::RawTextInput { text, .. })) => received.push(text),
            other => panic!("unexpected: {:?}", other.map(|r| r.is_ok())),
        }
    }

    assert_eq!(received, vec!["first", "second"]);
}

#[tokio::test]
async fn test_forward_after_receiver_dropped_does_not_panic() {
    let (tx, rx) = kanal::unbounded_async::<AppEvent>();
    drop(rx);

    forward(&tx, "lost".to_string(), TextSource::Speech);
    tokio::time::sleep(Duration::from_millis(50)).await;
}
