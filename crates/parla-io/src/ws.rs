use futures_util::StreamExt;
use tokio_tungstenite::connect_async;

/// Forward every text frame from `url` to `on_text` until the stream closes
pub async fn start_ws_listener<F>(url: &str, mut on_text: F) -> Result<(), anyhow::Error>
where
    F: FnMut(String) + Send + 'static,
{
    let (ws_stream, _) = connect_async(url).await?;
    tracing::info!("Connected to {}", url);
    let (_, mut read) = ws_stream.split();

    while let Some(msg) = read.next().await {
        match msg {
            Ok(msg) if msg.is_text() => {
                if let Ok(text) = msg.to_text()
                    && !text.trim().is_empty()
                {
                    on_text(text.to_string());
                }
            }
            Ok(msg) if msg.is_close() => break,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("WebSocket read failed: {}", e);
                break;
            }
        }
    }

    tracing::info!("WebSocket stream from {} ended", url);
    Ok(())
}
