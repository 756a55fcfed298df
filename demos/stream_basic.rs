//! Consume the push-update event stream of a realtime tree database.
//!
//! Run with: cargo run --example stream_basic -- <base-url> [path]

use firetree::{FiretreeClient, FiretreeError, FnHandler, StreamPayload};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let base_url = args
        .next()
        .unwrap_or_else(|| "http://localhost:9000".to_string());
    let path = args.next();

    let client = FiretreeClient::new(&base_url)?;

    println!("streaming updates from {base_url} ...");
    let result = client
        .stream(
            FnHandler::new(|payload: StreamPayload| async move {
                println!(
                    "[{}] {}: {}",
                    payload.stream_id,
                    payload.event,
                    serde_json::Value::Object(payload.fields)
                );
            }),
            path.as_deref(),
            None,
        )
        .await;

    match result {
        Ok(()) => println!("server closed the stream"),
        Err(FiretreeError::StreamCancelled) => println!("stream cancelled by the server"),
        Err(FiretreeError::StreamAuthRevoked) => println!("credentials expired, reconnect with a fresh token"),
        Err(e) => eprintln!("stream failed: {e}"),
    }

    Ok(())
}
