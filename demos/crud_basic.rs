//! Basic request/response usage against a realtime tree database.
//!
//! Run with: cargo run --example crud_basic -- <base-url>

use firetree::FiretreeClient;
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let base_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://localhost:9000".to_string());
    let client = FiretreeClient::new(&base_url)?;

    // Replace the value at app/users/1
    let written = client
        .put(&json!({"name": "ada", "age": 36}), Some("app/users/1"), None)
        .await?;
    println!("put -> {written}");

    // Merge a single field into it
    let patched = client
        .patch(&json!({"age": 37}), Some("app/users/1"), None)
        .await?;
    println!("patch -> {patched}");

    // Read it back
    let user = client.get(Some("app/users/1"), None).await?;
    println!("get -> {user}");

    // And remove it again
    let deleted = client.delete(Some("app/users/1"), None).await?;
    println!("delete -> {deleted}");

    client.close();
    Ok(())
}
