//! Lists documents and test-merges one of them.
//!
//! Reads credentials from `WEBMERGE_KEY` and `WEBMERGE_SECRET`, and the
//! document to merge from `WEBMERGE_DOCUMENT_ID` / `WEBMERGE_DOCUMENT_KEY`.
//!
//! Run with: `cargo run --example merge_document`

use serde_json::json;
use webmerge::{Client, Error, MergeOptions, WebMergeApi};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("webmerge=debug,merge_document=info")
        .init();

    let key = std::env::var("WEBMERGE_KEY").unwrap_or_default();
    let secret = std::env::var("WEBMERGE_SECRET").unwrap_or_default();
    let client = Client::new(key, secret)?;

    println!("=== Callback style ===");
    let (tx, rx) = tokio::sync::oneshot::channel();
    client.list_documents(None, move |outcome| {
        let _ = tx.send(outcome);
    });
    match rx.await {
        Ok(Ok(documents)) => println!("Documents: {}", documents),
        Ok(Err(e)) => println!("Listing failed: {}", e),
        Err(_) => println!("Listing was dropped"),
    }
    println!();

    println!("=== Async style ===");
    let client = client.into_async();
    let id = std::env::var("WEBMERGE_DOCUMENT_ID").unwrap_or_else(|_| "1".to_string());
    let document_key = std::env::var("WEBMERGE_DOCUMENT_KEY").unwrap_or_default();

    let merged = client
        .merge_document(
            &id,
            &document_key,
            json!({ "customer": "Ada Lovelace", "total": "12.00" }),
            MergeOptions::new().test(true),
        )
        .await;

    match merged {
        Ok(body) => println!("Merged: {}", body),
        Err(Error::Application { message, .. }) => println!("WebMerge said: {}", message),
        Err(e) => println!("Merge failed: {}", e),
    }

    Ok(())
}
