//! Basic usage example for the tagstamp library.
//!
//! Prints the last-updated time of every tag in a public repository, first
//! through the high-level API and then step by step.
//!
//! Run with: cargo run --example basic_usage [REPOSITORY]

use libtagstamp::auth::Credentials;
use libtagstamp::client::Client;
use libtagstamp::registry::Registry;
use libtagstamp::{OnError, Tagstamp};
use std::ops::ControlFlow;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let repository = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "kubeflow-images-public/admission-webhook".to_string());

    // High-level: one call drives login, listing and every manifest
    let mut tagstamp = Tagstamp::builder()
        .registry_url("https://gcr.io")
        .repository(&repository)
        .on_error(OnError::Skip)
        .build()?;

    let summary = tagstamp
        .scan(|report| {
            println!("{}", report);
            ControlFlow::Continue(())
        })
        .await?;
    println!(
        "\n{} tags reported, {} skipped\n",
        summary.reported,
        summary.skipped.len()
    );

    // Low-level: the same steps by hand, for the first tag only
    let client = Client::new("https://gcr.io")?;
    let mut registry = Registry::new(client, repository, Credentials::Anonymous);
    registry.login().await?;

    let tags = registry.list_tags().await?;
    if let Some(tag) = tags.first() {
        let manifest = registry.get_manifest(tag).await?;
        println!(
            "{} has {} history entries, newest build {:?}",
            tag,
            manifest.history.len(),
            manifest.last_updated()
        );
    }

    Ok(())
}
