use std::sync::Arc;
use std::time::Duration;

use bitacora::{Bitacora, FailurePolicy, PeriodToken, SeriesKey, SeriesMeta};
use bitacora_mock::MockSource;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // One healthy feed, one broken, one too slow for the configured timeout.
    let build = |policy: FailurePolicy| {
        Bitacora::builder()
            .with_source(
                SeriesKey::new("uf"),
                SeriesMeta::new("UF", "#63b3ed"),
                Arc::new(MockSource::new("uf")),
            )
            .with_source(
                SeriesKey::new("usd"),
                SeriesMeta::new("USD/CLP", "#f6ad55"),
                Arc::new(MockSource::new("FAIL")),
            )
            .with_source(
                SeriesKey::new("ipsa"),
                SeriesMeta::new("IPSA (ECH)", "#9f7aea"),
                Arc::new(MockSource::new("TIMEOUT")),
            )
            .source_timeout(Duration::from_millis(50))
            .failure_policy(policy)
            .build()
    };

    println!("## Degrade");
    let raw = build(FailurePolicy::Degrade)?
        .fetch_for(PeriodToken::M3)
        .await?;
    for (key, series) in &raw.series {
        println!("{:<6} {:>4} points", key.as_str(), series.len());
    }
    for w in &raw.warnings {
        println!("warning: {w}");
    }

    println!("\n## All or nothing");
    match build(FailurePolicy::AllOrNothing)?
        .fetch_for(PeriodToken::M3)
        .await
    {
        Ok(_) => println!("unexpected success"),
        Err(e) => {
            for inner in e.flatten() {
                println!("failed: {inner}");
            }
        }
    }

    Ok(())
}
