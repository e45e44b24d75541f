use std::sync::Arc;

use bitacora::{NullRenderer, PeriodToken, PipelineController};
use bitacora_demos::common::{bitacora_for, get_preset, initial_state};
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize a human-friendly tracing subscriber with env-based filtering.
    // Suggested: RUST_LOG=info,bitacora=trace,bitacora_sources=trace
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    // Sources (mock in CI when BITACORA_DEMOS_USE_MOCK is set) and orchestrator
    let preset = get_preset("chile")?;
    let bitacora = Arc::new(bitacora_for(&preset)?);
    let controller = PipelineController::new(bitacora, Arc::new(NullRenderer))
        .with_state(initial_state(&preset))?;

    // Load, recompute, widen
    controller.load().await?;
    controller.set_mode(bitacora::DisplayMode::DeltaPct)?;
    controller.set_period(PeriodToken::Y1).await?;

    Ok(())
}
