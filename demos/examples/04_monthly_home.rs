use std::sync::Arc;

use bitacora::{DisplayMode, PeriodToken, PipelineController};
use bitacora_demos::common::{TableRenderer, bitacora_for, get_preset, initial_state};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Monthly closes, common months only, rebased to 100.
    let preset = get_preset("home")?;
    println!("# {}", preset.title);

    let bitacora = Arc::new(bitacora_for(&preset)?);
    let controller = PipelineController::new(bitacora, Arc::new(TableRenderer))
        .with_state(initial_state(&preset))?;

    let Ok(frame) = controller.load().await else {
        return Ok(());
    };
    println!("\nmonths on the axis:");
    for day in &frame.axis {
        println!("  {day}");
    }

    // Same months in real values, then the whole cached year as Delta%.
    controller.set_mode(DisplayMode::Real)?;
    controller.set_mode(DisplayMode::DeltaPct)?;
    controller.set_period(PeriodToken::M6).await?;

    Ok(())
}
