use std::sync::Arc;

use bitacora::{DisplayMode, PeriodToken, PipelineController, SeriesKey};
use bitacora_demos::common::{TableRenderer, bitacora_for, get_preset, initial_state};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let preset = get_preset("global")?;
    let bitacora = Arc::new(bitacora_for(&preset)?);
    let controller = PipelineController::new(bitacora, Arc::new(TableRenderer))
        .with_state(initial_state(&preset))?;

    // A wide window first, so every narrower period is answered from cache.
    controller.set_period(PeriodToken::Y1).await?;
    let loads = controller.generation();

    for period in [PeriodToken::M6, PeriodToken::M3, PeriodToken::M1, PeriodToken::Ytd] {
        controller.set_period(period).await?;
    }
    println!("\nloads after narrowing: {}", controller.generation() - loads);

    // Lens and visibility changes never fetch.
    controller.set_mode(DisplayMode::DeltaPct)?;
    controller.toggle(SeriesKey::new("ewj"))?;

    // The widest window needs a new fetch.
    controller.set_period(PeriodToken::All).await?;
    println!("\nloads in total: {}", controller.generation());

    Ok(())
}
