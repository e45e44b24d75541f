use std::sync::Arc;

use bitacora::PipelineController;
use bitacora_demos::common::{TableRenderer, bitacora_for, get_preset, initial_state};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Pick a dashboard; the first argument selects it.
    let name = std::env::args().nth(1).unwrap_or_else(|| "chile".to_string());
    let preset = get_preset(&name)?;
    println!("# {}", preset.title);

    // 2. Register its series and wire a renderer.
    let bitacora = Arc::new(bitacora_for(&preset)?);
    let controller = PipelineController::new(bitacora, Arc::new(TableRenderer))
        .with_state(initial_state(&preset))?;

    // 3. First load. A failed load has already been shown by the renderer.
    let Ok(frame) = controller.load().await else {
        return Ok(());
    };

    // 4. Tooltip for the most recent date on the chart.
    if let Some(last) = frame.axis.last() {
        println!("\nTooltip {last}:");
        for row in frame.tooltip(*last) {
            println!("  {:<18} {:>10.2}  (real {:.2})", row.label, row.plotted, row.real);
        }
    }

    Ok(())
}
