use std::sync::Arc;

use bitacora::{Bitacora, BitacoraError, ErrorNotice, RenderFrame, Renderer, SeriesKey};
use bitacora_core::{PipelineState, SeriesSource};
use bitacora_mock::MockSource;
use bitacora_sources::{
    HttpFetch, Preset, RealAdapter, chile_home, chile_tradfi, commodities, global_indices,
};

/// Returns true when demos should run against deterministic fixtures.
#[must_use]
pub fn use_mock() -> bool {
    std::env::var("BITACORA_DEMOS_USE_MOCK").is_ok()
}

// Fixture code behind each preset key.
fn mock_code(key: SeriesKey) -> &'static str {
    match key.as_str() {
        "usd" => "dolar",
        "ipsa" => "ech.us",
        "spy" => "spy.us",
        "ewg" => "ewg.us",
        "ewj" => "ewj.us",
        "gold" => "gld.us",
        "silver" => "slv.us",
        "copper" => "copx.us",
        "lithium" => "alb.us",
        other => other,
    }
}

/// Look up a dashboard by name (`chile`, `home`, `global`, `commodities`).
///
/// With `BITACORA_DEMOS_USE_MOCK` set, every live feed is swapped for the
/// matching fixture.
///
/// # Errors
/// Returns `InvalidArg` for an unknown dashboard name.
pub fn get_preset(name: &str) -> Result<Preset, BitacoraError> {
    let adapter: Arc<dyn HttpFetch> = Arc::new(RealAdapter::default());
    let mut preset = match name {
        "chile" => chile_tradfi(&adapter),
        "home" => chile_home(&adapter),
        "global" => global_indices(&adapter),
        "commodities" => commodities(&adapter),
        other => {
            return Err(BitacoraError::InvalidArg(format!(
                "unknown dashboard '{other}'"
            )));
        }
    };
    if use_mock() {
        println!("--- (Using Mock Sources for CI) ---");
        for s in &mut preset.series {
            s.source = Arc::new(MockSource::new(mock_code(s.key))) as Arc<dyn SeriesSource>;
        }
    }
    Ok(preset)
}

/// Build an orchestrator with every series of `preset` registered in legend
/// order, using the preset's alignment and granularity.
///
/// # Errors
/// Propagates builder validation errors.
pub fn bitacora_for(preset: &Preset) -> Result<Bitacora, BitacoraError> {
    preset
        .series
        .iter()
        .fold(Bitacora::builder(), |b, s| {
            b.with_source(s.key, s.meta.clone(), Arc::clone(&s.source))
        })
        .alignment(preset.alignment)
        .granularity(preset.granularity)
        .build()
}

/// Initial state of a dashboard: every series active, its default window and lens.
#[must_use]
pub fn initial_state(preset: &Preset) -> PipelineState {
    PipelineState::new(
        preset.series.iter().map(|s| s.key),
        preset.default_period,
        preset.default_mode,
    )
}

/// Renderer that prints a compact table to stdout.
#[derive(Debug, Default)]
pub struct TableRenderer;

impl Renderer for TableRenderer {
    fn loading(&self, state: &PipelineState) {
        println!("loading {} ({})...", state.period, state.mode);
    }

    fn publish(&self, frame: &RenderFrame) {
        println!(
            "\n## {} .. {} | {} | {} dates",
            frame.cutoff,
            frame.today,
            frame.state.mode,
            frame.axis.len()
        );
        println!("{:<18} | {:>12} | {:>12} | {:>6}", "Series", "First", "Last", "Points");
        println!("{:-<19}|{:-<14}|{:-<14}|{:-<7}", "", "", "", "");
        for s in frame.visible() {
            let first = s.plotted.first().map_or(f64::NAN, |p| p.value);
            let last = s.plotted.last().map_or(f64::NAN, |p| p.value);
            println!(
                "{:<18} | {:>12.2} | {:>12.2} | {:>6}",
                s.meta.label,
                first,
                last,
                s.plotted.len()
            );
        }
        for w in &frame.warnings {
            println!("warning: {}", w.user_message());
        }
    }

    fn error(&self, notice: &ErrorNotice) {
        let hint = if notice.retryable { " (retry may help)" } else { "" };
        println!("error: {}{hint}", notice.message);
    }
}
