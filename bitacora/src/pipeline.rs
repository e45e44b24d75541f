use std::collections::BTreeSet;

use chrono::NaiveDate;

use bitacora_core::{
    Alignment, AlignedSet, BitacoraError, PipelineState, Series, SeriesKey, cutoff,
    filter_since, forward_fill, intersect_aligned, merge_aligned, normalize, resample,
};

use crate::Bitacora;
use crate::fetch::RawSnapshot;
use crate::render::{RenderFrame, RenderedSeries};

impl Bitacora {
    /// Run Merge → Fill → Filter → Normalize over cached raw data.
    ///
    /// Under `Granularity::Monthly` each active series is first collapsed to
    /// its last value per month, dated the first of the month.
    ///
    /// Synchronous and deterministic: the same snapshot, state and date always
    /// produce the same frame. Inactive series appear in the frame with
    /// `visible == false` and no points.
    ///
    /// Per-series problems become warnings on the frame:
    /// - an active series with nothing left after the window → `NoDataInRange`;
    /// - a relative lens without a usable base → `DegenerateNormalization`,
    ///   and the series is shown in real values.
    ///
    /// # Errors
    /// - `NoDataInRange` when at least one series is active and none of them
    ///   has a point inside the window.
    /// - `NoDataInRange` under intersection alignment when the active series
    ///   share no date.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "bitacora::pipeline::run_pipeline",
            skip(self, raw),
            fields(period = %state.period, mode = %state.mode, active = state.active.len()),
        )
    )]
    pub fn run_pipeline(
        &self,
        raw: &RawSnapshot,
        state: &PipelineState,
    ) -> Result<RenderFrame, BitacoraError> {
        let today = self.today();
        let since = cutoff(state.period, today, self.cfg.all_horizon_years);

        let aligned = self.align_active(raw, state)?;

        let mut warnings: Vec<BitacoraError> = raw.warnings.clone();
        let mut series: Vec<RenderedSeries> = Vec::with_capacity(self.entries.len());
        for e in &self.entries {
            let visible = state.is_active(e.key);
            let mut out = RenderedSeries {
                key: e.key,
                meta: e.meta.clone(),
                visible,
                plotted: Series::empty(),
                real: Series::empty(),
                applied: state.mode,
                base: None,
            };
            if visible {
                let projected = aligned.get(e.key).cloned().unwrap_or_default();
                let filled = forward_fill(&projected, self.cfg.max_gap_days);
                let windowed = filter_since(&filled, since);
                if windowed.is_empty() {
                    warnings.push(BitacoraError::no_data(format!(
                        "{} for {}",
                        e.key, state.period
                    )));
                }
                let normalized = normalize(&windowed, state.mode);
                if !windowed.is_empty() && normalized.is_degenerate(state.mode) {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(series = %e.key, mode = %state.mode, "no usable base; showing real values");
                    warnings.push(BitacoraError::degenerate(e.key.as_str()));
                }
                out.applied = normalized.applied;
                out.base = normalized.base;
                out.plotted = normalized.series;
                out.real = windowed;
            }
            series.push(out);
        }

        if !state.active.is_empty() && series.iter().filter(|s| s.visible).all(|s| s.real.is_empty())
        {
            return Err(BitacoraError::no_data(format!(
                "every active series for {}",
                state.period
            )));
        }

        let axis: BTreeSet<NaiveDate> = series
            .iter()
            .filter(|s| s.visible)
            .flat_map(|s| s.plotted.dates())
            .collect();

        Ok(RenderFrame {
            state: state.clone(),
            cutoff: since,
            today,
            axis: axis.into_iter().collect(),
            series,
            warnings,
        })
    }

    fn align_active(
        &self,
        raw: &RawSnapshot,
        state: &PipelineState,
    ) -> Result<AlignedSet, BitacoraError> {
        let inputs: Vec<(SeriesKey, Series)> = self
            .entries
            .iter()
            .filter(|e| state.is_active(e.key))
            .map(|e| {
                let s = raw
                    .get(e.key)
                    .map(|s| resample(s, self.cfg.granularity))
                    .unwrap_or_default();
                (e.key, s)
            })
            .collect();
        let any_data = inputs.iter().any(|(_, s)| !s.is_empty());

        match self.cfg.alignment {
            Alignment::Intersection => {
                let aligned = intersect_aligned(inputs);
                if aligned.axis.is_empty() && any_data {
                    return Err(BitacoraError::no_data("common dates across active series"));
                }
                Ok(aligned)
            }
            _ => Ok(merge_aligned(inputs)),
        }
    }
}
