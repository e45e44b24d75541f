use bitacora_core::{BitacoraError, FailurePolicy, FetchWindow, PeriodToken, Series, SeriesKey};

use crate::Bitacora;
use crate::util::{collapse_errors, join_with_deadline};

/// Raw series of one load, before alignment. Cached by the controller so
/// state changes can be answered without re-fetching.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSnapshot {
    /// Window the sources were asked to cover.
    pub window: FetchWindow,
    /// One raw series per registered key, in registration order. A source that
    /// failed under the degrade policy contributes an empty series.
    pub series: Vec<(SeriesKey, Series)>,
    /// Per-source failures absorbed by the degrade policy.
    pub warnings: Vec<BitacoraError>,
}

impl RawSnapshot {
    /// Raw series for `key`.
    #[must_use]
    pub fn get(&self, key: SeriesKey) -> Option<&Series> {
        self.series.iter().find(|(k, _)| *k == key).map(|(_, s)| s)
    }

    /// Returns true if data fetched for this snapshot answers `window`.
    #[must_use]
    pub fn covers(&self, window: &FetchWindow) -> bool {
        self.window.covers(window)
    }
}

impl Bitacora {
    /// Window a load for `period` asks sources to cover, as of today.
    #[must_use]
    pub fn window_for(&self, period: PeriodToken) -> FetchWindow {
        FetchWindow::for_period(period, self.today(), self.cfg.all_horizon_years)
    }

    /// Fetch every registered series concurrently.
    ///
    /// Each source runs under its own `source_timeout`; the optional
    /// `request_timeout` bounds the whole fan-out.
    ///
    /// # Errors
    /// - `RequestTimeout` when the overall deadline expires.
    /// - Under `Degrade`: the collapsed failures when every source failed.
    /// - Under `AllOrNothing`: the collapsed failures when any source failed.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "bitacora::fetch::fetch_raw",
            skip(self),
            fields(start = %window.start, end = %window.end, sources = self.entries.len()),
        )
    )]
    pub async fn fetch_raw(&self, window: FetchWindow) -> Result<RawSnapshot, BitacoraError> {
        let timeout = self.cfg.source_timeout;
        let tasks = self.entries.iter().map(|e| {
            let source = e.source.clone();
            let key = e.key;
            async move {
                let res = Self::source_call_with_timeout(
                    key,
                    source.name(),
                    timeout,
                    source.fetch(&window),
                )
                .await;
                (key, res)
            }
        });
        let settled = join_with_deadline(tasks, self.cfg.request_timeout).await?;

        let mut series: Vec<(SeriesKey, Series)> = Vec::with_capacity(settled.len());
        let mut errors: Vec<BitacoraError> = Vec::new();
        for (key, res) in settled {
            match res {
                Ok(s) => series.push((key, s)),
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(series = %key, error = %e, "source failed; substituting empty series");
                    errors.push(e);
                    series.push((key, Series::empty()));
                }
            }
        }

        let all_failed = errors.len() == self.entries.len();
        let fail = match self.cfg.failure_policy {
            FailurePolicy::AllOrNothing => !errors.is_empty(),
            _ => all_failed,
        };
        if fail {
            return Err(collapse_errors(errors));
        }

        Ok(RawSnapshot {
            window,
            series,
            warnings: errors,
        })
    }

    /// Fetch the window a load for `period` needs.
    ///
    /// # Errors
    /// Same as [`fetch_raw`](Self::fetch_raw).
    pub async fn fetch_for(&self, period: PeriodToken) -> Result<RawSnapshot, BitacoraError> {
        self.fetch_raw(self.window_for(period)).await
    }
}
