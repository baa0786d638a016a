//! The lookup cycle: current conditions, then forecast, then chart.

use parking_lot::Mutex;
use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};
use tracing::{debug, info, instrument, warn};

use crate::{
    backend::{BackendError, WeatherBackend},
    chart::{ChartRenderer, ChartSeries},
    clock::{Clock, SystemClock},
    render::{RenderTarget, format_clock, render_current},
};

pub const NOT_FOUND_FALLBACK: &str = "City not found!";

/// Why a lookup cycle ended early. `Display` is the banner text.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("{0}")]
    NotFound(String),

    #[error("No forecast data available.")]
    ForecastUnavailable { status: u16 },

    #[error("Network error!")]
    Network(#[source] BackendError),
}

impl LookupError {
    fn from_current(err: BackendError) -> Self {
        match err {
            BackendError::Status { message, .. } => Self::NotFound(
                message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| NOT_FOUND_FALLBACK.to_string()),
            ),
            other => Self::Network(other),
        }
    }

    fn from_forecast(err: BackendError) -> Self {
        match err {
            BackendError::Status { status, .. } => Self::ForecastUnavailable { status },
            other => Self::Network(other),
        }
    }
}

/// How a call to [`WeatherView::lookup_and_render`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Blank city; nothing was touched.
    Skipped,
    Rendered,
    NotFound,
    ForecastUnavailable,
    NetworkError,
    /// A newer lookup started before this one finished; its remaining writes were dropped.
    Superseded,
}

impl From<&LookupError> for LookupOutcome {
    fn from(err: &LookupError) -> Self {
        match err {
            LookupError::NotFound(_) => Self::NotFound,
            LookupError::ForecastUnavailable { .. } => Self::ForecastUnavailable,
            LookupError::Network(_) => Self::NetworkError,
        }
    }
}

#[derive(Debug)]
struct Superseded;

enum CycleError {
    Lookup(LookupError),
    Superseded,
}

impl From<LookupError> for CycleError {
    fn from(err: LookupError) -> Self {
        Self::Lookup(err)
    }
}

impl From<Superseded> for CycleError {
    fn from(_: Superseded) -> Self {
        Self::Superseded
    }
}

struct Surface<R, C: ChartRenderer> {
    target: R,
    charts: C,
    chart: Option<C::Handle>,
}

impl<R: RenderTarget, C: ChartRenderer> Surface<R, C> {
    /// Destroys the live chart, if any, before drawing the new one.
    fn replace_chart(&mut self, series: &ChartSeries) {
        if let Some(previous) = self.chart.take() {
            self.charts.destroy(previous);
        }
        self.chart = Some(self.charts.render(series));
    }
}

/// Looks up a city and renders the result into a render target and a chart.
///
/// Lookups take `&self` and may overlap. Each one draws a sequence token;
/// only the holder of the latest token writes, so a superseded lookup
/// stops at its next step instead of mixing its city into the display.
pub struct WeatherView<B, R, C: ChartRenderer> {
    backend: B,
    clock: Arc<dyn Clock>,
    sequence: AtomicU64,
    surface: Mutex<Surface<R, C>>,
}

impl<B, R, C> WeatherView<B, R, C>
where
    B: WeatherBackend,
    R: RenderTarget,
    C: ChartRenderer,
{
    pub fn new(backend: B, target: R, charts: C) -> Self {
        Self {
            backend,
            clock: Arc::new(SystemClock),
            sequence: AtomicU64::new(0),
            surface: Mutex::new(Surface {
                target,
                charts,
                chart: None,
            }),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Runs `f` against the render target and chart renderer.
    pub fn with_surface<T>(&self, f: impl FnOnce(&R, &C) -> T) -> T {
        let surface = self.surface.lock();
        f(&surface.target, &surface.charts)
    }

    /// Writes the current local time and date into the clock region.
    pub fn render_clock(&self) {
        let (time, date) = format_clock(self.clock.now());
        self.surface.lock().target.set_clock(&time, &date);
    }

    #[instrument(skip(self), fields(seq = tracing::field::Empty))]
    pub async fn lookup_and_render(&self, city: &str) -> LookupOutcome {
        let city = city.trim();
        if city.is_empty() {
            debug!("blank city, nothing to look up");
            return LookupOutcome::Skipped;
        }

        let token = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::Span::current().record("seq", token);

        let outcome = match self.run_cycle(token, city).await {
            Ok(()) => {
                info!(city, "lookup rendered");
                LookupOutcome::Rendered
            }
            Err(CycleError::Superseded) => {
                debug!(city, "newer lookup started, dropping results");
                return LookupOutcome::Superseded;
            }
            Err(CycleError::Lookup(err)) => {
                match &err {
                    LookupError::Network(cause) => warn!(city, %cause, "lookup failed"),
                    LookupError::ForecastUnavailable { status } => {
                        info!(city, status = *status, "forecast unavailable")
                    }
                    LookupError::NotFound(banner) => info!(city, %banner, "city not found"),
                }
                let outcome = LookupOutcome::from(&err);
                if self
                    .apply(token, |s| s.target.show_error(&err.to_string()))
                    .is_err()
                {
                    return LookupOutcome::Superseded;
                }
                outcome
            }
        };

        match self.apply(token, |s| s.target.set_loading(false)) {
            Ok(()) => outcome,
            Err(Superseded) => LookupOutcome::Superseded,
        }
    }

    async fn run_cycle(&self, token: u64, city: &str) -> Result<(), CycleError> {
        self.apply(token, |s| {
            s.target.hide_error();
            s.target.set_loading(true);
        })?;

        let current = self
            .backend
            .current(city)
            .await
            .map_err(LookupError::from_current)?;

        self.apply(token, |s| render_current(&mut s.target, &current))?;

        let forecast = self
            .backend
            .forecast(city)
            .await
            .map_err(LookupError::from_forecast)?;

        let today = self.clock.today();
        let series = ChartSeries::same_day(&forecast, today).map_err(LookupError::Network)?;
        let range = series.range();
        if range.is_none() {
            debug!(city, %today, "no forecast samples for today");
        }

        self.apply(token, |s| {
            s.replace_chart(&series);
            match range {
                Some(r) => s
                    .target
                    .set_range_labels(Some((&r.low_label(), &r.high_label()))),
                None => s.target.set_range_labels(None),
            }
        })?;

        Ok(())
    }

    /// Runs `f` only while `token` is still the latest lookup.
    fn apply<T>(
        &self,
        token: u64,
        f: impl FnOnce(&mut Surface<R, C>) -> T,
    ) -> Result<T, Superseded> {
        let mut surface = self.surface.lock();
        if self.sequence.load(Ordering::SeqCst) != token {
            return Err(Superseded);
        }
        Ok(f(&mut surface))
    }
}

impl<B: fmt::Debug, R, C: ChartRenderer> fmt::Debug for WeatherView<B, R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherView")
            .field("backend", &self.backend)
            .field("clock", &self.clock)
            .field("sequence", &self.sequence.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
