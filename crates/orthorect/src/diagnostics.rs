//! Decomposition diagnostics: timing and counts for each peel pass.
//!
//! [`Decomposer::decompose_with_diagnostics`] runs the normal
//! decomposition and records one [`IterationDiagnostics`] per pass plus a
//! [`DecomposeSummary`] for the whole call.
//!
//! Timing goes through the [`Clock`] trait so the core crate stays free
//! of platform assumptions. [`WebTimeClock`] is the default
//! implementation; it uses the `web-time` crate, which maps to
//! `performance.now()` on WASM and `std::time::Instant` on native.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::decompose::{Decomposer, Step};
use crate::extract::ExtractStrategy;
use crate::kernel::GeometryKernel;
use crate::rectangle::Rectangle;
use crate::types::{DecomposeError, Polygon};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Source of monotonic timestamps.
pub trait Clock {
    /// Opaque timestamp type.
    type Instant;

    /// Current timestamp.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// [`Clock`] backed by [`web_time::Instant`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WebTimeClock;

impl Clock for WebTimeClock {
    type Instant = web_time::Instant;

    fn now(&self) -> web_time::Instant {
        web_time::Instant::now()
    }

    fn elapsed(&self, since: &web_time::Instant) -> Duration {
        since.elapsed()
    }
}

/// Diagnostics collected from a single decomposition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecomposeDiagnostics {
    /// One entry per peel pass, in extraction order.
    pub iterations: Vec<IterationDiagnostics>,
    /// Total wall-clock duration of the call (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts across all passes.
    pub summary: DecomposeSummary,
}

/// Diagnostics for one pass of the peel loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationDiagnostics {
    /// Zero-based pass index.
    pub iteration: usize,
    /// Wall-clock duration of this pass (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Distinct vertices in the working ring after cleaning.
    pub vertex_count: usize,
    /// Collinear vertices removed at the start of the pass.
    pub collinear_removed: usize,
    /// Scan that found the rectangle; `None` for the final remainder.
    pub strategy: Option<ExtractStrategy>,
    /// Area of the emitted rectangle.
    pub rectangle_area: f64,
    /// Area left to decompose after the pass.
    pub remaining_area: f64,
}

/// High-level summary counts for a decomposition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecomposeSummary {
    /// Distinct vertices in the input exterior ring.
    pub input_vertex_count: usize,
    /// Absolute area of the input polygon.
    pub input_area: f64,
    /// Number of rectangles produced.
    pub rectangle_count: usize,
    /// Rectangles found by `search3`.
    pub triple_count: usize,
    /// Rectangles found by the `search2` fallback.
    pub pair_count: usize,
    /// Collinear vertices removed across all passes.
    pub collinear_removed: usize,
}

impl<K: GeometryKernel> Decomposer<K> {
    /// [`decompose`](Self::decompose) with per-pass timing and counts.
    ///
    /// # Errors
    ///
    /// Same as [`decompose`](Self::decompose). No diagnostics are returned
    /// for a failed call.
    pub fn decompose_with_diagnostics<C: Clock>(
        &self,
        polygon: &Polygon,
        clock: &C,
    ) -> Result<(Vec<Rectangle>, DecomposeDiagnostics), DecomposeError> {
        let start = clock.now();
        let mut lap = clock.now();
        let mut iterations = Vec::new();

        let rectangles = self.decompose_observed(polygon, |step: &Step| {
            iterations.push(IterationDiagnostics {
                iteration: step.iteration,
                duration: clock.elapsed(&lap),
                vertex_count: step.vertex_count,
                collinear_removed: step.collinear_removed,
                strategy: step.strategy,
                rectangle_area: step.rectangle.area(),
                remaining_area: step.remaining_area,
            });
            lap = clock.now();
        })?;

        let total_duration = clock.elapsed(&start);
        let count = |s: ExtractStrategy| {
            iterations
                .iter()
                .filter(|it| it.strategy == Some(s))
                .count()
        };
        let summary = DecomposeSummary {
            input_vertex_count: polygon.exterior.vertex_count(),
            input_area: self.kernel().signed_area(&polygon.exterior).abs(),
            rectangle_count: rectangles.len(),
            triple_count: count(ExtractStrategy::Triple),
            pair_count: count(ExtractStrategy::Pair),
            collinear_removed: iterations.iter().map(|it| it.collinear_removed).sum(),
        };

        Ok((
            rectangles,
            DecomposeDiagnostics {
                iterations,
                total_duration,
                summary,
            },
        ))
    }
}

impl DecomposeDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "Decomposition Diagnostics Report\n{}",
            "=".repeat(60)
        ));
        lines.push(format!(
            "Input: {} vertices, area {:.3}",
            self.summary.input_vertex_count, self.summary.input_area,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<8} {:>10} {:>10}  {}",
            "Pass", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);
        for it in &self.iterations {
            let ms = duration_ms(it.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_iteration(it);
            lines.push(format!(
                "{:<8} {ms:>8.3}ms {pct:>9.1}%  {details}",
                it.iteration
            ));
        }

        lines.push(String::new());
        lines.push(format!(
            "Rectangles: {}  |  search3: {}  search2: {}  |  Collinear removed: {}",
            self.summary.rectangle_count,
            self.summary.triple_count,
            self.summary.pair_count,
            self.summary.collinear_removed,
        ));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format one pass into a compact detail string.
fn format_iteration(it: &IterationDiagnostics) -> String {
    let source = it
        .strategy
        .map_or_else(|| "final".to_string(), |s| s.to_string());
    format!(
        "{source:<8} {} vertices (-{} collinear) rect={:.3} remaining={:.3}",
        it.vertex_count, it.collinear_removed, it.rectangle_area, it.remaining_area,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::types::{DecomposeConfig, Point};

    /// Advances one millisecond per `now()` call.
    struct TickClock {
        ticks: Cell<u64>,
    }

    impl TickClock {
        const fn new() -> Self {
            Self {
                ticks: Cell::new(0),
            }
        }
    }

    impl Clock for TickClock {
        type Instant = u64;

        fn now(&self) -> u64 {
            let t = self.ticks.get();
            self.ticks.set(t + 1);
            t
        }

        fn elapsed(&self, since: &u64) -> Duration {
            Duration::from_millis(self.ticks.get() - since)
        }
    }

    fn l_shape() -> Polygon {
        Polygon::from_vertices(vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 2.0),
            Point::new(2.0, 2.0),
            Point::new(2.0, 4.0),
            Point::new(0.0, 4.0),
        ])
    }

    #[test]
    fn duration_ms_converts_correctly() {
        let d = Duration::from_millis(1234);
        let ms = duration_ms(d);
        assert!((ms - 1234.0).abs() < 0.01);
    }

    #[test]
    fn diagnostics_track_each_pass() {
        let decomposer = Decomposer::new(DecomposeConfig::default()).unwrap();
        let (rects, diag) = decomposer
            .decompose_with_diagnostics(&l_shape(), &TickClock::new())
            .unwrap();

        assert_eq!(rects, decomposer.decompose(&l_shape()).unwrap());
        assert_eq!(diag.iterations.len(), 2);
        assert_eq!(diag.iterations[0].collinear_removed, 1);
        assert_eq!(diag.iterations[0].strategy, Some(ExtractStrategy::Triple));
        assert!((diag.iterations[0].rectangle_area - 8.0).abs() < 1e-9);
        assert_eq!(diag.iterations[1].strategy, None);

        assert_eq!(diag.summary.input_vertex_count, 7);
        assert!((diag.summary.input_area - 12.0).abs() < 1e-9);
        assert_eq!(diag.summary.rectangle_count, 2);
        assert_eq!(diag.summary.triple_count, 1);
        assert_eq!(diag.summary.pair_count, 0);
        assert_eq!(diag.summary.collinear_removed, 1);
    }

    #[test]
    fn durations_come_from_the_clock() {
        let decomposer = Decomposer::new(DecomposeConfig::default()).unwrap();
        let (_, diag) = decomposer
            .decompose_with_diagnostics(&l_shape(), &TickClock::new())
            .unwrap();
        for it in &diag.iterations {
            assert_eq!(it.duration, Duration::from_millis(1));
        }
        assert_eq!(diag.total_duration, Duration::from_millis(4));
    }

    #[test]
    fn failed_call_returns_only_the_error() {
        let decomposer = Decomposer::new(DecomposeConfig::default()).unwrap();
        let mut holed = l_shape();
        holed.holes.push(l_shape().exterior);
        let result = decomposer.decompose_with_diagnostics(&holed, &WebTimeClock);
        assert!(matches!(
            result,
            Err(DecomposeError::UnsupportedShape { .. })
        ));
    }

    #[test]
    fn report_lists_passes_and_totals() {
        let decomposer = Decomposer::new(DecomposeConfig::default()).unwrap();
        let (_, diag) = decomposer
            .decompose_with_diagnostics(&l_shape(), &TickClock::new())
            .unwrap();
        let report = diag.report();
        assert!(report.contains("Decomposition Diagnostics Report"));
        assert!(report.contains("search3"));
        assert!(report.contains("final"));
        assert!(report.contains("Rectangles: 2"));
    }

    #[test]
    fn iteration_line_names_the_strategy() {
        let mut it = IterationDiagnostics {
            iteration: 0,
            duration: Duration::from_millis(1),
            vertex_count: 12,
            collinear_removed: 0,
            strategy: Some(ExtractStrategy::Pair),
            rectangle_area: 1.0,
            remaining_area: 4.0,
        };
        assert!(format_iteration(&it).starts_with("search2"));
        it.strategy = None;
        assert!(format_iteration(&it).starts_with("final"));
    }

    #[test]
    fn report_counts_pair_scans() {
        let plus = Polygon::from_vertices(
            [
                (1.0, 0.0),
                (2.0, 0.0),
                (2.0, 1.0),
                (3.0, 1.0),
                (3.0, 2.0),
                (2.0, 2.0),
                (2.0, 3.0),
                (1.0, 3.0),
                (1.0, 2.0),
                (0.0, 2.0),
                (0.0, 1.0),
                (1.0, 1.0),
            ]
            .iter()
            .map(|&(x, y)| Point::new(x, y))
            .collect(),
        );
        let decomposer = Decomposer::new(DecomposeConfig::default()).unwrap();
        let (_, diag) = decomposer
            .decompose_with_diagnostics(&plus, &TickClock::new())
            .unwrap();
        assert_eq!(diag.iterations[0].strategy, Some(ExtractStrategy::Pair));
        assert_eq!(diag.summary.pair_count, 1);
        assert!(diag.report().contains("search2"));
    }

    #[test]
    fn diagnostics_json_round_trip() {
        let decomposer = Decomposer::new(DecomposeConfig::default()).unwrap();
        let (_, diag) = decomposer
            .decompose_with_diagnostics(&l_shape(), &TickClock::new())
            .unwrap();
        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"total_duration\":0.004"));
        let back: DecomposeDiagnostics = serde_json::from_str(&json).unwrap();
        assert_eq!(back.iterations.len(), 2);
        assert_eq!(back.total_duration, diag.total_duration);
    }
}
