use std::fmt::Write as _;

/// Whether a span of the final timeline plays a segment or a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Segment,
    Transition,
}

/// A contiguous time interval of the final timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub start: f64,
    pub end: f64,
    pub kind: SpanKind,
}

/// The assembled timeline: segments alternating with an optional fixed-length
/// transition. Spans are contiguous and non-overlapping by construction.
#[derive(Debug, Clone)]
pub struct Timeline {
    spans: Vec<Span>,
}

impl Timeline {
    /// Build the timeline from measured segment durations and the (optional)
    /// transition duration inserted between every adjacent pair.
    pub fn from_durations(segment_durations: &[f64], transition_duration: Option<f64>) -> Self {
        let mut spans = Vec::new();
        let mut current = 0.0;

        for (i, &duration) in segment_durations.iter().enumerate() {
            spans.push(Span {
                start: current,
                end: current + duration,
                kind: SpanKind::Segment,
            });
            current += duration;

            if i + 1 < segment_durations.len() {
                if let Some(transition) = transition_duration {
                    spans.push(Span {
                        start: current,
                        end: current + transition,
                        kind: SpanKind::Transition,
                    });
                    current += transition;
                }
            }
        }

        Self { spans }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Total length of the final video.
    pub fn total_duration(&self) -> f64 {
        self.spans.last().map(|s| s.end).unwrap_or(0.0)
    }

    /// Sum of segment durations only, excluding transition time.
    pub fn segment_total(&self) -> f64 {
        self.spans
            .iter()
            .filter(|s| s.kind == SpanKind::Segment)
            .map(|s| s.end - s.start)
            .sum()
    }

    /// The `[start, end)` windows during which the presenter overlay must be
    /// visible: every segment span, in timeline order.
    pub fn overlay_windows(&self) -> Vec<(f64, f64)> {
        self.spans
            .iter()
            .filter(|s| s.kind == SpanKind::Segment)
            .map(|s| (s.start, s.end))
            .collect()
    }

    /// Enable predicate gating the presenter overlay per frame: an OR of
    /// `between(t, start, end)` tests, one per segment span.
    ///
    /// Returns `None` when the timeline holds no transitions: the overlay is
    /// then visible throughout and the trivial predicate is omitted.
    pub fn enable_expr(&self) -> Option<String> {
        if !self.spans.iter().any(|s| s.kind == SpanKind::Transition) {
            return None;
        }

        let mut expr = String::new();
        for (start, end) in self.overlay_windows() {
            if !expr.is_empty() {
                expr.push('+');
            }
            let _ = write!(expr, "between(t,{start},{end})");
        }
        Some(expr)
    }
}
