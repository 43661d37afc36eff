//! Per-paint-operation configuration.

/// Whether the painter supersamples and averages down, or rasterizes
/// directly at device resolution.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AntiAliasingMode {
    None,
    /// Supersample by the compositor's fixed scale factor
    /// ([`crate::coverage::SCALE`]) and average down.
    Default,
}

/// Polygon interior test.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

/// See the SVG specification.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LineJoin {
    Miter,
    Bevel,
    Round,
}

/// See the SVG specification.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Square,
    Round,
}

/// Options recognized by a fill or stroke paint operation.
///
/// Every field has a default; callers typically start from
/// [`PaintOptions::DEFAULT`] and override the handful of fields they care
/// about, mirroring fill/stroke options in the geometry pipeline this
/// crate's offset and join math is grounded on.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PaintOptions {
    pub anti_aliasing_mode: AntiAliasingMode,
    pub fill_rule: FillRule,
    pub line_width: f64,
    pub line_join: LineJoin,
    pub miter_limit: f64,
    pub line_cap: LineCap,
    pub tolerance: f64,
    /// Below this thickness, join/miter-limit/cap revert to
    /// `miter`/`10.0`/`butt` to avoid hairline join artifacts. Kept
    /// behind this flag rather than made unconditional, since the
    /// fallback is a stop-gap, worth dropping once thin-stroke
    /// artifacts are solved some other way.
    pub thin_stroke_fallback: bool,
}

impl PaintOptions {
    pub const MINIMUM_LINE_WIDTH: f64 = 1.0 / 256.0;
    pub const MINIMUM_TOLERANCE: f64 = 0.001;

    pub const DEFAULT_ANTI_ALIASING_MODE: AntiAliasingMode = AntiAliasingMode::Default;
    pub const DEFAULT_FILL_RULE: FillRule = FillRule::NonZero;
    pub const DEFAULT_LINE_WIDTH: f64 = 1.0;
    pub const DEFAULT_LINE_JOIN: LineJoin = LineJoin::Miter;
    pub const DEFAULT_MITER_LIMIT: f64 = 4.0;
    pub const DEFAULT_LINE_CAP: LineCap = LineCap::Butt;
    pub const DEFAULT_TOLERANCE: f64 = 0.1;

    pub const DEFAULT: Self = PaintOptions {
        anti_aliasing_mode: Self::DEFAULT_ANTI_ALIASING_MODE,
        fill_rule: Self::DEFAULT_FILL_RULE,
        line_width: Self::DEFAULT_LINE_WIDTH,
        line_join: Self::DEFAULT_LINE_JOIN,
        miter_limit: Self::DEFAULT_MITER_LIMIT,
        line_cap: Self::DEFAULT_LINE_CAP,
        tolerance: Self::DEFAULT_TOLERANCE,
        thin_stroke_fallback: true,
    };

    /// Line width below which [`PaintOptions::thin_stroke_fallback`]
    /// applies.
    pub const THIN_STROKE_THRESHOLD: f64 = 2.0;

    #[inline]
    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width.max(Self::MINIMUM_LINE_WIDTH);
        self
    }

    #[inline]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.max(Self::MINIMUM_TOLERANCE);
        self
    }

    #[inline]
    pub fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    #[inline]
    pub fn with_line_join(mut self, join: LineJoin) -> Self {
        self.line_join = join;
        self
    }

    #[inline]
    pub fn with_line_cap(mut self, cap: LineCap) -> Self {
        self.line_cap = cap;
        self
    }

    #[inline]
    pub fn with_miter_limit(mut self, limit: f64) -> Self {
        self.miter_limit = limit;
        self
    }

    #[inline]
    pub fn with_anti_aliasing_mode(mut self, mode: AntiAliasingMode) -> Self {
        self.anti_aliasing_mode = mode;
        self
    }
}

impl Default for PaintOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Dash pattern plus phase offset, consumed by [`crate::dasher::Dasher`].
#[derive(Clone, Debug, PartialEq)]
pub struct DashOptions {
    pub dashes: Vec<f64>,
    pub offset: f64,
}

impl DashOptions {
    /// A pattern is "active" iff it contains at least one strictly
    /// positive entry; `[0, 0]` (or an empty pattern) is inactive and
    /// means a plain, undashed stroke.
    pub fn is_active(&self) -> bool {
        self.dashes.iter().any(|&d| d > 0.0)
    }
}

impl Default for DashOptions {
    fn default() -> Self {
        DashOptions {
            dashes: Vec::new(),
            offset: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_named_defaults() {
        let o = PaintOptions::default();
        assert_eq!(o.line_width, PaintOptions::DEFAULT_LINE_WIDTH);
        assert_eq!(o.fill_rule, FillRule::NonZero);
        assert_eq!(o.line_join, LineJoin::Miter);
        assert_eq!(o.line_cap, LineCap::Butt);
    }

    #[test]
    fn line_width_clamps_to_minimum() {
        let o = PaintOptions::default().with_line_width(-5.0);
        assert_eq!(o.line_width, PaintOptions::MINIMUM_LINE_WIDTH);
    }

    #[test]
    fn tolerance_clamps_to_minimum() {
        let o = PaintOptions::default().with_tolerance(0.0);
        assert_eq!(o.tolerance, PaintOptions::MINIMUM_TOLERANCE);
    }

    #[test]
    fn empty_dash_pattern_is_inactive() {
        assert!(!DashOptions::default().is_active());
    }

    #[test]
    fn all_zero_dash_pattern_is_inactive() {
        let d = DashOptions { dashes: vec![0.0, 0.0], offset: 0.0 };
        assert!(!d.is_active());
    }

    #[test]
    fn dash_pattern_with_one_positive_entry_is_active() {
        let d = DashOptions { dashes: vec![0.0, 5.0], offset: 0.0 };
        assert!(d.is_active());
    }
}
