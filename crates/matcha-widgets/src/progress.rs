//! Progress bar rendering a ratio as filled and empty glyphs.

/// Initial progress bar settings, consumed by [`Progress::new`].
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Bar width in display cells, not counting label or percentage.
    pub width: usize,
    pub filled: char,
    pub empty: char,
    /// Append the ratio as a percentage after the bar.
    pub show_percentage: bool,
    /// Optional text rendered before the bar.
    pub label: String,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        ProgressConfig {
            width: 40,
            filled: '█',
            empty: '░',
            show_percentage: true,
            label: String::new(),
        }
    }
}

/// A progress bar over a ratio in `0.0..=1.0`.
///
/// The bar is a plain render of its ratio. Applications that want motion
/// feed it from their own tick or from task progress messages:
///
/// ```rust,ignore
/// Message::Custom(Msg::Downloaded { done, total }) => {
///     self.bar.set_ratio(done as f64 / total as f64);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Progress {
    config: ProgressConfig,
    ratio: f64,
}

impl Progress {
    /// Create a bar at zero.
    pub fn new(config: ProgressConfig) -> Self {
        Progress { config, ratio: 0.0 }
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Set the ratio, clamped to `0.0..=1.0`. Non-finite values are ignored.
    pub fn set_ratio(&mut self, ratio: f64) {
        if ratio.is_finite() {
            self.ratio = ratio.clamp(0.0, 1.0);
        }
    }

    /// Move the ratio by a relative amount, e.g. `0.1` for ten percent.
    pub fn incr(&mut self, amount: f64) {
        if amount.is_finite() {
            self.set_ratio(self.ratio + amount);
        }
    }

    pub fn decr(&mut self, amount: f64) {
        self.incr(-amount);
    }

    pub fn is_done(&self) -> bool {
        self.ratio >= 1.0
    }

    pub fn view(&self) -> String {
        let cells = (self.ratio * self.config.width as f64).round() as usize;
        let cells = cells.min(self.config.width);

        let mut out = String::new();
        if !self.config.label.is_empty() {
            out.push_str(&self.config.label);
            out.push(' ');
        }
        for _ in 0..cells {
            out.push(self.config.filled);
        }
        for _ in cells..self.config.width {
            out.push(self.config.empty);
        }
        if self.config.show_percentage {
            out.push_str(&format!(" {:3.0}%", self.ratio * 100.0));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(width: usize) -> Progress {
        Progress::new(ProgressConfig {
            width,
            ..Default::default()
        })
    }

    #[test]
    fn starts_empty() {
        let p = bar(4);
        assert_eq!(p.view(), "░░░░   0%");
        assert!(!p.is_done());
    }

    #[test]
    fn full_bar() {
        let mut p = bar(4);
        p.set_ratio(1.0);
        assert_eq!(p.view(), "████ 100%");
        assert!(p.is_done());
    }

    #[test]
    fn half_rounds_to_cells() {
        let mut p = bar(4);
        p.set_ratio(0.5);
        assert_eq!(p.view(), "██░░  50%");
    }

    #[test]
    fn ratio_clamps_and_rejects_nan() {
        let mut p = bar(4);
        p.set_ratio(2.5);
        assert_eq!(p.ratio(), 1.0);
        p.set_ratio(-1.0);
        assert_eq!(p.ratio(), 0.0);
        p.set_ratio(f64::NAN);
        assert_eq!(p.ratio(), 0.0);
    }

    #[test]
    fn incr_and_decr_move_the_ratio() {
        let mut p = bar(10);
        p.incr(0.3);
        p.incr(0.3);
        assert!((p.ratio() - 0.6).abs() < 1e-9);
        p.decr(0.2);
        assert!((p.ratio() - 0.4).abs() < 1e-9);
        p.incr(f64::INFINITY);
        assert!((p.ratio() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn label_and_custom_glyphs() {
        let mut p = Progress::new(ProgressConfig {
            width: 4,
            filled: '#',
            empty: '-',
            show_percentage: false,
            label: "copying".to_string(),
        });
        p.set_ratio(0.75);
        assert_eq!(p.view(), "copying ###-");
    }
}
