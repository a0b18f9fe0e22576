/// 比例顯示文字：0 顯示為 "-"，其餘四捨五入為百分比
pub fn percent_text(ratio: f64) -> String {
    if ratio == 0.0 || ratio.is_nan() {
        return "-".to_string();
    }
    format!("{}%", (100.0 * ratio).round() as i64)
}

/// Bounded percent slider feeding ratios into the rebalancer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderInput {
    step: u32,
}

impl SliderInput {
    pub const MAX_PERCENT: u32 = 100;

    pub fn new(step: u32) -> Self {
        Self {
            step: step.clamp(1, Self::MAX_PERCENT),
        }
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    /// Clamp a raw percent to `0..=100`, snap it to the step and return the ratio.
    pub fn to_ratio(&self, percent: f64) -> f64 {
        if percent.is_nan() {
            return 0.0;
        }
        let max = f64::from(Self::MAX_PERCENT);
        let clamped = percent.clamp(0.0, max);
        let step = f64::from(self.step);
        let snapped = ((clamped / step).round() * step).min(max);
        snapped / max
    }
}

impl Default for SliderInput {
    fn default() -> Self {
        Self::new(5)
    }
}
