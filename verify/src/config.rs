/// Controls the verification decision rule.
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    /// Minimum cosine similarity for the top match to count as the
    /// same speaker. Tunable; validate against labeled data before
    /// tightening or loosening in production. Default: 0.75.
    pub threshold: f32,

    /// Number of neighbors requested per query. The decision rule
    /// only consumes the top-ranked match; a larger value aids
    /// diagnostics. Default: 1.
    pub top_k: usize,

    /// Source tag recorded in enrollment metadata (default: "enroll").
    pub source_tag: String,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            threshold: 0.75,
            top_k: 1,
            source_tag: "enroll".to_string(),
        }
    }
}

impl VerifyConfig {
    /// Zero/empty fields fall back to defaults.
    pub fn with_defaults(mut self) -> Self {
        if self.threshold == 0.0 {
            self.threshold = 0.75;
        }
        if self.top_k == 0 {
            self.top_k = 1;
        }
        if self.source_tag.is_empty() {
            self.source_tag = "enroll".to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_fields_fall_back() {
        let cfg = VerifyConfig {
            threshold: 0.0,
            top_k: 0,
            source_tag: String::new(),
        }
        .with_defaults();
        assert_eq!(cfg.threshold, 0.75);
        assert_eq!(cfg.top_k, 1);
        assert_eq!(cfg.source_tag, "enroll");
    }

    #[test]
    fn explicit_fields_kept() {
        let cfg = VerifyConfig {
            threshold: 0.6,
            top_k: 3,
            source_tag: "kiosk".into(),
        }
        .with_defaults();
        assert_eq!(cfg.threshold, 0.6);
        assert_eq!(cfg.top_k, 3);
        assert_eq!(cfg.source_tag, "kiosk");
    }
}
