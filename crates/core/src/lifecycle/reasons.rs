//! Configured reasons for losing an event.

use caterbook_shared::LifecycleConfig;

/// One accepted reason code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LostReason {
    /// Canonical code, as stored on the event.
    pub code: String,
    /// Whether the competitor must be named.
    pub requires_competitor: bool,
}

/// The list of reason codes a `lost` transition may use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LostReasonCatalog {
    reasons: Vec<LostReason>,
}

impl LostReasonCatalog {
    /// Creates a catalog from explicit reasons.
    #[must_use]
    pub fn new(reasons: Vec<LostReason>) -> Self {
        Self { reasons }
    }

    /// Creates a catalog from the lifecycle configuration.
    #[must_use]
    pub fn from_config(config: &LifecycleConfig) -> Self {
        Self::new(
            config
                .lost_reasons
                .iter()
                .map(|r| LostReason {
                    code: r.code.trim().to_string(),
                    requires_competitor: r.requires_competitor,
                })
                .collect(),
        )
    }

    /// Looks up a code, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn find(&self, code: &str) -> Option<&LostReason> {
        let code = code.trim();
        self.reasons
            .iter()
            .find(|r| r.code.eq_ignore_ascii_case(code))
    }

    /// All configured codes, in order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.reasons.iter().map(|r| r.code.as_str())
    }
}

impl Default for LostReasonCatalog {
    fn default() -> Self {
        Self::from_config(&LifecycleConfig::default())
    }
}
