//! Core types for the element resolver and frame locator.

use serde::{Deserialize, Serialize};

/// Which part of an [`soulbrowser_core_types::ElementDescriptor`] produced a
/// successful match, kept for diagnostics and step reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionStrategy {
    /// `uniqueSelector` resolved on the first try.
    UniqueSelector,
    /// One of the `xpath` fallbacks resolved, at the given index.
    XPath(usize),
}

impl ResolutionStrategy {
    pub fn name(&self) -> String {
        match self {
            ResolutionStrategy::UniqueSelector => "uniqueSelector".to_string(),
            ResolutionStrategy::XPath(index) => format!("xpath[{index}]"),
        }
    }

    pub fn is_xpath(&self) -> bool {
        matches!(self, ResolutionStrategy::XPath(_))
    }
}

/// A resolved element: the selector the interpreter should operate on, and
/// which candidate in the descriptor it came from.
#[derive(Debug, Clone)]
pub struct ResolvedElement {
    pub selector: String,
    pub strategy: ResolutionStrategy,
}
