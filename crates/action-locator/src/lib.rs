//! Element Resolver & Frame Locator.
//!
//! - [`resolver`]: resolves an `ElementDescriptor` to a working selector,
//!   trying `uniqueSelector` before any `xpath` fallback.
//! - [`frame`]: resolves an action's target frame — the top page or a
//!   matching iframe — by origin + normalized path.

pub mod errors;
pub mod frame;
pub mod resolver;
pub mod types;

pub use errors::LocatorError;
pub use frame::{FrameLocator, FRAME_LOCATE_TIMEOUT};
pub use resolver::{lookup_expression, ElementResolver, DEFAULT_RESOLVE_TIMEOUT, ENSURE_CLICKABLE_TIMEOUT};
pub use types::{ResolutionStrategy, ResolvedElement};
