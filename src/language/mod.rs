//! Target-language registry and language-code normalisation.
//!
//! * [`registry`]: the closed set of target languages offered in the UI,
//!   keyed by human-readable label.
//! * [`normalize`]: maps translation-engine codes to the dialect the
//!   speech-synthesis engine expects.

pub mod normalize;
pub mod registry;

pub use normalize::{to_synthesis_code, DEFAULT_SYNTHESIS_CODE};
pub use registry::{is_known, labels, resolve, NO_TRANSLATION};
