//! Six-stage portfolio construction pipeline.
//!
//! The pipeline threads an immutable [`PipelineContext`] through the
//! ordered stages clean → normalize → score → select → analyze → optimize.
//! Each stage consumes the previous context by value and returns a new one;
//! re-entering an earlier stage drops every downstream result, so a context
//! can never hold a stale mix of old and new outputs.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod stage;
pub use stage::Stage;

mod params;
pub use params::RunParameters;

mod context;
pub use context::PipelineContext;

mod error;
pub use error::PipelineError;
