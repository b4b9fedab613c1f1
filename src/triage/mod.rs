//! The post-generation triage policy layer.
//!
//! A raw model response flows through [`extract::extract_report`] into a
//! [`CandidateReport`](crate::base::types::CandidateReport), and then through
//! [`policy::apply`], which re-derives severity and domain from the incident text.
//! Both steps are synchronous and free of side effects.

pub mod extract;
pub mod policy;
pub mod signals;

pub use extract::{ExtractionError, extract_report};
pub use policy::apply as enforce_policy;
