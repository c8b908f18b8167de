#![deny(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

mod engine;
mod metadata;

pub use engine::*;
pub use metadata::*;
