#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::struct_excessive_bools
)]
mod category;
mod item;
mod matching;

pub use category::*;
pub use item::*;
pub use matching::*;
