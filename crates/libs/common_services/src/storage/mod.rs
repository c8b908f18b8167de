mod uploads;

pub use uploads::*;
