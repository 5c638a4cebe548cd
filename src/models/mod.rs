mod bar;
mod interval;

pub use bar::{Bar, CandleSeries};
pub use interval::Interval;
