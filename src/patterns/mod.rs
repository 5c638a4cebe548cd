// Module exports
mod recognizer;
mod single_candle;
mod triple_candle;
pub mod utils;

// Public exports
pub use recognizer::{
    InvalidBarPolicy, PatternKind, PatternMatch, PatternRecognizer, RejectedBar, ScanReport,
};
pub use single_candle::is_hammer;
pub use triple_candle::is_three_white_soldiers;
