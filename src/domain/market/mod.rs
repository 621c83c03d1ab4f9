pub mod candle;
pub mod interval;
pub mod swing;
pub mod symbol;

pub use candle::Candle;
pub use interval::{parse_interval_list, IntervalCode};
pub use swing::SwingPoints;
pub use symbol::{SymbolInfo, TickerPrice};
