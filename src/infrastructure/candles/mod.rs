pub mod kraken;
pub mod secondary;
pub mod symbols;
pub mod synthetic;

pub use kraken::KrakenCandleProvider;
pub use secondary::SecondaryCandleProvider;
pub use symbols::{static_symbol_table, KrakenPairDiscovery};
pub use synthetic::SyntheticCandleProvider;
