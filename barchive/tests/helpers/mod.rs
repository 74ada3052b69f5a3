// Re-export helpers so tests can `use helpers::*;`
pub mod mock_exchange;

pub use mock_exchange::{KlineStep, ManualClock, ScriptedExchange, raw_kline};
