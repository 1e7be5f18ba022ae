pub mod trade_log;

pub use trade_log::{DashboardSummary, LogRow, PersistenceError, TradeLog};
