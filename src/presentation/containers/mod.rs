pub mod header;
pub mod holdings;
pub mod overview;
pub mod performance;
pub mod system_status;
pub mod trade_log;

pub use header::Header;
pub use holdings::Holdings;
pub use overview::Overview;
pub use performance::Performance;
pub use system_status::SystemStatus;
pub use trade_log::TradeLog;
