pub mod feeds;
pub mod market_clock;
pub mod performance;
pub mod sync;
pub mod trade_log;
pub mod view_models;

pub use market_clock::{ClockDisplay, MarketClockMode};
pub use sync::{LiveQuery, Liveness, Reconcile, SyncState, TableSpec};
pub use view_models::RenderState;
