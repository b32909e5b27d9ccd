pub mod app;
pub mod components;
pub mod containers;
pub mod hooks;
pub mod mock_data;

pub use app::Dashboard;
