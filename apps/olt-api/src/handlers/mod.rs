//! Handlers 模块

pub mod alarms;
pub mod auth;
pub mod cable_routes;
pub mod dashboard;
pub mod metrics;
pub mod odps;
pub mod olts;
pub mod onts;
pub mod settings;
pub mod users;

pub use alarms::*;
pub use auth::*;
pub use cable_routes::*;
pub use dashboard::*;
pub use metrics::*;
pub use odps::*;
pub use olts::*;
pub use onts::*;
pub use settings::*;
pub use users::*;
