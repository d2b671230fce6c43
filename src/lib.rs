//! Custodial transfer relay library.

pub mod blockchain;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod relay;

pub use config::schema::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use relay::{AssetMode, TransferRelay, WithdrawRequest};
