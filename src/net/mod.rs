//! Network layer subsystem.
//!
//! Plain TCP listeners are bound directly with Tokio in `main`; this module
//! holds what the optional HTTPS listener needs.

pub mod tls;
