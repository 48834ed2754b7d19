//! Client side of the dispatch service: the session/role/list state a
//! dashboard renders from, the controller that keeps it in step with the
//! server, and the HTTP client it talks through.

pub mod backend;
pub mod client;
pub mod controller;
pub mod state;

pub use backend::{BackendError, DispatchBackend, Session};
pub use client::ApiClient;
pub use controller::Dashboard;
pub use state::{reduce, Action, DashboardState, SessionPhase};
