//! Flip Clock - A single-session countdown service
//! 
//! This library provides the countdown engine, alarm player, settings and
//! session history behind a flip-clock display, plus the HTTP API the
//! display talks to.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::FlipClockError;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
