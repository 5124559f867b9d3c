// Shared roulette server: role arbitration, two-phase draws and fan-out.

pub mod arbiter;
pub mod config;
pub mod coordinator;
pub mod draw;
pub mod error;
pub mod gateway;
pub mod history;
pub mod registry;
pub mod wheel;
pub mod ws;


pub use coordinator::{Hub, Session};
