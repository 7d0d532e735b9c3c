pub mod config;
pub mod outline;

pub use config::*;
pub use outline::*;
