mod config;
mod counter;
mod error;
mod server;
pub use config::*;
pub use counter::*;
pub use error::*;
pub use server::*;
