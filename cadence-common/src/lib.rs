pub mod config;
pub mod log;
pub mod logging;
pub mod message;
pub mod script;

pub use message::Message;
pub use tracing;
