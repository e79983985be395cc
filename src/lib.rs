pub mod application;
pub mod express;
pub mod handler;
pub mod router;
mod server;

pub use express::app;
