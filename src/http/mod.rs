//! Swipe payloads, the reqwest transport, and the health listener.
mod health;
mod payload;
mod transport;


pub use health::spawn_health_listener;
pub use payload::{Direction, SwipeBody, SwipeGenerator, SwipeRequest};
pub use transport::ReqwestTransport;
