//! Port implementations.

mod broadcast_signals;
mod reqwest_transport;
mod system_clock;

pub use broadcast_signals::BroadcastSignals;
pub use reqwest_transport::ReqwestTransport;
pub use system_clock::SystemClock;
