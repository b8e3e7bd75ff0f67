//! svgbridge gateway — the HTTP sync bridge for the browser peer and the
//! WebSocket RPC endpoint for the automation agent, sharing one canvas.

pub mod bridge;
pub mod connection;
pub mod server;
pub mod state;

pub use server::start_gateway;
pub use state::GatewayState;
