//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use ticket_validator::inbound::http::state::HttpState;

/// Everything the HTTP server needs once persistence is ready.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) http_state: HttpState,
}

impl ServerConfig {
    /// Construct a server configuration from the bind address and handler
    /// state.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, http_state: HttpState) -> Self {
        Self {
            bind_addr,
            http_state,
        }
    }
}
