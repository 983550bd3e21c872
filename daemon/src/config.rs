use serde::{Deserialize, Serialize};

// Mocked chain clock, not related to wall-clock time
pub const START_TIMESTAMP: u64 = 58_000_000;
pub const START_HEIGHT: u64 = 36_900_000;

// Every read of a counter advances it by its step
pub const TIMESTAMP_STEP: u64 = 25;
pub const HEIGHT_STEP: u64 = 5;

// bind addresses
pub const DEFAULT_BIND_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 36668;

// How many successive ports are tried when the address is already in use
pub const DEFAULT_PORT_ATTEMPTS: u16 = 32;

// A single worker keeps request handling serialized per server
pub const DEFAULT_WORKERS: usize = 1;

fn default_bind_host() -> String {
    DEFAULT_BIND_HOST.to_string()
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

const fn default_port_attempts() -> u16 {
    DEFAULT_PORT_ATTEMPTS
}

const fn default_workers() -> usize {
    DEFAULT_WORKERS
}

/// Configuration of the HTTP server exposing mock nodes.
#[derive(Debug, Clone, clap::Args, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host the HTTP server binds to.
    #[clap(name = "bind-host", long, default_value_t = default_bind_host())]
    #[serde(default = "default_bind_host")]
    pub bind_host: String,

    /// First port to try.
    #[clap(name = "port", long, default_value_t = default_port())]
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of successive ports tried when the port is already in use.
    #[clap(name = "port-attempts", long, default_value_t = default_port_attempts())]
    #[serde(default = "default_port_attempts")]
    pub port_attempts: u16,

    /// Number of HTTP worker threads.
    #[clap(name = "workers", long, default_value_t = default_workers())]
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_host: default_bind_host(),
            port: DEFAULT_PORT,
            port_attempts: DEFAULT_PORT_ATTEMPTS,
            workers: DEFAULT_WORKERS,
        }
    }
}

impl ServerConfig {
    // Candidate bind addresses, in the order they are tried
    pub fn bind_addresses(&self) -> impl Iterator<Item = (String, u16)> + '_ {
        let attempts = self.port_attempts.max(1);
        (0..attempts)
            .map_while(move |offset| self.port.checked_add(offset))
            .map(move |port| (self.bind_host.clone(), port))
    }
}

/// Initial state of a mock node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeOptions {
    #[serde(default = "default_online")]
    pub online: bool,
    #[serde(default = "default_timestamp")]
    pub timestamp: u64,
    #[serde(default = "default_height")]
    pub height: u64,
}

const fn default_online() -> bool {
    true
}

const fn default_timestamp() -> u64 {
    START_TIMESTAMP
}

const fn default_height() -> u64 {
    START_HEIGHT
}

impl Default for NodeOptions {
    fn default() -> Self {
        Self {
            online: true,
            timestamp: START_TIMESTAMP,
            height: START_HEIGHT,
        }
    }
}

impl NodeOptions {
    pub fn offline(mut self) -> Self {
        self.online = false;
        self
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_height(mut self, height: u64) -> Self {
        self.height = height;
        self
    }
}
