// HTTP surface of the mock nodes
//
// Every node is served under its own path prefix: `/<node id>/api/...`.
// Requests for unknown or offline nodes fail with an empty 500 before any
// endpoint logic runs.

mod accounts;
mod error;
mod transactions;
mod utils;

pub use error::ApiError;
pub use utils::{active_node, require_properties};

use actix_web::{
    dev::{Service, ServerHandle},
    web::{self, Data},
    App, HttpMessage, HttpRequest, HttpServer,
};
use anyhow::Context;
use log::{info, warn};
use std::{io::ErrorKind, net::TcpListener, sync::Arc};

use chatnet_common::api::{
    GET_BALANCE_PATH, GET_PUBLIC_KEY_PATH, GET_TRANSACTION_PATH, PROCESS_CHAT_PATH,
    PROCESS_TRANSACTION_PATH,
};

use crate::{
    config::{NodeOptions, ServerConfig},
    core::{MockNode, NodeRegistry},
};

/// Running HTTP server hosting any number of mock nodes.
pub struct MockServer {
    host: String,
    port: u16,
    registry: Arc<NodeRegistry>,
    handle: ServerHandle,
}

fn bind_listener(config: &ServerConfig) -> anyhow::Result<TcpListener> {
    for (host, port) in config.bind_addresses() {
        match TcpListener::bind((host.as_str(), port)) {
            Ok(listener) => return Ok(listener),
            Err(e) if e.kind() == ErrorKind::AddrInUse => {
                if log::log_enabled!(log::Level::Warn) {
                    warn!("Port {} is already in use, trying the next one", port);
                }
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Error while binding {}:{}", host, port))
            }
        }
    }

    anyhow::bail!(
        "No free port on {} in {} attempts starting at {}",
        config.bind_host,
        config.port_attempts,
        config.port
    )
}

// Catch-all: unknown endpoints of an available node are a 404
async fn unknown_endpoint(
    registry: Data<NodeRegistry>,
    request: HttpRequest,
) -> Result<actix_web::HttpResponse, ApiError> {
    let path = request.path();
    let node_id = path
        .trim_start_matches('/')
        .split('/')
        .next()
        .unwrap_or_default();

    let node = active_node(&registry, node_id)?;
    Err(ApiError::UnknownEndpoint {
        node: node.id().to_string(),
        path: path.to_string(),
    })
}

fn configure_node_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(GET_PUBLIC_KEY_PATH, web::get().to(accounts::get_public_key))
        .route(GET_BALANCE_PATH, web::get().to(accounts::get_balance))
        .route(GET_TRANSACTION_PATH, web::get().to(transactions::get_transaction))
        .route(
            PROCESS_TRANSACTION_PATH,
            web::post().to(transactions::process_transaction),
        )
        .route(
            PROCESS_CHAT_PATH,
            web::post().to(transactions::process_transaction),
        );
}

impl MockServer {
    /// Bind the first free address of `config` and start serving.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn start(config: ServerConfig) -> anyhow::Result<Self> {
        let registry = Arc::new(NodeRegistry::new());
        let listener = bind_listener(&config)?;
        let port = listener
            .local_addr()
            .context("Error while reading bound address")?
            .port();

        if log::log_enabled!(log::Level::Info) {
            info!("Starting mock node server on {}:{}", config.bind_host, port);
        }

        let clone = Arc::clone(&registry);
        let http_server = HttpServer::new(move || {
            let guard = Arc::clone(&clone);
            App::new()
                .app_data(Data::from(Arc::clone(&clone)))
                .service(
                    web::scope("/{node_id}")
                        // node lookup runs before any extractor of the endpoint
                        .wrap_fn(move |request, service| {
                            let node_id = request.match_info().get("node_id").unwrap_or_default();
                            let call = active_node(&guard, node_id).map(|node| {
                                request.extensions_mut().insert(node);
                                service.call(request)
                            });
                            async move { call.map_err(actix_web::Error::from)?.await }
                        })
                        .configure(configure_node_routes),
                )
                .default_service(web::to(unknown_endpoint))
        })
        .disable_signals()
        .workers(config.workers.max(1))
        .listen(listener)
        .context("Error while starting the HTTP server")?
        .run();

        let handle = http_server.handle();
        tokio::spawn(http_server);

        Ok(Self {
            host: config.bind_host,
            port,
            registry,
            handle,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn registry(&self) -> &Arc<NodeRegistry> {
        &self.registry
    }

    /// Create a fresh node reachable at `<base url>/<id>`.
    ///
    /// An existing node with the same id is replaced.
    pub fn create_node(&self, id: &str, options: NodeOptions) -> Arc<MockNode> {
        let node = Arc::new(MockNode::new(
            id,
            format!("{}/{}", self.base_url(), id),
            options,
        ));

        if self.registry.insert(Arc::clone(&node)).is_some() {
            if log::log_enabled!(log::Level::Debug) {
                log::debug!("Replaced existing node {}", id);
            }
        } else if log::log_enabled!(log::Level::Info) {
            info!("Created node {} at {}", id, node.url());
        }

        node
    }

    pub fn node(&self, id: &str) -> Option<Arc<MockNode>> {
        self.registry.get(id)
    }

    pub async fn stop(&self) {
        info!("Stopping mock node server...");
        self.handle.stop(true).await;
        info!("Mock node server is now stopped!");
    }
}
