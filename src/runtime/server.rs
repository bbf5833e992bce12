//! Hearth HTTP server implementation.

use crate::handler::{Handler, HandlerError, HandlerRegistry};
use crate::http::{Method, Request, Response, StatusCode};
use crate::runtime::ServerConfig;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

/// Hearth HTTP server.
///
/// Routes incoming requests to handlers mounted on its registry. Malformed
/// request bodies never take the server down: body decoding happens inside
/// the handler through [`Request::form_data`], connection errors are logged
/// per connection, and handler errors become error responses.
pub struct Server {
    /// Server configuration.
    config: ServerConfig,
    /// Handler registry.
    registry: Arc<HandlerRegistry>,
}

impl Server {
    /// Create a new server.
    pub fn new(config: ServerConfig) -> Self {
        let registry = Arc::new(HandlerRegistry::with_env(config.env.clone()));
        Self { config, registry }
    }

    /// Create a new server with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ServerConfig::default())
    }

    /// Get the handler registry.
    pub fn registry(&self) -> Arc<HandlerRegistry> {
        self.registry.clone()
    }

    /// Mount a handler at the given route path.
    pub async fn register(
        &self,
        route: impl Into<String>,
        handler: Box<dyn Handler>,
    ) -> Result<(), HandlerError> {
        self.registry.register(route, handler).await
    }

    /// Bind the listener without starting the accept loop.
    ///
    /// With port 0 in the config this picks an ephemeral port; use
    /// [`BoundServer::local_addr`] to discover it.
    pub async fn bind(self) -> Result<BoundServer, Box<dyn std::error::Error + Send + Sync>> {
        let addr: SocketAddr = self.config.bind_addr().parse()?;
        let listener = TcpListener::bind(addr).await?;

        info!("Hearth server listening on {}", listener.local_addr()?);

        Ok(BoundServer {
            listener,
            config: self.config,
            registry: self.registry,
        })
    }

    /// Bind and run the accept loop.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.bind().await?.serve().await
    }
}

/// A server whose listener is bound but not yet serving.
pub struct BoundServer {
    listener: TcpListener,
    config: ServerConfig,
    registry: Arc<HandlerRegistry>,
}

impl BoundServer {
    /// The address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    /// Run the accept loop.
    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        loop {
            let (stream, remote_addr) = self.listener.accept().await?;
            let io = TokioIo::new(stream);

            let registry = self.registry.clone();
            let config = self.config.clone();

            tokio::task::spawn(async move {
                let service = service_fn(move |req| {
                    let registry = registry.clone();
                    let config = config.clone();
                    async move { handle_request(req, registry, config, remote_addr).await }
                });

                // Connection errors stay local to this task; the accept
                // loop keeps serving other clients.
                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    error!("Error serving connection: {:?}", err);
                }
            });
        }
    }
}

/// Handle an incoming HTTP request.
async fn handle_request(
    req: hyper::Request<Incoming>,
    registry: Arc<HandlerRegistry>,
    config: ServerConfig,
    remote_addr: SocketAddr,
) -> Result<hyper::Response<Full<Bytes>>, hyper::Error> {
    let path = req.uri().path().to_string();
    let method = req.method().clone();
    let request_id = generate_request_id();

    debug!(
        "Handling request: {} {} from {} [{}]",
        method, path, remote_addr, request_id
    );

    if config.enable_health && path == "/_health" {
        return Ok(build_response(Response::text("OK")));
    }

    let request = match convert_request(req, &path, &config).await {
        Ok(request) => request,
        Err(e) => {
            warn!("Failed to convert request: {}", e);
            return Ok(build_response(Response::error(
                StatusCode::BAD_REQUEST,
                e.to_string(),
            )));
        }
    };

    let timeout = Duration::from_secs(config.request_timeout);
    let dispatched = tokio::time::timeout(timeout, registry.dispatch(&path, request, &request_id));

    match dispatched.await {
        Ok(Ok(response)) => Ok(build_response(response)),
        Ok(Err(e)) => {
            error!("Handler error at '{}': {} [{}]", path, e, request_id);
            Ok(build_response(e.into()))
        }
        Err(_) => {
            error!(
                "Handler at '{}' timed out after {}s [{}]",
                path, config.request_timeout, request_id
            );
            Ok(build_response(
                HandlerError::timeout("handler timed out").into(),
            ))
        }
    }
}

/// Convert a hyper Request into a hearth Request.
///
/// Header names are lowercased; the body is collected fully before the
/// handler runs and rejected when it exceeds the configured limit.
async fn convert_request(
    req: hyper::Request<Incoming>,
    path: &str,
    config: &ServerConfig,
) -> Result<Request, Box<dyn std::error::Error + Send + Sync>> {
    let method = Method::from(req.method());
    let url = path.to_string();

    let mut headers = HashMap::new();
    for (name, value) in req.headers() {
        if let Ok(v) = value.to_str() {
            headers.insert(name.as_str().to_ascii_lowercase(), v.to_string());
        }
    }

    let body_bytes = req.collect().await?.to_bytes();
    let body = if body_bytes.len() > config.max_body_size {
        return Err("Request body too large".into());
    } else if body_bytes.is_empty() {
        None
    } else {
        Some(body_bytes)
    };

    Ok(Request {
        method,
        url,
        headers,
        body,
    })
}

/// Build a hyper Response from a hearth Response.
fn build_response(response: Response) -> hyper::Response<Full<Bytes>> {
    let status = hyper::StatusCode::from_u16(response.status.0).unwrap_or_else(|_| {
        warn!(
            "Invalid status code {}, falling back to 500 Internal Server Error",
            response.status.0
        );
        hyper::StatusCode::INTERNAL_SERVER_ERROR
    });

    let mut builder = hyper::Response::builder().status(status);

    for (name, value) in response.headers {
        builder = builder.header(name, value);
    }

    let body = response.body.unwrap_or_default();
    builder.body(Full::new(body)).unwrap()
}

/// Generate a unique request ID.
fn generate_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{:x}", timestamp)
}
