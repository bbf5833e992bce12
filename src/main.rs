//! Hearth runtime - example server
//!
//! Demonstrates running the hearth server with handlers that guard their
//! body parsing against mismatched content-types.

use hearth::prelude::*;
use tracing_subscriber::EnvFilter;

/// Example "Hello World" handler.
struct HelloHandler;

#[async_trait]
impl Handler for HelloHandler {
    async fn fetch(
        &self,
        request: Request,
        ctx: &RequestContext,
    ) -> Result<Response, HandlerError> {
        let name = request
            .get_header("X-Name")
            .cloned()
            .unwrap_or_else(|| "World".to_string());

        let response_body = serde_json::json!({
            "message": format!("Hello, {}!", name),
            "method": request.method.to_string(),
            "path": request.url,
            "request_id": ctx.request_id,
        });

        Ok(Response::json(&response_body)?)
    }

    fn name(&self) -> &str {
        "hello"
    }
}

/// Form submission handler demonstrating the body-parsing guard.
///
/// Decoding failures are caught locally and answered with a normal success
/// response, so a client sending a mismatched content-type cannot fault the
/// server.
struct SubmitHandler;

#[async_trait]
impl Handler for SubmitHandler {
    async fn fetch(
        &self,
        request: Request,
        ctx: &RequestContext,
    ) -> Result<Response, HandlerError> {
        let form = match request.form_data() {
            Ok(form) => form,
            Err(err) => {
                tracing::warn!("Rejected form body: {} [{}]", err, ctx.request_id);
                return Ok(Response::json(&serde_json::json!({
                    "accepted": false,
                    "reason": err.to_string(),
                }))?);
            }
        };

        let fields: Vec<_> = form
            .iter()
            .map(|field| {
                serde_json::json!({
                    "name": field.name,
                    "value": field.text(),
                    "file": field.is_file(),
                })
            })
            .collect();

        Ok(Response::json(&serde_json::json!({
            "accepted": true,
            "fields": fields,
        }))?)
    }

    fn name(&self) -> &str {
        "submit"
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting hearth server...");

    let config = ServerConfig::new()
        .host("0.0.0.0")
        .port(8080)
        .env("ENVIRONMENT", "development");

    let server = Server::new(config);

    server.register("/hello", Box::new(HelloHandler)).await?;
    server.register("/submit", Box::new(SubmitHandler)).await?;

    tracing::info!("Mounted handlers: /hello, /submit");
    tracing::info!("Try: curl http://localhost:8080/hello");
    tracing::info!("Try: curl -X POST -d 'name=ada' http://localhost:8080/submit");
    tracing::info!("Health check: curl http://localhost:8080/_health");

    server.run().await
}
