//! Axum-based RPC server.

use axum::routing::{get, post};
use axum::Router;
use quadfund_node::QuadfundNode;
use quadfund_payments::PaymentGateway;
use quadfund_whitelist::WhitelistSource;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::RpcError;
use crate::handlers;

/// Build the API router over a shared node.
pub fn router<W: WhitelistSource, P: PaymentGateway>(
    node: Arc<QuadfundNode<W, P>>,
    enable_metrics: bool,
) -> Router {
    let mut app = Router::new()
        .route("/health", get(handlers::health::<W, P>))
        .route("/voters", post(handlers::register_voter::<W, P>))
        .route("/voters/:id", get(handlers::get_voter::<W, P>))
        .route("/voters/:id/credits", post(handlers::add_credits::<W, P>))
        .route(
            "/proposals",
            get(handlers::list_proposals::<W, P>).post(handlers::create_proposal::<W, P>),
        )
        .route("/proposals/:id", get(handlers::get_proposal::<W, P>))
        .route("/proposals/:id/allocate", post(handlers::allocate::<W, P>))
        .route(
            "/proposals/:id/distribute",
            post(handlers::distribute::<W, P>),
        );
    if enable_metrics {
        app = app.route("/metrics", get(handlers::metrics::<W, P>));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
    .with_state(node)
}

pub struct RpcServer<W, P> {
    pub addr: SocketAddr,
    node: Arc<QuadfundNode<W, P>>,
    enable_metrics: bool,
}

impl<W: WhitelistSource, P: PaymentGateway> RpcServer<W, P> {
    pub fn new(addr: SocketAddr, node: Arc<QuadfundNode<W, P>>, enable_metrics: bool) -> Self {
        Self {
            addr,
            node,
            enable_metrics,
        }
    }

    /// Bind and serve until `shutdown` resolves, then drain in-flight requests.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), RpcError> {
        let app = router(self.node, self.enable_metrics);
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        info!(addr = %listener.local_addr()?, "RPC server listening");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("RPC server stopped");
        Ok(())
    }
}
