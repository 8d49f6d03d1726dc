use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::http::{ApiState, HttpServerConfig, run_http_server};

/// The HTTP API module, packaged for the process runner.
pub struct VigilApi {
    state: ApiState,
    config: HttpServerConfig,
}

impl VigilApi {
    pub fn new(state: ApiState, config: HttpServerConfig) -> Self {
        debug!("Initializing Vigil API module");
        Self { state, config }
    }

    pub fn into_runner_process(
        self,
    ) -> impl FnOnce(
        CancellationToken,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = anyhow::Result<()>> + Send>,
    > {
        move |ctx| Box::pin(async move { run_http_server(self.config, self.state, ctx).await })
    }
}
