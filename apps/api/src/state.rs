use crate::config::GatewayConfig;
use crate::summary::SummaryGateway;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: GatewayConfig,
    /// Live or placeholder generation, fixed at startup from `config`.
    pub gateway: SummaryGateway,
}

impl AppState {
    pub fn from_config(config: GatewayConfig) -> anyhow::Result<Self> {
        let gateway = SummaryGateway::from_config(&config)?;
        Ok(AppState { config, gateway })
    }
}
