use axum::{
    extract::{State, Query},
    Json,
};

use crate::services::rpc::RpcClient;
use crate::services::token::{parse_limit, validate_mint, HolderAggregator};
use crate::types::models::{HoldersQuery, HoldersResult};
use super::error::ApiError;
use super::state::AppState;

pub async fn get_holders(
    State((config, http, rate_limiter)): State<AppState>,
    Query(params): Query<HoldersQuery>,
) -> Result<Json<HoldersResult>, ApiError> {
    if let Some(limiter) = &rate_limiter {
        if limiter.check().is_err() {
            tracing::warn!("Inbound rate limit exceeded");
            return Err(ApiError::RateLimited);
        }
    }

    let mint = validate_mint(params.mint.as_deref())?;
    let limit = parse_limit(params.limit.as_deref());
    let rpc_url = params
        .rpc
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .unwrap_or(config.rpc_url.as_str());

    tracing::info!("Holder query for {} (limit {}) via {}", mint, limit, rpc_url);

    let aggregator = HolderAggregator::new(RpcClient::new(http, rpc_url))
        .eager_program_lookup(config.eager_program_lookup);

    match aggregator.top_holders(mint, limit).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            tracing::error!("holders API error for {}: {}", mint, e);
            Err(e.into())
        }
    }
}

pub async fn health() -> &'static str {
    "ok"
}
