use std::sync::Arc;
use governor::{RateLimiter, Quota, state::{NotKeyed, InMemoryState}, clock::DefaultClock};
use reqwest::Client;

use crate::config::Config;
use crate::services::rpc::RPC_TIMEOUT;

pub type InboundLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

pub type AppState = (
    Arc<Config>,
    Client,
    Option<Arc<InboundLimiter>>,
);

pub fn build_state(config: &Config) -> Result<AppState, reqwest::Error> {
    let http = Client::builder().timeout(RPC_TIMEOUT).build()?;
    let limiter = config
        .rate_limit_per_second
        .map(|per_second| Arc::new(RateLimiter::direct(Quota::per_second(per_second))));

    Ok((Arc::new(config.clone()), http, limiter))
}
