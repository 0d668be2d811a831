use chrono::{SecondsFormat, Utc};
use num_bigint::BigUint;
use serde_json::{json, Value};
use solana_account_decoder::UiAccountEncoding;
use solana_client::rpc_request::RpcRequest;
use solana_sdk::commitment_config::CommitmentLevel;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};

use super::amount::{approx_ui_amount, format_ui_amount};
use super::rpc::{RpcClient, RpcError};
use crate::types::models::{Holder, HoldersResult, LargestAccount};

/// Upper bound on token accounts pulled into a single aggregation.
pub const MAX_TOKEN_ACCOUNTS: usize = 30;

pub const MIN_LIMIT: usize = 2;
pub const MAX_LIMIT: usize = 10;
pub const DEFAULT_LIMIT: usize = 10;

/// Substring the ledger reports when a mint is not governed by the assumed token program.
pub const MINT_NOT_FOUND_PATTERN: &str = "could not find mint";

pub const TOKEN_2022_PROGRAM_ID: &str = "TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb";

pub const HOLDERS_NOTE: &str = "Owners aggregated from top token accounts via getTokenLargestAccounts; supports SPL Token and Token-2022 mints.";

pub const MINT_NOT_FOUND_HINT: &str = "The given address is not a token mint on this cluster or RPC. Ensure the mint exists on the selected network, or try a different RPC.";

#[derive(Error, Debug)]
pub enum HolderError {
    #[error("Missing `mint` query param")]
    MissingMint,
    #[error("Invalid mint address format")]
    InvalidMint,
    #[error(transparent)]
    Rpc(#[from] RpcError),
}

impl HolderError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, HolderError::MissingMint | HolderError::InvalidMint)
    }

    /// Human-readable hint for errors that usually mean the wrong network was queried.
    pub fn hint(&self) -> Option<&'static str> {
        is_mint_not_found(&self.to_string()).then_some(MINT_NOT_FOUND_HINT)
    }
}

pub fn is_mint_not_found(message: &str) -> bool {
    message.to_lowercase().contains(MINT_NOT_FOUND_PATTERN)
}

/// Loose address shape check: 32 to 44 ASCII word characters.
pub fn validate_mint(mint: Option<&str>) -> Result<&str, HolderError> {
    let mint = mint.map(str::trim).filter(|m| !m.is_empty()).ok_or(HolderError::MissingMint)?;
    let shape_ok = (32..=44).contains(&mint.len())
        && mint.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if shape_ok {
        Ok(mint)
    } else {
        Err(HolderError::InvalidMint)
    }
}

pub fn clamp_limit(requested: Option<i64>) -> usize {
    match requested {
        Some(n) => n.clamp(MIN_LIMIT as i64, MAX_LIMIT as i64) as usize,
        None => DEFAULT_LIMIT,
    }
}

/// Parses a user supplied limit. Anything that is not a number means "use the default".
pub fn parse_limit(raw: Option<&str>) -> usize {
    let requested = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .map(|n| n.trunc() as i64);
    clamp_limit(requested)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenProgram {
    SplToken,
    Token2022,
    Other(String),
}

impl TokenProgram {
    pub fn from_owner(owner: &str) -> Self {
        if owner == spl_token::id().to_string() {
            TokenProgram::SplToken
        } else if owner == TOKEN_2022_PROGRAM_ID {
            TokenProgram::Token2022
        } else {
            TokenProgram::Other(owner.to_string())
        }
    }
}

impl fmt::Display for TokenProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenProgram::SplToken => write!(f, "SPL Token"),
            TokenProgram::Token2022 => write!(f, "Token-2022"),
            TokenProgram::Other(id) => write!(f, "program {}", id),
        }
    }
}

/// Sums raw amounts per resolved owner, in first-seen owner order.
///
/// Accounts whose owner is unknown are skipped. An owned account whose amount is not an
/// unsigned integer fails the whole aggregation.
pub fn aggregate_holders(
    accounts: &[LargestAccount],
    owners: &HashMap<String, String>,
) -> Result<Vec<(String, BigUint)>, RpcError> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(String, BigUint)> = Vec::new();

    for account in accounts {
        let Some(owner) = owners.get(&account.address) else {
            continue;
        };
        let amount = account.amount.parse::<BigUint>().map_err(|_| {
            RpcError::Decode(format!(
                "getTokenLargestAccounts: invalid amount {:?} for account {}",
                account.amount, account.address
            ))
        })?;

        match index.get(owner.as_str()) {
            Some(&i) => totals[i].1 += amount,
            None => {
                index.insert(owner.as_str(), totals.len());
                totals.push((owner.clone(), amount));
            }
        }
    }

    Ok(totals)
}

/// Largest totals first. The sort is stable so equal totals keep first-seen order.
pub fn rank_holders(mut totals: Vec<(String, BigUint)>, limit: usize) -> Vec<(String, BigUint)> {
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals.truncate(limit.clamp(MIN_LIMIT, MAX_LIMIT));
    totals
}

/// Runs the holder query against one RPC endpoint.
#[derive(Debug, Clone)]
pub struct HolderAggregator {
    rpc: RpcClient,
    eager_program_lookup: bool,
}

impl HolderAggregator {
    pub fn new(rpc: RpcClient) -> Self {
        Self {
            rpc,
            eager_program_lookup: true,
        }
    }

    /// When disabled, the program owner is only looked up after a mint-not-found failure.
    pub fn eager_program_lookup(mut self, enabled: bool) -> Self {
        self.eager_program_lookup = enabled;
        self
    }

    pub fn rpc_url(&self) -> &str {
        self.rpc.url()
    }

    /// Best effort: any failure resolves to `None`.
    pub async fn resolve_program_owner(&self, mint: &str) -> Option<String> {
        let params = json!([
            mint,
            { "encoding": UiAccountEncoding::Base64, "commitment": CommitmentLevel::Confirmed }
        ]);

        match self.rpc.call(RpcRequest::GetAccountInfo, params).await {
            Ok(result) => {
                let owner = result
                    .pointer("/value/owner")
                    .and_then(Value::as_str)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string);
                if let Some(owner) = &owner {
                    info!("Mint {} is governed by {}", mint, TokenProgram::from_owner(owner));
                }
                owner
            }
            Err(e) => {
                warn!("Could not resolve program owner for {}: {}", mint, e);
                None
            }
        }
    }

    pub async fn largest_accounts(
        &self,
        mint: &str,
        program_owner: Option<&str>,
    ) -> Result<Vec<LargestAccount>, RpcError> {
        if let Some(program_id) = program_owner {
            return self.fetch_largest_accounts(mint, Some(program_id)).await;
        }

        match self.fetch_largest_accounts(mint, None).await {
            Err(e) if is_mint_not_found(&e.to_string()) => {
                let Some(owner) = self.resolve_program_owner(mint).await else {
                    return Err(e);
                };
                info!("Retrying largest accounts for {} with program {}", mint, owner);
                self.fetch_largest_accounts(mint, Some(&owner)).await
            }
            other => other,
        }
    }

    async fn fetch_largest_accounts(
        &self,
        mint: &str,
        program_id: Option<&str>,
    ) -> Result<Vec<LargestAccount>, RpcError> {
        let mut config = json!({ "commitment": CommitmentLevel::Confirmed });
        if let Some(program_id) = program_id {
            config["programId"] = json!(program_id);
        }

        let result = self
            .rpc
            .call(RpcRequest::GetTokenLargestAccounts, json!([mint, config]))
            .await?;

        match result.get("value") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| RpcError::Decode(format!("getTokenLargestAccounts: {}", e))),
        }
    }

    /// Maps token account address to owner wallet. Accounts without parsed owner data are
    /// left out.
    pub async fn resolve_owners(
        &self,
        addresses: &[String],
    ) -> Result<HashMap<String, String>, RpcError> {
        if addresses.is_empty() {
            return Ok(HashMap::new());
        }

        let params = json!([
            addresses,
            { "encoding": UiAccountEncoding::JsonParsed, "commitment": CommitmentLevel::Confirmed }
        ]);
        let result = self.rpc.call(RpcRequest::GetMultipleAccounts, params).await?;

        let accounts = result
            .get("value")
            .and_then(Value::as_array)
            .ok_or_else(|| RpcError::Decode("getMultipleAccounts: missing value array".to_string()))?;

        let owners: HashMap<String, String> = addresses
            .iter()
            .zip(accounts)
            .filter_map(|(address, account)| {
                account
                    .pointer("/data/parsed/info/owner")
                    .and_then(Value::as_str)
                    .filter(|o| !o.is_empty())
                    .map(|owner| (address.clone(), owner.to_string()))
            })
            .collect();

        if owners.len() < addresses.len() {
            info!(
                "Resolved owners for {} of {} token accounts",
                owners.len(),
                addresses.len()
            );
        }
        Ok(owners)
    }

    pub async fn top_holders(&self, mint: &str, limit: usize) -> Result<HoldersResult, HolderError> {
        let operation_start = std::time::Instant::now();
        let limit = limit.clamp(MIN_LIMIT, MAX_LIMIT);

        let program_owner = if self.eager_program_lookup {
            self.resolve_program_owner(mint).await
        } else {
            None
        };

        let mut largest = self.largest_accounts(mint, program_owner.as_deref()).await?;
        info!("Found {} largest token accounts for {}", largest.len(), mint);

        if largest.is_empty() {
            return Ok(HoldersResult {
                mint: mint.to_string(),
                limit,
                holders: Vec::new(),
                fetched_at: fetched_at(),
                rpc_url: self.rpc.url().to_string(),
                note: None,
            });
        }

        let decimals = largest[0].decimals;
        largest.truncate(MAX_TOKEN_ACCOUNTS);

        let addresses: Vec<String> = largest.iter().map(|a| a.address.clone()).collect();
        let owners = self.resolve_owners(&addresses).await?;

        let ranked = rank_holders(aggregate_holders(&largest, &owners)?, limit);
        if let Some((owner, amount)) = ranked.first() {
            info!(
                "Top holder of {} is {} with ~{:.2} tokens",
                mint,
                owner,
                approx_ui_amount(amount, decimals)
            );
        }

        let holders = ranked
            .into_iter()
            .map(|(owner, amount)| Holder {
                owner,
                ui_amount: format_ui_amount(&amount, decimals),
                amount_raw: amount.to_string(),
                decimals,
            })
            .collect();

        info!("Holder query for {} took {:?}", mint, operation_start.elapsed());

        Ok(HoldersResult {
            mint: mint.to_string(),
            limit,
            holders,
            fetched_at: fetched_at(),
            rpc_url: self.rpc.url().to_string(),
            note: Some(HOLDERS_NOTE.to_string()),
        })
    }
}

fn fetched_at() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
