use serde::{Deserialize, Serialize};

/// One entry of a `getTokenLargestAccounts` response.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LargestAccount {
    pub address: String,
    pub amount: String,
    #[serde(default)]
    pub decimals: u8,
    #[serde(default)]
    pub ui_amount_string: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Holder {
    pub owner: String,
    pub amount_raw: String,
    pub decimals: u8,
    pub ui_amount: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldersResult {
    pub mint: String,
    pub limit: usize,
    pub holders: Vec<Holder>,
    pub fetched_at: String,
    pub rpc_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HoldersQuery {
    pub mint: Option<String>,
    pub limit: Option<String>,
    pub rpc: Option<String>,
}
