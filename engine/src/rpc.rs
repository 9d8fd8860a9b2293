use anyhow::{Context, Result};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use solana_transaction_status::UiTransactionEncoding;
use std::str::FromStr;
use std::sync::Arc;
use strategy::RpcPort;

/// Connection handle to a Solana JSON-RPC endpoint. The engine runs fine
/// without it succeeding — every call site treats failure as a transient
/// degrade — but the handle is opened once at startup and shared.
pub struct SolanaRpc {
    client: Arc<RpcClient>,
}

impl SolanaRpc {
    pub fn new(rpc_url: &str) -> Self {
        Self {
            client: Arc::new(RpcClient::new(rpc_url.to_string())),
        }
    }

    /// Best-effort startup probe; logs and degrades instead of failing boot.
    pub async fn probe(&self, wallet: Option<&str>) {
        let Some(wallet) = wallet else {
            tracing::info!("🔌 RPC handle opened (no wallet configured, skipping probe)");
            return;
        };
        let Ok(address) = Pubkey::from_str(wallet) else {
            tracing::warn!("⚠️ WALLET_ADDRESS is not a valid pubkey: {}", wallet);
            return;
        };

        match self.get_balance(&address).await {
            Ok(lamports) => {
                tracing::info!("💰 Wallet {}: {} lamports", address, lamports);
            }
            Err(e) => {
                crate::telemetry::RPC_ERRORS.inc();
                tracing::warn!("⚠️ RPC balance probe failed: {:#}. Continuing without it.", e);
            }
        }

        match self.fetch_signatures(&address, 5).await {
            Ok(signatures) => {
                tracing::info!("🧾 Recent wallet activity: {} signatures", signatures.len());
            }
            Err(e) => {
                crate::telemetry::RPC_ERRORS.inc();
                tracing::warn!("⚠️ RPC signature probe failed: {:#}. Continuing without it.", e);
            }
        }
    }
}

#[async_trait::async_trait]
impl RpcPort for SolanaRpc {
    async fn fetch_signatures(&self, address: &Pubkey, limit: usize) -> Result<Vec<String>> {
        let statuses = self
            .client
            .get_signatures_for_address(address)
            .await
            .context("get_signatures_for_address")?;
        Ok(statuses
            .into_iter()
            .take(limit)
            .map(|s| s.signature)
            .collect())
    }

    async fn fetch_transaction(&self, signature: &str) -> Result<serde_json::Value> {
        let signature = Signature::from_str(signature).context("invalid signature")?;
        let transaction = self
            .client
            .get_transaction(&signature, UiTransactionEncoding::Json)
            .await
            .context("get_transaction")?;
        serde_json::to_value(transaction).context("encode transaction response")
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<String> {
        let signature = self
            .client
            .send_transaction(transaction)
            .await
            .context("send_transaction")?;
        Ok(signature.to_string())
    }

    async fn get_balance(&self, address: &Pubkey) -> Result<u64> {
        self.client.get_balance(address).await.context("get_balance")
    }

    async fn confirm_transaction(&self, signature: &str) -> Result<bool> {
        let signature = Signature::from_str(signature).context("invalid signature")?;
        self.client
            .confirm_transaction(&signature)
            .await
            .context("confirm_transaction")
    }
}
