//! Gateway turning instruction descriptions into client-signable payloads.

use super::instruction::InstructionRequest;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Gateway errors
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network checkpoint could not be fetched
    #[error("Chain unavailable: {0}")]
    Unavailable(String),

    /// Payload could not be encoded
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl GatewayError {
    /// Get a client-safe error message
    pub fn client_message(&self) -> String {
        match self {
            GatewayError::Unavailable(_) => "Network unavailable, try again later".to_string(),
            GatewayError::Encoding(_) => "Internal server error".to_string(),
        }
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Encoded unsigned transaction plus the checkpoint it references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedTransaction {
    /// Opaque encoded transaction for the client to sign
    pub transaction: String,
    /// Recent network checkpoint (blockhash) the transaction references
    pub recent_checkpoint: String,
}

/// Trait for the chain collaborator.
///
/// Implementations own RPC access and the wire encoding. Handlers call it
/// only after the tracker has replied, never while holding tracker state.
#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// Fetch a recent network checkpoint
    async fn latest_checkpoint(&self) -> GatewayResult<String>;

    /// Encode an unsigned transaction referencing `checkpoint`
    async fn encode(
        &self,
        request: &InstructionRequest,
        checkpoint: &str,
    ) -> GatewayResult<String>;

    /// Fetch a checkpoint and encode the request against it
    async fn prepare(&self, request: &InstructionRequest) -> GatewayResult<PreparedTransaction> {
        let recent_checkpoint = self.latest_checkpoint().await?;
        let transaction = self.encode(request, &recent_checkpoint).await?;
        Ok(PreparedTransaction {
            transaction,
            recent_checkpoint,
        })
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    program_id: &'a str,
    instruction: &'a str,
    data: String,
    fee_payer: &'a str,
    compute_unit_price: u64,
    recent_checkpoint: &'a str,
    accounts: &'a [super::instruction::AccountMeta],
}

/// Offline gateway.
///
/// Produces a hex-encoded JSON envelope of the instruction and a checkpoint
/// derived from the current time. Useful for local runs and tests; a
/// deployment talking to a real cluster plugs in its own [`ChainGateway`].
#[derive(Debug, Default, Clone)]
pub struct InstructionEncoder;

impl InstructionEncoder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChainGateway for InstructionEncoder {
    async fn latest_checkpoint(&self) -> GatewayResult<String> {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let digest = Sha256::digest(nanos.to_le_bytes());
        Ok(bs58::encode(digest).into_string())
    }

    async fn encode(
        &self,
        request: &InstructionRequest,
        checkpoint: &str,
    ) -> GatewayResult<String> {
        let envelope = Envelope {
            program_id: request.program_id.as_str(),
            instruction: request.instruction.name(),
            data: hex::encode(request.instruction.data()),
            fee_payer: request.fee_payer.as_str(),
            compute_unit_price: request.compute_unit_price,
            recent_checkpoint: checkpoint,
            accounts: &request.accounts,
        };
        Ok(hex::encode(serde_json::to_vec(&envelope)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::instruction::DEFAULT_PROGRAM_ID;
    use crate::identity::PlayerId;

    fn request() -> InstructionRequest {
        InstructionRequest::play_turn(
            PlayerId::parse(DEFAULT_PROGRAM_ID).unwrap(),
            PlayerId::from_bytes([1; 32]),
            3,
        )
    }

    #[tokio::test]
    async fn test_checkpoint_is_32_byte_base58() {
        let checkpoint = InstructionEncoder::new().latest_checkpoint().await.unwrap();
        let bytes = bs58::decode(&checkpoint).into_vec().unwrap();
        assert_eq!(bytes.len(), 32);
    }

    #[tokio::test]
    async fn test_prepare_embeds_instruction() {
        let gateway = InstructionEncoder::new();
        let prepared = gateway.prepare(&request()).await.unwrap();

        let raw = hex::decode(&prepared.transaction).unwrap();
        let envelope: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(envelope["instruction"], "play_turn");
        assert_eq!(envelope["data"], "74c82c4317e4d16303");
        assert_eq!(envelope["recent_checkpoint"], prepared.recent_checkpoint);
        assert_eq!(envelope["accounts"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_client_messages_are_generic() {
        let err = GatewayError::Unavailable("rpc timeout at 10.0.0.1".to_string());
        assert!(!err.client_message().contains("10.0.0.1"));
    }
}
