use serde::{Deserialize, Serialize};

use crate::model::task::TaskId;

/// Error type for drag payload encoding
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("could not encode drag payload: {0}")]
    Encode(serde_json::Error),
    #[error("could not decode drag payload: {0}")]
    Decode(serde_json::Error),
}

/// Encodes the ids carried by a drag gesture. Only ids cross the drag
/// boundary, so the drop side always resolves tasks through the live pool.
pub trait TransferCodec {
    fn encode(&self, ids: &[TaskId]) -> Result<Vec<u8>, TransferError>;
    fn decode(&self, data: &[u8]) -> Result<Vec<TaskId>, TransferError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct TransferPayload {
    items: Vec<TaskId>,
}

/// JSON payload: `{"items": ["id1", "id2"]}`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl TransferCodec for JsonCodec {
    fn encode(&self, ids: &[TaskId]) -> Result<Vec<u8>, TransferError> {
        serde_json::to_vec(&TransferPayload {
            items: ids.to_vec(),
        })
        .map_err(TransferError::Encode)
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<TaskId>, TransferError> {
        serde_json::from_slice::<TransferPayload>(data)
            .map(|p| p.items)
            .map_err(TransferError::Decode)
    }
}
