//! Medq Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{
    CreateRequest, DeleteRequest, DeleteResponse, ListTransfersRequest, ListTransfersResponse,
    QueueEntryView, SnapshotRequest, SnapshotResponse, TransferRequest, UpdateStatusRequest,
    TransferView,
};
use chrono::NaiveDate;
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::traits::ToRpcParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use serde::Serialize;
use serde_json::value::RawValue;
use std::time::Duration;

/// Sends a request struct as a single JSON object, which is how the daemon
/// parses params. `rpc_params!` would wrap it in a positional array.
struct ObjectParams<T>(T);

impl<T: Serialize> ToRpcParams for ObjectParams<T> {
    fn to_rpc_params(self) -> std::result::Result<Option<Box<RawValue>>, serde_json::Error> {
        serde_json::value::to_raw_value(&self.0).map(Some)
    }
}

/// Medq Queue Engine Client
///
/// Provides a high-level interface to interact with the Medq daemon.
///
/// # Example
///
/// ```no_run
/// use medq_sdk::MedqClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = MedqClient::connect("http://127.0.0.1:9533").await?;
/// # Ok(())
/// # }
/// ```
pub struct MedqClient {
    client: HttpClient,
}

impl MedqClient {
    /// Connect to the Medq daemon
    ///
    /// # Arguments
    ///
    /// * `url` - RPC endpoint URL (e.g., `http://127.0.0.1:9533`)
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();

        let client = HttpClientBuilder::default()
            .request_timeout(Duration::from_secs(30))
            .build(url)
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self { client })
    }

    /// Register a queue entry and receive its daily number
    pub async fn create(&self, request: CreateRequest) -> Result<QueueEntryView> {
        let response: QueueEntryView = self
            .client
            .request("queue.create.v1", ObjectParams(request))
            .await?;

        Ok(response)
    }

    /// Apply a status transition (attending, attended, no_show)
    pub async fn update_status(&self, request: UpdateStatusRequest) -> Result<QueueEntryView> {
        let response: QueueEntryView = self
            .client
            .request("queue.update_status.v1", ObjectParams(request))
            .await?;

        Ok(response)
    }

    /// Reassign an entry to another doctor and/or department
    pub async fn transfer(&self, request: TransferRequest) -> Result<TransferView> {
        let response: TransferView = self
            .client
            .request("queue.transfer.v1", ObjectParams(request))
            .await?;

        Ok(response)
    }

    /// List the transfer history of an entry, oldest first
    pub async fn transfers(&self, queue_id: impl Into<String>) -> Result<ListTransfersResponse> {
        let request = ListTransfersRequest {
            queue_id: queue_id.into(),
        };
        let response: ListTransfersResponse = self
            .client
            .request("queue.transfers.v1", ObjectParams(request))
            .await?;

        Ok(response)
    }

    /// Serving-order snapshot for a date (`None` = facility-local today)
    pub async fn snapshot(&self, date: Option<NaiveDate>) -> Result<SnapshotResponse> {
        let request = SnapshotRequest { date };
        let response: SnapshotResponse = self
            .client
            .request("queue.snapshot.v1", ObjectParams(request))
            .await?;

        Ok(response)
    }

    /// Administratively delete an entry (its transfer history survives)
    pub async fn delete(&self, queue_id: impl Into<String>) -> Result<DeleteResponse> {
        let request = DeleteRequest {
            queue_id: queue_id.into(),
        };
        let response: DeleteResponse = self
            .client
            .request("queue.delete.v1", ObjectParams(request))
            .await?;

        Ok(response)
    }
}
