//! RPC Method Handlers
//!
//! Implements the business logic for each JSON-RPC method.

use crate::error::{throttled, to_rpc_error};
use crate::rate_limiter::RateLimiter;
use crate::types::{
    CreateRequest, DeleteRequest, DeleteResponse, ListTransfersRequest, ListTransfersResponse,
    QueueEntryView, SnapshotRequest, SnapshotResponse, TransferRequest, TransferView,
    UpdateStatusRequest,
};
use jsonrpsee::types::ErrorObjectOwned;
use medq_core::application::{lifecycle, registration, snapshot, transfer, QueueSettings};
use medq_core::port::{
    AuditSink, DirectoryStore, IdProvider, QueueRepository, TimeProvider,
    TransactionalQueueRepository,
};
use std::sync::Arc;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    tx_repo: Arc<dyn TransactionalQueueRepository>,
    repo: Arc<dyn QueueRepository>,
    directory: Arc<dyn DirectoryStore>,
    audit: Arc<dyn AuditSink>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
    settings: QueueSettings,
    rate_limiter: Arc<RateLimiter>,
}

impl RpcHandler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tx_repo: Arc<dyn TransactionalQueueRepository>,
        repo: Arc<dyn QueueRepository>,
        directory: Arc<dyn DirectoryStore>,
        audit: Arc<dyn AuditSink>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
        settings: QueueSettings,
    ) -> Self {
        // Default: 200 burst, 100 req/sec (configurable via env)
        let max_burst: u32 = std::env::var("MEDQ_RATE_LIMIT_BURST")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(200);

        let rate_per_sec: u32 = std::env::var("MEDQ_RATE_LIMIT_RATE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(100);

        Self {
            tx_repo,
            repo,
            directory,
            audit,
            id_provider,
            time_provider,
            settings,
            rate_limiter: Arc::new(RateLimiter::new(max_burst, rate_per_sec)),
        }
    }

    async fn throttle(&self) -> Result<(), ErrorObjectOwned> {
        if self.rate_limiter.check().await {
            Ok(())
        } else {
            Err(throttled())
        }
    }

    /// queue.create.v1
    pub async fn create(&self, params: CreateRequest) -> Result<QueueEntryView, ErrorObjectOwned> {
        self.throttle().await?;

        let req = registration::CreateEntryRequest {
            patient_id: params.patient_id,
            reason_for_visit: params.reason_for_visit,
            department_id: params.department_id,
            doctor_id: params.doctor_id,
            priority: params.priority,
            queue_date: params.queue_date,
        };

        let entry = registration::create::execute(
            self.tx_repo.as_ref(),
            self.repo.as_ref(),
            self.directory.as_ref(),
            self.audit.as_ref(),
            self.id_provider.as_ref(),
            self.time_provider.as_ref(),
            &self.settings,
            req,
        )
        .await
        .map_err(to_rpc_error)?;

        Ok(entry.into())
    }

    /// queue.update_status.v1
    pub async fn update_status(
        &self,
        params: UpdateStatusRequest,
    ) -> Result<QueueEntryView, ErrorObjectOwned> {
        self.throttle().await?;

        let req = lifecycle::UpdateStatusRequest {
            status: params.status,
            medical_record_id: params.medical_record_id,
        };

        let entry = lifecycle::update_status(
            self.repo.as_ref(),
            self.directory.as_ref(),
            self.audit.as_ref(),
            self.time_provider.as_ref(),
            &self.settings,
            &params.queue_id,
            req,
        )
        .await
        .map_err(to_rpc_error)?;

        Ok(entry.into())
    }

    /// queue.transfer.v1
    pub async fn transfer(
        &self,
        params: TransferRequest,
    ) -> Result<TransferView, ErrorObjectOwned> {
        self.throttle().await?;

        let req = transfer::TransferRequest {
            to_doctor_id: params.to_doctor_id,
            to_department_id: params.to_department_id,
            reason: params.reason,
            transferred_by: params.transferred_by,
        };

        let record = transfer::execute(
            self.tx_repo.as_ref(),
            self.repo.as_ref(),
            self.directory.as_ref(),
            self.audit.as_ref(),
            self.id_provider.as_ref(),
            self.time_provider.as_ref(),
            &self.settings,
            &params.queue_id,
            req,
        )
        .await
        .map_err(to_rpc_error)?;

        Ok(record.into())
    }

    /// queue.transfers.v1
    pub async fn list_transfers(
        &self,
        params: ListTransfersRequest,
    ) -> Result<ListTransfersResponse, ErrorObjectOwned> {
        let transfers = transfer::list_transfers(self.repo.as_ref(), &params.queue_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(ListTransfersResponse {
            queue_id: params.queue_id,
            transfers: transfers.into_iter().map(TransferView::from).collect(),
        })
    }

    /// queue.snapshot.v1
    pub async fn snapshot(
        &self,
        params: SnapshotRequest,
    ) -> Result<SnapshotResponse, ErrorObjectOwned> {
        let date = params.date.unwrap_or_else(|| {
            self.settings
                .facility_date(self.time_provider.now_millis())
        });

        let snap = snapshot::execute(self.repo.as_ref(), date)
            .await
            .map_err(to_rpc_error)?;

        Ok(snap.into())
    }

    /// queue.delete.v1
    pub async fn delete(&self, params: DeleteRequest) -> Result<DeleteResponse, ErrorObjectOwned> {
        self.throttle().await?;

        lifecycle::delete_entry(
            self.repo.as_ref(),
            self.directory.as_ref(),
            self.audit.as_ref(),
            &self.settings,
            &params.queue_id,
        )
        .await
        .map_err(to_rpc_error)?;

        Ok(DeleteResponse {
            queue_id: params.queue_id,
            deleted: true,
        })
    }
}
