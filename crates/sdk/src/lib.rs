//! Medq SDK - Rust Client Library
//!
//! Provides a convenient client for interacting with the Medq Queue Engine daemon.
//!
//! # Example
//!
//! ```no_run
//! use medq_sdk::{CreateRequest, MedqClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect to daemon
//!     let client = MedqClient::connect("http://127.0.0.1:9533").await?;
//!
//!     // Register a walk-in patient
//!     let entry = client.create(CreateRequest {
//!         patient_id: 42,
//!         reason_for_visit: "fever and cough".to_string(),
//!         department_id: Some(3),
//!         doctor_id: None,
//!         priority: Some("senior".to_string()),
//!         queue_date: None,
//!     }).await?;
//!
//!     println!("Queue number: {}", entry.queue_number);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::MedqClient;
pub use error::{Result, SdkError};
pub use types::{
    CreateRequest, DeleteResponse, ListTransfersResponse, QueueEntryView, SnapshotResponse,
    StatusCounts, TransferRequest, TransferView, UpdateStatusRequest,
};
