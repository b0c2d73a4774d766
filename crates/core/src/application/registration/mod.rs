// Queue Registration Use Cases

pub mod create;


pub use create::{validate_request, CreateEntryRequest};
