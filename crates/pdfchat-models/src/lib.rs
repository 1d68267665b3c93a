// Models module - data structures for provider API communication
pub mod requests;
pub mod responses;


// Re-export commonly used types
pub use requests::{ChatRequest, WireMessage};
pub use responses::{ApiErrorBody, ApiErrorDetail, StreamChoice, StreamChunk, StreamDelta, Usage};
