//! Imagelens analysis pipeline
//!
//! [`AnalysisOrchestrator`] wires source resolution, normalization and a
//! vision provider together for one image and always answers with a
//! [`ProcessingEnvelope`]. Batches run through the same orchestrator and
//! produce a [`BatchEnvelope`] whose results stay index-aligned with the
//! input.
//!
//! [`ImageTools`] is the string-argument surface used by front ends.

pub mod batch;
pub mod envelope;
pub mod error;
pub mod orchestrator;
pub mod progress;
pub mod request;
pub mod tools;

pub use envelope::{AnalysisMetadata, AnalysisResult, BatchEnvelope, ProcessingEnvelope};
pub use error::{PipelineError, Result};
pub use orchestrator::AnalysisOrchestrator;
pub use progress::{BatchProgress, NoopProgress, TracingProgress};
pub use request::{AnalysisRequest, BatchRequest, ImageRequest};
pub use tools::{ImageTools, ToolOptions};
