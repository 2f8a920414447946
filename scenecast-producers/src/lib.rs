//! Stage producers — everything that proposes update batches for the ledger.
//!
//! Each enrichment stage pairs a [`StageProducer`] with a collaborator trait
//! for its external dependency (model call, timing computation, image
//! source). Producers read the ledger and return an [`UpdateBatch`]; they
//! never write scene state themselves.
//!
//! [`UpdateBatch`]: scenecast_core::UpdateBatch

pub mod annotation;
pub mod duration;
pub mod error;
pub mod narration;
pub mod producer;
pub mod visual;
pub mod wire;

pub use annotation::{AnnotationProducer, AnnotationSource};
pub use duration::{DurationProducer, TimingSource};
pub use error::{CollaboratorError, ProduceError, WireError};
pub use narration::{NarrationProducer, NarrationSource, SceneScript};
pub use producer::StageProducer;
pub use visual::{image_slide, SceneBrief, VisualProducer, VisualSource};
pub use wire::WireBatchProducer;
