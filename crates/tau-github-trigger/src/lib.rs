//! GitHub trigger normalization and instruction-document assembly for Tau.
//! This crate validates webhook triggers into typed commands, derives the
//! agent capability set, and renders the instruction document. It performs no I/O.

pub mod compare_link;
pub mod fetched_context;
pub mod instruction_document;
pub mod markup_sanitizer;
pub mod trigger_capabilities;
pub mod trigger_classifier;
pub mod trigger_context;
pub mod trigger_error;
pub mod trigger_normalizer;
pub mod trigger_pipeline;

pub use fetched_context::FetchedContext;
pub use instruction_document::{render_instruction_document, InstructionDocumentRequest};
pub use trigger_capabilities::{build_allowed_tools, build_disallowed_tools};
pub use trigger_classifier::{classify_trigger, TriggerCategory, TriggerClassification};
pub use trigger_context::{RawTriggerContext, TriggerEventKind, TriggerInputs, TriggerPayload};
pub use trigger_error::TriggerContextError;
pub use trigger_normalizer::{
    normalize_trigger_context, CommonFields, NormalizedCommand, PreparedTrigger, TriggerBranches,
};
pub use trigger_pipeline::{build_trigger_prompt, TriggerPromptArtifacts, TriggerPromptRequest};
