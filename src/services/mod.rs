pub mod catalog;
pub mod responder;
pub mod response_generator;
pub mod variant;

// Re-export for convenience
pub use catalog::Competency;
pub use responder::{MockResponder, Responder, ResponderError};
pub use response_generator::{Evaluation, Mode, ResponseGenerator};
pub use variant::{Variant, VariantProfile};
