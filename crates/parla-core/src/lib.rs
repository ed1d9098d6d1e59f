pub mod connectivity;
pub mod dictionary;
pub mod language;
pub mod orchestrator;
pub mod outcome;
pub mod preprocess;
pub mod session;

pub use connectivity::Connectivity;
pub use dictionary::{Dictionary, DictionaryMetadata, OfflineResolver};
pub use orchestrator::{Orchestrator, TranslationFailure};
pub use outcome::Outcome;
pub use session::{Session, Ticket};
