pub mod loaders;
pub mod phrasebook;
mod types;

pub use loaders::json::PhrasebookLoader;
pub use phrasebook::Phrasebook;
