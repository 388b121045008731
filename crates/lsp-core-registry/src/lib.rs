//! The language-id → plugin registry and URI → [`File`] router every
//! language plugin registers itself into, plus the hover payload type
//! plugins hand back to the dispatcher.

pub mod hover;
pub mod registry;

pub use hover::Hover;
pub use registry::{
    Command, CommandHandler, CommandTable, File, Language, LanguageCallbacks, LanguageDef, Languages, RegistryError,
};
