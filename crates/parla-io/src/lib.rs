pub mod capability;
pub mod clipboard;
pub mod speech;
pub mod ws;

pub use capability::{CapabilityError, Clipboard, SpeechCapture, SpeechEvent, SpeechPlayback};
pub use clipboard::SystemClipboard;
pub use speech::{CommandCapture, CommandPlayback};
