pub mod content;
pub mod file;
pub mod message;
pub mod run;

pub use content::{MessageContent, TextContent};
pub use file::{FileObject, ASSISTANTS_PURPOSE};
pub use message::{Attachment, AttachmentTool, ListOrder, MessageRole, NewMessage, ThreadMessage};
pub use run::{Run, RunError, RunStatus};
