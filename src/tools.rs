pub mod executor;
pub mod notes;
pub mod registry;

pub use executor::{ToolError, ToolExecutor};
pub use notes::NotesIndex;
pub use registry::{Tool, ToolRegistry};
