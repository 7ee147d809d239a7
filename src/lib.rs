pub mod errors;
pub mod generator;
pub mod providers;
pub mod session;
pub mod tools;

pub use errors::{GenerateError, Phase};
pub use generator::{ResponseGenerator, SYSTEM_PROMPT};
