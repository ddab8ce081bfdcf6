pub mod loader;
pub mod question;

pub use loader::{LoadError, LoadHandle, QuestionSource};
pub use question::Question;
