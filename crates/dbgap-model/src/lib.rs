pub mod error;
pub mod repository;
pub mod study;

pub use error::{ModelError, Result};
pub use repository::{DEFAULT_BRANCH, RepositoryRef};
pub use study::{Section, Study, UNSECTIONED, Value, Variable};
