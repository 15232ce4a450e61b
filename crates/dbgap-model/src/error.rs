use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid repository reference '{reference}': expected NAME or NAME:BRANCH")]
    InvalidRepositoryRef { reference: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
