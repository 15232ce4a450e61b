//! Error types for walking and parsing repository trees.

use thiserror::Error;

use dbgap_store::StoreError;

/// Structural errors raised while parsing one dbGaP XML document.
///
/// These are all fatal: they mean the upstream generator produced invalid
/// dbGaP XML, which has to be fixed at the source rather than skipped.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("invalid attribute syntax: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    #[error("invalid escape sequence: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    #[error("document has no root element")]
    MissingRoot,

    #[error("document ended before the open element was closed")]
    UnexpectedEof,

    #[error("root element is missing the study_id attribute")]
    MissingStudyId,

    #[error("unexpected element <{tag}> under the document root; only <variable> is allowed")]
    UnexpectedTag { tag: String },

    #[error("variable '{variable_id}' has more than one <{tag}> child")]
    DuplicateChild { variable_id: String, tag: String },

    #[error("a <value> under variable '{variable_id}' is missing the code attribute")]
    MissingValueCode { variable_id: String },

    #[error("unknown entity reference '&{name};'")]
    UnknownEntity { name: String },
}

/// Errors raised while indexing a repository tree.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to parse {filepath} in repository {repository}: {source}")]
    Parse {
        repository: String,
        filepath: String,
        #[source]
        source: ParseError,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
