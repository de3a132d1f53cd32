use frr_report::ReportError;
use frr_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("required fields missing")]
    IncompleteReport,
    #[error("unknown incident category: {0}")]
    UnknownCategory(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("nothing staged for this session")]
    NothingStaged,
    #[error("form session already submitted")]
    AlreadySubmitted,
    #[error("report error: {0}")]
    Report(#[from] ReportError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
