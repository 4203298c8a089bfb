use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Fetch aborted before completion")]
    FetchAborted,
}

pub type CommonResult<T> = std::result::Result<T, CommonError>;
