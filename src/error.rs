use crate::plot::ParamId;
use thiserror::Error;

/// Failures raised while applying a user gesture to the document.
///
/// None of these are fatal: the controller reports them as a status message and keeps running.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavigatorError {
    #[error("parameter #{} is no longer part of the plot", .0.index())]
    MissingParameter(ParamId),
    #[error("recalculating '{name}' failed: {reason}")]
    Recalc { name: String, reason: String },
}

pub type NavigatorResult<T> = Result<T, NavigatorError>;
