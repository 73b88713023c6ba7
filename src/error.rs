use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewerError {
    /// `pop` was called with no matching `push`.
    #[error("transform stack underflow: pop without a matching push")]
    StackUnderflow,

    #[error("transform stack left unbalanced at end of frame ({depth} saved transform(s) remaining)")]
    UnbalancedStack { depth: usize },

    #[error("unknown primitive '{0}' (expected sphere, cube, cylinder, pyramid or torus)")]
    UnknownPrimitive(String),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
