/// A trace without a detectable peak is not an error; see `FitResult::NoPeak`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DpvError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("fitting failed: {0}")]
    Fitting(String),

    #[error("trace {index}: {source}")]
    Trace {
        index: usize,
        #[source]
        source: Box<DpvError>,
    },
}

impl DpvError {
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        DpvError::MalformedInput(message.into())
    }

    pub fn fitting<S: Into<String>>(message: S) -> Self {
        DpvError::Fitting(message.into())
    }

    pub fn in_trace(self, index: usize) -> Self {
        DpvError::Trace {
            index,
            source: Box::new(self),
        }
    }
}

pub type DpvResult<T> = Result<T, DpvError>;
