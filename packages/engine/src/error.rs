#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeosqlError {
    pub message: String,
}

impl GeosqlError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for GeosqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for GeosqlError {}
