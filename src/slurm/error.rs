use std::fmt;

#[derive(Debug)]
pub enum CollectError {
    CommandNotFound(String),
    CommandSpawnFailed(String),
    CommandExited(String),
    InvalidJson(String),
    Output(String),
}

impl fmt::Display for CollectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectError::CommandNotFound(msg) => write!(f, "Command not found: {}", msg),
            CollectError::CommandSpawnFailed(msg) => write!(f, "Command failed to start: {}", msg),
            CollectError::CommandExited(msg) => write!(f, "Command exited with an error: {}", msg),
            CollectError::InvalidJson(msg) => write!(f, "Invalid JSON: {}", msg),
            CollectError::Output(msg) => write!(f, "Unable to render output: {}", msg),
        }
    }
}

impl std::error::Error for CollectError {}

impl From<std::io::Error> for CollectError {
    fn from(err: std::io::Error) -> Self {
        CollectError::CommandSpawnFailed(format!("{}", err))
    }
}

impl From<serde_json::Error> for CollectError {
    fn from(err: serde_json::Error) -> Self {
        CollectError::InvalidJson(format!("{}", err))
    }
}
