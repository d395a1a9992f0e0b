use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("selector parse error in '{expr}': {message}")]
    Parse { expr: String, message: String },
}
