use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContextError {
    #[error("Tokenizer error for model '{model}': {message}")]
    Tokenizer { model: String, message: String },
}

pub type Result<T> = std::result::Result<T, ContextError>;
