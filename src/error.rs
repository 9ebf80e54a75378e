use redis::RedisError;
use thiserror::Error;

/// Errors surfaced by the key wrappers and the store.
#[derive(Debug, Error)]
pub enum Error {
    /// A key wrapper was built without a `tpl` option.
    #[error("Template(tpl) needed for redis keys")]
    MissingTemplate,

    /// The template could not be parsed.
    #[error("invalid key template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    /// A placeholder in the template had no matching argument.
    #[error("no value supplied for placeholder '{0}'")]
    MissingArgument(String),

    #[error(transparent)]
    Redis(#[from] RedisError),
}

pub type Result<T> = std::result::Result<T, Error>;
