use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A line starting with a device instance token did not match
    /// the instance grammar.
    #[error("malformed device instance line: `{0}`")]
    MalformedInstance(String),
}
