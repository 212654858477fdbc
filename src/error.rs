#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to spawn `{shell}`: {message}")]
    Spawn { shell: String, message: String },

    #[error("unknown layout `{0}` (expected `side-by-side` or `stacked`)")]
    UnknownLayout(String),
}
