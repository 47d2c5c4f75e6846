use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("The file extension must be \".ts\" - {path}")]
    InvalidExtension { path: String },

    #[error("Invalid remote URL: {url}")]
    InvalidUrl { url: String },

    #[error("Request to {url} failed with status {status}")]
    Http { url: String, status: u16 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
