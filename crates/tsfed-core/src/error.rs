use thiserror::Error;

use crate::syntax::{FileId, NodeId, SymbolId};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Failed to read manifest '{path}': {source}")]
    ManifestRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest: {0}")]
    ManifestParse(#[from] toml::de::Error),

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Invalid program snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("Program references unknown node {0:?}")]
    UnknownNode(NodeId),

    #[error("Program references unknown symbol {0:?}")]
    UnknownSymbol(SymbolId),

    #[error("Program references unknown file {0:?}")]
    UnknownFile(FileId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
