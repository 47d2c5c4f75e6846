//! Remote declaration loader for tsfed
//!
//! Downloads the declaration files other federated builds publish so the
//! local project can type-check against them.

pub mod error;
pub mod remote;

pub use error::LoaderError;
pub use remote::{FetchOutcome, RemoteLoader};
