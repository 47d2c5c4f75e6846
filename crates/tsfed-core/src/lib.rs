//! Syntax arena, semantic model and configuration for tsfed

pub mod builder;
pub mod error;
pub mod manifest;
pub mod naming;
pub mod program;
pub mod semantic;
pub mod syntax;

pub use builder::ProgramBuilder;
pub use error::CoreError;
pub use manifest::{FederationManifest, LayoutKind};
pub use program::Program;
pub use semantic::{SemanticModel, Signature, Symbol, TypeInfo};
pub use syntax::{
    FileId, FileOrigin, FunctionBody, HeritageToken, MethodKind, Modifier, Node, NodeId, NodeKey,
    NodeKind, SourceFile, Span, SymbolId,
};
