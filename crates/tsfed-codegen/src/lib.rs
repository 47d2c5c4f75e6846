//! Closure building and ambient module generation for federated declarations

pub mod closure;
pub mod compiler;
pub mod context;
pub mod declaration;
pub mod error;
pub mod linked_nodes;
pub mod printer;
pub mod text;

pub use closure::{ClosureBuilder, ParsedModule, ReExportEntry};
pub use compiler::{CompileOptions, CompileReport, Compiler, ModuleSummary};
pub use context::{CompilationContext, DeclId};
pub use declaration::{DeclarationKind, DeclarationParser, ParsedDeclaration};
pub use error::{format_omissions, CodegenError, Omission, OmissionReason};
pub use linked_nodes::{LinkedNodeFinder, ReferenceShape};
pub use printer::{Layout, ModulePrinter, PrintOptions};
