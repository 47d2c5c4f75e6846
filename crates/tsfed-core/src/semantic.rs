//! The read-only semantic model consumed by code generation
//!
//! A [`SemanticModel`] answers the questions a type checker would: which
//! symbol a name refers to, what a symbol's declarations are, what type an
//! expression has. Code generation never mutates the model, so a single
//! instance can be shared by every entry-point compilation.

use serde::{Deserialize, Serialize};

use crate::syntax::{FileId, FileOrigin, Node, NodeId, SourceFile, SymbolId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    #[serde(default)]
    pub declarations: Vec<NodeId>,
    #[serde(default)]
    pub value_declaration: Option<NodeId>,
    /// Target of an import or export alias
    #[serde(default)]
    pub alias_of: Option<SymbolId>,
}

impl Symbol {
    /// The value declaration when present, the first declaration otherwise
    pub fn primary_declaration(&self) -> Option<NodeId> {
        self.value_declaration
            .or_else(|| self.declarations.first().copied())
    }
}

/// A type as the checker would print it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    /// Printed form, possibly containing `import("...")` qualifiers
    pub text: String,
    /// Symbol the type originates from, if it has one
    #[serde(default)]
    pub symbol: Option<SymbolId>,
}

impl TypeInfo {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            symbol: None,
        }
    }

    pub fn with_symbol(mut self, symbol: SymbolId) -> Self {
        self.symbol = Some(symbol);
        self
    }
}

/// Resolved call signature of a call-like node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub parameters: Vec<TypeInfo>,
    pub return_type: TypeInfo,
    #[serde(default)]
    pub declaration: Option<NodeId>,
}

pub trait SemanticModel {
    fn files(&self) -> &[SourceFile];

    fn node(&self, id: NodeId) -> Option<&Node>;

    fn file(&self, id: FileId) -> Option<&SourceFile>;

    fn file_by_path(&self, path: &str) -> Option<&SourceFile>;

    /// Symbol representing the module defined by a file
    fn module_symbol(&self, file: FileId) -> Option<SymbolId>;

    /// Exported symbols of a module, in declaration order
    fn exports_of(&self, module: SymbolId) -> Vec<SymbolId>;

    fn symbol(&self, id: SymbolId) -> Option<&Symbol>;

    /// Symbol bound at a name location (identifier, qualified name or a
    /// declaration node)
    fn symbol_at(&self, node: NodeId) -> Option<SymbolId>;

    fn type_of(&self, node: NodeId) -> Option<TypeInfo>;

    fn signature_of(&self, node: NodeId) -> Option<Signature>;

    /// File-local binding lookup by name, including import bindings
    fn local_symbol(&self, file: FileId, name: &str) -> Option<SymbolId>;

    fn declarations_of(&self, symbol: SymbolId) -> Vec<NodeId> {
        self.symbol(symbol)
            .map(|symbol| symbol.declarations.clone())
            .unwrap_or_default()
    }

    /// Follow alias links to the symbol that actually declares something.
    ///
    /// Alias chains are finite in a well-formed program; a cycle stops at the
    /// last symbol visited before repeating.
    fn resolve_alias(&self, symbol: SymbolId) -> SymbolId {
        let mut current = symbol;
        let mut seen = vec![current];
        while let Some(target) = self.symbol(current).and_then(|s| s.alias_of) {
            if seen.contains(&target) {
                break;
            }
            seen.push(target);
            current = target;
        }
        current
    }

    fn source_file_of(&self, node: NodeId) -> Option<&SourceFile> {
        self.node(node).and_then(|node| self.file(node.file))
    }

    fn is_standard_library(&self, node: NodeId) -> bool {
        self.source_file_of(node)
            .is_some_and(|file| file.origin == FileOrigin::StandardLibrary)
    }

    fn is_external_package(&self, node: NodeId) -> bool {
        self.source_file_of(node)
            .is_some_and(|file| file.origin == FileOrigin::ExternalPackage)
    }

    /// First declaration of the symbol a type originates from
    fn type_declaration(&self, node: NodeId) -> Option<NodeId> {
        let symbol = self.type_of(node)?.symbol?;
        self.declarations_of(symbol).first().copied()
    }
}
