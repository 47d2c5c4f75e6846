//! In-memory semantic model
//!
//! A [`Program`] is a snapshot of everything the type checker knows about a
//! project: the syntax arena, the symbol table and the resolved type and
//! signature tables. Front ends serialize it as JSON; tests build it with
//! [`crate::builder::ProgramBuilder`].

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreError;
use crate::semantic::{SemanticModel, Signature, Symbol, TypeInfo};
use crate::syntax::{FileId, Node, NodeId, SourceFile, SymbolId};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub files: Vec<SourceFile>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub symbols: Vec<Symbol>,
    /// Symbol bound at each name location
    #[serde(default)]
    pub symbol_at: BTreeMap<NodeId, SymbolId>,
    #[serde(default)]
    pub types: BTreeMap<NodeId, TypeInfo>,
    #[serde(default)]
    pub signatures: BTreeMap<NodeId, Signature>,
    #[serde(default)]
    pub module_symbols: BTreeMap<FileId, SymbolId>,
    /// Exports per module symbol, in declaration order
    #[serde(default)]
    pub exports: BTreeMap<SymbolId, Vec<SymbolId>>,
    /// File-local bindings per file
    #[serde(default)]
    pub locals: BTreeMap<FileId, IndexMap<String, SymbolId>>,
}

impl Program {
    pub fn from_json(content: &str) -> Result<Self, CoreError> {
        let program: Program = serde_json::from_str(content)?;
        program.validate()?;
        debug!(
            "Loaded program with {} files, {} nodes, {} symbols",
            program.files.len(),
            program.nodes.len(),
            program.symbols.len()
        );
        Ok(program)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every id stored in the tables points into the arenas.
    ///
    /// Ids must equal their position in their arena, so lookups stay O(1).
    pub fn validate(&self) -> Result<(), CoreError> {
        for (index, file) in self.files.iter().enumerate() {
            if file.id.index() != index {
                return Err(CoreError::UnknownFile(file.id));
            }
            for statement in &file.statements {
                self.check_node(*statement)?;
            }
        }

        for (index, node) in self.nodes.iter().enumerate() {
            if node.id.index() != index {
                return Err(CoreError::UnknownNode(node.id));
            }
            self.check_file(node.file)?;
            if let Some(parent) = node.parent {
                self.check_node(parent)?;
            }
            for child in node.kind.children() {
                self.check_node(child)?;
            }
        }

        for (index, symbol) in self.symbols.iter().enumerate() {
            if symbol.id.index() != index {
                return Err(CoreError::UnknownSymbol(symbol.id));
            }
            for declaration in symbol.declarations.iter().chain(&symbol.value_declaration) {
                self.check_node(*declaration)?;
            }
            if let Some(target) = symbol.alias_of {
                self.check_symbol(target)?;
            }
        }

        for (node, symbol) in &self.symbol_at {
            self.check_node(*node)?;
            self.check_symbol(*symbol)?;
        }
        for (node, info) in &self.types {
            self.check_node(*node)?;
            if let Some(symbol) = info.symbol {
                self.check_symbol(symbol)?;
            }
        }
        for (node, signature) in &self.signatures {
            self.check_node(*node)?;
            if let Some(declaration) = signature.declaration {
                self.check_node(declaration)?;
            }
        }
        for (file, symbol) in &self.module_symbols {
            self.check_file(*file)?;
            self.check_symbol(*symbol)?;
        }
        for (module, exported) in &self.exports {
            self.check_symbol(*module)?;
            for symbol in exported {
                self.check_symbol(*symbol)?;
            }
        }
        for (file, bindings) in &self.locals {
            self.check_file(*file)?;
            for symbol in bindings.values() {
                self.check_symbol(*symbol)?;
            }
        }

        Ok(())
    }

    fn check_node(&self, id: NodeId) -> Result<(), CoreError> {
        if id.index() < self.nodes.len() {
            Ok(())
        } else {
            Err(CoreError::UnknownNode(id))
        }
    }

    fn check_symbol(&self, id: SymbolId) -> Result<(), CoreError> {
        if id.index() < self.symbols.len() {
            Ok(())
        } else {
            Err(CoreError::UnknownSymbol(id))
        }
    }

    fn check_file(&self, id: FileId) -> Result<(), CoreError> {
        if id.index() < self.files.len() {
            Ok(())
        } else {
            Err(CoreError::UnknownFile(id))
        }
    }
}

impl FromStr for Program {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json(s)
    }
}

impl SemanticModel for Program {
    fn files(&self) -> &[SourceFile] {
        &self.files
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    fn file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.index())
    }

    fn file_by_path(&self, path: &str) -> Option<&SourceFile> {
        let wanted = path.strip_prefix("./").unwrap_or(path);
        self.files
            .iter()
            .find(|file| file.path.strip_prefix("./").unwrap_or(&file.path) == wanted)
    }

    fn module_symbol(&self, file: FileId) -> Option<SymbolId> {
        self.module_symbols.get(&file).copied()
    }

    fn exports_of(&self, module: SymbolId) -> Vec<SymbolId> {
        self.exports.get(&module).cloned().unwrap_or_default()
    }

    fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    fn symbol_at(&self, node: NodeId) -> Option<SymbolId> {
        self.symbol_at.get(&node).copied()
    }

    fn type_of(&self, node: NodeId) -> Option<TypeInfo> {
        self.types.get(&node).cloned()
    }

    fn signature_of(&self, node: NodeId) -> Option<Signature> {
        self.signatures.get(&node).cloned()
    }

    fn local_symbol(&self, file: FileId, name: &str) -> Option<SymbolId> {
        self.locals.get(&file)?.get(name).copied()
    }
}
