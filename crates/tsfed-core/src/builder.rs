//! Fluent construction of [`Program`] snapshots
//!
//! Front ends that walk a real type checker and tests that need a small
//! hand-made program both go through this builder. Spans are assigned from a
//! per-file cursor so every node gets a distinct, stable position, and parent
//! links are filled in as soon as a node mentions its children.

use crate::program::Program;
use crate::semantic::{Signature, Symbol, TypeInfo};
use crate::syntax::{
    FileId, FileOrigin, Modifier, Node, NodeId, NodeKind, SourceFile, Span, SymbolId,
};

#[derive(Debug, Default)]
pub struct ProgramBuilder {
    program: Program,
    cursors: Vec<u32>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&mut self, path: impl Into<String>, origin: FileOrigin) -> FileId {
        let id = FileId(self.program.files.len() as u32);
        self.program.files.push(SourceFile {
            id,
            path: path.into(),
            origin,
            statements: Vec::new(),
        });
        self.cursors.push(0);
        id
    }

    /// Add a node to the arena. Children mentioned by `kind` get this node
    /// as their parent.
    pub fn node(&mut self, file: FileId, text: impl Into<String>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.program.nodes.len() as u32);
        let text = text.into();

        let span = match self.cursors.get_mut(file.index()) {
            Some(cursor) => {
                let start = *cursor;
                let end = start + text.len() as u32;
                *cursor = end + 1;
                Span { start, end }
            }
            None => Span::default(),
        };

        for child in kind.children() {
            if let Some(node) = self.program.nodes.get_mut(child.index()) {
                node.parent = Some(id);
            }
        }

        self.program.nodes.push(Node {
            id,
            file,
            span,
            parent: None,
            text,
            doc: None,
            kind,
        });
        id
    }

    /// Add a node and append it to the file's top-level statements
    pub fn statement(&mut self, file: FileId, text: impl Into<String>, kind: NodeKind) -> NodeId {
        let id = self.node(file, text, kind);
        if let Some(source) = self.program.files.get_mut(file.index()) {
            source.statements.push(id);
        }
        id
    }

    /// Place a node inside a namespace or module declaration
    pub fn nest(&mut self, container: NodeId, statement: NodeId) -> &mut Self {
        if let Some(node) = self.program.nodes.get_mut(container.index()) {
            if let NodeKind::ModuleDeclaration { statements, .. } = &mut node.kind {
                statements.push(statement);
            }
        }
        if let Some(node) = self.program.nodes.get_mut(statement.index()) {
            node.parent = Some(container);
        }
        if let Some(file) = self.program.nodes.get(statement.index()).map(|node| node.file) {
            if let Some(source) = self.program.files.get_mut(file.index()) {
                source.statements.retain(|id| *id != statement);
            }
        }
        self
    }

    pub fn doc(&mut self, node: NodeId, doc: impl Into<String>) -> &mut Self {
        if let Some(node) = self.program.nodes.get_mut(node.index()) {
            node.doc = Some(doc.into());
        }
        self
    }

    pub fn symbol(&mut self, name: impl Into<String>, declarations: &[NodeId]) -> SymbolId {
        let id = SymbolId(self.program.symbols.len() as u32);
        self.program.symbols.push(Symbol {
            id,
            name: name.into(),
            declarations: Vec::new(),
            value_declaration: None,
            alias_of: None,
        });
        for declaration in declarations {
            self.declare(id, *declaration);
        }
        id
    }

    /// Import or export alias of `target`
    pub fn alias_symbol(
        &mut self,
        name: impl Into<String>,
        declarations: &[NodeId],
        target: SymbolId,
    ) -> SymbolId {
        let id = self.symbol(name, declarations);
        if let Some(symbol) = self.program.symbols.get_mut(id.index()) {
            symbol.alias_of = Some(target);
        }
        id
    }

    /// Attach a declaration to a symbol and bind the symbol at it
    pub fn declare(&mut self, symbol: SymbolId, declaration: NodeId) -> &mut Self {
        let is_value = self
            .program
            .nodes
            .get(declaration.index())
            .is_some_and(|node| {
                matches!(
                    node.kind,
                    NodeKind::VariableDeclaration { .. }
                        | NodeKind::FunctionDeclaration { .. }
                        | NodeKind::ClassDeclaration { .. }
                        | NodeKind::EnumDeclaration { .. }
                )
            });
        if let Some(entry) = self.program.symbols.get_mut(symbol.index()) {
            entry.declarations.push(declaration);
            if is_value && entry.value_declaration.is_none() {
                entry.value_declaration = Some(declaration);
            }
        }
        self.bind(declaration, symbol)
    }

    pub fn bind(&mut self, node: NodeId, symbol: SymbolId) -> &mut Self {
        self.program.symbol_at.insert(node, symbol);
        self
    }

    pub fn set_type(&mut self, node: NodeId, info: TypeInfo) -> &mut Self {
        self.program.types.insert(node, info);
        self
    }

    pub fn set_signature(&mut self, node: NodeId, signature: Signature) -> &mut Self {
        self.program.signatures.insert(node, signature);
        self
    }

    /// Export `symbol` from the module defined by `file`, creating the
    /// module symbol on first use
    pub fn export(&mut self, file: FileId, symbol: SymbolId) -> &mut Self {
        let module = self.module_symbol(file);
        self.program.exports.entry(module).or_default().push(symbol);
        self
    }

    pub fn module_symbol(&mut self, file: FileId) -> SymbolId {
        if let Some(module) = self.program.module_symbols.get(&file) {
            return *module;
        }
        let path = self
            .program
            .files
            .get(file.index())
            .map(|source| source.path.clone())
            .unwrap_or_default();
        let module = self.symbol(format!("\"{path}\""), &[]);
        self.program.module_symbols.insert(file, module);
        module
    }

    /// Register a file-local binding
    pub fn local(&mut self, file: FileId, name: impl Into<String>, symbol: SymbolId) -> &mut Self {
        self.program
            .locals
            .entry(file)
            .or_default()
            .insert(name.into(), symbol);
        self
    }

    /// File-local binding registered so far
    pub fn local_symbol(&self, file: FileId, name: &str) -> Option<SymbolId> {
        self.program
            .locals
            .get(&file)
            .and_then(|locals| locals.get(name))
            .copied()
    }

    pub fn text_of(&self, node: NodeId) -> String {
        self.program
            .nodes
            .get(node.index())
            .map(|node| node.text.clone())
            .unwrap_or_default()
    }

    fn join_texts(&self, nodes: &[NodeId], separator: &str) -> String {
        nodes
            .iter()
            .map(|node| self.text_of(*node))
            .collect::<Vec<_>>()
            .join(separator)
    }

    pub fn keyword(&mut self, file: FileId, keyword: &str) -> NodeId {
        self.node(file, keyword, NodeKind::KeywordType)
    }

    pub fn literal_type(&mut self, file: FileId, text: &str) -> NodeId {
        self.node(file, text, NodeKind::LiteralType)
    }

    pub fn literal(&mut self, file: FileId, text: &str) -> NodeId {
        self.node(file, text, NodeKind::Literal)
    }

    pub fn identifier(&mut self, file: FileId, name: &str, symbol: Option<SymbolId>) -> NodeId {
        let id = self.node(
            file,
            name,
            NodeKind::Identifier {
                name: name.to_string(),
            },
        );
        if let Some(symbol) = symbol {
            self.bind(id, symbol);
        }
        id
    }

    /// `Name` or `Name<A, B>`, with the name bound to `symbol`
    pub fn type_ref(
        &mut self,
        file: FileId,
        name: &str,
        symbol: Option<SymbolId>,
        arguments: &[NodeId],
    ) -> NodeId {
        let type_name = self.identifier(file, name, symbol);
        let text = if arguments.is_empty() {
            name.to_string()
        } else {
            format!("{}<{}>", name, self.join_texts(arguments, ", "))
        };
        self.node(
            file,
            text,
            NodeKind::TypeReference {
                type_name,
                type_arguments: arguments.to_vec(),
            },
        )
    }

    pub fn union_type(&mut self, file: FileId, types: &[NodeId]) -> NodeId {
        let text = self.join_texts(types, " | ");
        self.node(
            file,
            text,
            NodeKind::UnionType {
                types: types.to_vec(),
            },
        )
    }

    pub fn array_type(&mut self, file: FileId, element: NodeId) -> NodeId {
        let text = format!("{}[]", self.text_of(element));
        self.node(file, text, NodeKind::ArrayType { element })
    }

    pub fn property_signature(
        &mut self,
        file: FileId,
        name: &str,
        ty: NodeId,
        optional: bool,
    ) -> NodeId {
        let marker = if optional { "?" } else { "" };
        let text = format!("{}{}: {}", name, marker, self.text_of(ty));
        self.node(
            file,
            text,
            NodeKind::PropertySignature {
                name: name.to_string(),
                computed_name: None,
                type_annotation: Some(ty),
                optional,
            },
        )
    }

    pub fn parameter(&mut self, file: FileId, name: &str, ty: Option<NodeId>) -> NodeId {
        let text = match ty {
            Some(ty) => format!("{}: {}", name, self.text_of(ty)),
            None => name.to_string(),
        };
        self.node(
            file,
            text,
            NodeKind::Parameter {
                name: name.to_string(),
                modifiers: vec![],
                type_annotation: ty,
                initializer: None,
                optional: false,
                rest: false,
            },
        )
    }

    pub fn type_parameter(&mut self, file: FileId, name: &str, constraint: Option<NodeId>) -> NodeId {
        let text = match constraint {
            Some(constraint) => format!("{} extends {}", name, self.text_of(constraint)),
            None => name.to_string(),
        };
        self.node(
            file,
            text,
            NodeKind::TypeParameter {
                name: name.to_string(),
                constraint,
                default: None,
            },
        )
    }

    /// Top-level `[export] interface Name<T> { members }`
    pub fn interface(
        &mut self,
        file: FileId,
        name: &str,
        type_parameters: &[NodeId],
        members: &[NodeId],
        exported: bool,
    ) -> NodeId {
        let mut text = String::new();
        if exported {
            text.push_str("export ");
        }
        text.push_str("interface ");
        text.push_str(name);
        if !type_parameters.is_empty() {
            text.push_str(&format!("<{}>", self.join_texts(type_parameters, ", ")));
        }
        text.push_str(" {\n");
        for member in members {
            text.push_str(&format!("    {};\n", self.text_of(*member)));
        }
        text.push('}');

        self.statement(
            file,
            text,
            NodeKind::InterfaceDeclaration {
                name: name.to_string(),
                type_parameters: type_parameters.to_vec(),
                heritage_clauses: vec![],
                members: members.to_vec(),
            },
        )
    }

    /// Top-level `[export] type Name = ty;`
    pub fn type_alias(&mut self, file: FileId, name: &str, ty: NodeId, exported: bool) -> NodeId {
        let export = if exported { "export " } else { "" };
        let text = format!("{}type {} = {};", export, name, self.text_of(ty));
        self.statement(
            file,
            text,
            NodeKind::TypeAliasDeclaration {
                name: name.to_string(),
                type_parameters: vec![],
                ty,
            },
        )
    }

    /// Top-level `[export] function name(params): ret {}`
    pub fn function(
        &mut self,
        file: FileId,
        name: &str,
        parameters: &[NodeId],
        return_type: Option<NodeId>,
        exported: bool,
    ) -> NodeId {
        let export = if exported { "export " } else { "" };
        let returns = return_type
            .map(|ty| format!(": {}", self.text_of(ty)))
            .unwrap_or_default();
        let text = format!(
            "{}function {}({}){} {{}}",
            export,
            name,
            self.join_texts(parameters, ", "),
            returns
        );
        let modifiers = if exported { vec![Modifier::Export] } else { vec![] };
        self.statement(
            file,
            text,
            NodeKind::FunctionDeclaration {
                name: Some(name.to_string()),
                modifiers,
                type_parameters: vec![],
                parameters: parameters.to_vec(),
                return_type,
                body: None,
            },
        )
    }

    /// Top-level `[export] const name[: annotation] [= initializer];`.
    /// Returns the variable declaration; the statement is its parent.
    pub fn variable(
        &mut self,
        file: FileId,
        name: &str,
        annotation: Option<NodeId>,
        initializer: Option<NodeId>,
        exported: bool,
    ) -> NodeId {
        let mut text = name.to_string();
        if let Some(annotation) = annotation {
            text.push_str(&format!(": {}", self.text_of(annotation)));
        }
        if let Some(initializer) = initializer {
            text.push_str(&format!(" = {}", self.text_of(initializer)));
        }
        let declaration = self.node(
            file,
            text.clone(),
            NodeKind::VariableDeclaration {
                name: name.to_string(),
                type_annotation: annotation,
                initializer,
            },
        );
        let export = if exported { "export " } else { "" };
        let modifiers = if exported { vec![Modifier::Export] } else { vec![] };
        self.statement(
            file,
            format!("{export}const {text};"),
            NodeKind::VariableStatement {
                modifiers,
                declarations: vec![declaration],
            },
        );
        declaration
    }

    /// `import { property as name } from "module"`; binds the local name
    /// in the file and returns the specifier
    pub fn import_specifier(
        &mut self,
        file: FileId,
        name: &str,
        property_name: Option<&str>,
        module_specifier: &str,
        target: SymbolId,
    ) -> NodeId {
        let text = match property_name {
            Some(property) => format!("{property} as {name}"),
            None => name.to_string(),
        };
        let specifier = self.node(
            file,
            text,
            NodeKind::ImportSpecifier {
                name: name.to_string(),
                property_name: property_name.map(str::to_string),
                module_specifier: module_specifier.to_string(),
            },
        );
        let alias = self.alias_symbol(name, &[specifier], target);
        self.local(file, name, alias);
        specifier
    }

    /// `import * as name from "module"`
    pub fn namespace_import(
        &mut self,
        file: FileId,
        name: &str,
        module_specifier: &str,
        target: Option<SymbolId>,
    ) -> NodeId {
        let import = self.node(
            file,
            format!("* as {name}"),
            NodeKind::NamespaceImport {
                name: name.to_string(),
                module_specifier: module_specifier.to_string(),
            },
        );
        let symbol = match target {
            Some(target) => self.alias_symbol(name, &[import], target),
            None => self.symbol(name, &[import]),
        };
        self.local(file, name, symbol);
        import
    }

    /// `import name from "module"`
    pub fn default_import(
        &mut self,
        file: FileId,
        name: &str,
        module_specifier: &str,
        target: Option<SymbolId>,
    ) -> NodeId {
        let import = self.node(
            file,
            name,
            NodeKind::ImportClause {
                name: name.to_string(),
                module_specifier: module_specifier.to_string(),
            },
        );
        let symbol = match target {
            Some(target) => self.alias_symbol(name, &[import], target),
            None => self.symbol(name, &[import]),
        };
        self.local(file, name, symbol);
        import
    }

    /// `export { property as name } [from "module"]`, exported from `file`
    /// as an alias of `target`
    pub fn export_specifier(
        &mut self,
        file: FileId,
        name: &str,
        property_name: Option<&str>,
        module_specifier: Option<&str>,
        target: Option<SymbolId>,
    ) -> SymbolId {
        let text = match property_name {
            Some(property) => format!("{property} as {name}"),
            None => name.to_string(),
        };
        let specifier = self.node(
            file,
            text,
            NodeKind::ExportSpecifier {
                name: name.to_string(),
                property_name: property_name.map(str::to_string),
                module_specifier: module_specifier.map(str::to_string),
            },
        );
        let symbol = match target {
            Some(target) => self.alias_symbol(name, &[specifier], target),
            None => self.symbol(name, &[specifier]),
        };
        self.export(file, symbol);
        symbol
    }

    pub fn build(self) -> Program {
        self.program
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::SemanticModel;

    #[test]
    fn test_spans_are_distinct_per_file() {
        let mut builder = ProgramBuilder::new();
        let file = builder.file("src/a.ts", FileOrigin::Project);
        let first = builder.keyword(file, "string");
        let second = builder.keyword(file, "string");
        let program = builder.build();

        let first = program.node(first).map(|node| node.key());
        let second = program.node(second).map(|node| node.key());
        assert!(first.is_some());
        assert_ne!(first, second);
    }

    #[test]
    fn test_children_get_parent_links() {
        let mut builder = ProgramBuilder::new();
        let file = builder.file("src/a.ts", FileOrigin::Project);
        let string = builder.keyword(file, "string");
        let array = builder.array_type(file, string);
        let program = builder.build();

        assert_eq!(program.node(string).and_then(|node| node.parent), Some(array));
        assert_eq!(program.node(array).map(|node| node.text.as_str()), Some("string[]"));
    }

    #[test]
    fn test_variable_statement_owns_declaration() {
        let mut builder = ProgramBuilder::new();
        let file = builder.file("src/a.ts", FileOrigin::Project);
        let number = builder.keyword(file, "number");
        let declaration = builder.variable(file, "limit", Some(number), None, true);
        let program = builder.build();

        let statement = program
            .node(declaration)
            .and_then(|node| node.parent)
            .and_then(|parent| program.node(parent));
        assert_eq!(
            statement.map(|node| node.text.as_str()),
            Some("export const limit: number;")
        );
        assert_eq!(program.files[0].statements.len(), 1);
    }

    #[test]
    fn test_import_specifier_registers_local_alias() {
        let mut builder = ProgramBuilder::new();
        let lib = builder.file("node_modules/lib/index.d.ts", FileOrigin::ExternalPackage);
        let app = builder.file("src/app.ts", FileOrigin::Project);
        let decl = builder.interface(lib, "Theme", &[], &[], true);
        let theme = builder.symbol("Theme", &[decl]);
        builder.import_specifier(app, "AppTheme", Some("Theme"), "lib", theme);
        let program = builder.build();

        let local = program.local_symbol(app, "AppTheme");
        assert!(local.is_some());
        assert_eq!(local.map(|symbol| program.resolve_alias(symbol)), Some(theme));
    }

    #[test]
    fn test_nested_statement_leaves_top_level() {
        let mut builder = ProgramBuilder::new();
        let file = builder.file("node_modules/@types/react/index.d.ts", FileOrigin::ExternalPackage);
        let namespace = builder.statement(
            file,
            "declare namespace React {}",
            NodeKind::ModuleDeclaration {
                name: "React".to_string(),
                statements: vec![],
            },
        );
        let member = builder.interface(file, "FC", &[], &[], false);
        builder.nest(namespace, member);
        let program = builder.build();

        assert_eq!(program.files[0].statements, vec![namespace]);
        assert_eq!(program.node(member).and_then(|node| node.parent), Some(namespace));
    }
}
