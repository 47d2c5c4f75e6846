//! Syntax arena for TypeScript declaration shapes
//!
//! Nodes are stored in a flat arena and addressed by [`NodeId`]. Every node
//! keeps its verbatim source text, so code generation can reproduce literal
//! declarations and type annotations without a printer of its own.
//!
//! The set of shapes is closed on purpose: the linked-node finder and the
//! declaration parser match on [`NodeKind`] exhaustively.

use std::mem::Discriminant;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl FileId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl SymbolId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Byte range of a node inside its source file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

/// Where a source file comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileOrigin {
    /// Part of the project being compiled
    Project,
    /// Installed package (anything resolved through `node_modules`)
    ExternalPackage,
    /// Bundled TypeScript standard library (`lib.*.d.ts`)
    StandardLibrary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub id: FileId,
    /// Path as reported by the front end (e.g. "src/button.ts" or
    /// "/app/node_modules/@types/react/index.d.ts")
    pub path: String,
    pub origin: FileOrigin,
    /// Top-level statements in source order
    #[serde(default)]
    pub statements: Vec<NodeId>,
}

/// Stable identity of a node, derived from its source file and position.
///
/// Used as the key of every per-compilation cache instead of arena indices,
/// so two snapshots of the same program agree on identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey {
    pub file: FileId,
    pub span: Span,
    pub shape: Discriminant<NodeKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub file: FileId,
    #[serde(default)]
    pub span: Span,
    #[serde(default)]
    pub parent: Option<NodeId>,
    /// Verbatim source text of the node
    pub text: String,
    /// Leading documentation comment, including delimiters
    #[serde(default)]
    pub doc: Option<String>,
    pub kind: NodeKind,
}

impl Node {
    pub fn key(&self) -> NodeKey {
        NodeKey {
            file: self.file,
            span: self.span,
            shape: std::mem::discriminant(&self.kind),
        }
    }

    pub fn has_modifier(&self, modifier: &Modifier) -> bool {
        self.kind.modifiers().contains(modifier)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Export,
    Default,
    Declare,
    Async,
    Abstract,
    Static,
    Readonly,
    Public,
    Private,
    Protected,
    Override,
    Accessor,
    Const,
    Decorator(String),
}

impl Modifier {
    pub fn keyword(&self) -> &str {
        match self {
            Modifier::Export => "export",
            Modifier::Default => "default",
            Modifier::Declare => "declare",
            Modifier::Async => "async",
            Modifier::Abstract => "abstract",
            Modifier::Static => "static",
            Modifier::Readonly => "readonly",
            Modifier::Public => "public",
            Modifier::Private => "private",
            Modifier::Protected => "protected",
            Modifier::Override => "override",
            Modifier::Accessor => "accessor",
            Modifier::Const => "const",
            Modifier::Decorator(text) => text,
        }
    }

    /// Whether the modifier survives into an ambient declaration
    pub fn is_ambient(&self) -> bool {
        !matches!(
            self,
            Modifier::Export
                | Modifier::Default
                | Modifier::Declare
                | Modifier::Async
                | Modifier::Decorator(_)
        )
    }

    /// Accessibility and `readonly` modifiers turn a constructor parameter
    /// into a class property
    pub fn is_parameter_property(&self) -> bool {
        matches!(
            self,
            Modifier::Public
                | Modifier::Private
                | Modifier::Protected
                | Modifier::Readonly
                | Modifier::Override
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeritageToken {
    Extends,
    Implements,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    Method,
    Getter,
    Setter,
}

/// Body of a function-like node. Block bodies only keep the expressions of
/// their `return` statements, which is all the type closure ever needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionBody {
    Expression(NodeId),
    Block { returns: Vec<NodeId> },
}

impl FunctionBody {
    pub fn return_expressions(&self) -> Vec<NodeId> {
        match self {
            FunctionBody::Expression(expression) => vec![*expression],
            FunctionBody::Block { returns } => returns.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    // Declarations
    VariableStatement {
        #[serde(default)]
        modifiers: Vec<Modifier>,
        declarations: Vec<NodeId>,
    },
    VariableDeclaration {
        name: String,
        #[serde(default)]
        type_annotation: Option<NodeId>,
        #[serde(default)]
        initializer: Option<NodeId>,
    },
    FunctionDeclaration {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        modifiers: Vec<Modifier>,
        #[serde(default)]
        type_parameters: Vec<NodeId>,
        #[serde(default)]
        parameters: Vec<NodeId>,
        #[serde(default)]
        return_type: Option<NodeId>,
        #[serde(default)]
        body: Option<FunctionBody>,
    },
    ClassDeclaration {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        modifiers: Vec<Modifier>,
        #[serde(default)]
        type_parameters: Vec<NodeId>,
        #[serde(default)]
        heritage_clauses: Vec<NodeId>,
        #[serde(default)]
        members: Vec<NodeId>,
    },
    InterfaceDeclaration {
        name: String,
        #[serde(default)]
        type_parameters: Vec<NodeId>,
        #[serde(default)]
        heritage_clauses: Vec<NodeId>,
        #[serde(default)]
        members: Vec<NodeId>,
    },
    TypeAliasDeclaration {
        name: String,
        #[serde(default)]
        type_parameters: Vec<NodeId>,
        ty: NodeId,
    },
    EnumDeclaration {
        name: String,
    },
    /// `namespace N { ... }` or `declare module "m" { ... }`
    ModuleDeclaration {
        name: String,
        #[serde(default)]
        statements: Vec<NodeId>,
    },

    // Import and export bindings
    ImportSpecifier {
        name: String,
        #[serde(default)]
        property_name: Option<String>,
        module_specifier: String,
    },
    NamespaceImport {
        name: String,
        module_specifier: String,
    },
    /// Default import binding: `import name from "m"`
    ImportClause {
        name: String,
        module_specifier: String,
    },
    ExportSpecifier {
        name: String,
        #[serde(default)]
        property_name: Option<String>,
        #[serde(default)]
        module_specifier: Option<String>,
    },
    /// `export default <expression>`
    ExportAssignment {
        expression: NodeId,
    },

    // Members
    Parameter {
        name: String,
        #[serde(default)]
        modifiers: Vec<Modifier>,
        #[serde(default)]
        type_annotation: Option<NodeId>,
        #[serde(default)]
        initializer: Option<NodeId>,
        #[serde(default)]
        optional: bool,
        #[serde(default)]
        rest: bool,
    },
    TypeParameter {
        name: String,
        #[serde(default)]
        constraint: Option<NodeId>,
        #[serde(default)]
        default: Option<NodeId>,
    },
    HeritageClause {
        token: HeritageToken,
        types: Vec<NodeId>,
    },
    ExpressionWithTypeArguments {
        expression: NodeId,
        #[serde(default)]
        type_arguments: Vec<NodeId>,
    },
    Constructor {
        #[serde(default)]
        parameters: Vec<NodeId>,
        #[serde(default)]
        body: Option<FunctionBody>,
    },
    Method {
        method_kind: MethodKind,
        name: String,
        #[serde(default)]
        modifiers: Vec<Modifier>,
        #[serde(default)]
        type_parameters: Vec<NodeId>,
        #[serde(default)]
        parameters: Vec<NodeId>,
        #[serde(default)]
        return_type: Option<NodeId>,
        #[serde(default)]
        body: Option<FunctionBody>,
    },
    Property {
        name: String,
        #[serde(default)]
        modifiers: Vec<Modifier>,
        #[serde(default)]
        type_annotation: Option<NodeId>,
        #[serde(default)]
        initializer: Option<NodeId>,
        #[serde(default)]
        optional: bool,
    },
    PropertySignature {
        name: String,
        #[serde(default)]
        computed_name: Option<NodeId>,
        #[serde(default)]
        type_annotation: Option<NodeId>,
        #[serde(default)]
        optional: bool,
    },
    MethodSignature {
        name: String,
        #[serde(default)]
        computed_name: Option<NodeId>,
        #[serde(default)]
        type_parameters: Vec<NodeId>,
        #[serde(default)]
        parameters: Vec<NodeId>,
        #[serde(default)]
        return_type: Option<NodeId>,
    },
    IndexSignature {
        #[serde(default)]
        parameters: Vec<NodeId>,
        ty: NodeId,
    },

    // Type nodes
    /// `string`, `number`, `unknown`, ...
    KeywordType,
    /// `"a"`, `42`, `true`
    LiteralType,
    TypeReference {
        type_name: NodeId,
        #[serde(default)]
        type_arguments: Vec<NodeId>,
    },
    UnionType {
        types: Vec<NodeId>,
    },
    IntersectionType {
        types: Vec<NodeId>,
    },
    TupleType {
        elements: Vec<NodeId>,
    },
    ArrayType {
        element: NodeId,
    },
    ParenthesizedType {
        ty: NodeId,
    },
    /// `keyof T`, `readonly T[]`, `unique symbol`
    TypeOperator {
        operator: String,
        ty: NodeId,
    },
    IndexedAccessType {
        object: NodeId,
        index: NodeId,
    },
    MappedType {
        type_parameter: NodeId,
        #[serde(default)]
        name_type: Option<NodeId>,
        #[serde(default)]
        ty: Option<NodeId>,
    },
    ConditionalType {
        check: NodeId,
        extends: NodeId,
        true_type: NodeId,
        false_type: NodeId,
    },
    TemplateLiteralType {
        spans: Vec<NodeId>,
    },
    TypeLiteral {
        #[serde(default)]
        members: Vec<NodeId>,
    },
    /// `typeof x`
    TypeQuery {
        expr_name: NodeId,
    },
    FunctionType {
        #[serde(default)]
        type_parameters: Vec<NodeId>,
        #[serde(default)]
        parameters: Vec<NodeId>,
        return_type: NodeId,
    },

    // Expressions
    Identifier {
        name: String,
    },
    QualifiedName {
        left: NodeId,
        right: String,
    },
    PropertyAccess {
        expression: NodeId,
        name: String,
    },
    Call {
        callee: NodeId,
        #[serde(default)]
        arguments: Vec<NodeId>,
        #[serde(default)]
        is_new: bool,
    },
    ObjectLiteral {
        #[serde(default)]
        properties: Vec<NodeId>,
    },
    PropertyAssignment {
        name: String,
        initializer: NodeId,
    },
    ShorthandPropertyAssignment {
        name: String,
    },
    ArrayLiteral {
        #[serde(default)]
        elements: Vec<NodeId>,
    },
    ParenthesizedExpression {
        expression: NodeId,
    },
    AsExpression {
        expression: NodeId,
        ty: NodeId,
    },
    ConditionalExpression {
        condition: NodeId,
        when_true: NodeId,
        when_false: NodeId,
    },
    /// Arrow functions and `function` expressions
    FunctionExpression {
        #[serde(default)]
        arrow: bool,
        #[serde(default)]
        type_parameters: Vec<NodeId>,
        #[serde(default)]
        parameters: Vec<NodeId>,
        #[serde(default)]
        return_type: Option<NodeId>,
        body: FunctionBody,
    },
    /// String, numeric, boolean, `null` and other literal expressions
    Literal,
}

impl NodeKind {
    /// Declared name, for nodes that introduce one
    pub fn name(&self) -> Option<&str> {
        match self {
            NodeKind::VariableDeclaration { name, .. }
            | NodeKind::InterfaceDeclaration { name, .. }
            | NodeKind::TypeAliasDeclaration { name, .. }
            | NodeKind::EnumDeclaration { name }
            | NodeKind::ModuleDeclaration { name, .. }
            | NodeKind::ImportSpecifier { name, .. }
            | NodeKind::NamespaceImport { name, .. }
            | NodeKind::ImportClause { name, .. }
            | NodeKind::ExportSpecifier { name, .. }
            | NodeKind::Parameter { name, .. }
            | NodeKind::TypeParameter { name, .. }
            | NodeKind::Method { name, .. }
            | NodeKind::Property { name, .. }
            | NodeKind::PropertySignature { name, .. }
            | NodeKind::MethodSignature { name, .. }
            | NodeKind::Identifier { name }
            | NodeKind::PropertyAssignment { name, .. }
            | NodeKind::ShorthandPropertyAssignment { name } => Some(name),
            NodeKind::FunctionDeclaration { name, .. } | NodeKind::ClassDeclaration { name, .. } => {
                name.as_deref()
            }
            _ => None,
        }
    }

    pub fn modifiers(&self) -> &[Modifier] {
        match self {
            NodeKind::VariableStatement { modifiers, .. }
            | NodeKind::FunctionDeclaration { modifiers, .. }
            | NodeKind::ClassDeclaration { modifiers, .. }
            | NodeKind::Parameter { modifiers, .. }
            | NodeKind::Method { modifiers, .. }
            | NodeKind::Property { modifiers, .. } => modifiers,
            _ => &[],
        }
    }

    /// Nodes that can own a closure entry (or stand in for one) and are
    /// therefore collected, not expanded, by the linked-node finder.
    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            NodeKind::VariableStatement { .. }
                | NodeKind::VariableDeclaration { .. }
                | NodeKind::FunctionDeclaration { .. }
                | NodeKind::ClassDeclaration { .. }
                | NodeKind::InterfaceDeclaration { .. }
                | NodeKind::TypeAliasDeclaration { .. }
                | NodeKind::EnumDeclaration { .. }
                | NodeKind::ModuleDeclaration { .. }
                | NodeKind::ImportSpecifier { .. }
                | NodeKind::NamespaceImport { .. }
                | NodeKind::ImportClause { .. }
        )
    }

    /// Plain syntax tokens that can never reference another declaration
    pub fn is_token(&self) -> bool {
        matches!(
            self,
            NodeKind::KeywordType | NodeKind::LiteralType | NodeKind::Literal
        )
    }

    pub fn is_function_like(&self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDeclaration { .. }
                | NodeKind::Constructor { .. }
                | NodeKind::Method { .. }
                | NodeKind::MethodSignature { .. }
                | NodeKind::FunctionType { .. }
                | NodeKind::FunctionExpression { .. }
        )
    }

    /// Short human-readable name of the shape, used in diagnostics
    pub fn describe(&self) -> &'static str {
        match self {
            NodeKind::VariableStatement { .. } => "variable statement",
            NodeKind::VariableDeclaration { .. } => "variable",
            NodeKind::FunctionDeclaration { .. } => "function",
            NodeKind::ClassDeclaration { .. } => "class",
            NodeKind::InterfaceDeclaration { .. } => "interface",
            NodeKind::TypeAliasDeclaration { .. } => "type alias",
            NodeKind::EnumDeclaration { .. } => "enum",
            NodeKind::ModuleDeclaration { .. } => "namespace",
            NodeKind::ImportSpecifier { .. } => "import specifier",
            NodeKind::NamespaceImport { .. } => "namespace import",
            NodeKind::ImportClause { .. } => "default import",
            NodeKind::ExportSpecifier { .. } => "export specifier",
            NodeKind::ExportAssignment { .. } => "default export",
            NodeKind::Parameter { .. } => "parameter",
            NodeKind::TypeParameter { .. } => "type parameter",
            NodeKind::HeritageClause { .. } => "heritage clause",
            NodeKind::ExpressionWithTypeArguments { .. } => "heritage type",
            NodeKind::Constructor { .. } => "constructor",
            NodeKind::Method { .. } => "method",
            NodeKind::Property { .. } => "property",
            NodeKind::PropertySignature { .. } => "property signature",
            NodeKind::MethodSignature { .. } => "method signature",
            NodeKind::IndexSignature { .. } => "index signature",
            NodeKind::KeywordType => "keyword type",
            NodeKind::LiteralType => "literal type",
            NodeKind::TypeReference { .. } => "type reference",
            NodeKind::UnionType { .. } => "union type",
            NodeKind::IntersectionType { .. } => "intersection type",
            NodeKind::TupleType { .. } => "tuple type",
            NodeKind::ArrayType { .. } => "array type",
            NodeKind::ParenthesizedType { .. } => "parenthesized type",
            NodeKind::TypeOperator { .. } => "type operator",
            NodeKind::IndexedAccessType { .. } => "indexed access type",
            NodeKind::MappedType { .. } => "mapped type",
            NodeKind::ConditionalType { .. } => "conditional type",
            NodeKind::TemplateLiteralType { .. } => "template literal type",
            NodeKind::TypeLiteral { .. } => "type literal",
            NodeKind::TypeQuery { .. } => "type query",
            NodeKind::FunctionType { .. } => "function type",
            NodeKind::Identifier { .. } => "identifier",
            NodeKind::QualifiedName { .. } => "qualified name",
            NodeKind::PropertyAccess { .. } => "property access",
            NodeKind::Call { .. } => "call",
            NodeKind::ObjectLiteral { .. } => "object literal",
            NodeKind::PropertyAssignment { .. } => "property assignment",
            NodeKind::ShorthandPropertyAssignment { .. } => "shorthand property",
            NodeKind::ArrayLiteral { .. } => "array literal",
            NodeKind::ParenthesizedExpression { .. } => "parenthesized expression",
            NodeKind::AsExpression { .. } => "as expression",
            NodeKind::ConditionalExpression { .. } => "conditional expression",
            NodeKind::FunctionExpression { .. } => "function expression",
            NodeKind::Literal => "literal",
        }
    }

    /// Direct syntactic children, in source order
    pub fn children(&self) -> Vec<NodeId> {
        fn body(body: &Option<FunctionBody>) -> Vec<NodeId> {
            body.as_ref()
                .map(FunctionBody::return_expressions)
                .unwrap_or_default()
        }

        let mut out = Vec::new();
        match self {
            NodeKind::VariableStatement { declarations, .. } => out.extend(declarations),
            NodeKind::VariableDeclaration {
                type_annotation,
                initializer,
                ..
            } => out.extend(type_annotation.iter().chain(initializer)),
            NodeKind::FunctionDeclaration {
                type_parameters,
                parameters,
                return_type,
                body: function_body,
                ..
            } => {
                out.extend(type_parameters.iter().chain(parameters).chain(return_type));
                out.extend(body(function_body));
            }
            NodeKind::ClassDeclaration {
                type_parameters,
                heritage_clauses,
                members,
                ..
            }
            | NodeKind::InterfaceDeclaration {
                type_parameters,
                heritage_clauses,
                members,
                ..
            } => out.extend(type_parameters.iter().chain(heritage_clauses).chain(members)),
            NodeKind::TypeAliasDeclaration {
                type_parameters,
                ty,
                ..
            } => {
                out.extend(type_parameters);
                out.push(*ty);
            }
            NodeKind::ModuleDeclaration { statements, .. } => out.extend(statements),
            NodeKind::ExportAssignment { expression } => out.push(*expression),
            NodeKind::Parameter {
                type_annotation,
                initializer,
                ..
            }
            | NodeKind::Property {
                type_annotation,
                initializer,
                ..
            } => out.extend(type_annotation.iter().chain(initializer)),
            NodeKind::TypeParameter {
                constraint,
                default,
                ..
            } => out.extend(constraint.iter().chain(default)),
            NodeKind::HeritageClause { types, .. } => out.extend(types),
            NodeKind::ExpressionWithTypeArguments {
                expression,
                type_arguments,
            } => {
                out.push(*expression);
                out.extend(type_arguments);
            }
            NodeKind::Constructor {
                parameters,
                body: function_body,
            } => {
                out.extend(parameters);
                out.extend(body(function_body));
            }
            NodeKind::Method {
                type_parameters,
                parameters,
                return_type,
                body: function_body,
                ..
            } => {
                out.extend(type_parameters.iter().chain(parameters).chain(return_type));
                out.extend(body(function_body));
            }
            NodeKind::PropertySignature {
                computed_name,
                type_annotation,
                ..
            } => out.extend(computed_name.iter().chain(type_annotation)),
            NodeKind::MethodSignature {
                computed_name,
                type_parameters,
                parameters,
                return_type,
                ..
            } => out.extend(
                computed_name
                    .iter()
                    .chain(type_parameters)
                    .chain(parameters)
                    .chain(return_type),
            ),
            NodeKind::IndexSignature { parameters, ty } => {
                out.extend(parameters);
                out.push(*ty);
            }
            NodeKind::TypeReference {
                type_name,
                type_arguments,
            } => {
                out.push(*type_name);
                out.extend(type_arguments);
            }
            NodeKind::UnionType { types } | NodeKind::IntersectionType { types } => {
                out.extend(types)
            }
            NodeKind::TupleType { elements } => out.extend(elements),
            NodeKind::ArrayType { element } => out.push(*element),
            NodeKind::ParenthesizedType { ty } | NodeKind::TypeOperator { ty, .. } => out.push(*ty),
            NodeKind::IndexedAccessType { object, index } => out.extend([*object, *index]),
            NodeKind::MappedType {
                type_parameter,
                name_type,
                ty,
            } => {
                out.push(*type_parameter);
                out.extend(name_type.iter().chain(ty));
            }
            NodeKind::ConditionalType {
                check,
                extends,
                true_type,
                false_type,
            } => out.extend([*check, *extends, *true_type, *false_type]),
            NodeKind::TemplateLiteralType { spans } => out.extend(spans),
            NodeKind::TypeLiteral { members } => out.extend(members),
            NodeKind::TypeQuery { expr_name } => out.push(*expr_name),
            NodeKind::FunctionType {
                type_parameters,
                parameters,
                return_type,
            } => {
                out.extend(type_parameters.iter().chain(parameters));
                out.push(*return_type);
            }
            NodeKind::QualifiedName { left, .. } => out.push(*left),
            NodeKind::PropertyAccess { expression, .. } => out.push(*expression),
            NodeKind::Call {
                callee, arguments, ..
            } => {
                out.push(*callee);
                out.extend(arguments);
            }
            NodeKind::ObjectLiteral { properties } => out.extend(properties),
            NodeKind::PropertyAssignment { initializer, .. } => out.push(*initializer),
            NodeKind::ArrayLiteral { elements } => out.extend(elements),
            NodeKind::ParenthesizedExpression { expression } => out.push(*expression),
            NodeKind::AsExpression { expression, ty } => out.extend([*expression, *ty]),
            NodeKind::ConditionalExpression {
                condition,
                when_true,
                when_false,
            } => out.extend([*condition, *when_true, *when_false]),
            NodeKind::FunctionExpression {
                type_parameters,
                parameters,
                return_type,
                body,
                ..
            } => {
                out.extend(type_parameters.iter().chain(parameters).chain(return_type));
                out.extend(body.return_expressions());
            }
            NodeKind::EnumDeclaration { .. }
            | NodeKind::ImportSpecifier { .. }
            | NodeKind::NamespaceImport { .. }
            | NodeKind::ImportClause { .. }
            | NodeKind::ExportSpecifier { .. }
            | NodeKind::KeywordType
            | NodeKind::LiteralType
            | NodeKind::Identifier { .. }
            | NodeKind::ShorthandPropertyAssignment { .. }
            | NodeKind::Literal => {}
        }
        out
    }
}
