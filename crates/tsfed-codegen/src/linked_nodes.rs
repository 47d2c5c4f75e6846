//! Linked-node discovery
//!
//! Given any node, find the declarations its type depends on. Type and
//! expression nodes are expanded until they bottom out in declarations;
//! declarations themselves are collected but never expanded here. Deeper
//! dependencies are reached by the closure builder, which parses every
//! collected declaration and asks again.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexSet;
use tracing::trace;
use tsfed_core::{FunctionBody, Node, NodeId, NodeKey, NodeKind, SemanticModel};

/// How a node contributes references. Every node shape maps to exactly one
/// variant, and each variant has one extraction rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceShape {
    /// Name in value position, resolved through aliases
    Name(NodeId),
    /// `ns.Name`, resolved without following aliases
    QualifiedName(NodeId),
    TypeReference {
        type_name: NodeId,
        type_arguments: Vec<NodeId>,
    },
    /// `typeof x`
    TypeQuery(NodeId),
    /// `object.member`
    MemberAccess { object: NodeId },
    /// Call or `new` expression
    Invocation { call: NodeId, callee: NodeId },
    ObjectLiteral(Vec<NodeId>),
    ArrayLiteral(Vec<NodeId>),
    FunctionLike {
        node: NodeId,
        positions: Vec<NodeId>,
        body: Option<FunctionBody>,
    },
    /// `extends Base<T>` / `implements I<T>`
    Heritage {
        expression: NodeId,
        type_arguments: Vec<NodeId>,
    },
    /// Every constituent position is searched
    Composite(Vec<NodeId>),
    /// Nothing to search
    Opaque,
}

impl ReferenceShape {
    pub fn of(node: &Node) -> Self {
        match &node.kind {
            NodeKind::Identifier { .. } => ReferenceShape::Name(node.id),
            NodeKind::QualifiedName { .. } => ReferenceShape::QualifiedName(node.id),
            NodeKind::TypeReference {
                type_name,
                type_arguments,
            } => ReferenceShape::TypeReference {
                type_name: *type_name,
                type_arguments: type_arguments.clone(),
            },
            NodeKind::TypeQuery { expr_name } => ReferenceShape::TypeQuery(*expr_name),
            NodeKind::PropertyAccess { expression, .. } => ReferenceShape::MemberAccess {
                object: *expression,
            },
            NodeKind::Call { callee, .. } => ReferenceShape::Invocation {
                call: node.id,
                callee: *callee,
            },
            NodeKind::ObjectLiteral { properties } => {
                ReferenceShape::ObjectLiteral(properties.clone())
            }
            NodeKind::ArrayLiteral { elements } => ReferenceShape::ArrayLiteral(elements.clone()),
            NodeKind::FunctionDeclaration {
                type_parameters,
                parameters,
                return_type,
                body,
                ..
            }
            | NodeKind::Method {
                type_parameters,
                parameters,
                return_type,
                body,
                ..
            } => ReferenceShape::FunctionLike {
                node: node.id,
                positions: positions(type_parameters, parameters, return_type.as_ref()),
                body: body.clone(),
            },
            NodeKind::FunctionExpression {
                type_parameters,
                parameters,
                return_type,
                body,
                ..
            } => ReferenceShape::FunctionLike {
                node: node.id,
                positions: positions(type_parameters, parameters, return_type.as_ref()),
                body: Some(body.clone()),
            },
            NodeKind::Constructor { parameters, body } => ReferenceShape::FunctionLike {
                node: node.id,
                positions: parameters.clone(),
                body: body.clone(),
            },
            NodeKind::MethodSignature {
                computed_name,
                type_parameters,
                parameters,
                return_type,
                ..
            } => {
                let mut positions = positions(type_parameters, parameters, return_type.as_ref());
                positions.extend(computed_name);
                ReferenceShape::FunctionLike {
                    node: node.id,
                    positions,
                    body: None,
                }
            }
            NodeKind::FunctionType {
                type_parameters,
                parameters,
                return_type,
            } => ReferenceShape::FunctionLike {
                node: node.id,
                positions: positions(type_parameters, parameters, Some(return_type)),
                body: None,
            },
            NodeKind::ExpressionWithTypeArguments {
                expression,
                type_arguments,
            } => ReferenceShape::Heritage {
                expression: *expression,
                type_arguments: type_arguments.clone(),
            },
            NodeKind::AsExpression { ty, .. } => ReferenceShape::Composite(vec![*ty]),
            NodeKind::ConditionalExpression {
                when_true,
                when_false,
                ..
            } => ReferenceShape::Composite(vec![*when_true, *when_false]),
            NodeKind::KeywordType
            | NodeKind::LiteralType
            | NodeKind::Literal
            | NodeKind::EnumDeclaration { .. }
            | NodeKind::ImportSpecifier { .. }
            | NodeKind::NamespaceImport { .. }
            | NodeKind::ImportClause { .. }
            | NodeKind::ExportSpecifier { .. }
            | NodeKind::ShorthandPropertyAssignment { .. } => ReferenceShape::Opaque,
            other => ReferenceShape::Composite(other.children()),
        }
    }
}

fn positions(
    type_parameters: &[NodeId],
    parameters: &[NodeId],
    return_type: Option<&NodeId>,
) -> Vec<NodeId> {
    type_parameters
        .iter()
        .chain(parameters)
        .chain(return_type)
        .copied()
        .collect()
}

pub struct LinkedNodeFinder<'m> {
    model: &'m dyn SemanticModel,
    cache: HashMap<NodeKey, Vec<NodeId>>,
}

impl<'m> LinkedNodeFinder<'m> {
    pub fn new(model: &'m dyn SemanticModel) -> Self {
        Self {
            model,
            cache: HashMap::new(),
        }
    }

    /// Declarations `root` depends on, in discovery order, excluding `root`
    /// itself, standard-library nodes and plain tokens
    pub fn find(&mut self, root: NodeId) -> Vec<NodeId> {
        let model = self.model;
        let Some(node) = model.node(root) else {
            return Vec::new();
        };
        if model.is_standard_library(root) || node.kind.is_token() {
            return Vec::new();
        }

        let key = node.key();
        if let Some(found) = self.cache.get(&key) {
            return found.clone();
        }

        let mut found = IndexSet::new();
        let mut expanded = HashSet::from([root]);
        let mut pending: VecDeque<NodeId> = self.immediate(node).into();

        while let Some(next) = pending.pop_front() {
            let Some(candidate) = model.node(next) else {
                continue;
            };
            if model.is_standard_library(next) || candidate.kind.is_token() {
                continue;
            }
            if candidate.kind.is_declaration() {
                if next != root {
                    found.insert(next);
                }
                continue;
            }
            if expanded.insert(next) {
                pending.extend(self.immediate(candidate));
            }
        }

        let found: Vec<NodeId> = found.into_iter().collect();
        trace!(
            "Linked nodes of {} {:?}: {:?}",
            node.kind.describe(),
            root,
            found
        );
        self.cache.insert(key, found.clone());
        found
    }

    /// Nodes referenced directly by `node`, before any expansion
    pub fn immediate(&self, node: &Node) -> Vec<NodeId> {
        match ReferenceShape::of(node) {
            ReferenceShape::Name(name) => self.resolved_declaration(name).into_iter().collect(),
            ReferenceShape::QualifiedName(name) => self.declarations_at(name),
            ReferenceShape::TypeReference {
                type_name,
                type_arguments,
            } => {
                let mut out = self.declarations_at(type_name);
                out.extend(type_arguments);
                out
            }
            ReferenceShape::TypeQuery(expr_name) => self.type_query(expr_name),
            ReferenceShape::MemberAccess { object } => {
                self.model.type_declaration(object).into_iter().collect()
            }
            ReferenceShape::Invocation { call, callee } => self.invocation(call, callee),
            ReferenceShape::ObjectLiteral(properties) => self.object_literal(&properties),
            ReferenceShape::ArrayLiteral(elements) => elements
                .iter()
                .filter_map(|element| self.model.type_declaration(*element))
                .collect(),
            ReferenceShape::FunctionLike {
                node,
                positions,
                body,
            } => {
                let mut out = Vec::new();
                let returned = self
                    .model
                    .signature_of(node)
                    .and_then(|signature| signature.return_type.symbol)
                    .and_then(|symbol| self.model.symbol(symbol))
                    .and_then(|symbol| symbol.value_declaration);
                match returned {
                    Some(declaration) => out.push(declaration),
                    None => {
                        if let Some(body) = body {
                            out.extend(body.return_expressions());
                        }
                    }
                }
                out.extend(positions);
                out
            }
            ReferenceShape::Heritage {
                expression,
                type_arguments,
            } => {
                let mut out = self.declarations_at(expression);
                out.extend(type_arguments);
                out
            }
            ReferenceShape::Composite(children) => children,
            ReferenceShape::Opaque => Vec::new(),
        }
    }

    /// Every declaration of the symbol bound at `name`, aliases kept
    fn declarations_at(&self, name: NodeId) -> Vec<NodeId> {
        self.model
            .symbol_at(name)
            .map(|symbol| self.model.declarations_of(symbol))
            .unwrap_or_default()
    }

    /// First declaration of the symbol bound at `name`, aliases followed
    fn resolved_declaration(&self, name: NodeId) -> Option<NodeId> {
        let symbol = self.model.symbol_at(name)?;
        let target = self.model.resolve_alias(symbol);
        self.model.declarations_of(target).first().copied()
    }

    fn type_query(&self, expr_name: NodeId) -> Vec<NodeId> {
        let model = self.model;
        let mut current = expr_name;
        let mut qualified = false;
        while let Some(NodeKind::QualifiedName { left, .. }) = model.node(current).map(|n| &n.kind) {
            current = *left;
            qualified = true;
        }

        if qualified {
            self.declarations_at(current).into_iter().take(1).collect()
        } else {
            self.resolved_declaration(current).into_iter().collect()
        }
    }

    fn invocation(&self, call: NodeId, callee: NodeId) -> Vec<NodeId> {
        let model = self.model;
        let mut out = Vec::new();

        if let Some(NodeKind::PropertyAccess { expression, .. }) = model.node(callee).map(|n| &n.kind) {
            out.extend(self.resolved_declaration(*expression));
        }

        let returned = model
            .signature_of(call)
            .and_then(|signature| signature.return_type.symbol)
            .map(|symbol| model.declarations_of(symbol))
            .unwrap_or_default();

        for declaration in returned {
            let Some(node) = model.node(declaration) else {
                continue;
            };
            if !model.is_external_package(declaration) && !model.is_standard_library(declaration) {
                match (&node.kind, node.parent) {
                    (NodeKind::TypeLiteral { .. }, Some(parent)) => out.push(parent),
                    _ => out.push(declaration),
                }
            }
            if node.kind.is_function_like() {
                if let Some(return_type) = declared_return_type(&node.kind) {
                    out.push(return_type);
                }
            }
        }

        out
    }

    fn object_literal(&self, properties: &[NodeId]) -> Vec<NodeId> {
        let model = self.model;
        let mut out = Vec::new();

        for property in properties {
            match model.node(*property).map(|n| &n.kind) {
                Some(NodeKind::ShorthandPropertyAssignment { .. }) => {
                    out.extend(model.type_declaration(*property));
                }
                Some(NodeKind::PropertyAssignment { initializer, .. }) => {
                    if matches!(
                        model.node(*initializer).map(|n| &n.kind),
                        Some(NodeKind::ObjectLiteral { .. } | NodeKind::PropertyAccess { .. })
                    ) {
                        out.push(*initializer);
                    }
                    out.extend(model.type_declaration(*initializer));
                }
                _ => {}
            }
        }

        out
    }
}

fn declared_return_type(kind: &NodeKind) -> Option<NodeId> {
    match kind {
        NodeKind::FunctionDeclaration { return_type, .. }
        | NodeKind::Method { return_type, .. }
        | NodeKind::MethodSignature { return_type, .. }
        | NodeKind::FunctionExpression { return_type, .. } => *return_type,
        NodeKind::FunctionType { return_type, .. } => Some(*return_type),
        _ => None,
    }
}
