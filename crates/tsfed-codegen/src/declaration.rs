//! Reduction of raw declarations to printable units

use indexmap::{IndexMap, IndexSet};
use tracing::debug;
use tsfed_core::naming::normalize_import_paths;
use tsfed_core::{
    FileId, FunctionBody, MethodKind, Modifier, Node, NodeId, NodeKind, SemanticModel,
};

use crate::context::DeclId;
use crate::linked_nodes::LinkedNodeFinder;
use crate::text::DeclarationText;

/// Printed for any type that cannot be determined
pub const ANY: &str = "any";

/// Name given to `export default function () {}` and friends
pub const ANONYMOUS: &str = "__anonymous";

/// Name of the synthetic default export placeholder
pub const DEFAULT_EXPORT_NAME: &str = "_default";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Variable,
    Function,
    Class,
    Interface,
    TypeAlias,
    Enum,
    /// `const _default: T;` placeholder for a module's default export
    DefaultExport,
}

/// What an identifier in a declaration's text is replaced with at print time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// Another declaration of the closure; prints its display name
    Declaration(DeclId),
    /// Reference into a package that is not part of the closure, e.g.
    /// `import("react").ReactNode`
    External(String),
}

#[derive(Debug, Clone)]
pub struct ParsedDeclaration {
    pub kind: DeclarationKind,
    /// Name as written at the declaration site
    pub name: String,
    /// Name the declaration is printed under
    pub display_name: String,
    pub documentation: Option<String>,
    pub text: DeclarationText,
    /// Raw declarations this one depends on, not yet parsed
    pub linked_nodes: Vec<NodeId>,
    pub origin: NodeId,
    pub origin_file: FileId,
    pub has_type_parameters: bool,
    pub is_abstract: bool,
    pub substitutions: IndexMap<String, Replacement>,
}

impl ParsedDeclaration {
    fn new(kind: DeclarationKind, name: impl Into<String>, origin: &Node, text: &str) -> Self {
        let name = name.into();
        Self {
            kind,
            display_name: name.clone(),
            name,
            documentation: origin.doc.clone(),
            text: DeclarationText::parse(text),
            linked_nodes: Vec::new(),
            origin: origin.id,
            origin_file: origin.file,
            has_type_parameters: false,
            is_abstract: false,
            substitutions: IndexMap::new(),
        }
    }

    /// Type-only placeholder standing in for a default export
    pub fn default_export(type_text: &str, origin: &Node, linked_nodes: Vec<NodeId>) -> Self {
        let text = format!("const {DEFAULT_EXPORT_NAME}: {type_text};");
        let mut declaration =
            Self::new(DeclarationKind::DefaultExport, DEFAULT_EXPORT_NAME, origin, &text);
        declaration.documentation = None;
        declaration.linked_nodes = linked_nodes;
        declaration
    }

    /// Record what `name` prints as. The first mapping for a name wins.
    pub fn substitute(&mut self, name: impl Into<String>, replacement: Replacement) {
        self.substitutions.entry(name.into()).or_insert(replacement);
    }
}

/// Converts raw declarations into [`ParsedDeclaration`]s.
///
/// Variables and functions get a synthesized signature, classes are rebuilt
/// member by member, and interfaces, type aliases and enums are reproduced
/// from their source text.
pub struct DeclarationParser<'m> {
    model: &'m dyn SemanticModel,
    finder: LinkedNodeFinder<'m>,
}

impl<'m> DeclarationParser<'m> {
    pub fn new(model: &'m dyn SemanticModel) -> Self {
        Self {
            model,
            finder: LinkedNodeFinder::new(model),
        }
    }

    pub fn finder(&mut self) -> &mut LinkedNodeFinder<'m> {
        &mut self.finder
    }

    /// Parse one declaration. Unsupported kinds yield `None`.
    pub fn parse(&mut self, node: NodeId) -> Option<ParsedDeclaration> {
        let model = self.model;
        let raw = model.node(node)?;

        let parsed = match &raw.kind {
            NodeKind::VariableStatement { declarations, .. } => {
                return self.parse(*declarations.first()?)
            }
            NodeKind::VariableDeclaration { .. } => self.variable(raw),
            NodeKind::FunctionDeclaration { .. } => self.function(raw),
            NodeKind::ClassDeclaration { .. } => self.class(raw),
            NodeKind::InterfaceDeclaration {
                name,
                type_parameters,
                ..
            } => Some(self.verbatim(raw, DeclarationKind::Interface, name, !type_parameters.is_empty())),
            NodeKind::TypeAliasDeclaration {
                name,
                type_parameters,
                ..
            } => Some(self.verbatim(raw, DeclarationKind::TypeAlias, name, !type_parameters.is_empty())),
            NodeKind::EnumDeclaration { name } => Some(ParsedDeclaration::new(
                DeclarationKind::Enum,
                name.as_str(),
                raw,
                strip_leading_modifiers(&raw.text),
            )),
            _ => None,
        };

        if let Some(ref declaration) = parsed {
            debug!(
                "Parsed {:?} '{}' with {} linked node(s)",
                declaration.kind,
                declaration.name,
                declaration.linked_nodes.len()
            );
        }
        parsed
    }

    fn variable(&mut self, raw: &'m Node) -> Option<ParsedDeclaration> {
        let model = self.model;
        let NodeKind::VariableDeclaration {
            name,
            type_annotation,
            initializer,
        } = &raw.kind
        else {
            return None;
        };

        let statement = raw
            .parent
            .and_then(|parent| model.node(parent))
            .filter(|parent| matches!(parent.kind, NodeKind::VariableStatement { .. }));
        let modifiers: Vec<Modifier> = statement
            .map(|statement| {
                statement
                    .kind
                    .modifiers()
                    .iter()
                    .filter(|modifier| **modifier != Modifier::Const)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let ty = self.type_text(*type_annotation, raw.id);
        let text = format!("{}const {}: {};", ambient_modifiers(&modifiers), name, ty);

        let linked = match (type_annotation, initializer) {
            (Some(annotation), _) => self.finder.find(*annotation),
            (None, Some(initializer)) => match model.node(*initializer).map(|n| &n.kind) {
                Some(NodeKind::AsExpression { ty, .. }) => self.finder.find(*ty),
                _ => self.finder.find(*initializer),
            },
            (None, None) => Vec::new(),
        };

        let mut declaration =
            ParsedDeclaration::new(DeclarationKind::Variable, name.as_str(), raw, &text);
        declaration.documentation = statement
            .and_then(|statement| statement.doc.clone())
            .or_else(|| raw.doc.clone());
        let mut excluded = vec![raw.id];
        excluded.extend(statement.map(|statement| statement.id));
        declaration.linked_nodes = dedup_links(linked, &excluded);
        Some(declaration)
    }

    fn function(&mut self, raw: &'m Node) -> Option<ParsedDeclaration> {
        let NodeKind::FunctionDeclaration {
            name,
            modifiers,
            type_parameters,
            parameters,
            return_type,
            ..
        } = &raw.kind
        else {
            return None;
        };

        let name = name.as_deref().unwrap_or(ANONYMOUS);
        let text = format!(
            "{}function {}{}({}): {};",
            ambient_modifiers(modifiers),
            name,
            self.type_parameters_text(type_parameters),
            self.parameters_text(parameters),
            self.return_text(*return_type, None, raw.id)
        );

        let mut declaration = ParsedDeclaration::new(DeclarationKind::Function, name, raw, &text);
        declaration.has_type_parameters = !type_parameters.is_empty();
        declaration.linked_nodes = dedup_links(self.finder.find(raw.id), &[raw.id]);
        Some(declaration)
    }

    fn class(&mut self, raw: &'m Node) -> Option<ParsedDeclaration> {
        let model = self.model;
        let NodeKind::ClassDeclaration {
            name,
            modifiers,
            type_parameters,
            heritage_clauses,
            members,
        } = &raw.kind
        else {
            return None;
        };

        let name = name.as_deref().unwrap_or(ANONYMOUS);
        let mut header = format!(
            "{}class {}{}",
            ambient_modifiers(modifiers),
            name,
            self.type_parameters_text(type_parameters)
        );
        for clause in heritage_clauses {
            if let Some(clause) = model.node(*clause) {
                header.push(' ');
                header.push_str(&clause.text);
            }
        }

        let mut lines = Vec::new();
        for member in members {
            let Some(member) = model.node(*member) else {
                continue;
            };
            let rendered = self.class_member(member);
            if rendered.is_empty() {
                continue;
            }
            if let Some(ref doc) = member.doc {
                lines.extend(doc.lines().map(|line| line.trim_start().to_string()));
            }
            lines.extend(rendered);
        }

        let text = if lines.is_empty() {
            format!("{header} {{}}")
        } else {
            let body: Vec<String> = lines.iter().map(|line| format!("    {line}")).collect();
            format!("{header} {{\n{}\n}}", body.join("\n"))
        };

        let mut declaration = ParsedDeclaration::new(DeclarationKind::Class, name, raw, &text);
        declaration.has_type_parameters = !type_parameters.is_empty();
        declaration.is_abstract = modifiers.contains(&Modifier::Abstract);
        declaration.linked_nodes = dedup_links(self.finder.find(raw.id), &[raw.id]);
        Some(declaration)
    }

    /// Printed lines of one class member; empty for members with no
    /// declaration form
    fn class_member(&self, member: &Node) -> Vec<String> {
        let model = self.model;
        match &member.kind {
            NodeKind::Constructor { parameters, .. } => {
                let mut lines = Vec::new();
                for parameter in parameters {
                    let Some(parameter) = model.node(*parameter) else {
                        continue;
                    };
                    if let NodeKind::Parameter {
                        name,
                        modifiers,
                        type_annotation,
                        optional,
                        initializer,
                        ..
                    } = &parameter.kind
                    {
                        if modifiers.iter().any(Modifier::is_parameter_property) {
                            let marker = if *optional || initializer.is_some() { "?" } else { "" };
                            lines.push(format!(
                                "{}{}{}: {};",
                                ambient_modifiers(modifiers),
                                name,
                                marker,
                                self.type_text(*type_annotation, parameter.id)
                            ));
                        }
                    }
                }
                lines.push(format!("constructor({});", self.parameters_text(parameters)));
                lines
            }
            NodeKind::Method {
                method_kind,
                name,
                modifiers,
                type_parameters,
                parameters,
                return_type,
                body,
            } => {
                let modifiers = ambient_modifiers(modifiers);
                let line = match method_kind {
                    MethodKind::Setter => {
                        format!("{}set {}({});", modifiers, name, self.parameters_text(parameters))
                    }
                    MethodKind::Getter => format!(
                        "{}get {}(): {};",
                        modifiers,
                        name,
                        self.return_text(*return_type, body.as_ref(), member.id)
                    ),
                    MethodKind::Method => format!(
                        "{}{}{}({}): {};",
                        modifiers,
                        name,
                        self.type_parameters_text(type_parameters),
                        self.parameters_text(parameters),
                        self.return_text(*return_type, body.as_ref(), member.id)
                    ),
                };
                vec![line]
            }
            NodeKind::Property {
                name,
                modifiers,
                type_annotation,
                optional,
                ..
            } => {
                let marker = if *optional { "?" } else { "" };
                vec![format!(
                    "{}{}{}: {};",
                    ambient_modifiers(modifiers),
                    name,
                    marker,
                    self.type_text(*type_annotation, member.id)
                )]
            }
            NodeKind::IndexSignature { .. } => {
                let text = member.text.trim_end_matches(';');
                vec![format!("{text};")]
            }
            _ => Vec::new(),
        }
    }

    fn verbatim(
        &mut self,
        raw: &'m Node,
        kind: DeclarationKind,
        name: &str,
        has_type_parameters: bool,
    ) -> ParsedDeclaration {
        let mut declaration =
            ParsedDeclaration::new(kind, name, raw, strip_leading_modifiers(&raw.text));
        declaration.has_type_parameters = has_type_parameters;
        declaration.linked_nodes = dedup_links(self.finder.find(raw.id), &[raw.id]);
        declaration
    }

    /// Declared annotation text, else the checker's type, else `any`
    fn type_text(&self, annotation: Option<NodeId>, node: NodeId) -> String {
        let model = self.model;
        annotation
            .and_then(|annotation| model.node(annotation))
            .map(|annotation| annotation.text.clone())
            .or_else(|| model.type_of(node).map(|ty| normalize_import_paths(&ty.text)))
            .unwrap_or_else(|| ANY.to_string())
    }

    fn return_text(
        &self,
        annotation: Option<NodeId>,
        body: Option<&FunctionBody>,
        node: NodeId,
    ) -> String {
        let model = self.model;
        if let Some(annotation) = annotation.and_then(|annotation| model.node(annotation)) {
            return annotation.text.clone();
        }
        if let Some(union) = body.and_then(|body| self.conditional_return_union(body)) {
            return union;
        }
        model
            .signature_of(node)
            .map(|signature| normalize_import_paths(&signature.return_type.text))
            .unwrap_or_else(|| ANY.to_string())
    }

    /// Union of every returned expression's type, used when a return
    /// statement is itself a conditional expression
    fn conditional_return_union(&self, body: &FunctionBody) -> Option<String> {
        let model = self.model;
        let returns = body.return_expressions();
        let has_conditional = returns.iter().any(|expression| {
            matches!(
                model.node(*expression).map(|n| &n.kind),
                Some(NodeKind::ConditionalExpression { .. })
            )
        });
        if !has_conditional {
            return None;
        }

        let mut branches = Vec::new();
        for expression in returns {
            match model.node(expression).map(|n| &n.kind) {
                Some(NodeKind::ConditionalExpression {
                    when_true,
                    when_false,
                    ..
                }) => branches.extend([*when_true, *when_false]),
                _ => branches.push(expression),
            }
        }

        let types: IndexSet<String> = branches
            .into_iter()
            .filter_map(|branch| model.type_of(branch))
            .map(|ty| normalize_import_paths(&ty.text))
            .collect();
        if types.is_empty() {
            return None;
        }
        Some(types.into_iter().collect::<Vec<_>>().join(" | "))
    }

    fn parameters_text(&self, parameters: &[NodeId]) -> String {
        let model = self.model;
        parameters
            .iter()
            .filter_map(|parameter| model.node(*parameter))
            .filter_map(|parameter| match &parameter.kind {
                NodeKind::Parameter {
                    name,
                    type_annotation,
                    initializer,
                    optional,
                    rest,
                    ..
                } => {
                    let spread = if *rest { "..." } else { "" };
                    let marker = if *optional || initializer.is_some() { "?" } else { "" };
                    let ty = type_annotation
                        .and_then(|annotation| model.node(annotation))
                        .map(|annotation| annotation.text.as_str())
                        .unwrap_or(ANY);
                    Some(format!("{spread}{name}{marker}: {ty}"))
                }
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn type_parameters_text(&self, type_parameters: &[NodeId]) -> String {
        let model = self.model;
        if type_parameters.is_empty() {
            return String::new();
        }
        let texts: Vec<&str> = type_parameters
            .iter()
            .filter_map(|parameter| model.node(*parameter))
            .map(|parameter| parameter.text.as_str())
            .collect();
        format!("<{}>", texts.join(", "))
    }
}

fn ambient_modifiers(modifiers: &[Modifier]) -> String {
    modifiers
        .iter()
        .filter(|modifier| modifier.is_ambient())
        .map(|modifier| format!("{} ", modifier.keyword()))
        .collect()
}

/// Drop `export`, `default` and `declare` in front of a declaration's text
fn strip_leading_modifiers(text: &str) -> &str {
    let mut rest = text.trim_start();
    loop {
        let stripped = ["export ", "default ", "declare "]
            .iter()
            .find_map(|keyword| rest.strip_prefix(keyword));
        match stripped {
            Some(stripped) => rest = stripped.trim_start(),
            None => return rest,
        }
    }
}

fn dedup_links(links: Vec<NodeId>, excluded: &[NodeId]) -> Vec<NodeId> {
    links
        .into_iter()
        .filter(|link| !excluded.contains(link))
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tsfed_core::{FileOrigin, ProgramBuilder, Signature, TypeInfo};

    fn source(declaration: &ParsedDeclaration) -> String {
        declaration.text.source()
    }

    #[test]
    fn test_variable_with_annotation_links_annotation() {
        let mut builder = ProgramBuilder::new();
        let file = builder.file("src/theme.ts", FileOrigin::Project);
        let string = builder.keyword(file, "string");
        let color = builder.property_signature(file, "color", string, false);
        let theme_type = builder.interface(file, "Theme", &[], &[color], false);
        let theme_symbol = builder.symbol("Theme", &[theme_type]);
        let annotation = builder.type_ref(file, "Theme", Some(theme_symbol), &[]);
        let variable = builder.variable(file, "theme", Some(annotation), None, true);
        let program = builder.build();

        let mut parser = DeclarationParser::new(&program);
        let parsed = parser.parse(variable).unwrap();
        assert_eq!(parsed.kind, DeclarationKind::Variable);
        assert_eq!(source(&parsed), "const theme: Theme;");
        assert_eq!(parsed.linked_nodes, vec![theme_type]);
    }

    #[test]
    fn test_inferred_variable_type_is_normalized() {
        let mut builder = ProgramBuilder::new();
        let file = builder.file("src/a.ts", FileOrigin::Project);
        let literal = builder.literal(file, "null");
        let variable = builder.variable(file, "node", None, Some(literal), false);
        builder.set_type(
            variable,
            TypeInfo::new(r#"import("/app/node_modules/@types/react/index").ReactNode"#),
        );
        let program = builder.build();

        let mut parser = DeclarationParser::new(&program);
        let parsed = parser.parse(variable).unwrap();
        assert_eq!(source(&parsed), r#"const node: import("react").ReactNode;"#);
        assert!(parsed.linked_nodes.is_empty());
    }

    #[test]
    fn test_function_parameters_default_to_any() {
        let mut builder = ProgramBuilder::new();
        let file = builder.file("src/a.ts", FileOrigin::Project);
        let number = builder.keyword(file, "number");
        let count = builder.parameter(file, "count", Some(number));
        let rest = builder.node(
            file,
            "...rest",
            NodeKind::Parameter {
                name: "rest".to_string(),
                modifiers: vec![],
                type_annotation: None,
                initializer: None,
                optional: false,
                rest: true,
            },
        );
        let function = builder.function(file, "sum", &[count, rest], None, true);
        builder.set_signature(
            function,
            Signature {
                parameters: vec![],
                return_type: TypeInfo::new("number"),
                declaration: Some(function),
            },
        );
        let program = builder.build();

        let mut parser = DeclarationParser::new(&program);
        let parsed = parser.parse(function).unwrap();
        assert_eq!(source(&parsed), "function sum(count: number, ...rest: any): number;");
    }

    #[test]
    fn test_interface_text_is_verbatim_without_export() {
        let mut builder = ProgramBuilder::new();
        let file = builder.file("src/a.ts", FileOrigin::Project);
        let string = builder.keyword(file, "string");
        let label = builder.property_signature(file, "label", string, true);
        let interface = builder.interface(file, "Props", &[], &[label], true);
        builder.doc(interface, "/** Button props */");
        let program = builder.build();

        let mut parser = DeclarationParser::new(&program);
        let parsed = parser.parse(interface).unwrap();
        assert_eq!(source(&parsed), "interface Props {\n    label?: string;\n}");
        assert_eq!(parsed.documentation.as_deref(), Some("/** Button props */"));
    }

    #[test]
    fn test_class_is_rebuilt_member_by_member() {
        let mut builder = ProgramBuilder::new();
        let file = builder.file("src/store.ts", FileOrigin::Project);
        let string = builder.keyword(file, "string");
        let name_parameter = builder.node(
            file,
            "private readonly name: string",
            NodeKind::Parameter {
                name: "name".to_string(),
                modifiers: vec![Modifier::Private, Modifier::Readonly],
                type_annotation: Some(string),
                initializer: None,
                optional: false,
                rest: false,
            },
        );
        let constructor = builder.node(
            file,
            "constructor(private readonly name: string) {}",
            NodeKind::Constructor {
                parameters: vec![name_parameter],
                body: None,
            },
        );
        let number = builder.keyword(file, "number");
        let getter = builder.node(
            file,
            "get size(): number { return 0; }",
            NodeKind::Method {
                method_kind: MethodKind::Getter,
                name: "size".to_string(),
                modifiers: vec![],
                type_parameters: vec![],
                parameters: vec![],
                return_type: Some(number),
                body: None,
            },
        );
        let value = builder.parameter(file, "value", Some(number));
        let setter = builder.node(
            file,
            "set size(value: number) {}",
            NodeKind::Method {
                method_kind: MethodKind::Setter,
                name: "size".to_string(),
                modifiers: vec![],
                type_parameters: vec![],
                parameters: vec![value],
                return_type: None,
                body: None,
            },
        );
        let flag = builder.identifier(file, "flag", None);
        let one = builder.literal(file, "1");
        let text = builder.literal(file, "'one'");
        let conditional = builder.node(
            file,
            "flag ? 1 : 'one'",
            NodeKind::ConditionalExpression {
                condition: flag,
                when_true: one,
                when_false: text,
            },
        );
        builder.set_type(one, TypeInfo::new("number"));
        builder.set_type(text, TypeInfo::new("string"));
        let read = builder.node(
            file,
            "read() { return flag ? 1 : 'one'; }",
            NodeKind::Method {
                method_kind: MethodKind::Method,
                name: "read".to_string(),
                modifiers: vec![Modifier::Async, Modifier::Static],
                type_parameters: vec![],
                parameters: vec![],
                return_type: None,
                body: Some(FunctionBody::Block {
                    returns: vec![conditional],
                }),
            },
        );
        let class = builder.statement(
            file,
            "export class Store {}",
            NodeKind::ClassDeclaration {
                name: Some("Store".to_string()),
                modifiers: vec![Modifier::Export],
                type_parameters: vec![],
                heritage_clauses: vec![],
                members: vec![constructor, getter, setter, read],
            },
        );
        builder.doc(read, "/** Reads */");
        let program = builder.build();

        let mut parser = DeclarationParser::new(&program);
        let parsed = parser.parse(class).unwrap();
        assert_eq!(
            source(&parsed),
            "class Store {\n    private readonly name: string;\n    constructor(name: string);\n    get size(): number;\n    set size(value: number);\n    /** Reads */\n    static read(): number | string;\n}"
        );
    }

    #[test]
    fn test_unsupported_declaration_yields_none() {
        let mut builder = ProgramBuilder::new();
        let file = builder.file("src/a.ts", FileOrigin::Project);
        let namespace = builder.statement(
            file,
            "namespace Util {}",
            NodeKind::ModuleDeclaration {
                name: "Util".to_string(),
                statements: vec![],
            },
        );
        let program = builder.build();

        let mut parser = DeclarationParser::new(&program);
        assert!(parser.parse(namespace).is_none());
    }

    #[test]
    fn test_strip_leading_modifiers() {
        assert_eq!(strip_leading_modifiers("export declare enum A {}"), "enum A {}");
        assert_eq!(strip_leading_modifiers("type exported = 1;"), "type exported = 1;");
    }
}
