//! Transitive closure of an entry point's exports
//!
//! The builder seeds the closure with every exported declaration, then
//! keeps parsing linked nodes until no declaration yields a node it has not
//! seen. References to declarations in the closure are bound symbolically
//! and references into external packages are bound to `import("pkg")`
//! expressions; both are resolved when the module is printed.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, warn};
use tsfed_core::naming::{import_expression, is_bare_specifier, normalize_import_paths, package_specifier};
use tsfed_core::{FileId, Modifier, Node, NodeId, NodeKind, SemanticModel, SymbolId};

use crate::context::{CompilationContext, DeclArena, DeclId};
use crate::declaration::{DeclarationParser, ParsedDeclaration, Replacement, ANY};
use crate::error::{Omission, OmissionReason};

/// A symbol the module exposes from a package that is not pulled into the
/// closure
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReExportEntry {
    /// Name the package exports it under, or the local binding name of a
    /// default or namespace import
    pub imported_name: String,
    /// Local binding name, when it differs from `imported_name`
    pub alias_import: Option<String>,
    /// Public name, when it differs from the local binding name
    pub alias_export: Option<String>,
    pub is_default: bool,
    pub is_namespace: bool,
}

impl ReExportEntry {
    pub fn named(imported_name: impl Into<String>) -> Self {
        Self {
            imported_name: imported_name.into(),
            alias_import: None,
            alias_export: None,
            is_default: false,
            is_namespace: false,
        }
    }

    pub fn local_name(&self) -> &str {
        self.alias_import.as_deref().unwrap_or(&self.imported_name)
    }

    pub fn exported_name(&self) -> &str {
        self.alias_export.as_deref().unwrap_or(self.local_name())
    }

    /// `a`, `a as b` or `* as ns`, as it appears in an import statement
    pub fn import_clause_item(&self) -> String {
        if self.is_namespace {
            return format!("* as {}", self.local_name());
        }
        match self.alias_import {
            Some(ref local) if !self.is_default => format!("{} as {}", self.imported_name, local),
            _ => self.local_name().to_string(),
        }
    }

    /// `a` or `a as b`, as it appears in the trailing export clause
    pub fn export_clause_item(&self) -> String {
        let local = self.local_name();
        let exported = self.exported_name();
        if local == exported {
            local.to_string()
        } else {
            format!("{local} as {exported}")
        }
    }

    fn with_export_name(mut self, exported: &str) -> Self {
        if exported != self.local_name() {
            self.alias_export = Some(exported.to_string());
        }
        self
    }
}

/// Closure of one entry point, ready to print
#[derive(Debug, Default)]
pub struct ParsedModule {
    /// Logical module name
    pub name: String,
    pub arena: DeclArena,
    pub exported: IndexSet<DeclId>,
    pub linked: IndexSet<DeclId>,
    /// Re-exported symbols by package specifier
    pub re_exports: IndexMap<String, Vec<ReExportEntry>>,
    pub default_export: Option<DeclId>,
    /// Further public names of declarations already in the closure
    pub aliases: IndexMap<String, DeclId>,
    pub omissions: Vec<Omission>,
}

impl ParsedModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn declaration(&self, id: DeclId) -> Option<&ParsedDeclaration> {
        self.arena.get(id)
    }

    pub fn render(&self, id: DeclId) -> Option<String> {
        self.arena.render(id)
    }

    /// Linked declarations that are not also exported
    pub fn pulled_in(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.linked
            .iter()
            .copied()
            .filter(|id| !self.exported.contains(id) && Some(*id) != self.default_export)
    }

    fn add_re_export(&mut self, package: impl Into<String>, entry: ReExportEntry) {
        let entries = self.re_exports.entry(package.into()).or_default();
        if !entries.contains(&entry) {
            entries.push(entry);
        }
    }
}

pub struct ClosureBuilder<'m> {
    model: &'m dyn SemanticModel,
    std_names: &'m HashSet<String>,
    parser: DeclarationParser<'m>,
    context: CompilationContext,
}

impl<'m> ClosureBuilder<'m> {
    pub fn new(model: &'m dyn SemanticModel, std_names: &'m HashSet<String>) -> Self {
        Self {
            model,
            std_names,
            parser: DeclarationParser::new(model),
            context: CompilationContext::new(),
        }
    }

    /// Build the closure of the module defined by `file`. Consumes the
    /// builder so no cache outlives the entry point.
    pub fn build(mut self, module_name: &str, file: FileId) -> ParsedModule {
        let model = self.model;
        let mut module = ParsedModule::new(module_name);

        let Some(module_symbol) = model.module_symbol(file) else {
            debug!("Entry point '{}' has no exports", module_name);
            return module;
        };

        let mut deferred = Vec::new();
        for export in model.exports_of(module_symbol) {
            let Some(symbol) = model.symbol(export) else {
                continue;
            };
            if symbol.declarations.is_empty() {
                self.omit(&mut module, &symbol.name, OmissionReason::UnresolvedDeclaration, None);
                continue;
            }

            for declaration in &symbol.declarations {
                let Some(node) = model.node(*declaration) else {
                    self.omit(&mut module, &symbol.name, OmissionReason::UnresolvedDeclaration, None);
                    continue;
                };
                match &node.kind {
                    NodeKind::ExportSpecifier { .. } => {
                        self.export_specifier(&mut module, export, node)
                    }
                    NodeKind::ExportAssignment { expression } => {
                        let placeholder = self.expression_placeholder(node, *expression);
                        module.default_export = Some(self.context.arena.push(placeholder));
                    }
                    _ if node.has_modifier(&Modifier::Default) => {
                        match self.default_declaration(node) {
                            Some((placeholder, target, is_new)) => {
                                if is_new {
                                    deferred.push(target);
                                }
                                module.default_export = Some(self.context.arena.push(placeholder));
                            }
                            None => self.omit(
                                &mut module,
                                &symbol.name,
                                OmissionReason::UnsupportedDeclaration,
                                Some(node.kind.describe()),
                            ),
                        }
                    }
                    _ => self.export_declaration(&mut module, &symbol.name, node),
                }
            }
        }

        for target in deferred {
            self.register(target, false);
            module.linked.insert(target);
        }

        let roots: Vec<DeclId> = module
            .exported
            .iter()
            .copied()
            .chain(module.default_export)
            .chain(module.linked.iter().copied())
            .collect();
        for root in roots {
            self.collect_linked(&mut module, root);
        }

        module.arena = std::mem::take(&mut self.context.arena);
        module
    }

    fn omit(
        &self,
        module: &mut ParsedModule,
        symbol: &str,
        reason: OmissionReason,
        detail: Option<&str>,
    ) {
        let mut omission = Omission::new(module.name.as_str(), symbol, reason);
        if let Some(detail) = detail {
            omission = omission.with_detail(detail);
        }
        warn!("Omitted export: {}", omission);
        module.omissions.push(omission);
    }

    /// `export { local as exported } [from "module"]`
    fn export_specifier(&mut self, module: &mut ParsedModule, export: SymbolId, node: &'m Node) {
        let model = self.model;
        let NodeKind::ExportSpecifier {
            name,
            property_name,
            module_specifier,
        } = &node.kind
        else {
            return;
        };
        let local_name = property_name.as_deref().unwrap_or(name);

        let target = model.resolve_alias(export);
        let resolved = (target != export)
            .then(|| model.declarations_of(target).first().copied())
            .flatten()
            .and_then(|declaration| model.node(declaration));
        if let Some(declaration) = resolved {
            let is_binding = matches!(
                declaration.kind,
                NodeKind::ImportSpecifier { .. }
                    | NodeKind::NamespaceImport { .. }
                    | NodeKind::ImportClause { .. }
            );
            if !is_binding && !model.is_external_package(declaration.id) {
                self.export_declaration(module, name, declaration);
                return;
            }
        }

        if let Some(specifier) = module_specifier.as_deref() {
            let package = if is_bare_specifier(specifier) {
                Some(specifier.to_string())
            } else {
                resolved.and_then(|declaration| self.package_of(declaration.id))
            };
            match package {
                Some(package) => {
                    let entry = ReExportEntry::named(local_name).with_export_name(name);
                    module.add_re_export(package, entry);
                }
                None => self.omit(module, name, OmissionReason::UnresolvedReExport, None),
            }
            return;
        }

        match self.import_binding(node.file, local_name) {
            Some((package, entry)) => module.add_re_export(package, entry.with_export_name(name)),
            None => self.omit(module, name, OmissionReason::UnresolvedReExport, None),
        }
    }

    /// The package and entry an import binding named `local_name` in `file`
    /// re-exports, when it imports from an external package
    fn import_binding(&self, file: FileId, local_name: &str) -> Option<(String, ReExportEntry)> {
        let model = self.model;
        let symbol = model.local_symbol(file, local_name)?;
        let binding = model
            .declarations_of(symbol)
            .into_iter()
            .filter_map(|declaration| model.node(declaration))
            .find(|node| {
                matches!(
                    node.kind,
                    NodeKind::ImportSpecifier { .. }
                        | NodeKind::NamespaceImport { .. }
                        | NodeKind::ImportClause { .. }
                )
            })?;

        let (specifier, entry) = match &binding.kind {
            NodeKind::NamespaceImport {
                name,
                module_specifier,
            } => (
                module_specifier,
                ReExportEntry {
                    is_namespace: true,
                    ..ReExportEntry::named(name.as_str())
                },
            ),
            NodeKind::ImportClause {
                name,
                module_specifier,
            } => (
                module_specifier,
                ReExportEntry {
                    is_default: true,
                    ..ReExportEntry::named(name.as_str())
                },
            ),
            NodeKind::ImportSpecifier {
                name,
                property_name,
                module_specifier,
            } => {
                let entry = match property_name {
                    Some(property) if property != name => ReExportEntry {
                        alias_import: Some(name.clone()),
                        ..ReExportEntry::named(property.as_str())
                    },
                    _ => ReExportEntry::named(name.as_str()),
                };
                (module_specifier, entry)
            }
            _ => return None,
        };

        let package = if is_bare_specifier(specifier) {
            Some(specifier.clone())
        } else {
            self.resolved_declaration(symbol)
                .filter(|declaration| model.is_external_package(*declaration))
                .and_then(|declaration| self.package_of(declaration))
        };
        package.map(|package| (package, entry))
    }

    /// Add a plain exported declaration, or record a re-export when it
    /// lives in an external package
    fn export_declaration(&mut self, module: &mut ParsedModule, exported_name: &str, node: &'m Node) {
        let model = self.model;
        if model.is_external_package(node.id) {
            let imported = node.kind.name().unwrap_or(exported_name);
            match self.package_of(node.id) {
                Some(package) => {
                    let entry = ReExportEntry::named(imported).with_export_name(exported_name);
                    module.add_re_export(package, entry);
                }
                None => self.omit(module, exported_name, OmissionReason::UnresolvedReExport, None),
            }
            return;
        }

        match self.parse_node(node.id) {
            Some((id, true)) => {
                if let Some(declaration) = self.context.arena.get_mut(id) {
                    if declaration.name != exported_name {
                        declaration.display_name = exported_name.to_string();
                    }
                }
                self.register(id, true);
                module.exported.insert(id);
            }
            Some((id, false)) => {
                let printed = self
                    .context
                    .arena
                    .get(id)
                    .is_some_and(|declaration| declaration.display_name == exported_name);
                if !printed {
                    debug!("Exporting '{}' as an alias", exported_name);
                    module.aliases.entry(exported_name.to_string()).or_insert(id);
                }
                module.exported.insert(id);
            }
            None => self.omit(
                module,
                exported_name,
                OmissionReason::UnsupportedDeclaration,
                Some(node.kind.describe()),
            ),
        }
    }

    /// Placeholder for `export default <expression>`
    fn expression_placeholder(&mut self, node: &'m Node, expression: NodeId) -> ParsedDeclaration {
        let model = self.model;
        let ty = model.type_of(expression).or_else(|| model.type_of(node.id));
        let type_text = ty
            .as_ref()
            .map(|ty| normalize_import_paths(&ty.text))
            .unwrap_or_else(|| ANY.to_string());

        let mut linked: Vec<NodeId> = ty
            .and_then(|ty| ty.symbol)
            .map(|symbol| model.declarations_of(symbol))
            .unwrap_or_default()
            .into_iter()
            .filter(|declaration| !model.is_standard_library(*declaration))
            .collect();
        if linked.is_empty() {
            linked = self.parser.finder().find(expression);
        }

        ParsedDeclaration::default_export(&type_text, node, linked)
    }

    /// Placeholder for `export default function f` / `export default class C`,
    /// together with the parsed declaration it types
    fn default_declaration(&mut self, node: &'m Node) -> Option<(ParsedDeclaration, DeclId, bool)> {
        let model = self.model;
        let (target, is_new) = self.parse_node(node.id)?;
        let name = self.context.arena.get(target)?.name.clone();
        let type_text = model
            .type_of(node.id)
            .map(|ty| normalize_import_paths(&ty.text))
            .unwrap_or_else(|| format!("typeof {name}"));

        let mut placeholder = ParsedDeclaration::default_export(&type_text, node, vec![node.id]);
        placeholder.substitute(name, Replacement::Declaration(target));
        Some((placeholder, target, is_new))
    }

    /// Parse a raw node into the arena, at most once per node identity.
    /// Returns whether the declaration was parsed just now.
    fn parse_node(&mut self, node: NodeId) -> Option<(DeclId, bool)> {
        let model = self.model;
        let raw = model.node(node)?;
        if model.is_standard_library(node) || model.is_external_package(node) {
            return None;
        }
        if let NodeKind::VariableStatement { declarations, .. } = &raw.kind {
            return self.parse_node(*declarations.first()?);
        }

        let key = raw.key();
        if let Some(id) = self.context.parsed.get(&key) {
            return Some((*id, false));
        }

        if matches!(
            raw.kind,
            NodeKind::ImportSpecifier { .. }
                | NodeKind::NamespaceImport { .. }
                | NodeKind::ImportClause { .. }
        ) {
            let symbol = model.symbol_at(node)?;
            let declaration = self.resolved_declaration(symbol)?;
            let parsed = self.parse_node(declaration)?;
            self.context.parsed.insert(key, parsed.0);
            return Some(parsed);
        }

        let parsed = self.parser.parse(node)?;
        let id = self.context.arena.push(parsed);
        self.context.parsed.insert(key, id);
        Some((id, true))
    }

    /// Primary declaration of the symbol an alias ultimately points at
    fn resolved_declaration(&self, symbol: SymbolId) -> Option<NodeId> {
        let target = self.model.resolve_alias(symbol);
        if target == symbol {
            return None;
        }
        self.model.symbol(target)?.primary_declaration()
    }

    fn package_of(&self, node: NodeId) -> Option<String> {
        let file = self.model.source_file_of(node)?;
        package_specifier(&file.path)
    }

    /// Claim a display name for a freshly parsed declaration, renaming it
    /// when another origin already holds the name
    fn register(&mut self, id: DeclId, exported: bool) {
        let Some(declaration) = self.context.arena.get_mut(id) else {
            return;
        };
        let name = declaration.display_name.clone();
        let shadows_std = !exported && self.std_names.contains(&name);
        let renamed = self
            .context
            .collisions
            .register(&name, declaration.origin_file, shadows_std);
        if renamed != name {
            debug!("Renamed '{}' to '{}'", name, renamed);
            declaration.display_name = renamed;
        }
    }

    fn collect_linked(&mut self, module: &mut ParsedModule, id: DeclId) {
        let Some(declaration) = self.context.arena.get(id) else {
            return;
        };
        if declaration.linked_nodes.is_empty() || !self.context.visited.insert(id) {
            return;
        }

        let links = declaration.linked_nodes.clone();
        for link in links {
            match self.parse_node(link) {
                Some((target, is_new)) => {
                    if is_new {
                        self.register(target, false);
                    }
                    if target == id {
                        continue;
                    }
                    self.bind_reference(id, link, target);
                    module.linked.insert(target);
                    self.collect_linked(module, target);
                }
                None => self.rewrite_external(id, link),
            }
        }
    }

    /// Make the name `link` is referred to by print as `target`'s display
    /// name inside declaration `id`
    fn bind_reference(&mut self, id: DeclId, link: NodeId, target: DeclId) {
        let key = match self.model.node(link).map(|n| &n.kind) {
            Some(
                NodeKind::ImportSpecifier { name, .. }
                | NodeKind::NamespaceImport { name, .. }
                | NodeKind::ImportClause { name, .. },
            ) => Some(name.clone()),
            _ => self.context.arena.get(target).map(|target| target.name.clone()),
        };
        if let (Some(key), Some(declaration)) = (key, self.context.arena.get_mut(id)) {
            declaration.substitute(key, Replacement::Declaration(target));
        }
    }

    /// Bind a reference into an external package to an `import("pkg")`
    /// expression
    fn rewrite_external(&mut self, id: DeclId, link: NodeId) {
        let model = self.model;
        let Some(node) = model.node(link) else {
            return;
        };

        let rewrite = match &node.kind {
            NodeKind::ImportSpecifier {
                name,
                property_name,
                module_specifier,
            } => self.external_binding(link, module_specifier).map(|package| {
                let member = property_name.as_deref().unwrap_or(name);
                (name.clone(), format!("{}.{}", import_expression(&package), member))
            }),
            NodeKind::NamespaceImport {
                name,
                module_specifier,
            }
            | NodeKind::ImportClause {
                name,
                module_specifier,
            } => self
                .external_binding(link, module_specifier)
                .map(|package| (name.clone(), import_expression(&package))),
            kind if model.is_external_package(link) => {
                let namespace = node
                    .parent
                    .and_then(|parent| model.node(parent))
                    .and_then(|parent| match &parent.kind {
                        NodeKind::ModuleDeclaration { name, .. } if !name.starts_with(['"', '\'']) => {
                            Some(name.clone())
                        }
                        _ => None,
                    });
                match (self.package_of(link), namespace, kind.name()) {
                    (Some(package), Some(namespace), _) => {
                        Some((namespace, import_expression(&package)))
                    }
                    (Some(package), None, Some(name)) => Some((
                        name.to_string(),
                        format!("{}.{}", import_expression(&package), name),
                    )),
                    _ => None,
                }
            }
            _ => None,
        };

        if let Some((key, replacement)) = rewrite {
            debug!("Rewrote '{}' to '{}'", key, replacement);
            if let Some(declaration) = self.context.arena.get_mut(id) {
                declaration.substitute(key, Replacement::External(replacement));
            }
        }
    }

    /// Package an import binding points into, when that package is not
    /// part of the project
    fn external_binding(&self, binding: NodeId, module_specifier: &str) -> Option<String> {
        let model = self.model;
        let resolved = model
            .symbol_at(binding)
            .and_then(|symbol| self.resolved_declaration(symbol));
        match resolved {
            Some(declaration) if model.is_external_package(declaration) => self
                .package_of(declaration)
                .or_else(|| is_bare_specifier(module_specifier).then(|| module_specifier.to_string())),
            Some(_) => None,
            None => is_bare_specifier(module_specifier).then(|| module_specifier.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tsfed_core::{FileOrigin, ProgramBuilder};

    #[test]
    fn test_re_export_entry_clauses() {
        let plain = ReExportEntry::named("useState");
        assert_eq!(plain.import_clause_item(), "useState");
        assert_eq!(plain.export_clause_item(), "useState");

        let aliased = ReExportEntry {
            alias_import: Some("useLocal".to_string()),
            ..ReExportEntry::named("useState")
        }
        .with_export_name("useShared");
        assert_eq!(aliased.import_clause_item(), "useState as useLocal");
        assert_eq!(aliased.export_clause_item(), "useLocal as useShared");

        let namespace = ReExportEntry {
            is_namespace: true,
            ..ReExportEntry::named("React")
        };
        assert_eq!(namespace.import_clause_item(), "* as React");
    }

    #[test]
    fn test_exported_declaration_pulls_in_linked_interface() {
        let mut builder = ProgramBuilder::new();
        let file = builder.file("src/x.ts", FileOrigin::Project);
        let options = builder.interface(file, "Options", &[], &[], false);
        let options_symbol = builder.symbol("Options", &[options]);
        let options_ref = builder.type_ref(file, "Options", Some(options_symbol), &[]);
        let function = builder.function(file, "f", &[], Some(options_ref), true);
        let f_symbol = builder.symbol("f", &[function]);
        builder.export(file, f_symbol);
        let program = builder.build();

        let std_names = HashSet::new();
        let module = ClosureBuilder::new(&program, &std_names).build("X", file);
        assert_eq!(module.exported.len(), 1);
        assert_eq!(module.pulled_in().count(), 1);
        assert!(module.omissions.is_empty());
    }

    #[test]
    fn test_export_without_declaration_is_recorded_as_omission() {
        let mut builder = ProgramBuilder::new();
        let file = builder.file("src/x.ts", FileOrigin::Project);
        let ghost = builder.symbol("ghost", &[]);
        builder.export(file, ghost);
        let program = builder.build();

        let std_names = HashSet::new();
        let module = ClosureBuilder::new(&program, &std_names).build("X", file);
        assert_eq!(module.omissions.len(), 1);
        assert_eq!(module.omissions[0].reason, OmissionReason::UnresolvedDeclaration);
        assert!(module.exported.is_empty());
    }

    #[test]
    fn test_local_declaration_shadowing_standard_library_is_renamed() {
        let mut builder = ProgramBuilder::new();
        let file = builder.file("src/x.ts", FileOrigin::Project);
        let event = builder.interface(file, "Event", &[], &[], false);
        let event_symbol = builder.symbol("Event", &[event]);
        let event_ref = builder.type_ref(file, "Event", Some(event_symbol), &[]);
        let parameter = builder.parameter(file, "event", Some(event_ref));
        let function = builder.function(file, "handle", &[parameter], None, true);
        let handle_symbol = builder.symbol("handle", &[function]);
        builder.export(file, handle_symbol);
        let program = builder.build();

        let std_names: HashSet<String> = ["Event".to_string()].into();
        let module = ClosureBuilder::new(&program, &std_names).build("X", file);
        let exported = module.exported.first().copied().unwrap();
        assert_eq!(
            module.render(exported).unwrap(),
            "function handle(event: Event_1): any;"
        );
    }
}
