//! Ambient module printing

use std::fmt::Write;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::closure::{ParsedModule, ReExportEntry};
use crate::context::DeclId;
use crate::declaration::{DeclarationKind, DEFAULT_EXPORT_NAME};
use crate::error::CodegenError;

const INDENT: &str = "    ";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layout {
    /// Pulled-in declarations sit next to the exported ones
    #[default]
    Flat,
    /// Every declaration lives in a private namespace and the public
    /// surface is re-derived from it
    Namespaced { namespace: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrintOptions {
    pub layout: Layout,
}

pub struct ModulePrinter {
    options: PrintOptions,
}

impl ModulePrinter {
    pub fn new(options: PrintOptions) -> Self {
        Self { options }
    }

    /// Print one closure as `declare module "name" { ... }`
    pub fn print(&self, module: &ParsedModule) -> Result<String, CodegenError> {
        let mut blocks = import_statements(module);

        match self.options.layout {
            Layout::Flat => flat_body(module, &mut blocks),
            Layout::Namespaced { ref namespace } => namespaced_body(module, namespace, &mut blocks),
        }

        let mut out = String::new();
        writeln!(out, "declare module \"{}\" {{", module.name)?;
        for block in &blocks {
            for line in block.lines() {
                if line.is_empty() {
                    writeln!(out)?;
                } else {
                    writeln!(out, "{INDENT}{line}")?;
                }
            }
        }
        write!(out, "}}")?;
        Ok(out)
    }
}

/// One import statement per package. A namespace import cannot share a
/// statement with named imports, so those get their own.
fn import_statements(module: &ParsedModule) -> Vec<String> {
    let mut statements = Vec::new();

    for (package, entries) in &module.re_exports {
        let default = entries.iter().find(|entry| entry.is_default);
        let namespace = entries.iter().find(|entry| entry.is_namespace);
        let named: IndexSet<String> = entries
            .iter()
            .filter(|entry| !entry.is_default && !entry.is_namespace)
            .map(ReExportEntry::import_clause_item)
            .collect();
        let named = named.into_iter().collect::<Vec<_>>().join(", ");

        let mut head: Vec<String> = default.map(ReExportEntry::import_clause_item).into_iter().collect();
        match namespace {
            Some(namespace) => {
                head.push(namespace.import_clause_item());
                statements.push(format!("import {} from \"{}\";", head.join(", "), package));
                if !named.is_empty() {
                    statements.push(format!("import {{ {} }} from \"{}\";", named, package));
                }
            }
            None => {
                if !named.is_empty() {
                    head.push(format!("{{ {named} }}"));
                }
                if !head.is_empty() {
                    statements.push(format!("import {} from \"{}\";", head.join(", "), package));
                }
            }
        }
    }

    statements
}

/// `export { a, b as c };`, or nothing when there is nothing to list.
/// Aliases of closure declarations are listed only when they are in scope.
fn export_clause(module: &ParsedModule, with_aliases: bool) -> Option<String> {
    let mut items: IndexSet<String> = module
        .re_exports
        .values()
        .flatten()
        .map(ReExportEntry::export_clause_item)
        .collect();
    if with_aliases {
        items.extend(module.aliases.iter().filter_map(|(alias, id)| {
            module
                .declaration(*id)
                .map(|declaration| format!("{} as {}", declaration.display_name, alias))
        }));
    }
    if items.is_empty() {
        return None;
    }
    Some(format!(
        "export {{ {} }};",
        items.into_iter().collect::<Vec<_>>().join(", ")
    ))
}

fn declaration_block(module: &ParsedModule, id: DeclId, prefix: &str) -> Option<String> {
    let declaration = module.declaration(id)?;
    let text = module.render(id)?;
    let mut block = String::new();
    if let Some(ref documentation) = declaration.documentation {
        block.push_str(documentation);
        block.push('\n');
    }
    block.push_str(prefix);
    block.push_str(&text);
    Some(block)
}

fn flat_body(module: &ParsedModule, blocks: &mut Vec<String>) {
    blocks.extend(module.pulled_in().filter_map(|id| declaration_block(module, id, "")));
    blocks.extend(
        module
            .exported
            .iter()
            .filter_map(|id| declaration_block(module, *id, "export ")),
    );
    blocks.extend(export_clause(module, true));
    if let Some(text) = module.default_export.and_then(|id| module.render(id)) {
        blocks.push(format!("{text}\nexport default {DEFAULT_EXPORT_NAME};"));
    }
}

fn namespaced_body(module: &ParsedModule, namespace: &str, blocks: &mut Vec<String>) {
    let mut inner: Vec<String> = module
        .pulled_in()
        .chain(module.exported.iter().copied())
        .filter_map(|id| declaration_block(module, id, "export "))
        .collect();
    if let Some(text) = module.default_export.and_then(|id| module.render(id)) {
        inner.push(format!("export {text}"));
    }

    let mut namespace_block = format!("namespace {namespace} {{\n");
    for line in inner.iter().flat_map(|block| block.lines()) {
        if !line.is_empty() {
            namespace_block.push_str(INDENT);
            namespace_block.push_str(line);
        }
        namespace_block.push('\n');
    }
    namespace_block.push('}');
    blocks.push(namespace_block);

    for id in &module.exported {
        let Some(declaration) = module.declaration(*id) else {
            continue;
        };
        let name = &declaration.display_name;
        let wrapper = match declaration.kind {
            DeclarationKind::Interface if !declaration.has_type_parameters => {
                format!("export interface {name} extends {namespace}.{name} {{}}")
            }
            DeclarationKind::Class if !declaration.has_type_parameters && !declaration.is_abstract => {
                format!("export class {name} extends {namespace}.{name} {{}}")
            }
            _ => format!("export import {name} = {namespace}.{name};"),
        };
        match declaration.documentation {
            Some(ref documentation) => blocks.push(format!("{documentation}\n{wrapper}")),
            None => blocks.push(wrapper),
        }
    }

    for (alias, id) in &module.aliases {
        if let Some(declaration) = module.declaration(*id) {
            blocks.push(format!(
                "export import {alias} = {namespace}.{};",
                declaration.display_name
            ));
        }
    }

    blocks.push(export_clause(module, false).unwrap_or_else(|| "export {};".to_string()));
    if module.default_export.is_some() {
        blocks.push(format!("export default {namespace}.{DEFAULT_EXPORT_NAME};"));
    }
}
