//! Compilation of every configured entry point into one declaration text

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{info, instrument};
use tsfed_core::{FileId, FileOrigin, NodeKind, SemanticModel};

use crate::closure::{ClosureBuilder, ParsedModule};
use crate::error::{CodegenError, Omission};
use crate::printer::{Layout, ModulePrinter, PrintOptions};

/// Post-processing applied to the final text
pub type Formatter = Box<dyn Fn(String) -> String + Send + Sync>;

#[derive(Default)]
pub struct CompileOptions {
    /// Logical module name to entry file path
    pub modules: IndexMap<String, String>,
    /// Declaration texts prepended, in order, to non-empty output
    pub additional_declarations: Vec<String>,
    pub print: PrintOptions,
    pub format: Option<Formatter>,
}

impl fmt::Debug for CompileOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileOptions")
            .field("modules", &self.modules)
            .field("additional_declarations", &self.additional_declarations.len())
            .field("print", &self.print)
            .field("format", &self.format.is_some())
            .finish()
    }
}

impl CompileOptions {
    pub fn new<I, K, V>(modules: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            modules: modules
                .into_iter()
                .map(|(name, path)| (name.into(), path.into()))
                .collect(),
            ..Self::default()
        }
    }

    pub fn with_additional_declarations(mut self, declarations: Vec<String>) -> Self {
        self.additional_declarations = declarations;
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.print.layout = layout;
        self
    }

    pub fn with_formatter(mut self, format: impl Fn(String) -> String + Send + Sync + 'static) -> Self {
        self.format = Some(Box::new(format));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleSummary {
    pub name: String,
    pub exported: usize,
    pub linked: usize,
    pub re_exports: usize,
    pub has_default_export: bool,
}

impl From<&ParsedModule> for ModuleSummary {
    fn from(module: &ParsedModule) -> Self {
        Self {
            name: module.name.clone(),
            exported: module.exported.len() + module.aliases.len(),
            linked: module.pulled_in().count(),
            re_exports: module.re_exports.values().map(Vec::len).sum(),
            has_default_export: module.default_export.is_some(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompileReport {
    pub output: String,
    pub modules: Vec<ModuleSummary>,
    pub omissions: Vec<Omission>,
}

pub struct Compiler<'m> {
    model: &'m dyn SemanticModel,
    std_names: HashSet<String>,
}

impl<'m> Compiler<'m> {
    pub fn new(model: &'m dyn SemanticModel) -> Self {
        Self {
            model,
            std_names: standard_library_names(model),
        }
    }

    pub fn standard_library_names(&self) -> &HashSet<String> {
        &self.std_names
    }

    /// Closure of one entry point, built with a fresh compilation context
    pub fn compile_module(&self, name: &str, file: FileId) -> ParsedModule {
        ClosureBuilder::new(self.model, &self.std_names).build(name, file)
    }

    /// Compile every entry point. A missing entry file fails the whole run
    /// before anything is printed.
    #[instrument(skip(self, options), fields(modules = options.modules.len()))]
    pub fn compile(&self, options: &CompileOptions) -> Result<CompileReport, CodegenError> {
        let mut entries = Vec::with_capacity(options.modules.len());
        for (name, path) in &options.modules {
            let file = self
                .model
                .file_by_path(path)
                .ok_or_else(|| CodegenError::EntryNotFound {
                    module: name.clone(),
                    path: path.clone(),
                })?;
            entries.push((name.as_str(), file.id));
        }

        let printer = ModulePrinter::new(options.print.clone());
        let mut output = String::new();
        let mut modules = Vec::with_capacity(entries.len());
        let mut omissions = Vec::new();

        for (name, file) in entries {
            let module = self.compile_module(name, file);
            let summary = ModuleSummary::from(&module);
            info!(
                "Compiled '{}': {} exported, {} pulled in, {} re-exported",
                summary.name, summary.exported, summary.linked, summary.re_exports
            );

            output.push_str(&printer.print(&module)?);
            output.push('\n');
            modules.push(summary);
            omissions.extend(module.omissions);
        }

        if !output.is_empty() && !options.additional_declarations.is_empty() {
            let mut prefix = String::new();
            for declaration in &options.additional_declarations {
                prefix.push_str(declaration);
                prefix.push('\n');
            }
            output.insert_str(0, &prefix);
        }

        if let Some(ref format) = options.format {
            output = format(output);
        }

        Ok(CompileReport {
            output,
            modules,
            omissions,
        })
    }
}

/// Names of the interfaces, type aliases and enums declared at the top
/// level of standard-library files
pub fn standard_library_names(model: &dyn SemanticModel) -> HashSet<String> {
    model
        .files()
        .iter()
        .filter(|file| file.origin == FileOrigin::StandardLibrary)
        .flat_map(|file| file.statements.iter())
        .filter_map(|statement| model.node(*statement))
        .filter_map(|node| match &node.kind {
            NodeKind::InterfaceDeclaration { name, .. }
            | NodeKind::TypeAliasDeclaration { name, .. }
            | NodeKind::EnumDeclaration { name } => Some(name.clone()),
            _ => None,
        })
        .collect()
}
