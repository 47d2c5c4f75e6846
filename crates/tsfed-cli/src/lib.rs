//! Library interface for the tsfed CLI commands

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tsfed_codegen::{format_omissions, CompileOptions, Compiler, Layout, Omission};
use tsfed_core::manifest::{CompileConfig, DEFAULT_OUTPUT};
use tsfed_core::{FederationManifest, LayoutKind, Program};
use tsfed_loader::RemoteLoader;

/// Overrides accepted by `tsfed compile`
#[derive(Debug, Clone, Default)]
pub struct CompileArgs {
    pub manifest: PathBuf,
    pub output: Option<PathBuf>,
    pub program: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct CompileSummary {
    pub output: PathBuf,
    pub modules: usize,
    pub omissions: Vec<Omission>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Paths in the manifest are relative to the manifest's own directory
fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn manifest_dir(manifest: &Path) -> &Path {
    manifest.parent().unwrap_or_else(|| Path::new(""))
}

fn layout(config: &CompileConfig) -> Layout {
    match config.layout {
        LayoutKind::Flat => Layout::Flat,
        LayoutKind::Namespaced => Layout::Namespaced {
            namespace: config.private_namespace.clone(),
        },
    }
}

fn load_manifest(path: &Path) -> Result<FederationManifest> {
    FederationManifest::from_file(path)
        .with_context(|| format!("Failed to load manifest: {:?}", path))
}

pub fn run_compile(args: &CompileArgs) -> Result<CompileSummary> {
    let manifest = load_manifest(&args.manifest)?;
    let base = manifest_dir(&args.manifest);
    let config = &manifest.compile;

    let program_path = args
        .program
        .clone()
        .unwrap_or_else(|| resolve(base, &config.program));
    info!("Loading program snapshot from {:?}", program_path);
    let program = Program::from_file(&program_path)
        .with_context(|| format!("Failed to load program snapshot: {:?}", program_path))?;

    let mut additional = Vec::with_capacity(config.additional_declarations.len());
    for path in &config.additional_declarations {
        let path = resolve(base, path);
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read additional declarations: {:?}", path))?;
        additional.push(text);
    }

    let options = CompileOptions::new(config.modules.clone())
        .with_additional_declarations(additional)
        .with_layout(layout(config));
    let report = Compiler::new(&program)
        .compile(&options)
        .context("Compilation failed")?;

    let output = match (&args.output, &config.output) {
        (Some(path), _) => path.clone(),
        (None, Some(path)) => resolve(base, path),
        (None, None) => PathBuf::from(DEFAULT_OUTPUT),
    };
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
    }
    fs::write(&output, &report.output)
        .with_context(|| format!("Failed to write output: {:?}", output))?;

    info!(
        "Wrote {} module(s) to {:?} ({} omission(s))",
        report.modules.len(),
        output,
        report.omissions.len()
    );
    if !report.omissions.is_empty() {
        warn!("{}", format_omissions(&report.omissions));
    }

    Ok(CompileSummary {
        output,
        modules: report.modules.len(),
        omissions: report.omissions,
    })
}

pub async fn run_fetch(manifest_path: &Path) -> Result<FetchSummary> {
    let manifest = load_manifest(manifest_path)?;
    let Some(remote) = manifest.remote else {
        bail!("Manifest {:?} has no [remote] section", manifest_path);
    };

    let destination = resolve(manifest_dir(manifest_path), &remote.destination);
    let loader = RemoteLoader::new(destination).context("Failed to create HTTP client")?;
    let outcomes = loader
        .fetch_all(&remote.modules)
        .await
        .context("Failed to fetch remote declarations")?;

    let mut summary = FetchSummary::default();
    for outcome in &outcomes {
        match outcome.result {
            Ok(_) => summary.succeeded += 1,
            Err(ref e) => {
                warn!("{} -> {:?}: {}", outcome.url, outcome.destination, e);
                summary.failed += 1;
            }
        }
    }
    info!(
        "Fetched {} of {} remote declaration file(s)",
        summary.succeeded,
        outcomes.len()
    );
    Ok(summary)
}
