//! Per-entry-point compilation state
//!
//! Everything here lives exactly as long as one entry point's closure is
//! being built. A fresh [`CompilationContext`] is created for every entry
//! point, so renames and caches never leak from one module into another.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use tsfed_core::{FileId, NodeKey};

use crate::declaration::{ParsedDeclaration, Replacement};

/// Index of a parsed declaration in a [`DeclArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub u32);

#[derive(Debug, Clone, Default)]
pub struct DeclArena {
    declarations: Vec<ParsedDeclaration>,
}

impl DeclArena {
    pub fn push(&mut self, declaration: ParsedDeclaration) -> DeclId {
        let id = DeclId(self.declarations.len() as u32);
        self.declarations.push(declaration);
        id
    }

    pub fn get(&self, id: DeclId) -> Option<&ParsedDeclaration> {
        self.declarations.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: DeclId) -> Option<&mut ParsedDeclaration> {
        self.declarations.get_mut(id.0 as usize)
    }

    /// Final text of a declaration with every rename and external rewrite
    /// applied
    pub fn render(&self, id: DeclId) -> Option<String> {
        let declaration = self.get(id)?;
        let resolve = |name: &str| match declaration.substitutions.get(name)? {
            Replacement::Declaration(target) => {
                self.get(*target).map(|target| target.display_name.clone())
            }
            Replacement::External(text) => Some(text.clone()),
        };
        Some(
            declaration
                .text
                .render(&declaration.name, &declaration.display_name, &resolve),
        )
    }
}

/// Hands out display names so that no two origins print under one name.
///
/// The first origin seen for a base name keeps it; the k-th distinct origin
/// gets `name_k`. A base name first registered by a declaration that shadows
/// a standard-library type starts counting at one. A suffixed candidate that
/// is already held by another declaration (a renamed one, or one literally
/// named `Shape_1`) is skipped in favour of the next free index.
#[derive(Debug, Default)]
pub struct CollisionRegistry {
    bases: HashMap<String, BaseName>,
    /// Display names already handed out
    claimed: HashSet<String>,
}

#[derive(Debug)]
struct BaseName {
    /// Display name given to each origin, in registration order
    origins: IndexMap<FileId, String>,
    shadows_std: bool,
}

impl CollisionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `origin` for `name` and return the name it prints as.
    /// Registering the same origin again returns the same display name.
    pub fn register(&mut self, name: &str, origin: FileId, shadows_std: bool) -> String {
        let base = self
            .bases
            .entry(name.to_string())
            .or_insert_with(|| BaseName {
                origins: IndexMap::new(),
                shadows_std,
            });
        if let Some(display) = base.origins.get(&origin) {
            return display.clone();
        }

        let mut index = base.origins.len() + usize::from(base.shadows_std);
        let display = loop {
            let candidate = if index == 0 {
                name.to_string()
            } else {
                format!("{name}_{index}")
            };
            if !self.claimed.contains(&candidate) {
                break candidate;
            }
            index += 1;
        };

        base.origins.insert(origin, display.clone());
        self.claimed.insert(display.clone());
        display
    }
}

#[derive(Debug, Default)]
pub struct CompilationContext {
    pub arena: DeclArena,
    /// Parsed declaration per raw node
    pub parsed: HashMap<NodeKey, DeclId>,
    /// Declarations whose links were already collected
    pub visited: HashSet<DeclId>,
    pub collisions: CollisionRegistry,
}

impl CompilationContext {
    pub fn new() -> Self {
        Self::default()
    }
}
