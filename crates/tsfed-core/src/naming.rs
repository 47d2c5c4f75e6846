//! Module specifier and `import("...")` path normalization
//!
//! Type text printed by a checker qualifies out-of-file types with the
//! absolute path of the file that declares them, e.g.
//! `import("/app/node_modules/@types/react/index").ReactNode`. Emitted
//! declarations must not depend on the machine they were generated on, so
//! those qualifiers are rewritten to public package specifiers, and
//! qualifiers pointing into the project itself are dropped.

use std::sync::LazyLock;

use regex::{Captures, Regex};

const NODE_MODULES: &str = "node_modules/";
const TYPES_SCOPE: &str = "@types/";

static IMPORT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"import\(\s*['"]([^'"]*)['"]\s*\)(\.)?"#).expect("Invalid regex")
});

/// Rewrite every `import("...")` qualifier in `text`.
///
/// Qualifiers that already name a package are kept, so normalizing twice
/// gives the same text.
///
/// # Examples
/// ```
/// use tsfed_core::naming::normalize_import_paths;
/// assert_eq!(
///     normalize_import_paths(r#"import("/app/node_modules/@types/react/index").ReactNode"#),
///     r#"import("react").ReactNode"#
/// );
/// assert_eq!(
///     normalize_import_paths(r#"import("/app/src/options").Options[]"#),
///     "Options[]"
/// );
/// ```
pub fn normalize_import_paths(text: &str) -> String {
    IMPORT_PATTERN
        .replace_all(text, |caps: &Captures<'_>| {
            let path = &caps[1];
            let member_access = caps.get(2).is_some();
            let package = package_specifier(path)
                .or_else(|| is_bare_specifier(path).then(|| path.to_string()));
            match package {
                Some(package) if member_access => format!("{}.", import_expression(&package)),
                Some(package) => import_expression(&package),
                None => String::new(),
            }
        })
        .into_owned()
}

/// Public package specifier for a path inside `node_modules`.
///
/// `@types/scope__name` packages map back to `@scope/name`. Paths outside
/// `node_modules` have no package specifier.
///
/// # Examples
/// ```
/// use tsfed_core::naming::package_specifier;
/// assert_eq!(package_specifier("/a/node_modules/lodash/fp/index.d.ts").as_deref(), Some("lodash"));
/// assert_eq!(package_specifier("/a/node_modules/@types/babel__core/index").as_deref(), Some("@babel/core"));
/// assert_eq!(package_specifier("/a/src/index.ts"), None);
/// ```
pub fn package_specifier(path: &str) -> Option<String> {
    let start = path.rfind(NODE_MODULES)? + NODE_MODULES.len();
    let rest = &path[start..];

    if let Some(typed) = rest.strip_prefix(TYPES_SCOPE) {
        let name = typed.split('/').next().filter(|name| !name.is_empty())?;
        return Some(match name.split_once("__") {
            Some((scope, package)) => format!("@{scope}/{package}"),
            None => name.to_string(),
        });
    }

    let mut segments = rest.split('/').filter(|segment| !segment.is_empty());
    let first = segments.next()?;
    if first.starts_with('@') {
        let second = segments.next()?;
        Some(format!("{first}/{second}"))
    } else {
        Some(first.to_string())
    }
}

/// Whether a module specifier names a package rather than a relative or
/// absolute file
pub fn is_bare_specifier(specifier: &str) -> bool {
    !(specifier.is_empty()
        || specifier.starts_with('.')
        || specifier.starts_with('/')
        || specifier.contains(':')
        || specifier.contains('\\'))
}

/// `import("<specifier>")`
pub fn import_expression(specifier: &str) -> String {
    format!("import(\"{specifier}\")")
}
