//! Properties of `import("...")` normalization over generated paths

use proptest::prelude::*;
use tsfed_core::naming::{normalize_import_paths, package_specifier};

fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,8}"
}

proptest! {
    #[test]
    fn normalized_text_has_no_machine_paths(
        root in prop::collection::vec(segment(), 1..4),
        package in segment(),
        member in "[A-Z][A-Za-z]{0,8}",
    ) {
        let text = format!(
            "import(\"/{}/node_modules/{}/index\").{}",
            root.join("/"),
            package,
            member
        );
        let normalized = normalize_import_paths(&text);
        prop_assert_eq!(&normalized, &format!("import(\"{}\").{}", package, member));
        prop_assert!(!normalized.contains("node_modules"));
    }

    #[test]
    fn normalization_is_idempotent(
        dirs in prop::collection::vec(segment(), 1..4),
        scope in segment(),
        name in segment(),
        typed in any::<bool>(),
    ) {
        let package_dir = if typed {
            format!("@types/{scope}__{name}")
        } else {
            format!("@{scope}/{name}")
        };
        let text = format!(
            "Array<import(\"/{}/node_modules/{}/lib\").T> | import(\"./{}\").U",
            dirs.join("/"),
            package_dir,
            dirs.join("/")
        );
        let once = normalize_import_paths(&text);
        prop_assert_eq!(normalize_import_paths(&once), once.clone());
        prop_assert_eq!(once, format!("Array<import(\"@{}/{}\").T> | U", scope, name));
    }

    #[test]
    fn paths_outside_node_modules_have_no_package(dirs in prop::collection::vec(segment(), 1..5)) {
        let path = format!("/{}/index.ts", dirs.join("/"));
        prop_assume!(!path.contains("node_modules/"));
        prop_assert_eq!(package_specifier(&path), None);
    }
}
