//! Properties that must hold for any closure

use std::collections::HashSet;

use proptest::prelude::*;
use tsfed_codegen::{CompileOptions, Compiler};
use tsfed_core::{FileOrigin, Program, ProgramBuilder};

const NAMES: [&str; 4] = ["Shape", "Point", "Size", "Shape_1"];

/// One file per entry in `names`, each declaring an interface, and an entry
/// file whose exported function takes one parameter of each of them
fn program_with_interfaces(names: &[usize]) -> Program {
    let mut builder = ProgramBuilder::new();
    let mut parameters = Vec::new();
    let mut targets = Vec::new();

    for (index, name) in names.iter().enumerate() {
        let file = builder.file(format!("src/f{index}.ts"), FileOrigin::Project);
        let string = builder.keyword(file, "string");
        let member = builder.property_signature(file, &format!("m{index}"), string, false);
        let declaration = builder.interface(file, NAMES[*name], &[], &[member], true);
        targets.push((NAMES[*name], builder.symbol(NAMES[*name], &[declaration])));
    }

    let entry = builder.file("src/entry.ts", FileOrigin::Project);
    for (index, (name, target)) in targets.into_iter().enumerate() {
        let local = format!("L{index}");
        builder.import_specifier(entry, &local, Some(name), &format!("./f{index}"), target);
        let local_symbol = builder.local_symbol(entry, &local);
        let reference = builder.type_ref(entry, &local, local_symbol, &[]);
        parameters.push(builder.parameter(entry, &format!("p{index}"), Some(reference)));
    }
    let function = builder.function(entry, "useAll", &parameters, None, true);
    let symbol = builder.symbol("useAll", &[function]);
    builder.export(entry, symbol);
    builder.build()
}

fn printed_interface_names(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.trim().strip_prefix("interface "))
        .filter_map(|rest| rest.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

proptest! {
    #[test]
    fn compiling_twice_gives_identical_output(names in prop::collection::vec(0usize..4, 1..6)) {
        let program = program_with_interfaces(&names);
        let options = CompileOptions::new([("app/Entry", "src/entry.ts")]);
        let compiler = Compiler::new(&program);
        let first = compiler.compile(&options).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let second = compiler.compile(&options).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(first.output, second.output);
    }

    #[test]
    fn printed_names_never_collide(names in prop::collection::vec(0usize..4, 1..6)) {
        let program = program_with_interfaces(&names);
        let options = CompileOptions::new([("app/Entry", "src/entry.ts")]);
        let report = Compiler::new(&program)
            .compile(&options)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let printed = printed_interface_names(&report.output);
        prop_assert_eq!(printed.len(), names.len());
        let distinct: HashSet<&String> = printed.iter().collect();
        prop_assert_eq!(distinct.len(), printed.len());
    }
}
