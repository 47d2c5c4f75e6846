//! End-to-end closure scenarios
//!
//! Each test builds a small program by hand, compiles one entry point and
//! checks the emitted ambient module.

use pretty_assertions::assert_eq;
use tsfed_codegen::{CompileOptions, Compiler, OmissionReason};
use tsfed_core::{FileOrigin, NodeKind, Program, ProgramBuilder, TypeInfo};

fn compile(program: &Program, name: &str, path: &str) -> Result<String, Box<dyn std::error::Error>> {
    let options = CompileOptions::new([(name, path)]);
    Ok(Compiler::new(program).compile(&options)?.output)
}

#[test]
fn test_function_pulls_in_local_return_type() -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = ProgramBuilder::new();
    let file = builder.file("src/x.ts", FileOrigin::Project);
    let string = builder.keyword(file, "string");
    let value = builder.property_signature(file, "value", string, false);
    let options = builder.interface(file, "Options", &[], &[value], false);
    let options_symbol = builder.symbol("Options", &[options]);
    let options_ref = builder.type_ref(file, "Options", Some(options_symbol), &[]);
    let function = builder.function(file, "f", &[], Some(options_ref), true);
    let f_symbol = builder.symbol("f", &[function]);
    builder.export(file, f_symbol);
    let program = builder.build();

    let output = compile(&program, "X", "src/x.ts")?;
    assert_eq!(
        output,
        "declare module \"X\" {\n    interface Options {\n        value: string;\n    }\n    export function f(): Options;\n}\n"
    );
    assert_eq!(output.matches("interface Options").count(), 1);
    Ok(())
}

#[test]
fn test_colliding_names_from_distinct_files_are_renamed() -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = ProgramBuilder::new();
    let a = builder.file("src/a.ts", FileOrigin::Project);
    let b = builder.file("src/b.ts", FileOrigin::Project);
    let m = builder.file("src/m.ts", FileOrigin::Project);

    let string = builder.keyword(a, "string");
    let a_member = builder.property_signature(a, "a", string, false);
    let a_shape = builder.interface(a, "Shape", &[], &[a_member], true);
    let a_symbol = builder.symbol("Shape", &[a_shape]);

    let number = builder.keyword(b, "number");
    let b_member = builder.property_signature(b, "b", number, false);
    let b_shape = builder.interface(b, "Shape", &[], &[b_member], true);
    let b_symbol = builder.symbol("Shape", &[b_shape]);

    builder.import_specifier(m, "Shape", None, "./a", a_symbol);
    builder.import_specifier(m, "Other", Some("Shape"), "./b", b_symbol);
    let local_a = builder.local_symbol(m, "Shape");
    let local_b = builder.local_symbol(m, "Other");
    let shape_ref = builder.type_ref(m, "Shape", local_a, &[]);
    let other_ref = builder.type_ref(m, "Other", local_b, &[]);
    let s = builder.parameter(m, "s", Some(shape_ref));
    let o = builder.parameter(m, "o", Some(other_ref));
    let returns = builder.keyword(m, "number");
    let area = builder.function(m, "area", &[s, o], Some(returns), true);
    let area_symbol = builder.symbol("area", &[area]);
    builder.export(m, area_symbol);
    let program = builder.build();

    let output = compile(&program, "M", "src/m.ts")?;
    assert_eq!(
        output,
        concat!(
            "declare module \"M\" {\n",
            "    interface Shape {\n",
            "        a: string;\n",
            "    }\n",
            "    interface Shape_1 {\n",
            "        b: number;\n",
            "    }\n",
            "    export function area(s: Shape, o: Shape_1): number;\n",
            "}\n",
        )
    );
    Ok(())
}

#[test]
fn test_default_export_is_typed_placeholder() -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = ProgramBuilder::new();
    let file = builder.file("src/config.ts", FileOrigin::Project);
    let string = builder.keyword(file, "string");
    let value = builder.property_signature(file, "value", string, false);
    let options = builder.interface(file, "Options", &[], &[value], false);
    let options_symbol = builder.symbol("Options", &[options]);
    let options_ref = builder.type_ref(file, "Options", Some(options_symbol), &[]);
    let initializer = builder.literal(file, "{ value: \"a\" }");
    let some_value = builder.variable(file, "someValue", Some(options_ref), Some(initializer), false);
    let some_value_symbol = builder.symbol("someValue", &[some_value]);
    let expression = builder.identifier(file, "someValue", Some(some_value_symbol));
    builder.set_type(expression, TypeInfo::new("Options").with_symbol(options_symbol));
    let assignment = builder.statement(
        file,
        "export default someValue;",
        NodeKind::ExportAssignment { expression },
    );
    let default_symbol = builder.symbol("default", &[assignment]);
    builder.export(file, default_symbol);
    let program = builder.build();

    let output = compile(&program, "C", "src/config.ts")?;
    assert_eq!(
        output,
        concat!(
            "declare module \"C\" {\n",
            "    interface Options {\n",
            "        value: string;\n",
            "    }\n",
            "    const _default: Options;\n",
            "    export default _default;\n",
            "}\n",
        )
    );
    assert!(!output.contains("someValue"));
    Ok(())
}

#[test]
fn test_external_symbols_are_re_exported_not_copied() -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = ProgramBuilder::new();
    let react = builder.file("/app/node_modules/react/index.d.ts", FileOrigin::ExternalPackage);
    let file = builder.file("src/hooks.ts", FileOrigin::Project);

    let use_state = builder.function(react, "useState", &[], None, true);
    let use_state_symbol = builder.symbol("useState", &[use_state]);
    builder.export_specifier(file, "useState", None, Some("react"), Some(use_state_symbol));

    builder.namespace_import(file, "React", "react", None);
    let local_react = builder.local_symbol(file, "React");
    builder.export_specifier(file, "React", None, None, local_react);
    let program = builder.build();

    let output = compile(&program, "D", "src/hooks.ts")?;
    assert_eq!(
        output,
        concat!(
            "declare module \"D\" {\n",
            "    import * as React from \"react\";\n",
            "    import { useState } from \"react\";\n",
            "    export { useState, React };\n",
            "}\n",
        )
    );
    assert!(!output.contains("function useState"));
    Ok(())
}

#[test]
fn test_exported_alias_prints_under_exported_name() -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = ProgramBuilder::new();
    let file = builder.file("src/button.ts", FileOrigin::Project);
    let string = builder.keyword(file, "string");
    let label = builder.property_signature(file, "label", string, true);
    let props = builder.interface(file, "Props", &[], &[label], false);
    let props_symbol = builder.symbol("Props", &[props]);
    builder.export_specifier(file, "ButtonProps", Some("Props"), None, Some(props_symbol));
    let program = builder.build();

    let output = compile(&program, "app/Button", "src/button.ts")?;
    assert_eq!(
        output,
        "declare module \"app/Button\" {\n    export interface ButtonProps {\n        label?: string;\n    }\n}\n"
    );
    Ok(())
}

#[test]
fn test_external_type_references_become_import_expressions() -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = ProgramBuilder::new();
    let react = builder.file(
        "/app/node_modules/@types/react/index.d.ts",
        FileOrigin::ExternalPackage,
    );
    let file = builder.file("src/view.ts", FileOrigin::Project);

    let any = builder.keyword(react, "any");
    let react_node = builder.type_alias(react, "ReactNode", any, true);
    let react_node_symbol = builder.symbol("ReactNode", &[react_node]);
    builder.import_specifier(file, "ReactNode", None, "react", react_node_symbol);
    let local = builder.local_symbol(file, "ReactNode");
    let reference = builder.type_ref(file, "ReactNode", local, &[]);
    let content = builder.variable(file, "content", Some(reference), None, true);
    let content_symbol = builder.symbol("content", &[content]);
    builder.export(file, content_symbol);
    let program = builder.build();

    let output = compile(&program, "app/View", "src/view.ts")?;
    assert_eq!(
        output,
        "declare module \"app/View\" {\n    export const content: import(\"react\").ReactNode;\n}\n"
    );
    Ok(())
}

#[test]
fn test_unsupported_export_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = ProgramBuilder::new();
    let file = builder.file("src/util.ts", FileOrigin::Project);
    let namespace = builder.statement(
        file,
        "export namespace Util {}",
        NodeKind::ModuleDeclaration {
            name: "Util".to_string(),
            statements: vec![],
        },
    );
    let util_symbol = builder.symbol("Util", &[namespace]);
    builder.export(file, util_symbol);
    let program = builder.build();

    let options = CompileOptions::new([("app/Util", "src/util.ts")]);
    let report = Compiler::new(&program).compile(&options)?;
    assert_eq!(report.output, "declare module \"app/Util\" {\n}\n");
    assert_eq!(report.omissions.len(), 1);
    assert_eq!(report.omissions[0].reason, OmissionReason::UnsupportedDeclaration);
    assert_eq!(report.omissions[0].detail.as_deref(), Some("namespace"));
    Ok(())
}

#[test]
fn test_renamed_declaration_never_takes_an_existing_suffixed_name() -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = ProgramBuilder::new();
    let mut targets = Vec::new();
    for (index, name) in ["Shape", "Shape", "Shape_1"].iter().enumerate() {
        let file = builder.file(format!("src/s{index}.ts"), FileOrigin::Project);
        let string = builder.keyword(file, "string");
        let member = builder.property_signature(file, &format!("m{index}"), string, false);
        let declaration = builder.interface(file, name, &[], &[member], true);
        targets.push((*name, builder.symbol(*name, &[declaration])));
    }

    let entry = builder.file("src/entry.ts", FileOrigin::Project);
    let mut parameters = Vec::new();
    for (index, (name, target)) in targets.into_iter().enumerate() {
        let local = format!("L{index}");
        builder.import_specifier(entry, &local, Some(name), &format!("./s{index}"), target);
        let local_symbol = builder.local_symbol(entry, &local);
        let reference = builder.type_ref(entry, &local, local_symbol, &[]);
        parameters.push(builder.parameter(entry, &format!("p{index}"), Some(reference)));
    }
    let function = builder.function(entry, "useAll", &parameters, None, true);
    let symbol = builder.symbol("useAll", &[function]);
    builder.export(entry, symbol);
    let program = builder.build();

    let output = compile(&program, "M", "src/entry.ts")?;
    assert_eq!(
        output,
        concat!(
            "declare module \"M\" {\n",
            "    interface Shape {\n",
            "        m0: string;\n",
            "    }\n",
            "    interface Shape_1 {\n",
            "        m1: string;\n",
            "    }\n",
            "    interface Shape_1_1 {\n",
            "        m2: string;\n",
            "    }\n",
            "    export function useAll(p0: Shape, p1: Shape_1, p2: Shape_1_1): any;\n",
            "}\n",
        )
    );
    Ok(())
}

#[test]
fn test_every_overload_pulls_in_its_own_types() -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = ProgramBuilder::new();
    let file = builder.file("src/x.ts", FileOrigin::Project);
    let mut overloads = Vec::new();
    for (name, parameter) in [("A", "a"), ("B", "b")] {
        let string = builder.keyword(file, "string");
        let member = builder.property_signature(file, "value", string, false);
        let interface = builder.interface(file, name, &[], &[member], false);
        let interface_symbol = builder.symbol(name, &[interface]);
        let reference = builder.type_ref(file, name, Some(interface_symbol), &[]);
        let parameter = builder.parameter(file, parameter, Some(reference));
        overloads.push(builder.function(file, "f", &[parameter], None, true));
    }
    let f_symbol = builder.symbol("f", &overloads);
    builder.export(file, f_symbol);
    let program = builder.build();

    let output = compile(&program, "X", "src/x.ts")?;
    assert_eq!(output.matches("interface A {").count(), 1, "{output}");
    assert_eq!(output.matches("interface B {").count(), 1, "{output}");
    assert!(output.contains("export function f(a: A): any;"));
    assert!(output.contains("export function f(b: B): any;"));
    Ok(())
}

#[test]
fn test_second_export_name_of_one_declaration_is_kept() -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = ProgramBuilder::new();
    let file = builder.file("src/button.ts", FileOrigin::Project);
    let string = builder.keyword(file, "string");
    let label = builder.property_signature(file, "label", string, true);
    let props = builder.interface(file, "Props", &[], &[label], false);
    let props_symbol = builder.symbol("Props", &[props]);
    builder.export_specifier(file, "Props", None, None, Some(props_symbol));
    builder.export_specifier(file, "ButtonProps", Some("Props"), None, Some(props_symbol));
    let program = builder.build();

    let options = CompileOptions::new([("app/Button", "src/button.ts")]);
    let report = Compiler::new(&program).compile(&options)?;
    assert_eq!(
        report.output,
        concat!(
            "declare module \"app/Button\" {\n",
            "    export interface Props {\n",
            "        label?: string;\n",
            "    }\n",
            "    export { Props as ButtonProps };\n",
            "}\n",
        )
    );
    assert!(report.omissions.is_empty());
    assert_eq!(report.modules[0].exported, 2);
    Ok(())
}
