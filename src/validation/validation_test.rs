//! End-to-end validation tests over small scenes

use super::{validate_scene, Severity};
use crate::scene::{BinaryOp, Module, Procedure, ProcedureBuilder, Scene, TypeDecl};

/// One module, one type, two procedures: P1 assigns into a constant
/// (not a storage location), P2 is clean.
fn bad_assignment_scene() -> Scene {
    let mut scene = Scene::new();
    let mut module = Module::new("game");
    let mut ty = TypeDecl::new("Player");

    let mut p1 = ProcedureBuilder::new("p1");
    let target = p1.int(3);
    let value = p1.local("x");
    p1.assign(target, value);
    ty.add_procedure(p1.build());

    let mut p2 = ProcedureBuilder::new("p2");
    let result = p2.int(0);
    p2.ret(Some(result));
    ty.add_procedure(p2.build());

    module.add_type(ty);
    scene.add_module(module);
    scene
}

#[test]
fn bad_assignment_yields_one_error_for_p1_only() {
    let summary = validate_scene(&bad_assignment_scene());

    assert!(!summary.is_ok());
    assert_eq!(summary.modules.len(), 1);

    let module = summary.modules.values().next().unwrap();
    assert_eq!(module.name, "game");
    assert_eq!(module.types.len(), 1);

    let ty = module.types.values().next().unwrap();
    assert_eq!(ty.name, "Player");
    // Summaries are not created for validation-clean nodes: P2 has none
    assert_eq!(ty.procedures.len(), 1);

    let p1 = ty.procedures.values().next().unwrap();
    assert_eq!(p1.name, "p1");
    assert_eq!(p1.messages.len(), 1);
    assert_eq!(p1.messages[0].severity, Severity::Error);
    assert_eq!(
        p1.messages[0].text,
        "assignment target must be a local or field"
    );
}

#[test]
fn clean_scene_is_ok_with_no_summaries() {
    let mut scene = Scene::new();
    let mut module = Module::new("clean");
    let mut ty = TypeDecl::new("Main");
    let mut p = ProcedureBuilder::new("run");
    let x = p.local("x");
    let one = p.int(1);
    p.assign(x, one);
    p.ret(None);
    ty.add_procedure(p.build());
    module.add_type(ty);
    scene.add_module(module);

    let summary = validate_scene(&scene);
    assert!(summary.is_ok());
    assert_eq!(summary.message_count(), 0);
    assert!(summary.modules.is_empty());
}

#[test]
fn repeated_messages_share_one_procedure_summary() {
    let mut scene = Scene::new();
    let mut module = Module::new("m");
    let mut ty = TypeDecl::new("T");

    let mut p = ProcedureBuilder::new("doubly_bad");
    let c1 = p.int(1);
    let c2 = p.int(2);
    let v = p.local("v");
    p.assign(c1, v);
    p.assign(c2, v);
    ty.add_procedure(p.build());

    module.add_type(ty);
    scene.add_module(module);

    let summary = validate_scene(&scene);
    let ty_summary = summary
        .modules
        .values()
        .next()
        .unwrap()
        .types
        .values()
        .next()
        .unwrap();
    assert_eq!(ty_summary.procedures.len(), 1);
    assert_eq!(
        ty_summary.procedures.values().next().unwrap().messages.len(),
        2
    );
}

#[test]
fn module_level_issues_land_on_the_module_summary() {
    let mut scene = Scene::new();
    let mut module = Module::new("io");
    module.add_import(vec![], None);
    module.add_import(vec!["sys".to_string()], None);
    module.add_import(vec!["sys".to_string()], Some("system".to_string()));
    scene.add_module(module);

    let summary = validate_scene(&scene);
    assert!(!summary.is_ok());

    let module_summary = summary.modules.values().next().unwrap();
    assert_eq!(module_summary.messages.len(), 2);
    assert_eq!(module_summary.messages[0].severity, Severity::Error);
    assert_eq!(
        module_summary.messages[0].text,
        "import record with empty module path"
    );
    assert_eq!(module_summary.messages[1].severity, Severity::Warn);
    assert!(module_summary.messages[1].text.contains("duplicate import"));
    // No type was ever implicated
    assert!(module_summary.types.is_empty());
}

#[test]
fn operand_validators_fire_through_the_dispatcher() {
    let mut scene = Scene::new();
    let mut module = Module::new("math");
    let mut ty = TypeDecl::new("Calc");

    let mut p = ProcedureBuilder::new("ratio");
    let n = p.local("n");
    let zero = p.int(0);
    let div = p.binary(BinaryOp::Div, n, zero);
    let empty_merge = p.merge(vec![]);
    let out = p.local("out");
    p.assign(out, div);
    p.eval(empty_merge);
    ty.add_procedure(p.build());

    module.add_type(ty);
    scene.add_module(module);

    let summary = validate_scene(&scene);
    let proc_summary = summary
        .modules
        .values()
        .next()
        .unwrap()
        .types
        .values()
        .next()
        .unwrap()
        .procedures
        .values()
        .next()
        .unwrap();

    let texts: Vec<&str> = proc_summary
        .messages
        .iter()
        .map(|m| m.text.as_str())
        .collect();
    assert!(texts.contains(&"division by constant zero"));
    assert!(texts.contains(&"merge operand has no inputs"));
}

#[test]
fn bodyless_procedures_are_skipped_cleanly() {
    let mut scene = Scene::new();
    let mut module = Module::new("ffi");
    let mut ty = TypeDecl::new("Bindings");
    ty.add_procedure(Procedure::declaration("native_call"));
    module.add_type(ty);
    scene.add_module(module);

    let summary = validate_scene(&scene);
    assert!(summary.is_ok());
}

#[test]
fn empty_body_is_warned_but_missing_body_is_not() {
    let mut scene = Scene::new();
    let mut module = Module::new("m");
    let mut ty = TypeDecl::new("T");
    ty.add_procedure(ProcedureBuilder::new("stub").build());
    module.add_type(ty);
    scene.add_module(module);

    let summary = validate_scene(&scene);
    assert!(!summary.is_ok());
    let proc_summary = summary
        .modules
        .values()
        .next()
        .unwrap()
        .types
        .values()
        .next()
        .unwrap()
        .procedures
        .values()
        .next()
        .unwrap();
    assert_eq!(proc_summary.messages.len(), 1);
    assert_eq!(proc_summary.messages[0].severity, Severity::Warn);
}

#[test]
fn render_is_deterministic_and_filters_by_severity() {
    let scene = bad_assignment_scene();
    let first = validate_scene(&scene);
    let second = validate_scene(&scene);

    assert_eq!(
        first.render(Severity::Info),
        second.render(Severity::Info)
    );
    assert_eq!(
        first.render(Severity::Error),
        "game.Player.p1: [error] assignment target must be a local or field"
    );
    // Nothing above Error exists, and the error is below no filter
    assert_eq!(first.render(Severity::Info), first.render(Severity::Error));
}

#[test]
fn message_count_spans_all_levels() {
    let mut scene = Scene::new();
    let mut module = Module::new("m");
    module.add_import(vec![], None);
    let mut ty = TypeDecl::new("T");
    let mut p = ProcedureBuilder::new("broken");
    let c = p.int(9);
    let v = p.local("v");
    p.assign(c, v);
    ty.add_procedure(p.build());
    module.add_type(ty);
    scene.add_module(module);

    let summary = validate_scene(&scene);
    assert_eq!(summary.message_count(), 2);
}
