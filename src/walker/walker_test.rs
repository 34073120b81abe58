//! Traversal driver tests
//!
//! Passes record their invocations into an `Rc<RefCell<Vec<String>>>`
//! trace shared with the test body.

use super::{FallAction, ModulePass, ProcedurePass, SceneWalker, TypePass};
use crate::context::Context;
use crate::scene::{Module, Procedure, ProcedureBuilder, Scene, TypeDecl};
use std::cell::RefCell;
use std::rc::Rc;

type Trace = Rc<RefCell<Vec<String>>>;

struct TraceModulePass {
    label: &'static str,
    trace: Trace,
}

impl ModulePass for TraceModulePass {
    fn name(&self) -> &'static str {
        self.label
    }

    fn run(&mut self, module: &Module, _ctx: &mut Context) -> Option<FallAction> {
        self.trace
            .borrow_mut()
            .push(format!("{}:{}", self.label, module.name()));
        None
    }
}

struct TraceProcedurePass {
    label: &'static str,
    trace: Trace,
    /// Procedure name this pass returns Break for
    break_on: Option<&'static str>,
}

impl ProcedurePass for TraceProcedurePass {
    fn name(&self) -> &'static str {
        self.label
    }

    fn run(&mut self, procedure: &Procedure, _ctx: &mut Context) -> Option<FallAction> {
        self.trace
            .borrow_mut()
            .push(format!("{}:{}", self.label, procedure.name()));
        if self.break_on == Some(procedure.name()) {
            return Some(FallAction::Break);
        }
        None
    }
}

/// Marker used by the context-isolation tests
struct Probe;

struct ProbeTypePass {
    observations: Rc<RefCell<Vec<bool>>>,
}

impl TypePass for ProbeTypePass {
    fn name(&self) -> &'static str {
        "probe-type"
    }

    fn run(&mut self, _type_decl: &TypeDecl, ctx: &mut Context) -> Option<FallAction> {
        // A sibling type context must never leak its entries here
        self.observations.borrow_mut().push(ctx.get::<Probe>().is_some());
        ctx.set(Probe);
        None
    }
}

struct DepthProcedurePass {
    depths: Rc<RefCell<Vec<usize>>>,
    saw_probe: Rc<RefCell<Vec<bool>>>,
}

impl ProcedurePass for DepthProcedurePass {
    fn name(&self) -> &'static str {
        "depth-probe"
    }

    fn run(&mut self, _procedure: &Procedure, ctx: &mut Context) -> Option<FallAction> {
        assert!(ctx.root().is_root());
        self.depths.borrow_mut().push(ctx.depth());
        // Entries set in the enclosing type context are visible here
        self.saw_probe
            .borrow_mut()
            .push(ctx.lookup::<Probe>().is_some());
        None
    }
}

fn simple_proc(name: &str) -> Procedure {
    let mut b = ProcedureBuilder::new(name);
    b.ret(None);
    b.build()
}

fn two_module_scene() -> Scene {
    let mut scene = Scene::new();
    for module_name in ["alpha", "beta"] {
        let mut module = Module::new(module_name);
        let mut ty = TypeDecl::new("Main");
        ty.add_procedure(simple_proc("p1"));
        ty.add_procedure(simple_proc("p2"));
        module.add_type(ty);
        scene.add_module(module);
    }
    scene
}

#[test]
fn modules_visited_in_program_order() {
    let trace: Trace = Rc::new(RefCell::new(Vec::new()));
    let mut walker = SceneWalker::new()
        .add_module_pass(TraceModulePass {
            label: "m1",
            trace: trace.clone(),
        })
        .add_module_pass(TraceModulePass {
            label: "m2",
            trace: trace.clone(),
        });
    walker.walk(&two_module_scene());

    assert_eq!(
        *trace.borrow(),
        vec!["m1:alpha", "m2:alpha", "m1:beta", "m2:beta"]
    );
}

#[test]
fn module_selector_restricts_visits() {
    let trace: Trace = Rc::new(RefCell::new(Vec::new()));
    let mut walker = SceneWalker::new()
        .add_module_pass(TraceModulePass {
            label: "m",
            trace: trace.clone(),
        })
        .with_module_selector(|module| module.name() == "beta");
    walker.walk(&two_module_scene());

    assert_eq!(*trace.borrow(), vec!["m:beta"]);
}

#[test]
fn break_stops_only_the_current_nodes_pass_list() {
    let trace: Trace = Rc::new(RefCell::new(Vec::new()));
    let mut walker = SceneWalker::new()
        .add_procedure_pass(TraceProcedurePass {
            label: "first",
            trace: trace.clone(),
            break_on: Some("p1"),
        })
        .add_procedure_pass(TraceProcedurePass {
            label: "second",
            trace: trace.clone(),
            break_on: None,
        })
        .with_module_selector(|module| module.name() == "alpha");
    walker.walk(&two_module_scene());

    // `second` is skipped for p1, but p2 runs its full pass list
    assert_eq!(
        *trace.borrow(),
        vec!["first:p1", "first:p2", "second:p2"]
    );
}

#[test]
fn sibling_type_contexts_are_isolated() {
    let mut scene = Scene::new();
    let mut module = Module::new("solo");
    module.add_type(TypeDecl::new("A"));
    module.add_type(TypeDecl::new("B"));
    scene.add_module(module);

    let observations = Rc::new(RefCell::new(Vec::new()));
    let mut walker = SceneWalker::new().add_type_pass(ProbeTypePass {
        observations: observations.clone(),
    });
    walker.walk(&scene);

    // Both siblings start from a fresh context
    assert_eq!(*observations.borrow(), vec![false, false]);
}

#[test]
fn procedure_contexts_see_ancestors_and_reach_root() {
    let mut scene = Scene::new();
    let mut module = Module::new("solo");
    let mut ty = TypeDecl::new("Main");
    ty.add_procedure(simple_proc("p1"));
    module.add_type(ty);
    scene.add_module(module);

    let depths = Rc::new(RefCell::new(Vec::new()));
    let saw_probe = Rc::new(RefCell::new(Vec::new()));
    let mut walker = SceneWalker::new()
        .add_type_pass(ProbeTypePass {
            observations: Rc::new(RefCell::new(Vec::new())),
        })
        .add_procedure_pass(DepthProcedurePass {
            depths: depths.clone(),
            saw_probe: saw_probe.clone(),
        });
    walker.walk(&scene);

    // program -> module -> type -> procedure
    assert_eq!(*depths.borrow(), vec![3]);
    assert_eq!(*saw_probe.borrow(), vec![true]);
}

#[test]
fn two_runs_produce_identical_traces() {
    let scene = two_module_scene();

    let run = || {
        let trace: Trace = Rc::new(RefCell::new(Vec::new()));
        let mut walker = SceneWalker::new()
            .add_module_pass(TraceModulePass {
                label: "m",
                trace: trace.clone(),
            })
            .add_procedure_pass(TraceProcedurePass {
                label: "p",
                trace: trace.clone(),
                break_on: None,
            });
        walker.walk(&scene);
        let result = trace.borrow().clone();
        result
    };

    assert_eq!(run(), run());
}
