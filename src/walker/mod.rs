//! Pass contracts and the scene traversal driver
//!
//! The [`SceneWalker`] owns the traversal: program → module → type
//! declaration → procedure, depth-first and in container order. Per
//! visited node it creates a fresh child [`Context`], stamps it with a
//! scope marker, and runs the configured passes for that level in
//! order. A pass returning [`FallAction::Break`] stops only the
//! remaining passes for the current node; sibling nodes are always
//! visited.
//!
//! At the procedure level, if a dispatch table is configured, a fresh
//! [`Dispatcher`] is bound to the procedure context and fed every
//! instruction of the body in order.

#[cfg(test)]
mod walker_test;

use crate::context::Context;
use crate::dispatch::{DispatchTable, Dispatcher, Fallthrough};
use crate::scene::{Module, ModuleId, Procedure, ProcedureId, Scene, TypeDecl, TypeDeclId};
use log::{debug, trace};
use std::sync::Arc;

/// Cooperative short-circuit returned by a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallAction {
    /// Run the remaining passes for this node (same as returning nothing)
    Continue,
    /// Skip the remaining passes for this node only
    Break,
}

/// A pass run once per visited module
pub trait ModulePass {
    fn name(&self) -> &'static str;

    fn run(&mut self, module: &Module, ctx: &mut Context) -> Option<FallAction>;
}

/// A pass run once per visited type declaration
pub trait TypePass {
    fn name(&self) -> &'static str;

    fn run(&mut self, type_decl: &TypeDecl, ctx: &mut Context) -> Option<FallAction>;
}

/// A pass run once per visited procedure
pub trait ProcedurePass {
    fn name(&self) -> &'static str;

    fn run(&mut self, procedure: &Procedure, ctx: &mut Context) -> Option<FallAction>;
}

/// Context entry identifying the module a context (or any of its
/// descendants) belongs to. Installed by the walker.
#[derive(Debug, Clone)]
pub struct ModuleScope {
    pub module: ModuleId,
    pub module_name: String,
}

/// Context entry identifying the enclosing type declaration
#[derive(Debug, Clone)]
pub struct TypeScope {
    pub module: ModuleId,
    pub module_name: String,
    pub type_decl: TypeDeclId,
    pub type_name: String,
}

/// Context entry identifying the enclosing procedure
#[derive(Debug, Clone)]
pub struct ProcedureScope {
    pub module: ModuleId,
    pub module_name: String,
    pub type_decl: TypeDeclId,
    pub type_name: String,
    pub procedure: ProcedureId,
    pub procedure_name: String,
}

pub type ModuleSelector = Box<dyn Fn(&Module) -> bool>;
pub type TypeSelector = Box<dyn Fn(&TypeDecl) -> bool>;
pub type ProcedureSelector = Box<dyn Fn(&Procedure) -> bool>;

/// Composes per-level passes and a dispatch table into one traversal
/// of the whole scene
#[derive(Default)]
pub struct SceneWalker {
    module_passes: Vec<Box<dyn ModulePass>>,
    type_passes: Vec<Box<dyn TypePass>>,
    procedure_passes: Vec<Box<dyn ProcedurePass>>,
    module_selector: Option<ModuleSelector>,
    type_selector: Option<TypeSelector>,
    procedure_selector: Option<ProcedureSelector>,
    table: Option<Arc<DispatchTable>>,
    fallthrough: Fallthrough,
}

impl SceneWalker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_module_pass(mut self, pass: impl ModulePass + 'static) -> Self {
        self.module_passes.push(Box::new(pass));
        self
    }

    pub fn add_type_pass(mut self, pass: impl TypePass + 'static) -> Self {
        self.type_passes.push(Box::new(pass));
        self
    }

    pub fn add_procedure_pass(mut self, pass: impl ProcedurePass + 'static) -> Self {
        self.procedure_passes.push(Box::new(pass));
        self
    }

    /// Restrict which modules are visited (default: all, in program order)
    pub fn with_module_selector(mut self, selector: impl Fn(&Module) -> bool + 'static) -> Self {
        self.module_selector = Some(Box::new(selector));
        self
    }

    /// Restrict which type declarations are visited
    pub fn with_type_selector(mut self, selector: impl Fn(&TypeDecl) -> bool + 'static) -> Self {
        self.type_selector = Some(Box::new(selector));
        self
    }

    /// Restrict which procedures are visited
    pub fn with_procedure_selector(
        mut self,
        selector: impl Fn(&Procedure) -> bool + 'static,
    ) -> Self {
        self.procedure_selector = Some(Box::new(selector));
        self
    }

    /// Dispatch table for the per-procedure dispatchers. Without one,
    /// instruction and operand dispatch is skipped entirely.
    pub fn with_table(mut self, table: Arc<DispatchTable>) -> Self {
        self.table = Some(table);
        self
    }

    /// Fallthrough mode handed to every dispatcher (default `Break`)
    pub fn with_fallthrough(mut self, mode: Fallthrough) -> Self {
        self.fallthrough = mode;
        self
    }

    /// Walk the scene with a fresh program-level context
    pub fn walk(&mut self, scene: &Scene) {
        let mut root = Context::new();
        self.walk_with(scene, &mut root);
    }

    /// Walk the scene with a caller-seeded program-level context. The
    /// root context survives the walk, so entries installed before the
    /// call (e.g. a summary accumulator) can be taken back out after.
    pub fn walk_with(&mut self, scene: &Scene, root: &mut Context) {
        for module in scene.modules() {
            if let Some(selector) = &self.module_selector {
                if !selector(module) {
                    continue;
                }
            }
            debug!("walking module `{}`", module.name());

            let mut module_ctx = root.child();
            module_ctx.set(ModuleScope {
                module: module.id(),
                module_name: module.name().to_string(),
            });
            for pass in &mut self.module_passes {
                trace!("module pass `{}` on `{}`", pass.name(), module.name());
                if pass.run(module, &mut module_ctx) == Some(FallAction::Break) {
                    break;
                }
            }

            for type_decl in module.types() {
                if let Some(selector) = &self.type_selector {
                    if !selector(type_decl) {
                        continue;
                    }
                }
                trace!("walking type `{}`", type_decl.name());

                let mut type_ctx = module_ctx.child();
                type_ctx.set(TypeScope {
                    module: module.id(),
                    module_name: module.name().to_string(),
                    type_decl: type_decl.id(),
                    type_name: type_decl.name().to_string(),
                });
                for pass in &mut self.type_passes {
                    trace!("type pass `{}` on `{}`", pass.name(), type_decl.name());
                    if pass.run(type_decl, &mut type_ctx) == Some(FallAction::Break) {
                        break;
                    }
                }

                for procedure in type_decl.procedures() {
                    if let Some(selector) = &self.procedure_selector {
                        if !selector(procedure) {
                            continue;
                        }
                    }
                    trace!("walking procedure `{}`", procedure.name());

                    let mut proc_ctx = type_ctx.child();
                    proc_ctx.set(ProcedureScope {
                        module: module.id(),
                        module_name: module.name().to_string(),
                        type_decl: type_decl.id(),
                        type_name: type_decl.name().to_string(),
                        procedure: procedure.id(),
                        procedure_name: procedure.name().to_string(),
                    });
                    for pass in &mut self.procedure_passes {
                        trace!(
                            "procedure pass `{}` on `{}`",
                            pass.name(),
                            procedure.name()
                        );
                        if pass.run(procedure, &mut proc_ctx) == Some(FallAction::Break) {
                            break;
                        }
                    }

                    if let (Some(table), Some(body)) = (&self.table, procedure.body()) {
                        let mut dispatcher =
                            Dispatcher::with_mode(table.as_ref(), &mut proc_ctx, self.fallthrough);
                        for instruction in body {
                            dispatcher.dispatch_instruction(procedure, instruction);
                        }
                    }
                }
            }
        }
    }
}
