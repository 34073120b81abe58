//! Concrete validators
//!
//! One pass per traversal level plus the instruction/operand handlers
//! registered in [`super::registry`]. Every check degrades to "no
//! message" on clean input; validators never fail the traversal.

use super::Reporter;
use crate::context::Context;
use crate::scene::{
    BinaryOp, Instruction, Literal, Module, Operand, Procedure, TypeDecl,
};
use crate::walker::{FallAction, ModulePass, ProcedurePass, TypePass};
use fxhash::FxHashSet;

/// Checks module import/export records
pub struct ModuleValidationPass;

impl ModulePass for ModuleValidationPass {
    fn name(&self) -> &'static str {
        "validate-module"
    }

    fn run(&mut self, module: &Module, ctx: &mut Context) -> Option<FallAction> {
        let reporter = Reporter::from_context(ctx)?;

        let mut seen_paths: FxHashSet<String> = FxHashSet::default();
        for import in &module.imports {
            if import.module_path.is_empty() {
                reporter.error("import record with empty module path");
                continue;
            }
            let path = import.module_path.join(".");
            if !seen_paths.insert(path.clone()) {
                reporter.warn(format!("duplicate import of `{path}`"));
            }
        }
        None
    }
}

/// Checks a type declaration's procedure roster
pub struct TypeValidationPass;

impl TypePass for TypeValidationPass {
    fn name(&self) -> &'static str {
        "validate-type"
    }

    fn run(&mut self, type_decl: &TypeDecl, ctx: &mut Context) -> Option<FallAction> {
        let reporter = Reporter::from_context(ctx)?;

        let mut seen_names: FxHashSet<&str> = FxHashSet::default();
        for procedure in type_decl.procedures() {
            if !seen_names.insert(procedure.name()) {
                reporter.warn(format!(
                    "duplicate procedure name `{}`",
                    procedure.name()
                ));
            }
        }
        None
    }
}

/// Checks procedure-level shape before instruction dispatch
pub struct ProcedureValidationPass;

impl ProcedurePass for ProcedureValidationPass {
    fn name(&self) -> &'static str {
        "validate-procedure"
    }

    fn run(&mut self, procedure: &Procedure, ctx: &mut Context) -> Option<FallAction> {
        let reporter = Reporter::from_context(ctx)?;

        if let Some(body) = procedure.body() {
            if body.is_empty() {
                reporter.warn("procedure has an empty body");
            }
        }
        None
    }
}

/// Assignment targets must be storage locations
pub(super) fn check_assignment(procedure: &Procedure, instruction: &Instruction, ctx: &mut Context) {
    let Instruction::Assign { target, .. } = instruction else {
        return;
    };
    let Some(reporter) = Reporter::from_context(ctx) else {
        return;
    };
    match procedure.operand(*target) {
        Operand::Local { .. } | Operand::FieldAccess { .. } => {}
        _ => reporter.error("assignment target must be a local or field"),
    }
}

/// Calls need a callee name; an empty one means resolution never ran
pub(super) fn check_call(_procedure: &Procedure, instruction: &Instruction, ctx: &mut Context) {
    let Instruction::Call { callee, .. } = instruction else {
        return;
    };
    if callee.is_empty() {
        if let Some(reporter) = Reporter::from_context(ctx) {
            reporter.error("call with empty callee name");
        }
    }
}

/// A merge with no inputs produces no value on any path
pub(super) fn check_merge(_procedure: &Procedure, operand: &Operand, ctx: &mut Context) {
    let Operand::Merge { inputs } = operand else {
        return;
    };
    if inputs.is_empty() {
        if let Some(reporter) = Reporter::from_context(ctx) {
            reporter.warn("merge operand has no inputs");
        }
    }
}

/// Flags divisions whose right operand is the integer constant zero
pub(super) fn check_division_by_zero(
    procedure: &Procedure,
    operand: &Operand,
    ctx: &mut Context,
) {
    let Operand::Binary {
        op: BinaryOp::Div,
        rhs,
        ..
    } = operand
    else {
        return;
    };
    if let Operand::Const(Literal::Int(0)) = procedure.operand(*rhs) {
        if let Some(reporter) = Reporter::from_context(ctx) {
            reporter.warn("division by constant zero");
        }
    }
}
