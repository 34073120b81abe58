//! Instruction/operand dispatcher
//!
//! One [`Dispatcher`] is instantiated per procedure. It borrows the
//! procedure-level context and the shared dispatch table, and owns the
//! visited-operand set that bounds recursion over possibly-cyclic
//! operand graphs. The visited set is per-dispatcher; sharing it
//! across procedures would suppress dispatch of operands that merely
//! happen to reuse an arena index.

use super::{DispatchTable, Fallthrough};
use crate::context::Context;
use crate::scene::{Instruction, OperandId, Procedure};
use fxhash::FxHashSet;
use log::trace;

/// Matches one procedure's instructions and operands against a
/// dispatch table, invoking every handler registered for the first
/// matching kind (or every matching kind under
/// [`Fallthrough::Continue`])
pub struct Dispatcher<'a, 'p> {
    table: &'a DispatchTable,
    context: &'a mut Context<'p>,
    mode: Fallthrough,
    visited: FxHashSet<OperandId>,
}

impl<'a, 'p> Dispatcher<'a, 'p> {
    /// Create a dispatcher with the default [`Fallthrough::Break`] mode
    pub fn new(table: &'a DispatchTable, context: &'a mut Context<'p>) -> Self {
        Self::with_mode(table, context, Fallthrough::Break)
    }

    pub fn with_mode(
        table: &'a DispatchTable,
        context: &'a mut Context<'p>,
        mode: Fallthrough,
    ) -> Self {
        Self {
            table,
            context,
            mode,
            visited: FxHashSet::default(),
        }
    }

    pub fn mode(&self) -> Fallthrough {
        self.mode
    }

    /// Dispatch one instruction: kind-match it, then recurse into its
    /// immediate operands.
    ///
    /// An instruction matching no registered kind is not an error; its
    /// operands are still visited.
    pub fn dispatch_instruction(&mut self, procedure: &Procedure, instruction: &Instruction) {
        let table = self.table;
        for (kind, handlers) in table.instruction_entries() {
            if instruction.is_kind(kind) {
                trace!(
                    "dispatching {:?} instruction in `{}` as {kind:?}",
                    instruction.kind(),
                    procedure.name()
                );
                for handler in handlers {
                    handler(procedure, instruction, self.context);
                }
                if self.mode == Fallthrough::Break {
                    break;
                }
            }
        }

        for operand in instruction.operands() {
            self.dispatch_operand(procedure, operand);
        }
    }

    /// Dispatch one operand and, recursively, every sub-operand not
    /// yet visited by this dispatcher.
    ///
    /// Identity (the arena index), not value equality, keys the
    /// visited set, so a value shared by many merge points is
    /// dispatched once per procedure rather than once per path.
    pub fn dispatch_operand(&mut self, procedure: &Procedure, id: OperandId) {
        // Cheap no-op fast path: many analyses only care about
        // instructions.
        if !self.table.has_operand_kinds() {
            return;
        }
        if !self.visited.insert(id) {
            return;
        }

        let operand = procedure.operand(id);
        let table = self.table;
        for (kind, handlers) in table.operand_entries() {
            if operand.is_kind(kind) {
                trace!(
                    "dispatching {:?} operand {id} in `{}` as {kind:?}",
                    operand.kind(),
                    procedure.name()
                );
                for handler in handlers {
                    handler(procedure, operand, self.context);
                }
                if self.mode == Fallthrough::Break {
                    break;
                }
            }
        }

        for sub in operand.operands() {
            self.dispatch_operand(procedure, sub);
        }
    }
}
