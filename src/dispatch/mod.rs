//! Type-indexed dispatch tables
//!
//! A [`DispatchTable`] is an ordered association from node kinds to
//! handler lists, one side for instructions and one for operands.
//! Registration order is semantically significant: the dispatcher
//! matches a node against the *first* registered kind it is an
//! instance of, so kinds must be registered most-specific first and a
//! catch-all kind (`InstKind::Any` / `OpKind::Any`) last.
//!
//! Tables are built once through [`TableBuilder`] and immutable
//! afterwards; a built table is shared (behind an `Arc`) across every
//! procedure's dispatcher in a run, so there is no in-place edit API.
//! Reconfiguring means building a new table.

pub mod dispatcher;


pub use dispatcher::Dispatcher;

use crate::context::Context;
use crate::scene::{InstKind, Instruction, OpKind, Operand, Procedure};
use indexmap::IndexMap;
use log::warn;
use std::sync::Arc;

/// Whether matching stops (`Break`) or keeps scanning later kinds
/// (`Continue`) after the first matching kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fallthrough {
    /// Keep scanning subsequent kinds after a match. Useful for
    /// cross-cutting handlers such as a catch-all logger.
    Continue,
    /// Stop scanning after the first matching kind.
    #[default]
    Break,
}

/// Handler invoked for a matched instruction.
///
/// `Arc` because one built table is shared read-only across every
/// procedure's dispatcher; `Send + Sync` so a host may fan procedures
/// out across threads, each with its own dispatcher.
pub type InstructionHandler =
    Arc<dyn Fn(&Procedure, &Instruction, &mut Context) + Send + Sync>;

/// Handler invoked for a matched operand
pub type OperandHandler = Arc<dyn Fn(&Procedure, &Operand, &mut Context) + Send + Sync>;

/// An ordered, immutable kind-to-handlers table
pub struct DispatchTable {
    instructions: IndexMap<InstKind, Vec<InstructionHandler>>,
    operands: IndexMap<OpKind, Vec<OperandHandler>>,
}

impl DispatchTable {
    pub fn builder() -> TableBuilder {
        TableBuilder::default()
    }

    /// Instruction kinds in registration order
    pub fn instruction_kinds(&self) -> impl Iterator<Item = InstKind> + '_ {
        self.instructions.keys().copied()
    }

    /// Operand kinds in registration order
    pub fn operand_kinds(&self) -> impl Iterator<Item = OpKind> + '_ {
        self.operands.keys().copied()
    }

    /// Fast-path probe: dispatchers skip operand recursion entirely
    /// when no operand kinds are registered
    pub fn has_operand_kinds(&self) -> bool {
        !self.operands.is_empty()
    }

    pub(crate) fn instruction_entries(
        &self,
    ) -> impl Iterator<Item = (InstKind, &[InstructionHandler])> {
        self.instructions
            .iter()
            .map(|(kind, handlers)| (*kind, handlers.as_slice()))
    }

    pub(crate) fn operand_entries(&self) -> impl Iterator<Item = (OpKind, &[OperandHandler])> {
        self.operands
            .iter()
            .map(|(kind, handlers)| (*kind, handlers.as_slice()))
    }
}

/// Accumulates `(kind, handler)` registrations and builds an
/// immutable [`DispatchTable`]
///
/// Registering the same kind twice merges the handler lists in
/// registration order (the kind keeps its first position) and logs a
/// diagnostic, since a double registration usually means two
/// analyses collided on one kind without knowing about each other.
#[derive(Default)]
pub struct TableBuilder {
    instructions: Vec<(InstKind, InstructionHandler)>,
    operands: Vec<(OpKind, OperandHandler)>,
}

impl TableBuilder {
    /// Register a handler for an instruction kind
    pub fn instruction(&mut self, kind: InstKind, handler: InstructionHandler) -> &mut Self {
        self.instructions.push((kind, handler));
        self
    }

    /// Register several handlers for one instruction kind
    pub fn instructions(
        &mut self,
        kind: InstKind,
        handlers: Vec<InstructionHandler>,
    ) -> &mut Self {
        for handler in handlers {
            self.instructions.push((kind, handler));
        }
        self
    }

    /// Register a handler for an operand kind
    pub fn operand(&mut self, kind: OpKind, handler: OperandHandler) -> &mut Self {
        self.operands.push((kind, handler));
        self
    }

    /// Register several handlers for one operand kind
    pub fn operands(&mut self, kind: OpKind, handlers: Vec<OperandHandler>) -> &mut Self {
        for handler in handlers {
            self.operands.push((kind, handler));
        }
        self
    }

    /// Build the immutable table
    pub fn build(self) -> DispatchTable {
        let mut instructions: IndexMap<InstKind, Vec<InstructionHandler>> = IndexMap::new();
        for (kind, handler) in self.instructions {
            let handlers = instructions.entry(kind).or_default();
            if !handlers.is_empty() {
                warn!("instruction kind {kind:?} registered more than once; merging handlers");
            }
            handlers.push(handler);
        }

        let mut operands: IndexMap<OpKind, Vec<OperandHandler>> = IndexMap::new();
        for (kind, handler) in self.operands {
            let handlers = operands.entry(kind).or_default();
            if !handlers.is_empty() {
                warn!("operand kind {kind:?} registered more than once; merging handlers");
            }
            handlers.push(handler);
        }

        DispatchTable {
            instructions,
            operands,
        }
    }
}
