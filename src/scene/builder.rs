//! Procedure construction helpers
//!
//! Hosts (and tests) assemble procedure bodies through
//! [`ProcedureBuilder`], which owns the operand arena while it grows.
//! The builder hands out [`OperandId`]s as operands are allocated, so
//! shared sub-operands fall out naturally: reuse the same ID in
//! several places. Cycles are built in two steps: allocate a merge
//! with placeholder inputs, then patch it with
//! [`ProcedureBuilder::set_merge_inputs`].

use super::instructions::{BinaryOp, Instruction, Literal, Operand};
use super::{OperandId, Procedure};

/// Builds one procedure: its operand arena plus its instruction body
#[derive(Debug, Default)]
pub struct ProcedureBuilder {
    name: String,
    operands: Vec<Operand>,
    body: Vec<Instruction>,
}

impl ProcedureBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operands: Vec::new(),
            body: Vec::new(),
        }
    }

    fn push(&mut self, operand: Operand) -> OperandId {
        let id = OperandId::from_raw(self.operands.len() as u32);
        self.operands.push(operand);
        id
    }

    /// Allocate a local variable reference
    pub fn local(&mut self, name: impl Into<String>) -> OperandId {
        self.push(Operand::Local { name: name.into() })
    }

    /// Allocate a constant operand
    pub fn constant(&mut self, literal: Literal) -> OperandId {
        self.push(Operand::Const(literal))
    }

    /// Allocate an integer constant (shorthand for the common case)
    pub fn int(&mut self, value: i64) -> OperandId {
        self.constant(Literal::Int(value))
    }

    /// Allocate a field access on `object`
    pub fn field_access(&mut self, object: OperandId, field: impl Into<String>) -> OperandId {
        self.push(Operand::FieldAccess {
            object,
            field: field.into(),
        })
    }

    /// Allocate a binary expression
    pub fn binary(&mut self, op: BinaryOp, lhs: OperandId, rhs: OperandId) -> OperandId {
        self.push(Operand::Binary { op, lhs, rhs })
    }

    /// Allocate a merge (phi) node
    pub fn merge(&mut self, inputs: Vec<OperandId>) -> OperandId {
        self.push(Operand::Merge { inputs })
    }

    /// Replace the inputs of an existing merge node. This is how
    /// cyclic operand graphs are built: allocate the merge first, then
    /// point an input back at it (or at anything allocated later).
    ///
    /// # Panics
    ///
    /// Panics if `id` does not name a merge node in this builder.
    pub fn set_merge_inputs(&mut self, id: OperandId, inputs: Vec<OperandId>) {
        match &mut self.operands[id.as_raw() as usize] {
            Operand::Merge { inputs: slot } => *slot = inputs,
            other => panic!("operand {id} is not a merge node: {other:?}"),
        }
    }

    /// Append an assignment instruction
    pub fn assign(&mut self, target: OperandId, value: OperandId) -> &mut Self {
        self.body.push(Instruction::Assign { target, value });
        self
    }

    /// Append a call instruction
    pub fn call(
        &mut self,
        callee: impl Into<String>,
        receiver: Option<OperandId>,
        args: Vec<OperandId>,
    ) -> &mut Self {
        self.body.push(Instruction::Call {
            callee: callee.into(),
            receiver,
            args,
        });
        self
    }

    /// Append a return instruction
    pub fn ret(&mut self, value: Option<OperandId>) -> &mut Self {
        self.body.push(Instruction::Return { value });
        self
    }

    /// Append an expression-statement instruction
    pub fn eval(&mut self, value: OperandId) -> &mut Self {
        self.body.push(Instruction::Eval { value });
        self
    }

    /// Finish the procedure. Its ID is assigned when it is added to a
    /// type declaration.
    pub fn build(self) -> Procedure {
        Procedure::from_parts(self.name, self.operands, self.body)
    }
}
