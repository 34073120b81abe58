//! Instructions and operands
//!
//! Both node families are closed sum types with one variant per kind.
//! Dispatch-table matching works on the [`InstKind`] / [`OpKind`]
//! tokens: a node matches its own kind, and the `Any` catch-all kind
//! matches every node. Specificity is therefore encoded purely by the
//! order kinds are registered in a table, with `Any` listed last.
//!
//! Operands reference each other through [`OperandId`] arena indices,
//! so the operand graph may contain shared subgraphs and cycles (a
//! merge node unioning values from several predecessors can reference
//! an operand already visited on another path). The dispatcher guards
//! recursion with a visited set over those indices.

use super::OperandId;
use smallvec::{smallvec, SmallVec};

/// One unit of executable effect inside a procedure's body
#[derive(Debug, Clone)]
pub enum Instruction {
    /// Store `value` into `target`
    Assign { target: OperandId, value: OperandId },
    /// Invoke `callee`, optionally on a receiver, with argument operands
    Call {
        callee: String,
        receiver: Option<OperandId>,
        args: Vec<OperandId>,
    },
    /// Leave the procedure, optionally producing a value
    Return { value: Option<OperandId> },
    /// Evaluate an operand for its side effects
    Eval { value: OperandId },
}

/// Dispatch-table key for instruction matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstKind {
    Assign,
    Call,
    Return,
    Eval,
    /// Catch-all: matches every instruction. List it last.
    Any,
}

impl Instruction {
    pub fn kind(&self) -> InstKind {
        match self {
            Instruction::Assign { .. } => InstKind::Assign,
            Instruction::Call { .. } => InstKind::Call,
            Instruction::Return { .. } => InstKind::Return,
            Instruction::Eval { .. } => InstKind::Eval,
        }
    }

    /// Kind-membership test used by the dispatcher
    pub fn is_kind(&self, kind: InstKind) -> bool {
        kind == InstKind::Any || self.kind() == kind
    }

    /// Immediate operand IDs, in evaluation order (not reachable
    /// sub-operands)
    pub fn operands(&self) -> SmallVec<[OperandId; 4]> {
        match self {
            Instruction::Assign { target, value } => smallvec![*target, *value],
            Instruction::Call { receiver, args, .. } => {
                let mut out = SmallVec::new();
                if let Some(receiver) = receiver {
                    out.push(*receiver);
                }
                out.extend(args.iter().copied());
                out
            }
            Instruction::Return { value } => value.iter().copied().collect(),
            Instruction::Eval { value } => smallvec![*value],
        }
    }
}

/// A constant value appearing as an operand
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Null,
}

/// Binary operator applied by a [`Operand::Binary`] node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Lt,
}

/// Any value-producing node an instruction or another operand reads
#[derive(Debug, Clone)]
pub enum Operand {
    /// A local variable reference
    Local { name: String },
    /// A field access on an object operand
    FieldAccess { object: OperandId, field: String },
    /// A constant
    Const(Literal),
    /// A binary expression over two operands
    Binary {
        op: BinaryOp,
        lhs: OperandId,
        rhs: OperandId,
    },
    /// A merge (phi) node unioning values from several predecessors.
    /// Inputs may reference any arena slot, including this one.
    Merge { inputs: Vec<OperandId> },
}

/// Dispatch-table key for operand matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Local,
    Field,
    Const,
    Binary,
    Merge,
    /// Catch-all: matches every operand. List it last.
    Any,
}

impl Operand {
    pub fn kind(&self) -> OpKind {
        match self {
            Operand::Local { .. } => OpKind::Local,
            Operand::FieldAccess { .. } => OpKind::Field,
            Operand::Const(_) => OpKind::Const,
            Operand::Binary { .. } => OpKind::Binary,
            Operand::Merge { .. } => OpKind::Merge,
        }
    }

    /// Kind-membership test used by the dispatcher
    pub fn is_kind(&self, kind: OpKind) -> bool {
        kind == OpKind::Any || self.kind() == kind
    }

    /// Immediate sub-operand IDs; empty for leaves
    pub fn operands(&self) -> SmallVec<[OperandId; 4]> {
        match self {
            Operand::Local { .. } | Operand::Const(_) => SmallVec::new(),
            Operand::FieldAccess { object, .. } => smallvec![*object],
            Operand::Binary { lhs, rhs, .. } => smallvec![*lhs, *rhs],
            Operand::Merge { inputs } => inputs.iter().copied().collect(),
        }
    }
}
