//! Validator registration
//!
//! Every validator handler is listed here, explicitly, in match
//! order. Central construction keeps registration auditable: the
//! order below *is* the kind precedence the dispatcher applies, and a
//! validator that is not listed does not run.

use super::validators;
use crate::dispatch::DispatchTable;
use crate::scene::{InstKind, OpKind};
use std::sync::{Arc, OnceLock};

/// Build the validator dispatch table from scratch.
///
/// Kinds are registered most-specific first; none of the validators
/// uses a catch-all kind today, so there is no `Any` entry.
pub fn build_validator_table() -> DispatchTable {
    let mut builder = DispatchTable::builder();
    builder
        .instruction(InstKind::Assign, Arc::new(validators::check_assignment))
        .instruction(InstKind::Call, Arc::new(validators::check_call));
    builder
        .operand(OpKind::Merge, Arc::new(validators::check_merge))
        .operand(OpKind::Binary, Arc::new(validators::check_division_by_zero));
    builder.build()
}

/// Process-wide validator table, built on first request and shared
/// (read-only) by every subsequent validation run
pub fn validator_table() -> Arc<DispatchTable> {
    static TABLE: OnceLock<Arc<DispatchTable>> = OnceLock::new();
    TABLE
        .get_or_init(|| Arc::new(build_validator_table()))
        .clone()
}
