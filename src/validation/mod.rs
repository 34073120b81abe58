//! Validator/summary subsystem
//!
//! The concrete consumer of the traversal core: validators emit
//! graded messages through a [`Reporter`], and the messages aggregate
//! bottom-up into a four-level summary tree (scene → module → type →
//! procedure). Summaries are created lazily: the first message
//! submitted for a procedure finds-or-creates its procedure summary,
//! which finds-or-creates the owning type summary, and so on. A node
//! that never produces a message never gets a summary.
//!
//! The [`SceneSummary`] lives in a [`SummaryCell`] installed in the
//! program-level context for the duration of a run; handlers deep in
//! the traversal reach it through the context chain.

pub mod registry;
pub mod validators;

#[cfg(test)]
mod validation_test;

pub use registry::{build_validator_table, validator_table};
pub use validators::{ModuleValidationPass, ProcedureValidationPass, TypeValidationPass};

use crate::context::Context;
use crate::scene::{ModuleId, ProcedureId, Scene, TypeDeclId};
use crate::walker::{ModuleScope, ProcedureScope, SceneWalker, TypeScope};
use indexmap::IndexMap;
use std::cell::{RefCell, RefMut};

/// Message grade. Ordered so summaries can be filtered by a minimum
/// severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }

    fn log_level(self) -> log::Level {
        match self {
            Severity::Info => log::Level::Info,
            Severity::Warn => log::Level::Warn,
            Severity::Error => log::Level::Error,
        }
    }
}

/// One graded diagnostic message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub severity: Severity,
    pub text: String,
}

/// Messages recorded for one procedure
#[derive(Debug, Clone, Default)]
pub struct ProcedureSummary {
    pub name: String,
    pub messages: Vec<Message>,
}

/// Messages recorded for one type declaration and its procedures
#[derive(Debug, Clone, Default)]
pub struct TypeSummary {
    pub name: String,
    pub messages: Vec<Message>,
    pub procedures: IndexMap<ProcedureId, ProcedureSummary>,
}

impl TypeSummary {
    fn procedure_mut(&mut self, id: ProcedureId, name: &str) -> &mut ProcedureSummary {
        self.procedures.entry(id).or_insert_with(|| ProcedureSummary {
            name: name.to_string(),
            messages: Vec::new(),
        })
    }
}

/// Messages recorded for one module and its type declarations
#[derive(Debug, Clone, Default)]
pub struct ModuleSummary {
    pub name: String,
    pub messages: Vec<Message>,
    pub types: IndexMap<TypeDeclId, TypeSummary>,
}

impl ModuleSummary {
    fn type_mut(&mut self, id: TypeDeclId, name: &str) -> &mut TypeSummary {
        self.types.entry(id).or_insert_with(|| TypeSummary {
            name: name.to_string(),
            messages: Vec::new(),
            procedures: IndexMap::new(),
        })
    }

    fn message_count(&self) -> usize {
        self.messages.len()
            + self
                .types
                .values()
                .map(|ty| {
                    ty.messages.len()
                        + ty.procedures.values().map(|p| p.messages.len()).sum::<usize>()
                })
                .sum::<usize>()
    }
}

/// Root of the summary tree for one validation run
#[derive(Debug, Clone, Default)]
pub struct SceneSummary {
    pub messages: Vec<Message>,
    pub modules: IndexMap<ModuleId, ModuleSummary>,
}

impl SceneSummary {
    fn module_mut(&mut self, id: ModuleId, name: &str) -> &mut ModuleSummary {
        self.modules.entry(id).or_insert_with(|| ModuleSummary {
            name: name.to_string(),
            messages: Vec::new(),
            types: IndexMap::new(),
        })
    }

    /// True iff no module recorded any message. Summaries only exist
    /// once a message arrives, so an empty module map means a clean
    /// run.
    pub fn is_ok(&self) -> bool {
        self.messages.is_empty() && self.modules.is_empty()
    }

    /// Total number of messages across all levels
    pub fn message_count(&self) -> usize {
        self.messages.len()
            + self
                .modules
                .values()
                .map(ModuleSummary::message_count)
                .sum::<usize>()
    }

    fn lines(&self, min: Severity) -> Vec<(Severity, String)> {
        let mut out = Vec::new();
        let mut push = |severity: Severity, path: &str, text: &str| {
            if severity >= min {
                out.push((severity, format!("{path}: [{}] {text}", severity.label())));
            }
        };

        for message in &self.messages {
            push(message.severity, "scene", &message.text);
        }
        for module in self.modules.values() {
            for message in &module.messages {
                push(message.severity, &module.name, &message.text);
            }
            for ty in module.types.values() {
                let type_path = format!("{}.{}", module.name, ty.name);
                for message in &ty.messages {
                    push(message.severity, &type_path, &message.text);
                }
                for procedure in ty.procedures.values() {
                    let proc_path = format!("{type_path}.{}", procedure.name);
                    for message in &procedure.messages {
                        push(message.severity, &proc_path, &message.text);
                    }
                }
            }
        }
        out
    }

    /// Render the tree as one line per message, filtered by minimum
    /// severity. Deterministic for a deterministic run.
    pub fn render(&self, min: Severity) -> String {
        self.lines(min)
            .into_iter()
            .map(|(_, line)| line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Dump the tree to the `log` sink, one record per message at the
    /// message's own level, filtered by minimum severity
    pub fn dump(&self, min: Severity) {
        for (severity, line) in self.lines(min) {
            log::log!(severity.log_level(), "{line}");
        }
    }
}

/// Context entry holding the summary tree for the run.
///
/// Interior mutability is what lets handlers, which only see their
/// ancestors' contexts immutably, append messages while the traversal
/// is in flight.
#[derive(Debug, Default)]
pub struct SummaryCell(RefCell<SceneSummary>);

impl SummaryCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the summary back out at the end of a run
    pub fn into_inner(self) -> SceneSummary {
        self.0.into_inner()
    }

    fn borrow_mut(&self) -> RefMut<'_, SceneSummary> {
        self.0.borrow_mut()
    }
}

/// Where a reporter's messages land in the summary tree
#[derive(Debug, Clone)]
enum ReportScope {
    Scene,
    Module(ModuleScope),
    Type(TypeScope),
    Procedure(ProcedureScope),
}

/// Adapter from "emit a graded message" to "find-or-create the right
/// summary and append": the reporter resolves the summary cell from
/// the root context and the deepest scope marker from the receiving
/// context, then routes each message to that level.
pub struct Reporter<'a> {
    cell: &'a SummaryCell,
    scope: ReportScope,
}

impl<'a> Reporter<'a> {
    /// Build a reporter for the given context. Returns `None` when no
    /// [`SummaryCell`] is installed anywhere up the chain (i.e. the
    /// walk was not started through the validation entry point).
    pub fn from_context(ctx: &'a Context) -> Option<Reporter<'a>> {
        let cell = ctx.lookup::<SummaryCell>()?;
        let scope = if let Some(scope) = ctx.lookup::<ProcedureScope>() {
            ReportScope::Procedure(scope.clone())
        } else if let Some(scope) = ctx.lookup::<TypeScope>() {
            ReportScope::Type(scope.clone())
        } else if let Some(scope) = ctx.lookup::<ModuleScope>() {
            ReportScope::Module(scope.clone())
        } else {
            ReportScope::Scene
        };
        Some(Reporter { cell, scope })
    }

    pub fn info(&self, text: impl Into<String>) {
        self.submit(Severity::Info, text.into());
    }

    pub fn warn(&self, text: impl Into<String>) {
        self.submit(Severity::Warn, text.into());
    }

    pub fn error(&self, text: impl Into<String>) {
        self.submit(Severity::Error, text.into());
    }

    fn submit(&self, severity: Severity, text: String) {
        let message = Message { severity, text };
        let mut summary = self.cell.borrow_mut();
        match &self.scope {
            ReportScope::Scene => summary.messages.push(message),
            ReportScope::Module(scope) => summary
                .module_mut(scope.module, &scope.module_name)
                .messages
                .push(message),
            ReportScope::Type(scope) => summary
                .module_mut(scope.module, &scope.module_name)
                .type_mut(scope.type_decl, &scope.type_name)
                .messages
                .push(message),
            ReportScope::Procedure(scope) => summary
                .module_mut(scope.module, &scope.module_name)
                .type_mut(scope.type_decl, &scope.type_name)
                .procedure_mut(scope.procedure, &scope.procedure_name)
                .messages
                .push(message),
        }
    }
}

/// Run every registered validator over the scene and collect the
/// graded messages into a summary tree.
///
/// The summary cell is installed in the program context before the
/// walk and removed (returning ownership of the tree) after it.
pub fn validate_scene(scene: &Scene) -> SceneSummary {
    let mut root = Context::new();
    root.set(SummaryCell::new());

    let mut walker = SceneWalker::new()
        .with_table(validator_table())
        .add_module_pass(ModuleValidationPass)
        .add_type_pass(TypeValidationPass)
        .add_procedure_pass(ProcedureValidationPass);
    walker.walk_with(scene, &mut root);

    root.remove::<SummaryCell>()
        .map(SummaryCell::into_inner)
        .unwrap_or_default()
}
