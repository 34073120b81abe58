//! Program model for whole-scene analysis
//!
//! A [`Scene`] is the whole analyzed program as loaded into memory:
//! an ordered list of modules, each with import/export records and
//! type declarations, each type declaration owning procedures whose
//! bodies are ordered instruction lists over an operand arena.
//!
//! The analysis core only reads this model; it never mutates its
//! shape. Parsing, control-flow-graph construction, and type
//! inference happen before a scene reaches the traversal driver.

pub mod builder;
pub mod instructions;

pub use builder::ProcedureBuilder;
pub use instructions::{BinaryOp, InstKind, Instruction, Literal, OpKind, Operand};

use std::fmt;

/// Macro to define u32-backed ID types with consistent behavior
macro_rules! define_id_type {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) u32);

        impl $name {
            /// Create an ID from a raw u32 value
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            /// Get the raw u32 value of this ID
            pub const fn as_raw(self) -> u32 {
                self.0
            }

            /// Check if this ID is valid (not the sentinel value)
            pub const fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }

            /// Get an invalid/null sentinel value
            pub const fn invalid() -> Self {
                Self(u32::MAX)
            }

            /// Get the next ID in sequence
            pub const fn next(self) -> Self {
                Self(self.0.wrapping_add(1))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id_type! {
    /// Identifies a module within a scene
    ModuleId
}

define_id_type! {
    /// Identifies a type declaration within its module
    TypeDeclId
}

define_id_type! {
    /// Identifies a procedure within its type declaration
    ProcedureId
}

define_id_type! {
    /// Index of an operand in its procedure's operand arena
    OperandId
}

/// The whole analyzed program: an ordered sequence of modules
#[derive(Debug, Clone, Default)]
pub struct Scene {
    modules: Vec<Module>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module, assigning it the next sequential ID
    pub fn add_module(&mut self, mut module: Module) -> ModuleId {
        let id = ModuleId::from_raw(self.modules.len() as u32);
        module.id = id;
        self.modules.push(module);
        id
    }

    /// Modules in program order
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }
}

/// An import record resolved from a module header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    /// Dotted path of the imported module, e.g. `["game", "physics"]`
    pub module_path: Vec<String>,
    /// Optional local alias for the import
    pub alias: Option<String>,
}

/// One source unit of the program (import/export boundary)
#[derive(Debug, Clone)]
pub struct Module {
    id: ModuleId,
    name: String,
    /// Imports in declaration order
    pub imports: Vec<ImportRecord>,
    /// Names this module exports
    pub exports: Vec<String>,
    types: Vec<TypeDecl>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ModuleId::invalid(),
            name: name.into(),
            imports: Vec::new(),
            exports: Vec::new(),
            types: Vec::new(),
        }
    }

    pub fn id(&self) -> ModuleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_import(&mut self, module_path: Vec<String>, alias: Option<String>) {
        self.imports.push(ImportRecord { module_path, alias });
    }

    /// Add a type declaration, assigning it the next sequential ID
    pub fn add_type(&mut self, mut type_decl: TypeDecl) -> TypeDeclId {
        let id = TypeDeclId::from_raw(self.types.len() as u32);
        type_decl.id = id;
        self.types.push(type_decl);
        id
    }

    /// Type declarations in declaration order
    pub fn types(&self) -> &[TypeDecl] {
        &self.types
    }
}

/// One structural type defined in a module
#[derive(Debug, Clone)]
pub struct TypeDecl {
    id: TypeDeclId,
    name: String,
    procedures: Vec<Procedure>,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TypeDeclId::invalid(),
            name: name.into(),
            procedures: Vec::new(),
        }
    }

    pub fn id(&self) -> TypeDeclId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a procedure, assigning it the next sequential ID
    pub fn add_procedure(&mut self, mut procedure: Procedure) -> ProcedureId {
        let id = ProcedureId::from_raw(self.procedures.len() as u32);
        procedure.id = id;
        self.procedures.push(procedure);
        id
    }

    /// Procedures in declaration order
    pub fn procedures(&self) -> &[Procedure] {
        &self.procedures
    }
}

/// One executable unit (method/function) owned by a type declaration
///
/// The operand arena owns every operand node reachable from the body;
/// instructions and operands reference arena slots by [`OperandId`],
/// which makes shared sub-operands and merge cycles representable
/// without reference cycles in the host language.
#[derive(Debug, Clone)]
pub struct Procedure {
    id: ProcedureId,
    name: String,
    operands: Vec<Operand>,
    body: Option<Vec<Instruction>>,
}

impl Procedure {
    /// Create a bodyless procedure (a declaration without an implementation)
    pub fn declaration(name: impl Into<String>) -> Self {
        Self {
            id: ProcedureId::invalid(),
            name: name.into(),
            operands: Vec::new(),
            body: None,
        }
    }

    pub(crate) fn from_parts(
        name: String,
        operands: Vec<Operand>,
        body: Vec<Instruction>,
    ) -> Self {
        Self {
            id: ProcedureId::invalid(),
            name,
            operands,
            body: Some(body),
        }
    }

    pub fn id(&self) -> ProcedureId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The body as an ordered instruction sequence, or `None` for a
    /// declaration without one
    pub fn body(&self) -> Option<&[Instruction]> {
        self.body.as_deref()
    }

    /// Resolve an operand ID against this procedure's arena.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this procedure's arena. An
    /// out-of-range ID is a caller bug (a node identity from another
    /// procedure), not a data-dependent runtime state.
    pub fn operand(&self, id: OperandId) -> &Operand {
        &self.operands[id.as_raw() as usize]
    }

    /// Number of operand slots in the arena
    pub fn operand_count(&self) -> usize {
        self.operands.len()
    }
}
