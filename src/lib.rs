//! Analysis-pass infrastructure for a whole-program static-analysis
//! engine.
//!
//! The crate walks a [`scene::Scene`] (modules → type declarations →
//! procedures) and each procedure's instruction/operand graph, letting
//! pluggable analyses observe state at every level without
//! re-implementing traversal, kind-matching, or cycle safety:
//!
//! - [`context`]: the hierarchical, typed context store passed down
//!   the traversal
//! - [`dispatch`]: type-indexed dispatch tables and the
//!   cycle-safe instruction/operand dispatcher
//! - [`walker`]: pass contracts and the traversal driver
//! - [`validation`]: the validator/summary subsystem built on top,
//!   collecting graded messages into a lazily built result tree
//! - [`scene`]: the program model the core traverses
//!
//! ```rust
//! use scenepass::scene::{Module, ProcedureBuilder, Scene, TypeDecl};
//! use scenepass::validation::validate_scene;
//!
//! let mut scene = Scene::new();
//! let mut module = Module::new("main");
//! let mut ty = TypeDecl::new("Main");
//! let mut proc = ProcedureBuilder::new("run");
//! let x = proc.local("x");
//! let one = proc.int(1);
//! proc.assign(x, one);
//! ty.add_procedure(proc.build());
//! module.add_type(ty);
//! scene.add_module(module);
//!
//! let summary = validate_scene(&scene);
//! assert!(summary.is_ok());
//! ```

pub mod context;
pub mod dispatch;
pub mod logging;
pub mod scene;
pub mod validation;
pub mod walker;
