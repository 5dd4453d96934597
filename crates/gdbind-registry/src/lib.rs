//! Engine loading for gdbind.
//!
//! - [`MethodTable`]: method binds resolved once at load time
//! - [`ClassDb`]: inheritance graph of engine and extension classes
//! - [`Engine`]: the loaded engine, implementing [`gdbind_core::Runtime`]

mod class_db;
mod engine;
mod method_table;

#[cfg(test)]
mod stub;

pub use class_db::{ClassDb, ClassKind, ClassNode};
pub use engine::Engine;
pub use method_table::{MethodTable, MissingBind, MissingReason, ResolvedBind};
