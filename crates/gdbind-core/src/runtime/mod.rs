//! Call frames and handle lifetimes.
//!
//! ## Key Types
//!
//! - [`CallFrame`]: argument list and temporaries for one ptrcall
//! - [`HandleArena`]: generational arena of tracked handles
//! - [`Lifetime`]: scope that releases owned references when it ends
//! - [`Runtime`]: what a lifetime needs from the loaded engine

mod arena;
mod frame;
mod lifetime;

#[cfg(test)]
mod tests;

pub use arena::{HandleArena, Ownership, SlotKey, Tracked};
pub use frame::CallFrame;
pub use lifetime::Lifetime;

use crate::sys::MethodBindPtr;
use crate::{BindError, BindingConfig, Interface, NameHash};

/// Method binds of `RefCounted` used for ownership transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefCountBinds {
    pub init_ref: MethodBindPtr,
    pub reference: MethodBindPtr,
    pub unreference: MethodBindPtr,
}

/// The loaded engine as seen by handles and frames.
pub trait Runtime: Send + Sync {
    fn interface(&self) -> &dyn Interface;

    fn config(&self) -> &BindingConfig;

    /// Resolved bind for a method table key.
    fn method_bind(
        &self,
        key: NameHash,
        class: &'static str,
        method: &'static str,
    ) -> Result<MethodBindPtr, BindError>;

    /// `None` when the engine does not expose reference counting binds.
    fn ref_counting(&self) -> Option<RefCountBinds>;
}
