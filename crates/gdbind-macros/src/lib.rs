//! gdbind Proc Macros
//!
//! # Macros
//!
//! - `#[derive(ExtensionClass)]` - Declare a Rust type as an engine subclass
//!
//! # Example
//!
//! ```ignore
//! use gdbind::prelude::*;
//!
//! #[derive(ExtensionClass)]
//! #[class(base = Node3D, name = "Spinner")]
//! pub struct Spinner {
//!     base: Base<Node3D>,
//!     #[class(init = 1.5)]
//!     speed: f64,
//! }
//!
//! impl INode for Spinner {
//!     fn process(&mut self, delta: f64) {
//!         self.speed += delta;
//!     }
//! }
//! ```

use proc_macro::TokenStream;

mod attrs;
mod derive_extension;

/// Derive `ExtensionClass` for a struct.
///
/// # Attributes
///
/// - `#[class(base = Path)]` - Engine class to derive from (required)
/// - `#[class(name = "...")]` - Override the registered class name
/// - `#[class(abstract_class)]` - The engine refuses to instantiate it
/// - `#[class(overridable)]` - Scripts may override it
/// - `#[class(hidden)]` - Not listed in the editor
///
/// # Field Attributes
///
/// - `#[class(init = expr)]` - Initial value (default: `Default::default()`)
///
/// The field of type `Base<..>` receives the engine object the instance is
/// attached to. Virtual hooks come from the `I*` trait of the base chain,
/// which the type must implement (an empty impl keeps every default).
#[proc_macro_derive(ExtensionClass, attributes(class))]
pub fn derive_extension_class(input: TokenStream) -> TokenStream {
    derive_extension::derive_extension_impl(input)
}
