use crate::Obj;
use crate::classes::Object;
use crate::macros::engine_class;

engine_class! {
    /// Base of every reference-counted class.
    ///
    /// Handles obtained from the engine own one reference each; the owning
    /// lifetime gives it back when it ends.
    pub struct RefCounted: "RefCounted" => Object;
    refcounted: true;
    ancestors { as_object => Object }
    methods<'lt> {
        init_ref() -> bool = 2240911060;
        reference() -> bool = 2240911060;
        unreference() -> bool = 2240911060;
        get_reference_count() -> i64 = 3905245786;
    }
}

impl<'lt> Obj<'lt, RefCounted> {
    pub fn reference_count(&self) -> i64 {
        self.advanced().get_reference_count()
    }
}
