//! Engine callables backed by Rust closures.

use std::fmt;
use std::sync::Arc;

use crate::Value;
use crate::sys::InstanceId;

/// Function run when the engine invokes a [`Callable`].
pub type CallableFn = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// A Rust function the engine can call, for example as a signal target.
///
/// Cloning shares the function. Two callables are equal when they share it.
#[derive(Clone)]
pub struct Callable {
    owner: InstanceId,
    function: CallableFn,
}

impl Callable {
    /// A callable bound to the object `owner`; the engine drops it once that
    /// object is gone. [`InstanceId::NONE`] binds it to nothing.
    pub fn from_fn(owner: InstanceId, function: impl Fn(&[Value]) + Send + Sync + 'static) -> Self {
        Self {
            owner,
            function: Arc::new(function),
        }
    }

    pub fn owner(&self) -> InstanceId {
        self.owner
    }

    pub fn call(&self, args: &[Value]) {
        (self.function)(args);
    }

    /// Address of the shared function, stable across clones.
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.function).cast::<()>().addr()
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.function, &other.function)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("owner", &self.owner)
            .field("function", &format_args!("{:#x}", self.id()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI64, Ordering};

    use super::*;

    #[test]
    fn clones_share_the_function() {
        let total = Arc::new(AtomicI64::new(0));
        let sink = Arc::clone(&total);
        let callable = Callable::from_fn(InstanceId::NONE, move |args| {
            for arg in args {
                if let Value::Int(v) = arg {
                    sink.fetch_add(*v, Ordering::SeqCst);
                }
            }
        });
        let copy = callable.clone();

        callable.call(&[Value::Int(2)]);
        copy.call(&[Value::Int(3), Value::Nil]);
        assert_eq!(total.load(Ordering::SeqCst), 5);
        assert_eq!(callable, copy);
        assert_eq!(callable.id(), copy.id());
        assert_ne!(callable, Callable::from_fn(InstanceId::NONE, |_| {}));
    }
}
