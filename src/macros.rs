//! Declarative generators for class shims and engine enums.
//!
//! `engine_class!` expands one class description into:
//!
//! - the zero-sized marker and its [`EngineClass`](crate::EngineClass) impl,
//!   whose `ClassSpec` is derived from the Rust signatures below,
//! - `Inherits` impls and `as_*` accessors for every ancestor,
//! - `Deref` from `Obj`/`Advanced` of the class to those of its parent,
//! - one `Advanced` method per engine method bind,
//! - virtual hook delegation to the parent, unless the class lists its own
//!   hooks.
//!
//! A method line reads
//!
//! ```text
//! name(arg: Type, ...) -> Ret => get "property" = HASH | COMPAT_HASH since(4, 3);
//! ```
//!
//! where the return type, the property access, the compatibility hashes
//! and the minimum version are all optional.

macro_rules! engine_class {
    (
        $(#[$meta:meta])*
        pub struct $name:ident: $engine:literal $(=> $parent:ident)?;
        refcounted: $refcounted:literal;
        ancestors { $($as_fn:ident => $ancestor:ident),* $(,)? }
        $(virtuals [$($hook:literal),* $(,)?];)?
        methods<$lt:lifetime> {
            $(
                $(#[$mmeta:meta])*
                $method:ident ( $($arg:ident : $aty:ty),* $(,)? )
                $(-> $ret:ty)?
                $(=> $access:ident $prop:literal)?
                = $hash:literal $(| $compat:literal)*
                $(since($major:literal, $minor:literal))?;
            )*
        }
    ) => {
        $(#[$meta])*
        pub enum $name {}

        impl $crate::EngineClass for $name {
            const NAME: &'static str = $engine;
            const PARENT: ::core::option::Option<&'static str> =
                $crate::macros::__parent_name!($($parent)?);
            const REFCOUNTED: bool = $refcounted;

            fn class_spec() -> &'static $crate::gdbind_core::ClassSpec {
                static SPEC: ::std::sync::OnceLock<$crate::gdbind_core::ClassSpec> = ::std::sync::OnceLock::new();

                #[allow(clippy::extra_unused_lifetimes)]
                fn build<$lt>() -> $crate::gdbind_core::ClassSpec {
                    $crate::gdbind_core::ClassSpec {
                        name: $engine,
                        parent: <$name as $crate::EngineClass>::PARENT,
                        refcounted: $refcounted,
                        methods: vec![$(
                            $crate::gdbind_core::MethodSpec {
                                name: stringify!($method),
                                key: $crate::gdbind_core::NameHash::of_method($engine, stringify!($method)),
                                hash: $hash,
                                compat_hashes: &[$($compat),*],
                                since: $crate::macros::__since!($($major, $minor)?),
                                args: vec![$(<$aty as $crate::marshal::AbiArg>::TYPE),*],
                                ret: <$crate::macros::__ret!($($ret)?) as $crate::marshal::AbiReturn<$lt>>::TYPE,
                                access: $crate::macros::__access!($($access $prop)?),
                            }
                        ),*],
                        virtuals: &[$($($hook),*)?],
                    }
                }

                SPEC.get_or_init(build)
            }
        }

        // SAFETY: a class is its own ancestor.
        unsafe impl $crate::Inherits<$name> for $name {}
        $(
            // SAFETY: listed as an engine ancestor of this class.
            unsafe impl $crate::Inherits<$ancestor> for $name {}
        )*

        impl<'a> $crate::Obj<'a, $name> {
            $(
                #[inline]
                pub fn $as_fn(self) -> $crate::Obj<'a, $ancestor> {
                    self.upcast()
                }
            )*
        }

        $crate::macros::__deref!($name $(=> $parent)?);
        $crate::macros::__virtuals!($name $(=> $parent)? $([$($hook),*])?);

        impl<$lt> $crate::Advanced<$lt, $name> {
            $(
                $(#[$mmeta])*
                #[allow(clippy::too_many_arguments)]
                pub fn $method(&self, $($arg: $aty),*) -> $crate::macros::__ret!($($ret)?) {
                    const KEY: $crate::gdbind_core::NameHash =
                        $crate::gdbind_core::NameHash::of_method($engine, stringify!($method));
                    let obj = self.as_obj();
                    let object = obj.checked_ptr();
                    let lifetime: &$lt $crate::gdbind_core::Lifetime = obj.lifetime();
                    let bind = lifetime.method_bind(KEY, $engine, stringify!($method));
                    #[allow(unused_mut)]
                    let mut frame = lifetime.frame();
                    $($crate::marshal::AbiArg::push_arg(&$arg, &mut frame);)*
                    // SAFETY: arguments were pushed in signature order and the
                    // return slot type matches the declared return type.
                    unsafe {
                        let raw = frame.call_raw::<
                            <$crate::macros::__ret!($($ret)?) as $crate::marshal::AbiReturn<$lt>>::Raw,
                        >(bind, object);
                        <$crate::macros::__ret!($($ret)?) as $crate::marshal::AbiReturn<$lt>>::from_return(raw, lifetime)
                    }
                }
            )*
        }
    };
}

#[doc(hidden)]
macro_rules! __parent_name {
    () => {
        ::core::option::Option::None
    };
    ($parent:ident) => {
        ::core::option::Option::Some(<$parent as $crate::EngineClass>::NAME)
    };
}

#[doc(hidden)]
macro_rules! __since {
    () => {
        $crate::gdbind_core::GodotVersion::MINIMUM
    };
    ($major:literal, $minor:literal) => {
        $crate::gdbind_core::GodotVersion::new($major, $minor, 0)
    };
}

#[doc(hidden)]
macro_rules! __ret {
    () => { () };
    ($ret:ty) => { $ret };
}

#[doc(hidden)]
macro_rules! __access {
    () => {
        $crate::gdbind_core::Access::Call
    };
    (get $prop:literal) => {
        $crate::gdbind_core::Access::Get($prop)
    };
    (set $prop:literal) => {
        $crate::gdbind_core::Access::Set($prop)
    };
}

#[doc(hidden)]
macro_rules! __deref {
    ($name:ident) => {};
    ($name:ident => $parent:ident) => {
        impl<'a> ::core::ops::Deref for $crate::Obj<'a, $name> {
            type Target = $crate::Obj<'a, $parent>;

            #[inline]
            fn deref(&self) -> &Self::Target {
                self.upcast_ref()
            }
        }

        impl<'a> ::core::ops::Deref for $crate::Advanced<'a, $name> {
            type Target = $crate::Advanced<'a, $parent>;

            #[inline]
            fn deref(&self) -> &Self::Target {
                self.upcast_ref()
            }
        }
    };
}

/// Classes without hooks of their own look hooks up on their parent;
/// classes that list hooks implement `HasVirtuals` by hand.
#[doc(hidden)]
macro_rules! __virtuals {
    ($name:ident) => {};
    ($name:ident [$($hook:literal),*]) => {};
    ($name:ident => $parent:ident [$($hook:literal),*]) => {};
    ($name:ident => $parent:ident) => {
        impl<T> $crate::HasVirtuals<T> for $name
        where
            $parent: $crate::HasVirtuals<T>,
        {
            #[inline]
            fn virtual_by_name(name: &str) -> ::core::option::Option<$crate::gdbind_core::VirtualThunk> {
                <$parent as $crate::HasVirtuals<T>>::virtual_by_name(name)
            }
        }
    };
}

/// Integer-backed engine enumeration.
///
/// Values outside the listed constants are kept as-is, so a newer engine
/// never produces an unrepresentable value.
macro_rules! engine_enum {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[repr(transparent)]
        pub struct $name(pub i64);

        impl $name {
            $(
                $(#[$vmeta])*
                pub const $variant: $name = $name($value);
            )*

            /// Constant name of a known value.
            pub fn name(self) -> ::core::option::Option<&'static str> {
                match self.0 {
                    $($value => ::core::option::Option::Some(stringify!($variant)),)*
                    _ => ::core::option::Option::None,
                }
            }

            pub fn ord(self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                match self.name() {
                    ::core::option::Option::Some(name) => write!(f, concat!(stringify!($name), "::{}"), name),
                    ::core::option::Option::None => write!(f, concat!(stringify!($name), "({})"), self.0),
                }
            }
        }

        impl ::core::convert::From<i64> for $name {
            fn from(value: i64) -> Self {
                $name(value)
            }
        }

        impl ::core::convert::From<$name> for i64 {
            fn from(value: $name) -> i64 {
                value.0
            }
        }

        impl $crate::marshal::AbiArg for $name {
            const TYPE: $crate::gdbind_core::AbiType = $crate::gdbind_core::AbiType::Int;

            #[inline]
            fn push_arg(&self, frame: &mut $crate::gdbind_core::CallFrame<'_>) {
                frame.push_value(self.0);
            }
        }

        impl<'lt> $crate::marshal::AbiReturn<'lt> for $name {
            const TYPE: $crate::gdbind_core::AbiType = $crate::gdbind_core::AbiType::Int;
            type Raw = i64;

            #[inline]
            unsafe fn from_return(raw: i64, _: &'lt $crate::gdbind_core::Lifetime) -> Self {
                $name(raw)
            }
        }

        impl $crate::marshal::VirtualArg for $name {
            unsafe fn from_arg(ptr: $crate::gdbind_core::ConstTypePtr, _: &dyn $crate::gdbind_core::Interface) -> Self {
                // SAFETY: forwarded from the caller.
                $name(unsafe { ptr.cast::<i64>().read_unaligned() })
            }
        }

        impl $crate::marshal::VirtualReturn for $name {
            unsafe fn write_return(self, ret: $crate::gdbind_core::TypePtr, _: &dyn $crate::gdbind_core::Interface) {
                // SAFETY: forwarded from the caller.
                unsafe { ret.cast::<i64>().write_unaligned(self.0) }
            }
        }
    };
}

pub(crate) use {__access, __deref, __parent_name, __ret, __since, __virtuals, engine_class, engine_enum};
