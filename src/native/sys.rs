//! C declarations for the slice of `gdextension_interface.h` gdbind loads.
//!
//! Every function is fetched by name through `get_proc_address` when the
//! library initializes. A name the engine does not export fails loading with
//! [`BindError::MissingInterfaceFunction`].

use std::ffi::{c_char, c_int, c_void};

use gdbind_core::BindError;

pub type GdBool = u8;
pub type GdInt = i64;
/// `GDExtensionVariantType`, a C enum; see [`gdbind_core::VariantType`].
pub type GdVariantType = u32;
pub type RawPtr = *mut c_void;
pub type ConstRawPtr = *const c_void;

pub type InterfaceFunction = unsafe extern "C" fn();
pub type GetProcAddress = unsafe extern "C" fn(name: *const c_char) -> Option<InterfaceFunction>;

pub type PtrConstructor = unsafe extern "C" fn(base: RawPtr, args: *const ConstRawPtr);
pub type PtrDestructor = unsafe extern "C" fn(base: RawPtr);
pub type PtrBuiltinMethod = unsafe extern "C" fn(base: RawPtr, args: *const ConstRawPtr, ret: RawPtr, argc: c_int);
pub type VariantFromType = unsafe extern "C" fn(variant: RawPtr, value: RawPtr);
pub type VariantToType = unsafe extern "C" fn(value: RawPtr, variant: RawPtr);
pub type IndexOperator = unsafe extern "C" fn(base: RawPtr, index: GdInt) -> RawPtr;
pub type ConstIndexOperator = unsafe extern "C" fn(base: ConstRawPtr, index: GdInt) -> ConstRawPtr;

#[repr(C)]
pub struct GodotVersionRaw {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub string: *const c_char,
}

/// `GDExtensionInitialization`, filled in by the entry function.
#[repr(C)]
pub struct Initialization {
    pub minimum_initialization_level: u32,
    pub userdata: RawPtr,
    pub initialize: Option<unsafe extern "C" fn(userdata: RawPtr, level: u32)>,
    pub deinitialize: Option<unsafe extern "C" fn(userdata: RawPtr, level: u32)>,
}

/// Callback slots gdbind leaves empty.
pub type Unused = Option<unsafe extern "C" fn()>;

/// `GDExtensionClassCreationInfo2` (engine 4.2 and later).
#[repr(C)]
pub struct ClassCreationInfo2 {
    pub is_virtual: GdBool,
    pub is_abstract: GdBool,
    pub is_exposed: GdBool,
    pub set: Unused,
    pub get: Unused,
    pub get_property_list: Unused,
    pub free_property_list: Unused,
    pub property_can_revert: Unused,
    pub property_get_revert: Unused,
    pub validate_property: Unused,
    pub notification: Unused,
    pub to_string: Unused,
    pub reference: Unused,
    pub unreference: Unused,
    pub create_instance: Option<unsafe extern "C" fn(class_userdata: RawPtr) -> RawPtr>,
    pub free_instance: Option<unsafe extern "C" fn(class_userdata: RawPtr, instance: RawPtr)>,
    pub recreate_instance: Unused,
    pub get_virtual: Unused,
    pub get_virtual_call_data: Option<unsafe extern "C" fn(class_userdata: RawPtr, name: ConstRawPtr) -> RawPtr>,
    pub call_virtual_with_data: Option<
        unsafe extern "C" fn(
            instance: RawPtr,
            name: ConstRawPtr,
            call_data: RawPtr,
            args: *const ConstRawPtr,
            ret: RawPtr,
        ),
    >,
    pub get_rid: Unused,
    pub class_userdata: RawPtr,
}

/// `GDExtensionCallError`.
#[repr(C)]
pub struct CallError {
    pub error: u32,
    pub argument: i32,
    pub expected: i32,
}

pub const CALL_OK: u32 = 0;

/// `GDExtensionCallableCustomInfo` (engine 4.2 and later).
#[repr(C)]
pub struct CallableCustomInfo {
    pub callable_userdata: RawPtr,
    pub token: RawPtr,
    pub object_id: u64,
    pub call_func: Option<
        unsafe extern "C" fn(
            callable_userdata: RawPtr,
            args: *const ConstRawPtr,
            argc: GdInt,
            ret: RawPtr,
            error: *mut CallError,
        ),
    >,
    pub is_valid_func: Unused,
    pub free_func: Option<unsafe extern "C" fn(callable_userdata: RawPtr)>,
    pub hash_func: Option<unsafe extern "C" fn(callable_userdata: RawPtr) -> u32>,
    pub equal_func: Option<unsafe extern "C" fn(a: RawPtr, b: RawPtr) -> GdBool>,
    pub less_than_func: Option<unsafe extern "C" fn(a: RawPtr, b: RawPtr) -> GdBool>,
    pub to_string_func: Unused,
}

/// Builtin method hashes shared by `Array` and every packed array.
pub const SIZE_HASH: GdInt = 3173160232;
pub const RESIZE_HASH: GdInt = 848867239;

/// Constructor indices, per builtin type.
pub const CONSTRUCT_DEFAULT: i32 = 0;
pub const STRING_FROM_STRING_NAME: i32 = 2;
pub const STRING_FROM_NODE_PATH: i32 = 3;
pub const NODE_PATH_FROM_STRING: i32 = 2;

macro_rules! interface_table {
    ($(
        $field:ident = $name:literal: fn($($arg:ty),*) $(-> $ret:ty)?;
    )*) => {
        /// Interface functions resolved at initialization.
        #[derive(Clone, Copy)]
        pub struct InterfaceTable {
            $(pub $field: unsafe extern "C" fn($($arg),*) $(-> $ret)?,)*
        }

        impl InterfaceTable {
            /// # Safety
            ///
            /// `get_proc_address` must be the engine's lookup function.
            pub unsafe fn load(get_proc_address: GetProcAddress) -> Result<Self, BindError> {
                Ok(Self {
                    $($field: {
                        // SAFETY: the name is NUL terminated.
                        let raw = unsafe { get_proc_address(concat!($name, "\0").as_ptr().cast()) }
                            .ok_or(BindError::MissingInterfaceFunction($name))?;
                        // SAFETY: the engine exports `$name` with this signature.
                        unsafe {
                            std::mem::transmute::<InterfaceFunction, unsafe extern "C" fn($($arg),*) $(-> $ret)?>(raw)
                        }
                    },)*
                })
            }
        }
    };
}

interface_table! {
    get_godot_version = "get_godot_version": fn(*mut GodotVersionRaw);

    classdb_get_method_bind = "classdb_get_method_bind": fn(ConstRawPtr, ConstRawPtr, GdInt) -> RawPtr;
    classdb_construct_object = "classdb_construct_object": fn(ConstRawPtr) -> RawPtr;
    classdb_get_class_tag = "classdb_get_class_tag": fn(ConstRawPtr) -> RawPtr;
    classdb_register_extension_class2 =
        "classdb_register_extension_class2": fn(RawPtr, ConstRawPtr, ConstRawPtr, *const ClassCreationInfo2);
    classdb_unregister_extension_class = "classdb_unregister_extension_class": fn(RawPtr, ConstRawPtr);

    object_destroy = "object_destroy": fn(RawPtr);
    object_get_instance_id = "object_get_instance_id": fn(ConstRawPtr) -> u64;
    object_get_instance_from_id = "object_get_instance_from_id": fn(u64) -> RawPtr;
    object_cast_to = "object_cast_to": fn(ConstRawPtr, RawPtr) -> RawPtr;
    object_get_class_name = "object_get_class_name": fn(ConstRawPtr, RawPtr, RawPtr) -> GdBool;
    object_set_instance = "object_set_instance": fn(RawPtr, ConstRawPtr, RawPtr);
    object_method_bind_ptrcall = "object_method_bind_ptrcall": fn(RawPtr, RawPtr, *const ConstRawPtr, RawPtr);

    string_new_with_utf8_chars_and_len = "string_new_with_utf8_chars_and_len": fn(RawPtr, *const c_char, GdInt);
    string_to_utf8_chars = "string_to_utf8_chars": fn(ConstRawPtr, *mut c_char, GdInt) -> GdInt;
    string_name_new_with_utf8_chars_and_len =
        "string_name_new_with_utf8_chars_and_len": fn(RawPtr, *const c_char, GdInt);

    callable_custom_create = "callable_custom_create": fn(RawPtr, *mut CallableCustomInfo);

    variant_new_nil = "variant_new_nil": fn(RawPtr);
    variant_destroy = "variant_destroy": fn(RawPtr);
    variant_get_type = "variant_get_type": fn(ConstRawPtr) -> GdVariantType;
    variant_get_ptr_constructor = "variant_get_ptr_constructor": fn(GdVariantType, i32) -> Option<PtrConstructor>;
    variant_get_ptr_destructor = "variant_get_ptr_destructor": fn(GdVariantType) -> Option<PtrDestructor>;
    variant_get_ptr_builtin_method =
        "variant_get_ptr_builtin_method": fn(GdVariantType, ConstRawPtr, GdInt) -> Option<PtrBuiltinMethod>;
    get_variant_from_type_constructor =
        "get_variant_from_type_constructor": fn(GdVariantType) -> Option<VariantFromType>;
    get_variant_to_type_constructor = "get_variant_to_type_constructor": fn(GdVariantType) -> Option<VariantToType>;

    array_operator_index = "array_operator_index": fn(RawPtr, GdInt) -> RawPtr;
    packed_byte_array_operator_index = "packed_byte_array_operator_index": fn(RawPtr, GdInt) -> RawPtr;
    packed_int32_array_operator_index = "packed_int32_array_operator_index": fn(RawPtr, GdInt) -> RawPtr;
    packed_float32_array_operator_index = "packed_float32_array_operator_index": fn(RawPtr, GdInt) -> RawPtr;
    packed_vector3_array_operator_index = "packed_vector3_array_operator_index": fn(RawPtr, GdInt) -> RawPtr;
    packed_color_array_operator_index = "packed_color_array_operator_index": fn(RawPtr, GdInt) -> RawPtr;
    array_operator_index_const = "array_operator_index_const": fn(ConstRawPtr, GdInt) -> ConstRawPtr;
    packed_byte_array_operator_index_const =
        "packed_byte_array_operator_index_const": fn(ConstRawPtr, GdInt) -> ConstRawPtr;
    packed_int32_array_operator_index_const =
        "packed_int32_array_operator_index_const": fn(ConstRawPtr, GdInt) -> ConstRawPtr;
    packed_float32_array_operator_index_const =
        "packed_float32_array_operator_index_const": fn(ConstRawPtr, GdInt) -> ConstRawPtr;
    packed_vector3_array_operator_index_const =
        "packed_vector3_array_operator_index_const": fn(ConstRawPtr, GdInt) -> ConstRawPtr;
    packed_color_array_operator_index_const =
        "packed_color_array_operator_index_const": fn(ConstRawPtr, GdInt) -> ConstRawPtr;
}
