//! Error types for gdbind.
//!
//! Two families live here:
//!
//! ```text
//! BindError  - conditions gdbind detects itself (setup, stale handles, casts)
//! ErrorCode  - the engine's own `Error` enum, returned unexamined by methods
//! ```
//!
//! Setup functions return `Result<_, BindError>`. Ptrcalls are infallible at
//! this layer: a handle that is stale or a bind that never resolved is a
//! programmer error and panics with the `BindError` text.

use std::fmt;

use num_enum::{FromPrimitive, IntoPrimitive};
use thiserror::Error;

use crate::GodotVersion;

// ============================================================================
// Binding Errors
// ============================================================================

/// Errors raised by the binding layer rather than by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// The engine's interface table does not export a required function.
    #[error("GDExtension interface function '{0}' is not available")]
    MissingInterfaceFunction(&'static str),

    /// The running engine is older than the configured minimum.
    #[error("engine version {found} is older than the required {required}")]
    IncompatibleVersion {
        required: GodotVersion,
        found: GodotVersion,
    },

    /// No method bind matched any known hash for this method.
    #[error("no method bind for {class}::{method} (hash {hash})")]
    MissingMethodBind {
        class: &'static str,
        method: &'static str,
        hash: i64,
    },

    /// The class is not known to the engine or to the class database.
    #[error("class '{0}' is not known to the engine")]
    UnknownClass(String),

    /// `classdb_construct_object` returned null.
    #[error("engine refused to construct '{0}'")]
    ConstructionFailed(String),

    /// The handle was transferred to another lifetime or released.
    #[error("handle to {class} is stale: it was transferred, freed or its lifetime ended")]
    StaleHandle { class: &'static str },

    /// A borrowed handle refers to an object the engine already destroyed.
    #[error("{class} instance {id} has been freed by the engine")]
    FreedObject { class: &'static str, id: u64 },

    /// A checked downcast failed.
    #[error("object of class '{actual}' cannot be cast to '{target}'")]
    CastFailed { actual: String, target: &'static str },

    /// An extension class with this name was registered twice.
    #[error("extension class '{0}' is already registered")]
    AlreadyRegistered(String),

    /// An extension class names a parent nobody registered.
    #[error("parent class '{parent}' of '{class}' is not registered")]
    UnknownParent { class: String, parent: String },

    /// The engine refused an extension class registration.
    #[error("the engine rejected the registration of '{0}'")]
    RegistrationRejected(String),

    /// The engine context this handle needs has already been torn down.
    #[error("gdbind is not initialized")]
    NotInitialized,

    /// The library entry point ran twice.
    #[error("gdbind is already initialized")]
    AlreadyInitialized,
}

/// Result alias for binding setup.
pub type BindResult<T> = Result<T, BindError>;

// ============================================================================
// Engine Error Codes
// ============================================================================

/// The engine's global `Error` enumeration.
///
/// Values outside the known set are preserved in [`ErrorCode::Other`] so a
/// newer engine never produces an unrepresentable code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, IntoPrimitive)]
#[repr(i64)]
pub enum ErrorCode {
    Ok = 0,
    Failed = 1,
    Unavailable = 2,
    Unconfigured = 3,
    Unauthorized = 4,
    ParameterRangeError = 5,
    OutOfMemory = 6,
    FileNotFound = 7,
    FileBadDrive = 8,
    FileBadPath = 9,
    FileNoPermission = 10,
    FileAlreadyInUse = 11,
    FileCantOpen = 12,
    FileCantWrite = 13,
    FileCantRead = 14,
    FileUnrecognized = 15,
    FileCorrupt = 16,
    FileMissingDependencies = 17,
    FileEof = 18,
    CantOpen = 19,
    CantCreate = 20,
    QueryFailed = 21,
    AlreadyInUse = 22,
    Locked = 23,
    Timeout = 24,
    CantConnect = 25,
    CantResolve = 26,
    ConnectionError = 27,
    CantAcquireResource = 28,
    CantFork = 29,
    InvalidData = 30,
    InvalidParameter = 31,
    AlreadyExists = 32,
    DoesNotExist = 33,
    DatabaseCantRead = 34,
    DatabaseCantWrite = 35,
    CompilationFailed = 36,
    MethodNotFound = 37,
    LinkFailed = 38,
    ScriptFailed = 39,
    CyclicLink = 40,
    InvalidDeclaration = 41,
    DuplicateSymbol = 42,
    ParseError = 43,
    Busy = 44,
    Skip = 45,
    Help = 46,
    Bug = 47,
    PrinterOnFire = 48,
    #[num_enum(catch_all)]
    Other(i64),
}

impl ErrorCode {
    #[inline]
    pub fn is_ok(self) -> bool {
        self == ErrorCode::Ok
    }

    /// Converts `Ok` into `Ok(())` and everything else into `Err(self)`.
    pub fn into_result(self) -> Result<(), ErrorCode> {
        if self.is_ok() { Ok(()) } else { Err(self) }
    }

    /// The engine's constant name for this code.
    pub fn name(self) -> &'static str {
        use ErrorCode::*;
        match self {
            Ok => "OK",
            Failed => "FAILED",
            Unavailable => "ERR_UNAVAILABLE",
            Unconfigured => "ERR_UNCONFIGURED",
            Unauthorized => "ERR_UNAUTHORIZED",
            ParameterRangeError => "ERR_PARAMETER_RANGE_ERROR",
            OutOfMemory => "ERR_OUT_OF_MEMORY",
            FileNotFound => "ERR_FILE_NOT_FOUND",
            FileBadDrive => "ERR_FILE_BAD_DRIVE",
            FileBadPath => "ERR_FILE_BAD_PATH",
            FileNoPermission => "ERR_FILE_NO_PERMISSION",
            FileAlreadyInUse => "ERR_FILE_ALREADY_IN_USE",
            FileCantOpen => "ERR_FILE_CANT_OPEN",
            FileCantWrite => "ERR_FILE_CANT_WRITE",
            FileCantRead => "ERR_FILE_CANT_READ",
            FileUnrecognized => "ERR_FILE_UNRECOGNIZED",
            FileCorrupt => "ERR_FILE_CORRUPT",
            FileMissingDependencies => "ERR_FILE_MISSING_DEPENDENCIES",
            FileEof => "ERR_FILE_EOF",
            CantOpen => "ERR_CANT_OPEN",
            CantCreate => "ERR_CANT_CREATE",
            QueryFailed => "ERR_QUERY_FAILED",
            AlreadyInUse => "ERR_ALREADY_IN_USE",
            Locked => "ERR_LOCKED",
            Timeout => "ERR_TIMEOUT",
            CantConnect => "ERR_CANT_CONNECT",
            CantResolve => "ERR_CANT_RESOLVE",
            ConnectionError => "ERR_CONNECTION_ERROR",
            CantAcquireResource => "ERR_CANT_ACQUIRE_RESOURCE",
            CantFork => "ERR_CANT_FORK",
            InvalidData => "ERR_INVALID_DATA",
            InvalidParameter => "ERR_INVALID_PARAMETER",
            AlreadyExists => "ERR_ALREADY_EXISTS",
            DoesNotExist => "ERR_DOES_NOT_EXIST",
            DatabaseCantRead => "ERR_DATABASE_CANT_READ",
            DatabaseCantWrite => "ERR_DATABASE_CANT_WRITE",
            CompilationFailed => "ERR_COMPILATION_FAILED",
            MethodNotFound => "ERR_METHOD_NOT_FOUND",
            LinkFailed => "ERR_LINK_FAILED",
            ScriptFailed => "ERR_SCRIPT_FAILED",
            CyclicLink => "ERR_CYCLIC_LINK",
            InvalidDeclaration => "ERR_INVALID_DECLARATION",
            DuplicateSymbol => "ERR_DUPLICATE_SYMBOL",
            ParseError => "ERR_PARSE_ERROR",
            Busy => "ERR_BUSY",
            Skip => "ERR_SKIP",
            Help => "ERR_HELP",
            Bug => "ERR_BUG",
            PrinterOnFire => "ERR_PRINTER_ON_FIRE",
            Other(_) => "ERR_UNKNOWN",
        }
    }
}

impl Default for ErrorCode {
    fn default() -> Self {
        ErrorCode::Ok
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Other(code) => write!(f, "ERR_UNKNOWN({code})"),
            known => f.write_str(known.name()),
        }
    }
}

impl std::error::Error for ErrorCode {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_error_display() {
        let err = BindError::MissingMethodBind {
            class: "CPUParticles3D",
            method: "set_amount",
            hash: 1286410249,
        };
        assert_eq!(
            err.to_string(),
            "no method bind for CPUParticles3D::set_amount (hash 1286410249)"
        );
    }

    #[test]
    fn version_error_display() {
        let err = BindError::IncompatibleVersion {
            required: GodotVersion::new(4, 2, 0),
            found: GodotVersion::new(4, 1, 3),
        };
        assert_eq!(
            err.to_string(),
            "engine version 4.1.3 is older than the required 4.2.0"
        );
    }

    #[test]
    fn error_code_from_known_value() {
        assert_eq!(ErrorCode::from(0), ErrorCode::Ok);
        assert_eq!(ErrorCode::from(31), ErrorCode::InvalidParameter);
        assert_eq!(ErrorCode::from(48), ErrorCode::PrinterOnFire);
    }

    #[test]
    fn error_code_preserves_unknown_value() {
        let code = ErrorCode::from(1234);
        assert_eq!(code, ErrorCode::Other(1234));
        assert_eq!(i64::from(code), 1234);
        assert_eq!(code.to_string(), "ERR_UNKNOWN(1234)");
    }

    #[test]
    fn error_code_into_result() {
        assert_eq!(ErrorCode::Ok.into_result(), Ok(()));
        assert_eq!(ErrorCode::Busy.into_result(), Err(ErrorCode::Busy));
        assert_eq!(ErrorCode::CantConnect.to_string(), "ERR_CANT_CONNECT");
    }
}
