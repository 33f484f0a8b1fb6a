// src/error.rs
use thiserror::Error;

/// Status codes returned by the libHPCS decoding engine.
///
/// The numeric values are part of the engine's ABI and must not be
/// reordered. `Ok` is the only non-failure code; none of the failure
/// codes are transient, so no call is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum EngineStatus {
    Ok = 0,
    NullPointer = 1,
    CannotOpen = 2,
    ParseError = 3,
    UnknownType = 4,
    IncompatibleFile = 5,
    NotImplemented = 6,
}

impl EngineStatus {
    /// All codes the engine is documented to return.
    pub const ALL: [EngineStatus; 7] = [
        EngineStatus::Ok,
        EngineStatus::NullPointer,
        EngineStatus::CannotOpen,
        EngineStatus::ParseError,
        EngineStatus::UnknownType,
        EngineStatus::IncompatibleFile,
        EngineStatus::NotImplemented,
    ];

    pub fn from_raw(code: i32) -> Option<Self> {
        match code {
            0 => Some(EngineStatus::Ok),
            1 => Some(EngineStatus::NullPointer),
            2 => Some(EngineStatus::CannotOpen),
            3 => Some(EngineStatus::ParseError),
            4 => Some(EngineStatus::UnknownType),
            5 => Some(EngineStatus::IncompatibleFile),
            6 => Some(EngineStatus::NotImplemented),
            _ => None,
        }
    }

    pub fn as_raw(self) -> i32 {
        self as i32
    }

    pub fn is_ok(self) -> bool {
        self == EngineStatus::Ok
    }
}

/// Errors surfaced by this crate.
///
/// Engine failures carry the description obtained from the engine's own
/// string table verbatim; this crate never rewords them.
#[derive(Error, Debug)]
pub enum HpcsError {
    /// The engine rejected one of its arguments (`HPCS_E_NULLPTR`).
    #[error("invalid argument passed to the decoding engine: {description}")]
    InvalidArgument { description: String },

    /// The file could not be opened (`HPCS_E_CANT_OPEN`).
    #[error("file is not accessible: {description}")]
    FileNotAccessible { description: String },

    /// The file exists but could not be parsed (`HPCS_E_PARSE_ERROR`).
    #[error("malformed measurement file: {description}")]
    MalformedInput { description: String },

    /// The file contains a measurement kind the engine does not know
    /// (`HPCS_E_UNKNOWN_TYPE`).
    #[error("unsupported kind of measurement: {description}")]
    UnsupportedMeasurementKind { description: String },

    /// The requested operation does not apply to this file type
    /// (`HPCS_E_INCOMPATIBLE_FILE`).
    #[error("operation not applicable to this file: {description}")]
    OperationNotApplicable { description: String },

    /// The engine entry point is a stub (`HPCS_E_NOTIMPL`).
    #[error("operation not implemented by the decoding engine: {description}")]
    NotImplemented { description: String },

    /// The engine returned a code outside its documented set. The
    /// description still comes from the engine, which keeps a fallback
    /// entry in its string table for this case.
    #[error("decoding engine returned unrecognized status {code}: {description}")]
    UnknownStatus { code: i32, description: String },

    /// A native text field was null or not valid UTF-8. Raised by the
    /// translation layer; the engine has no such code.
    #[error("native text field is null or not valid UTF-8")]
    InvalidText,

    /// The file path contains an interior NUL byte or is not valid
    /// UTF-8 and therefore cannot be handed to the engine.
    #[error("file path cannot be passed to the decoding engine")]
    InvalidPath,

    /// The engine's allocator returned a null record.
    #[error("decoding engine failed to allocate a native record")]
    AllocationFailed,

    /// The engine library or one of its symbols failed to load.
    #[error("failed to load the decoding engine: {0}")]
    EngineLoad(#[from] libloading::Error),
}

impl HpcsError {
    /// Map a raw engine status code onto the error taxonomy, attaching
    /// the engine-provided description.
    ///
    /// Must not be called with `EngineStatus::Ok`; callers branch on the
    /// code before constructing an error.
    pub fn from_engine(code: i32, description: String) -> Self {
        match EngineStatus::from_raw(code) {
            Some(EngineStatus::NullPointer) => HpcsError::InvalidArgument { description },
            Some(EngineStatus::CannotOpen) => HpcsError::FileNotAccessible { description },
            Some(EngineStatus::ParseError) => HpcsError::MalformedInput { description },
            Some(EngineStatus::UnknownType) => {
                HpcsError::UnsupportedMeasurementKind { description }
            }
            Some(EngineStatus::IncompatibleFile) => {
                HpcsError::OperationNotApplicable { description }
            }
            Some(EngineStatus::NotImplemented) => HpcsError::NotImplemented { description },
            Some(EngineStatus::Ok) | None => HpcsError::UnknownStatus { code, description },
        }
    }

    /// The engine status code behind this error, if it originated from
    /// the engine.
    pub fn engine_code(&self) -> Option<i32> {
        match self {
            HpcsError::InvalidArgument { .. } => Some(EngineStatus::NullPointer.as_raw()),
            HpcsError::FileNotAccessible { .. } => Some(EngineStatus::CannotOpen.as_raw()),
            HpcsError::MalformedInput { .. } => Some(EngineStatus::ParseError.as_raw()),
            HpcsError::UnsupportedMeasurementKind { .. } => {
                Some(EngineStatus::UnknownType.as_raw())
            }
            HpcsError::OperationNotApplicable { .. } => {
                Some(EngineStatus::IncompatibleFile.as_raw())
            }
            HpcsError::NotImplemented { .. } => Some(EngineStatus::NotImplemented.as_raw()),
            HpcsError::UnknownStatus { code, .. } => Some(*code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, HpcsError>;
