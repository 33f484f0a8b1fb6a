// src/lib.rs
//! # hpcs-rs
//!
//! Safe Rust bindings to **libHPCS**, the decoding engine for HP/Agilent
//! ChemStation chromatography and capillary-electrophoresis data files.
//!
//! The engine parses the proprietary on-disk format; this crate owns the
//! boundary around it: loading the engine once per process, pairing every
//! native allocation with exactly one release, and translating the
//! engine's fixed-layout records into immutable, caller-owned values with
//! sentinel fields resolved into `Option`s.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hpcs_rs::{HpcsReader, Result};
//!
//! fn main() -> Result<()> {
//!     let reader = HpcsReader::load_default()?;
//!
//!     // Metadata plus the full signal trace
//!     let data = reader.read_data("DAD1A.ch")?;
//!     println!("{} samples of {}", data.samples.len(), data.file_type);
//!
//!     // Metadata only; `samples` stays empty
//!     let header = reader.read_header("DAD1A.ch")?;
//!     println!("operator: {}", header.operator_name);
//!
//!     // Method parameters from a .MTH file
//!     let method = reader.read_method_info("CAL3.MTH")?;
//!     for (name, value) in method.iter() {
//!         println!("{name} = {value}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Engine location
//!
//! [`HpcsReader::load_default`] looks for the platform-conventional
//! library file (`libHPCS.so`, `libHPCS.dylib`, `libHPCS.dll`) in the
//! current directory and then on the system loader path;
//! [`HpcsReader::load`] takes an explicit file. Statically linked setups
//! can build an [`EngineApi`] from their own `extern "C"` declarations
//! and pass it to [`Engine::from_api`].
//!
//! ## Concurrency
//!
//! Every read is a single blocking call into the engine. The engine's
//! behavior under concurrent calls is unverified; keep one reader per
//! thread until that is established for your engine build.

// Modules
pub mod error;
pub mod ffi;
pub mod types;

mod engine;
mod reader;
mod translate;

// Re-export commonly used types at the crate root for convenience
pub use error::{EngineStatus, HpcsError, Result};

pub use engine::{platform_library_name, Engine, EngineApi};

pub use types::{FileType, MeasuredData, MethodInfo, Sample, Timestamp, Wavelength};

pub use reader::HpcsReader;

// Prelude module for glob imports
pub mod prelude {
    //! Convenient imports for common use cases.
    //!
    //! ```rust
    //! use hpcs_rs::prelude::*;
    //! ```

    pub use crate::error::{HpcsError, Result};
    pub use crate::reader::HpcsReader;
    pub use crate::types::{FileType, MeasuredData, MethodInfo, Sample};
}

/// The library version
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");
