// src/reader.rs
//! The caller-visible read operations.
//!
//! Every operation follows the same span: encode the path, acquire a
//! native record, call the engine, branch on the status code, translate
//! on success, and let the guard release the record on the way out of
//! the scope, whichever exit is taken.

use log::debug;
use std::ffi::CString;
use std::path::Path;

use crate::engine::Engine;
use crate::error::{EngineStatus, HpcsError, Result};
use crate::ffi::ReadMeasuredDataFn;
use crate::translate;
use crate::types::{MeasuredData, MethodInfo};

/// Reads ChemStation files through a loaded decoding engine.
///
/// All operations are synchronous and idempotent; repeated calls on an
/// unchanged file return equal values. The reader has no state beyond
/// the engine itself, but the engine's re-entrancy under concurrent
/// calls is unverified, so share a reader across threads only after
/// verifying that for your engine build.
#[derive(Debug)]
pub struct HpcsReader {
    engine: Engine,
}

impl HpcsReader {
    /// Wrap an already-loaded engine.
    pub fn new(engine: Engine) -> Self {
        HpcsReader { engine }
    }

    /// Load the engine from an explicit library file and wrap it.
    pub fn load(library_path: impl AsRef<Path>) -> Result<Self> {
        Ok(HpcsReader {
            engine: Engine::load(library_path)?,
        })
    }

    /// Load the engine by its platform-conventional name and wrap it.
    pub fn load_default() -> Result<Self> {
        Ok(HpcsReader {
            engine: Engine::load_default()?,
        })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Read measurement metadata and the complete signal trace.
    pub fn read_data(&self, path: impl AsRef<Path>) -> Result<MeasuredData> {
        let path = path.as_ref();
        debug!("reading measurement data from '{}'", path.display());
        self.read_measured(path, self.engine.api().read_mdata)
    }

    /// Read measurement metadata only. The engine does not fill the
    /// trace in this mode, so `samples` is always empty.
    pub fn read_header(&self, path: impl AsRef<Path>) -> Result<MeasuredData> {
        let path = path.as_ref();
        debug!("reading measurement header from '{}'", path.display());
        self.read_measured(path, self.engine.api().read_mheader)
    }

    /// Read the parameter blocks of a method (.MTH) file.
    pub fn read_method_info(&self, path: impl AsRef<Path>) -> Result<MethodInfo> {
        let path = path.as_ref();
        debug!("reading method info from '{}'", path.display());
        let c_path = encode_path(path)?;
        let guard = self.engine.acquire_method_info()?;
        let code = unsafe { (self.engine.api().read_minfo)(c_path.as_ptr(), guard.as_mut_ptr()) };
        self.check(code)?;
        let info = unsafe { translate::method_info_from_raw(guard.record()) }?;
        Ok(info)
    }

    fn read_measured(&self, path: &Path, entry: ReadMeasuredDataFn) -> Result<MeasuredData> {
        let c_path = encode_path(path)?;
        let guard = self.engine.acquire_measured_data()?;
        let code = unsafe { entry(c_path.as_ptr(), guard.as_mut_ptr()) };
        self.check(code)?;
        let data = unsafe { translate::measured_data_from_raw(guard.record()) }?;
        Ok(data)
    }

    fn check(&self, code: i32) -> Result<()> {
        if EngineStatus::from_raw(code).is_some_and(EngineStatus::is_ok) {
            return Ok(());
        }
        let description = self.engine.describe(code);
        debug!("engine returned status {code}: {description}");
        Err(HpcsError::from_engine(code, description))
    }
}

fn encode_path(path: &Path) -> Result<CString> {
    let utf8 = path.to_str().ok_or(HpcsError::InvalidPath)?;
    CString::new(utf8).map_err(|_| HpcsError::InvalidPath)
}
