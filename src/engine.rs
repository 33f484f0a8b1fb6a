// src/engine.rs
//! Loading the libHPCS decoding engine and owning native records.
//!
//! The engine is loaded once, eagerly resolving every exported symbol,
//! and then passed around by value (or reference) as a capability. There
//! is no process-global handle.

use libloading::Library;
use log::debug;
use std::ffi::CStr;
use std::path::Path;
use std::ptr::NonNull;

use crate::error::{HpcsError, Result};
use crate::ffi::{
    self, AllocMeasuredDataFn, AllocMethodInfoFn, ErrorToStringFn, FreeMeasuredDataFn,
    FreeMethodInfoFn, RawMeasuredData, RawMethodInfo, ReadMeasuredDataFn, ReadMethodInfoFn,
};

/// The engine's eight entry points, resolved to plain function pointers.
///
/// Usually produced by [`Engine::load`]; callers that link libHPCS
/// statically can fill this from their own `extern "C"` declarations and
/// hand it to [`Engine::from_api`].
#[derive(Clone, Copy)]
pub struct EngineApi {
    pub error_to_string: ErrorToStringFn,
    pub read_mdata: ReadMeasuredDataFn,
    pub read_mheader: ReadMeasuredDataFn,
    pub read_minfo: ReadMethodInfoFn,
    pub alloc_mdata: AllocMeasuredDataFn,
    pub free_mdata: FreeMeasuredDataFn,
    pub alloc_minfo: AllocMethodInfoFn,
    pub free_minfo: FreeMethodInfoFn,
}

impl EngineApi {
    /// Resolve all entry points from a loaded library. A missing symbol
    /// fails the whole load rather than the first call that needs it.
    ///
    /// # Safety
    ///
    /// The library must export the libHPCS ABI with the declared
    /// signatures.
    unsafe fn resolve(library: &Library) -> Result<Self> {
        Ok(EngineApi {
            error_to_string: *library.get::<ErrorToStringFn>(ffi::SYM_ERROR_TO_STRING)?,
            read_mdata: *library.get::<ReadMeasuredDataFn>(ffi::SYM_READ_MDATA)?,
            read_mheader: *library.get::<ReadMeasuredDataFn>(ffi::SYM_READ_MHEADER)?,
            read_minfo: *library.get::<ReadMethodInfoFn>(ffi::SYM_READ_MINFO)?,
            alloc_mdata: *library.get::<AllocMeasuredDataFn>(ffi::SYM_ALLOC_MDATA)?,
            free_mdata: *library.get::<FreeMeasuredDataFn>(ffi::SYM_FREE_MDATA)?,
            alloc_minfo: *library.get::<AllocMethodInfoFn>(ffi::SYM_ALLOC_MINFO)?,
            free_minfo: *library.get::<FreeMethodInfoFn>(ffi::SYM_FREE_MINFO)?,
        })
    }
}

/// A loaded libHPCS decoding engine.
///
/// Holds the library handle for as long as any resolved function pointer
/// can be called. Independent, non-overlapping calls are expected to be
/// safe; the engine's behavior under concurrent calls is unverified, so
/// use one `Engine` per thread if you need parallelism.
pub struct Engine {
    api: EngineApi,
    /// Keeps the function pointers in `api` alive. `None` when the
    /// symbols came from the caller via [`Engine::from_api`].
    _library: Option<Library>,
    path: String,
}

impl Engine {
    /// Load the engine from an explicit library file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("loading decoding engine from '{}'", path.display());
        let library = unsafe { Library::new(path) }?;
        let api = unsafe { EngineApi::resolve(&library) }?;
        Ok(Engine {
            api,
            _library: Some(library),
            path: path.display().to_string(),
        })
    }

    /// Load the engine by its platform-conventional file name
    /// (`libHPCS.so`, `libHPCS.dylib` or `libHPCS.dll`), trying the
    /// current directory first and the system loader search path second.
    pub fn load_default() -> Result<Self> {
        let file_name = platform_library_name();
        let local = Path::new(".").join(file_name);
        if local.is_file() {
            return Self::load(local);
        }
        Self::load(file_name)
    }

    /// Adopt already-resolved entry points, e.g. from a statically
    /// linked copy of the engine.
    ///
    /// # Safety
    ///
    /// Every pointer in `api` must follow the libHPCS contract for the
    /// symbol it stands in for, and must stay callable for the lifetime
    /// of the returned `Engine`.
    pub unsafe fn from_api(api: EngineApi) -> Self {
        Engine {
            api,
            _library: None,
            path: String::from("<static>"),
        }
    }

    /// Where the engine was loaded from, for diagnostics.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Human-readable description of a status code, straight from the
    /// engine's own string table. Total over all of `i32`: the table
    /// carries a fallback entry for unrecognized codes.
    pub fn describe(&self, code: i32) -> String {
        let ptr = unsafe { (self.api.error_to_string)(code) };
        if ptr.is_null() {
            // Outside the engine contract; never expected.
            return String::from("(no description available)");
        }
        unsafe { CStr::from_ptr(ptr) }
            .to_string_lossy()
            .into_owned()
    }

    pub(crate) fn api(&self) -> &EngineApi {
        &self.api
    }

    /// Obtain a zero-initialized native measurement record. The returned
    /// guard releases it exactly once, whatever happens in between.
    pub(crate) fn acquire_measured_data(&self) -> Result<MeasuredDataGuard<'_>> {
        let ptr = unsafe { (self.api.alloc_mdata)() };
        match NonNull::new(ptr) {
            Some(ptr) => Ok(MeasuredDataGuard { engine: self, ptr }),
            None => Err(HpcsError::AllocationFailed),
        }
    }

    /// Obtain a zero-initialized native method-info record, released
    /// exactly once by the returned guard.
    pub(crate) fn acquire_method_info(&self) -> Result<MethodInfoGuard<'_>> {
        let ptr = unsafe { (self.api.alloc_minfo)() };
        match NonNull::new(ptr) {
            Some(ptr) => Ok(MethodInfoGuard { engine: self, ptr }),
            None => Err(HpcsError::AllocationFailed),
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").field("path", &self.path).finish()
    }
}

/// Scoped ownership of a native measurement record.
///
/// The raw pointer never leaves this module or the operation façade;
/// `Drop` returns the record and every buffer the engine attached to it,
/// which also covers records whose decode failed part-way.
pub(crate) struct MeasuredDataGuard<'e> {
    engine: &'e Engine,
    ptr: NonNull<RawMeasuredData>,
}

impl MeasuredDataGuard<'_> {
    pub(crate) fn as_mut_ptr(&self) -> *mut RawMeasuredData {
        self.ptr.as_ptr()
    }

    /// View the record for translation.
    ///
    /// # Safety
    ///
    /// The engine must not be mutating the record (no decode call in
    /// flight).
    pub(crate) unsafe fn record(&self) -> &RawMeasuredData {
        self.ptr.as_ref()
    }
}

impl Drop for MeasuredDataGuard<'_> {
    fn drop(&mut self) {
        unsafe { (self.engine.api.free_mdata)(self.ptr.as_ptr()) }
    }
}

/// Scoped ownership of a native method-info record.
pub(crate) struct MethodInfoGuard<'e> {
    engine: &'e Engine,
    ptr: NonNull<RawMethodInfo>,
}

impl MethodInfoGuard<'_> {
    pub(crate) fn as_mut_ptr(&self) -> *mut RawMethodInfo {
        self.ptr.as_ptr()
    }

    /// # Safety
    ///
    /// The engine must not be mutating the record.
    pub(crate) unsafe fn record(&self) -> &RawMethodInfo {
        self.ptr.as_ref()
    }
}

impl Drop for MethodInfoGuard<'_> {
    fn drop(&mut self) {
        unsafe { (self.engine.api.free_minfo)(self.ptr.as_ptr()) }
    }
}

/// Engine library file name on this platform.
pub fn platform_library_name() -> &'static str {
    #[cfg(target_os = "windows")]
    {
        "libHPCS.dll"
    }
    #[cfg(target_os = "macos")]
    {
        "libHPCS.dylib"
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        "libHPCS.so"
    }
}
