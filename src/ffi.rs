// src/ffi.rs
//! Raw mirror of the libHPCS ABI.
//!
//! Field order and widths match `libHPCS.h` exactly; the structs here are
//! only ever filled by the engine and read by the translation layer.
//! Nothing in this module outlives the acquire/release span of a native
//! record, and none of these types appear in the domain model.

use bytemuck::{Pod, Zeroable};
use std::ffi::{c_char, c_int};

/// Timestamp of a measurement as stored by the engine.
///
/// `month` and `day` are zero when unknown.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Zeroable)]
pub struct RawDate {
    pub year: u32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// DAD detector wavelength, in nanometers. Zero means absent.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct RawWavelength {
    pub wavelength: u16,
    pub interval: u16,
}

/// One point of a signal trace: time in minutes, value in the unit of
/// the trace.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct RawTimeValuePair {
    pub time: f64,
    pub value: f64,
}

/// Measurement record filled by `hpcs_read_mdata` / `hpcs_read_mheader`.
///
/// String buffers and the sample array are owned by the engine and are
/// reclaimed by `hpcs_free_mdata`.
#[repr(C)]
#[derive(Debug)]
pub struct RawMeasuredData {
    pub file_description: *mut c_char,
    pub sample_info: *mut c_char,
    pub operator_name: *mut c_char,
    pub date: RawDate,
    pub method_name: *mut c_char,
    pub cs_ver: *mut c_char,
    pub cs_rev: *mut c_char,
    pub y_units: *mut c_char,
    pub sampling_rate: f64,
    pub dad_wavelength_msr: RawWavelength,
    pub dad_wavelength_ref: RawWavelength,
    pub file_type: c_int,
    pub data: *mut RawTimeValuePair,
    pub data_count: usize,
}

// All-zero is the engine's own freshly-allocated state: null buffers,
// zero scalars, zero count.
unsafe impl Zeroable for RawMeasuredData {}

/// One name/value parameter of a method file.
#[repr(C)]
#[derive(Debug)]
pub struct RawMethodInfoBlock {
    pub name: *mut c_char,
    pub value: *mut c_char,
}

unsafe impl Zeroable for RawMethodInfoBlock {}

/// Method parameter collection filled by `hpcs_read_minfo`.
#[repr(C)]
#[derive(Debug)]
pub struct RawMethodInfo {
    pub blocks: *mut RawMethodInfoBlock,
    pub count: usize,
}

unsafe impl Zeroable for RawMethodInfo {}

/// `hpcs_error_to_string`
pub type ErrorToStringFn = unsafe extern "C" fn(c_int) -> *const c_char;
/// `hpcs_read_mdata` / `hpcs_read_mheader`
pub type ReadMeasuredDataFn = unsafe extern "C" fn(*const c_char, *mut RawMeasuredData) -> c_int;
/// `hpcs_read_minfo`
pub type ReadMethodInfoFn = unsafe extern "C" fn(*const c_char, *mut RawMethodInfo) -> c_int;
/// `hpcs_alloc_mdata`
pub type AllocMeasuredDataFn = unsafe extern "C" fn() -> *mut RawMeasuredData;
/// `hpcs_free_mdata`
pub type FreeMeasuredDataFn = unsafe extern "C" fn(*mut RawMeasuredData);
/// `hpcs_alloc_minfo`
pub type AllocMethodInfoFn = unsafe extern "C" fn() -> *mut RawMethodInfo;
/// `hpcs_free_minfo`
pub type FreeMethodInfoFn = unsafe extern "C" fn(*mut RawMethodInfo);

pub const SYM_ERROR_TO_STRING: &[u8] = b"hpcs_error_to_string\0";
pub const SYM_READ_MDATA: &[u8] = b"hpcs_read_mdata\0";
pub const SYM_READ_MHEADER: &[u8] = b"hpcs_read_mheader\0";
pub const SYM_READ_MINFO: &[u8] = b"hpcs_read_minfo\0";
pub const SYM_ALLOC_MDATA: &[u8] = b"hpcs_alloc_mdata\0";
pub const SYM_FREE_MDATA: &[u8] = b"hpcs_free_mdata\0";
pub const SYM_ALLOC_MINFO: &[u8] = b"hpcs_alloc_minfo\0";
pub const SYM_FREE_MINFO: &[u8] = b"hpcs_free_minfo\0";
