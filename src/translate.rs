// src/translate.rs
//! Conversion of filled native records into owned domain values.
//!
//! This module is the only consumer of the [`crate::ffi`] mirror structs.
//! Translation runs strictly after a successful decode and strictly
//! before the native record is released; every byte the domain value
//! needs is copied out here.

use std::collections::HashMap;
use std::ffi::{c_char, CStr};

use crate::error::{HpcsError, Result};
use crate::ffi::{RawDate, RawMeasuredData, RawMethodInfo, RawTimeValuePair, RawWavelength};
use crate::types::{FileType, MeasuredData, MethodInfo, Sample, Timestamp, Wavelength};

/// Native marker for "sampling rate not recorded".
pub(crate) const SAMPLING_RATE_UNKNOWN: f64 = -1.0;

/// Native marker for "no wavelength recorded". Applies to the whole
/// wavelength field, interval included.
pub(crate) const WAVELENGTH_ABSENT: u16 = 0;

/// Native marker for "no spectral interval recorded".
pub(crate) const WAVELENGTH_INTERVAL_ABSENT: u16 = 0;

/// Copy a NUL-terminated engine string into an owned `String`.
///
/// A null pointer or invalid UTF-8 is a hard failure; the engine is
/// expected to fill every text field of a successfully decoded record.
///
/// # Safety
///
/// `ptr`, when non-null, must point to a NUL-terminated buffer that
/// stays valid for the duration of the call.
unsafe fn text_from_raw(ptr: *const c_char) -> Result<String> {
    if ptr.is_null() {
        return Err(HpcsError::InvalidText);
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map(str::to_owned)
        .map_err(|_| HpcsError::InvalidText)
}

fn timestamp_from_raw(raw: &RawDate) -> Timestamp {
    Timestamp {
        year: raw.year,
        month: raw.month,
        day: raw.day,
        hour: raw.hour,
        minute: raw.minute,
        second: raw.second,
    }
}

/// Resolve the zero sentinels of a native wavelength field.
///
/// A zero wavelength means the whole field is absent, whatever the
/// interval says; a zero interval on a present wavelength means only the
/// interval is absent.
fn wavelength_from_raw(raw: RawWavelength) -> Option<Wavelength> {
    if raw.wavelength == WAVELENGTH_ABSENT {
        return None;
    }
    let interval = if raw.interval == WAVELENGTH_INTERVAL_ABSENT {
        None
    } else {
        Some(raw.interval)
    };
    Some(Wavelength {
        wavelength: raw.wavelength,
        interval,
    })
}

/// `-1.0` means "not recorded"; every other value passes through
/// unchanged, with no range validation.
fn sampling_rate_from_raw(raw: f64) -> Option<f64> {
    if raw == SAMPLING_RATE_UNKNOWN {
        None
    } else {
        Some(raw)
    }
}

/// Copy exactly `count` samples out of the engine's array, preserving
/// acquisition order.
///
/// # Safety
///
/// `data`, when non-null, must point to at least `count` consecutive
/// `RawTimeValuePair`s valid for the duration of the call.
unsafe fn samples_from_raw(data: *const RawTimeValuePair, count: usize) -> Vec<Sample> {
    if data.is_null() {
        // Header-only reads leave the array unset; the count is not
        // trusted past a null pointer.
        return Vec::new();
    }
    std::slice::from_raw_parts(data, count)
        .iter()
        .map(|pair| Sample {
            time: pair.time,
            value: pair.value,
        })
        .collect()
}

/// Translate a filled measurement record into an owned [`MeasuredData`].
///
/// # Safety
///
/// `raw` must have been filled by a successful engine decode and must
/// stay valid (not released) for the duration of the call.
pub(crate) unsafe fn measured_data_from_raw(raw: &RawMeasuredData) -> Result<MeasuredData> {
    let file_type = FileType::from_raw(raw.file_type);

    // The wavelength fields carry meaning only for DAD traces; for any
    // other file type they are absent no matter what the engine left in
    // them.
    let (detection_wavelength, reference_wavelength) = if file_type == FileType::Dad {
        (
            wavelength_from_raw(raw.dad_wavelength_msr),
            wavelength_from_raw(raw.dad_wavelength_ref),
        )
    } else {
        (None, None)
    };

    Ok(MeasuredData {
        file_description: text_from_raw(raw.file_description)?,
        sample_info: text_from_raw(raw.sample_info)?,
        operator_name: text_from_raw(raw.operator_name)?,
        date: timestamp_from_raw(&raw.date),
        method_name: text_from_raw(raw.method_name)?,
        software_version: text_from_raw(raw.cs_ver)?,
        software_revision: text_from_raw(raw.cs_rev)?,
        y_units: text_from_raw(raw.y_units)?,
        sampling_rate: sampling_rate_from_raw(raw.sampling_rate),
        detection_wavelength,
        reference_wavelength,
        file_type,
        samples: samples_from_raw(raw.data, raw.data_count),
    })
}

/// Translate a filled method-info record into an owned [`MethodInfo`].
///
/// Duplicate parameter names resolve last-write-wins, in block order.
///
/// # Safety
///
/// `raw` must have been filled by a successful engine decode and must
/// stay valid (not released) for the duration of the call.
pub(crate) unsafe fn method_info_from_raw(raw: &RawMethodInfo) -> Result<MethodInfo> {
    let mut parameters = HashMap::with_capacity(raw.count);
    if !raw.blocks.is_null() {
        for block in std::slice::from_raw_parts(raw.blocks, raw.count) {
            let name = text_from_raw(block.name)?;
            let value = text_from_raw(block.value)?;
            parameters.insert(name, value);
        }
    }
    Ok(MethodInfo::from_map(parameters))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::RawMethodInfoBlock;
    use bytemuck::Zeroable;
    use proptest::prelude::*;
    use std::ffi::CString;

    /// Backing storage for a fixture record; keeps the CStrings and the
    /// sample array alive while the raw struct borrows their pointers.
    struct MeasuredFixture {
        strings: Vec<CString>,
        samples: Vec<RawTimeValuePair>,
    }

    impl MeasuredFixture {
        fn new(samples: Vec<RawTimeValuePair>) -> Self {
            let strings = [
                "LC DATA FILE",
                "plasma calibration 3",
                "A. Operator",
                "CAL3.M",
                "B.04.03",
                "[016]",
                "mAU",
            ]
            .iter()
            .map(|s| CString::new(*s).unwrap())
            .collect();
            MeasuredFixture { strings, samples }
        }

        fn raw(&mut self, file_type: FileType) -> RawMeasuredData {
            let mut raw = RawMeasuredData::zeroed();
            raw.file_description = self.strings[0].as_ptr() as *mut _;
            raw.sample_info = self.strings[1].as_ptr() as *mut _;
            raw.operator_name = self.strings[2].as_ptr() as *mut _;
            raw.method_name = self.strings[3].as_ptr() as *mut _;
            raw.cs_ver = self.strings[4].as_ptr() as *mut _;
            raw.cs_rev = self.strings[5].as_ptr() as *mut _;
            raw.y_units = self.strings[6].as_ptr() as *mut _;
            raw.date = RawDate {
                year: 2004,
                month: 7,
                day: 21,
                hour: 13,
                minute: 5,
                second: 9,
            };
            raw.sampling_rate = 10.0;
            raw.file_type = file_type.as_raw();
            raw.data = self.samples.as_mut_ptr();
            raw.data_count = self.samples.len();
            raw
        }
    }

    fn pair(time: f64, value: f64) -> RawTimeValuePair {
        RawTimeValuePair { time, value }
    }

    #[test]
    fn full_record_roundtrip() {
        let mut fixture = MeasuredFixture::new(vec![
            pair(0.0, 0.02),
            pair(0.1, 1.75),
            pair(0.2, -0.4),
        ]);
        let mut raw = fixture.raw(FileType::Dad);
        raw.dad_wavelength_msr = RawWavelength {
            wavelength: 280,
            interval: 4,
        };
        raw.dad_wavelength_ref = RawWavelength {
            wavelength: 360,
            interval: 0,
        };

        let data = unsafe { measured_data_from_raw(&raw) }.unwrap();
        assert_eq!(data.file_description, "LC DATA FILE");
        assert_eq!(data.sample_info, "plasma calibration 3");
        assert_eq!(data.operator_name, "A. Operator");
        assert_eq!(data.method_name, "CAL3.M");
        assert_eq!(data.software_version, "B.04.03");
        assert_eq!(data.software_revision, "[016]");
        assert_eq!(data.y_units, "mAU");
        assert_eq!(data.date.year, 2004);
        assert_eq!(data.date.month, 7);
        assert_eq!(data.sampling_rate, Some(10.0));
        assert_eq!(data.file_type, FileType::Dad);
        assert_eq!(
            data.detection_wavelength,
            Some(Wavelength {
                wavelength: 280,
                interval: Some(4)
            })
        );
        assert_eq!(
            data.reference_wavelength,
            Some(Wavelength {
                wavelength: 360,
                interval: None
            })
        );
        assert_eq!(data.samples.len(), 3);
        assert_eq!(data.samples[1], Sample { time: 0.1, value: 1.75 });
    }

    #[test]
    fn sample_order_is_preserved() {
        // Deliberately non-monotonic times: the trace is copied as-is,
        // not resorted.
        let mut fixture =
            MeasuredFixture::new(vec![pair(0.3, 1.0), pair(0.1, 2.0), pair(0.2, 3.0)]);
        let raw = fixture.raw(FileType::Ccd);
        let data = unsafe { measured_data_from_raw(&raw) }.unwrap();
        let times: Vec<f64> = data.samples.iter().map(|s| s.time).collect();
        assert_eq!(times, vec![0.3, 0.1, 0.2]);
    }

    #[test]
    fn sampling_rate_sentinel_maps_to_none() {
        let mut fixture = MeasuredFixture::new(Vec::new());
        let mut raw = fixture.raw(FileType::Voltage);
        raw.sampling_rate = SAMPLING_RATE_UNKNOWN;
        let data = unsafe { measured_data_from_raw(&raw) }.unwrap();
        assert_eq!(data.sampling_rate, None);
    }

    #[test]
    fn sampling_rate_zero_and_negative_pass_through() {
        for rate in [0.0, -0.5, -2.0, 1e-9] {
            assert_eq!(sampling_rate_from_raw(rate), Some(rate));
        }
        assert_eq!(sampling_rate_from_raw(-1.0), None);
    }

    #[test]
    fn wavelengths_ignored_for_non_dad_files() {
        let mut fixture = MeasuredFixture::new(Vec::new());
        let mut raw = fixture.raw(FileType::Current);
        // Non-zero native content must still come out absent.
        raw.dad_wavelength_msr = RawWavelength {
            wavelength: 280,
            interval: 4,
        };
        raw.dad_wavelength_ref = RawWavelength {
            wavelength: 360,
            interval: 8,
        };
        let data = unsafe { measured_data_from_raw(&raw) }.unwrap();
        assert_eq!(data.detection_wavelength, None);
        assert_eq!(data.reference_wavelength, None);
    }

    #[test]
    fn wavelength_zero_sentinel_discards_interval() {
        assert_eq!(
            wavelength_from_raw(RawWavelength {
                wavelength: 0,
                interval: 7
            }),
            None
        );
        assert_eq!(
            wavelength_from_raw(RawWavelength {
                wavelength: 280,
                interval: 0
            }),
            Some(Wavelength {
                wavelength: 280,
                interval: None
            })
        );
        assert_eq!(
            wavelength_from_raw(RawWavelength {
                wavelength: 280,
                interval: 4
            }),
            Some(Wavelength {
                wavelength: 280,
                interval: Some(4)
            })
        );
    }

    #[test]
    fn wavelength_fields_are_independent() {
        let mut fixture = MeasuredFixture::new(Vec::new());
        let mut raw = fixture.raw(FileType::Dad);
        raw.dad_wavelength_msr = RawWavelength {
            wavelength: 0,
            interval: 0,
        };
        raw.dad_wavelength_ref = RawWavelength {
            wavelength: 360,
            interval: 0,
        };
        let data = unsafe { measured_data_from_raw(&raw) }.unwrap();
        assert_eq!(data.detection_wavelength, None);
        assert!(data.reference_wavelength.is_some());
    }

    #[test]
    fn null_text_field_fails_translation() {
        let mut fixture = MeasuredFixture::new(Vec::new());
        let mut raw = fixture.raw(FileType::Analog);
        raw.operator_name = std::ptr::null_mut();
        let err = unsafe { measured_data_from_raw(&raw) }.unwrap_err();
        assert!(matches!(err, HpcsError::InvalidText));
    }

    #[test]
    fn invalid_utf8_fails_translation() {
        let mut fixture = MeasuredFixture::new(Vec::new());
        let mut raw = fixture.raw(FileType::Analog);
        static BAD: [u8; 3] = [0xFF, 0xFE, 0x00];
        raw.y_units = BAD.as_ptr() as *mut _;
        let err = unsafe { measured_data_from_raw(&raw) }.unwrap_err();
        assert!(matches!(err, HpcsError::InvalidText));
    }

    #[test]
    fn null_sample_array_yields_empty_trace() {
        let mut fixture = MeasuredFixture::new(Vec::new());
        let mut raw = fixture.raw(FileType::Analog);
        raw.data = std::ptr::null_mut();
        raw.data_count = 128;
        let data = unsafe { measured_data_from_raw(&raw) }.unwrap();
        assert!(data.samples.is_empty());
    }

    #[test]
    fn method_info_duplicate_names_last_write_wins() {
        let names: Vec<CString> = ["k", "k"]
            .iter()
            .map(|s| CString::new(*s).unwrap())
            .collect();
        let values: Vec<CString> = ["a", "b"]
            .iter()
            .map(|s| CString::new(*s).unwrap())
            .collect();
        let blocks: Vec<RawMethodInfoBlock> = names
            .iter()
            .zip(&values)
            .map(|(n, v)| RawMethodInfoBlock {
                name: n.as_ptr() as *mut _,
                value: v.as_ptr() as *mut _,
            })
            .collect();
        let raw = RawMethodInfo {
            blocks: blocks.as_ptr() as *mut _,
            count: blocks.len(),
        };
        let info = unsafe { method_info_from_raw(&raw) }.unwrap();
        assert_eq!(info.len(), 1);
        assert_eq!(info.get("k"), Some("b"));
    }

    #[test]
    fn empty_method_info_translates_to_empty_map() {
        let raw = RawMethodInfo::zeroed();
        let info = unsafe { method_info_from_raw(&raw) }.unwrap();
        assert!(info.is_empty());
    }

    proptest! {
        #[test]
        fn sampling_rate_passes_through_all_non_sentinel_values(
            rate in prop::num::f64::NORMAL | prop::num::f64::ZERO
        ) {
            prop_assume!(rate != SAMPLING_RATE_UNKNOWN);
            prop_assert_eq!(sampling_rate_from_raw(rate), Some(rate));
        }
    }
}
