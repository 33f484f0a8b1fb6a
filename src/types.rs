// src/types.rs
use std::collections::HashMap;
use std::fmt;

/// Kind of data carried by a ChemStation file.
///
/// Determines the meaning of the trace values and whether the DAD
/// wavelength fields apply. Detection of `Power` and `Pressure` data by
/// the engine may be unreliable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    /// Analog signal of unspecified type
    Analog,
    /// Analog signal, usually from a conductivity detector
    Ccd,
    /// Electric current in the CE system
    Current,
    /// UV/VIS detector signal trace
    Dad,
    /// Electric power in the CE system
    Power,
    /// Air pressure applied onto the CE system
    Pressure,
    /// Temperature of the cassette
    Temperature,
    /// Electric voltage in the CE system
    Voltage,
    /// Unknown type of data
    Unknown,
}

impl FileType {
    /// Map the engine's `HPCS_FileType` discriminant. Values outside the
    /// documented range fold into `Unknown`.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => FileType::Analog,
            1 => FileType::Ccd,
            2 => FileType::Current,
            3 => FileType::Dad,
            4 => FileType::Power,
            5 => FileType::Pressure,
            6 => FileType::Temperature,
            7 => FileType::Voltage,
            _ => FileType::Unknown,
        }
    }

    pub fn as_raw(self) -> i32 {
        match self {
            FileType::Analog => 0,
            FileType::Ccd => 1,
            FileType::Current => 2,
            FileType::Dad => 3,
            FileType::Power => 4,
            FileType::Pressure => 5,
            FileType::Temperature => 6,
            FileType::Voltage => 7,
            FileType::Unknown => 8,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            FileType::Analog => "Analog signal of unspecified type",
            FileType::Ccd => "Analog signal (conductivity detector)",
            FileType::Current => "Electric current in the CE system",
            FileType::Dad => "UV/VIS detector signal trace",
            FileType::Power => "Electric power in the CE system",
            FileType::Pressure => "Air pressure applied onto the CE system",
            FileType::Temperature => "Temperature of the cassette",
            FileType::Voltage => "Electric voltage in the CE system",
            FileType::Unknown => "Unknown type of data",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// When a measurement was taken.
///
/// `month` and `day` are `0` when the file does not record them; that is
/// a documented "unknown" marker, not an error, and no further range
/// validation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp {
    pub year: u32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.month, self.day) {
            (0, _) | (_, 0) => write!(f, "{:04}-??-??", self.year)?,
            (m, d) => write!(f, "{:04}-{:02}-{:02}", self.year, m, d)?,
        }
        write!(f, " {:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

/// DAD detector wavelength, in nanometers.
///
/// `interval` is the spectral interval around the wavelength and is
/// `None` when the file does not record one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Wavelength {
    pub wavelength: u16,
    pub interval: Option<u16>,
}

/// One point of a signal trace. Time is in minutes; the value unit
/// depends on [`FileType`] and [`MeasuredData::y_units`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub value: f64,
}

/// A decoded measurement: metadata plus the signal trace.
///
/// Fully materialized on construction; owns independent copies of every
/// string and sample and has no tie to engine memory.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredData {
    /// Internal file type description, e.g. "LC DATA FILE".
    pub file_description: String,
    /// Sample description as entered by the operator.
    pub sample_info: String,
    /// Name of the operator who ran the measurement.
    pub operator_name: String,
    /// When the measurement was taken.
    pub date: Timestamp,
    /// Name of the method file used for the measurement.
    pub method_name: String,
    /// ChemStation software version.
    pub software_version: String,
    /// ChemStation software revision.
    pub software_revision: String,
    /// Unit of the trace values.
    pub y_units: String,
    /// Detector sampling rate in Hz; `None` when the file does not
    /// record one.
    pub sampling_rate: Option<f64>,
    /// Detection wavelength; populated only for [`FileType::Dad`] files.
    pub detection_wavelength: Option<Wavelength>,
    /// Reference wavelength (noise compensation); populated only for
    /// [`FileType::Dad`] files.
    pub reference_wavelength: Option<Wavelength>,
    /// Kind of data in the file.
    pub file_type: FileType,
    /// The signal trace, in acquisition order. Empty for header-only
    /// reads.
    pub samples: Vec<Sample>,
}

/// Method parameters read from a .MTH file, keyed by parameter name.
///
/// When the file carries the same parameter name more than once, the
/// occurrence that comes later in the file wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MethodInfo {
    parameters: HashMap<String, String>,
}

impl MethodInfo {
    pub(crate) fn from_map(parameters: HashMap<String, String>) -> Self {
        MethodInfo { parameters }
    }

    /// Value of the named parameter, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Iterate over (name, value) pairs. Order is not meaningful.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parameters
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> HashMap<String, String> {
        self.parameters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_type_raw_roundtrip() {
        for raw in 0..=8 {
            let ft = FileType::from_raw(raw);
            assert_eq!(ft.as_raw(), raw);
        }
    }

    #[test]
    fn file_type_out_of_range_is_unknown() {
        assert_eq!(FileType::from_raw(9), FileType::Unknown);
        assert_eq!(FileType::from_raw(-1), FileType::Unknown);
        assert_eq!(FileType::from_raw(i32::MAX), FileType::Unknown);
    }

    #[test]
    fn timestamp_display_marks_unknown_fields() {
        let known = Timestamp {
            year: 2004,
            month: 7,
            day: 21,
            hour: 13,
            minute: 5,
            second: 9,
        };
        assert_eq!(known.to_string(), "2004-07-21 13:05:09");

        let unknown = Timestamp {
            year: 2004,
            month: 0,
            day: 0,
            hour: 13,
            minute: 5,
            second: 9,
        };
        assert_eq!(unknown.to_string(), "2004-??-?? 13:05:09");
    }

    #[test]
    fn method_info_lookup() {
        let mut map = HashMap::new();
        map.insert("Column".to_string(), "ZORBAX SB-C18".to_string());
        let info = MethodInfo::from_map(map);
        assert_eq!(info.get("Column"), Some("ZORBAX SB-C18"));
        assert_eq!(info.get("Flow"), None);
        assert_eq!(info.len(), 1);
        assert!(!info.is_empty());
    }
}
