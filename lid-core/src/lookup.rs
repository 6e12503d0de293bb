//! Precomputed, pre-formatted engineering-unit strings for every possible raw 16-bit sample.
//!
//! Logger files commonly carry hundreds of millions of samples; precomputing these tables once,
//! after the calibration record is known, removes per-sample arithmetic and `Display` formatting
//! from the decode loop.
use crate::host_storage::{Axis, HostStorage};

const I16_RANGE: usize = 65536;
/// Valid raw thermistor samples are `0` (invalid-sample marker) through `65534`; `65535` is not a
/// usable value (it would divide by zero in the Steinhart-Hart resistance term).
const TEMP_RANGE: usize = 65535;

/// Three precomputed string tables (accelerometer, magnetometer, thermometer), one table per
/// calibrated axis for the first two.
pub struct LookupTables {
    accel: [Vec<String>; 3],
    magne: [Vec<String>; 3],
    temp: Vec<String>,
}

impl LookupTables {
    /// Builds all lookup tables from a calibration record. This is the only place the crate does
    /// floating point formatting of sample values; everything downstream is a table lookup.
    pub fn build(hss: &HostStorage) -> Self {
        let accel = [
            Self::build_accel(hss, Axis::X),
            Self::build_accel(hss, Axis::Y),
            Self::build_accel(hss, Axis::Z),
        ];
        let magne = [
            Self::build_magne(hss, Axis::X),
            Self::build_magne(hss, Axis::Y),
            Self::build_magne(hss, Axis::Z),
        ];
        let temp = Self::build_temp(hss);
        LookupTables { accel, magne, temp }
    }

    fn build_accel(hss: &HostStorage, axis: Axis) -> Vec<String> {
        (i16::MIN..=i16::MAX)
            .map(|raw| format!("{:.5}", hss.accel(axis, raw)))
            .collect()
    }

    fn build_magne(hss: &HostStorage, axis: Axis) -> Vec<String> {
        (i16::MIN..=i16::MAX)
            .map(|raw| format!("{:.2}", hss.magne(axis, raw)))
            .collect()
    }

    fn build_temp(hss: &HostStorage) -> Vec<String> {
        let mut table = Vec::with_capacity(TEMP_RANGE);
        table.push("0".to_string());
        for raw in 1..=65534u16 {
            let celsius = hss.temperature(raw).expect("raw != 0 always converts");
            table.push(format!("{:.4}", celsius));
        }
        table
    }

    fn accel_index(raw: i16) -> usize {
        (raw as i32 - i16::MIN as i32) as usize
    }

    /// Looks up the pre-formatted accelerometer reading for a raw sample on the given axis.
    pub fn accel(&self, axis: Axis, raw: i16) -> &str {
        &self.accel[axis as usize][Self::accel_index(raw)]
    }

    /// Looks up the pre-formatted magnetometer reading for a raw sample on the given axis.
    pub fn magne(&self, axis: Axis, raw: i16) -> &str {
        &self.magne[axis as usize][Self::accel_index(raw)]
    }

    /// Looks up the pre-formatted temperature reading for a raw sample in `0..=65534`. Index `0`
    /// always yields the literal invalid-sample marker `"0"`.
    pub fn temp(&self, raw: u16) -> &str {
        &self.temp[raw as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_sizes() {
        let tables = LookupTables::build(&HostStorage::default());
        for axis_table in &tables.accel {
            assert_eq!(axis_table.len(), I16_RANGE);
        }
        for axis_table in &tables.magne {
            assert_eq!(axis_table.len(), I16_RANGE);
        }
        assert_eq!(tables.temp.len(), TEMP_RANGE);
    }

    #[test]
    fn temp_zero_is_literal_sentinel() {
        let tables = LookupTables::build(&HostStorage::default());
        assert_eq!(tables.temp(0), "0");
    }

    #[test]
    fn accel_matches_direct_computation() {
        let hss = HostStorage::default();
        let tables = LookupTables::build(&hss);
        assert_eq!(
            tables.accel(Axis::X, 1024),
            format!("{:.5}", hss.accel(Axis::X, 1024))
        );
    }

    #[test]
    fn temp_matches_direct_computation() {
        let hss = HostStorage::default();
        let tables = LookupTables::build(&hss);
        assert_eq!(
            tables.temp(30000),
            format!("{:.4}", hss.temperature(30000).unwrap())
        );
    }
}
