//! Calibration record ("host storage") for a logger file, and the Steinhart-Hart
//! thermistor inversion used to turn a raw sample into a temperature.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The calibration record embedded in a logger file's `HSS`/`HSE` region, or the compiled-in
/// defaults when that region is absent (or when [`crate::settings::LidSettings::force_default_host_storage`]
/// is set).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct HostStorage {
    pub axa: i32,
    pub aya: i32,
    pub aza: i32,
    pub axb: i32,
    pub ayb: i32,
    pub azb: i32,
    pub mxa: i32,
    pub mya: i32,
    pub mza: i32,
    pub mxs: f64,
    pub mys: f64,
    pub mzs: f64,
    pub tmo: i32,
    pub tmr: i32,
    pub tma: f64,
    pub tmb: f64,
    pub tmc: f64,
}

impl Default for HostStorage {
    /// The factory calibration used when a file carries no `HSS` region.
    /// ```
    /// use lid_core::host_storage::HostStorage;
    ///
    /// let hss = HostStorage::default();
    /// assert_eq!(hss.axb, 1024);
    /// assert_eq!(hss.tmr, 10000);
    /// ```
    fn default() -> Self {
        HostStorage {
            axa: 0,
            aya: 0,
            aza: 0,
            axb: 1024,
            ayb: 1024,
            azb: 1024,
            mxa: 0,
            mya: 0,
            mza: 0,
            mxs: 0.91743,
            mys: 0.91743,
            mzs: 0.91743,
            tmo: 0,
            tmr: 10000,
            tma: 0.0011238100354,
            tmb: 0.0002349457073,
            tmc: 8.48361e-8,
        }
    }
}

impl HostStorage {
    /// Converts a raw accelerometer sample on the given axis to g, using that axis's offset and
    /// scale.
    pub fn accel(&self, axis: Axis, raw: i16) -> f64 {
        let (a, b) = match axis {
            Axis::X => (self.axa, self.axb),
            Axis::Y => (self.aya, self.ayb),
            Axis::Z => (self.aza, self.azb),
        };
        raw as f64 / b as f64 + a as f64
    }

    /// Converts a raw magnetometer sample on the given axis to mG.
    pub fn magne(&self, axis: Axis, raw: i16) -> f64 {
        let (a, s) = match axis {
            Axis::X => (self.mxa, self.mxs),
            Axis::Y => (self.mya, self.mys),
            Axis::Z => (self.mza, self.mzs),
        };
        s * raw as f64 + a as f64
    }

    /// Converts a raw thermistor sample to degrees Celsius via the Steinhart-Hart equation.
    ///
    /// Returns `None` for the reserved invalid raw value `0`.
    /// ```
    /// use lid_core::host_storage::HostStorage;
    ///
    /// let hss = HostStorage::default();
    /// assert!(hss.temperature(0).is_none());
    /// assert!(hss.temperature(32000).is_some());
    /// ```
    pub fn temperature(&self, raw: u16) -> Option<f64> {
        if raw == 0 {
            return None;
        }
        let shifted = raw as i64 + self.tmo as i64;
        let resistance = self.tmr as f64 * shifted as f64 / (65535.0 - shifted as f64);
        let ln_r = resistance.ln();
        let inv_kelvin = self.tma + self.tmb * ln_r + self.tmc * ln_r.powi(3);
        Some(1.0 / inv_kelvin - 273.15)
    }
}

/// One of the three spatial axes of the accelerometer / magnetometer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}
