//! This module contains the [`LidSettings`] structure which can be used to customise the
//! logger-file parsing.
//!
//! NB: Most logger files in the wild carry a calibration (`HSS`) record, but field units that
//! shipped with an early firmware revision do not. `force_default_host_storage` exists for
//! exactly that case; using it on a file that does carry calibration silently discards it, so it
//! should be set with care.
use crate::errors::LidError;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
/// A list of overrides for the custom reading of a logger file.
///
/// This structure does not allow direct manipulation of fields, since not all combinations of
/// values are valid (eg. the format is little-endian only, so overriding to big-endian is
/// rejected at header-parse time rather than silently ignored). Use the setter and getter
/// functions instead.
pub struct LidSettings {
    /// Ignore any `HSS` region present and use [`crate::host_storage::HostStorage::default`].
    pub(crate) force_default_host_storage: bool,
    /// Reserved for forwards compatibility: the wire format is little-endian only, so `Some(false)`
    /// causes header parsing to fail with [`LidError::InvalidConfig`].
    pub(crate) override_to_le: Option<bool>,
}

impl LidSettings {
    #[cfg(feature = "to_json")]
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(&self).map_err(|e| e.to_string())
    }

    /// Forces the use of the compiled-in default host-storage (calibration) record, even when
    /// the file carries its own `HSS` region.
    /// ```
    /// use lid_core::settings::LidSettings;
    ///
    /// let mut settings = LidSettings::default();
    /// assert!(!settings.get_force_default_host_storage());
    ///
    /// settings.set_force_default_host_storage(true);
    /// assert!(settings.get_force_default_host_storage());
    /// ```
    pub fn set_force_default_host_storage(&mut self, force: bool) {
        self.force_default_host_storage = force;
    }

    /// Gets whether the default host-storage record is forced.
    pub fn get_force_default_host_storage(&self) -> bool {
        self.force_default_host_storage
    }

    /// Overrides the assumed endianness. The wire format is little-endian only; setting this to
    /// `false` is accepted here but causes header parsing to fail, so that the rejection carries
    /// file context rather than happening deep inside a setter.
    /// ```
    /// use lid_core::settings::LidSettings;
    ///
    /// let mut settings = LidSettings::default();
    /// assert!(settings.get_override_to_le().is_none());
    ///
    /// settings.set_override_to_le(true);
    /// assert_eq!(settings.get_override_to_le(), Some(true));
    /// ```
    pub fn set_override_to_le(&mut self, le: bool) {
        self.override_to_le = Some(le);
    }

    /// Gets the endianness override, if any.
    pub fn get_override_to_le(&self) -> Option<bool> {
        self.override_to_le
    }

    /// Validates the endianness override, if set. Called once by the header parser.
    pub fn check_endianness(&self) -> Result<(), LidError> {
        if self.override_to_le == Some(false) {
            return Err(LidError::InvalidConfig {
                msg: "logger files are little-endian only; override_to_le(false) is unsupported"
                    .to_string(),
            });
        }
        Ok(())
    }
}
