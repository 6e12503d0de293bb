//! Computes the byte layout of the repeating measurement block within a data page, given the
//! channel flags and sampling intervals carried by the mini-header template.
use crate::errors::LidError;

/// The byte layout of one repeating measurement block, plus enough of the sampling schedule to
/// reconstruct per-sample timestamps while decoding.
///
/// Rather than generating a distinct decode routine per channel/interval combination, the block
/// shape is carried as data and a single decode loop branches on [`PatternPlan::case`] once per
/// page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternPlan {
    pub has_temp: bool,
    /// Samples per burst: 0, 3 (one of ACL/MGN) or 6 (both).
    pub channels: usize,
    pub bmn: u32,
    pub bmr: u32,
    pub case: Case,
}

/// Which of the two sampling schedules a file's mini-header template selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    /// Orientation samples at least as often as temperature (`ori <= tri`). One temperature
    /// reading covers `mul = tri / ori` orientation intervals.
    OrientationLed { mul: u32, ori_seconds: u32 },
    /// Temperature samples more often than orientation (`ori > tri`). One orientation interval
    /// covers `mul = ori / tri` temperature readings.
    TemperatureLed { mul: u32, tri_seconds: u32 },
}

impl PatternPlan {
    /// Builds a plan from the channel flags and intervals found in a mini-header template.
    ///
    /// Returns [`LidError::InvalidConfig`] if `tri`/`ori` are not both positive and mutually
    /// divisible, or if `bmn`/`bmr` are not positive.
    /// ```
    /// use lid_core::pattern::{PatternPlan, Case};
    ///
    /// let plan = PatternPlan::new(true, true, false, 10, 10, 1, 1).unwrap();
    /// assert_eq!(plan.channels, 3);
    /// assert_eq!(plan.block_bytes(), 2 + 3 * 2);
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tmp: bool,
        acl: bool,
        mgn: bool,
        tri: u32,
        ori: u32,
        bmn: u32,
        bmr: u32,
    ) -> Result<Self, LidError> {
        if tri == 0 || ori == 0 {
            return Err(LidError::InvalidConfig {
                msg: "TRI and ORI must both be positive".to_string(),
            });
        }
        if bmn == 0 || bmr == 0 {
            return Err(LidError::InvalidConfig {
                msg: "BMN and BMR must both be positive".to_string(),
            });
        }
        let channels = match (acl, mgn) {
            (false, false) => 0,
            (true, false) | (false, true) => 3,
            (true, true) => 6,
        };
        let case = if ori <= tri {
            if tri % ori != 0 {
                return Err(LidError::InvalidConfig {
                    msg: format!("TRI ({}) is not a multiple of ORI ({})", tri, ori),
                });
            }
            Case::OrientationLed {
                mul: tri / ori,
                ori_seconds: ori,
            }
        } else {
            if ori % tri != 0 {
                return Err(LidError::InvalidConfig {
                    msg: format!("ORI ({}) is not a multiple of TRI ({})", ori, tri),
                });
            }
            Case::TemperatureLed {
                mul: ori / tri,
                tri_seconds: tri,
            }
        };
        Ok(PatternPlan {
            has_temp: tmp,
            channels,
            bmn,
            bmr,
            case,
        })
    }

    /// Number of signed 16-bit orientation samples in one burst (one `ORI` interval).
    pub fn samples_per_orientation_interval(&self) -> usize {
        self.bmn as usize * self.channels
    }

    /// The total byte size of one repeating block, as laid out in the page data.
    pub fn block_bytes(&self) -> usize {
        let orientation_run = self.samples_per_orientation_interval();
        match self.case {
            Case::OrientationLed { mul, .. } => {
                let temp_bytes = if self.has_temp { 2 } else { 0 };
                temp_bytes + orientation_run * mul as usize * 2
            }
            Case::TemperatureLed { mul, .. } => {
                let primary_temp = if self.has_temp { 2 } else { 0 };
                let trailing_temps = if self.has_temp {
                    (mul as usize).saturating_sub(1) * 2
                } else {
                    0
                };
                primary_temp + orientation_run * 2 + trailing_temps
            }
        }
    }

    /// The period, in seconds, that one block spans, i.e. the time between the start of one
    /// block and the next.
    pub fn block_period_seconds(&self) -> u32 {
        match self.case {
            Case::OrientationLed { ori_seconds, mul } => ori_seconds * mul,
            Case::TemperatureLed { tri_seconds, mul } => tri_seconds * mul,
        }
    }

    /// `true` if this plan describes a block carrying no samples at all (neither temperature nor
    /// orientation channels enabled). A file with such a plan decodes to an empty stream.
    pub fn is_empty(&self) -> bool {
        !self.has_temp && self.channels == 0
    }
}
