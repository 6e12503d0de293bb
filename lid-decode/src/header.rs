//! Parses the 32 KiB main header of a logger file into instrument settings, the mini-header
//! template shared by every page, and the calibration record.
use crate::tag_parser::{parse_crlf_tags, parse_length_prefixed_tags, TagMap};
use lid_core::errors::LidError;
use lid_core::host_storage::HostStorage;
use lid_core::settings::LidSettings;

/// Channel flags and sampling intervals shared by every page in the file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiniHeaderTemplate {
    pub tmp: bool,
    pub acl: bool,
    pub mgn: bool,
    pub tri: u32,
    pub ori: u32,
    pub bmr: u32,
    pub bmn: u32,
}

impl MiniHeaderTemplate {
    fn from_tags(tags: &TagMap) -> Result<Self, LidError> {
        Ok(MiniHeaderTemplate {
            tmp: tags.require_bool("TMP")?,
            acl: tags.require_bool("ACL")?,
            mgn: tags.require_bool("MGN")?,
            tri: tags.require_u32("TRI")?,
            ori: tags.require_u32("ORI")?,
            bmr: tags.require_u32("BMR")?,
            bmn: tags.require_u32("BMN")?,
        })
    }
}

/// Opaque instrument configuration carried outside the mini-header and host-storage regions.
/// Not consumed by the decoder, but retained so a caller inspecting a file programmatically can
/// still read it.
#[derive(Debug, Clone, Default)]
pub struct InstrumentSettings(TagMap);

impl InstrumentSettings {
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.0.get(tag)
    }
}

/// The fully parsed main header.
pub struct Header {
    pub settings: InstrumentSettings,
    pub template: MiniHeaderTemplate,
    pub host_storage: HostStorage,
    /// Byte length of one mini-header, i.e. `MHE\r\n` minus `MHS`'s start offset. Every per-page
    /// mini-header occupies exactly this many bytes.
    pub mini_header_size: usize,
}

/// Locates the last occurrence of `needle` in `haystack`.
fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .rposition(|window| window == needle)
}

impl Header {
    /// Parses the main header from the first [`lid_core::MAIN_HEADER_LEN`] bytes of the file.
    pub fn parse(block: &[u8], settings: &LidSettings) -> Result<Self, LidError> {
        settings.check_endianness()?;

        let mh_start = rfind(block, b"MHS").ok_or_else(|| LidError::BadHeader {
            msg: "main header has no MHS marker".to_string(),
        })?;
        let mhe_pos = rfind(block, b"MHE").ok_or_else(|| LidError::BadHeader {
            msg: "main header has no MHE marker".to_string(),
        })?;
        let mh_end = mhe_pos + "MHE\r\n".len();
        if mh_end > block.len() {
            return Err(LidError::BadHeader {
                msg: "MHE marker runs past the main header".to_string(),
            });
        }

        let hss_start = rfind(block, b"HSS");

        let mini_header_tags = parse_crlf_tags(&block[mh_start..mh_end]);
        let template = MiniHeaderTemplate::from_tags(&mini_header_tags)?;

        let settings_region_end = hss_start.unwrap_or(block.len());
        let mut settings_bytes = Vec::with_capacity(mh_start + (settings_region_end - mh_end));
        settings_bytes.extend_from_slice(&block[..mh_start]);
        settings_bytes.extend_from_slice(&block[mh_end..settings_region_end]);
        let instrument_settings = InstrumentSettings(parse_crlf_tags(&settings_bytes));

        let host_storage = if settings.get_force_default_host_storage() {
            HostStorage::default()
        } else {
            match hss_start {
                None => HostStorage::default(),
                Some(hss_start) => {
                    let hss_tags = parse_length_prefixed_tags(&block[hss_start + 3..])?;
                    host_storage_from_tags(&hss_tags)?
                }
            }
        };

        Ok(Header {
            settings: instrument_settings,
            template,
            host_storage,
            mini_header_size: mh_end - mh_start,
        })
    }
}

fn host_storage_from_tags(tags: &TagMap) -> Result<HostStorage, LidError> {
    let default = HostStorage::default();
    Ok(HostStorage {
        axa: tags.get_i32("AXA", default.axa)?,
        aya: tags.get_i32("AYA", default.aya)?,
        aza: tags.get_i32("AZA", default.aza)?,
        axb: tags.get_i32("AXB", default.axb)?,
        ayb: tags.get_i32("AYB", default.ayb)?,
        azb: tags.get_i32("AZB", default.azb)?,
        mxa: tags.get_i32("MXA", default.mxa)?,
        mya: tags.get_i32("MYA", default.mya)?,
        mza: tags.get_i32("MZA", default.mza)?,
        mxs: tags.get_f64("MXS", default.mxs)?,
        mys: tags.get_f64("MYS", default.mys)?,
        mzs: tags.get_f64("MZS", default.mzs)?,
        tmo: tags.get_i32("TMO", default.tmo)?,
        tmr: tags.get_i32("TMR", default.tmr)?,
        tma: tags.get_f64("TMA", default.tma)?,
        tmb: tags.get_f64("TMB", default.tmb)?,
        tmc: tags.get_f64("TMC", default.tmc)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header_bytes() -> Vec<u8> {
        let mut block = Vec::new();
        block.extend_from_slice(b"HDS\r\n");
        block.extend_from_slice(b"LED 1\r\n");
        block.extend_from_slice(b"MHS\r\n");
        block.extend_from_slice(b"TMP 1\r\n");
        block.extend_from_slice(b"ACL 1\r\n");
        block.extend_from_slice(b"MGN 0\r\n");
        block.extend_from_slice(b"TRI 10\r\n");
        block.extend_from_slice(b"ORI 10\r\n");
        block.extend_from_slice(b"BMR 1\r\n");
        block.extend_from_slice(b"BMN 1\r\n");
        block.extend_from_slice(b"CLK 2020-01-01 00:00:00\r\n");
        block.extend_from_slice(b"MHE\r\n");
        block.extend_from_slice(b"HDE\r\n");
        block.extend_from_slice(b"HSS");
        block.extend_from_slice(b"AXA10");
        block.extend_from_slice(b"HSE");
        block.resize(lid_core::MAIN_HEADER_LEN, 0xFF);
        block
    }

    #[test]
    fn parses_template_and_host_storage() {
        let block = sample_header_bytes();
        let header = Header::parse(&block, &LidSettings::default()).unwrap();
        assert!(header.template.tmp);
        assert!(header.template.acl);
        assert!(!header.template.mgn);
        assert_eq!(header.template.tri, 10);
        assert_eq!(header.host_storage.axa, 0);
        assert_eq!(header.settings.get("LED"), Some("1"));
    }

    #[test]
    fn missing_hss_uses_default_host_storage() {
        let mut block = Vec::new();
        block.extend_from_slice(b"MHS\r\nTMP 0\r\nACL 1\r\nMGN 1\r\nTRI 1\r\nORI 1\r\nBMR 1\r\nBMN 1\r\nCLK 2020-01-01 00:00:00\r\nMHE\r\n");
        block.resize(lid_core::MAIN_HEADER_LEN, 0xFF);
        let header = Header::parse(&block, &LidSettings::default()).unwrap();
        assert_eq!(header.host_storage, HostStorage::default());
    }

    #[test]
    fn force_default_ignores_present_hss() {
        let block = sample_header_bytes();
        let mut settings = LidSettings::default();
        settings.set_force_default_host_storage(true);
        let header = Header::parse(&block, &settings).unwrap();
        assert_eq!(header.host_storage, HostStorage::default());
    }

    #[test]
    fn missing_mhs_is_bad_header() {
        let mut block = vec![0u8; lid_core::MAIN_HEADER_LEN];
        block[0..3].copy_from_slice(b"xxx");
        let err = Header::parse(&block, &LidSettings::default()).unwrap_err();
        assert!(matches!(err, LidError::BadHeader { .. }));
    }
}
