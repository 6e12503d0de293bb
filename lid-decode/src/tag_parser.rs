//! Parses the two tagged-region flavors used by logger headers: CRLF-delimited `TTT value`
//! lines, and the length-prefixed `TTTLV...V` records found inside the `HSS`/`HSE` calibration
//! region.
use lid_core::LidError;
use std::collections::BTreeMap;

const STRUCTURAL_MARKERS: [&str; 6] = ["HDS", "HDE", "MHS", "MHE", "HSS", "HSE"];

/// A parsed tag region: raw string values keyed by their 3-letter tag.
#[derive(Debug, Clone, Default)]
pub struct TagMap(BTreeMap<String, String>);

impl TagMap {
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.0.get(tag).map(String::as_str)
    }

    pub fn require(&self, tag: &'static str) -> Result<&str, LidError> {
        self.get(tag).ok_or(LidError::MissingField { tag })
    }

    pub fn require_u32(&self, tag: &'static str) -> Result<u32, LidError> {
        self.require(tag)?
            .parse()
            .map_err(|_| LidError::BadHeader {
                msg: format!("{} is not a valid integer", tag),
            })
    }

    pub fn require_bool(&self, tag: &'static str) -> Result<bool, LidError> {
        match self.require(tag)? {
            "1" => Ok(true),
            "0" => Ok(false),
            other => Err(LidError::BadHeader {
                msg: format!("{} should be \"0\" or \"1\", got {:?}", tag, other),
            }),
        }
    }

    pub fn get_i32(&self, tag: &str, default: i32) -> Result<i32, LidError> {
        match self.get(tag) {
            None => Ok(default),
            Some(v) => v.parse().map_err(|_| LidError::BadHeader {
                msg: format!("{} is not a valid integer", tag),
            }),
        }
    }

    pub fn get_f64(&self, tag: &str, default: f64) -> Result<f64, LidError> {
        match self.get(tag) {
            None => Ok(default),
            Some(v) => v.parse().map_err(|_| LidError::BadHeader {
                msg: format!("{} is not a valid number", tag),
            }),
        }
    }

    fn insert(&mut self, tag: String, value: String) {
        self.0.insert(tag, value);
    }
}

/// Splits a CRLF-delimited region into `tag -> value` pairs. Structural markers (`HDS`, `HDE`,
/// `MHS`, `MHE`, `HSS`, `HSE`) are dropped. Lines with no space are skipped.
pub fn parse_crlf_tags(bytes: &[u8]) -> TagMap {
    let mut map = TagMap::default();
    for line in bytes.split(|&b| b == b'\n') {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() {
            continue;
        }
        let text = String::from_utf8_lossy(line);
        let text = text.trim();
        if text.len() < 3 {
            continue;
        }
        let (tag, rest) = text.split_at(3);
        if STRUCTURAL_MARKERS.contains(&tag) {
            continue;
        }
        let value = match rest.strip_prefix(' ') {
            Some(v) => v,
            None => continue,
        };
        map.insert(tag.to_string(), value.to_string());
    }
    map
}

/// Parses the length-prefixed `TTTLV...V` records found between `HSS` and `HSE`, where `L` is a
/// single ASCII hex digit giving the byte length of `V`. Stops at the first `HSE` marker.
pub fn parse_length_prefixed_tags(mut bytes: &[u8]) -> Result<TagMap, LidError> {
    let mut map = TagMap::default();
    loop {
        if bytes.is_empty() || bytes.starts_with(b"HSE") {
            break;
        }
        if bytes.len() < 4 {
            return Err(LidError::BadHeader {
                msg: "truncated host-storage record".to_string(),
            });
        }
        let tag = std::str::from_utf8(&bytes[0..3]).map_err(|_| LidError::BadHeader {
            msg: "host-storage tag is not ASCII".to_string(),
        })?;
        let len_char = bytes[3] as char;
        let len = len_char.to_digit(16).ok_or_else(|| LidError::BadHeader {
            msg: format!("host-storage length byte {:?} is not a hex digit", len_char),
        })? as usize;
        if bytes.len() < 4 + len {
            return Err(LidError::BadHeader {
                msg: format!("host-storage record for {} is truncated", tag),
            });
        }
        let value = std::str::from_utf8(&bytes[4..4 + len])
            .map_err(|_| LidError::BadHeader {
                msg: format!("host-storage value for {} is not ASCII", tag),
            })?
            .to_string();
        map.insert(tag.to_string(), value);
        bytes = &bytes[4 + len..];
    }
    Ok(map)
}
