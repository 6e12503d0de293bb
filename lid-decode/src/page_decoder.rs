//! Walks one data page: parses its mini-header, unpacks the repeating measurement blocks, and
//! writes CSV rows for the temperature and orientation sinks.
use crate::clock::{burst_offset, format_row_timestamp, parse_clk};
use crate::tag_parser::parse_crlf_tags;
use chrono::{Duration, NaiveDateTime};
use lid_core::errors::LidError;
use lid_core::host_storage::Axis;
use lid_core::lookup::LookupTables;
use lid_core::pattern::{Case, PatternPlan};
use lid_core::SENTINEL_LEN;
use std::io::Write;

#[derive(Debug, Clone, Copy)]
enum SlotKind {
    Temp,
    Orientation { channels: usize },
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    kind: SlotKind,
    offset: Duration,
    byte_len: usize,
}

/// Decodes the data pages of a single file against a fixed [`PatternPlan`] and [`LookupTables`].
pub struct PageDecoder<'a> {
    plan: PatternPlan,
    tables: &'a LookupTables,
    acl: bool,
    mgn: bool,
    mini_header_size: usize,
    slots: Vec<Slot>,
}

fn build_slots(plan: &PatternPlan) -> Vec<Slot> {
    let mut slots = Vec::new();
    match plan.case {
        Case::OrientationLed { mul, ori_seconds } => {
            if plan.has_temp {
                slots.push(Slot {
                    kind: SlotKind::Temp,
                    offset: Duration::zero(),
                    byte_len: 2,
                });
            }
            for m in 0..mul {
                let interval_start = Duration::seconds((m * ori_seconds) as i64);
                for b in 0..plan.bmn {
                    slots.push(Slot {
                        kind: SlotKind::Orientation {
                            channels: plan.channels,
                        },
                        offset: interval_start + burst_offset(b, plan.bmr),
                        byte_len: plan.channels * 2,
                    });
                }
            }
        }
        Case::TemperatureLed { mul, tri_seconds } => {
            if plan.has_temp {
                slots.push(Slot {
                    kind: SlotKind::Temp,
                    offset: Duration::zero(),
                    byte_len: 2,
                });
            }
            for b in 0..plan.bmn {
                slots.push(Slot {
                    kind: SlotKind::Orientation {
                        channels: plan.channels,
                    },
                    offset: burst_offset(b, plan.bmr),
                    byte_len: plan.channels * 2,
                });
            }
            if plan.has_temp {
                for m in 1..mul {
                    slots.push(Slot {
                        kind: SlotKind::Temp,
                        offset: Duration::seconds((m * tri_seconds) as i64),
                        byte_len: 2,
                    });
                }
            }
        }
    }
    slots
}

fn is_sentinel(bytes: &[u8]) -> bool {
    bytes.len() >= SENTINEL_LEN
        && bytes[..SENTINEL_LEN]
            .iter()
            .all(|&b| b == lid_core::SENTINEL_BYTE)
}

/// Scans `bytes` for the earliest offset in `0..limit` at which the end-of-data sentinel begins,
/// tolerating a sentinel that starts mid-block rather than only at a block-aligned offset.
fn find_sentinel(bytes: &[u8], limit: usize) -> Option<usize> {
    (0..limit.min(bytes.len())).find(|&i| is_sentinel(&bytes[i..]))
}

impl<'a> PageDecoder<'a> {
    pub fn new(
        plan: PatternPlan,
        tables: &'a LookupTables,
        acl: bool,
        mgn: bool,
        mini_header_size: usize,
    ) -> Self {
        let slots = build_slots(&plan);
        PageDecoder {
            plan,
            tables,
            acl,
            mgn,
            mini_header_size,
            slots,
        }
    }

    /// Writes the CSV column headers, once, to each sink.
    pub fn write_headers(
        &self,
        temp_out: &mut dyn Write,
        orient_out: &mut dyn Write,
    ) -> Result<(), LidError> {
        if self.plan.has_temp {
            write!(temp_out, "Date,Time,Temperature (C)\r\n")?;
        }
        let mut cols = String::from("Date,Time");
        if self.acl {
            cols.push_str(",Ax (g),Ay (g),Az (g)");
        }
        if self.mgn {
            cols.push_str(",Mx (mG),My (mG),Mz (mG)");
        }
        write!(orient_out, "{}\r\n", cols)?;
        Ok(())
    }

    /// Decodes one data page, appending its rows to the two sinks.
    pub fn decode_page(
        &self,
        page: &[u8],
        temp_out: &mut dyn Write,
        orient_out: &mut dyn Write,
    ) -> Result<(), LidError> {
        if page.len() < self.mini_header_size {
            return Err(LidError::ShortRead {
                have: page.len(),
                need: self.mini_header_size,
            });
        }
        let mini_header = parse_crlf_tags(&page[..self.mini_header_size]);
        let mut clk = parse_clk(mini_header.require("CLK")?)?;

        let block_region = &page[self.mini_header_size..];
        let block_bytes = self.plan.block_bytes();
        if block_bytes == 0 {
            return Ok(());
        }

        let mut cursor = 0usize;
        while cursor < block_region.len() {
            let remaining = &block_region[cursor..];
            // The sentinel can begin at any offset within the next candidate block, not just at
            // a block-aligned one, so scan forward rather than only checking byte 0.
            if let Some(sentinel_offset) = find_sentinel(remaining, block_bytes) {
                if sentinel_offset > 0 {
                    self.decode_partial_block(&remaining[..sentinel_offset], clk, temp_out, orient_out)?;
                }
                return Ok(());
            }
            if remaining.len() < block_bytes {
                self.decode_partial_block(remaining, clk, temp_out, orient_out)?;
                return Ok(());
            }
            self.decode_full_block(&remaining[..block_bytes], clk, temp_out, orient_out)?;
            cursor += block_bytes;
            clk += Duration::seconds(self.plan.block_period_seconds() as i64);
        }
        Ok(())
    }

    fn decode_full_block(
        &self,
        block: &[u8],
        clk: NaiveDateTime,
        temp_out: &mut dyn Write,
        orient_out: &mut dyn Write,
    ) -> Result<(), LidError> {
        let mut cursor = 0usize;
        for slot in &self.slots {
            self.decode_slot(slot, &block[cursor..cursor + slot.byte_len], clk, temp_out, orient_out)?;
            cursor += slot.byte_len;
        }
        Ok(())
    }

    fn decode_partial_block(
        &self,
        tail: &[u8],
        clk: NaiveDateTime,
        temp_out: &mut dyn Write,
        orient_out: &mut dyn Write,
    ) -> Result<(), LidError> {
        let mut cursor = 0usize;
        for slot in &self.slots {
            if cursor + slot.byte_len > tail.len() {
                break;
            }
            if is_sentinel(&tail[cursor..]) {
                break;
            }
            self.decode_slot(
                slot,
                &tail[cursor..cursor + slot.byte_len],
                clk,
                temp_out,
                orient_out,
            )?;
            cursor += slot.byte_len;
        }
        Ok(())
    }

    fn decode_slot(
        &self,
        slot: &Slot,
        bytes: &[u8],
        block_clk: NaiveDateTime,
        temp_out: &mut dyn Write,
        orient_out: &mut dyn Write,
    ) -> Result<(), LidError> {
        let ts = format_row_timestamp(block_clk + slot.offset);
        match slot.kind {
            SlotKind::Temp => {
                let raw = u16::from_le_bytes([bytes[0], bytes[1]]);
                write!(temp_out, "{},{}\r\n", ts, self.tables.temp(raw))?;
            }
            SlotKind::Orientation { channels } => {
                let mut values = [0i16; 6];
                for (i, chunk) in bytes.chunks_exact(2).enumerate().take(channels) {
                    values[i] = i16::from_le_bytes([chunk[0], chunk[1]]);
                }
                let mut row = ts;
                if self.acl {
                    // When both ACL and MGN are set, accelerometer samples occupy channels 0..3.
                    row.push(',');
                    row.push_str(self.tables.accel(Axis::X, values[0]));
                    row.push(',');
                    row.push_str(self.tables.accel(Axis::Y, values[1]));
                    row.push(',');
                    row.push_str(self.tables.accel(Axis::Z, values[2]));
                }
                if self.mgn {
                    // If ACL is also set, magnetometer samples occupy channels 3..6; otherwise 0..3.
                    let base = if self.acl { 3 } else { 0 };
                    row.push(',');
                    row.push_str(self.tables.magne(Axis::X, values[base]));
                    row.push(',');
                    row.push_str(self.tables.magne(Axis::Y, values[base + 1]));
                    row.push(',');
                    row.push_str(self.tables.magne(Axis::Z, values[base + 2]));
                }
                write!(orient_out, "{}\r\n", row)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lid_core::host_storage::HostStorage;

    fn le_i16(v: i16) -> [u8; 2] {
        v.to_le_bytes()
    }
    fn le_u16(v: u16) -> [u8; 2] {
        v.to_le_bytes()
    }

    fn mini_header(clk: &str) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(b"MHS\r\n");
        v.extend_from_slice(format!("CLK {}\r\n", clk).as_bytes());
        v.extend_from_slice(b"MHE\r\n");
        v
    }

    #[test]
    fn decodes_orientation_led_single_block() {
        // TMP+ACL on, MGN off, TRI=ORI=10, BMN=1, BMR=1 => one temp + one 3-sample burst.
        let plan = PatternPlan::new(true, true, false, 10, 10, 1, 1).unwrap();
        let tables = LookupTables::build(&HostStorage::default());
        let mh = mini_header("2020-01-01 00:00:00");
        let decoder = PageDecoder::new(plan, &tables, true, false, mh.len());

        let mut page = mh.clone();
        page.extend_from_slice(&le_u16(30000)); // temp
        page.extend_from_slice(&le_i16(100)); // ax
        page.extend_from_slice(&le_i16(200)); // ay
        page.extend_from_slice(&le_i16(300)); // az
        page.extend_from_slice(&[0xFFu8; 14]);

        let mut temp_csv = Vec::new();
        let mut orient_csv = Vec::new();
        decoder.decode_page(&page, &mut temp_csv, &mut orient_csv).unwrap();

        let hss = HostStorage::default();
        let expected_temp = format!("{:.4}", hss.temperature(30000).unwrap());
        let expected_ax = format!("{:.5}", hss.accel(Axis::X, 100));
        let expected_ay = format!("{:.5}", hss.accel(Axis::Y, 200));
        let expected_az = format!("{:.5}", hss.accel(Axis::Z, 300));

        let temp_text = String::from_utf8(temp_csv).unwrap();
        let orient_text = String::from_utf8(orient_csv).unwrap();
        assert_eq!(
            temp_text,
            format!("2020-01-01,00:00:00.000,{}\r\n", expected_temp)
        );
        assert_eq!(
            orient_text,
            format!(
                "2020-01-01,00:00:00.000,{},{},{}\r\n",
                expected_ax, expected_ay, expected_az
            )
        );
    }

    #[test]
    fn stops_at_sentinel_mid_page() {
        let plan = PatternPlan::new(false, true, false, 1, 1, 1, 1).unwrap();
        let tables = LookupTables::build(&HostStorage::default());
        let mh = mini_header("2020-01-01 00:00:00");
        let decoder = PageDecoder::new(plan, &tables, true, false, mh.len());

        let mut page = mh.clone();
        page.extend_from_slice(&[0xFFu8; 14]);
        page.extend_from_slice(&le_i16(1));
        page.extend_from_slice(&le_i16(2));
        page.extend_from_slice(&le_i16(3));

        let mut temp_csv = Vec::new();
        let mut orient_csv = Vec::new();
        decoder.decode_page(&page, &mut temp_csv, &mut orient_csv).unwrap();
        assert!(orient_csv.is_empty());
    }

    #[test]
    fn sentinel_starting_mid_block_does_not_emit_a_garbage_row() {
        // TMP+ACL on, TRI=ORI=1, BMN=1, BMR=1 => block_bytes = 2 (temp) + 6 (3 accel samples) = 8.
        let plan = PatternPlan::new(true, true, false, 1, 1, 1, 1).unwrap();
        let tables = LookupTables::build(&HostStorage::default());
        let mh = mini_header("2020-01-01 00:00:00");
        let decoder = PageDecoder::new(plan, &tables, true, false, mh.len());

        let mut page = mh.clone();
        // One genuine full block.
        page.extend_from_slice(&le_u16(30000));
        page.extend_from_slice(&le_i16(100));
        page.extend_from_slice(&le_i16(200));
        page.extend_from_slice(&le_i16(300));
        // A single stray byte, one short of a full temperature slot, immediately followed by the
        // end-of-data sentinel. The sentinel starts at offset 1 within this candidate block, not
        // at the block boundary, so a cursor-aligned sentinel check alone would miss it and
        // `decode_full_block` would run across real bytes mixed with sentinel bytes.
        page.push(0x42);
        page.extend_from_slice(&[0xFFu8; 14]);
        page.resize(page.len() + 32, 0xFF);

        let mut temp_csv = Vec::new();
        let mut orient_csv = Vec::new();
        decoder.decode_page(&page, &mut temp_csv, &mut orient_csv).unwrap();

        assert_eq!(temp_csv.iter().filter(|&&b| b == b'\n').count(), 1);
        assert_eq!(orient_csv.iter().filter(|&&b| b == b'\n').count(), 1);
    }

    #[test]
    fn truncated_tail_is_discarded_without_partial_row() {
        let plan = PatternPlan::new(false, true, false, 1, 1, 1, 1).unwrap();
        let tables = LookupTables::build(&HostStorage::default());
        let mh = mini_header("2020-01-01 00:00:00");
        let decoder = PageDecoder::new(plan, &tables, true, false, mh.len());

        let mut page = mh.clone();
        page.extend_from_slice(&le_i16(1));
        page.extend_from_slice(&le_i16(2));
        // missing az sample and no sentinel: dangling bytes, no full burst available.

        let mut temp_csv = Vec::new();
        let mut orient_csv = Vec::new();
        decoder.decode_page(&page, &mut temp_csv, &mut orient_csv).unwrap();
        assert!(orient_csv.is_empty());
    }
}
