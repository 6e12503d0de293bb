//! Opens a logger file, sizes it, and walks its data pages in order, routing decoded rows to two
//! CSV sinks. Bounded to O(one page) of live memory: only the current page's bytes are held at
//! any time.
use crate::byte_source::ByteSource;
use crate::header::Header;
use crate::page_decoder::PageDecoder;
use lid_core::errors::LidError;
use lid_core::lookup::LookupTables;
use lid_core::pattern::PatternPlan;
use lid_core::settings::LidSettings;
use lid_core::{MAIN_HEADER_LEN, PAGE_LEN};
use std::io::Write;

/// Decodes a logger file from `source`, writing the temperature series to `temp_out` and the
/// orientation series to `orient_out`.
pub fn decode<S: ByteSource>(
    source: &mut S,
    settings: &LidSettings,
    temp_out: &mut dyn Write,
    orient_out: &mut dyn Write,
) -> Result<(), LidError> {
    let total_len = source.total_len()?;
    if total_len < MAIN_HEADER_LEN as u64 {
        return Err(LidError::ShortRead {
            have: total_len as usize,
            need: MAIN_HEADER_LEN,
        });
    }

    let header_block = source.read_at(0, MAIN_HEADER_LEN)?;
    let header = Header::parse(&header_block, settings)?;

    let plan = PatternPlan::new(
        header.template.tmp,
        header.template.acl,
        header.template.mgn,
        header.template.tri,
        header.template.ori,
        header.template.bmn,
        header.template.bmr,
    )?;
    let tables = LookupTables::build(&header.host_storage);
    let decoder = PageDecoder::new(
        plan,
        &tables,
        header.template.acl,
        header.template.mgn,
        header.mini_header_size,
    );
    decoder.write_headers(temp_out, orient_out)?;

    let data_len = total_len - MAIN_HEADER_LEN as u64;
    let num_pages = (data_len + PAGE_LEN as u64 - 1) / PAGE_LEN as u64;

    for page_index in 0..num_pages {
        let offset = MAIN_HEADER_LEN as u64 + page_index * PAGE_LEN as u64;
        let remaining = total_len - offset;
        let this_page_len = remaining.min(PAGE_LEN as u64) as usize;
        let page = source.read_at(offset, this_page_len)?;
        decoder
            .decode_page(&page, temp_out, orient_out)
            .map_err(|e| e.at_page(page_index as usize, offset))?;
    }

    Ok(())
}
