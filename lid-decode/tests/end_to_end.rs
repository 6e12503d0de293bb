//! End-to-end test: build a small synthetic logger file on disk and decode it, checking both
//! CSV sinks byte for byte.
use lid_core::settings::LidSettings;
use std::fs::File;
use std::io::{Read, Write};

fn main_header() -> Vec<u8> {
    let mut block = Vec::new();
    block.extend_from_slice(b"HDS\r\n");
    block.extend_from_slice(b"SER END2END-01\r\n");
    block.extend_from_slice(b"MHS\r\n");
    block.extend_from_slice(b"TMP 1\r\n");
    block.extend_from_slice(b"ACL 1\r\n");
    block.extend_from_slice(b"MGN 1\r\n");
    block.extend_from_slice(b"TRI 2\r\n");
    block.extend_from_slice(b"ORI 2\r\n");
    block.extend_from_slice(b"BMR 1\r\n");
    block.extend_from_slice(b"BMN 1\r\n");
    block.extend_from_slice(b"CLK 2021-06-15 09:00:00\r\n");
    block.extend_from_slice(b"MHE\r\n");
    block.extend_from_slice(b"HDE\r\n");
    block.resize(lid_core::MAIN_HEADER_LEN, 0xFF);
    block
}

fn mini_header_bytes() -> Vec<u8> {
    let mut mh = Vec::new();
    mh.extend_from_slice(b"MHS\r\n");
    mh.extend_from_slice(b"CLK 2021-06-15 09:00:00\r\n");
    mh.extend_from_slice(b"MHE\r\n");
    mh
}

fn data_page() -> Vec<u8> {
    let mut page = mini_header_bytes();
    // temp, ax, ay, az, mx, my, mz
    page.extend_from_slice(&40000u16.to_le_bytes());
    for raw in [10i16, 20, 30, 40, 50, 60] {
        page.extend_from_slice(&raw.to_le_bytes());
    }
    page.extend_from_slice(&[0xFFu8; 14]);
    page.resize(lid_core::PAGE_LEN, 0xFF);
    page
}

#[test]
fn decodes_a_two_channel_file_on_disk() {
    let dir = tempfile::tempdir().expect("couldn't get tempdir");

    let input_path = dir.path().join("capture.lid");
    let mut input_file = File::create(&input_path).unwrap();
    input_file.write_all(&main_header()).unwrap();
    input_file.write_all(&data_page()).unwrap();
    drop(input_file);

    let temp_path = dir.path().join("temp.csv");
    let orient_path = dir.path().join("orientation.csv");

    let mut input = File::open(&input_path).unwrap();
    let mut temp_out = File::create(&temp_path).unwrap();
    let mut orient_out = File::create(&orient_path).unwrap();

    lid_decode::decode(&mut input, &LidSettings::default(), &mut temp_out, &mut orient_out)
        .expect("decode should succeed");
    drop(temp_out);
    drop(orient_out);

    let mut temp_csv = String::new();
    File::open(&temp_path).unwrap().read_to_string(&mut temp_csv).unwrap();
    let mut orient_csv = String::new();
    File::open(&orient_path).unwrap().read_to_string(&mut orient_csv).unwrap();

    assert_eq!(temp_csv.lines().next().unwrap(), "Date,Time,Temperature (C)");
    assert_eq!(
        orient_csv.lines().next().unwrap(),
        "Date,Time,Ax (g),Ay (g),Az (g),Mx (mG),My (mG),Mz (mG)"
    );
    assert_eq!(temp_csv.lines().count(), 2);
    assert_eq!(orient_csv.lines().count(), 2);
    assert!(temp_csv.lines().nth(1).unwrap().starts_with("2021-06-15,09:00:00.000,"));
}
