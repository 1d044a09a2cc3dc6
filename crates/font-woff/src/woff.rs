//! WOFF 1.0 container.

use std::io::Write;

use flate2::{Compression, write::ZlibEncoder};

use crate::{
    Result,
    sfnt::{SfntTables, pad4},
};

const WOFF_SIGNATURE: u32 = 0x774F_4646;
const HEADER_LEN: usize = 44;
const DIRECTORY_ENTRY_LEN: usize = 20;

pub(crate) fn encode(sfnt: &SfntTables<'_>) -> Result<Vec<u8>> {
    // Compressed table payloads, kept only when smaller than the original.
    let mut payloads = Vec::with_capacity(sfnt.tables.len());
    for table in &sfnt.tables {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(table.data)?;
        let compressed = encoder.finish()?;
        if compressed.len() < table.data.len() {
            payloads.push(compressed);
        } else {
            payloads.push(table.data.to_vec());
        }
    }

    let mut data = Vec::new();
    let mut directory = Vec::with_capacity(sfnt.tables.len() * DIRECTORY_ENTRY_LEN);
    let data_start = HEADER_LEN + sfnt.tables.len() * DIRECTORY_ENTRY_LEN;
    for (table, payload) in sfnt.tables.iter().zip(&payloads) {
        directory.extend_from_slice(&table.tag);
        directory.extend_from_slice(&((data_start + data.len()) as u32).to_be_bytes());
        directory.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        directory.extend_from_slice(&(table.data.len() as u32).to_be_bytes());
        directory.extend_from_slice(&table.checksum.to_be_bytes());
        data.extend_from_slice(payload);
        pad4(&mut data);
    }

    let total_len = data_start + data.len();
    let mut out = Vec::with_capacity(total_len);
    out.extend_from_slice(&WOFF_SIGNATURE.to_be_bytes());
    out.extend_from_slice(&sfnt.flavor.to_be_bytes());
    out.extend_from_slice(&(total_len as u32).to_be_bytes());
    out.extend_from_slice(&(sfnt.tables.len() as u16).to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes()); // reserved
    out.extend_from_slice(&(sfnt.total_sfnt_size() as u32).to_be_bytes());
    out.extend_from_slice(&1u16.to_be_bytes()); // major version
    out.extend_from_slice(&0u16.to_be_bytes()); // minor version
    out.extend_from_slice(&[0; 20]); // no metadata, no private block
    debug_assert_eq!(out.len(), HEADER_LEN);

    out.extend(directory);
    out.extend(data);
    Ok(out)
}
