//! WOFF 2.0 container with null table transforms.

use std::io::Write;

use crate::{
    Result,
    sfnt::{SfntTables, pad4},
};

const WOFF2_SIGNATURE: u32 = 0x774F_4632;
const HEADER_LEN: usize = 48;

const BROTLI_BUFFER_SIZE: usize = 4096;
const BROTLI_QUALITY: u32 = 11;
const BROTLI_WINDOW: u32 = 22;

/// Flag index 63 means the tag is spelled out after the flags byte.
const ARBITRARY_TAG: u8 = 63;

/// Transform version 3 is the null transform for `glyf` and `loca`.
const NULL_TRANSFORM_GLYF_LOCA: u8 = 0b1100_0000;

/// Known table tags, indexed by their WOFF2 flag value.
const KNOWN_TAGS: [&[u8; 4]; 63] = [
    b"cmap", b"head", b"hhea", b"hmtx", b"maxp", b"name", b"OS/2", b"post", b"cvt ", b"fpgm",
    b"glyf", b"loca", b"prep", b"CFF ", b"VORG", b"EBDT", b"EBLC", b"gasp", b"hdmx", b"kern",
    b"LTSH", b"PCLT", b"VDMX", b"vhea", b"vmtx", b"BASE", b"GDEF", b"GPOS", b"GSUB", b"EBSC",
    b"JSTF", b"MATH", b"CBDT", b"CBLC", b"COLR", b"CPAL", b"SVG ", b"sbix", b"acnt", b"avar",
    b"bdat", b"bloc", b"bsln", b"cvar", b"fdsc", b"feat", b"fmtx", b"fvar", b"gvar", b"hsty",
    b"just", b"lcar", b"mort", b"morx", b"opbd", b"prop", b"trak", b"Zapf", b"Silf", b"Glat",
    b"Gloc", b"Feat", b"Sill",
];

pub(crate) fn encode(sfnt: &SfntTables<'_>) -> Result<Vec<u8>> {
    let mut directory = Vec::new();
    let mut stream = Vec::new();
    for table in &sfnt.tables {
        write_directory_entry(&mut directory, &table.tag, table.data.len() as u32);
        stream.extend_from_slice(table.data);
    }

    let mut writer =
        brotli::CompressorWriter::new(Vec::new(), BROTLI_BUFFER_SIZE, BROTLI_QUALITY, BROTLI_WINDOW);
    writer.write_all(&stream)?;
    writer.flush()?;
    let compressed = writer.into_inner();

    let mut body = directory;
    body.extend_from_slice(&compressed);
    pad4(&mut body);
    let total_len = HEADER_LEN + body.len();

    let mut out = Vec::with_capacity(total_len);
    out.extend_from_slice(&WOFF2_SIGNATURE.to_be_bytes());
    out.extend_from_slice(&sfnt.flavor.to_be_bytes());
    out.extend_from_slice(&(total_len as u32).to_be_bytes());
    out.extend_from_slice(&(sfnt.tables.len() as u16).to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes()); // reserved
    out.extend_from_slice(&(sfnt.total_sfnt_size() as u32).to_be_bytes());
    out.extend_from_slice(&(compressed.len() as u32).to_be_bytes());
    out.extend_from_slice(&1u16.to_be_bytes()); // major version
    out.extend_from_slice(&0u16.to_be_bytes()); // minor version
    out.extend_from_slice(&[0; 20]); // no metadata, no private block
    debug_assert_eq!(out.len(), HEADER_LEN);

    out.extend(body);
    Ok(out)
}

fn write_directory_entry(buffer: &mut Vec<u8>, tag: &[u8; 4], length: u32) {
    let transform = if tag == b"glyf" || tag == b"loca" { NULL_TRANSFORM_GLYF_LOCA } else { 0 };
    match KNOWN_TAGS.iter().position(|known| *known == tag) {
        Some(index) => buffer.push(index as u8 | transform),
        None => {
            buffer.push(ARBITRARY_TAG | transform);
            buffer.extend_from_slice(tag);
        }
    }
    write_uint_base128(buffer, length);
}

fn write_uint_base128(buffer: &mut Vec<u8>, value: u32) {
    let mut started = false;
    for shift in [28, 21, 14, 7] {
        let chunk = ((value >> shift) & 0x7F) as u8;
        if started || chunk != 0 {
            buffer.push(0x80 | chunk);
            started = true;
        }
    }
    buffer.push((value & 0x7F) as u8);
}
