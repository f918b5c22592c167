//! Builds ZIP archives in memory for the integration tests.

#![allow(dead_code)]

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::Compression;
use flate2::Crc;
use flate2::write::DeflateEncoder;

pub enum Method {
    Stored,
    Deflate,
}

struct Member {
    name: String,
    method: u16,
    crc32: u32,
    compressed: Vec<u8>,
    compressed_size: u32,
    uncompressed_size: u32,
}

#[derive(Default)]
pub struct ZipBuilder {
    members: Vec<Member>,
    comment: Vec<u8>,
    zip64: bool,
}

impl ZipBuilder {
    pub fn file(mut self, name: &str, body: &[u8], method: Method) -> Self {
        let mut crc = Crc::new();
        crc.update(body);
        let (method, compressed) = match method {
            Method::Stored => (0, body.to_vec()),
            Method::Deflate => {
                let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(body).unwrap();
                (8, encoder.finish().unwrap())
            }
        };
        self.members.push(Member {
            name: name.to_string(),
            method,
            crc32: crc.sum(),
            compressed_size: compressed.len() as u32,
            compressed,
            uncompressed_size: body.len() as u32,
        });
        self
    }

    pub fn directory(mut self, name: &str) -> Self {
        self.members.push(Member {
            name: name.to_string(),
            method: 0,
            crc32: 0,
            compressed: Vec::new(),
            compressed_size: 0,
            uncompressed_size: 0,
        });
        self
    }

    /// Store a member whose recorded checksum does not match its data.
    pub fn corrupt(mut self, name: &str, body: &[u8]) -> Self {
        self = self.file(name, body, Method::Stored);
        if let Some(last) = self.members.last_mut() {
            last.crc32 ^= 0xFFFF_FFFF;
        }
        self
    }

    /// Record a different uncompressed size for the last member.
    pub fn declare_uncompressed_size(mut self, size: u32) -> Self {
        if let Some(last) = self.members.last_mut() {
            last.uncompressed_size = size;
        }
        self
    }

    /// Record a different compressed size for the last member.
    pub fn declare_compressed_size(mut self, size: u32) -> Self {
        if let Some(last) = self.members.last_mut() {
            last.compressed_size = size;
        }
        self
    }

    /// Write sizes, offsets and totals through the ZIP64 records.
    pub fn zip64(mut self) -> Self {
        self.zip64 = true;
        self
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = comment.as_bytes().to_vec();
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::new();
        let mut offsets = Vec::with_capacity(self.members.len());

        for m in &self.members {
            offsets.push(out.len() as u64);
            out.extend_from_slice(b"PK\x03\x04");
            out.write_u16::<LittleEndian>(if self.zip64 { 45 } else { 20 }).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap();
            out.write_u16::<LittleEndian>(m.method).unwrap();
            out.write_u32::<LittleEndian>(0).unwrap(); // time + date
            out.write_u32::<LittleEndian>(m.crc32).unwrap();
            if self.zip64 {
                out.write_u32::<LittleEndian>(0xFFFF_FFFF).unwrap();
                out.write_u32::<LittleEndian>(0xFFFF_FFFF).unwrap();
                out.write_u16::<LittleEndian>(m.name.len() as u16).unwrap();
                out.write_u16::<LittleEndian>(20).unwrap();
                out.extend_from_slice(m.name.as_bytes());
                out.write_u16::<LittleEndian>(0x0001).unwrap();
                out.write_u16::<LittleEndian>(16).unwrap();
                out.write_u64::<LittleEndian>(m.uncompressed_size as u64).unwrap();
                out.write_u64::<LittleEndian>(m.compressed_size as u64).unwrap();
            } else {
                out.write_u32::<LittleEndian>(m.compressed_size).unwrap();
                out.write_u32::<LittleEndian>(m.uncompressed_size).unwrap();
                out.write_u16::<LittleEndian>(m.name.len() as u16).unwrap();
                out.write_u16::<LittleEndian>(0).unwrap();
                out.extend_from_slice(m.name.as_bytes());
            }
            out.extend_from_slice(&m.compressed);
        }

        let cd_offset = out.len() as u64;
        for (m, offset) in self.members.iter().zip(&offsets) {
            out.extend_from_slice(b"PK\x01\x02");
            out.write_u16::<LittleEndian>(if self.zip64 { 45 } else { 20 }).unwrap();
            out.write_u16::<LittleEndian>(if self.zip64 { 45 } else { 20 }).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap();
            out.write_u16::<LittleEndian>(m.method).unwrap();
            out.write_u32::<LittleEndian>(0).unwrap(); // time + date
            out.write_u32::<LittleEndian>(m.crc32).unwrap();
            if self.zip64 {
                out.write_u32::<LittleEndian>(0xFFFF_FFFF).unwrap();
                out.write_u32::<LittleEndian>(0xFFFF_FFFF).unwrap();
            } else {
                out.write_u32::<LittleEndian>(m.compressed_size).unwrap();
                out.write_u32::<LittleEndian>(m.uncompressed_size).unwrap();
            }
            out.write_u16::<LittleEndian>(m.name.len() as u16).unwrap();
            out.write_u16::<LittleEndian>(if self.zip64 { 28 } else { 0 }).unwrap(); // extra
            out.write_u16::<LittleEndian>(0).unwrap(); // comment
            out.write_u16::<LittleEndian>(0).unwrap(); // disk
            out.write_u16::<LittleEndian>(0).unwrap(); // internal attrs
            out.write_u32::<LittleEndian>(0).unwrap(); // external attrs
            if self.zip64 {
                out.write_u32::<LittleEndian>(0xFFFF_FFFF).unwrap();
                out.extend_from_slice(m.name.as_bytes());
                // Extended information: uncompressed, compressed, local header offset
                out.write_u16::<LittleEndian>(0x0001).unwrap();
                out.write_u16::<LittleEndian>(24).unwrap();
                out.write_u64::<LittleEndian>(m.uncompressed_size as u64).unwrap();
                out.write_u64::<LittleEndian>(m.compressed_size as u64).unwrap();
                out.write_u64::<LittleEndian>(*offset).unwrap();
            } else {
                out.write_u32::<LittleEndian>(*offset as u32).unwrap();
                out.extend_from_slice(m.name.as_bytes());
            }
        }
        let cd_size = out.len() as u64 - cd_offset;
        let entries = self.members.len() as u64;

        if self.zip64 {
            let eocd64_offset = out.len() as u64;
            out.extend_from_slice(b"PK\x06\x06");
            out.write_u64::<LittleEndian>(44).unwrap(); // record size after this field
            out.write_u16::<LittleEndian>(45).unwrap();
            out.write_u16::<LittleEndian>(45).unwrap();
            out.write_u32::<LittleEndian>(0).unwrap();
            out.write_u32::<LittleEndian>(0).unwrap();
            out.write_u64::<LittleEndian>(entries).unwrap();
            out.write_u64::<LittleEndian>(entries).unwrap();
            out.write_u64::<LittleEndian>(cd_size).unwrap();
            out.write_u64::<LittleEndian>(cd_offset).unwrap();

            out.extend_from_slice(b"PK\x06\x07");
            out.write_u32::<LittleEndian>(0).unwrap();
            out.write_u64::<LittleEndian>(eocd64_offset).unwrap();
            out.write_u32::<LittleEndian>(1).unwrap();
        }

        out.extend_from_slice(b"PK\x05\x06");
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        if self.zip64 {
            out.write_u16::<LittleEndian>(0xFFFF).unwrap();
            out.write_u16::<LittleEndian>(0xFFFF).unwrap();
            out.write_u32::<LittleEndian>(0xFFFF_FFFF).unwrap();
            out.write_u32::<LittleEndian>(0xFFFF_FFFF).unwrap();
        } else {
            out.write_u16::<LittleEndian>(entries as u16).unwrap();
            out.write_u16::<LittleEndian>(entries as u16).unwrap();
            out.write_u32::<LittleEndian>(cd_size as u32).unwrap();
            out.write_u32::<LittleEndian>(cd_offset as u32).unwrap();
        }
        out.write_u16::<LittleEndian>(self.comment.len() as u16).unwrap();
        out.extend_from_slice(&self.comment);
        out
    }
}
