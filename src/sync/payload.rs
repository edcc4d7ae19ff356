//! Upload payload encoding.
//!
//! The payload is a compact JSON array of [`WireAchievement`] objects,
//! zlib-compressed at the default level.

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{Read, Write};

use super::achievement::{AchievementRecord, WireAchievement};
use crate::error::PayloadError;

/// File name of the multipart achievements part.
pub const PAYLOAD_FILE_NAME: &str = "achievements.json.zlib";

/// Content type of the multipart achievements part.
pub const PAYLOAD_CONTENT_TYPE: &str = "application/zlib";

/// Project local records onto the wire schema.
pub fn to_wire(records: &[AchievementRecord]) -> Vec<WireAchievement> {
    records.iter().map(AchievementRecord::to_wire).collect()
}

/// Serialize and compress `achievements`.
pub fn encode(achievements: &[WireAchievement]) -> Result<Vec<u8>, PayloadError> {
    let json = serde_json::to_vec(achievements)?;
    compress(&json)
}

/// Inverse of [`encode`].
pub fn decode(bytes: &[u8]) -> Result<Vec<WireAchievement>, PayloadError> {
    let json = decompress(bytes)?;
    Ok(serde_json::from_slice(&json)?)
}

pub fn compress(data: &[u8]) -> Result<Vec<u8>, PayloadError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

pub fn decompress(data: &[u8]) -> Result<Vec<u8>, PayloadError> {
    let mut decoder = ZlibDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
