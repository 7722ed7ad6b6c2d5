use std::io::{Read, Write};

use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::IndexError;

/// 魔数常量 - 用于标识索引文件格式
pub const MAGIC_BYTES: &[u8] = b"BLOGIX";

/// 头部长度：魔数 + 版本号(2) + 原始大小(4)
const HEADER_LEN: usize = MAGIC_BYTES.len() + 2 + 4;

/// 预分配时假定的最大压缩比
const MAX_EXPANSION: usize = 64;

/// 将对象序列化为二进制格式
pub fn to_binary<T: Serialize>(obj: &T) -> Result<Vec<u8>, IndexError> {
    Ok(bincode::serde::encode_to_vec(obj, bincode::config::standard())?)
}

/// 从二进制格式反序列化对象
pub fn from_binary<T: DeserializeOwned>(data: &[u8]) -> Result<T, IndexError> {
    let (value, _) = bincode::serde::decode_from_slice(data, bincode::config::standard())?;
    Ok(value)
}

/// 将对象序列化为压缩的二进制格式
pub fn to_compressed<T: Serialize>(obj: &T, version: [u8; 2]) -> Result<Vec<u8>, IndexError> {
    let binary = to_binary(obj)?;

    let mut output = Vec::with_capacity(HEADER_LEN + binary.len() / 2);
    output.extend_from_slice(MAGIC_BYTES);
    output.extend_from_slice(&version);
    output.extend_from_slice(&(binary.len() as u32).to_le_bytes());

    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(&binary)?;
    output.extend_from_slice(&encoder.finish()?);

    Ok(output)
}

/// 校验头部，返回版本号和原始数据大小
fn read_header(data: &[u8], max_version: u8) -> Result<([u8; 2], usize), IndexError> {
    if data.len() < HEADER_LEN {
        return Err(IndexError::TooShort(data.len()));
    }

    if &data[..MAGIC_BYTES.len()] != MAGIC_BYTES {
        return Err(IndexError::BadMagic);
    }

    let version_offset = MAGIC_BYTES.len();
    let version = [data[version_offset], data[version_offset + 1]];
    if version[0] > max_version {
        return Err(IndexError::UnsupportedVersion {
            major: version[0],
            minor: version[1],
        });
    }

    let mut size_bytes = [0u8; 4];
    size_bytes.copy_from_slice(&data[version_offset + 2..HEADER_LEN]);

    Ok((version, u32::from_le_bytes(size_bytes) as usize))
}

/// 从压缩的二进制格式反序列化对象，允许指定支持的最大版本
pub fn from_compressed_with_max_version<T: DeserializeOwned>(
    data: &[u8],
    max_version: u8,
) -> Result<T, IndexError> {
    let (_, original_size) = read_header(data, max_version)?;

    let mut decoder = GzDecoder::new(&data[HEADER_LEN..]);
    // 头部记录的大小不可信，预分配量按压缩数据长度封顶
    let capacity = original_size.min(data.len().saturating_mul(MAX_EXPANSION));
    let mut decompressed = Vec::with_capacity(capacity);
    decoder.read_to_end(&mut decompressed)?;

    if decompressed.len() != original_size {
        return Err(IndexError::SizeMismatch {
            expected: original_size,
            actual: decompressed.len(),
        });
    }

    from_binary(&decompressed)
}

/// 验证压缩数据头部是否有效，返回版本号
pub fn validate_compressed_data(data: &[u8], max_version: u8) -> Result<[u8; 2], IndexError> {
    read_header(data, max_version).map(|(version, _)| version)
}
