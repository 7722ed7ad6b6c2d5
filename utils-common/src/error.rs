use thiserror::Error;

/// 二进制索引编解码错误
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化失败: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("反序列化失败: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("数据太短，无法解析: {0} 字节")]
    TooShort(usize),

    #[error("无效的文件格式：魔数不匹配")]
    BadMagic,

    #[error("不支持的版本: {major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },

    #[error("解压后数据大小不匹配: 期望 {expected} 字节, 实际 {actual} 字节")]
    SizeMismatch { expected: usize, actual: usize },
}
