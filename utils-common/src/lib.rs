pub mod compression;
pub mod error;
pub mod models;
pub mod reading_time;

// 重新导出常用类型和函数，方便直接使用
pub use compression::{from_compressed_with_max_version, to_compressed, validate_compressed_data};
pub use error::IndexError;
pub use models::{parse_date, PostMeta, TocItem};
pub use reading_time::ReadingTime;
