//! # 错误类型模块
//!
//! 隐写核心返回的所有错误。命令行层通过 `anyhow` 为它们附加上下文。

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StegoError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// 消息加上分隔符后的比特数超过了图像的总容量。
    #[error("insufficient capacity: message needs {required} bits, image offers {available} bits")]
    InsufficientCapacity { required: usize, available: usize },

    /// 核心只处理单通道样本网格。
    #[error("expected a single-channel sample grid, got {channels} channels")]
    NotSingleChannel { channels: u8 },

    #[error("sample buffer of length {len} does not match a {width}x{height} grid")]
    ShapeMismatch {
        width: usize,
        height: usize,
        len: usize,
    },

    #[error("invalid range table: {0}")]
    InvalidRangeTable(String),

    /// 越界预检通过后写入的样本仍然越界。
    #[error("sample overflow while embedding at row {row}, column {col}")]
    SampleOverflow { row: usize, col: usize },
}
