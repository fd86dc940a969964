//! # pvd_hide 库
//!
//! 本库包含 PVD (像素值差分) 隐写工具的核心逻辑：
//! 固定区间 PVD 在水平像素对的差值中嵌入比特，自适应 PVD 在 2×3 块的四个角上嵌入比特，
//! 每个位置携带的比特数都由局部像素值决定，提取时无需任何额外信息即可重新算出。

// 声明库包含的所有模块。

pub mod analyzer;
pub mod bitstream;
pub mod block;
pub mod cli;
pub mod constants;
pub mod difference;
pub mod error;
pub mod grid;
pub mod handler;
pub mod logging;
pub mod range_table;
pub mod steganography;

pub use error::{Result, StegoError};
pub use grid::SampleGrid;
pub use range_table::{CapacityBucket, RangeTable};
pub use steganography::{Method, capacity, embed, extract, message_capacity};
