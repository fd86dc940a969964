//! # 隐写核心入口
//!
//! 对外提供 [`embed`]、[`extract`] 与 [`capacity`]。嵌入方式由 [`Method`] 选择，
//! 提取时必须使用与嵌入时相同的 `Method`，区间表和嵌入方式不会记录在图像中。

use crate::bitstream::{self, BitSequence, MessageCollector};
use crate::block::BlockEmbedder;
use crate::constants::DELIMITER;
use crate::difference::DifferenceEmbedder;
use crate::error::{Result, StegoError};
use crate::grid::SampleGrid;
use crate::range_table::RangeTable;
use std::fmt;
use tracing::{debug, warn};

/// 两种差值嵌入方式共同的扫描接口。
///
/// 嵌入与提取必须以完全相同的顺序访问位置，并对每个位置做出相同的跳过判断。
pub trait Embedder {
    /// 网格能携带的总比特数，只取决于载体图像本身。
    fn capacity(&self, grid: &SampleGrid) -> usize;

    /// 按扫描顺序消费比特并改写样本，返回实际使用的位置数。
    fn embed_bits(&self, grid: &mut SampleGrid, bits: &mut BitSequence) -> Result<usize>;

    /// 按扫描顺序读出比特，直到收集器找到分隔符或网格扫描完毕。
    fn extract_bits(&self, grid: &SampleGrid, collector: &mut MessageCollector);
}

/// 嵌入方式。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// 固定区间 PVD，使用给定的区间表。
    Pvd(RangeTable),
    /// 2×3 块自适应 PVD。
    AdaptivePvd,
}

impl Method {
    /// 使用标准区间表的固定区间 PVD。
    pub fn pvd() -> Self {
        Self::Pvd(RangeTable::standard())
    }

    /// 使用高容量区间表的固定区间 PVD。
    pub fn pvd_high_capacity() -> Self {
        Self::Pvd(RangeTable::high_capacity())
    }

    fn embedder(&self) -> Box<dyn Embedder + '_> {
        match self {
            Self::Pvd(table) => Box::new(DifferenceEmbedder::new(table)),
            Self::AdaptivePvd => Box::new(BlockEmbedder),
        }
    }
}

impl Default for Method {
    fn default() -> Self {
        Self::pvd()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pvd(table) => write!(f, "PVD {table}"),
            Self::AdaptivePvd => write!(f, "adaptive PVD (2x3 blocks)"),
        }
    }
}

/// 网格在给定方式下能携带的总比特数 (含分隔符)。
pub fn capacity(grid: &SampleGrid, method: &Method) -> usize {
    method.embedder().capacity(grid)
}

/// 能隐藏的最长消息字节数，已扣除分隔符。
pub fn message_capacity(grid: &SampleGrid, method: &Method) -> usize {
    (capacity(grid, method) / 8).saturating_sub(DELIMITER.len())
}

/// 把消息隐藏到网格的副本中并返回该副本，原网格保持不变。
///
/// # Errors
///
/// * 分帧后的比特数超过容量时返回 `StegoError::InsufficientCapacity`，此时不会生成任何图像。
/// * `StegoError::SampleOverflow` 表示越界预检失效，正常情况下不会出现。
pub fn embed(grid: &SampleGrid, message: &[u8], method: &Method) -> Result<SampleGrid> {
    let embedder = method.embedder();
    let mut bits = bitstream::encode(message);
    let required = bits.len();
    let available = embedder.capacity(grid);
    if required > available {
        return Err(StegoError::InsufficientCapacity {
            required,
            available,
        });
    }

    let mut stego = grid.clone();
    let locations = embedder.embed_bits(&mut stego, &mut bits)?;
    debug!(%method, required, available, locations, "message embedded");
    Ok(stego)
}

/// 从网格中提取消息。
///
/// 扫描完整个网格仍未找到分隔符时，返回已经凑满的字节，不视为错误。
pub fn extract(grid: &SampleGrid, method: &Method) -> Vec<u8> {
    let mut collector = MessageCollector::new();
    method.embedder().extract_bits(grid, &mut collector);
    if collector.is_complete() {
        debug!(%method, bits = collector.bit_len(), "message extracted");
    } else {
        warn!(
            %method,
            bits = collector.bit_len(),
            "no end-of-message delimiter found, returning truncated data"
        );
    }
    collector.into_message()
}
