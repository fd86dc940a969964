//! # 区间表模块
//!
//! 把像素差值的绝对值映射到容量区间 `[lower, upper]` 及其可携带的比特数。
//! 嵌入端与提取端必须得到完全相同的分类结果，因此这里只有纯函数查询。

use crate::constants::{HIGH_CAPACITY_RANGES, STANDARD_RANGES};
use crate::error::{Result, StegoError};
use std::fmt;

/// 差值绝对值的取值范围 `[0, 255]` 的大小。
const DIFFERENCE_DOMAIN: u32 = 256;

/// 一个容量区间：差值绝对值落在 `[lower, upper]` 内时可携带 `bits` 个比特。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityBucket {
    pub lower: i32,
    pub upper: i32,
    pub bits: u8,
}

impl CapacityBucket {
    fn new(lower: u32, width: u16) -> Self {
        Self {
            lower: lower as i32,
            upper: (lower + u32::from(width) - 1) as i32,
            bits: width.ilog2() as u8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeTable {
    buckets: Vec<CapacityBucket>,
    /// 以差值绝对值为下标的预计算分类结果
    lookup: Vec<CapacityBucket>,
}

impl RangeTable {
    /// 由区间宽度序列构造区间表，边界为宽度的前缀和。
    ///
    /// # Errors
    ///
    /// 以下情况返回 `StegoError::InvalidRangeTable`：
    /// * 宽度序列为空，或含有 0。
    /// * 单个宽度超过 256。
    /// * 宽度之和小于 256，无法覆盖全部差值。
    pub fn new(widths: &[u16]) -> Result<Self> {
        if widths.is_empty() {
            return Err(StegoError::InvalidRangeTable("no bucket widths given".into()));
        }
        if let Some(&width) = widths
            .iter()
            .find(|&&w| w == 0 || u32::from(w) > DIFFERENCE_DOMAIN)
        {
            return Err(StegoError::InvalidRangeTable(format!(
                "bucket width {width} is outside 1..=256"
            )));
        }
        let total: u32 = widths.iter().map(|&w| u32::from(w)).sum();
        if total < DIFFERENCE_DOMAIN {
            return Err(StegoError::InvalidRangeTable(format!(
                "bucket widths sum to {total}, must cover at least 256 differences"
            )));
        }

        Ok(Self::layout(widths))
    }

    /// 标准容量表 `(8, 8, 16, 32, 64, 128)`。
    pub fn standard() -> Self {
        Self::layout(&STANDARD_RANGES)
    }

    /// 高容量表 `(2, 2, 4, 4, 4, 8, 8, 16, 16, 32, 32, 64, 64)`。
    pub fn high_capacity() -> Self {
        Self::layout(&HIGH_CAPACITY_RANGES)
    }

    /// 计算区间边界，并预先对每个差值做一次线性扫描分类。
    /// 调用方保证宽度序列有效 (前缀和覆盖 `[0, 255]`)。
    fn layout(widths: &[u16]) -> Self {
        let mut lower = 0u32;
        let buckets: Vec<CapacityBucket> = widths
            .iter()
            .map(|&width| {
                let bucket = CapacityBucket::new(lower, width);
                lower += u32::from(width);
                bucket
            })
            .collect();
        let lookup = (0..DIFFERENCE_DOMAIN as i32)
            .filter_map(|magnitude| Self::scan(&buckets, magnitude))
            .collect();
        Self { buckets, lookup }
    }

    /// 从低到高线性扫描，返回第一个 `upper >= magnitude` 的区间。
    fn scan(buckets: &[CapacityBucket], magnitude: i32) -> Option<CapacityBucket> {
        buckets.iter().copied().find(|b| b.upper >= magnitude)
    }

    /// 对差值绝对值分类。
    pub fn classify(&self, magnitude: u8) -> CapacityBucket {
        self.lookup[usize::from(magnitude)]
    }

    pub fn buckets(&self) -> &[CapacityBucket] {
        &self.buckets
    }
}

impl Default for RangeTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for RangeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths: Vec<String> = self
            .buckets
            .iter()
            .map(|b| (b.upper - b.lower + 1).to_string())
            .collect();
        write!(f, "({})", widths.join(", "))
    }
}
