//! # 固定区间 PVD 模块
//!
//! 按行优先顺序扫描水平相邻的样本对 `(row, col)`、`(row, col + 1)`，`col` 每次前进 2。
//! 每个像素对的容量由差值绝对值所在的区间决定，把差值改写为 `lower + value` 即完成嵌入。

use crate::analyzer::{analyze_pair, reconstruct_pair, signed_like};
use crate::bitstream::{BitSequence, MessageCollector};
use crate::error::{Result, StegoError};
use crate::grid::SampleGrid;
use crate::range_table::RangeTable;
use crate::steganography::Embedder;
use tracing::trace;

#[derive(Debug, Clone, Copy)]
pub struct DifferenceEmbedder<'a> {
    table: &'a RangeTable,
}

impl<'a> DifferenceEmbedder<'a> {
    pub fn new(table: &'a RangeTable) -> Self {
        Self { table }
    }
}

/// 网格中所有完整像素对左侧样本的坐标，按扫描顺序排列。
fn pairs(width: usize, height: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..height).flat_map(move |row| {
        (0..width.saturating_sub(1))
            .step_by(2)
            .map(move |col| (row, col))
    })
}

impl Embedder for DifferenceEmbedder<'_> {
    fn capacity(&self, grid: &SampleGrid) -> usize {
        pairs(grid.width(), grid.height())
            .map(|(row, col)| {
                let pair = analyze_pair(self.table, grid.get(row, col), grid.get(row, col + 1));
                usize::from(pair.capacity())
            })
            .sum()
    }

    fn embed_bits(&self, grid: &mut SampleGrid, bits: &mut BitSequence) -> Result<usize> {
        let mut used = 0;
        for (row, col) in pairs(grid.width(), grid.height()) {
            if bits.is_exhausted() {
                break;
            }

            let (a, b) = (grid.get(row, col), grid.get(row, col + 1));
            let pair = analyze_pair(self.table, a, b);
            if pair.capacity() == 0 {
                trace!(row, col, a, b, "pair skipped");
                continue;
            }

            let value = bits.take(pair.bucket.bits);
            let target = signed_like(pair.difference, pair.bucket.lower + value as i32);
            let (new_a, new_b) =
                reconstruct_pair(a, b, target).ok_or(StegoError::SampleOverflow { row, col })?;
            grid.set(row, col, new_a);
            grid.set(row, col + 1, new_b);
            used += 1;
        }
        Ok(used)
    }

    fn extract_bits(&self, grid: &SampleGrid, collector: &mut MessageCollector) {
        for (row, col) in pairs(grid.width(), grid.height()) {
            let pair = analyze_pair(self.table, grid.get(row, col), grid.get(row, col + 1));
            if pair.capacity() == 0 {
                continue;
            }
            let value = pair.difference.unsigned_abs() - pair.bucket.lower as u32;
            if collector.push(value, pair.bucket.bits) {
                break;
            }
        }
    }
}
