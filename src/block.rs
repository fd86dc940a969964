//! # 自适应 PVD 模块
//!
//! 把网格划分为互不重叠的 2×3 块，按行优先顺序扫描。
//! 每块中间一列的两个样本 `gu` (上)、`gb` (下) 作为参考，保持不变；
//! 四个角上的样本作为载体，各自根据相对参考样本的位置独立计算容量 (最多 3 位)。

use crate::analyzer::{analyze_carrier, carrier_bits, nearest_carrier_value};
use crate::bitstream::{BitSequence, MessageCollector};
use crate::constants::BLOCK_CARRIERS;
use crate::error::{Result, StegoError};
use crate::grid::SampleGrid;
use crate::steganography::Embedder;
use tracing::trace;

#[derive(Debug, Clone, Copy, Default)]
pub struct BlockEmbedder;

/// 所有完整 2×3 块左上角的坐标。
fn blocks(width: usize, height: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..height.saturating_sub(1)).step_by(2).flat_map(move |row| {
        (0..width.saturating_sub(2))
            .step_by(3)
            .map(move |col| (row, col))
    })
}

/// 块的两个参考样本 `(gu, gb)`。
fn references(grid: &SampleGrid, row: usize, col: usize) -> (u8, u8) {
    (grid.get(row, col + 1), grid.get(row + 1, col + 1))
}

impl Embedder for BlockEmbedder {
    fn capacity(&self, grid: &SampleGrid) -> usize {
        blocks(grid.width(), grid.height())
            .map(|(row, col)| {
                let (gu, gb) = references(grid, row, col);
                BLOCK_CARRIERS
                    .iter()
                    .map(|&(dr, dc)| {
                        let carrier = grid.get(row + dr, col + dc);
                        usize::from(analyze_carrier(gu, gb, carrier).bits)
                    })
                    .sum::<usize>()
            })
            .sum()
    }

    fn embed_bits(&self, grid: &mut SampleGrid, bits: &mut BitSequence) -> Result<usize> {
        let mut used = 0;
        'blocks: for (row, col) in blocks(grid.width(), grid.height()) {
            let (gu, gb) = references(grid, row, col);
            for &(dr, dc) in &BLOCK_CARRIERS {
                if bits.is_exhausted() {
                    break 'blocks;
                }

                let (r, c) = (row + dr, col + dc);
                let carrier = grid.get(r, c);
                let interval = analyze_carrier(gu, gb, carrier);
                if interval.bits == 0 {
                    trace!(row = r, col = c, carrier, gu, gb, "carrier skipped");
                    continue;
                }

                let value = bits.take(interval.bits);
                let stego = nearest_carrier_value(&interval, gu, carrier, value);
                let stego =
                    u8::try_from(stego).map_err(|_| StegoError::SampleOverflow { row: r, col: c })?;
                grid.set(r, c, stego);
                used += 1;
            }
        }
        Ok(used)
    }

    fn extract_bits(&self, grid: &SampleGrid, collector: &mut MessageCollector) {
        for (row, col) in blocks(grid.width(), grid.height()) {
            let (gu, gb) = references(grid, row, col);
            for &(dr, dc) in &BLOCK_CARRIERS {
                let carrier = grid.get(row + dr, col + dc);
                let bits = analyze_carrier(gu, gb, carrier).bits;
                if bits == 0 {
                    continue;
                }
                if collector.push(carrier_bits(gu, carrier, bits), bits) {
                    return;
                }
            }
        }
    }
}
