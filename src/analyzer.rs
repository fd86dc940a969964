//! # 像素分析模块
//!
//! 嵌入端和提取端共用的纯函数：
//!
//! * 固定区间 PVD：对一对水平相邻的样本分类、预检越界，并按新的差值重建像素对。
//! * 自适应 PVD：由 2×3 块的两个参考样本 `gu`、`gb` 推导单个载体的可用区间与容量。
//!
//! 提取端只能看到嵌入后的样本值，因此这里的每个判断都必须在嵌入前后给出相同的结果。

use crate::constants::MAX_CARRIER_BITS;
use crate::range_table::{CapacityBucket, RangeTable};

/// 一对样本的分析结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairAnalysis {
    pub bucket: CapacityBucket,
    /// 有符号差值 `b - a`
    pub difference: i32,
    /// 把差值推到区间上界时是否会越出 `[0, 255]`
    pub overflow: bool,
}

impl PairAnalysis {
    /// 该像素对实际可携带的比特数，越界或零容量时为 0。
    pub fn capacity(&self) -> u8 {
        if self.overflow { 0 } else { self.bucket.bits }
    }
}

/// 分析样本对 `(a, b)`。
pub fn analyze_pair(table: &RangeTable, a: u8, b: u8) -> PairAnalysis {
    let difference = i32::from(b) - i32::from(a);
    let bucket = table.classify(difference.unsigned_abs() as u8);
    let extreme = signed_like(difference, bucket.upper);
    PairAnalysis {
        bucket,
        difference,
        overflow: reconstruct_pair(a, b, extreme).is_none(),
    }
}

/// 赋予 `magnitude` 与差值 `difference` 相同的符号 (`difference == 0` 视为非负)。
#[inline]
pub fn signed_like(difference: i32, magnitude: i32) -> i32 {
    if difference >= 0 { magnitude } else { -magnitude }
}

/// 调整 `(a, b)` 使其差值变为 `target`，改变量尽量对称地分摊到两个样本上。
///
/// 设 `m = target - d`。`d` 为奇数时 `a` 减 `ceil(m/2)`、`b` 加 `floor(m/2)`；
/// `d` 为偶数时 `a` 减 `floor(m/2)`、`b` 加 `ceil(m/2)`。
/// 按 `d` 的奇偶取整的规则可以复合：先重建到任意中间差值再重建到 `target`，
/// 结果与直接重建到 `target` 相同，所以提取端用嵌入后的像素对做越界预检，
/// 得到的结论与嵌入端一致。
///
/// 任一结果越出 `[0, 255]` 时返回 `None`。
pub fn reconstruct_pair(a: u8, b: u8, target: i32) -> Option<(u8, u8)> {
    let (a, b) = (i32::from(a), i32::from(b));
    let d = b - a;
    let m = target - d;
    let floor_half = m.div_euclid(2);
    let ceil_half = m - floor_half;

    let (new_a, new_b) = if d % 2 != 0 {
        (a - ceil_half, b + floor_half)
    } else {
        (a - floor_half, b + ceil_half)
    };
    Some((u8::try_from(new_a).ok()?, u8::try_from(new_b).ok()?))
}

/// 自适应 PVD 中单个载体的可用区间 `[lower, upper]` 与容量。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarrierInterval {
    pub lower: i32,
    pub upper: i32,
    pub bits: u8,
}

/// 根据载体相对两个参考样本的位置 (四种符号组合) 推导可用区间。
///
/// 区间保证把载体留在原来的象限内，因此嵌入后重新分析得到同一个区间。
pub fn analyze_carrier(gu: u8, gb: u8, carrier: u8) -> CarrierInterval {
    let (gu, gb, carrier) = (i32::from(gu), i32::from(gb), i32::from(carrier));
    let du = carrier - gu;
    let db = carrier - gb;

    let (lower, upper) = match (du > 0, db > 0) {
        (true, true) => (gu.max(gb) + 1, 255),
        (false, false) => (0, gu.min(gb)),
        (true, false) => (gu + 1, gb),
        (false, true) => (gb + 1, gu),
    };

    let width = (upper - lower + 1).unsigned_abs();
    let bits = width.checked_ilog2().unwrap_or(0) as u8;
    CarrierInterval {
        lower,
        upper,
        bits: bits.min(MAX_CARRIER_BITS),
    }
}

/// 在区间内找离 `carrier` 最近、且满足 `|c - gu| ≡ value (mod 2^bits)` 的值 `c`。
/// 距离相同时取较小的值。
///
/// 区间整体位于 `gu` 的一侧，`|c - gu|` 在区间内是连续整数，
/// 因此目标值就是模 `2^bits` 同余类中夹住 `carrier` 的两个候选之一，无需逐个搜索。
pub fn nearest_carrier_value(interval: &CarrierInterval, gu: u8, carrier: u8, value: u32) -> i32 {
    let modulus = 1i32 << interval.bits;
    let gu = i32::from(gu);
    let carrier = i32::from(carrier);
    let value = value as i32;

    let residue = if interval.lower > gu { gu + value } else { gu - value };
    let below = carrier - (carrier - residue).rem_euclid(modulus);
    let above = below + modulus;

    if below < interval.lower {
        above
    } else if above > interval.upper || carrier - below <= above - carrier {
        below
    } else {
        above
    }
}

/// 从载体中读出的比特值：`|carrier - gu| mod 2^bits`。
pub fn carrier_bits(gu: u8, carrier: u8, bits: u8) -> u32 {
    let distance = u32::from(carrier.abs_diff(gu));
    distance & ((1u32 << bits) - 1)
}
