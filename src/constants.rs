/// 消息结束分隔符。
/// 编码时追加在消息末尾，提取时在字节边界上检测到它即停止。
/// 与 LSB 系列方案使用同一个终止符 (单个 NUL 字节)，属于线格式的一部分。
pub const DELIMITER: &[u8] = b"\0";

/// 标准容量的差值区间宽度表 (Wu & Tsai)。
/// 前缀和即各区间的边界，覆盖 `[0, 255]`。
pub const STANDARD_RANGES: [u16; 6] = [8, 8, 16, 32, 64, 128];

/// 高容量的差值区间宽度表，区间更细，低差值处每对像素可携带更少但更稳定的比特。
pub const HIGH_CAPACITY_RANGES: [u16; 13] = [2, 2, 4, 4, 4, 8, 8, 16, 16, 32, 32, 64, 64];

/// 自适应 PVD 中单个载体像素最多携带的比特数。
pub const MAX_CARRIER_BITS: u8 = 3;

/// 2×3 块中四个载体像素的位置 (行, 列)，顺序即嵌入与提取的顺序。
pub const BLOCK_CARRIERS: [(usize, usize); 4] = [(0, 0), (0, 2), (1, 0), (1, 2)];

/// 未指定输出路径时，隐写图像文件名的前缀。
pub const DOCTORED_PREFIX: &str = "doctored_";

/// 未指定输出路径时，恢复文本文件名的前缀。
pub const RECOVERED_PREFIX: &str = "recovered_";
