//! # 比特流编解码模块
//!
//! 负责消息与比特序列之间的转换：
//!
//! * [`encode`] 在消息末尾追加分隔符，并按字节大端 (高位在前) 展开为比特序列。
//! * [`MessageCollector`] 在提取过程中逐组接收宽度不定的比特，
//!   每跨过一个字节边界就检查最近的若干字节是否等于分隔符。
//!
//! 分隔符帧存在已知的歧义：若消息本身在字节边界处包含分隔符，
//! 提取会在那里提前结束并截断消息。

use crate::constants::DELIMITER;

/// 待嵌入的比特序列，按从前到后的顺序被消费。
#[derive(Debug, Clone)]
pub struct BitSequence {
    bytes: Vec<u8>,
    cursor: usize,
}

/// 使用默认分隔符为消息分帧。
pub fn encode(message: &[u8]) -> BitSequence {
    encode_with(message, DELIMITER)
}

/// 使用指定分隔符为消息分帧，长度为 `8 * (message.len() + delimiter.len())` 比特。
pub fn encode_with(message: &[u8], delimiter: &[u8]) -> BitSequence {
    let mut bytes = Vec::with_capacity(message.len() + delimiter.len());
    bytes.extend_from_slice(message);
    bytes.extend_from_slice(delimiter);
    BitSequence { bytes, cursor: 0 }
}

impl BitSequence {
    /// 序列的总比特数。
    pub fn len(&self) -> usize {
        self.bytes.len() * 8
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// 尚未被消费的比特数。
    pub fn remaining(&self) -> usize {
        self.len() - self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// 取出接下来的 `width` 个比特，按高位在前组成无符号整数。
    ///
    /// 序列末尾不足 `width` 位时，剩余比特占据高位，低位补零，
    /// 这样提取端拼出的比特流仍以完整的帧开头，只是尾部多出不足一个字节的填充。
    pub fn take(&mut self, width: u8) -> u32 {
        let mut value = 0u32;
        for _ in 0..width {
            value <<= 1;
            if self.cursor < self.len() {
                let byte = self.bytes[self.cursor / 8];
                value |= u32::from((byte >> (7 - self.cursor % 8)) & 1);
                self.cursor += 1;
            }
        }
        value
    }
}

/// 提取端的比特累加器，负责检测分隔符并还原消息字节。
#[derive(Debug, Clone)]
pub struct MessageCollector {
    delimiter: Vec<u8>,
    bytes: Vec<u8>,
    bit_len: usize,
    checked_bytes: usize,
    message_len: Option<usize>,
}

impl Default for MessageCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageCollector {
    pub fn new() -> Self {
        Self::with_delimiter(DELIMITER)
    }

    pub fn with_delimiter(delimiter: &[u8]) -> Self {
        Self {
            delimiter: delimiter.to_vec(),
            bytes: Vec::new(),
            bit_len: 0,
            checked_bytes: 0,
            message_len: None,
        }
    }

    /// 追加一组 `width` 位的比特 (`value` 的低 `width` 位，高位在前)。
    ///
    /// 返回 `true` 表示已经找到分隔符，后续追加的比特会被忽略。
    pub fn push(&mut self, value: u32, width: u8) -> bool {
        if self.is_complete() {
            return true;
        }

        for shift in (0..width).rev() {
            let offset = self.bit_len % 8;
            if offset == 0 {
                self.bytes.push(0);
            }
            if (value >> shift) & 1 == 1 {
                if let Some(last) = self.bytes.last_mut() {
                    *last |= 0x80 >> offset;
                }
            }
            self.bit_len += 1;
        }

        // 只在新跨过的字节边界上检查，未对齐的尾部比特不参与比较
        let boundary = self.bit_len / 8;
        while self.checked_bytes < boundary {
            self.checked_bytes += 1;
            if self.delimiter_ends_at(self.checked_bytes) {
                self.message_len = Some(self.checked_bytes - self.delimiter.len());
                return true;
            }
        }
        false
    }

    fn delimiter_ends_at(&self, end: usize) -> bool {
        let len = self.delimiter.len();
        len > 0 && end >= len && self.bytes[end - len..end] == self.delimiter[..]
    }

    pub fn is_complete(&self) -> bool {
        self.message_len.is_some()
    }

    /// 已累计的比特数。
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// 取出消息。找到分隔符时丢弃分隔符及其后的比特；
    /// 否则只返回已经凑满的完整字节 (静默截断)。
    pub fn into_message(mut self) -> Vec<u8> {
        let len = self.message_len.unwrap_or(self.bit_len / 8);
        self.bytes.truncate(len);
        self.bytes
    }
}
