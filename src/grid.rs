//! # 样本网格模块
//!
//! `SampleGrid` 是隐写核心唯一接受的图像表示：按行优先存储的单通道 8 位样本。
//! 多通道图像必须先由调用方 (见 `handler`) 转换为灰度。

use crate::error::{Result, StegoError};
use image::GrayImage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleGrid {
    width: usize,
    height: usize,
    samples: Vec<u8>,
}

impl SampleGrid {
    /// 由行优先的样本缓冲区构造网格。
    ///
    /// # Errors
    ///
    /// 当 `samples.len() != width * height` 时返回 `StegoError::ShapeMismatch`。
    pub fn new(width: usize, height: usize, samples: Vec<u8>) -> Result<Self> {
        if width.checked_mul(height) != Some(samples.len()) {
            return Err(StegoError::ShapeMismatch {
                width,
                height,
                len: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// 由交错存储的多通道缓冲区构造网格，仅接受单通道输入。
    ///
    /// 核心不会猜测如何把彩色图像降为灰度，遇到多通道数据直接报错。
    pub fn from_channels(
        width: usize,
        height: usize,
        channels: u8,
        samples: Vec<u8>,
    ) -> Result<Self> {
        if channels != 1 {
            return Err(StegoError::NotSingleChannel { channels });
        }
        Self::new(width, height, samples)
    }

    /// 所有样本取同一个值的网格，主要用于测试。
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            samples: vec![value; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.samples[row * self.width + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.samples[row * self.width + col] = value;
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.samples
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.samples
    }

    /// 转换回 `image` 的灰度图像以便保存。
    pub fn into_gray_image(self) -> Option<GrayImage> {
        let width = u32::try_from(self.width).ok()?;
        let height = u32::try_from(self.height).ok()?;
        GrayImage::from_raw(width, height, self.samples)
    }
}

impl From<GrayImage> for SampleGrid {
    fn from(image: GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width: width as usize,
            height: height as usize,
            samples: image.into_raw(),
        }
    }
}
