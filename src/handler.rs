//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、把图像转换为核心所需的单通道网格、调用核心隐写算法以及向用户报告结果。

use crate::cli::{CapacityArgs, HideArgs, MethodArgs, MethodKind, RecoverArgs};
use crate::constants::{DELIMITER, DOCTORED_PREFIX, RECOVERED_PREFIX};
use crate::grid::SampleGrid;
use crate::range_table::RangeTable;
use crate::steganography::{Method, capacity, embed, extract, message_capacity};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和文本文件、检查隐写空间是否足够、调用隐写核心函数嵌入消息，
/// 最后将结果写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径与嵌入方式的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像或文本文件。
/// * 图像没有足够的空间来隐藏文本。
/// * 核心隐写函数 (`embed`) 在执行过程中失败。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let method = resolve_method(&args.method)?;
    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_output(&args.image, DOCTORED_PREFIX, "png"));
    ensure_writable(&dest, args.force)?;

    let cover = load_cover(&args.image)?;

    let text = fs::read(&args.text).with_context(|| {
        format!(
            "Unable to read text file: {}",
            args.text.to_string_lossy().red().bold()
        )
    })?;

    if text.windows(DELIMITER.len()).any(|w| w == DELIMITER) {
        warn!(
            text = %args.text.display(),
            "text contains the end-of-message delimiter, recovery will stop early"
        );
    }

    let required = (text.len() + DELIMITER.len()) * 8;
    let available = capacity(&cover, &method);

    anyhow::ensure!(
        available >= required,
        "Not enough space in the image to hide the text. \nRequired: {} bits, Available: {} bits",
        required.to_string().red().bold(),
        available.to_string().green().bold()
    );

    info!(%method, required, available, "embedding message");
    let stego = embed(&cover, &text, &method).with_context(|| {
        format!(
            "Failed to hide the text in '{}'.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    stego
        .into_gray_image()
        .context("The stego image dimensions do not fit an image buffer.")?
        .save(&dest)
        .with_context(|| {
            format!(
                "Unable to write to target image file: {}",
                dest.to_string_lossy().red().bold()
            )
        })?;

    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用恢复核心函数提取消息，
/// 最后将恢复的文本内容写入目标文本文件。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像文件，或它不是 8 位单通道图像。
/// * 无法写入到目标文本文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let method = resolve_method(&args.method)?;
    let dest = args
        .text
        .clone()
        .unwrap_or_else(|| default_output(&args.image, RECOVERED_PREFIX, "txt"));
    ensure_writable(&dest, args.force)?;

    let stego = load_stego(&args.image)?;

    info!(%method, image = %args.image.display(), "extracting message");
    let text = extract(&stego, &method);

    fs::write(&dest, text).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令：报告图像在指定方式下可用的比特数与消息字节数。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let method = resolve_method(&args.method)?;
    let cover = load_cover(&args.image)?;

    println!(
        "{} ({}x{}, {}): {} bits, up to {} bytes of text",
        args.image.to_string_lossy().bold(),
        cover.width(),
        cover.height(),
        method,
        capacity(&cover, &method).to_string().green().bold(),
        message_capacity(&cover, &method).to_string().green().bold()
    );
    Ok(())
}

/// 把命令行参数转换为核心使用的 `Method`。
fn resolve_method(args: &MethodArgs) -> Result<Method> {
    match (args.method, &args.ranges) {
        (MethodKind::Adaptive, Some(_)) => {
            anyhow::bail!("--ranges only applies to the fixed-range PVD methods")
        }
        (MethodKind::Adaptive, None) => Ok(Method::AdaptivePvd),
        (_, Some(widths)) => {
            let table = RangeTable::new(widths).with_context(|| {
                format!("Invalid --ranges value: {}", format!("{widths:?}").red().bold())
            })?;
            Ok(Method::Pvd(table))
        }
        (MethodKind::Pvd, None) => Ok(Method::pvd()),
        (MethodKind::PvdHigh, None) => Ok(Method::pvd_high_capacity()),
    }
}

/// 输入文件同目录下的默认输出路径：`<prefix><文件名>.<extension>`。
fn default_output(input: &Path, prefix: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{prefix}{stem}.{extension}"))
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 读取载体图像并转换为灰度网格。
fn load_cover(path: &Path) -> Result<SampleGrid> {
    let image = image::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;

    if image.color().has_color() {
        warn!(image = %path.display(), "image has colour channels, converting to grayscale");
    }
    Ok(SampleGrid::from(image.to_luma8()))
}

/// 读取隐写图像。只接受 8 位单通道图像，不做任何颜色转换。
fn load_stego(path: &Path) -> Result<SampleGrid> {
    let image = image::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;

    let (width, height) = (image.width() as usize, image.height() as usize);
    let channels = image.color().channel_count();
    SampleGrid::from_channels(width, height, channels, image.into_bytes()).with_context(|| {
        format!(
            "'{}' is not an 8-bit grayscale image. \nStego images produced by this tool are always grayscale.",
            path.to_string_lossy().red().bold()
        )
    })
}
