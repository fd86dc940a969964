//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::{Args, Parser, ValueEnum};
use std::path::PathBuf;

/// 一款基于像素值差分 (PVD) 隐写术的命令行工具，用于在无损格式灰度图像 (如 PNG, BMP) 中隐藏或恢复文本。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于像素值差分 (PVD) 隐写术的命令行工具，用于在无损格式灰度图像 (如 PNG, BMP) 中隐藏或恢复文本。\n彩色图像在隐藏前会被转换为灰度，结果图像总是单通道的。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 输出 info 级别的日志。
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 输出 debug 级别的日志。
    #[arg(long, global = true)]
    pub debug: bool,
}

/// 可用的子命令：hide (隐藏)、recover (恢复) 和 capacity (容量)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在无损格式图像中隐藏文本文件内容。
    Hide(HideArgs),

    /// 从经过隐写的灰度图像中恢复隐藏的文本。
    Recover(RecoverArgs),

    /// 显示图像在指定嵌入方式下能隐藏的数据量。
    Capacity(CapacityArgs),
}

/// 嵌入方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MethodKind {
    /// 固定区间 PVD，标准区间表 (8, 8, 16, 32, 64, 128)。
    #[default]
    Pvd,
    /// 固定区间 PVD，高容量区间表。
    PvdHigh,
    /// 2×3 块自适应 PVD。
    Adaptive,
}

/// 选择嵌入方式的参数，隐藏与恢复时必须一致。
#[derive(Args, Debug, Clone, Default)]
pub struct MethodArgs {
    /// 嵌入方式。
    #[arg(short, long, value_enum, default_value_t = MethodKind::Pvd)]
    pub method: MethodKind,

    /// 自定义区间宽度 (逗号分隔，总和至少 256)，覆盖固定区间 PVD 的内置区间表。
    #[arg(long, value_delimiter = ',')]
    pub ranges: Option<Vec<u16>>,
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文本内容的文件路径。
    #[arg(short, long)]
    pub text: PathBuf,

    /// 隐写完成后，保存结果图像的输出路径。
    /// 默认为输入图像同目录下的 `doctored_<文件名>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,

    #[command(flatten)]
    pub method: MethodArgs,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏文本数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复文本后，保存文本内容的输出路径。
    /// 默认为图像同目录下的 `recovered_<文件名>.txt`。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,

    #[command(flatten)]
    pub method: MethodArgs,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 要检查的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    #[command(flatten)]
    pub method: MethodArgs,
}
