//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 集中定义分块写出器对外暴露的全部失败语义，区分“调用方可自行纠正”的用法错误与
//!   “下游写入端”引发的 IO 错误；
//! - 为日志与指标提供稳定的点分错误码，风格对齐 `spark_core::error::codes`。
//!
//! ## 设计要求（What）
//! - 所有错误类型派生 `thiserror::Error`，兼容 `std::error::Error`；
//! - 下游错误以 `#[error(transparent)]` 原样透传，不改写其 `kind` 与描述；
//! - 通过 [`From<ChunkyError>`](From) 转换为 `std::io::Error`，供 `io::Write` 实现复用。

use std::io;

use thiserror::Error;

/// 稳定错误码，用于日志字段与告警聚合。
pub mod codes {
    /// 自上一个切点以来暂存的数据超过单次写入上限。
    pub const CHUNK_TOO_LARGE: &str = "chunky.chunk_too_large";
    /// 在存在未确认数据时调用了 flush。
    pub const FLUSH_BEFORE_MARK: &str = "chunky.flush_before_mark";
    /// 下游接受的字节数少于请求写入的字节数。
    pub const SHORT_WRITE: &str = "chunky.short_write";
    /// 下游写入端直接报告的 IO 错误。
    pub const SINK: &str = "chunky.sink";
    /// 构造参数不合法。
    pub const INVALID_CONFIG: &str = "chunky.invalid_config";
}

/// 分块写出器的统一错误域。
///
/// # 教案式说明
/// - **意图 (Why)**：保留“成功 / 可恢复的调用方错误 / 下游错误”三分法，调用方据此决定是修正
///   调用顺序后继续使用实例，还是放弃该实例。
/// - **契约 (What)**：
///   - `ChunkTooLarge` 与 `FlushBeforeMark` 属于调用方错误，见 [`ChunkyError::is_recoverable`]；
///   - `ShortWrite` 与 `Sink` 来自下游，出现在 `mark`/`flush_marked` 中时实例状态可能只完成了
///     一半迁移，应视为该实例不可继续使用。
/// - **风险 (Trade-offs)**：写出器内部不做任何重试，所有错误都同步交还调用方。
#[derive(Debug, Error)]
pub enum ChunkyError {
    /// 追加后自上一个切点起的未确认字节数超过上限。
    ///
    /// 触发该错误的字节已经写入暂存缓冲且不会回滚；调用方需通过
    /// [`ChunkWriter::discard_unmarked`](crate::ChunkWriter::discard_unmarked) 丢弃或自行收尾。
    #[error("chunk of {unmarked} bytes since last mark exceeds max write length {max}")]
    ChunkTooLarge {
        /// 追加后自上一个切点起的字节数。
        unmarked: usize,
        /// 单次写入上限。
        max: usize,
    },

    /// 暂存缓冲中仍有未经 `mark` 确认的字节时调用了 flush。
    #[error("flush called before mark: {staged} bytes staged but only {marked} marked")]
    FlushBeforeMark {
        /// 活跃缓冲中的字节数。
        staged: usize,
        /// 已确认的字节数。
        marked: usize,
    },

    /// 下游只接受了部分字节。
    #[error("sink accepted {accepted} of {expected} bytes")]
    ShortWrite {
        /// 请求写入的字节数。
        expected: usize,
        /// 下游实际接受的字节数。
        accepted: usize,
    },

    /// 下游写入端报告的原始错误。
    #[error(transparent)]
    Sink(#[from] io::Error),
}

impl ChunkyError {
    /// 返回稳定错误码。
    pub fn code(&self) -> &'static str {
        match self {
            ChunkyError::ChunkTooLarge { .. } => codes::CHUNK_TOO_LARGE,
            ChunkyError::FlushBeforeMark { .. } => codes::FLUSH_BEFORE_MARK,
            ChunkyError::ShortWrite { .. } => codes::SHORT_WRITE,
            ChunkyError::Sink(_) => codes::SINK,
        }
    }

    /// 判断错误是否属于调用方可自行纠正的用法错误。
    ///
    /// - `FlushBeforeMark`：未执行任何 IO，先调用 `mark` 即可；
    /// - `ChunkTooLarge`：需先丢弃或收尾当前块；
    /// - 其余变体来自下游，返回 `false`。
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ChunkyError::ChunkTooLarge { .. } | ChunkyError::FlushBeforeMark { .. }
        )
    }
}

impl From<ChunkyError> for io::Error {
    fn from(err: ChunkyError) -> Self {
        match err {
            ChunkyError::Sink(source) => source,
            ChunkyError::ShortWrite { .. } => io::Error::new(io::ErrorKind::WriteZero, err),
            ChunkyError::ChunkTooLarge { .. } | ChunkyError::FlushBeforeMark { .. } => {
                io::Error::new(io::ErrorKind::InvalidInput, err)
            }
        }
    }
}

/// 构造写出器时的配置错误。
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// 单次写入上限必须为正数。
    #[error("max write length must be greater than zero")]
    ZeroMaxWriteLength,
}

impl ConfigError {
    /// 返回稳定错误码。
    pub fn code(&self) -> &'static str {
        codes::INVALID_CONFIG
    }
}
