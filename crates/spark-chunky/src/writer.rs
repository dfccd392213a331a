//! 分块写出器状态机。
//!
//! # 意图（Why）
//! - 写入只进暂存缓冲，`mark` 记录安全切点，只有切点确认后的数据才会交给下游；
//! - 每次下游写入恰好一次 `write` 调用，且不会把一个语义单元拆到两次写入中。
//!
//! # 契约（What）
//! - `write_chunk` 从不触发 IO；`mark` 至多触发一次写入并仅在写入后轮换缓冲；
//!   `flush_marked` 至多触发一次写入且不轮换；
//! - 错误同步返回，内部不重试。

use std::io::{self, Write};

use bytes::Bytes;
use tracing::{debug, trace, warn};

use crate::{
    config::ChunkWriterConfig,
    error::{ChunkyError, ConfigError, codes},
    staging::StagingPair,
};

/// 写出器运行期统计快照。
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ChunkWriterStats {
    /// 成功完成的下游写入次数。
    pub sink_writes: u64,
    /// 已完整交付给下游的字节总数。
    pub bytes_delivered: u64,
    /// 暂存缓冲轮换次数。
    pub rotations: u64,
    /// 因超过上限而被拒绝的 `write_chunk` 调用次数。
    pub rejected_writes: u64,
}

/// 按语义切点聚合写入的分块写出器。
///
/// # 设计初衷（Why）
/// - 数据报、定长帧等下游要求单次写入不超过固定上限，同时调用方的一个语义单元不能被拆到两次
///   写入中；
/// - 多个小单元应尽量合并为一次下游写入，以减少系统调用与报文数量。
///
/// # 行为概览（How）
/// - [`write_chunk`](Self::write_chunk) 只追加到活跃暂存缓冲，不触发 IO；
/// - [`mark`](Self::mark) 声明当前末尾为安全切点：累计长度未超上限时仅推进切点，否则把上一个
///   切点之前的数据一次写出，并把切点之后的尾部轮换到另一个缓冲；
/// - [`flush_marked`](Self::flush_marked) 在全部数据都已确认时一次写出。
///
/// # 契约说明（What）
/// - 任意一次成功操作序列中，每次下游写入都不超过 `max_write_length`，且下游收到的字节拼接后
///   与写入的字节完全一致；
/// - 非并发安全：所有修改操作都需要 `&mut self`；
/// - 丢弃实例不会触发任何 IO，未写出的暂存数据随之丢失。
///
/// # 风险提示（Trade-offs）
/// - `write_chunk` 先追加再校验，超限字节会留在缓冲中，需调用
///   [`discard_unmarked`](Self::discard_unmarked) 才能继续安全使用；
/// - `mark`/`flush_marked` 失败后状态可能只完成部分迁移，写出器不做回滚或重试。
#[derive(Debug)]
pub struct ChunkWriter<W> {
    sink: W,
    max_write_length: usize,
    mark: usize,
    staging: StagingPair,
    stats: ChunkWriterStats,
}

impl<W: Write> ChunkWriter<W> {
    /// 以给定上限构造写出器，上限为零时返回 [`ConfigError::ZeroMaxWriteLength`]。
    pub fn new(sink: W, max_write_length: usize) -> Result<Self, ConfigError> {
        Self::with_config(sink, &ChunkWriterConfig::new(max_write_length))
    }

    /// 按配置构造写出器。
    pub fn with_config(sink: W, config: &ChunkWriterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            sink,
            max_write_length: config.max_write_length(),
            mark: 0,
            staging: StagingPair::with_capacity(config.initial_capacity()),
            stats: ChunkWriterStats::default(),
        })
    }

    /// 暂存一段数据，成功时返回其完整长度。
    ///
    /// 追加后若自上一个切点起的字节数超过上限，返回 [`ChunkyError::ChunkTooLarge`]；
    /// 此时数据已留在缓冲中，不会回滚。
    pub fn write_chunk(&mut self, data: &[u8]) -> Result<usize, ChunkyError> {
        self.staging.append(data);

        let unmarked = self.unmarked_len();
        if unmarked > self.max_write_length {
            self.stats.rejected_writes += 1;
            warn!(
                code = codes::CHUNK_TOO_LARGE,
                unmarked,
                max_write_length = self.max_write_length,
                "chunk exceeds max write length"
            );
            return Err(ChunkyError::ChunkTooLarge {
                unmarked,
                max: self.max_write_length,
            });
        }

        trace!(len = data.len(), unmarked, "staged write");
        Ok(data.len())
    }

    /// 将当前末尾标记为安全切点，必要时写出上一个切点之前的数据。
    pub fn mark(&mut self) -> Result<(), ChunkyError> {
        let staged = self.staging.len();
        if staged <= self.max_write_length {
            self.mark = staged;
            trace!(mark = staged, "advanced mark");
            return Ok(());
        }

        // 继续延迟会让下一次增长突破上限，先写出上一个切点之前的部分。
        let flushed = self.mark;
        self.deliver(flushed)?;
        self.mark = self.staging.rotate(flushed);
        self.stats.rotations += 1;
        debug!(
            flushed,
            carried = self.mark,
            second_active = self.staging.is_second_active(),
            "rotated staging buffers"
        );
        Ok(())
    }

    /// 写出切点之前的全部数据。
    ///
    /// 存在未经 [`mark`](Self::mark) 确认的数据时返回 [`ChunkyError::FlushBeforeMark`]，
    /// 且不触发任何 IO。
    pub fn flush_marked(&mut self) -> Result<(), ChunkyError> {
        let staged = self.staging.len();
        if staged != self.mark {
            return Err(ChunkyError::FlushBeforeMark {
                staged,
                marked: self.mark,
            });
        }

        self.deliver(staged)?;
        self.staging.reset_active();
        self.mark = 0;
        debug!(flushed = staged, "flushed marked data");
        Ok(())
    }

    /// 丢弃上一个切点之后的全部暂存字节，返回丢弃的字节数。
    ///
    /// 用于在 [`ChunkyError::ChunkTooLarge`] 之后放弃当前块，不触发 IO。
    pub fn discard_unmarked(&mut self) -> usize {
        let dropped = self.unmarked_len();
        self.staging.truncate_active(self.mark);
        if dropped > 0 {
            debug!(dropped, mark = self.mark, "discarded unmarked bytes");
        }
        dropped
    }

    /// 以一次调用把活跃缓冲的前 `len` 字节交给下游。
    ///
    /// `len` 为零时同样发起一次空写入，下游观察到的调用序列与切点一一对应。
    fn deliver(&mut self, len: usize) -> Result<(), ChunkyError> {
        let accepted = self.sink.write(&self.staging.active()[..len])?;
        if accepted != len {
            warn!(
                code = codes::SHORT_WRITE,
                expected = len,
                accepted,
                "sink accepted fewer bytes than requested"
            );
            return Err(ChunkyError::ShortWrite {
                expected: len,
                accepted,
            });
        }

        self.stats.sink_writes += 1;
        self.stats.bytes_delivered += len as u64;
        Ok(())
    }
}

impl<W> ChunkWriter<W> {
    /// 单次下游写入的字节上限。
    pub fn max_write_length(&self) -> usize {
        self.max_write_length
    }

    /// 活跃缓冲中暂存的字节数。
    pub fn staged_len(&self) -> usize {
        self.staging.len()
    }

    /// 已确认为安全切点的字节数。
    pub fn marked_len(&self) -> usize {
        self.mark
    }

    /// 上一个切点之后尚未确认的字节数。
    pub fn unmarked_len(&self) -> usize {
        self.staging.len().saturating_sub(self.mark)
    }

    /// 是否没有任何暂存数据。
    pub fn is_empty(&self) -> bool {
        self.staging.len() == 0
    }

    /// 统计快照。
    pub fn stats(&self) -> ChunkWriterStats {
        self.stats
    }

    /// 下游写入端的只读引用。
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// 下游写入端的可变引用。直接写入会破坏分块边界，仅用于配置或诊断。
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    /// 取回下游写入端，暂存数据被丢弃。
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// 取回下游写入端与活跃缓冲中仍暂存的字节。
    pub fn into_parts(self) -> (W, Bytes) {
        (self.sink, self.staging.into_active())
    }
}

impl<W: Write> Write for ChunkWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_chunk(buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_marked().map_err(io::Error::from)?;
        self.sink.flush()
    }
}
