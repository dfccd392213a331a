//! 暂存缓冲对及其轮换逻辑。
//!
//! # 意图（Why）
//! - 把“两块缓冲 + 活跃选择位”从状态机中独立出来，写出器只需关心切点与下游写入。
//!
//! # 契约（What）
//! - 轮换只搬移切点之后的尾部，逐字节保序；
//! - 备用缓冲在轮换前恒为空。

use bytes::{Bytes, BytesMut};

/// 一对可互换的暂存缓冲：任一时刻恰有一个处于活跃状态，另一个作为备用。
///
/// # 设计动机（Why）
/// - 常见路径只在活跃缓冲尾部追加，均摊 O(1)；
/// - 当切点之前的数据被强制写出时，只需把“上一个切点之后”的尾部复制进备用缓冲再交换角色，
///   复制量受单次写入上限约束，不会随累计数据增长。
///
/// # 结构设计（How）
/// - `buffers` 为定长数组，由 `second_active` 布尔值选择活跃下标；
/// - 备用缓冲在成为备用时即被清空，因此轮换前恒为空。
///
/// # 契约（What）
/// - 缓冲完全由写出器独占，不向调用方暴露可变引用；
/// - 轮换只复制尾部字节，保持字节序不变。
#[derive(Debug)]
pub(crate) struct StagingPair {
    buffers: [BytesMut; 2],
    second_active: bool,
}

impl StagingPair {
    /// 为两个缓冲各预分配 `capacity` 字节。
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            buffers: [
                BytesMut::with_capacity(capacity),
                BytesMut::with_capacity(capacity),
            ],
            second_active: false,
        }
    }

    fn active_index(&self) -> usize {
        usize::from(self.second_active)
    }

    /// 活跃缓冲的只读视图。
    pub(crate) fn active(&self) -> &[u8] {
        &self.buffers[self.active_index()]
    }

    /// 活跃缓冲当前长度。
    pub(crate) fn len(&self) -> usize {
        self.buffers[self.active_index()].len()
    }

    /// 当前是否由第二个缓冲承担活跃角色。
    pub(crate) fn is_second_active(&self) -> bool {
        self.second_active
    }

    /// 追加到活跃缓冲尾部。
    pub(crate) fn append(&mut self, data: &[u8]) {
        let index = self.active_index();
        self.buffers[index].extend_from_slice(data);
    }

    /// 清空活跃缓冲，保留已分配容量。
    pub(crate) fn reset_active(&mut self) {
        let index = self.active_index();
        self.buffers[index].clear();
    }

    /// 将活跃缓冲截断到 `len` 字节。
    pub(crate) fn truncate_active(&mut self, len: usize) {
        let index = self.active_index();
        self.buffers[index].truncate(len);
    }

    /// 把活跃缓冲中 `from..` 的尾部搬入备用缓冲，清空原活跃缓冲并交换角色。
    ///
    /// 返回搬移的尾部长度，即新活跃缓冲的长度。
    pub(crate) fn rotate(&mut self, from: usize) -> usize {
        let [first, second] = &mut self.buffers;
        let (active, standby) = if self.second_active {
            (second, first)
        } else {
            (first, second)
        };
        debug_assert!(standby.is_empty(), "备用缓冲在轮换前必须为空");

        standby.extend_from_slice(&active[from..]);
        active.clear();
        self.second_active = !self.second_active;
        standby.len()
    }

    /// 消耗缓冲对，返回活跃缓冲中仍暂存的全部字节。
    pub(crate) fn into_active(self) -> Bytes {
        let [first, second] = self.buffers;
        if self.second_active {
            second.freeze()
        } else {
            first.freeze()
        }
    }
}
