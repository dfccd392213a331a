#![warn(missing_docs)]

//! `spark-chunky` 提供按语义切点聚合写入的分块写出器。
//!
//! # 模块定位（Why）
//! - 数据报等下游要求单次写入不超过固定上限，而调用方的一个语义单元（如一条指标、一条日志）
//!   不能被拆到两次写入中；
//! - 多个小单元应尽量合并成一次下游写入，从而减少系统调用与报文数量。
//!
//! # 设计概要（How）
//! - `writer` 模块实现 [`ChunkWriter`] 状态机：写入只进暂存缓冲，`mark` 记录安全切点并在必要时
//!   写出，`flush_marked` 在全部数据确认后写出；
//! - `staging` 模块维护一对可互换的暂存缓冲，溢出时只搬移切点之后的尾部再交换角色；
//! - `sink` 模块提供 [`DatagramSink`]，把已连接的 `UdpSocket` 适配为 `io::Write`；
//! - 错误统一为 [`ChunkyError`]，配置统一为 [`ChunkWriterConfig`]。
//!
//! # 使用示例
//!
//! ```
//! use spark_chunky::ChunkWriter;
//!
//! let mut writer = ChunkWriter::new(Vec::new(), 8).unwrap();
//! writer.write_chunk(b"cpu:1|c\n").unwrap();
//! writer.mark().unwrap();
//! writer.flush_marked().unwrap();
//! assert_eq!(writer.get_ref().as_slice(), b"cpu:1|c\n");
//! ```
//!
//! # 契约说明（What）
//! - 写出器不解析字节内容，只关心长度与切点；
//! - 非并发安全，调用方需串行化全部调用；
//! - 写出器内部不做任何重试，所有错误同步返回。

mod config;
mod error;
mod sink;
mod staging;
mod writer;

pub use config::{ChunkWriterConfig, DEFAULT_MAX_WRITE_LENGTH};
pub use error::{ChunkyError, ConfigError, codes};
pub use sink::DatagramSink;
pub use writer::{ChunkWriter, ChunkWriterStats};
