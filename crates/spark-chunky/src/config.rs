//! 分块写出器的构造配置。
//!
//! # 教案级注释
//!
//! ## 意图（Why）
//! - 把“单次写入上限”与“暂存缓冲初始容量”显式建模，宿主可以从 TOML/JSON 等配置源反序列化，
//!   而不必在调用点散布魔法数字；
//! - 构造前集中校验，避免上限为零这类非法值进入状态机。
//!
//! ## 契约（What）
//! - `max_write_length`：单次下游写入的字节上限，必须大于零；
//! - `initial_capacity`：每个暂存缓冲的预分配容量，缺省时按上限预分配；
//! - 未知字段会在反序列化阶段被拒绝。

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 缺省单次写入上限：1500 字节以太网 MTU 下 IPv4 UDP 报文的最大负载。
pub const DEFAULT_MAX_WRITE_LENGTH: usize = 1472;

/// 写出器构造参数。
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChunkWriterConfig {
    max_write_length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    initial_capacity: Option<usize>,
}

impl ChunkWriterConfig {
    /// 以给定上限创建配置。
    pub fn new(max_write_length: usize) -> Self {
        Self {
            max_write_length,
            initial_capacity: None,
        }
    }

    /// 覆盖暂存缓冲的预分配容量。
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    /// 单次写入上限。
    pub fn max_write_length(&self) -> usize {
        self.max_write_length
    }

    /// 每个暂存缓冲实际使用的预分配容量。
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity.unwrap_or(self.max_write_length)
    }

    /// 校验配置是否可用于构造写出器。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_write_length == 0 {
            return Err(ConfigError::ZeroMaxWriteLength);
        }
        Ok(())
    }
}

impl Default for ChunkWriterConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WRITE_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_defaults_to_max_write_length() {
        let config = ChunkWriterConfig::new(512);
        assert_eq!(config.initial_capacity(), 512);
        assert_eq!(config.with_initial_capacity(64).initial_capacity(), 64);
    }

    #[test]
    fn zero_limit_is_rejected() {
        assert_eq!(
            ChunkWriterConfig::new(0).validate(),
            Err(ConfigError::ZeroMaxWriteLength)
        );
        assert!(ChunkWriterConfig::default().validate().is_ok());
    }

    #[test]
    fn parses_from_toml() {
        let config: ChunkWriterConfig = toml::from_str(
            r#"
            max_write_length = 1200
            initial_capacity = 4096
            "#,
        )
        .expect("合法配置应当解析成功");
        assert_eq!(config.max_write_length(), 1200);
        assert_eq!(config.initial_capacity(), 4096);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let parsed = toml::from_str::<ChunkWriterConfig>(
            r#"
            max_write_length = 1200
            mtu = 1500
            "#,
        );
        assert!(parsed.is_err());
    }
}
