//! 面向已连接 UDP 套接字的下游写入端。
//!
//! # 模块定位（Why）
//! - 分块写出器最典型的下游是数据报：每次 `write` 恰好对应一个报文，报文长度受 MTU 约束，
//!   且一个语义单元被拆到两个报文中就会在接收端失去边界；
//! - 标准库 `UdpSocket` 并不实现 `io::Write`，本模块补上这层薄封装，使其可直接交给
//!   [`ChunkWriter`](crate::ChunkWriter)。
//!
//! # 契约（What）
//! - 套接字必须已经 `connect` 到对端，`write` 委托给 `send`，一次调用发送一个报文；
//! - `flush` 无事可做，始终成功；
//! - 内核报告的发送字节数原样返回，短写由写出器判定为 `ShortWrite`。

use std::{
    io::{self, Write},
    net::{SocketAddr, ToSocketAddrs, UdpSocket},
};

use tracing::debug;

/// 以数据报为单位发送的下游写入端。
#[derive(Debug)]
pub struct DatagramSink {
    socket: UdpSocket,
}

impl DatagramSink {
    /// 绑定 `local` 并连接到 `peer`。
    pub fn connect<L, P>(local: L, peer: P) -> io::Result<Self>
    where
        L: ToSocketAddrs,
        P: ToSocketAddrs,
    {
        let socket = UdpSocket::bind(local)?;
        socket.connect(peer)?;
        debug!(
            local = %socket.local_addr()?,
            peer = %socket.peer_addr()?,
            "datagram sink connected"
        );
        Ok(Self { socket })
    }

    /// 包装一个已连接的套接字。
    pub fn from_socket(socket: UdpSocket) -> Self {
        Self { socket }
    }

    /// 本地绑定地址。
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// 已连接的对端地址。
    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.socket.peer_addr()
    }

    /// 底层套接字的只读引用。
    pub fn socket(&self) -> &UdpSocket {
        &self.socket
    }

    /// 取回底层套接字。
    pub fn into_socket(self) -> UdpSocket {
        self.socket
    }
}

impl Write for DatagramSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.socket.send(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
