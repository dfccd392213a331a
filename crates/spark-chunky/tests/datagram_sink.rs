//! `DatagramSink` 回环测试：验证每次下游写入恰好成为一个 UDP 报文。
//!
//! - **Why**：数据报下游是分块写出器的主要用途，报文边界必须与写出器的切分一一对应；
//! - **How**：在回环地址上绑定接收端，写出器经 `DatagramSink` 发送，再逐个读取报文比对；
//! - **What**：读取设置超时，避免报文丢失时测试挂起。

use std::{net::UdpSocket, time::Duration};

use spark_chunky::{ChunkWriter, DatagramSink};

fn receiver() -> UdpSocket {
    let socket = UdpSocket::bind("127.0.0.1:0").expect("绑定接收端失败");
    socket
        .set_read_timeout(Some(Duration::from_secs(2)))
        .expect("设置读取超时失败");
    socket
}

fn recv(socket: &UdpSocket) -> Vec<u8> {
    let mut buf = [0u8; 64];
    let len = socket.recv(&mut buf).expect("接收报文失败");
    buf[..len].to_vec()
}

#[test]
fn each_chunk_arrives_as_one_datagram() {
    let rx = receiver();
    let sink = DatagramSink::connect("127.0.0.1:0", rx.local_addr().unwrap()).expect("连接失败");
    assert_eq!(sink.peer_addr().unwrap(), rx.local_addr().unwrap());

    let mut writer = ChunkWriter::new(sink, 8).unwrap();
    let metrics: [&[u8]; 3] = [b"a:1|c\n", b"b:2|c\n", b"cc:3|c\n"];
    for metric in metrics {
        writer.write_chunk(metric).unwrap();
        writer.mark().unwrap();
    }
    writer.flush_marked().unwrap();

    assert_eq!(recv(&rx), b"a:1|c\n");
    assert_eq!(recv(&rx), b"b:2|c\n");
    assert_eq!(recv(&rx), b"cc:3|c\n");
    assert_eq!(writer.stats().sink_writes, 3);
}

#[test]
fn small_units_share_a_datagram() {
    let rx = receiver();
    let tx = UdpSocket::bind("127.0.0.1:0").unwrap();
    tx.connect(rx.local_addr().unwrap()).unwrap();

    let mut writer = ChunkWriter::new(DatagramSink::from_socket(tx), 16).unwrap();
    writer.write_chunk(b"x:1|c\n").unwrap();
    writer.mark().unwrap();
    writer.write_chunk(b"y:2|c\n").unwrap();
    writer.mark().unwrap();
    writer.flush_marked().unwrap();

    assert_eq!(recv(&rx), b"x:1|c\ny:2|c\n");
    let socket = writer.into_inner().into_socket();
    assert_eq!(socket.peer_addr().unwrap(), rx.local_addr().unwrap());
}
