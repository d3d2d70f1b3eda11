//! Integration tests for opwire-client.
//!
//! These tests drive the public API end to end: byte-exact packets, the
//! streaming decoder, and connections over real loopback TCP sockets.

use opwire_client::protocol::{
    decode_length_prefixed, decode_single, encode_length_prefixed, encode_single, Command,
    DeviceOpcode, DeviceToggleProtocol, FrameBuffer, MessageOpcode, MessageProtocol, HEADER_SIZE,
};
use opwire_client::shell::{device_commands, message_commands, Shell};
use opwire_client::{ClientConfig, Connection, FramingError, OpwireError};
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;

/// Bind an ephemeral loopback listener and a config pointing at it.
async fn loopback() -> (TcpListener, ClientConfig) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let config = ClientConfig {
        port,
        ..ClientConfig::default()
    };
    (listener, config)
}

#[test]
fn test_concrete_wire_scenarios() {
    assert_eq!(
        encode_length_prefixed(2, "Hello, Server!").unwrap(),
        b"\x02\x00\x00\x00\x00\x00\x00\x0eHello, Server!".to_vec()
    );
    assert_eq!(
        encode_length_prefixed(3, "").unwrap(),
        b"\x03\x00\x00\x00\x00\x00\x00\x00".to_vec()
    );
    assert_eq!(&encode_single(0x06).unwrap()[..], b"\x06");
    assert!(matches!(
        decode_length_prefixed(b"\x02\x00\x00\x00\x00\x00\x00\x05Hi"),
        Err(FramingError::TruncatedPayload { .. })
    ));
    assert!(matches!(
        decode_single(b"\x04\x05"),
        Err(FramingError::WrongLength { .. })
    ));
}

#[test]
fn test_padding_and_length_fields_for_many_messages() {
    let long = "z".repeat(1000);
    let messages = ["", "x", "Hello, Server!", "ünïcødé", long.as_str()];
    for message in messages {
        let packet = encode_length_prefixed(2, message).unwrap();
        assert_eq!(&packet[1..4], &[0, 0, 0]);
        let length = u32::from_be_bytes(packet[4..8].try_into().unwrap());
        assert_eq!(length as usize, message.len());
        assert_eq!(packet.len(), HEADER_SIZE + message.len());
    }
}

#[test]
fn test_stream_of_packets_split_at_every_offset() {
    let commands = vec![
        Command::message_text("first"),
        Command::message_text(""),
        Command::message_text("third → ✓"),
        Command::shutdown(),
    ];
    let stream: Vec<u8> = commands
        .iter()
        .flat_map(|c| c.encode().unwrap())
        .collect();

    for split in 0..=stream.len() {
        let mut buffer = FrameBuffer::new();
        let mut frames = buffer.push(&stream[..split]).unwrap();
        frames.extend(buffer.push(&stream[split..]).unwrap());

        let decoded: Vec<Command> = frames
            .into_iter()
            .map(|f| Command::try_from(f).unwrap())
            .collect();
        assert_eq!(decoded, commands, "split at {}", split);
        assert!(buffer.is_empty());
    }
}

#[tokio::test]
async fn test_message_client_over_tcp() {
    let (listener, config) = loopback().await;

    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let mut conn = Connection::new(socket, MessageProtocol::default());
        let mut received = Vec::new();
        while let Some(command) = conn.recv().await.unwrap() {
            received.push(command);
        }
        received
    });

    let mut client = Connection::connect(&config, MessageProtocol::new(config.framing_options()))
        .await
        .unwrap();
    assert_eq!(client.peer_addr().unwrap().port(), config.port);

    client.send(&Command::message_text("Hello, Server!")).await.unwrap();
    client.send(&Command::close_connection()).await.unwrap();
    client.shutdown().await.unwrap();

    let received = server.await.unwrap();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0].opcode(), MessageOpcode::Message);
    assert_eq!(received[0].message(), "Hello, Server!");
    assert_eq!(received[1].opcode(), MessageOpcode::CloseConnection);
}

#[tokio::test]
async fn test_configured_limit_blocks_oversize_send() {
    let (_listener, config) = loopback().await;
    let mut client = Connection::connect(&config, MessageProtocol::new(config.framing_options()))
        .await
        .unwrap();

    let too_big = "a".repeat(config.max_message_size as usize + 1);
    let err = client.send(&Command::message_text(too_big)).await.unwrap_err();
    assert!(matches!(err, OpwireError::Encoding(_)));
}

#[tokio::test]
async fn test_device_shell_over_tcp() {
    let (listener, config) = loopback().await;

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut bytes = Vec::new();
        socket.read_to_end(&mut bytes).await.unwrap();
        bytes
    });

    let mut conn = Connection::connect(&config, DeviceToggleProtocol).await.unwrap();
    let input: &[u8] = b"green_on\nyellow_on\nnope\nyellow_off\nexit\n";
    let mut output = Vec::new();
    Shell::new(device_commands())
        .run(input, &mut output, &mut conn)
        .await
        .unwrap();

    let bytes = server.await.unwrap();
    assert_eq!(bytes, vec![0x04, 0x08, 0x09, 0x03]);

    let decoded: Vec<DeviceOpcode> = bytes
        .iter()
        .map(|b| decode_single(std::slice::from_ref(b)).unwrap())
        .collect();
    assert_eq!(decoded.last(), Some(&DeviceOpcode::CloseConnection));
    assert!(String::from_utf8(output).unwrap().contains("Unknown command: nope"));
}

#[tokio::test]
async fn test_message_shell_shutdown_over_tcp() {
    let (listener, config) = loopback().await;

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut bytes = Vec::new();
        socket.read_to_end(&mut bytes).await.unwrap();
        bytes
    });

    let mut conn = Connection::connect(&config, MessageProtocol::new(config.framing_options()))
        .await
        .unwrap();
    let input: &[u8] = b"send status report\nshutdown\n";
    Shell::new(message_commands())
        .run(input, tokio::io::sink(), &mut conn)
        .await
        .unwrap();

    let bytes = server.await.unwrap();
    let mut expected = encode_length_prefixed(2, "status report").unwrap();
    expected.extend(encode_length_prefixed(6, "").unwrap());
    assert_eq!(bytes, expected);
}

#[tokio::test]
async fn test_connect_refused_is_io_error() {
    let (listener, config) = loopback().await;
    drop(listener);

    let result = Connection::connect(&config, DeviceToggleProtocol).await;
    assert!(matches!(result, Err(OpwireError::Io(_))));
}
