//! # Spec Parser Tests
//!
//! Validates the self-terminating opcode stream: argument handling,
//! truncation, unknown opcodes, the length limit, and what the async reader
//! leaves behind for the data phase.

use isl_cipher::{read_spec, CipherSpec, Opcode, Operation, ParseStatus, SpecParser};
use isl_core::IslError;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};

#[test]
fn test_opcode_table_arity() {
    assert_eq!(Opcode::from_byte(0x00), Some(Opcode::End));
    assert_eq!(Opcode::from_byte(0x02).map(Opcode::arity), Some(1));
    assert_eq!(Opcode::from_byte(0x04).map(Opcode::arity), Some(1));
    for zero_arg in [0x00, 0x01, 0x03, 0x05] {
        assert_eq!(Opcode::from_byte(zero_arg).map(Opcode::arity), Some(0));
    }
    // Sub operations exist only inside derived inverses.
    assert_eq!(Opcode::from_byte(0x06), None);
    assert_eq!(Opcode::from_byte(0x07), None);
}

#[test]
fn test_parser_stops_at_terminator() {
    let mut parser = SpecParser::new(80);
    assert_eq!(parser.push(0x01).unwrap(), ParseStatus::Incomplete);
    assert_eq!(parser.push(0x00).unwrap(), ParseStatus::Complete);
    assert!(parser.is_complete());
    assert_eq!(parser.finish().unwrap(), vec![0x01, 0x00]);
}

/// A zero argument must be consumed as the constant, not as the terminator.
#[test]
fn test_parser_zero_argument_is_not_terminator() {
    let mut parser = SpecParser::new(80);
    assert_eq!(parser.push(0x02).unwrap(), ParseStatus::Incomplete);
    assert_eq!(parser.push(0x00).unwrap(), ParseStatus::Incomplete);
    assert_eq!(parser.push(0x04).unwrap(), ParseStatus::Incomplete);
    // Argument bytes may look like unknown opcodes too.
    assert_eq!(parser.push(0xff).unwrap(), ParseStatus::Incomplete);
    assert_eq!(parser.push(0x00).unwrap(), ParseStatus::Complete);
    assert_eq!(parser.finish().unwrap(), vec![0x02, 0x00, 0x04, 0xff, 0x00]);
}

#[test]
fn test_parser_rejects_unknown_opcode() {
    let mut parser = SpecParser::new(80);
    parser.push(0x01).unwrap();
    let err = parser.push(0x06).unwrap_err();
    assert!(
        matches!(err, IslError::UnknownOpcode { opcode: 0x06, offset: 1 }),
        "unexpected error: {err}"
    );
    assert!(err.is_protocol_violation());
}

#[test]
fn test_parser_unfinished_is_truncated() {
    let mut parser = SpecParser::new(80);
    parser.push(0x02).unwrap();
    let err = parser.finish().unwrap_err();
    assert!(matches!(err, IslError::TruncatedSpec { read: 1 }));
}

#[test]
fn test_parser_length_limit_excludes_terminator() {
    let mut parser = SpecParser::new(4);
    for byte in [0x01, 0x02, 0x10, 0x05] {
        assert_eq!(parser.push(byte).unwrap(), ParseStatus::Incomplete);
    }
    assert_eq!(parser.push(0x00).unwrap(), ParseStatus::Complete);

    let mut parser = SpecParser::new(4);
    for byte in [0x01, 0x01, 0x01, 0x01] {
        parser.push(byte).unwrap();
    }
    assert!(matches!(parser.push(0x01), Err(IslError::SpecTooLong { limit: 4 })));
}

#[test]
fn test_from_wire_ignores_trailing_bytes() {
    let spec = CipherSpec::from_wire(&[0x02, 0x01, 0x00, 0x99, 0x98], 80).unwrap();
    assert_eq!(spec.operations(), &[Operation::XorConst(1)]);

    assert!(matches!(
        CipherSpec::from_wire(&[0x02, 0x01], 80),
        Err(IslError::TruncatedSpec { read: 2 })
    ));
}

#[test]
fn test_compile_rejects_dangling_argument() {
    assert!(matches!(
        CipherSpec::compile(&[0x01, 0x04]),
        Err(IslError::TruncatedSpec { .. })
    ));
    assert!(matches!(
        CipherSpec::compile(&[0x01, 0x09, 0x00]),
        Err(IslError::UnknownOpcode { opcode: 0x09, offset: 1 })
    ));
}

#[test]
fn test_to_wire_roundtrip_and_inverse_has_no_wire_form() {
    let raw = vec![0x02, 0x7b, 0x05, 0x01, 0x04, 0x00, 0x03, 0x00];
    let spec = CipherSpec::from_wire(&raw, 80).unwrap();
    assert_eq!(spec.to_wire(), Some(raw));
    assert_eq!(CipherSpec::default().to_wire(), Some(vec![0x00]));

    // subpos / sub(n) never travel on the wire.
    assert_eq!(spec.inverse().to_wire(), None);
}

/// The reader consumes exactly the spec; buffered bytes after the terminator
/// remain available for the data phase.
#[tokio::test]
async fn test_read_spec_leaves_data_in_reader() {
    let (mut client, server) = tokio::io::duplex(64);
    client.write_all(&[0x02, 0x00, 0x05, 0x00, b'x', b'y']).await.unwrap();
    drop(client);

    let mut reader = BufReader::new(server);
    let raw = read_spec(&mut reader, 80).await.unwrap();
    assert_eq!(raw, vec![0x02, 0x00, 0x05, 0x00]);

    let mut rest = Vec::new();
    reader.read_to_end(&mut rest).await.unwrap();
    assert_eq!(rest, b"xy");
}

#[tokio::test]
async fn test_read_spec_truncated_by_eof() {
    let (mut client, server) = tokio::io::duplex(64);
    client.write_all(&[0x01, 0x02]).await.unwrap();
    drop(client);

    let mut reader = BufReader::new(server);
    let err = read_spec(&mut reader, 80).await.unwrap_err();
    assert!(matches!(err, IslError::TruncatedSpec { read: 2 }), "unexpected error: {err}");
}

/// The spec may arrive one byte per segment.
#[tokio::test]
async fn test_read_spec_across_partial_writes() {
    let (mut client, server) = tokio::io::duplex(1);
    let writer = tokio::spawn(async move {
        for byte in [0x04, 0x00, 0x03, 0x00] {
            client.write_all(&[byte]).await.unwrap();
            tokio::task::yield_now().await;
        }
        client
    });

    let mut reader = BufReader::new(server);
    let raw = read_spec(&mut reader, 80).await.unwrap();
    assert_eq!(raw, vec![0x04, 0x00, 0x03, 0x00]);
    let _client = writer.await.unwrap();
}
