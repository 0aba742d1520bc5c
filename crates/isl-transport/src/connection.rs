use crate::stream::{ObfuscatedReader, ObfuscatedWriter};
use isl_cipher::{read_spec, CipherSpec, Transform};
use isl_codec::LineHandler;
use isl_core::{IslError, ServerConfig, Session};
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};

/// Drives one client connection from the spec exchange to end-of-stream.
///
/// 1. Reads the unobfuscated spec and compiles it.
/// 2. Rejects no-op specs before any application byte is touched.
/// 3. Decodes request lines with the inverse chain, answers them through
///    `handler`, and encodes each response with the forward chain.
///
/// Returns `Ok(())` when the client closes the stream cleanly.
pub async fn handle_connection<S>(
    stream: S,
    session: &mut Session,
    config: &ServerConfig,
    handler: &dyn LineHandler,
) -> Result<(), IslError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (read_half, write_half) = tokio::io::split(stream);
    let mut reader = BufReader::new(read_half);

    let raw = read_spec(&mut reader, config.max_spec_len).await?;
    let spec = CipherSpec::compile(&raw)?;
    tracing::debug!("{} cipher spec {:02x?} => {}", session.addr, raw, spec);

    if spec.is_noop() {
        return Err(IslError::NoopSpec);
    }

    let mut requests = BufReader::new(ObfuscatedReader::new(reader, Transform::decoder(&spec)));
    let mut responses = ObfuscatedWriter::new(write_half, Transform::encoder(&spec));
    session.begin_streaming();

    let mut line = Vec::with_capacity(256);
    while let Some(consumed) = read_line(&mut requests, &mut line, config.max_line_len).await? {
        let request = std::str::from_utf8(&line)
            .map_err(|_| IslError::MalformedRequest("request is not valid UTF-8".to_string()))?;

        let mut response = handler.respond(request)?;
        response.push('\n');

        responses.write_all(response.as_bytes()).await?;
        responses.flush().await?;
        session.record_exchange(consumed, response.len());
    }

    Ok(())
}

/// Reads one `\n`-terminated line into `buf`, newline stripped.
///
/// Returns the number of bytes consumed, or `None` at end-of-stream. A final
/// line without a newline is still returned.
async fn read_line<R>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    limit: usize,
) -> Result<Option<usize>, IslError>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let consumed = (&mut *reader)
        .take(limit as u64 + 1)
        .read_until(b'\n', buf)
        .await?;

    if consumed == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        return Ok(Some(consumed));
    }
    if consumed > limit {
        return Err(IslError::LineTooLong { limit });
    }
    Ok(Some(consumed))
}
