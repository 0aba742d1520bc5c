use bytes::{Buf, BytesMut};
use isl_cipher::{ByteTransform, Transform};
use std::io;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

/// Decodes everything read from `inner`.
///
/// The transform advances only by the bytes a read actually produced, so
/// short reads leave the position exactly where the next byte belongs.
#[derive(Debug)]
pub struct ObfuscatedReader<R, T = Transform> {
    inner: R,
    transform: T,
}

impl<R, T: ByteTransform> ObfuscatedReader<R, T> {
    pub fn new(inner: R, transform: T) -> Self {
        Self { inner, transform }
    }

    pub fn position(&self) -> u64 {
        self.transform.position()
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R, T> AsyncRead for ObfuscatedReader<R, T>
where
    R: AsyncRead + Unpin,
    T: ByteTransform + Unpin,
{
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let start = buf.filled().len();
        ready!(Pin::new(&mut this.inner).poll_read(cx, buf))?;
        this.transform.transform_in_place(&mut buf.filled_mut()[start..]);
        Poll::Ready(Ok(()))
    }
}

/// Encodes everything written before it reaches `inner`.
///
/// Accepted bytes are encoded once, at accept time, and parked until the
/// sink takes them; a short write on `inner` never re-encodes or skips a
/// position. Like `BufWriter`, data may sit in the writer until `flush`.
#[derive(Debug)]
pub struct ObfuscatedWriter<W, T = Transform> {
    inner: W,
    transform: T,
    pending: BytesMut,
}

impl<W, T: ByteTransform> ObfuscatedWriter<W, T> {
    pub fn new(inner: W, transform: T) -> Self {
        Self {
            inner,
            transform,
            pending: BytesMut::new(),
        }
    }

    pub fn position(&self) -> u64 {
        self.transform.position()
    }

    /// Encoded bytes not yet handed to the sink.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }
}

impl<W, T> ObfuscatedWriter<W, T>
where
    W: AsyncWrite + Unpin,
{
    fn poll_drain(&mut self, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        while !self.pending.is_empty() {
            let n = ready!(Pin::new(&mut self.inner).poll_write(cx, &self.pending))?;
            if n == 0 {
                return Poll::Ready(Err(io::ErrorKind::WriteZero.into()));
            }
            self.pending.advance(n);
        }
        Poll::Ready(Ok(()))
    }
}

impl<W, T> AsyncWrite for ObfuscatedWriter<W, T>
where
    W: AsyncWrite + Unpin,
    T: ByteTransform + Unpin,
{
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        ready!(this.poll_drain(cx))?;
        if buf.is_empty() {
            return Poll::Ready(Ok(0));
        }

        this.pending.extend_from_slice(buf);
        this.transform.transform_in_place(&mut this.pending[..]);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        ready!(this.poll_drain(cx))?;
        Pin::new(&mut this.inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        ready!(this.poll_drain(cx))?;
        Pin::new(&mut this.inner).poll_shutdown(cx)
    }
}
