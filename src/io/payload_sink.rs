use crate::Compression;
use std::io;
use std::io::Write;

/// Write side of the compression transform. `Plain` is the identity.
pub(crate) enum PayloadSink<W: Write> {
    Plain(W),
    Zstd(zstd::stream::write::Encoder<'static, W>),
}

impl<W: Write> PayloadSink<W> {
    pub(crate) fn new(w: W, compression: Compression) -> io::Result<Self> {
        Ok(match compression {
            Compression::None => PayloadSink::Plain(w),
            Compression::Zstd { level } => {
                PayloadSink::Zstd(zstd::stream::write::Encoder::new(w, level)?)
            }
        })
    }

    /// Write the compressed epilogue (if any) and flush the inner writer.
    pub(crate) fn finish(self) -> io::Result<W> {
        match self {
            PayloadSink::Plain(mut w) => {
                w.flush()?;
                Ok(w)
            }
            PayloadSink::Zstd(e) => {
                let mut inner = e.finish()?;
                inner.flush()?;
                Ok(inner)
            }
        }
    }
}

impl<W: Write> Write for PayloadSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            PayloadSink::Plain(w) => w.write(buf),
            PayloadSink::Zstd(e) => e.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            PayloadSink::Plain(w) => w.flush(),
            PayloadSink::Zstd(e) => e.flush(),
        }
    }
}
