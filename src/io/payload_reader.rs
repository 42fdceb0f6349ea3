use crate::Compression;
use std::io::{self, BufReader, Read};

/// Read side of the compression transform: undoes what `PayloadSink` applied.
pub(crate) enum PayloadReader {
    Plain(Box<dyn Read + Send>),
    Zstd(zstd::stream::read::Decoder<'static, BufReader<Box<dyn Read + Send>>>),
}

impl PayloadReader {
    pub(crate) fn new(
        compression: Compression,
        reader: Box<dyn Read + Send>,
        bufread: usize,
    ) -> io::Result<Self> {
        match compression {
            Compression::None => Ok(PayloadReader::Plain(reader)),
            Compression::Zstd { .. } => {
                let br = BufReader::with_capacity(bufread, reader);
                let dec = zstd::stream::read::Decoder::with_buffer(br).map_err(|e| {
                    io::Error::new(io::ErrorKind::InvalidData, format!("zstd: {e}"))
                })?;
                Ok(PayloadReader::Zstd(dec))
            }
        }
    }
}

impl Read for PayloadReader {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            PayloadReader::Plain(r) => r.read(buf),
            PayloadReader::Zstd(r) => r.read(buf),
        }
    }
}
