#[cfg(test)]
mod tests {
    use crate::storage::StorageProvider;
    use crate::{CodecConfig, CodecError, FileReader, FileWriter, LocalFs, Record};
    use std::io::{self, Read, Write};
    use std::path::Path;

    /// Accepts `budget` bytes, fails exactly once, then accepts everything again.
    struct Hiccup {
        inner: Box<dyn Write + Send>,
        budget: usize,
        tripped: bool,
    }

    impl Write for Hiccup {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.tripped {
                return self.inner.write(buf);
            }
            if self.budget == 0 {
                self.tripped = true;
                return Err(io::Error::other("disk hiccup"));
            }
            let take = buf.len().min(self.budget);
            let n = self.inner.write(&buf[..take])?;
            self.budget -= n;
            Ok(n)
        }
        fn flush(&mut self) -> io::Result<()> {
            self.inner.flush()
        }
    }

    struct HiccupFs {
        local: LocalFs,
        budget: usize,
    }

    impl StorageProvider for HiccupFs {
        fn open_for_write(&self, path: &Path) -> io::Result<Box<dyn Write + Send>> {
            Ok(Box::new(Hiccup {
                inner: self.local.open_for_write(path)?,
                budget: self.budget,
                tripped: false,
            }))
        }
        fn open_for_read(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
            self.local.open_for_read(path)
        }
    }

    #[test]
    fn sink_error_mid_frame_fails_the_writer() {
        let dir = tempfile::tempdir().unwrap();
        let first = b"{\"offset\":0,\"value\":1}\n";
        let storage = HiccupFs {
            local: LocalFs::with_root(dir.path()),
            budget: first.len() + 7,
        };
        let cfg = CodecConfig::builder().write_buffer(1).build();

        let mut writer = FileWriter::open(&storage, "hiccup.log", &cfg).unwrap();
        writer.write(&Record::new(0, "1")).unwrap();
        assert!(matches!(
            writer.write(&Record::new(1, "1")),
            Err(CodecError::Io(_))
        ));
        assert!(writer.is_failed());
        assert_eq!(writer.records_written(), 1);

        // The sink would accept bytes again, but the writer must not glue a
        // new frame onto the torn one.
        assert!(matches!(
            writer.write(&Record::new(2, "2")),
            Err(CodecError::Failed)
        ));
        assert!(matches!(writer.flush(), Err(CodecError::Failed)));
        assert!(matches!(writer.close(), Err(CodecError::Failed)));
        assert!(!writer.is_closed());
        drop(writer);

        let mut reader = FileReader::open(&storage, "hiccup.log", &cfg).unwrap();
        assert_eq!(reader.next_record().unwrap().unwrap().offset, 0);
        match reader.next_record() {
            Err(CodecError::TruncatedFrame { len }) => assert_eq!(len, 7),
            other => panic!("expected a torn tail, got {other:?}"),
        }
    }

    #[test]
    fn flush_error_fails_the_writer() {
        let dir = tempfile::tempdir().unwrap();
        let storage = HiccupFs {
            local: LocalFs::with_root(dir.path()),
            budget: 0,
        };
        let mut writer = FileWriter::open(&storage, "flush.log", &CodecConfig::default()).unwrap();
        // Fits the 64 KiB buffer, so the sink is only touched by flush.
        writer.write(&Record::new(0, "true")).unwrap();
        assert!(matches!(writer.flush(), Err(CodecError::Io(_))));
        assert!(matches!(
            writer.write(&Record::new(1, "true")),
            Err(CodecError::Failed)
        ));
        drop(writer);

        let bytes = std::fs::read(dir.path().join("flush.log")).unwrap();
        assert!(bytes.is_empty());
    }
}
