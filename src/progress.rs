//! Byte counting for progress bars and throughput figures.

use std::io::Read;

/// Reader wrapper that reports the running byte total after every read.
///
/// It sits below any decompressor, so the totals are on-disk bytes and line
/// up with the file size used as the progress bar length.
pub struct ProgressReader<R: Read> {
    inner: R,
    on_read: Box<dyn FnMut(u64)>,
    total: u64,
}

impl<R: Read> ProgressReader<R> {
    pub fn new<F>(inner: R, on_read: F) -> Self
    where
        F: FnMut(u64) + 'static,
    {
        Self {
            inner,
            on_read: Box::new(on_read),
            total: 0,
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.total += n as u64;
            (self.on_read)(self.total);
        }
        Ok(n)
    }
}
