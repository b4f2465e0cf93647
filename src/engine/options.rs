use crate::flush::Flush;

///Default size of output buffer
pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;
///Smallest allowed size of output buffer
pub const MIN_CHUNK_SIZE: usize = 64;

#[derive(Debug, Copy, Clone)]
///Engine configuration
pub struct StreamOptions {
    pub(crate) chunk_size: usize,
    pub(crate) max_output_length: usize,
    pub(crate) flush: Flush,
    pub(crate) finish_flush: Flush,
    pub(crate) full_flush: Flush,
}

impl StreamOptions {
    #[inline(always)]
    ///Creates default options
    pub const fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_output_length: isize::MAX as usize,
            flush: Flush::None,
            finish_flush: Flush::Finish,
            full_flush: Flush::Full,
        }
    }

    #[inline]
    ///Sets size of output buffer.
    ///
    ///Must be at least 64 bytes. Defaults to 16KiB.
    pub const fn chunk_size(mut self, chunk_size: usize) -> Self {
        assert!(chunk_size >= MIN_CHUNK_SIZE);
        self.chunk_size = chunk_size;
        self
    }

    #[inline]
    ///Sets maximum size of output produced by one-shot conversion.
    pub const fn max_output_length(mut self, max_output_length: usize) -> Self {
        assert!(max_output_length > 0);
        self.max_output_length = max_output_length;
        self
    }

    #[inline]
    ///Sets flush flag used for regular writes.
    ///
    ///Defaults to `Flush::None`.
    pub const fn flush(mut self, flush: Flush) -> Self {
        self.flush = flush;
        self
    }

    #[inline]
    ///Sets flush flag applied to final chunk of stream.
    ///
    ///Final chunk always uses the stronger of its own flag and this one. Defaults to `Flush::Finish`.
    pub const fn finish_flush(mut self, finish_flush: Flush) -> Self {
        self.finish_flush = finish_flush;
        self
    }

    #[inline]
    ///Sets flush flag used by [Engine::flush](crate::Engine::flush) when none is requested.
    ///
    ///Defaults to `Flush::Full`.
    pub const fn full_flush(mut self, full_flush: Flush) -> Self {
        self.full_flush = full_flush;
        self
    }
}

impl Default for StreamOptions {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}
