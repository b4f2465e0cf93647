use bytes::Bytes;

const MAX_MEM_LEVEL: u8 = 9;
const DEFAULT_MEM_LEVEL: u8 = 8;
const DEFAULT_WINDOW_BITS: u8 = 15;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
///Compression strategy
pub enum ZlibStrategy {
    ///Default strategy.
    Default,
    ///Filtered strategy for data produced from filter.
    Filtered,
    ///Forces using Huffman encoding only, ignoring string matching.
    HuffmanOnly,
    ///Strategy optimized for PNG image.
    Rle,
    ///Prevents using dynamic Huffman codes.
    Fixed,
}

impl Default for ZlibStrategy {
    #[inline(always)]
    fn default() -> Self {
        ZlibStrategy::Default
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
///zlib codec mode
pub enum ZlibMode {
    ///Compress with zlib header
    Deflate,
    ///Decompress with zlib header
    Inflate,
    ///Compress with gzip header
    Gzip,
    ///Decompress with gzip header.
    ///
    ///Concatenated gzip members are decoded as single stream.
    Gunzip,
    ///Compress into raw deflate
    DeflateRaw,
    ///Decompress raw deflate
    InflateRaw,
    ///Decompress either zlib or gzip, detecting header automatically.
    Unzip,
}

impl ZlibMode {
    #[inline(always)]
    ///Returns whether mode compresses data
    pub const fn is_deflate(self) -> bool {
        matches!(self, ZlibMode::Deflate | ZlibMode::Gzip | ZlibMode::DeflateRaw)
    }

    #[inline(always)]
    #[cfg_attr(not(any(feature = "zlib", feature = "zlib-static")), allow(unused))]
    pub(crate) const fn window_bits(self, bits: u8) -> i32 {
        //deflate rejects 8 for gzip and raw streams, while zlib header raises it to 9 on its own
        let bits = match self {
            ZlibMode::Gzip | ZlibMode::DeflateRaw if bits == 8 => 9,
            _ => bits as i32,
        };
        match self {
            ZlibMode::Deflate | ZlibMode::Inflate => bits,
            ZlibMode::Gzip | ZlibMode::Gunzip => bits + 16,
            ZlibMode::DeflateRaw | ZlibMode::InflateRaw => -bits,
            ZlibMode::Unzip => bits + 32,
        }
    }
}

#[derive(Clone)]
///zlib codec configuration
pub struct ZlibOptions {
    pub(crate) level: i8,
    pub(crate) window_bits: u8,
    pub(crate) mem_level: u8,
    pub(crate) strategy: ZlibStrategy,
    pub(crate) dictionary: Option<Bytes>,
}

impl ZlibOptions {
    #[inline(always)]
    ///Creates new default options
    pub const fn new() -> Self {
        Self {
            level: -1,
            window_bits: DEFAULT_WINDOW_BITS,
            mem_level: DEFAULT_MEM_LEVEL,
            strategy: ZlibStrategy::Default,
            dictionary: None,
        }
    }

    #[inline]
    ///Sets compression level in range from 0 to 9
    ///
    ///Defaults to `-1`, which is zlib default.
    pub const fn level(mut self, level: i8) -> Self {
        assert!(level >= -1);
        assert!(level <= 9);
        self.level = level;
        self
    }

    #[inline]
    ///Sets size of history window as base two logarithm, in range from 8 to 15
    ///
    ///Compressing into gzip or raw deflate uses 9 in place of 8, as zlib does for its own header.
    ///Streams produced this way are decodable with any window of at least 9 bits.
    ///
    ///Defaults to 15.
    pub const fn window_bits(mut self, window_bits: u8) -> Self {
        assert!(window_bits >= 8);
        assert!(window_bits <= 15);
        self.window_bits = window_bits;
        self
    }

    #[inline]
    ///Sets memory level in range from 1 to 9
    ///
    ///Defaults to 8.
    pub const fn mem_level(mut self, mem_level: u8) -> Self {
        assert!(mem_level > 0);
        assert!(mem_level <= MAX_MEM_LEVEL);
        self.mem_level = mem_level;
        self
    }

    #[inline]
    ///Sets zlib strategy
    pub const fn strategy(mut self, strategy: ZlibStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[inline]
    ///Sets preset dictionary.
    ///
    ///Not supported by gzip modes.
    pub fn dictionary(mut self, dictionary: impl Into<Bytes>) -> Self {
        self.dictionary = Some(dictionary.into());
        self
    }
}

impl Default for ZlibOptions {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}
