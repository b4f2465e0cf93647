//! One-shot conversions
//!
//!Convenience wrappers running whole input through a fresh handle.

use bytes::Bytes;

use crate::engine::{Engine, StreamOptions};
use crate::error::Error;
use crate::handle::Handle;
#[cfg(any(feature = "zlib", feature = "zlib-static", feature = "brotli-rust"))]
use crate::handle::Interface;
#[cfg(any(feature = "zlib", feature = "zlib-static"))]
use crate::handle::{ZlibMode, ZlibOptions};
#[cfg(feature = "brotli-rust")]
use crate::handle::BrotliOptions;
use crate::sink::Collector;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
///Conversion to perform
pub enum Mode {
    #[cfg(any(feature = "zlib", feature = "zlib-static"))]
    ///zlib compression
    Deflate,
    #[cfg(any(feature = "zlib", feature = "zlib-static"))]
    ///zlib decompression
    Inflate,
    #[cfg(any(feature = "zlib", feature = "zlib-static"))]
    ///gzip compression
    Gzip,
    #[cfg(any(feature = "zlib", feature = "zlib-static"))]
    ///gzip decompression
    Gunzip,
    #[cfg(any(feature = "zlib", feature = "zlib-static"))]
    ///Raw deflate compression
    DeflateRaw,
    #[cfg(any(feature = "zlib", feature = "zlib-static"))]
    ///Raw deflate decompression
    InflateRaw,
    #[cfg(any(feature = "zlib", feature = "zlib-static"))]
    ///Decompression of either zlib or gzip
    Unzip,
    #[cfg(feature = "brotli-rust")]
    ///brotli compression
    BrotliCompress,
    #[cfg(feature = "brotli-rust")]
    ///brotli decompression
    BrotliDecompress,
}

impl Mode {
    ///Creates handle for the conversion with default options
    pub fn handle(self) -> Result<Handle, Error> {
        match self {
            #[cfg(any(feature = "zlib", feature = "zlib-static"))]
            Mode::Deflate => Interface::zlib(ZlibMode::Deflate, &ZlibOptions::new()),
            #[cfg(any(feature = "zlib", feature = "zlib-static"))]
            Mode::Inflate => Interface::zlib(ZlibMode::Inflate, &ZlibOptions::new()),
            #[cfg(any(feature = "zlib", feature = "zlib-static"))]
            Mode::Gzip => Interface::zlib(ZlibMode::Gzip, &ZlibOptions::new()),
            #[cfg(any(feature = "zlib", feature = "zlib-static"))]
            Mode::Gunzip => Interface::zlib(ZlibMode::Gunzip, &ZlibOptions::new()),
            #[cfg(any(feature = "zlib", feature = "zlib-static"))]
            Mode::DeflateRaw => Interface::zlib(ZlibMode::DeflateRaw, &ZlibOptions::new()),
            #[cfg(any(feature = "zlib", feature = "zlib-static"))]
            Mode::InflateRaw => Interface::zlib(ZlibMode::InflateRaw, &ZlibOptions::new()),
            #[cfg(any(feature = "zlib", feature = "zlib-static"))]
            Mode::Unzip => Interface::zlib(ZlibMode::Unzip, &ZlibOptions::new()),
            #[cfg(feature = "brotli-rust")]
            Mode::BrotliCompress => Interface::brotli_encoder(BrotliOptions::new()),
            #[cfg(feature = "brotli-rust")]
            Mode::BrotliDecompress => Interface::brotli_decoder(),
        }
    }
}

#[inline]
///Converts `input` synchronously with default options.
pub fn convert_sync(mode: Mode, input: &[u8]) -> Result<Bytes, Error> {
    convert_sync_with(mode.handle()?, input, StreamOptions::new())
}

///Converts `input` synchronously, using `options.finish_flush` for the single write.
pub fn convert_sync_with(handle: Handle, input: &[u8], options: StreamOptions) -> Result<Bytes, Error> {
    let mut engine = Engine::new(handle, Collector::new(), options);
    engine.drain_sync(input, options.finish_flush)
}

#[inline]
///Converts `input` through asynchronous path with default options.
pub fn convert(mode: Mode, input: impl Into<Bytes>) -> Result<Bytes, Error> {
    convert_with(mode.handle()?, input, StreamOptions::new())
}

///Converts `input` through asynchronous path, running engine until it is finished.
///
///Output is bounded by `options.max_output_length`.
pub fn convert_with(handle: Handle, input: impl Into<Bytes>, options: StreamOptions) -> Result<Bytes, Error> {
    let limit = options.max_output_length;
    let mut engine = Engine::new(handle, Collector::new().limit(limit), options);
    engine.write(input, None)?;
    engine.end(None)?;
    engine.run();

    if engine.sink().is_overflowed() {
        return Err(Error::OutputTooLarge {
            max: limit,
        });
    } else if let Some(error) = engine.error() {
        return Err(error);
    }

    debug_assert!(engine.is_finished());
    Ok(engine.into_sink().into_bytes())
}
