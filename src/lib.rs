//!Streaming transform engine for block oriented compression codecs
//!
//!Drives codec handle, which processes discrete input/output buffer pairs, as continuous stream:
//!input is fed in chunks of any size, output is delivered into [Sink] as it is produced,
//!respecting downstream backpressure.
//!
//!## Features
//!
//!This crate requires `alloc` to be available with system allocator set.
//!
//!- `brotli-rust` - Enables `brotli` interface using pure Rust crate. Default.
//!- `zlib` - Enables `zlib` interface. Default.
//!- `zlib-static` - Enables `zlib` interface with `static` feature.
//!
//!## Usage
//!
//!```rust
//!use compu_stream::oneshot::{self, Mode};
//!
//!let compressed = oneshot::convert_sync(Mode::Deflate, b"compu-stream").expect("to compress");
//!let decompressed = oneshot::convert(Mode::Inflate, compressed).expect("to decompress");
//!assert_eq!(decompressed, &b"compu-stream"[..]);
//!```

#![no_std]
#![warn(missing_docs)]
#![allow(clippy::style, clippy::derivable_impls)]

#[cfg(any(feature = "zlib", feature = "zlib-static"))]
pub(crate) mod utils;
#[cfg(any(feature = "zlib", feature = "zlib-static", feature = "brotli-rust"))]
pub(crate) mod mem;
pub mod flush;
pub use flush::Flush;
pub mod buffer;
pub use buffer::OutputBuffer;
pub mod error;
pub use error::{CodecError, Error};
pub mod handle;
pub use handle::{Handle, Interface, Params, WriteState, ZlibMode, ZlibOptions, ZlibStrategy};
#[cfg(feature = "brotli-rust")]
pub use handle::{BrotliOptions, BrotliEncoderMode};
pub mod sink;
pub use sink::{Collector, Demand, Sink};
pub mod engine;
pub use engine::{Callback, Engine, StreamOptions};
pub mod oneshot;
