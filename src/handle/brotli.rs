//! `brotli` handles

use core::{ptr, slice};

use brotli::enc::encode::{BrotliEncoderCompressStream, BrotliEncoderCreateInstance, BrotliEncoderOperation, BrotliEncoderStateStruct};

use super::{Interface, Handle, WriteState};
use super::brotli_common::BrotliOptions;
use crate::error::{CodecError, Error};
use crate::flush::Flush;
use crate::mem::brotli_alloc::BrotliAllocator;

extern crate alloc;
use alloc::boxed::Box;

pub(crate) type EncoderInstance = BrotliEncoderStateStruct<BrotliAllocator>;
pub(crate) type DecoderInstance = brotli::BrotliState<BrotliAllocator, BrotliAllocator, BrotliAllocator>;

//Same number zlib uses for truncated input
const Z_BUF_ERROR: i32 = -5;

static BROTLI_ENCODER: Interface = Interface::new(
    encode_fn,
    None,
    encoder_reset_fn,
    encoder_drop_fn,
);

static BROTLI_DECODER: Interface = Interface::new(
    decode_fn,
    None,
    decoder_reset_fn,
    decoder_drop_fn,
);

struct EncoderState {
    inner: EncoderInstance,
    options: BrotliOptions,
}

impl EncoderState {
    fn new(options: BrotliOptions) -> Self {
        let mut inner = BrotliEncoderCreateInstance(Default::default());
        options.apply(&mut inner);
        Self {
            inner,
            options,
        }
    }
}

impl Flush {
    #[inline(always)]
    const fn into_brotli(self) -> BrotliEncoderOperation {
        match self {
            Flush::None => BrotliEncoderOperation::BROTLI_OPERATION_PROCESS,
            Flush::Finish => BrotliEncoderOperation::BROTLI_OPERATION_FINISH,
            _ => BrotliEncoderOperation::BROTLI_OPERATION_FLUSH,
        }
    }
}

impl Interface {
    #[inline]
    ///Creates brotli compressing handle.
    ///
    ///Never fails, but returns `Result` for consistency with other codecs (probably panics on OOM)
    pub fn brotli_encoder(options: BrotliOptions) -> Result<Handle, Error> {
        let state = Box::new(EncoderState::new(options));
        let ptr = ptr::NonNull::from(Box::leak(state));
        Ok(BROTLI_ENCODER.inner_handle(ptr.cast(), None))
    }

    #[inline]
    ///Creates brotli decompressing handle.
    pub fn brotli_decoder() -> Result<Handle, Error> {
        let state = Box::new(decoder_instance());
        let ptr = ptr::NonNull::from(Box::leak(state));
        Ok(BROTLI_DECODER.inner_handle(ptr.cast(), None))
    }
}

#[inline]
fn decoder_instance() -> DecoderInstance {
    DecoderInstance::new(Default::default(), Default::default(), Default::default())
}

unsafe fn encode_fn(state: ptr::NonNull<u8>, flush: Flush, input: *const u8, mut input_remain: usize, output: *mut u8, mut output_remain: usize) -> Result<WriteState, CodecError> {
    let state = unsafe {
        &mut *(state.as_ptr() as *mut EncoderState)
    };

    let input = unsafe {
        slice::from_raw_parts(input, input_remain)
    };
    let output = unsafe {
        slice::from_raw_parts_mut(output, output_remain)
    };

    let result = BrotliEncoderCompressStream(
        &mut state.inner,
        flush.into_brotli(),
        &mut input_remain, input, &mut 0,
        &mut output_remain, output, &mut 0,
        &mut None,
        &mut |_a, _b, _c, _d| (),
    );

    match result {
        0 => Err(CodecError {
            errno: -1,
            code: "ERR_BROTLI_COMPRESSION_FAILED",
            message: "Compression failed",
        }),
        _ => Ok(WriteState {
            avail_out: output_remain,
            avail_in: input_remain,
        }),
    }
}

unsafe fn decode_fn(state: ptr::NonNull<u8>, flush: Flush, input: *const u8, mut input_remain: usize, output: *mut u8, mut output_remain: usize) -> Result<WriteState, CodecError> {
    let state = unsafe {
        &mut *(state.as_ptr() as *mut DecoderInstance)
    };

    let input = unsafe {
        slice::from_raw_parts(input, input_remain)
    };
    let output = unsafe {
        slice::from_raw_parts_mut(output, output_remain)
    };

    let result = brotli::BrotliDecompressStream(&mut input_remain, &mut 0, input, &mut output_remain, &mut 0, output, &mut 0, state);

    match result {
        brotli::BrotliResult::ResultFailure => {
            let errno = state.error_code as i32;
            Err(CodecError {
                errno,
                code: describe_error(errno).unwrap_or("ERR_BROTLI_DECOMPRESSION_FAILED"),
                message: "Decompression failed",
            })
        },
        brotli::BrotliResult::NeedsMoreInput if flush == Flush::Finish => Err(CodecError {
            errno: Z_BUF_ERROR,
            code: "Z_BUF_ERROR",
            message: "unexpected end of file",
        }),
        _ => Ok(WriteState {
            avail_out: output_remain,
            avail_in: input_remain,
        }),
    }
}

#[inline]
fn encoder_reset_fn(state: ptr::NonNull<u8>) -> Option<ptr::NonNull<u8>> {
    let mut state = unsafe {
        Box::from_raw(state.as_ptr() as *mut EncoderState)
    };

    *state = EncoderState::new(state.options);
    let ptr = Box::leak(state);
    Some(ptr::NonNull::from(ptr).cast())
}

#[inline]
fn encoder_drop_fn(state: ptr::NonNull<u8>) {
    let _ = unsafe {
        Box::from_raw(state.as_ptr() as *mut EncoderState)
    };
}

#[inline]
fn decoder_reset_fn(state: ptr::NonNull<u8>) -> Option<ptr::NonNull<u8>> {
    let mut state = unsafe {
        Box::from_raw(state.as_ptr() as *mut DecoderInstance)
    };

    *state = decoder_instance();
    let ptr = Box::leak(state);
    Some(ptr::NonNull::from(ptr).cast())
}

#[inline]
fn decoder_drop_fn(state: ptr::NonNull<u8>) {
    let _ = unsafe {
        Box::from_raw(state.as_ptr() as *mut DecoderInstance)
    };
}

fn describe_error(code: i32) -> Option<&'static str> {
    match code {
        /* Errors caused by invalid input */
        -1 => Some("ERR_BROTLI_FORMAT_EXUBERANT_NIBBLE"),
        -2 => Some("ERR_BROTLI_FORMAT_RESERVED"),
        -3 => Some("ERR_BROTLI_FORMAT_EXUBERANT_META_NIBBLE"),
        -4 => Some("ERR_BROTLI_FORMAT_SIMPLE_HUFFMAN_ALPHABET"),
        -5 => Some("ERR_BROTLI_FORMAT_SIMPLE_HUFFMAN_SAME"),
        -6 => Some("ERR_BROTLI_FORMAT_CL_SPACE"),
        -7 => Some("ERR_BROTLI_FORMAT_HUFFMAN_SPACE"),
        -8 => Some("ERR_BROTLI_FORMAT_CONTEXT_MAP_REPEAT"),
        -9 => Some("ERR_BROTLI_FORMAT_BLOCK_LENGTH_1"),
        -10 => Some("ERR_BROTLI_FORMAT_BLOCK_LENGTH_2"),
        -11 => Some("ERR_BROTLI_FORMAT_TRANSFORM"),
        -12 => Some("ERR_BROTLI_FORMAT_DICTIONARY"),
        -13 => Some("ERR_BROTLI_FORMAT_WINDOW_BITS"),
        -14 => Some("ERR_BROTLI_FORMAT_PADDING_1"),
        -15 => Some("ERR_BROTLI_FORMAT_PADDING_2"),
        -16 => Some("ERR_BROTLI_FORMAT_DISTANCE"),

        /* -17..-18 codes are reserved */
        -19 => Some("ERR_BROTLI_DICTIONARY_NOT_SET"),
        -20 => Some("ERR_BROTLI_INVALID_ARGUMENTS"),

        /* Memory allocation problems */
        -21 => Some("ERR_BROTLI_ALLOC_CONTEXT_MODES"),
        -22 => Some("ERR_BROTLI_ALLOC_TREE_GROUPS"),
        -25 => Some("ERR_BROTLI_ALLOC_CONTEXT_MAP"),
        -26 => Some("ERR_BROTLI_ALLOC_RING_BUFFER_1"),
        -27 => Some("ERR_BROTLI_ALLOC_RING_BUFFER_2"),
        -30 => Some("ERR_BROTLI_ALLOC_BLOCK_TYPE_TREES"),

        /* "Impossible" states */
        -31 => Some("ERR_BROTLI_UNREACHABLE"),
        _ => None,
    }
}
