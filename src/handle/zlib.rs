//! `zlib` handle

extern crate alloc;

use libz_sys as sys;

use core::{mem, ptr};
use core::ffi::c_int;
use alloc::boxed::Box;
use bytes::Bytes;

use super::{Interface, Handle, Params, WriteState};
use super::zlib_common::{ZlibMode, ZlibOptions, ZlibStrategy};
use crate::error::{CodecError, Error};
use crate::flush::Flush;
use crate::mem::zlib_alloc::{zalloc, zfree};

static ZLIB: Interface = Interface::new(
    write_fn,
    Some(params_fn),
    reset_fn,
    drop_fn,
);

impl Flush {
    #[inline(always)]
    const fn into_zlib(self) -> c_int {
        match self {
            Flush::None => sys::Z_NO_FLUSH,
            Flush::Block => sys::Z_BLOCK,
            Flush::Partial => sys::Z_PARTIAL_FLUSH,
            Flush::Sync => sys::Z_SYNC_FLUSH,
            Flush::Full => sys::Z_FULL_FLUSH,
            Flush::Finish => sys::Z_FINISH,
        }
    }
}

impl ZlibStrategy {
    #[inline(always)]
    const fn into_zlib(self) -> c_int {
        match self {
            ZlibStrategy::Default => sys::Z_DEFAULT_STRATEGY,
            ZlibStrategy::Filtered => sys::Z_FILTERED,
            ZlibStrategy::HuffmanOnly => sys::Z_HUFFMAN_ONLY,
            ZlibStrategy::Rle => sys::Z_RLE,
            ZlibStrategy::Fixed => sys::Z_FIXED,
        }
    }
}

const fn code_name(code: c_int) -> &'static str {
    match code {
        sys::Z_OK => "Z_OK",
        sys::Z_STREAM_END => "Z_STREAM_END",
        sys::Z_NEED_DICT => "Z_NEED_DICT",
        sys::Z_ERRNO => "Z_ERRNO",
        sys::Z_STREAM_ERROR => "Z_STREAM_ERROR",
        sys::Z_DATA_ERROR => "Z_DATA_ERROR",
        sys::Z_MEM_ERROR => "Z_MEM_ERROR",
        sys::Z_BUF_ERROR => "Z_BUF_ERROR",
        sys::Z_VERSION_ERROR => "Z_VERSION_ERROR",
        _ => "Z_UNKNOWN",
    }
}

struct State {
    inner: sys::z_stream,
    mode: ZlibMode,
    dictionary: Option<Bytes>,
}

impl State {
    fn error(&self, code: c_int, default_message: &'static str) -> CodecError {
        let message = unsafe {
            crate::utils::convert_c_str(self.inner.msg)
        };
        CodecError {
            errno: code,
            code: code_name(code),
            message: message.unwrap_or(default_message),
        }
    }

    //Dictionary that has to be known before first write
    fn set_dictionary(&mut self) -> c_int {
        let dictionary = match self.dictionary.as_ref() {
            Some(dictionary) => dictionary,
            None => return sys::Z_OK,
        };

        unsafe {
            match self.mode {
                ZlibMode::Deflate | ZlibMode::DeflateRaw => sys::deflateSetDictionary(&mut self.inner, dictionary.as_ptr(), dictionary.len() as _),
                ZlibMode::InflateRaw => sys::inflateSetDictionary(&mut self.inner, dictionary.as_ptr(), dictionary.len() as _),
                _ => sys::Z_OK,
            }
        }
    }

    fn reset(&mut self) -> bool {
        let result = unsafe {
            match self.mode.is_deflate() {
                true => sys::deflateReset(&mut self.inner),
                false => sys::inflateReset(&mut self.inner),
            }
        };

        result == sys::Z_OK && self.set_dictionary() == sys::Z_OK
    }

    unsafe fn inflate(&mut self, flush: c_int) -> c_int {
        let mut result = sys::inflate(&mut self.inner, flush);

        if self.mode != ZlibMode::InflateRaw && result == sys::Z_NEED_DICT {
            if let Some(dictionary) = self.dictionary.as_ref() {
                result = sys::inflateSetDictionary(&mut self.inner, dictionary.as_ptr(), dictionary.len() as _);
                if result == sys::Z_OK {
                    result = sys::inflate(&mut self.inner, flush);
                } else if result == sys::Z_DATA_ERROR {
                    //Dictionary doesn't match one used for compression
                    result = sys::Z_NEED_DICT;
                }
            }
        }

        //Next gzip member, unless it is zero padding
        while self.mode == ZlibMode::Gunzip && result == sys::Z_STREAM_END && self.inner.avail_in > 0 && *self.inner.next_in != 0 {
            if sys::inflateReset(&mut self.inner) != sys::Z_OK {
                break;
            }
            result = sys::inflate(&mut self.inner, flush);
        }

        result
    }

    fn check(&self, result: c_int, flush: c_int) -> Result<(), CodecError> {
        match result {
            sys::Z_OK | sys::Z_BUF_ERROR => {
                if self.inner.avail_out != 0 && flush == sys::Z_FINISH {
                    Err(self.error(result, "unexpected end of file"))
                } else {
                    Ok(())
                }
            },
            sys::Z_STREAM_END => Ok(()),
            sys::Z_NEED_DICT => match self.dictionary {
                Some(_) => Err(self.error(result, "Bad dictionary")),
                None => Err(self.error(result, "Missing dictionary")),
            },
            other => Err(self.error(other, "Zlib error")),
        }
    }
}

impl Drop for State {
    #[inline(always)]
    fn drop(&mut self) {
        unsafe {
            match self.mode.is_deflate() {
                true => sys::deflateEnd(&mut self.inner),
                false => sys::inflateEnd(&mut self.inner),
            };
        }
    }
}

impl Interface {
    ///Creates handle with `zlib` interface
    ///
    ///Returns error if unable to initialize it (e.g. due to lack of memory or unsupported dictionary)
    pub fn zlib(mode: ZlibMode, options: &ZlibOptions) -> Result<Handle, Error> {
        let mut instance = Box::new(State {
            inner: sys::z_stream {
                next_in: ptr::null_mut(),
                avail_in: 0,
                total_in: 0,
                next_out: ptr::null_mut(),
                avail_out: 0,
                total_out: 0,
                msg: ptr::null_mut(),
                state: ptr::null_mut(),
                zalloc,
                zfree,
                opaque: ptr::null_mut(),
                data_type: 0,
                adler: 0,
                reserved: 0,
            },
            mode,
            dictionary: options.dictionary.clone(),
        });

        let window_bits = mode.window_bits(options.window_bits);
        let result = unsafe {
            match mode.is_deflate() {
                true => sys::deflateInit2_(
                    &mut instance.inner,
                    options.level as _,
                    sys::Z_DEFLATED,
                    window_bits,
                    options.mem_level as _,
                    options.strategy.into_zlib(),
                    sys::zlibVersion(),
                    mem::size_of::<sys::z_stream>() as _
                ),
                false => sys::inflateInit2_(&mut instance.inner, window_bits, sys::zlibVersion(), mem::size_of::<sys::z_stream>() as _),
            }
        };

        if result != sys::Z_OK {
            return Err(Error::InitializationFailed(instance.error(result, "Init error")));
        }

        let result = instance.set_dictionary();
        if result != sys::Z_OK {
            return Err(Error::InitializationFailed(instance.error(result, "Failed to set dictionary")));
        }

        let params = Params {
            level: options.level as _,
            strategy: options.strategy,
        };
        let instance = ptr::NonNull::from(Box::leak(instance));
        Ok(ZLIB.inner_handle(instance.cast(), Some(params)))
    }
}

unsafe fn write_fn(state: ptr::NonNull<u8>, flush: Flush, input: *const u8, input_len: usize, output: *mut u8, output_len: usize) -> Result<WriteState, CodecError> {
    let state = unsafe {
        &mut *(state.as_ptr() as *mut State)
    };
    let flush = flush.into_zlib();

    state.inner.avail_out = output_len as _;
    state.inner.next_out = output;

    state.inner.avail_in = input_len as _;
    state.inner.next_in = input as *mut _;

    let result = unsafe {
        match state.mode.is_deflate() {
            true => sys::deflate(&mut state.inner, flush),
            false => state.inflate(flush),
        }
    };
    state.check(result, flush)?;

    Ok(WriteState {
        avail_out: state.inner.avail_out as usize,
        avail_in: state.inner.avail_in as usize,
    })
}

fn params_fn(state: ptr::NonNull<u8>, params: Params) -> Result<(), CodecError> {
    let state = unsafe {
        &mut *(state.as_ptr() as *mut State)
    };

    if !state.mode.is_deflate() {
        return Ok(());
    }

    let result = unsafe {
        sys::deflateParams(&mut state.inner, params.level as _, params.strategy.into_zlib())
    };
    match result {
        sys::Z_OK | sys::Z_BUF_ERROR => Ok(()),
        other => Err(state.error(other, "Failed to set parameters")),
    }
}

#[inline]
fn reset_fn(state: ptr::NonNull<u8>) -> Option<ptr::NonNull<u8>> {
    let result = unsafe {
        (*(state.as_ptr() as *mut State)).reset()
    };
    if result {
        Some(state)
    } else {
        None
    }
}

#[inline]
fn drop_fn(state: ptr::NonNull<u8>) {
    unsafe {
        drop(Box::from_raw(state.as_ptr() as *mut State));
    }
}
