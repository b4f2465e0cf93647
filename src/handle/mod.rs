//! Codec handle
//!
//!Opaque codec instance driven by the [Engine](crate::Engine).
use core::ptr;

use crate::flush::Flush;
use crate::error::{CodecError, Error};

mod zlib_common;
pub use zlib_common::{ZlibMode, ZlibOptions, ZlibStrategy};
#[cfg(any(feature = "zlib", feature = "zlib-static"))]
mod zlib;
#[cfg(feature = "brotli-rust")]
mod brotli_common;
#[cfg(feature = "brotli-rust")]
pub use brotli_common::{BrotliOptions, BrotliEncoderMode};
#[cfg(feature = "brotli-rust")]
mod brotli;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
///Result of single codec write.
///
///Valid only for the call that produced it.
pub struct WriteState {
    ///Room left in output after the call.
    pub avail_out: usize,
    ///Input left unconsumed after the call.
    pub avail_in: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
///Tunable codec parameters
pub struct Params {
    ///Compression level
    pub level: i32,
    ///Compression strategy
    pub strategy: ZlibStrategy,
}

///Write function signature.
///
///Arguments: instance, flush, input, input length, output, output length.
pub type WriteFn = unsafe fn(ptr::NonNull<u8>, Flush, *const u8, usize, *mut u8, usize) -> Result<WriteState, CodecError>;
///Parameters update function signature.
pub type ParamsFn = fn(ptr::NonNull<u8>, Params) -> Result<(), CodecError>;

///Codec interface
pub struct Interface {
    write_fn: WriteFn,
    params_fn: Option<ParamsFn>,
    //returns new/updated instance, MUST be replaced
    reset_fn: fn(ptr::NonNull<u8>) -> Option<ptr::NonNull<u8>>,
    drop_fn: fn(ptr::NonNull<u8>),
}

impl Interface {
    ///Creates new `Interface` with provided functions to build vtable.
    ///
    ///First argument of every function is state as pointer.
    ///
    ///`params_fn` should be `None` if codec doesn't support changing parameters mid-stream.
    ///
    ///It is user responsibility to pass correct function pointers
    pub const fn new(
        write_fn: WriteFn,
        params_fn: Option<ParamsFn>,
        reset_fn: fn(ptr::NonNull<u8>) -> Option<ptr::NonNull<u8>>,
        drop_fn: fn(ptr::NonNull<u8>),
    ) -> Self {
        Self {
            write_fn,
            params_fn,
            reset_fn,
            drop_fn,
        }
    }

    #[inline(always)]
    #[allow(unused)]
    pub(crate) fn inner_handle(&'static self, instance: ptr::NonNull<u8>, params: Option<Params>) -> Handle {
        Handle {
            instance,
            interface: self,
            params,
        }
    }

    #[inline(always)]
    ///Creates new handle
    ///
    ///This function is unsafe as it is up to user to ensure correctness of `Interface`
    ///
    ///- `instance` - Codec state, passed as first argument to every function in vtable.
    ///- `params` - Parameters codec was initialized with. Should be `None` when `params_fn` is absent.
    pub unsafe fn handle(&'static self, instance: ptr::NonNull<u8>, params: Option<Params>) -> Handle {
        self.inner_handle(instance, params)
    }
}

///Codec handle
///
///Under hood, in order to avoid generics, implemented as vtable with series of function pointers.
///Dropping handle releases codec resources.
pub struct Handle {
    instance: ptr::NonNull<u8>,
    interface: &'static Interface,
    params: Option<Params>,
}

impl Handle {
    #[inline(always)]
    ///Raw write function, with no checks.
    ///
    ///- `input` - Pointer to start of input to process. MUST NOT be null.
    ///- `input_len` - Size of data to process in `input`
    ///- `output` - Pointer to start of buffer where to write result. MUST NOT be null
    ///- `output_len` - Size of buffer pointed by `output`
    pub unsafe fn raw_write(&mut self, flush: Flush, input: *const u8, input_len: usize, output: *mut u8, output_len: usize) -> Result<WriteState, CodecError> {
        (self.interface.write_fn)(self.instance, flush, input, input_len, output, output_len)
    }

    #[inline(always)]
    ///Processes `input` into `output`, returning how much of each is left.
    pub fn write(&mut self, flush: Flush, input: &[u8], output: &mut [u8]) -> Result<WriteState, CodecError> {
        let input_len = input.len();
        let output_len = output.len();
        let state = unsafe {
            self.raw_write(flush, input.as_ptr(), input_len, output.as_mut_ptr(), output_len)
        }?;
        debug_assert!(state.avail_in <= input_len);
        debug_assert!(state.avail_out <= output_len);
        Ok(state)
    }

    #[inline(always)]
    ///Returns parameters handle was initialized with, if codec supports updating them.
    pub fn initial_params(&self) -> Option<Params> {
        self.params
    }

    #[inline]
    ///Updates codec parameters.
    ///
    ///MUST NOT be called while codec has unfinished write (i.e. last write filled whole output).
    pub fn params(&mut self, params: Params) -> Result<(), Error> {
        match self.interface.params_fn {
            Some(params_fn) => params_fn(self.instance, params).map_err(Error::Codec),
            None => Err(Error::ParamsUnsupported),
        }
    }

    #[inline(always)]
    ///Resets codec state to initial.
    ///
    ///Returns `true` if successfully reset, otherwise `false`
    pub fn reset(&mut self) -> bool {
        match (self.interface.reset_fn)(self.instance) {
            Some(ptr) => {
                self.instance = ptr;
                true
            },
            None => false,
        }
    }

    #[inline(always)]
    ///Releases codec resources.
    pub fn close(self) {
        drop(self)
    }
}

impl Drop for Handle {
    #[inline]
    fn drop(&mut self) {
        (self.interface.drop_fn)(self.instance);
    }
}
