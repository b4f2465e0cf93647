//!Allocation shims, routing memory requests of codec libraries through Rust's global allocator
#[cfg(any(feature = "zlib", feature = "zlib-static"))]
///`zalloc`/`zfree` for `z_stream`, using Rust's global allocator
pub(crate) mod zlib_alloc {
    extern crate alloc;

    use core::ffi::{c_uint, c_void};
    use core::{mem, ptr};
    use alloc::alloc::Layout;

    //Linux & win 32 bit are 8
    #[cfg(not(any(target_os = "macos", all(windows, target_pointer_width = "64"))))]
    const MIN_ALIGN: usize = 8;
    //Mac and  win 64 bit are 16
    #[cfg(any(target_os = "macos", all(windows, target_pointer_width = "64")))]
    const MIN_ALIGN: usize = 16;

    //Size of allocation is stored right before returned pointer
    const HEADER: usize = if mem::size_of::<usize>() > MIN_ALIGN { mem::size_of::<usize>() } else { MIN_ALIGN };

    #[cold]
    #[inline(never)]
    fn unlikely_null() -> *mut c_void {
        ptr::null_mut()
    }

    #[inline]
    fn layout(size: usize) -> Option<Layout> {
        let total = size.checked_add(HEADER)?;
        Layout::from_size_align(total, MIN_ALIGN).ok()
    }

    ///`malloc` with Rust allocator
    unsafe fn rust_malloc(size: usize) -> *mut c_void {
        if let Some(layout) = layout(size) {
            let mem = alloc::alloc::alloc(layout);
            if !mem.is_null() {
                ptr::write(mem as *mut usize, size);
                return mem.add(HEADER) as _
            }
        }

        unlikely_null()
    }

    ///`free` with Rust allocator
    unsafe fn rust_free(mem: *mut c_void) {
        if !mem.is_null() {
            let mem = (mem as *mut u8).sub(HEADER);
            let size = ptr::read(mem as *const usize);
            let layout = Layout::from_size_align_unchecked(size + HEADER, MIN_ALIGN);
            alloc::alloc::dealloc(mem, layout);
        }
    }

    ///zlib `zalloc`
    pub(crate) unsafe extern "C" fn zalloc(_: *mut c_void, items: c_uint, size: c_uint) -> *mut c_void {
        match (items as usize).checked_mul(size as usize) {
            Some(0) | None => unlikely_null(),
            Some(size) => rust_malloc(size),
        }
    }

    ///zlib `zfree`
    pub(crate) unsafe extern "C" fn zfree(_: *mut c_void, mem: *mut c_void) {
        rust_free(mem)
    }
}

#[cfg(feature = "brotli-rust")]
///Allocator for `brotli` state, using Rust's global allocator
pub(crate) mod brotli_alloc {
    extern crate alloc;

    use alloc::boxed::Box;
    use alloc::vec::Vec;

    ///Boxed slice wrapper
    pub struct BoxedSlice<T>(Box<[T]>);

    impl<T> Default for BoxedSlice<T> {
        fn default() -> Self {
            Self(Vec::new().into_boxed_slice())
        }
    }

    impl<T> brotli::SliceWrapper<T> for BoxedSlice<T> {
        #[inline(always)]
        fn slice(&self) -> &[T] {
            &self.0
        }
    }

    impl<T> brotli::SliceWrapperMut<T> for BoxedSlice<T> {
        #[inline(always)]
        fn slice_mut(&mut self) -> &mut [T] {
            &mut self.0
        }
    }

    #[derive(Copy, Clone, Default)]
    pub struct BrotliAllocator;

    impl<T: Default> brotli::Allocator<T> for BrotliAllocator {
        type AllocatedMemory = BoxedSlice<T>;

        fn alloc_cell(&mut self, len: usize) -> Self::AllocatedMemory {
            let mut cells = Vec::with_capacity(len);
            cells.resize_with(len, T::default);
            BoxedSlice(cells.into_boxed_slice())
        }

        fn free_cell(&mut self, _: Self::AllocatedMemory) {
        }
    }

    impl brotli::enc::BrotliAlloc for BrotliAllocator {}
}
