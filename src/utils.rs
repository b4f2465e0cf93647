use core::ffi::{c_char, CStr};

#[inline]
///Converts C string owned by codec library into static string.
///
///Returns `None` for null pointer or non UTF-8 text.
pub(crate) unsafe fn convert_c_str(ptr: *const c_char) -> Option<&'static str> {
    if ptr.is_null() {
        None
    } else {
        CStr::from_ptr(ptr).to_str().ok()
    }
}
