#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
///Encoding mode
pub enum BrotliEncoderMode {
    ///Default mode. No assumptions about content.
    Generic = 0,
    ///Text mode. UTF-8.
    Text = 1,
    ///WOFF 2.0 mode
    Font = 2,
}

#[derive(Debug, Copy, Clone)]
///Brotli encoder options
pub struct BrotliOptions {
    pub(crate) quality: u8,
    pub(crate) mode: BrotliEncoderMode,
    pub(crate) window: u8,
}

impl BrotliOptions {
    #[inline(always)]
    ///Creates default instance
    pub const fn new() -> Self {
        Self {
            quality: 11,
            mode: BrotliEncoderMode::Generic,
            window: 22,
        }
    }

    #[inline(always)]
    ///Sets quality
    ///
    ///Allowed values are from 0 to 11.
    ///
    ///Default value is 11.
    pub const fn quality(mut self, quality: u8) -> Self {
        assert!(quality <= 11);

        self.quality = quality;
        self
    }

    #[inline(always)]
    ///Sets mode
    pub const fn mode(mut self, mode: BrotliEncoderMode) -> Self {
        self.mode = mode;
        self
    }

    #[inline(always)]
    ///Sets sliding window size as base two logarithm.
    ///
    ///Allowed values are from 10 to 24.
    ///
    ///Default value is 22.
    pub const fn window(mut self, window: u8) -> Self {
        assert!(window >= 10);
        assert!(window <= 24);

        self.window = window;
        self
    }

    pub(crate) fn apply(&self, state: &mut super::brotli::EncoderInstance) {
        use brotli::enc::encode::{BrotliEncoderSetParameter, BrotliEncoderParameter};

        let quality = BrotliEncoderSetParameter(state, BrotliEncoderParameter::BROTLI_PARAM_QUALITY, self.quality as _);
        let mode = BrotliEncoderSetParameter(state, BrotliEncoderParameter::BROTLI_PARAM_MODE, self.mode as _);
        let window = BrotliEncoderSetParameter(state, BrotliEncoderParameter::BROTLI_PARAM_LGWIN, self.window as _);
        debug_assert!(quality != 0 && mode != 0 && window != 0);
    }
}

impl Default for BrotliOptions {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}
