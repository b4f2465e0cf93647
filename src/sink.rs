//! Downstream consumer of produced output

extern crate alloc;

use alloc::vec::Vec;
use bytes::{Bytes, BytesMut};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
///Downstream readiness after receiving output
pub enum Demand {
    ///Can accept more.
    Ready,
    ///Has enough buffered. Engine stops issuing writes until [Engine::resume](crate::Engine::resume)
    Saturated,
    ///Consumer is gone. Engine tears itself down.
    Closed,
}

///Receiver of engine output.
pub trait Sink {
    ///Receives next segment of output, in the order codec produced it.
    fn push(&mut self, chunk: Bytes) -> Demand;

    ///Signals that no more output will follow.
    fn end(&mut self);
}

///Sink that accumulates output in memory.
///
///Optionally reports saturation once `high_water_mark` bytes are buffered, and closes itself
///once total output exceeds `limit`.
pub struct Collector {
    segments: Vec<Bytes>,
    buffered: usize,
    total: usize,
    high_water_mark: Option<usize>,
    limit: Option<usize>,
    overflowed: bool,
    ended: bool,
}

impl Collector {
    #[inline]
    ///Creates unbounded collector
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
            buffered: 0,
            total: 0,
            high_water_mark: None,
            limit: None,
            overflowed: false,
            ended: false,
        }
    }

    #[inline]
    ///Sets number of buffered bytes after which collector reports saturation.
    pub const fn high_water_mark(mut self, high_water_mark: usize) -> Self {
        self.high_water_mark = Some(high_water_mark);
        self
    }

    #[inline]
    ///Sets maximum total number of bytes collector accepts.
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[inline(always)]
    ///Returns segments received so far and not yet taken
    pub fn segments(&self) -> &[Bytes] {
        &self.segments
    }

    #[inline]
    ///Takes buffered segments out, making room for more output.
    pub fn take(&mut self) -> Vec<Bytes> {
        self.buffered = 0;
        core::mem::take(&mut self.segments)
    }

    #[inline(always)]
    ///Returns total number of bytes received
    pub fn total(&self) -> usize {
        self.total
    }

    #[inline(always)]
    ///Returns number of bytes received and not yet taken
    pub fn buffered(&self) -> usize {
        self.buffered
    }

    #[inline(always)]
    ///Returns whether end of output was signaled
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    #[inline(always)]
    ///Returns whether output went over `limit`
    pub fn is_overflowed(&self) -> bool {
        self.overflowed
    }

    ///Concatenates buffered segments
    pub fn into_bytes(mut self) -> Bytes {
        match self.segments.len() {
            0 => Bytes::new(),
            1 => self.segments.swap_remove(0),
            _ => {
                let mut result = BytesMut::with_capacity(self.buffered);
                for segment in self.segments.iter() {
                    result.extend_from_slice(segment);
                }
                result.freeze()
            }
        }
    }
}

impl Default for Collector {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for Collector {
    fn push(&mut self, chunk: Bytes) -> Demand {
        self.total += chunk.len();
        if let Some(limit) = self.limit {
            if self.total > limit {
                self.overflowed = true;
                return Demand::Closed;
            }
        }

        self.buffered += chunk.len();
        self.segments.push(chunk);

        match self.high_water_mark {
            Some(high_water_mark) if self.buffered >= high_water_mark => Demand::Saturated,
            _ => Demand::Ready,
        }
    }

    #[inline(always)]
    fn end(&mut self) {
        self.ended = true;
    }
}
