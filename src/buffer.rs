//! Output buffer with write cursor

use bytes::{Bytes, BytesMut};

///Output scratch buffer with write cursor.
///
///Produced bytes are split off the front of the buffer as frozen `Bytes`, so emitted data is
///never touched again. Once buffer is exhausted it is abandoned in favour of fresh allocation.
pub struct OutputBuffer {
    buffer: BytesMut,
    capacity: usize,
}

impl OutputBuffer {
    #[inline]
    ///Creates new instance with `capacity` bytes of room
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::zeroed(capacity),
            capacity,
        }
    }

    #[inline(always)]
    ///Returns configured capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline(always)]
    ///Returns write cursor
    pub fn offset(&self) -> usize {
        debug_assert!(self.buffer.len() <= self.capacity);
        self.capacity - self.buffer.len()
    }

    #[inline(always)]
    ///Returns number of bytes that still can be written
    pub fn room(&self) -> usize {
        self.buffer.len()
    }

    #[inline(always)]
    ///Returns whether cursor reached capacity
    pub fn is_full(&self) -> bool {
        self.buffer.is_empty()
    }

    #[inline(always)]
    ///Returns unwritten part of the buffer
    pub fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.buffer[..]
    }

    #[inline]
    ///Advances cursor by `len`, returning written bytes.
    pub fn take(&mut self, len: usize) -> Bytes {
        assert!(len <= self.buffer.len(), "produced more than available room");
        self.buffer.split_to(len).freeze()
    }

    #[inline]
    ///Replaces buffer with fresh one of the same capacity and resets cursor.
    pub fn recycle(&mut self) {
        self.buffer = BytesMut::zeroed(self.capacity);
    }
}
