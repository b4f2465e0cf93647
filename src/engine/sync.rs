//! Synchronous drain loop

extern crate alloc;

use alloc::vec::Vec;
use bytes::{Bytes, BytesMut};

use super::Engine;
use crate::error::Error;
use crate::flush::Flush;
use crate::sink::Sink;

impl<S: Sink> Engine<S> {
    ///Runs codec over whole `input` with `flush` until it stops filling output, returning all output.
    ///
    ///Handle is released once done, so this is intended for one-shot conversions.
    ///
    ///## Errors
    ///
    ///- Previously recorded error is returned as it is.
    ///- Output exceeding `max_output_length` closes handle and results in [Error::OutputTooLarge].
    ///- Codec error is recorded and returned.
    pub fn drain_sync(&mut self, mut input: &[u8], flush: Flush) -> Result<Bytes, Error> {
        if let Some(error) = self.error {
            return Err(error);
        } else if self.destroyed {
            return Err(Error::Destroyed);
        }
        debug_assert!(!self.has_pending_write(), "synchronous drain while asynchronous write is pending");

        let mut segments = Vec::new();
        let mut nread = 0usize;

        loop {
            let avail_in_before = input.len();
            let avail_out_before = self.output.room();

            let result = match self.handle.as_mut() {
                Some(handle) => handle.write(flush, input, self.output.spare_mut()).map_err(Error::Codec),
                None => Err(Error::Closed),
            };
            let state = match result {
                Ok(state) => state,
                Err(error) => {
                    self.fail(error);
                    return Err(error);
                }
            };

            assert!(state.avail_out <= avail_out_before, "codec reported more output room than it was given");
            assert!(state.avail_in <= avail_in_before, "codec reported more input than it was given");

            let consumed = avail_in_before - state.avail_in;
            let produced = avail_out_before - state.avail_out;
            self.bytes_written += consumed as u64;

            if produced > 0 {
                let output = self.output.take(produced);
                nread += output.len();
                segments.push(output);

                if nread > self.options.max_output_length {
                    let error = Error::OutputTooLarge {
                        max: self.options.max_output_length,
                    };
                    self.close_handle();
                    self.fail(error);
                    return Err(error);
                }
            }

            if state.avail_out == 0 || self.output.is_full() {
                self.output.recycle();
            }

            if state.avail_out == 0 {
                input = &input[consumed..];
            } else {
                break;
            }
        }

        log::debug!("synchronous drain done: consumed={} produced={}", self.bytes_written, nread);
        self.close_handle();

        Ok(match segments.len() {
            0 => Bytes::new(),
            1 => segments.swap_remove(0),
            _ => {
                let mut result = BytesMut::with_capacity(nread);
                for segment in segments.iter() {
                    result.extend_from_slice(segment);
                }
                result.freeze()
            }
        })
    }
}
