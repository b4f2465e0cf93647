//! Chunk driver: one asynchronous codec write per turn

use bytes::Bytes;

use super::{Completion, Engine, InFlight, Task};
use crate::error::Error;
use crate::flush::Flush;
use crate::handle::WriteState;
use crate::sink::{Demand, Sink};

impl<S: Sink> Engine<S> {
    pub(super) fn submit(&mut self, chunk: Bytes, flush: Flush, completion: Completion) {
        debug_assert!(!self.has_pending_write());
        log::trace!("submit chunk: len={} flush={:?}", chunk.len(), flush);

        self.in_flight = Some(InFlight {
            avail_in_before: chunk.len(),
            in_off: 0,
            chunk,
            flush,
            completion,
        });
        self.scheduler.schedule(Task::Write);
    }

    pub(super) fn process_write(&mut self) {
        let in_flight = match self.in_flight.take() {
            Some(in_flight) => in_flight,
            None => return,
        };

        //Handle is gone already, so write must not reach codec
        if self.destroyed {
            let reason = self.error.unwrap_or(Error::Destroyed);
            self.complete(in_flight.completion, Err(reason));
            return;
        }

        let avail_out_before = self.output.room();
        let result = match self.handle.as_mut() {
            Some(handle) => {
                let input = &in_flight.chunk[in_flight.in_off..in_flight.in_off + in_flight.avail_in_before];
                handle.write(in_flight.flush, input, self.output.spare_mut()).map_err(Error::Codec)
            },
            None => Err(Error::Closed),
        };

        match result {
            Ok(state) => self.after_write(in_flight, avail_out_before, state),
            Err(error) => {
                //Faulting chunk learns about error before the rest of pending work
                self.complete(in_flight.completion, Err(error));
                self.fail(error);
            }
        }
    }

    fn after_write(&mut self, mut in_flight: InFlight, avail_out_before: usize, state: WriteState) {
        assert!(state.avail_out <= avail_out_before, "codec reported more output room than it was given");
        assert!(state.avail_in <= in_flight.avail_in_before, "codec reported more input than it was given");

        let consumed = in_flight.avail_in_before - state.avail_in;
        let produced = avail_out_before - state.avail_out;
        self.bytes_written += consumed as u64;
        log::trace!("write: consumed={} produced={} avail_in={} avail_out={}", consumed, produced, state.avail_in, state.avail_out);

        let mut demand = Demand::Ready;
        if produced > 0 {
            let output = self.output.take(produced);
            demand = self.emit(output);
        }

        match demand {
            Demand::Ready => (),
            Demand::Saturated => self.saturated = true,
            Demand::Closed => {
                log::debug!("consumer is gone, tearing down");
                self.destroy(None);
            }
        }

        if self.destroyed {
            let reason = self.error.unwrap_or(Error::Destroyed);
            self.complete(in_flight.completion, Err(reason));
            return;
        }

        if state.avail_out == 0 || self.output.is_full() {
            log::trace!("recycling output buffer of {} bytes", self.output.capacity());
            self.output.recycle();
        }

        if state.avail_out == 0 {
            //Codec has more output for the same chunk
            in_flight.in_off += consumed;
            in_flight.avail_in_before = state.avail_in;

            if demand == Demand::Saturated {
                log::debug!("downstream saturated, parking write with {} bytes of input left", state.avail_in);
                self.continuation = Some(in_flight);
            } else {
                self.in_flight = Some(in_flight);
                self.scheduler.schedule(Task::Write);
            }
            return;
        }

        if state.avail_in > 0 {
            log::debug!("codec stream ended with {} unconsumed bytes", state.avail_in);
            self.end_output();
        }

        self.complete(in_flight.completion, Ok(()));
        self.pump();
    }

    fn emit(&mut self, output: Bytes) -> Demand {
        if self.output_ended {
            log::debug!("discarding {} bytes produced after end of output", output.len());
            return Demand::Ready;
        }

        self.sink.push(output)
    }

    ///Signals that downstream wants more output.
    ///
    ///Continues parked write or starts next queued chunk.
    pub fn resume(&mut self) {
        self.saturated = false;

        match self.continuation.take() {
            Some(continuation) => {
                log::debug!("resuming parked write");
                self.in_flight = Some(continuation);
                self.scheduler.schedule(Task::Write);
            },
            None => self.pump(),
        }
    }
}
