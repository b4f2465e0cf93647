//! Streaming transform engine
//!
//!Turns codec [Handle] operating on discrete input/output buffer pairs into continuous byte
//!pipe, which can be fed chunks of any size and paused according to downstream demand.
//!
//!## Scheduling
//!
//!Engine never writes to the codec from within the call that submitted data.
//!Every write is queued as a task and executed on a later turn, driven by [Engine::turn] or
//![Engine::run]. At most one write is in flight at any time.
//!
//!## Example
//!
//!```rust
//!use compu_stream::{Engine, StreamOptions, Collector, Interface, ZlibMode, ZlibOptions};
//!
//!let handle = Interface::zlib(ZlibMode::Gzip, &ZlibOptions::new()).expect("to create gzip handle");
//!let mut engine = Engine::new(handle, Collector::new(), StreamOptions::new());
//!engine.write(&b"hello "[..], None).expect("to write");
//!engine.write(&b"world"[..], None).expect("to write");
//!engine.end(None).expect("to end");
//!engine.run();
//!
//!assert!(engine.is_finished());
//!let compressed = engine.into_sink().into_bytes();
//!
//!let handle = Interface::zlib(ZlibMode::Gunzip, &ZlibOptions::new()).expect("to create gunzip handle");
//!let decompressed = compu_stream::oneshot::convert_sync_with(handle, &compressed, StreamOptions::new()).expect("to decompress");
//!assert_eq!(decompressed, &b"hello world"[..]);
//!```

extern crate alloc;

use core::mem;
use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use bytes::Bytes;

use crate::buffer::OutputBuffer;
use crate::error::Error;
use crate::flush::Flush;
use crate::handle::{Handle, Params};
use crate::sink::Sink;

mod options;
pub use options::{StreamOptions, DEFAULT_CHUNK_SIZE, MIN_CHUNK_SIZE};
mod task;
pub use task::Callback;
use task::{Scheduler, Task};
mod driver;
mod params;
mod sync;

//What to do once chunk is retired
pub(crate) enum Completion {
    None,
    Callback(Callback),
    //Flush issued to change codec parameters
    Params {
        params: Params,
        done: Option<Callback>,
    },
}

impl From<Option<Callback>> for Completion {
    #[inline(always)]
    fn from(done: Option<Callback>) -> Self {
        match done {
            Some(done) => Completion::Callback(done),
            None => Completion::None,
        }
    }
}

struct Pending {
    chunk: Bytes,
    //`None` means configured default
    flush: Option<Flush>,
    completion: Completion,
}

pub(crate) struct InFlight {
    chunk: Bytes,
    in_off: usize,
    avail_in_before: usize,
    flush: Flush,
    completion: Completion,
}

///Streaming engine
///
///Owns codec [Handle], output buffer and downstream [Sink].
pub struct Engine<S> {
    handle: Option<Handle>,
    sink: S,
    output: OutputBuffer,
    options: StreamOptions,
    params: Option<Params>,
    queue: VecDeque<Pending>,
    in_flight: Option<InFlight>,
    //Write waiting for downstream demand
    continuation: Option<InFlight>,
    scheduler: Scheduler,
    saturated: bool,
    ending: bool,
    final_submitted: bool,
    finished: bool,
    output_ended: bool,
    destroyed: bool,
    error: Option<Error>,
    bytes_written: u64,
    end_callbacks: Vec<Callback>,
    error_handler: Option<Box<dyn FnMut(&Error)>>,
}

impl<S: Sink> Engine<S> {
    ///Creates new engine over `handle`, sending output into `sink`
    pub fn new(handle: Handle, sink: S, options: StreamOptions) -> Self {
        Self {
            params: handle.initial_params(),
            handle: Some(handle),
            sink,
            output: OutputBuffer::new(options.chunk_size),
            options,
            queue: VecDeque::new(),
            in_flight: None,
            continuation: None,
            scheduler: Scheduler::new(),
            saturated: false,
            ending: false,
            final_submitted: false,
            finished: false,
            output_ended: false,
            destroyed: false,
            error: None,
            bytes_written: 0,
            end_callbacks: Vec::new(),
            error_handler: None,
        }
    }

    #[inline(always)]
    ///Returns reference to the sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[inline(always)]
    ///Returns mutable reference to the sink
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    #[inline(always)]
    ///Consumes engine, returning the sink
    pub fn into_sink(self) -> S {
        self.sink
    }

    #[inline(always)]
    ///Returns options engine was created with
    pub fn options(&self) -> &StreamOptions {
        &self.options
    }

    #[inline(always)]
    ///Returns current codec parameters, if codec supports them
    pub fn params(&self) -> Option<Params> {
        self.params
    }

    #[inline(always)]
    ///Returns number of input bytes consumed by codec
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    #[inline(always)]
    ///Returns recorded error, if any
    pub fn error(&self) -> Option<Error> {
        self.error
    }

    #[inline(always)]
    ///Returns whether engine has been torn down
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    #[inline(always)]
    ///Returns whether final chunk has been retired
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[inline(always)]
    ///Returns whether codec handle has been released
    pub fn is_closed(&self) -> bool {
        self.handle.is_none()
    }

    #[inline(always)]
    ///Returns whether write is either in flight or waiting for downstream demand
    pub fn has_pending_write(&self) -> bool {
        self.in_flight.is_some() || self.continuation.is_some()
    }

    #[inline]
    ///Registers handler invoked once, when engine records terminal error.
    pub fn set_error_handler<F: FnMut(&Error) + 'static>(&mut self, handler: F) {
        self.error_handler = Some(Box::new(handler));
    }

    ///Submits `chunk` for processing with default flush flag.
    ///
    ///`done` is called exactly once, after chunk is fully consumed by codec or engine is torn down.
    pub fn write(&mut self, chunk: impl Into<Bytes>, done: Option<Callback>) -> Result<(), Error> {
        self.check_writable()?;
        self.enqueue(chunk.into(), None, done.into());
        Ok(())
    }

    ///Requests codec to flush with `kind` strength (configured full flush when `None`).
    ///
    ///Represented as empty chunk, ordered with the rest of writes.
    ///If stream is ending already, `done` is called once it finishes.
    pub fn flush(&mut self, kind: Option<Flush>, done: Option<Callback>) -> Result<(), Error> {
        if let Some(error) = self.error {
            return Err(error);
        }

        if self.finished {
            if let Some(done) = done {
                self.scheduler.notify(done, Ok(()));
            }
            return Ok(());
        } else if self.destroyed {
            return Err(Error::Destroyed);
        } else if self.ending {
            if let Some(done) = done {
                self.end_callbacks.push(done);
            }
            return Ok(());
        }

        let kind = kind.unwrap_or(self.options.full_flush);
        self.enqueue(Bytes::new(), Some(kind), done.into());
        Ok(())
    }

    ///Ends input.
    ///
    ///Final chunk is processed with the stronger of its flag and configured finish flag.
    ///Once it is retired, sink receives end of output, `done` is called and handle is released.
    pub fn end(&mut self, done: Option<Callback>) -> Result<(), Error> {
        if let Some(error) = self.error {
            return Err(error);
        }

        if self.finished {
            if let Some(done) = done {
                self.scheduler.notify(done, Ok(()));
            }
            return Ok(());
        } else if self.destroyed {
            return Err(Error::Destroyed);
        }

        if let Some(done) = done {
            self.end_callbacks.push(done);
        }
        self.ending = true;
        self.pump();
        Ok(())
    }

    ///Resets codec state, allowing to start new stream with the same handle.
    pub fn reset(&mut self) -> Result<(), Error> {
        let handle = self.handle.as_mut().ok_or(Error::Closed)?;
        match handle.reset() {
            true => Ok(()),
            false => Err(Error::ResetFailed),
        }
    }

    #[inline]
    ///Closes engine, releasing codec handle.
    ///
    ///Safe to call multiple times.
    pub fn close(&mut self) {
        self.destroy(None)
    }

    ///Tears engine down, recording `error` if provided.
    ///
    ///Queued chunks complete with error. In-flight write completes with error on its turn,
    ///without touching the codec. Pending parameter updates never complete.
    pub fn destroy(&mut self, error: Option<Error>) {
        if let Some(error) = error {
            self.record(error);
        }
        if self.destroyed {
            return;
        }

        self.destroyed = true;
        self.close_handle();

        let reason = self.error.unwrap_or(Error::Destroyed);
        while let Some(pending) = self.queue.pop_front() {
            self.complete(pending.completion, Err(reason));
        }
        if let Some(continuation) = self.continuation.take() {
            self.complete(continuation.completion, Err(reason));
        }
        for done in mem::take(&mut self.end_callbacks) {
            done(Err(reason));
        }
    }

    ///Runs single scheduled task.
    ///
    ///Returns `false` if there was nothing to run.
    pub fn turn(&mut self) -> bool {
        match self.scheduler.next() {
            Some(Task::Write) => {
                self.process_write();
                true
            },
            Some(Task::Notify(done, result)) => {
                done(result);
                true
            },
            None => false,
        }
    }

    #[inline]
    ///Runs scheduled tasks until there is nothing left to do.
    ///
    ///Stops early when write is waiting for downstream demand.
    pub fn run(&mut self) {
        while self.turn() {
        }
    }

    #[inline(always)]
    ///Returns whether there are no scheduled tasks.
    pub fn is_idle(&self) -> bool {
        self.scheduler.is_idle()
    }

    fn check_writable(&self) -> Result<(), Error> {
        if let Some(error) = self.error {
            Err(error)
        } else if self.destroyed {
            Err(Error::Destroyed)
        } else if self.ending {
            Err(Error::WriteAfterEnd)
        } else {
            Ok(())
        }
    }

    fn enqueue(&mut self, chunk: Bytes, flush: Option<Flush>, completion: Completion) {
        self.queue.push_back(Pending {
            chunk,
            flush,
            completion,
        });
        self.pump();
    }

    //Starts next queued chunk when nothing is in flight and downstream wants more.
    fn pump(&mut self) {
        if self.destroyed || self.finished || self.has_pending_write() {
            return;
        }

        if self.queue.is_empty() {
            if !self.ending {
                return;
            } else if self.final_submitted {
                self.finish();
                return;
            }

            //Last chunk didn't carry finish flag, so it needs its own
            self.queue.push_back(Pending {
                chunk: Bytes::new(),
                flush: None,
                completion: Completion::None,
            });
        }

        if self.saturated {
            return;
        }

        if let Some(pending) = self.queue.pop_front() {
            let mut flush = pending.flush.unwrap_or(self.options.flush);
            if self.ending && self.queue.is_empty() {
                flush = flush.strongest(self.options.finish_flush);
                self.final_submitted = true;
            }
            self.submit(pending.chunk, flush, pending.completion);
        }
    }

    fn finish(&mut self) {
        log::debug!("stream finished, consumed {} bytes", self.bytes_written);
        self.finished = true;
        self.end_output();
        self.close_handle();
        for done in mem::take(&mut self.end_callbacks) {
            done(Ok(()));
        }
    }

    fn end_output(&mut self) {
        if !self.output_ended {
            self.output_ended = true;
            self.sink.end();
        }
    }

    fn close_handle(&mut self) {
        if let Some(handle) = self.handle.take() {
            log::trace!("releasing codec handle");
            handle.close();
        }
    }

    fn record(&mut self, error: Error) {
        if self.error.is_none() {
            log::warn!("stream failed: {}", error);
            self.error = Some(error);
            if let Some(handler) = self.error_handler.as_mut() {
                handler(&error);
            }
        }
    }

    #[inline]
    fn fail(&mut self, error: Error) {
        self.destroy(Some(error));
    }

    fn complete(&mut self, completion: Completion, result: Result<(), Error>) {
        match completion {
            Completion::None => (),
            Completion::Callback(done) => done(result),
            Completion::Params { params, done } => match result {
                Ok(()) => self.apply_params(params, done),
                //Torn down before flush completed, update is abandoned
                Err(_) => (),
            },
        }
    }
}
