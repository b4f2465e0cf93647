#![allow(unused)]

use compu_stream::{Callback, CodecError, Demand, Error, Flush, Handle, Interface, Params, Sink, WriteState};
use bytes::Bytes;

use core::ptr;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub const STUB_FAULT: CodecError = CodecError {
    errno: -3,
    code: "Z_DATA_ERROR",
    message: "stub fault",
};

static STUB: Interface = Interface::new(
    write_fn,
    Some(params_fn),
    reset_fn,
    drop_fn,
);

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Write {
        flush: Flush,
        input: Vec<u8>,
    },
    Params {
        params: Params,
        //Whether codec had no output left to give
        drained: bool,
    },
    Reset,
}

#[derive(Default)]
pub struct Recorder {
    pub calls: Vec<Call>,
    pub closed: usize,
    pub refuse_reset: bool,
}

impl Recorder {
    pub fn writes(&self) -> Vec<(Flush, Vec<u8>)> {
        self.calls.iter().filter_map(|call| match call {
            Call::Write { flush, input } => Some((*flush, input.clone())),
            _ => None,
        }).collect()
    }
}

#[derive(Clone, Copy)]
pub struct StubConfig {
    //Number of output bytes per input byte
    pub repeat: usize,
    //Byte after which codec reports end of its stream
    pub stop: Option<u8>,
    //Byte that makes codec fail
    pub fail: Option<u8>,
    pub params: Option<Params>,
}

impl StubConfig {
    pub const fn new() -> Self {
        Self {
            repeat: 1,
            stop: None,
            fail: None,
            params: None,
        }
    }

    pub const fn repeat(mut self, repeat: usize) -> Self {
        self.repeat = repeat;
        self
    }

    pub const fn stop(mut self, stop: u8) -> Self {
        self.stop = Some(stop);
        self
    }

    pub const fn fail(mut self, fail: u8) -> Self {
        self.fail = Some(fail);
        self
    }

    pub const fn params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }
}

struct Stub {
    config: StubConfig,
    recorder: Rc<RefCell<Recorder>>,
    pending: VecDeque<u8>,
    ended: bool,
}

///Creates handle of the stub codec, which echoes input (each byte `repeat` times) and
///keeps output it could not fit for subsequent writes.
pub fn stub(config: StubConfig) -> (Handle, Rc<RefCell<Recorder>>) {
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    let state = Box::new(Stub {
        config,
        recorder: recorder.clone(),
        pending: VecDeque::new(),
        ended: false,
    });
    let instance = ptr::NonNull::from(Box::leak(state)).cast();
    let handle = unsafe {
        STUB.handle(instance, config.params)
    };
    (handle, recorder)
}

unsafe fn write_fn(state: ptr::NonNull<u8>, flush: Flush, input: *const u8, input_len: usize, output: *mut u8, output_len: usize) -> Result<WriteState, CodecError> {
    let state = &mut *(state.as_ptr() as *mut Stub);
    let input = std::slice::from_raw_parts(input, input_len);
    let output = std::slice::from_raw_parts_mut(output, output_len);

    state.recorder.borrow_mut().calls.push(Call::Write {
        flush,
        input: input.to_vec(),
    });

    if let Some(fail) = state.config.fail {
        if input.contains(&fail) {
            return Err(STUB_FAULT);
        }
    }

    let mut consumed = 0;
    if !state.ended {
        for byte in input.iter() {
            consumed += 1;
            for _ in 0..state.config.repeat {
                state.pending.push_back(*byte);
            }
            if state.config.stop == Some(*byte) {
                state.ended = true;
                break;
            }
        }
    }

    let mut produced = 0;
    while produced < output.len() {
        match state.pending.pop_front() {
            Some(byte) => {
                output[produced] = byte;
                produced += 1;
            },
            None => break,
        }
    }

    Ok(WriteState {
        avail_out: output_len - produced,
        avail_in: input_len - consumed,
    })
}

fn params_fn(state: ptr::NonNull<u8>, params: Params) -> Result<(), CodecError> {
    let state = unsafe {
        &mut *(state.as_ptr() as *mut Stub)
    };
    let drained = state.pending.is_empty();
    state.recorder.borrow_mut().calls.push(Call::Params {
        params,
        drained,
    });
    Ok(())
}

fn reset_fn(state: ptr::NonNull<u8>) -> Option<ptr::NonNull<u8>> {
    let stub = unsafe {
        &mut *(state.as_ptr() as *mut Stub)
    };
    let mut recorder = stub.recorder.borrow_mut();
    recorder.calls.push(Call::Reset);
    if recorder.refuse_reset {
        return None;
    }

    stub.pending.clear();
    stub.ended = false;
    Some(state)
}

fn drop_fn(state: ptr::NonNull<u8>) {
    let stub = unsafe {
        Box::from_raw(state.as_ptr() as *mut Stub)
    };
    stub.recorder.borrow_mut().closed += 1;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Data(Vec<u8>),
    End,
    Done(&'static str, Result<(), Error>),
}

pub type Journal = Rc<RefCell<Vec<Event>>>;

pub fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

///Completion callback that records its result in journal
pub fn done(journal: &Journal, tag: &'static str) -> Option<Callback> {
    let journal = journal.clone();
    Some(Box::new(move |result: Result<(), Error>| journal.borrow_mut().push(Event::Done(tag, result))))
}

pub fn output(journal: &Journal) -> Vec<u8> {
    let mut result = Vec::new();
    for event in journal.borrow().iter() {
        if let Event::Data(data) = event {
            result.extend_from_slice(data);
        }
    }
    result
}

pub fn segments(journal: &Journal) -> Vec<usize> {
    journal.borrow().iter().filter_map(|event| match event {
        Event::Data(data) => Some(data.len()),
        _ => None,
    }).collect()
}

///Sink that records everything it receives, replying with scripted demand.
pub struct JournalSink {
    journal: Journal,
    demands: VecDeque<Demand>,
}

impl JournalSink {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            demands: VecDeque::new(),
        }
    }

    pub fn demands(mut self, demands: &[Demand]) -> Self {
        self.demands.extend(demands.iter().copied());
        self
    }
}

impl Sink for JournalSink {
    fn push(&mut self, chunk: Bytes) -> Demand {
        self.journal.borrow_mut().push(Event::Data(chunk.to_vec()));
        self.demands.pop_front().unwrap_or(Demand::Ready)
    }

    fn end(&mut self) {
        self.journal.borrow_mut().push(Event::End);
    }
}

///Text-like data with some noise mixed in
pub fn sample(len: usize) -> Vec<u8> {
    const TEXT: &[u8] = b"Alice was beginning to get very tired of sitting by her sister on the bank, and of having nothing to do. ";

    let mut seed = 0x2545_f491u32;
    (0..len).map(|idx| {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        match idx % 7 {
            0 => seed as u8,
            _ => TEXT[idx % TEXT.len()],
        }
    }).collect()
}
