extern crate alloc;

use alloc::boxed::Box;
use alloc::collections::VecDeque;

use crate::error::Error;

///Completion callback
pub type Callback = Box<dyn FnOnce(Result<(), Error>)>;

pub(crate) enum Task {
    //Run write of in-flight chunk and process its result
    Write,
    //Deferred callback
    Notify(Callback, Result<(), Error>),
}

///Single threaded cooperative scheduler.
///
///Tasks run strictly in order they were queued.
pub(crate) struct Scheduler {
    tasks: VecDeque<Task>,
}

impl Scheduler {
    #[inline(always)]
    pub(crate) const fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }

    #[inline(always)]
    pub(crate) fn schedule(&mut self, task: Task) {
        self.tasks.push_back(task);
    }

    #[inline(always)]
    pub(crate) fn notify(&mut self, callback: Callback, result: Result<(), Error>) {
        self.schedule(Task::Notify(callback, result));
    }

    #[inline(always)]
    pub(crate) fn next(&mut self) -> Option<Task> {
        self.tasks.pop_front()
    }

    #[inline(always)]
    pub(crate) fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }
}
