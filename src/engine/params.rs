//! Parameter updates between writes

use bytes::Bytes;

use super::{Callback, Completion, Engine};
use crate::error::Error;
use crate::flush::Flush;
use crate::handle::{Params, ZlibStrategy};
use crate::sink::Sink;

impl<S: Sink> Engine<S> {
    ///Changes compression level and strategy.
    ///
    ///If they differ from current, codec is fully flushed first and change is applied only
    ///once that flush is retired, so no data is compressed with mixed parameters.
    ///Otherwise `done` is called on next turn.
    ///
    ///`done` is never called if engine is torn down before change is applied.
    pub fn update_params(&mut self, level: i32, strategy: ZlibStrategy, done: Option<Callback>) -> Result<(), Error> {
        if let Some(error) = self.error {
            return Err(error);
        } else if self.destroyed {
            return Err(Error::Destroyed);
        }

        let current = self.params.ok_or(Error::ParamsUnsupported)?;
        let requested = Params {
            level,
            strategy,
        };

        if current == requested {
            if let Some(done) = done {
                self.scheduler.notify(done, Ok(()));
            }
            return Ok(());
        } else if self.ending || self.finished {
            return Err(Error::WriteAfterEnd);
        }

        log::debug!("params update requested: {:?} -> {:?}", current, requested);
        self.enqueue(Bytes::new(), Some(Flush::Full), Completion::Params {
            params: requested,
            done,
        });
        Ok(())
    }

    pub(super) fn apply_params(&mut self, params: Params, done: Option<Callback>) {
        debug_assert!(!self.has_pending_write());

        let result = match self.handle.as_mut() {
            Some(handle) => handle.params(params),
            None => Err(Error::Closed),
        };

        match result {
            Ok(()) => {
                log::debug!("params updated: {:?}", params);
                self.params = Some(params);
                if let Some(done) = done {
                    done(Ok(()));
                }
            },
            Err(error) => self.fail(error),
        }
    }
}
