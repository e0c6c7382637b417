//! Background writer for fire-and-forget persistence.

use crate::error::{Error, Result};
use crate::log::{PrefsEvent, PrefsLog};
use crate::persist;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

/// One whole-document write, serialized at the moment the mutation was made.
pub(crate) struct WriteJob {
    pub(crate) path: PathBuf,
    pub(crate) bytes: Vec<u8>,
    pub(crate) atomic: bool,
    pub(crate) event: PrefsEvent,
}

/// Handle to a write that was handed off without waiting.
///
/// Dropping it is fine and is the normal way to use `set`/`unset`/`clear`:
/// the write still happens and its outcome still goes to the log sink.
/// [`wait`](Self::wait) is there for callers (and tests) that want to know.
#[derive(Debug)]
pub struct PendingWrite {
    state: State,
}

#[derive(Debug)]
enum State {
    Ready(Result<()>),
    Queued(mpsc::Receiver<Result<()>>),
}

impl PendingWrite {
    pub(crate) fn ready(result: Result<()>) -> Self {
        Self {
            state: State::Ready(result),
        }
    }

    /// Block until the write finishes and return its outcome. The failure, if
    /// any, has already been logged.
    pub fn wait(self) -> Result<()> {
        match self.state {
            State::Ready(result) => result,
            State::Queued(rx) => rx.recv().unwrap_or(Err(Error::WorkerGone)),
        }
    }

    /// Non-blocking peek: `None` while the write is still queued or running.
    pub fn try_wait(&mut self) -> Option<Result<()>> {
        match &self.state {
            State::Ready(result) => Some(result.clone()),
            State::Queued(rx) => match rx.try_recv() {
                Ok(result) => {
                    self.state = State::Ready(result.clone());
                    Some(result)
                }
                Err(mpsc::TryRecvError::Empty) => None,
                Err(mpsc::TryRecvError::Disconnected) => {
                    self.state = State::Ready(Err(Error::WorkerGone));
                    Some(Err(Error::WorkerGone))
                }
            },
        }
    }
}

/// Background thread that runs write jobs in the order they were queued.
/// Dropping it drains whatever is still queued and joins the thread.
pub(crate) struct WriteWorker {
    tx: Option<mpsc::Sender<(WriteJob, mpsc::Sender<Result<()>>)>>,
    log: Arc<dyn PrefsLog>,
    join_handle: Option<thread::JoinHandle<()>>,
}

impl WriteWorker {
    pub(crate) fn start(log: Arc<dyn PrefsLog>) -> Result<Self> {
        let (tx, rx) = mpsc::channel::<(WriteJob, mpsc::Sender<Result<()>>)>();
        let sink = Arc::clone(&log);

        let join_handle = thread::Builder::new()
            .name("json-prefs-writer".into())
            .spawn(move || {
                for (job, done) in rx {
                    let result = run(&job, sink.as_ref());
                    // nobody waiting is the common case
                    let _ = done.send(result);
                }
            })
            .map_err(|e| Error::Io(format!("spawning writer thread: {e}")))?;

        Ok(Self {
            tx: Some(tx),
            log,
            join_handle: Some(join_handle),
        })
    }

    /// Queue a job and return immediately.
    pub(crate) fn submit(&self, job: WriteJob) -> PendingWrite {
        let (done, rx) = mpsc::channel();
        let sent = match &self.tx {
            Some(tx) => tx.send((job, done)).is_ok(),
            None => false,
        };
        if sent {
            PendingWrite {
                state: State::Queued(rx),
            }
        } else {
            self.log.error(&Error::WorkerGone);
            PendingWrite::ready(Err(Error::WorkerGone))
        }
    }
}

/// Perform one job on the current thread and report it to `log`.
pub(crate) fn run(job: &WriteJob, log: &dyn PrefsLog) -> Result<()> {
    match persist::write(&job.path, &job.bytes, job.atomic) {
        Ok(()) => {
            log.info(&job.event);
            Ok(())
        }
        Err(e) => {
            log.error(&e);
            Err(e)
        }
    }
}

impl Drop for WriteWorker {
    fn drop(&mut self) {
        drop(self.tx.take());
        if let Some(h) = self.join_handle.take() {
            let _ = h.join();
        }
    }
}
