//! Module `thread` implement a gen-server pattern for streaming work into
//! a single thread.
//!
//! It is inspired from gen-server model from Erlang, where by, the thread
//! holds onto its own state, and all inter-thread communication happens
//! via a size-bounded channel. The bounded channel doubles up as the
//! back-pressure mechanism, producers block once the buffer is full.

use std::{mem, sync::mpsc, thread};

use crate::{Error, Result};

/// Thread type, a single spawned thread consuming a stream of `Q` messages
/// and returning `T` when the stream is exhausted.
///
/// NOTE: When a thread value is dropped, it is made sure that there are no
/// dangling thread routines. To achieve this following requirements need to
/// be satisfied:
///
/// * The thread's main loop should exit once its [Rx] channel disconnects.
/// * All [Tx] clones must be dropped for `join()` to return.
pub struct Thread<Q, T = ()> {
    name: String,
    inner: Option<Inner<Q, T>>,
}

struct Inner<Q, T> {
    handle: thread::JoinHandle<T>,
    tx: Option<Tx<Q>>,
}

impl<Q, T> Inner<Q, T> {
    fn join(mut self) -> Result<T> {
        mem::drop(self.tx.take());

        match self.handle.join() {
            Ok(val) => Ok(val),
            Err(err) => err_at!(ThreadFail, msg: "fail {:?}", err),
        }
    }
}

impl<Q, T> Drop for Thread<Q, T> {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.take() {
            inner.join().ok();
        }
    }
}

impl<Q, T> Thread<Q, T> {
    /// Create a new Thread instance, using synchronous channel with finite
    /// buffer. `main_loop` shall be called with the rx side of the channel
    /// and shall return a function that can be spawned using thread::spawn.
    pub fn new_sync<F, N>(name: &str, chan_size: usize, main_loop: F) -> Thread<Q, T>
    where
        F: 'static + FnOnce(Rx<Q>) -> N + Send,
        N: 'static + Send + FnOnce() -> T,
        T: 'static + Send,
    {
        let (tx, rx) = mpsc::sync_channel(chan_size);
        let handle = thread::spawn(main_loop(rx));

        Thread {
            name: name.to_string(),
            inner: Some(Inner {
                handle,
                tx: Some(Tx(tx)),
            }),
        }
    }

    /// Recommended way to exit/shutdown the thread. Note that all [Tx]
    /// clones of this thread must also be dropped for this call to return.
    ///
    /// Even otherwise, when Thread value goes out of scope its drop
    /// implementation shall call this method to exit the thread, except
    /// that any errors are ignored.
    pub fn join(mut self) -> Result<T> {
        match self.inner.take() {
            Some(inner) => inner.join(),
            None => unreachable!(),
        }
    }

    /// Return name of this thread.
    pub fn to_name(&self) -> String {
        self.name.to_string()
    }

    /// Return a clone of tx channel.
    pub fn to_tx(&self) -> Tx<Q> {
        match self.inner.as_ref() {
            Some(inner) => match &inner.tx {
                Some(tx) => tx.clone(),
                None => unreachable!(),
            },
            None => unreachable!(),
        }
    }
}

/// IPC type, wrapping [mpsc::SyncSender].
///
/// The clone behavior is similar to [mpsc::SyncSender].
pub struct Tx<Q>(mpsc::SyncSender<Q>);

impl<Q> Clone for Tx<Q> {
    fn clone(&self) -> Self {
        Tx(self.0.clone())
    }
}

impl<Q> Tx<Q> {
    /// Post a message to thread, blocks if the channel buffer is full.
    pub fn post(&self, msg: Q) -> Result<()> {
        err_at!(IPCFail, self.0.send(msg))
    }
}

/// IPC type, that shall be passed to the thread's main loop.
///
/// Refer to [Thread::new_sync] for details.
pub type Rx<Q> = mpsc::Receiver<Q>;

#[cfg(test)]
#[path = "thread_test.rs"]
mod thread_test;
