//! An unbounded single-producer, single-consumer channel for cooperative,
//! single-threaded message passing, and the duplex pairing sessions use to
//! talk to a transport.
//!
//! Messages are delivered to `take` futures in strict FIFO order. End of
//! stream is explicit: [`Sender::close`] (also performed on drop) makes the
//! receiver observe `None` once the queue is drained. Handles are not `Send`;
//! the no-two-continuations-at-once property of the protocol sessions is a
//! compile-time fact, not a convention.

use std::{
    cell::RefCell,
    collections::VecDeque,
    fmt,
    future::Future,
    pin::Pin,
    rc::Rc,
    task::{Context, Poll, Waker},
};

struct Shared<T> {
    queue: VecDeque<T>,
    closed: bool,
    receiver_gone: bool,
    take_waker: Option<Waker>,
    drain_waker: Option<Waker>,
}

impl<T> Shared<T> {
    fn new() -> Self {
        Shared {
            queue: VecDeque::new(),
            closed: false,
            receiver_gone: false,
            take_waker: None,
            drain_waker: None,
        }
    }
}

/// Create an unbounded channel, returning its two halves.
pub fn channel<T>() -> (Sender<T>, Receiver<T>) {
    let shared = Rc::new(RefCell::new(Shared::new()));
    (
        Sender {
            shared: Rc::clone(&shared),
        },
        Receiver { shared },
    )
}

/// The producing half of a channel.
pub struct Sender<T> {
    shared: Rc<RefCell<Shared<T>>>,
}

impl<T> Sender<T> {
    /// Enqueue a message; never blocks.
    ///
    /// Messages put after [`close`](Self::close), or after the receiver is
    /// gone, are discarded.
    pub fn put(&self, item: T) {
        let waker = {
            let mut shared = self.shared.borrow_mut();
            if shared.closed || shared.receiver_gone {
                return;
            }
            shared.queue.push_back(item);
            shared.take_waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }

    /// Signal end of stream.
    ///
    /// Already-queued messages are still delivered; afterwards the receiver
    /// observes `None`. Dropping the sender closes implicitly.
    pub fn close(&self) {
        let waker = {
            let mut shared = self.shared.borrow_mut();
            shared.closed = true;
            shared.take_waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }

    /// Resolve once the consumer has emptied the queue (or is gone).
    ///
    /// A flush-style probe: it does not affect the stream's content.
    pub fn drain(&self) -> Drain<'_, T> {
        Drain { sender: self }
    }
}

impl<T> Drop for Sender<T> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<T> fmt::Debug for Sender<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shared = self.shared.borrow();
        f.debug_struct("Sender")
            .field("queued", &shared.queue.len())
            .field("closed", &shared.closed)
            .finish()
    }
}

/// The consuming half of a channel.
pub struct Receiver<T> {
    shared: Rc<RefCell<Shared<T>>>,
}

impl<T> Receiver<T> {
    /// Await the next message, or `None` once the stream is closed and
    /// drained.
    ///
    /// The `&mut self` receiver permits a single outstanding take at a time,
    /// which is exactly the one-shot continuation discipline the protocol
    /// sessions rely on.
    pub fn take(&mut self) -> Take<'_, T> {
        Take { receiver: self }
    }

    /// Number of messages currently queued.
    pub fn len(&self) -> usize {
        self.shared.borrow().queue.len()
    }

    /// `true` if no message is currently queued.
    pub fn is_empty(&self) -> bool {
        self.shared.borrow().queue.is_empty()
    }
}

impl<T> Drop for Receiver<T> {
    fn drop(&mut self) {
        let waker = {
            let mut shared = self.shared.borrow_mut();
            shared.receiver_gone = true;
            shared.queue.clear();
            shared.drain_waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

impl<T> fmt::Debug for Receiver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shared = self.shared.borrow();
        f.debug_struct("Receiver")
            .field("queued", &shared.queue.len())
            .field("closed", &shared.closed)
            .finish()
    }
}

/// Future returned by [`Receiver::take`].
pub struct Take<'a, T> {
    receiver: &'a mut Receiver<T>,
}

impl<T> Future for Take<'_, T> {
    type Output = Option<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let mut shared = this.receiver.shared.borrow_mut();
        if let Some(item) = shared.queue.pop_front() {
            let drain_waker = if shared.queue.is_empty() {
                shared.drain_waker.take()
            } else {
                None
            };
            drop(shared);
            if let Some(waker) = drain_waker {
                waker.wake();
            }
            return Poll::Ready(Some(item));
        }
        if shared.closed {
            return Poll::Ready(None);
        }
        shared.take_waker = Some(cx.waker().clone());
        Poll::Pending
    }
}

/// Future returned by [`Sender::drain`].
pub struct Drain<'a, T> {
    sender: &'a Sender<T>,
}

impl<T> Future for Drain<'_, T> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut shared = self.sender.shared.borrow_mut();
        if shared.queue.is_empty() || shared.receiver_gone {
            Poll::Ready(())
        } else {
            shared.drain_waker = Some(cx.waker().clone());
            Poll::Pending
        }
    }
}

/// One endpoint of a duplex pair: two channels wired in opposite directions.
///
/// Each endpoint exclusively owns the halves it holds; the paired endpoint
/// holds the complementary halves.
#[derive(Debug)]
pub struct Duplex<I, O> {
    /// Messages arriving from the paired endpoint.
    pub incoming: Receiver<I>,
    /// Messages sent to the paired endpoint.
    pub outgoing: Sender<O>,
}

/// Create a duplex pair whose first endpoint reads `A` and writes `B`.
pub fn duplex<A, B>() -> (Duplex<A, B>, Duplex<B, A>) {
    let (a_tx, a_rx) = channel::<A>();
    let (b_tx, b_rx) = channel::<B>();
    (
        Duplex {
            incoming: a_rx,
            outgoing: b_tx,
        },
        Duplex {
            incoming: b_rx,
            outgoing: a_tx,
        },
    )
}
