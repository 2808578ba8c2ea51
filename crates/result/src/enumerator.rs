//! Lazy, single-consumer body sources.
//!
//! An [`Enumerator`] is polled by exactly one consumer, the transport draining a
//! result. Push producers get a channel backed pair from [`Enumerator::channel`];
//! once the consumer is dropped, [`EnumeratorSender::send`] starts failing, which
//! is how cancellation reaches the producer.

use futures::channel::mpsc::{SendError, Sender, channel};
use futures::stream::{self, BoxStream};
use futures::{SinkExt, Stream, StreamExt};
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

pub struct Enumerator<A> {
    stream: BoxStream<'static, A>,
}

impl<A> Enumerator<A>
where
    A: Send + 'static,
{
    /// An enumerator producing nothing.
    pub fn empty() -> Self {
        Self { stream: stream::empty().boxed() }
    }

    /// An enumerator producing exactly one element.
    pub fn once(element: A) -> Self {
        Self { stream: stream::once(async move { element }).boxed() }
    }

    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = A> + Send + 'static,
    {
        Self { stream: stream.boxed() }
    }

    pub fn from_values<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = A>,
        I::IntoIter: Send + 'static,
    {
        Self { stream: stream::iter(iter).boxed() }
    }

    /// Creates a bounded channel and the enumerator reading from it.
    ///
    /// The enumerator ends after every sender has been dropped or closed.
    pub fn channel(buffer: usize) -> (Self, EnumeratorSender<A>) {
        let (sender, receiver) = channel::<A>(buffer);
        (Self::from_stream(receiver), EnumeratorSender { sink: sender })
    }

    /// Lazily transforms every element.
    pub fn map<B, F>(self, f: F) -> Enumerator<B>
    where
        B: Send + 'static,
        F: FnMut(A) -> B + Send + 'static,
    {
        Enumerator { stream: self.stream.map(f).boxed() }
    }
}

impl<A> Stream for Enumerator<A> {
    type Item = A;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.stream.poll_next_unpin(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.stream.size_hint()
    }
}

impl<A> fmt::Debug for Enumerator<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Enumerator").field("size_hint", &self.stream.size_hint()).finish()
    }
}

/// The producer half of [`Enumerator::channel`].
#[derive(Debug)]
pub struct EnumeratorSender<A> {
    sink: Sender<A>,
}

impl<A> Clone for EnumeratorSender<A> {
    fn clone(&self) -> Self {
        Self { sink: self.sink.clone() }
    }
}

impl<A> EnumeratorSender<A> {
    /// Pushes one element, waiting while the channel is full.
    pub async fn send(&mut self, element: A) -> Result<(), SendError> {
        self.sink.send(element).await
    }

    pub async fn close(&mut self) -> Result<(), SendError> {
        self.sink.close().await
    }

    /// Returns true once the consuming enumerator has been dropped.
    pub fn is_closed(&self) -> bool {
        self.sink.is_closed()
    }
}
