//! Server-sent events as a chunked result.
//!
//! ```
//! use micro_result::event_source::{Event, event_channel};
//! use micro_result::result::ActionResult;
//!
//! # async fn emit() {
//! let (result, mut sender) = event_channel(16);
//! tokio::spawn(async move {
//!     let _ = sender.send(Event::from_data("tick")).await;
//!     let _ = sender.close().await;
//! });
//! let _action: ActionResult = result.into();
//! # }
//! ```

use futures::Stream;
use http::HeaderValue;
use http::header::CACHE_CONTROL;
use std::fmt::Write;
use std::time::Duration;

use crate::enumerator::{Enumerator, EnumeratorSender};
use crate::fixed_content_type;
use crate::result::{ChunkedResult, PlainResult};
use crate::results::OK;
use crate::writeable::{Writeable, Written};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Retry(Duration),
    Message(Message),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    // https://html.spec.whatwg.org/multipage/server-sent-events.html#concept-event-stream-last-event-id
    pub id: Option<String>,
    pub name: Option<String>,
    pub data: String,
}

impl Event {
    pub fn message<S: Into<String>>(data: S, id: Option<String>, name: Option<String>) -> Event {
        Event::Message(Message { id, name, data: data.into() })
    }

    pub fn from_data<S: Into<String>>(data: S) -> Event {
        Event::Message(Message { id: None, name: None, data: data.into() })
    }

    pub fn retry(duration: impl Into<Duration>) -> Event {
        Event::Retry(duration.into())
    }
}

impl Writeable for Event {
    fn write(self) -> Written {
        let frame = match self {
            Event::Message(Message { id, name, data }) => {
                let mut frame = String::with_capacity(data.len() + 16);

                if let Some(id) = id {
                    let _ = writeln!(frame, "id: {}", single_line(&id));
                }

                if let Some(name) = name {
                    let _ = writeln!(frame, "event: {}", single_line(&name));
                }

                // every line of the payload gets its own field, an empty payload still one
                for line in data.split("\r\n").flat_map(|line| line.split(['\r', '\n'])) {
                    let _ = writeln!(frame, "data: {line}");
                }

                frame.push('\n');
                frame
            }
            Event::Retry(duration) => format!("retry: {}\n\n", duration.as_millis()),
        };
        Written::Text(frame)
    }
}

// a line break would end the field and start another one
fn single_line(field: &str) -> String {
    field.replace(['\r', '\n'], "")
}

fixed_content_type!(Event => Some(mime::TEXT_EVENT_STREAM));

/// Streams `events` as `text/event-stream`.
pub fn event_stream<S>(events: S) -> ChunkedResult<Event>
where
    S: Stream<Item = Event> + Send + 'static,
{
    OK.stream(Enumerator::from_stream(events)).with_header(CACHE_CONTROL, HeaderValue::from_static("no-cache"))
}

/// An event stream fed through the returned sender.
///
/// The stream ends once every sender is closed or dropped.
pub fn event_channel(buffer: usize) -> (ChunkedResult<Event>, EnumeratorSender<Event>) {
    let (events, sender) = Enumerator::channel(buffer);
    (event_stream(events), sender)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ActionResult;
    use bytes::Bytes;
    use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
    use http_body_util::BodyExt;

    fn frame(event: Event) -> Bytes {
        event.write().into_bytes()
    }

    #[test]
    fn test_message_frame() {
        assert_eq!(frame(Event::from_data("hello")), Bytes::from_static(b"data: hello\n\n"));

        let event = Event::message("line 1\r\nline 2", Some("7".to_owned()), Some("update".to_owned()));
        assert_eq!(frame(event), Bytes::from_static(b"id: 7\nevent: update\ndata: line 1\ndata: line 2\n\n"));
    }

    #[test]
    fn test_every_line_break_splits_data() {
        let event = Event::from_data("a\rb\r\nc\nd");
        assert_eq!(frame(event), Bytes::from_static(b"data: a\ndata: b\ndata: c\ndata: d\n\n"));
    }

    #[test]
    fn test_id_and_name_stay_on_one_line() {
        let event = Event::message("x", Some("1\ndata: injected".to_owned()), Some("up\r\ndate".to_owned()));
        assert_eq!(frame(event), Bytes::from_static(b"id: 1data: injected\nevent: update\ndata: x\n\n"));
    }

    #[test]
    fn test_empty_data_frame() {
        assert_eq!(frame(Event::from_data("")), Bytes::from_static(b"data: \n\n"));
    }

    #[test]
    fn test_retry_frame() {
        assert_eq!(frame(Event::retry(Duration::from_secs(3))), Bytes::from_static(b"retry: 3000\n\n"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_event_channel() {
        let (result, mut sender) = event_channel(4);
        assert_eq!(result.header().content_type().unwrap(), "text/event-stream");
        assert_eq!(result.header().get(&CACHE_CONTROL).unwrap(), "no-cache");

        let producer = tokio::spawn(async move {
            sender.send(Event::from_data("first")).await.unwrap();
            sender.send(Event::retry(Duration::from_millis(500))).await.unwrap();
            sender.close().await.unwrap();
        });

        let response = ActionResult::from(result).into_response().await.unwrap();
        assert!(!response.headers().contains_key(CONTENT_LENGTH));
        assert_eq!(response.headers()[CONTENT_TYPE], "text/event-stream");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from_static(b"data: first\n\nretry: 500\n\n"));

        producer.await.unwrap();
    }
}
