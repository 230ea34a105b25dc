//! Ticket comment channel (websocket transport).
//!
//! # Design
//! - One channel per component instance; attaching always detaches the
//!   previous ticket first so a stale socket can never deliver frames.
//! - A single driver task owns both socket halves; dropping them on exit
//!   is what actually closes the connection.
//! - No automatic reconnect: an unexpected drop surfaces through
//!   `on_closed` and the view re-attaches explicitly.

use crate::core::error::ApiError;
use crate::core::logic::build_channel_url;
use futures::channel::{mpsc, oneshot};
use futures::{FutureExt, SinkExt, StreamExt, select};
use gloo::console;
use gloo_net::websocket::{Message, futures::WebSocket};
use helpdesk_api_models::{Comment, OutboundComment};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use yew::Callback;

struct ActiveChannel {
    ticket_id: String,
    outbound: mpsc::UnboundedSender<OutboundComment>,
    close: Option<oneshot::Sender<()>>,
}

/// Reconnectable duplex channel bound to one ticket at a time.
#[derive(Clone, Default)]
pub(crate) struct CommentChannel {
    active: Rc<RefCell<Option<ActiveChannel>>>,
    generation: Rc<Cell<u64>>,
}

impl CommentChannel {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Ticket id of the currently open channel, if any.
    pub(crate) fn attached_ticket(&self) -> Option<String> {
        self.active
            .borrow()
            .as_ref()
            .map(|channel| channel.ticket_id.clone())
    }

    /// Open the channel for `ticket_id`, detaching any previous one first.
    ///
    /// `on_comment` fires once per inbound frame; `on_closed` fires once if
    /// the channel drops without an explicit [`Self::detach`].
    pub(crate) fn attach(
        &self,
        base_url: &str,
        ticket_id: &str,
        token: &str,
        on_comment: Callback<Comment>,
        on_closed: Callback<()>,
    ) -> Result<(), ApiError> {
        // Detach-before-attach is mandatory; see the module notes.
        self.detach();

        let url = build_channel_url(base_url, ticket_id, token);
        let socket = WebSocket::open(&url).map_err(|err| ApiError::Network(err.to_string()))?;

        let (outbound_tx, outbound_rx) = mpsc::unbounded();
        let (close_tx, close_rx) = oneshot::channel();
        let generation = self.generation.get();
        self.active.replace(Some(ActiveChannel {
            ticket_id: ticket_id.to_string(),
            outbound: outbound_tx,
            close: Some(close_tx),
        }));

        let active = Rc::clone(&self.active);
        let generations = Rc::clone(&self.generation);
        yew::platform::spawn_local(async move {
            drive_channel(socket, outbound_rx, close_rx, on_comment).await;
            // Only the generation that opened the socket may report a drop;
            // an explicit detach has already moved on.
            if generations.get() == generation {
                active.replace(None);
                on_closed.emit(());
            }
        });
        Ok(())
    }

    /// Queue an outbound comment frame on the open channel.
    ///
    /// # Errors
    /// Returns [`ApiError::ChannelNotConnected`] when no channel is open;
    /// the content is not queued or retried.
    pub(crate) fn send(&self, content: &str) -> Result<(), ApiError> {
        let active = self.active.borrow();
        let channel = active.as_ref().ok_or(ApiError::ChannelNotConnected)?;
        channel
            .outbound
            .unbounded_send(OutboundComment {
                content: content.to_string(),
            })
            .map_err(|_| ApiError::ChannelNotConnected)
    }

    /// Close the channel explicitly; safe to call when nothing is open.
    pub(crate) fn detach(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
        if let Some(mut channel) = self.active.borrow_mut().take() {
            if let Some(close) = channel.close.take() {
                let _ = close.send(());
            }
        }
    }
}

async fn drive_channel(
    socket: WebSocket,
    outbound: mpsc::UnboundedReceiver<OutboundComment>,
    close: oneshot::Receiver<()>,
    on_comment: Callback<Comment>,
) {
    let (mut sink, stream) = socket.split();
    let mut stream = stream.fuse();
    let mut outbound = outbound.fuse();
    let mut close = close.fuse();

    loop {
        select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => match serde_json::from_str::<Comment>(&text) {
                    Ok(comment) => on_comment.emit(comment),
                    Err(err) => console::error!("undecodable comment frame", err.to_string()),
                },
                Some(Ok(Message::Bytes(_))) => {
                    console::warn!("ignoring binary frame on comment channel");
                }
                Some(Err(err)) => {
                    console::error!("comment channel read failed", err.to_string());
                    break;
                }
                None => break,
            },
            frame = outbound.next() => {
                let Some(frame) = frame else { break };
                let Ok(text) = serde_json::to_string(&frame) else { continue };
                if let Err(err) = sink.send(Message::Text(text)).await {
                    console::error!("comment channel write failed", err.to_string());
                    break;
                }
            }
            _ = close => break,
        }
    }
    // Dropping both halves closes the underlying socket.
}
