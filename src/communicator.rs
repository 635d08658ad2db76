use crate::{
    config, errors,
    errors::ToResult,
    message::{frame::Frame, verdict::FinalVerdict},
    report::Reporter,
    submission::SubmissionId,
};
use async_stream::stream;
use futures::stream::Stream;
use futures_util::{Sink, SinkExt, StreamExt};
use std::io::Write;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{self, client::IntoClientRequest, http::HeaderValue};
use tracing::{debug, warn};

pub type Socket =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, PartialEq, Eq)]
pub enum StreamEvent {
    Frame(Frame),
    /// The receiver lost the connection before the verdict came and has stopped
    Disconnected(String),
}

pub async fn connect(
    config: &config::Config,
    submission_id: SubmissionId,
) -> Result<Socket, errors::Error> {
    let url = reqwest::Url::parse_with_params(
        &config.stream_url("/ws/submission"),
        &[
            ("id", submission_id.to_string()),
            ("token", config.token.clone()),
        ],
    )
    .with_context_config(|| "Field api.url of the configuration file is not a valid URL")?;

    let mut request = url
        .as_str()
        .into_client_request()
        .context_transport("Failed to prepare verdict stream request")?;
    request.headers_mut().insert(
        "accept-language",
        HeaderValue::from_str(&config.langs)
            .with_context_config(|| "Field langs of the configuration file is not a valid header")?,
    );

    debug!("Opening verdict stream for submission #{submission_id}");
    let (socket, _) = tokio_tungstenite::connect_async(request)
        .await
        .with_context_transport(|| {
            format!("Failed to open verdict stream for submission #{submission_id}")
        })?;
    Ok(socket)
}

/// Turns websocket messages into frames. The stream ends right after the terminal frame or after
/// a single `Disconnected` event.
pub fn frames<'a, S>(socket: &'a mut S) -> impl Stream<Item = StreamEvent> + 'a
where
    S: Stream<Item = Result<tungstenite::Message, tungstenite::Error>> + Unpin,
{
    stream! {
        loop {
            let data = match socket.next().await {
                None => {
                    yield StreamEvent::Disconnected("server closed the connection".to_string());
                    break;
                }
                Some(Err(e)) => {
                    yield StreamEvent::Disconnected(e.to_string());
                    break;
                }
                Some(Ok(tungstenite::Message::Close(frame))) => {
                    let reason = match frame {
                        Some(frame) if !frame.reason.is_empty() => {
                            format!("server closed the connection: {}", frame.reason)
                        }
                        _ => "server closed the connection".to_string(),
                    };
                    yield StreamEvent::Disconnected(reason);
                    break;
                }
                Some(Ok(tungstenite::Message::Text(text))) => text.into_bytes(),
                Some(Ok(tungstenite::Message::Binary(data))) => data,
                Some(Ok(_)) => continue,
            };

            match Frame::classify(data) {
                Some(frame) => {
                    let terminal = frame.is_terminal();
                    yield StreamEvent::Frame(frame);
                    if terminal {
                        break;
                    }
                }
                None => debug!("Skipping empty frame"),
            }
        }
    }
}

async fn receive<S>(mut socket: S, tx: mpsc::UnboundedSender<StreamEvent>)
where
    S: Stream<Item = Result<tungstenite::Message, tungstenite::Error>>
        + Sink<tungstenite::Message>
        + Unpin,
{
    let mut finished = false;
    {
        let events = frames(&mut socket);
        futures::pin_mut!(events);
        while let Some(event) = events.next().await {
            match &event {
                StreamEvent::Disconnected(reason) => {
                    warn!("Error making connection with server: {reason}")
                }
                StreamEvent::Frame(frame) => finished = frame.is_terminal(),
            }
            if tx.send(event).is_err() {
                // Nobody is listening anymore
                break;
            }
        }
    }
    if finished {
        if socket.close().await.is_err() {
            debug!("Verdict stream was not closed cleanly");
        }
    }
}

/// Owns the background task that reads the verdict stream. Dropping it tears the connection
/// down, whatever state the task is in.
pub struct Receiver {
    handle: Option<JoinHandle<()>>,
}

impl Receiver {
    pub fn spawn<S>(socket: S) -> (Receiver, mpsc::UnboundedReceiver<StreamEvent>)
    where
        S: Stream<Item = Result<tungstenite::Message, tungstenite::Error>>
            + Sink<tungstenite::Message>
            + Unpin
            + Send
            + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(receive(socket, tx));
        (
            Receiver {
                handle: Some(handle),
            },
            rx,
        )
    }

    /// Gives the receiver a moment to finish the close handshake.
    pub async fn finish(mut self) {
        if let Some(mut handle) = self.handle.take() {
            if tokio::time::timeout(CLOSE_TIMEOUT, &mut handle).await.is_err() {
                handle.abort();
            }
        }
    }
}

impl Drop for Receiver {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Pulls frames in arrival order until the verdict arrives. Progress text goes to the reporter
/// as soon as it is received.
pub async fn watch<W: Write>(
    events: &mut mpsc::UnboundedReceiver<StreamEvent>,
    idle_timeout: Option<Duration>,
    reporter: &mut Reporter<W>,
) -> Result<FinalVerdict, errors::Error> {
    loop {
        let event = match idle_timeout {
            Some(limit) => tokio::time::timeout(limit, events.recv())
                .await
                .map_err(|_| errors::StreamTimeout(limit))?,
            None => events.recv().await,
        };

        match event {
            Some(StreamEvent::Frame(Frame::Progress(text))) => reporter.progress(&text)?,
            Some(StreamEvent::Frame(Frame::Terminal(payload))) => {
                let verdict = FinalVerdict::decode(&payload)?;
                reporter.verdict(&verdict)?;
                return Ok(verdict);
            }
            Some(StreamEvent::Disconnected(reason)) => {
                return Err(errors::StreamDisconnected(reason))
            }
            None => {
                return Err(errors::StreamDisconnected(
                    "receiver stopped before the verdict arrived".to_string(),
                ))
            }
        }
    }
}

/// Follows the judging of a submission until its verdict is known.
pub async fn listen<W: Write>(
    config: &config::Config,
    submission_id: SubmissionId,
    reporter: &mut Reporter<W>,
) -> Result<FinalVerdict, errors::Error> {
    let socket = connect(config, submission_id).await?;
    let (receiver, mut events) = Receiver::spawn(socket);

    let result = watch(&mut events, config.idle_timeout(), reporter).await;
    if result.is_ok() {
        receiver.finish().await;
    }
    result
}
