//! Line-delimited JSON request/reply over an actor process's standard streams.
//!
//! [`ActorChannel`] owns one child process. Requests are written to its stdin
//! as one JSON value per line; replies are read from its stdout the same way,
//! and stderr is forwarded to `tracing` under the `arena::actor` target.
//!
//! Every reply-expecting request takes the next request id and parks a waiter
//! under it. Reply lines are numbered in arrival order and handed to the
//! waiter with the same number, so the n-th reply always answers the n-th
//! request. A line that fails to decode, or that has no waiter, is a protocol
//! violation and kills the channel, as does a reply whose caller stopped
//! waiting or a line longer than [`MAX_LINE_BYTES`]. Timeouts kill the
//! channel too. Once killed, a channel stays killed.
mod command;
mod failure;

pub use command::ActorCommand;
pub use failure::ChannelFailure;

use std::collections::BTreeMap;
use std::io;
use std::process::Stdio;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::oneshot;
use tokio::task::AbortHandle;
use tokio::time;

/// Longest reply line accepted from an actor, line terminator included.
pub const MAX_LINE_BYTES: usize = 1 << 20;

/// Connection to one running actor process.
///
/// Dropping the channel kills the process.
pub struct ActorChannel {
    shared: Arc<Shared>,
}

struct Shared {
    label: String,
    pid: Option<u32>,
    state: Mutex<ChannelState>,
    stdin: tokio::sync::Mutex<Option<ChildStdin>>,
}

struct ChannelState {
    connected: bool,
    failure: Option<ChannelFailure>,
    child: Option<Child>,
    pending: BTreeMap<u64, oneshot::Sender<Value>>,
    next_request: u64,
    next_reply: u64,
    tasks: Vec<AbortHandle>,
}

impl ActorChannel {
    /// Starts `command` with all three standard streams piped.
    ///
    /// Must be called from within a Tokio runtime: the stdout reader and the
    /// stderr forwarder run as background tasks.
    pub fn launch(command: &ActorCommand) -> io::Result<Self> {
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let pid = child.id();
        let stdin = child.stdin.take();
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("actor stdout was not captured"))?;
        let stderr = child.stderr.take();

        let shared = Arc::new(Shared {
            label: command.to_string(),
            pid,
            state: Mutex::new(ChannelState {
                connected: true,
                failure: None,
                child: Some(child),
                pending: BTreeMap::new(),
                next_request: 0,
                next_reply: 0,
                tasks: Vec::with_capacity(2),
            }),
            stdin: tokio::sync::Mutex::new(stdin),
        });

        let mut tasks = vec![tokio::spawn(read_replies(Arc::clone(&shared), stdout)).abort_handle()];
        if let Some(stderr) = stderr {
            tasks.push(tokio::spawn(forward_diagnostics(pid, stderr)).abort_handle());
        }
        shared.state().tasks.extend(tasks);

        tracing::debug!(pid = ?pid, command = %shared.label, "actor launched");
        Ok(Self { shared })
    }

    pub fn pid(&self) -> Option<u32> {
        self.shared.pid
    }

    pub fn is_connected(&self) -> bool {
        self.shared.state().connected
    }

    /// The failure that disconnected the channel, if any.
    pub fn failure(&self) -> Option<ChannelFailure> {
        self.shared.state().failure.clone()
    }

    /// Sends `payload` and waits up to `timeout` for its reply.
    ///
    /// Any failure other than an encoding error kills the channel: a timeout,
    /// a broken pipe, a malformed or unexpected line, or the process exiting.
    pub async fn call<T>(&self, payload: &T, timeout: Duration) -> Result<Value, ChannelFailure>
    where
        T: Serialize + ?Sized,
    {
        let line = encode_line(payload)?;
        let exchange = async {
            let waiter = self
                .shared
                .submit(&line, true)
                .await?
                .ok_or(ChannelFailure::Killed)?;
            waiter
                .await
                .map_err(|_| self.failure().unwrap_or(ChannelFailure::Killed))
        };

        match time::timeout(timeout, exchange).await {
            Ok(result) => result,
            Err(_) => {
                self.shared.kill(ChannelFailure::Timeout);
                Err(ChannelFailure::Timeout)
            }
        }
    }

    /// Sends `payload` without waiting for a reply.
    pub async fn notify<T>(&self, payload: &T) -> Result<(), ChannelFailure>
    where
        T: Serialize + ?Sized,
    {
        let line = encode_line(payload)?;
        self.shared.submit(&line, false).await.map(|_| ())
    }

    /// Sends `payload`, resolving to `default` on every failure path.
    ///
    /// With `expect_reply == false` the call returns `default` as soon as the
    /// line is written.
    pub async fn send<T>(
        &self,
        payload: &T,
        expect_reply: bool,
        timeout: Duration,
        default: Value,
    ) -> Value
    where
        T: Serialize + ?Sized,
    {
        let result = if expect_reply {
            self.call(payload, timeout).await
        } else {
            self.notify(payload).await.map(|()| Value::Null)
        };

        match result {
            Ok(value) if expect_reply => value,
            Ok(_) => default,
            Err(failure) => {
                tracing::debug!(pid = ?self.pid(), %failure, "actor call fell back to default");
                default
            }
        }
    }

    /// Terminates the process and fails every pending call. Idempotent; only
    /// the first recorded cause is kept.
    pub fn kill(&self, cause: ChannelFailure) {
        self.shared.kill(cause);
    }
}

impl Drop for ActorChannel {
    fn drop(&mut self) {
        self.shared.kill(ChannelFailure::Killed);
    }
}

impl std::fmt::Debug for ActorChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorChannel")
            .field("command", &self.shared.label)
            .field("pid", &self.shared.pid)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, ChannelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Writes one line, registering a waiter first when a reply is expected.
    ///
    /// The stdin lock is held from id assignment until the line is flushed so
    /// request ids follow write order.
    async fn submit(
        &self,
        line: &[u8],
        expect_reply: bool,
    ) -> Result<Option<oneshot::Receiver<Value>>, ChannelFailure> {
        let mut stdin = self.stdin.lock().await;

        let waiter = {
            let mut state = self.state();
            if !state.connected {
                return Err(ChannelFailure::NotConnected);
            }
            expect_reply.then(|| {
                let (tx, rx) = oneshot::channel();
                let id = state.next_request;
                state.next_request += 1;
                state.pending.insert(id, tx);
                rx
            })
        };

        let Some(writer) = stdin.as_mut() else {
            return Err(ChannelFailure::NotConnected);
        };
        let written = async {
            writer.write_all(line).await?;
            writer.flush().await
        }
        .await;

        if let Err(err) = written {
            let failure = ChannelFailure::from(err);
            drop(stdin);
            self.kill(failure.clone());
            return Err(failure);
        }
        Ok(waiter)
    }

    /// Decodes one reply line and hands it to the waiter with the same number.
    fn deliver(&self, raw: &[u8]) -> Result<(), ChannelFailure> {
        let text = std::str::from_utf8(strip_line_ending(raw))
            .map_err(ChannelFailure::InvalidEncoding)?;
        let value: Value = serde_json::from_str(text)
            .map_err(|err| ChannelFailure::InvalidJson(err.to_string()))?;

        let (id, waiter) = {
            let mut state = self.state();
            let id = state.next_reply;
            state.next_reply += 1;
            let waiter = state
                .pending
                .remove(&id)
                .ok_or(ChannelFailure::UnexpectedReply(id))?;
            (id, waiter)
        };
        // Timed-out callers clear `pending` when they kill the channel, so a
        // closed receiver here means the call future was dropped.
        waiter
            .send(value)
            .map_err(|_| ChannelFailure::Abandoned(id))
    }

    fn kill(&self, cause: ChannelFailure) {
        let (child, tasks, pending) = {
            let mut state = self.state();
            if !state.connected {
                return;
            }
            state.connected = false;
            let recorded = state.failure.get_or_insert(cause);
            match recorded {
                ChannelFailure::Killed => {
                    tracing::debug!(pid = ?self.pid, command = %self.label, "actor killed");
                }
                failure => {
                    tracing::warn!(pid = ?self.pid, command = %self.label, %failure, "actor disconnected");
                }
            }
            (
                state.child.take(),
                std::mem::take(&mut state.tasks),
                std::mem::take(&mut state.pending),
            )
        };

        // Dropping the senders wakes every waiter with a failure.
        drop(pending);
        if let Some(mut child) = child
            && let Err(err) = child.start_kill()
        {
            tracing::debug!(pid = ?self.pid, error = %err, "actor already exited");
        }
        if let Ok(mut stdin) = self.stdin.try_lock() {
            stdin.take();
        }
        for task in tasks {
            task.abort();
        }
    }
}

async fn read_replies(shared: Arc<Shared>, stdout: ChildStdout) {
    let mut reader = BufReader::new(stdout);
    let mut line = Vec::new();
    loop {
        line.clear();
        let read = (&mut reader)
            .take(MAX_LINE_BYTES as u64)
            .read_until(b'\n', &mut line)
            .await;
        let failure = match read {
            Ok(0) => ChannelFailure::Closed,
            Ok(n) if n == MAX_LINE_BYTES && line.last() != Some(&b'\n') => {
                ChannelFailure::LineTooLong(MAX_LINE_BYTES)
            }
            Ok(_) => match shared.deliver(&line) {
                Ok(()) => continue,
                Err(failure) => failure,
            },
            Err(err) => ChannelFailure::from(err),
        };
        shared.kill(failure);
        return;
    }
}

async fn forward_diagnostics<R>(pid: Option<u32>, stream: R)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) | Err(_) => return,
            Ok(_) => {
                if let Ok(text) = std::str::from_utf8(strip_line_ending(&line)) {
                    tracing::info!(target: "arena::actor", pid = ?pid, "{text}");
                }
            }
        }
    }
}

fn encode_line<T>(payload: &T) -> Result<Vec<u8>, ChannelFailure>
where
    T: Serialize + ?Sized,
{
    let mut line = serde_json::to_vec(payload)?;
    line.push(b'\n');
    Ok(line)
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
