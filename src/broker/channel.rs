//! Channel-backed provider that forwards invocations to an out-of-process broker bridge.
//!
//! The requesting side ([`ChannelBroker`]) and the bridge side ([`BrokerInbox`]) share a
//! bounded `mpsc` channel. Each invocation travels as a [`BrokerEnvelope`] carrying the
//! payload, the caller's cancellation token, and a `oneshot` reply slot. The broker
//! connection is treated as exclusive: an async mutex keeps at most one envelope in flight.

// crates.io
use tokio::sync::{mpsc, oneshot};
// self
use crate::{
	_prelude::*,
	broker::{BrokerCapability, BrokerFuture, BrokerPayload, RawTokenResponse},
	error::TransportError,
	request::BrokerEnvironment,
};

type Reply = Result<RawTokenResponse, TransportError>;

/// Provider that talks to a broker bridge over an in-process channel.
#[derive(Debug)]
pub struct ChannelBroker {
	sender: mpsc::Sender<BrokerEnvelope>,
	exclusive: AsyncMutex<()>,
}
impl ChannelBroker {
	/// Creates a connected provider/bridge pair.
	pub fn new(capacity: usize) -> (Self, BrokerInbox) {
		let (sender, receiver) = mpsc::channel(capacity.max(1));

		(Self { sender, exclusive: AsyncMutex::new(()) }, BrokerInbox { receiver })
	}

	/// Returns `true` once the bridge side has gone away.
	pub fn is_disconnected(&self) -> bool {
		self.sender.is_closed()
	}
}
impl BrokerCapability for ChannelBroker {
	fn can_invoke(&self, env: Option<&BrokerEnvironment>) -> bool {
		env.is_some_and(|env| env.broker_enabled) && !self.is_disconnected()
	}

	fn invoke(
		&self,
		payload: BrokerPayload,
		cancel: CancellationToken,
	) -> BrokerFuture<'_, RawTokenResponse> {
		Box::pin(async move {
			let _exclusive = tokio::select! {
				biased;
				_ = cancel.cancelled() => return Err(Error::Cancelled),
				guard = self.exclusive.lock() => guard,
			};
			let (reply, response) = oneshot::channel();
			let envelope = BrokerEnvelope { payload, cancel: cancel.clone(), reply };

			tokio::select! {
				biased;
				_ = cancel.cancelled() => return Err(Error::Cancelled),
				sent = self.sender.send(envelope) =>
					sent.map_err(|_| TransportError::BrokerDisconnected)?,
			}

			tokio::select! {
				biased;
				_ = cancel.cancelled() => Err(Error::Cancelled),
				answer = response => match answer {
					Ok(reply) => reply.map_err(Error::from),
					Err(_) => Err(TransportError::BrokerDisconnected.into()),
				},
			}
		})
	}
}

/// One invocation as seen by the broker bridge.
pub struct BrokerEnvelope {
	payload: BrokerPayload,
	cancel: CancellationToken,
	reply: oneshot::Sender<Reply>,
}
impl BrokerEnvelope {
	/// Payload built from the request.
	pub fn payload(&self) -> &BrokerPayload {
		&self.payload
	}

	/// Token that fires when the requester cancels.
	pub fn cancellation(&self) -> &CancellationToken {
		&self.cancel
	}

	/// Answers with a parsed response; returns `false` if the requester stopped waiting.
	pub fn respond(self, response: RawTokenResponse) -> bool {
		self.reply.send(Ok(response)).is_ok()
	}

	/// Answers with the broker's JSON; malformed JSON reaches the requester as
	/// [`TransportError::MalformedResponse`].
	pub fn respond_json(self, json: &str) -> bool {
		self.reply.send(RawTokenResponse::from_json(json)).is_ok()
	}
}
impl Debug for BrokerEnvelope {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BrokerEnvelope")
			.field("payload", &self.payload)
			.field("cancelled", &self.cancel.is_cancelled())
			.finish()
	}
}

/// Bridge-side receiver for [`BrokerEnvelope`]s.
#[derive(Debug)]
pub struct BrokerInbox {
	receiver: mpsc::Receiver<BrokerEnvelope>,
}
impl BrokerInbox {
	/// Waits for the next envelope; `None` once every provider handle is dropped.
	pub async fn recv(&mut self) -> Option<BrokerEnvelope> {
		self.receiver.recv().await
	}

	/// Stops accepting envelopes; providers report `can_invoke == false` afterwards.
	pub fn close(&mut self) {
		self.receiver.close();
	}

	/// Answers envelopes with `handler` until every provider handle is dropped.
	///
	/// A handler still running when its requester cancels is dropped and the envelope is
	/// discarded without a reply.
	pub async fn serve<F, Fut>(mut self, mut handler: F)
	where
		F: FnMut(BrokerPayload) -> Fut,
		Fut: Future<Output = RawTokenResponse>,
	{
		while let Some(envelope) = self.recv().await {
			let cancel = envelope.cancel.clone();
			let answer = tokio::select! {
				biased;
				_ = cancel.cancelled() => None,
				answer = handler(envelope.payload.clone()) => Some(answer),
			};

			if let Some(answer) = answer {
				envelope.respond(answer);
			}
		}
	}
}
