//! One payer's attempt at settling a payment link.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use paylink_registry::PaylinkConfig;
use paylink_types::{AccountId, Amount, Timestamp, TransactionResult};
use paylink_utils::format_time_remaining;
use paylink_wallet_core::{
    build_payment_transaction, connect_wallet, PaymentContext, PaymentError, PaymentIntent,
    SettlementVerifier, WalletBridge,
};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::CheckoutError;
use crate::hooks::{Notification, PaymentCompleted, PaymentNotifier, SettlementSink};
use crate::state::{InvalidTransition, PaymentEvent, PaymentUiState};

/// The payment link being paid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub link_id: String,
    pub recipient: AccountId,
    pub amount: Amount,
    pub asset_symbol: String,
    /// Shown to the payer and carried as the transaction memo.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
}

/// Confirmation polling after a successful submission, and the period of
/// the expiry watch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSettings {
    pub confirm_attempts: u32,
    pub confirm_interval: Duration,
    pub expiry_tick: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            confirm_attempts: 5,
            confirm_interval: Duration::from_secs(2),
            expiry_tick: Duration::from_secs(1),
        }
    }
}

impl SessionSettings {
    pub fn from_config(config: &PaylinkConfig) -> Self {
        Self {
            confirm_attempts: config.confirm_attempts,
            confirm_interval: config.confirm_interval(),
            expiry_tick: config.expiry_tick(),
        }
    }
}

/// Drives a [`PaymentRequest`] through the wallet, the network and the
/// ledger, publishing every state change to subscribers.
///
/// The state lives behind a mutex shared with the expiry watch. It is never
/// held across an await: each step runs unlocked, then its outcome is
/// applied in one short critical section. Once the state is `Expired`, any
/// step still in flight is abandoned and its outcome dropped.
pub struct PaymentSession {
    ctx: PaymentContext,
    request: PaymentRequest,
    bridge: Arc<dyn WalletBridge>,
    verifier: SettlementVerifier,
    settings: SessionSettings,
    state: Mutex<PaymentUiState>,
    updates: watch::Sender<PaymentUiState>,
    sink: Option<Arc<dyn SettlementSink>>,
    notifier: Option<Arc<dyn PaymentNotifier>>,
}

impl PaymentSession {
    pub fn new(ctx: PaymentContext, bridge: Arc<dyn WalletBridge>, request: PaymentRequest) -> Self {
        let verifier = SettlementVerifier::new(ctx.network.clone());
        let (updates, _) = watch::channel(PaymentUiState::Pending);
        Self {
            ctx,
            request,
            bridge,
            verifier,
            settings: SessionSettings::default(),
            state: Mutex::new(PaymentUiState::Pending),
            updates,
            sink: None,
            notifier: None,
        }
    }

    pub fn with_settings(mut self, settings: SessionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_settlement_sink(mut self, sink: Arc<dyn SettlementSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn PaymentNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn request(&self) -> &PaymentRequest {
        &self.request
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> PaymentUiState {
        self.lock().clone()
    }

    /// Receiver that sees every state change from now on.
    pub fn subscribe(&self) -> watch::Receiver<PaymentUiState> {
        self.updates.subscribe()
    }

    /// Countdown text for the link deadline, if it has one.
    pub fn time_remaining(&self, now: Timestamp) -> Option<String> {
        self.request
            .expires_at
            .map(|deadline| format_time_remaining(deadline, now))
    }

    /// Discover the wallet and obtain the payer's address.
    ///
    /// On failure the session stays `Pending` and the caller decides how to
    /// present the wallet error.
    pub async fn connect(&self) -> Result<AccountId, CheckoutError> {
        let address = self
            .until_expired(connect_wallet(self.bridge.as_ref()))
            .await?
            .map_err(PaymentError::from)?;
        self.transition(PaymentEvent::WalletConnected(address.clone()))?;
        Ok(address)
    }

    /// Build, sign, submit and confirm the payment.
    ///
    /// Returns the state the attempt ended in, `Completed` or `Failed`.
    /// Errors only when the session cannot pay from its current state or
    /// the link expired mid-flight.
    pub async fn pay(&self) -> Result<PaymentUiState, CheckoutError> {
        let payer = match self.transition(PaymentEvent::PayClicked)? {
            PaymentUiState::Signing { wallet } => wallet,
            other => {
                return Err(InvalidTransition {
                    from: other.name(),
                    event: PaymentEvent::PayClicked.name(),
                }
                .into())
            }
        };

        match self.run_payment(payer).await {
            Ok(state) => {
                if let PaymentUiState::Completed { result, .. } = &state {
                    self.settle(&result.hash).await;
                }
                Ok(state)
            }
            Err(CheckoutError::Payment(error)) => {
                tracing::warn!(
                    link_id = %self.request.link_id,
                    category = ?error.category(),
                    error = %error,
                    "payment attempt failed"
                );
                self.transition(PaymentEvent::StepFailed(error.user_message()))
            }
            Err(other) => Err(other),
        }
    }

    /// Return a failed attempt to `Connected` so the payer can try again.
    pub fn retry(&self) -> Result<PaymentUiState, CheckoutError> {
        self.transition(PaymentEvent::Retry)
    }

    /// Expire the session if the link deadline has passed at `now`.
    pub fn tick(&self, now: Timestamp) -> PaymentUiState {
        let mut state = self.lock();
        let deadline_passed = self
            .request
            .expires_at
            .is_some_and(|deadline| deadline.has_passed(now));
        if deadline_passed && state.can_expire() {
            tracing::info!(
                link_id = %self.request.link_id,
                from = %*state,
                "payment link expired"
            );
            *state = PaymentUiState::Expired;
            self.updates.send_replace(PaymentUiState::Expired);
        }
        state.clone()
    }

    async fn run_payment(&self, payer: AccountId) -> Result<PaymentUiState, CheckoutError> {
        let mut intent = PaymentIntent::new(
            payer,
            self.request.recipient.clone(),
            self.request.amount,
            self.request.asset_symbol.clone(),
        );
        intent.memo = self.request.description.clone();

        let envelope = self
            .until_expired(build_payment_transaction(&self.ctx, &intent))
            .await??;

        let passphrase = &self.ctx.config.network_passphrase;
        let signed = self
            .until_expired(self.bridge.request_signature(&envelope, passphrase))
            .await?
            .map_err(PaymentError::from)?;
        self.transition(PaymentEvent::SignatureObtained)?;

        let submitted = self
            .until_expired(self.bridge.submit(&signed))
            .await?
            .map_err(PaymentError::from)?;
        self.transition(PaymentEvent::NetworkAccepted {
            hash: submitted.hash.clone(),
        })?;

        let confirmed = self.until_expired(self.confirm(submitted)).await?;
        self.transition(PaymentEvent::LedgerConfirmed(confirmed))
    }

    /// Poll the verifier for the submitted hash. When the ledger never
    /// reports it within the configured attempts, the submission result
    /// stands.
    async fn confirm(&self, submitted: TransactionResult) -> TransactionResult {
        for attempt in 0..self.settings.confirm_attempts {
            if attempt > 0 {
                tokio::time::sleep(self.settings.confirm_interval).await;
            }
            if let Some(result) = self.verifier.transaction_status(&submitted.hash).await {
                return result;
            }
        }
        tracing::debug!(
            hash = %submitted.hash,
            attempts = self.settings.confirm_attempts,
            "confirmation lookups exhausted, using submission result"
        );
        submitted
    }

    /// Run `step` unless the session expires first.
    async fn until_expired<T>(&self, step: impl Future<Output = T>) -> Result<T, CheckoutError> {
        let mut updates = self.updates.subscribe();
        let expired = async move { updates.wait_for(PaymentUiState::is_expired).await.is_ok() };
        tokio::select! {
            biased;
            true = expired => Err(CheckoutError::Expired),
            output = step => Ok(output),
        }
    }

    fn transition(&self, event: PaymentEvent) -> Result<PaymentUiState, CheckoutError> {
        let mut state = self.lock();
        if state.is_expired() {
            return Err(CheckoutError::Expired);
        }
        let event_name = event.name();
        let next = state.apply(event)?;
        tracing::debug!(
            link_id = %self.request.link_id,
            from = %*state,
            to = %next,
            event = event_name,
            "payment state transition"
        );
        *state = next.clone();
        self.updates.send_replace(next.clone());
        Ok(next)
    }

    /// Tell the collaborators about a settled payment. Failures are logged
    /// and never undo the payment.
    async fn settle(&self, tx_hash: &str) {
        let link_id = &self.request.link_id;
        tracing::info!(link_id = %link_id, hash = tx_hash, "payment completed");

        if let Some(sink) = &self.sink {
            if let Err(e) = sink.mark_settled(link_id, tx_hash).await {
                tracing::warn!(link_id = %link_id, error = %e, "failed to mark link settled");
            }
        }
        if let Some(notifier) = &self.notifier {
            let notification = Notification::payment_completed(PaymentCompleted {
                link_id: link_id.clone(),
                amount: self.request.amount,
                currency: self.request.asset_symbol.clone(),
                tx_hash: tx_hash.to_string(),
            });
            if let Err(e) = notifier.notify(&notification).await {
                tracing::warn!(link_id = %link_id, error = %e, "payment notification failed");
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, PaymentUiState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for PaymentSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentSession")
            .field("link_id", &self.request.link_id)
            .field("state", &self.state().name())
            .finish()
    }
}
