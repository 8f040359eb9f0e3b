// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::auth::Identity;
use crate::growth::{Projection, compute_projection};
use crate::metrics::{Totals, compute_totals};
use crate::models::{
    PricingTier, RevenueSettings, Transaction, TransactionDraft, TransactionPatch,
};
use crate::remote::RemoteStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Unauthenticated,
    Hydrating,
    Ready,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    SignedIn(Identity),
    HydrationComplete,
    SignedOut,
}

/// Pure phase transition. `Hydrating` is only ever entered through a fresh
/// sign-in; every unlisted pairing leaves the phase unchanged.
pub fn next_phase(phase: SessionPhase, event: &SessionEvent) -> SessionPhase {
    match (phase, event) {
        (SessionPhase::Unauthenticated, SessionEvent::SignedIn(_)) => SessionPhase::Hydrating,
        (SessionPhase::Hydrating, SessionEvent::HydrationComplete) => SessionPhase::Ready,
        (SessionPhase::Ready, SessionEvent::SignedOut) => SessionPhase::Unauthenticated,
        (phase, _) => phase,
    }
}

/// Explicit session context: the current identity plus the in-memory
/// snapshot of the remote-backed state. Owned by the caller and passed to
/// every controller operation; there is no ambient store.
#[derive(Debug, Default)]
pub struct Session {
    identity: Option<Identity>,
    phase: SessionPhase,
    transactions: Vec<Transaction>,
    settings: RevenueSettings,
    tiers: Vec<PricingTier>,
}

impl Default for SessionPhase {
    fn default() -> Self {
        SessionPhase::Unauthenticated
    }
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    /// Apply an event: phase transition plus the associated state effect.
    /// Sign-out clears all in-memory state unconditionally.
    pub fn apply(&mut self, event: SessionEvent) {
        self.phase = next_phase(self.phase, &event);
        match event {
            SessionEvent::SignedIn(identity) => {
                self.identity = Some(identity);
            }
            SessionEvent::HydrationComplete => {}
            SessionEvent::SignedOut => {
                self.identity = None;
                self.transactions.clear();
                self.settings = RevenueSettings::default();
                self.tiers.clear();
            }
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn settings(&self) -> RevenueSettings {
        self.settings
    }

    pub fn tiers(&self) -> &[PricingTier] {
        &self.tiers
    }

    pub fn totals(&self) -> Totals {
        compute_totals(&self.transactions, self.settings.baseline)
    }

    /// Goal projection against the full current revenue, baseline included.
    pub fn projection(&self) -> Projection {
        let totals = self.totals();
        compute_projection(totals.total_revenue, self.settings.target, &self.tiers)
    }

    /// A completed remote call only applies if the session still belongs to
    /// the identity it was issued for.
    fn is_current(&self, user_id: &str) -> bool {
        self.identity.as_ref().is_some_and(|i| i.id == user_id)
    }
}

/// Executes remote effects and reconciles their outcomes into the session.
/// Local state never diverges from a failed remote write: on any store
/// error the corresponding local mutation is skipped and the failure is
/// logged, not raised.
pub struct SyncController<S> {
    store: S,
}

impl<S: RemoteStore> SyncController<S> {
    pub fn new(store: S) -> Self {
        SyncController { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Session start: apply the sign-in, then fetch transactions, settings,
    /// and tiers concurrently. Hydration is best effort; a failed fetch
    /// defaults its slice (empty list, zero settings) and the session still
    /// reaches `Ready`.
    pub async fn hydrate(&self, session: &mut Session, identity: Identity) {
        session.apply(SessionEvent::SignedIn(identity));
        let Some(user_id) = session.identity.as_ref().map(|i| i.id.clone()) else {
            return;
        };

        let (transactions, settings, tiers) = tokio::join!(
            self.store.list_transactions(&user_id),
            self.store.fetch_settings(&user_id),
            self.store.list_tiers(&user_id),
        );

        session.transactions = transactions.unwrap_or_else(|err| {
            warn!(error = %err, "transaction hydration failed, starting empty");
            Vec::new()
        });
        session.settings = settings
            .unwrap_or_else(|err| {
                warn!(error = %err, "settings hydration failed, using defaults");
                None
            })
            .unwrap_or_default();
        session.tiers = tiers.unwrap_or_else(|err| {
            warn!(error = %err, "tier hydration failed, starting empty");
            Vec::new()
        });
        debug!(
            transactions = session.transactions.len(),
            tiers = session.tiers.len(),
            "session hydrated"
        );

        session.apply(SessionEvent::HydrationComplete);
    }

    /// Session end. The remote token revocation, if any, is the identity
    /// collaborator's concern; in-memory state is cleared regardless.
    pub fn sign_out(&self, session: &mut Session) {
        session.apply(SessionEvent::SignedOut);
    }

    /// Returns true when the entry was persisted and added to the local
    /// ledger. Invalid drafts are rejected before any remote call.
    pub async fn add_transaction(&self, session: &mut Session, draft: TransactionDraft) -> bool {
        let Some(user_id) = session.identity.as_ref().map(|i| i.id.clone()) else {
            return false;
        };
        if draft.description.trim().is_empty() {
            debug!("rejected entry with empty description");
            return false;
        }

        match self.store.create_transaction(&user_id, &draft).await {
            Ok(created) => {
                if !session.is_current(&user_id) {
                    return false;
                }
                session.transactions.insert(0, created);
                true
            }
            Err(err) => {
                warn!(error = %err, "create failed, ledger unchanged");
                false
            }
        }
    }

    /// Sends the partial update, then merges the same patch into the local
    /// record matched by id. On failure the local record stays stale but
    /// consistent with the store.
    pub async fn update_transaction(
        &self,
        session: &mut Session,
        id: &str,
        patch: TransactionPatch,
    ) -> bool {
        let Some(user_id) = session.identity.as_ref().map(|i| i.id.clone()) else {
            return false;
        };
        if patch.is_empty() {
            debug!(id, "rejected empty update");
            return false;
        }

        match self.store.update_transaction(id, &patch).await {
            Ok(()) => {
                if !session.is_current(&user_id) {
                    return false;
                }
                match session.transactions.iter_mut().find(|t| t.id == id) {
                    Some(tx) => {
                        patch.apply_to(tx);
                        true
                    }
                    None => {
                        debug!(id, "updated record not present locally");
                        false
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, id, "update failed, record unchanged");
                false
            }
        }
    }

    pub async fn delete_transaction(&self, session: &mut Session, id: &str) -> bool {
        let Some(user_id) = session.identity.as_ref().map(|i| i.id.clone()) else {
            return false;
        };

        match self.store.delete_transaction(id).await {
            Ok(()) => {
                if !session.is_current(&user_id) {
                    return false;
                }
                let before = session.transactions.len();
                session.transactions.retain(|t| t.id != id);
                session.transactions.len() < before
            }
            Err(err) => {
                warn!(error = %err, id, "delete failed, record retained");
                false
            }
        }
    }

    /// Upsert keyed by identity; the local settings are replaced only once
    /// the remote write succeeded.
    pub async fn update_settings(
        &self,
        session: &mut Session,
        baseline: Decimal,
        target: Decimal,
    ) -> bool {
        let Some(user_id) = session.identity.as_ref().map(|i| i.id.clone()) else {
            return false;
        };
        let settings = RevenueSettings { baseline, target };

        match self.store.upsert_settings(&user_id, &settings).await {
            Ok(()) => {
                if !session.is_current(&user_id) {
                    return false;
                }
                session.settings = settings;
                true
            }
            Err(err) => {
                warn!(error = %err, "settings upsert failed, keeping previous values");
                false
            }
        }
    }

    /// Destructive replace: the remote tier set is deleted, then the new
    /// set inserted. A failure between the two leaves the remote set empty
    /// until the next successful sync.
    pub async fn sync_tiers(&self, session: &mut Session, tiers: Vec<PricingTier>) -> bool {
        let Some(user_id) = session.identity.as_ref().map(|i| i.id.clone()) else {
            return false;
        };

        if let Err(err) = self.store.delete_tiers(&user_id).await {
            warn!(error = %err, "tier sync aborted, remote set untouched");
            return false;
        }
        if !tiers.is_empty() {
            if let Err(err) = self.store.insert_tiers(&user_id, &tiers).await {
                warn!(error = %err, "tier insert failed, remote set left empty");
                return false;
            }
        }
        if !session.is_current(&user_id) {
            return false;
        }
        session.tiers = tiers;
        true
    }
}
