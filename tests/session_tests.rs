// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use burnrate::auth::Identity;
use burnrate::models::{
    AccountContext, Category, PricingTier, RevenueSettings, Transaction, TransactionDraft,
    TransactionKind, TransactionPatch, TransactionStatus,
};
use burnrate::remote::{RemoteStore, StoreError};
use burnrate::session::{Session, SessionEvent, SessionPhase, SyncController, next_phase};

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn identity() -> Identity {
    Identity {
        id: "user-1".to_string(),
        email: "founder@example.com".to_string(),
        display_name: None,
    }
}

fn tx(id: &str, kind: TransactionKind, amount: &str) -> Transaction {
    Transaction {
        id: id.to_string(),
        amount: dec(amount),
        kind,
        category: Category::Software,
        description: format!("entry {}", id),
        occurred_at: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
        account_context: AccountContext::Business,
        is_recurring: false,
        status: TransactionStatus::Completed,
    }
}

fn draft(description: &str, amount: &str) -> TransactionDraft {
    TransactionDraft {
        amount: dec(amount),
        kind: TransactionKind::Expense,
        category: Category::Software,
        description: description.to_string(),
        occurred_at: NaiveDate::from_ymd_opt(2025, 8, 2).unwrap(),
        account_context: AccountContext::Business,
        is_recurring: false,
    }
}

fn boom() -> StoreError {
    StoreError::Api {
        status: 500,
        message: "boom".to_string(),
    }
}

/// In-memory stand-in for the hosted store, with per-operation failure
/// switches and a call counter.
#[derive(Default)]
struct FakeStore {
    transactions: Mutex<Vec<Transaction>>,
    settings: Mutex<Option<RevenueSettings>>,
    tiers: Mutex<Vec<PricingTier>>,
    calls: AtomicUsize,
    next_id: AtomicUsize,
    fail_create: bool,
    fail_update: bool,
    fail_delete: bool,
    fail_settings_fetch: bool,
    fail_settings_upsert: bool,
    fail_tier_insert: bool,
}

impl FakeStore {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteStore for FakeStore {
    async fn list_transactions(&self, _user_id: &str) -> Result<Vec<Transaction>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.transactions.lock().unwrap().clone())
    }

    async fn create_transaction(
        &self,
        _user_id: &str,
        draft: &TransactionDraft,
    ) -> Result<Transaction, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create {
            return Err(boom());
        }
        let id = format!("srv-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let created = Transaction {
            id,
            amount: draft.amount,
            kind: draft.kind,
            category: draft.category,
            description: draft.description.clone(),
            occurred_at: draft.occurred_at,
            account_context: draft.account_context,
            is_recurring: draft.is_recurring,
            status: TransactionStatus::Completed,
        };
        self.transactions.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_transaction(
        &self,
        id: &str,
        patch: &TransactionPatch,
    ) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_update {
            return Err(boom());
        }
        let mut transactions = self.transactions.lock().unwrap();
        if let Some(stored) = transactions.iter_mut().find(|t| t.id == id) {
            patch.apply_to(stored);
        }
        Ok(())
    }

    async fn delete_transaction(&self, id: &str) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete {
            return Err(boom());
        }
        self.transactions.lock().unwrap().retain(|t| t.id != id);
        Ok(())
    }

    async fn fetch_settings(&self, _user_id: &str) -> Result<Option<RevenueSettings>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_settings_fetch {
            return Err(boom());
        }
        Ok(*self.settings.lock().unwrap())
    }

    async fn upsert_settings(
        &self,
        _user_id: &str,
        settings: &RevenueSettings,
    ) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_settings_upsert {
            return Err(boom());
        }
        *self.settings.lock().unwrap() = Some(*settings);
        Ok(())
    }

    async fn list_tiers(&self, _user_id: &str) -> Result<Vec<PricingTier>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.tiers.lock().unwrap().clone())
    }

    async fn delete_tiers(&self, _user_id: &str) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tiers.lock().unwrap().clear();
        Ok(())
    }

    async fn insert_tiers(
        &self,
        _user_id: &str,
        tiers: &[PricingTier],
    ) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_tier_insert {
            return Err(boom());
        }
        self.tiers.lock().unwrap().extend_from_slice(tiers);
        Ok(())
    }
}

async fn ready(store: FakeStore) -> (SyncController<FakeStore>, Session) {
    let controller = SyncController::new(store);
    let mut session = Session::new();
    controller.hydrate(&mut session, identity()).await;
    (controller, session)
}

#[test]
fn phase_transitions_are_exhaustive() {
    let signed_in = SessionEvent::SignedIn(identity());
    assert_eq!(
        next_phase(SessionPhase::Unauthenticated, &signed_in),
        SessionPhase::Hydrating
    );
    assert_eq!(
        next_phase(SessionPhase::Hydrating, &SessionEvent::HydrationComplete),
        SessionPhase::Ready
    );
    assert_eq!(
        next_phase(SessionPhase::Ready, &SessionEvent::SignedOut),
        SessionPhase::Unauthenticated
    );
    // No other transitions exist.
    assert_eq!(
        next_phase(SessionPhase::Ready, &signed_in),
        SessionPhase::Ready
    );
    assert_eq!(
        next_phase(SessionPhase::Hydrating, &signed_in),
        SessionPhase::Hydrating
    );
    assert_eq!(
        next_phase(SessionPhase::Unauthenticated, &SessionEvent::HydrationComplete),
        SessionPhase::Unauthenticated
    );
}

#[tokio::test]
async fn hydration_loads_all_three_slices() {
    let store = FakeStore::default();
    store
        .transactions
        .lock()
        .unwrap()
        .push(tx("a", TransactionKind::Income, "1500"));
    *store.settings.lock().unwrap() = Some(RevenueSettings {
        baseline: dec("1000"),
        target: dec("5000"),
    });
    store.tiers.lock().unwrap().push(PricingTier {
        id: "t1".to_string(),
        price: dec("99"),
    });

    let (_controller, session) = ready(store).await;
    assert_eq!(session.phase(), SessionPhase::Ready);
    assert_eq!(session.transactions().len(), 1);
    assert_eq!(session.settings().baseline, dec("1000"));
    assert_eq!(session.tiers().len(), 1);
}

#[tokio::test]
async fn partial_hydration_defaults_the_failed_slice() {
    let store = FakeStore {
        fail_settings_fetch: true,
        ..FakeStore::default()
    };
    store
        .transactions
        .lock()
        .unwrap()
        .push(tx("a", TransactionKind::Expense, "240"));

    let (_controller, session) = ready(store).await;
    assert_eq!(session.phase(), SessionPhase::Ready);
    assert_eq!(session.settings(), RevenueSettings::default());
    assert_eq!(session.transactions().len(), 1);
}

#[tokio::test]
async fn empty_description_is_rejected_before_any_remote_call() {
    let (controller, mut session) = ready(FakeStore::default()).await;
    let hydration_calls = controller_calls(&controller);

    let applied = controller
        .add_transaction(&mut session, draft("   ", "10"))
        .await;
    assert!(!applied);
    assert_eq!(session.transactions().len(), 0);
    assert_eq!(controller_calls(&controller), hydration_calls);
}

#[tokio::test]
async fn failed_remote_add_leaves_ledger_unchanged() {
    let store = FakeStore {
        fail_create: true,
        ..FakeStore::default()
    };
    let (controller, mut session) = ready(store).await;

    let applied = controller
        .add_transaction(&mut session, draft("ElevenLabs", "24"))
        .await;
    assert!(!applied);
    assert_eq!(session.transactions().len(), 0);
}

#[tokio::test]
async fn successful_add_prepends_the_server_record() {
    let store = FakeStore::default();
    store
        .transactions
        .lock()
        .unwrap()
        .push(tx("old", TransactionKind::Expense, "5"));
    let (controller, mut session) = ready(store).await;

    let applied = controller
        .add_transaction(&mut session, draft("Vercel", "17"))
        .await;
    assert!(applied);
    assert_eq!(session.transactions().len(), 2);
    assert_eq!(session.transactions()[0].id, "srv-0");
    assert_eq!(session.transactions()[0].description, "Vercel");
    assert_eq!(session.transactions()[0].status, TransactionStatus::Completed);
    assert_eq!(session.transactions()[1].id, "old");
}

#[tokio::test]
async fn successful_update_merges_only_patched_fields() {
    let store = FakeStore::default();
    store
        .transactions
        .lock()
        .unwrap()
        .push(tx("x", TransactionKind::Expense, "10"));
    let (controller, mut session) = ready(store).await;

    let patch = TransactionPatch {
        amount: Some(dec("25")),
        ..TransactionPatch::default()
    };
    let applied = controller.update_transaction(&mut session, "x", patch).await;
    assert!(applied);

    let record = &session.transactions()[0];
    assert_eq!(record.amount, dec("25"));
    assert_eq!(record.description, "entry x");
    assert_eq!(record.kind, TransactionKind::Expense);
    assert_eq!(record.account_context, AccountContext::Business);
}

#[tokio::test]
async fn failed_update_keeps_the_local_record_stale_but_consistent() {
    let store = FakeStore {
        fail_update: true,
        ..FakeStore::default()
    };
    store
        .transactions
        .lock()
        .unwrap()
        .push(tx("x", TransactionKind::Expense, "10"));
    let (controller, mut session) = ready(store).await;

    let patch = TransactionPatch {
        amount: Some(dec("25")),
        ..TransactionPatch::default()
    };
    let applied = controller.update_transaction(&mut session, "x", patch).await;
    assert!(!applied);
    assert_eq!(session.transactions()[0].amount, dec("10"));
}

#[tokio::test]
async fn delete_removes_only_on_success() {
    let store = FakeStore::default();
    store
        .transactions
        .lock()
        .unwrap()
        .push(tx("x", TransactionKind::Expense, "10"));
    let (controller, mut session) = ready(store).await;

    assert!(controller.delete_transaction(&mut session, "x").await);
    assert!(session.transactions().is_empty());
}

#[tokio::test]
async fn failed_delete_retains_the_record() {
    let store = FakeStore {
        fail_delete: true,
        ..FakeStore::default()
    };
    store
        .transactions
        .lock()
        .unwrap()
        .push(tx("x", TransactionKind::Expense, "10"));
    let (controller, mut session) = ready(store).await;

    assert!(!controller.delete_transaction(&mut session, "x").await);
    assert_eq!(session.transactions().len(), 1);
}

#[tokio::test]
async fn settings_apply_locally_only_after_the_upsert_succeeds() {
    let (controller, mut session) = ready(FakeStore::default()).await;
    assert!(
        controller
            .update_settings(&mut session, dec("1200"), dec("6000"))
            .await
    );
    assert_eq!(session.settings().baseline, dec("1200"));
    assert_eq!(session.settings().target, dec("6000"));
}

#[tokio::test]
async fn failed_settings_upsert_keeps_previous_values() {
    let store = FakeStore {
        fail_settings_upsert: true,
        ..FakeStore::default()
    };
    *store.settings.lock().unwrap() = Some(RevenueSettings {
        baseline: dec("1000"),
        target: dec("5000"),
    });
    let (controller, mut session) = ready(store).await;

    assert!(
        !controller
            .update_settings(&mut session, dec("9999"), dec("9999"))
            .await
    );
    assert_eq!(session.settings().baseline, dec("1000"));
    assert_eq!(session.settings().target, dec("5000"));
}

#[tokio::test]
async fn tier_sync_replaces_the_full_remote_set() {
    let store = FakeStore::default();
    {
        let mut tiers = store.tiers.lock().unwrap();
        for (id, price) in [("a", "9"), ("b", "29"), ("c", "99")] {
            tiers.push(PricingTier {
                id: id.to_string(),
                price: dec(price),
            });
        }
    }
    let (controller, mut session) = ready(store).await;
    assert_eq!(session.tiers().len(), 3);

    let replacement = vec![PricingTier {
        id: "only".to_string(),
        price: dec("50"),
    }];
    assert!(controller.sync_tiers(&mut session, replacement).await);
    assert_eq!(session.tiers().len(), 1);
    assert_eq!(session.tiers()[0].price, dec("50"));

    let remote = remote_tiers(&controller);
    assert_eq!(remote.len(), 1);
    assert_eq!(remote[0].id, "only");
}

#[tokio::test]
async fn failed_tier_insert_keeps_the_local_set() {
    let store = FakeStore {
        fail_tier_insert: true,
        ..FakeStore::default()
    };
    store.tiers.lock().unwrap().push(PricingTier {
        id: "a".to_string(),
        price: dec("9"),
    });
    let (controller, mut session) = ready(store).await;

    let replacement = vec![PricingTier {
        id: "b".to_string(),
        price: dec("50"),
    }];
    assert!(!controller.sync_tiers(&mut session, replacement).await);
    // Local set untouched; the remote set is the acknowledged crash window.
    assert_eq!(session.tiers().len(), 1);
    assert_eq!(session.tiers()[0].id, "a");
    assert!(remote_tiers(&controller).is_empty());
}

#[tokio::test]
async fn sign_out_clears_all_state() {
    let store = FakeStore::default();
    store
        .transactions
        .lock()
        .unwrap()
        .push(tx("a", TransactionKind::Income, "1500"));
    *store.settings.lock().unwrap() = Some(RevenueSettings {
        baseline: dec("1000"),
        target: dec("5000"),
    });
    let (controller, mut session) = ready(store).await;
    assert_eq!(session.phase(), SessionPhase::Ready);

    controller.sign_out(&mut session);
    assert_eq!(session.phase(), SessionPhase::Unauthenticated);
    assert!(session.identity().is_none());
    assert!(session.transactions().is_empty());
    assert_eq!(session.settings(), RevenueSettings::default());
    assert!(session.tiers().is_empty());
}

#[tokio::test]
async fn mutations_without_an_identity_are_noops() {
    let controller = SyncController::new(FakeStore::default());
    let mut session = Session::new();
    assert!(
        !controller
            .add_transaction(&mut session, draft("Vercel", "17"))
            .await
    );
    assert!(session.transactions().is_empty());
}

fn controller_calls(controller: &SyncController<FakeStore>) -> usize {
    controller.store().calls()
}

fn remote_tiers(controller: &SyncController<FakeStore>) -> Vec<PricingTier> {
    controller.store().tiers.lock().unwrap().clone()
}
