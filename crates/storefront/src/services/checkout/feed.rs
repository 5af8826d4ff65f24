//! Session feed: applies store stream updates to a checkout session.
//!
//! The stores publish collection values through `watch` channels. This loop
//! treats each update as an external event and routes it through the same
//! deterministic recompute path as a manual selection change; nothing here
//! (or in the session) depends on updates being pushed promptly.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::warn;

use pixel_arcade_core::RewardId;

use super::session::SharedSession;
use crate::db::RewardStore;
use crate::models::{Address, Reward};

/// Consume address and held-reward streams into `session` until both
/// streams close.
///
/// The current value of each stream is applied immediately; afterwards every
/// change is applied as it is observed. Held reward IDs are resolved to
/// definitions through `rewards` before they reach the session.
pub async fn drive(
    session: SharedSession,
    mut addresses: watch::Receiver<Vec<Address>>,
    mut held_rewards: watch::Receiver<Vec<RewardId>>,
    rewards: Arc<dyn RewardStore>,
) {
    apply_addresses(&session, &mut addresses).await;
    apply_held_rewards(&session, &mut held_rewards, rewards.as_ref()).await;

    let mut addresses_open = true;
    let mut held_open = true;
    while addresses_open || held_open {
        tokio::select! {
            changed = addresses.changed(), if addresses_open => {
                if changed.is_ok() {
                    apply_addresses(&session, &mut addresses).await;
                } else {
                    addresses_open = false;
                }
            }
            changed = held_rewards.changed(), if held_open => {
                if changed.is_ok() {
                    apply_held_rewards(&session, &mut held_rewards, rewards.as_ref()).await;
                } else {
                    held_open = false;
                }
            }
        }
    }
}

async fn apply_addresses(session: &SharedSession, rx: &mut watch::Receiver<Vec<Address>>) {
    let list = rx.borrow_and_update().clone();
    session.lock().await.apply_addresses(list);
}

async fn apply_held_rewards(
    session: &SharedSession,
    rx: &mut watch::Receiver<Vec<RewardId>>,
    rewards: &dyn RewardStore,
) {
    let held_ids = rx.borrow_and_update().clone();

    let definitions: Vec<Reward> = match rewards.all().await {
        Ok(all) => all
            .into_iter()
            .filter(|r| held_ids.contains(&r.id))
            .collect(),
        Err(e) => {
            // keep the previous reward snapshot rather than wiping it
            warn!(error = %e, "Failed to load reward definitions");
            return;
        }
    };

    session.lock().await.apply_held_rewards(definitions);
}
