//! The nearby-location watcher and one-shot tag suggestion.
//!
//! A [`NearbyWatcher`] owns a background task that samples the device
//! location on a fixed period, compares the sample against the saved
//! locations in recency order, and publishes the first match's name on a
//! watch channel. Every failure mode — permission denied, no fix, a slow
//! fix, a store read error — publishes `None` and waits for the next tick.

use std::{sync::Arc, time::Duration};

use tokio::{
  sync::watch,
  task::JoinHandle,
  time::{MissedTickBehavior, interval, timeout},
};
use tokio_util::sync::CancellationToken;

use cram_core::{
  proximity,
  store::{LocationSampler, LocationStore},
};

/// How often the watcher samples.
pub const SAMPLE_PERIOD: Duration = Duration::from_secs(600);

/// How long one sample may take before it is abandoned for this tick. A fix
/// that never resolves must not wedge the loop.
pub const SAMPLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Handle to the background sampling task.
///
/// Dropping the handle leaves the task running; call
/// [`stop`](NearbyWatcher::stop) to cancel it. Cancellation also abandons a
/// sample that is still pending.
pub struct NearbyWatcher {
  cancel: CancellationToken,
  task:   JoinHandle<()>,
  rx:     watch::Receiver<Option<String>>,
}

impl NearbyWatcher {
  /// Spawn the watcher with the given sampling period.
  pub fn start<S, L>(sampler: Arc<S>, store: Arc<L>, period: Duration) -> Self
  where
    S: LocationSampler + 'static,
    L: LocationStore + 'static,
  {
    let (tx, rx) = watch::channel(None);
    let cancel = CancellationToken::new();
    let task = tokio::spawn(watch_loop(sampler, store, period, tx, cancel.clone()));
    NearbyWatcher { cancel, task, rx }
  }

  /// A receiver for nearby-name updates. `None` means "not near anything".
  pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
    self.rx.clone()
  }

  /// The most recently published nearby name.
  pub fn current(&self) -> Option<String> {
    self.rx.borrow().clone()
  }

  /// Cancel the background task and wait for it to finish.
  pub async fn stop(self) {
    self.cancel.cancel();
    let _ = self.task.await;
  }
}

async fn watch_loop<S, L>(
  sampler: Arc<S>,
  store: Arc<L>,
  period: Duration,
  tx: watch::Sender<Option<String>>,
  cancel: CancellationToken,
) where
  S: LocationSampler,
  L: LocationStore,
{
  let mut ticker = interval(period);
  ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

  loop {
    tokio::select! {
      _ = ticker.tick() => {
        let nearby = check_once(sampler.as_ref(), store.as_ref()).await;
        let _ = tx.send(nearby);
      }
      _ = cancel.cancelled() => {
        tracing::debug!("nearby watcher shutting down");
        break;
      }
    }
  }
}

/// One sampling round. All failures collapse to `None`.
async fn check_once<S, L>(sampler: &S, store: &L) -> Option<String>
where
  S: LocationSampler,
  L: LocationStore,
{
  if !sampler.has_permission() {
    return None;
  }

  let sample = match timeout(SAMPLE_TIMEOUT, sampler.sample()).await {
    Ok(Ok(coords)) => coords,
    Ok(Err(e)) => {
      tracing::debug!(error = %e, "location sample failed");
      return None;
    }
    Err(_) => {
      tracing::debug!("location sample timed out");
      return None;
    }
  };

  let candidates = match store.recent().await {
    Ok(list) => list,
    Err(e) => {
      tracing::warn!(error = %e, "reading saved locations failed");
      return None;
    }
  };

  proximity::find_nearby(sample, &candidates).map(|loc| loc.name.clone())
}

/// One-shot variant used to pre-fill a new card's location tag. Sampling or
/// store failures simply leave the card untagged.
pub async fn suggest_location_tag<S, L>(
  sampler: &S,
  store: &L,
) -> Option<String>
where
  S: LocationSampler,
  L: LocationStore,
{
  check_once(sampler, store).await
}
