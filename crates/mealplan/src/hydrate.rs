use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;

use mealdeck_shared::mealplan::Assignment;
use mealdeck_shared::{PlanStore, Result, Session, timed};

use crate::{WeekWindow, WeeklyPlan};

/// Fetches the owner's assignments and lays out those inside `window`.
///
/// The store filters by owner only, the date range is applied here. An
/// anonymous session gets an empty plan without touching the store.
pub async fn hydrate<S: PlanStore + ?Sized>(
    store: &S,
    session: &Session,
    window: &WeekWindow,
    limit: Duration,
) -> Result<WeeklyPlan> {
    let Ok(uid) = session.require_uid() else {
        return Ok(WeeklyPlan::empty(window));
    };

    let assignments = timed(limit, store.list_assignments(uid)).await?;
    tracing::debug!(owner = uid, fetched = assignments.len(), "hydrating week");

    Ok(WeeklyPlan::from_assignments(window, assignments))
}

#[derive(Default)]
struct OwnerFetch {
    requested: AtomicU64,
    last: Mutex<Option<(u64, Vec<Assignment>)>>,
}

/// Serialises hydrations per owner.
///
/// At most one fetch per owner is in flight. A caller that queued behind a
/// running fetch reuses the result of the next fetch that started after it
/// asked, so nobody observes data older than their request. An owner is
/// tracked only while one of its hydrations is pending.
pub struct Hydrator<S: PlanStore + ?Sized> {
    store: Arc<S>,
    limit: Duration,
    owners: Mutex<HashMap<String, Arc<OwnerFetch>>>,
}

impl<S: PlanStore + ?Sized> Hydrator<S> {
    pub fn new(store: Arc<S>, limit: Duration) -> Self {
        Self {
            store,
            limit,
            owners: Mutex::new(HashMap::new()),
        }
    }

    pub async fn hydrate(&self, session: &Session, window: &WeekWindow) -> Result<WeeklyPlan> {
        let Ok(uid) = session.require_uid() else {
            return Ok(WeeklyPlan::empty(window));
        };

        let owner = {
            let mut owners = self.owners.lock().await;
            Arc::clone(owners.entry(uid.to_owned()).or_default())
        };

        let res = self.fetch(uid, &owner, window).await;
        self.release(uid, owner).await;

        res
    }

    async fn fetch(&self, uid: &str, owner: &OwnerFetch, window: &WeekWindow) -> Result<WeeklyPlan> {
        let ticket = owner.requested.fetch_add(1, Ordering::SeqCst) + 1;
        let mut last = owner.last.lock().await;

        if let Some((served, assignments)) = last.as_ref() {
            if *served >= ticket {
                tracing::debug!(owner = uid, ticket, "hydration coalesced");
                return Ok(WeeklyPlan::from_assignments(window, assignments.clone()));
            }
        }

        let serving = owner.requested.load(Ordering::SeqCst);
        let assignments = timed(self.limit, self.store.list_assignments(uid)).await?;
        let plan = WeeklyPlan::from_assignments(window, assignments.iter().cloned());
        *last = Some((serving, assignments));

        Ok(plan)
    }

    /// Forgets the owner once no other caller holds its entry.
    async fn release(&self, uid: &str, owner: Arc<OwnerFetch>) {
        let mut owners = self.owners.lock().await;
        let tracked = owners.get(uid).is_some_and(|e| Arc::ptr_eq(e, &owner));

        // One reference in the map, one here.
        if tracked && Arc::strong_count(&owner) == 2 {
            owners.remove(uid);
        }
    }
}
