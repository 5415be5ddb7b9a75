use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mealdeck_shared::mealplan::{Assignment, MealSlot, MealType};
use mealdeck_shared::recipe::RecipeSummary;
use mealdeck_shared::{Error, PlanStore, Result, Session, timed};

use crate::{WeeklyPlan, parse_drop_target};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOptions {
    /// Upper bound for a single store call.
    pub timeout: Duration,
    /// Extra attempts at re-adding a moved assignment after its removal.
    pub move_retries: u32,
    /// Delay before the first retry, doubled after each attempt.
    pub retry_backoff: Duration,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            move_retries: 2,
            retry_backoff: Duration::from_millis(200),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Target or dragged item could not be resolved, nothing was sent to the store.
    Rejected(String),
    /// Dropped on its own slot.
    Unchanged,
    Moved(Assignment),
}

/// Plan mutations against a [`PlanStore`].
///
/// None of these update a [`WeeklyPlan`] in memory. Re-hydrate afterwards to
/// observe what the store actually holds.
pub struct Command<S: PlanStore + ?Sized> {
    store: Arc<S>,
    options: CommandOptions,
    moving: Arc<Mutex<HashSet<String>>>,
}

impl<S: PlanStore + ?Sized> Clone for Command<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            options: self.options,
            moving: Arc::clone(&self.moving),
        }
    }
}

impl<S: PlanStore + ?Sized> Command<S> {
    pub fn new(store: Arc<S>, options: CommandOptions) -> Self {
        Self {
            store,
            options,
            moving: Arc::default(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn options(&self) -> CommandOptions {
        self.options
    }

    /// Creates a new assignment. Not idempotent: the same recipe may sit in
    /// the same slot several times.
    #[tracing::instrument(skip(self, session, recipe), fields(owner = ?session.uid, recipe = recipe.id))]
    pub async fn add_assignment(
        &self,
        session: &Session,
        date: &str,
        meal_type: MealType,
        recipe: &RecipeSummary,
    ) -> Result<Assignment> {
        let uid = session.require_uid()?;
        let assignment = timed(
            self.options.timeout,
            self.store.create_assignment(uid, date, meal_type, recipe),
        )
        .await?;

        tracing::info!(id = %assignment.id, "assignment added");

        Ok(assignment)
    }

    /// Removing an id the store does not know is a success.
    #[tracing::instrument(skip(self, session), fields(owner = ?session.uid))]
    pub async fn remove_assignment(&self, session: &Session, id: &str) -> Result<()> {
        session.require_uid()?;
        timed(self.options.timeout, self.store.delete_assignment(id)).await?;

        tracing::info!("assignment removed");

        Ok(())
    }

    /// Relocates `assignment` into `to`.
    ///
    /// Returns the assignment now occupying `to`, which has a new id, or the
    /// input unchanged when `to` is its current slot. Only the owner of the
    /// assignment may move it. Stores that support it relocate in one
    /// transaction. Otherwise the assignment is removed and re-added; a failed
    /// re-add is retried with backoff unless its outcome is ambiguous, and
    /// [`Error::PartialMove`] reports a removal that may have happened without
    /// its re-add.
    #[tracing::instrument(skip(self, session, assignment, to), fields(owner = ?session.uid, id = %assignment.id, to = %to))]
    pub async fn move_assignment(
        &self,
        session: &Session,
        assignment: &Assignment,
        to: &MealSlot,
    ) -> Result<Assignment> {
        let uid = session.require_uid()?;
        if assignment.owner_id != uid {
            mealdeck_shared::reject!("assignment `{}` belongs to another owner", assignment.id);
        }

        let from = assignment.slot();

        if &from == to {
            return Ok(assignment.clone());
        }

        let _guard = MoveGuard::acquire(&self.moving, &assignment.id)?;

        if self.store.supports_relocate() {
            let moved = timed(self.options.timeout, self.store.relocate(assignment, to)).await?;
            tracing::info!(new_id = %moved.id, "assignment relocated");

            return Ok(moved);
        }

        let partial = |reason: String| Error::PartialMove {
            assignment_id: assignment.id.to_owned(),
            from: from.clone(),
            to: to.clone(),
            reason,
        };

        if let Err(err) = timed(
            self.options.timeout,
            self.store.delete_assignment(&assignment.id),
        )
        .await
        {
            if !err.is_ambiguous() {
                return Err(err);
            }

            tracing::warn!(%err, "removal of moved assignment may have been applied");

            return Err(partial(format!("remove step: {err}")));
        }

        let mut backoff = self.options.retry_backoff;
        let mut attempt = 0;

        loop {
            let res = timed(
                self.options.timeout,
                self.store
                    .create_assignment(uid, &to.date, to.meal_type, &assignment.recipe),
            )
            .await;

            let err = match res {
                Ok(moved) => {
                    tracing::info!(new_id = %moved.id, attempt, "assignment moved");
                    return Ok(moved);
                }
                Err(err) => err,
            };

            if err.is_ambiguous() || attempt >= self.options.move_retries {
                tracing::warn!(%err, attempt, "move left assignment removed");

                return Err(partial(err.to_string()));
            }

            tracing::warn!(%err, attempt, ?backoff, "re-adding moved assignment failed, retrying");
            tokio::time::sleep(backoff).await;
            backoff *= 2;
            attempt += 1;
        }
    }

    /// Handles a drag of `assignment_id` dropped on the slot `target_id`.
    pub async fn drop_assignment(
        &self,
        session: &Session,
        plan: &WeeklyPlan,
        assignment_id: &str,
        target_id: &str,
    ) -> Result<DropOutcome> {
        session.require_uid()?;

        let to = match parse_drop_target(target_id) {
            Ok(to) => to,
            Err(Error::InputRejected(reason)) => {
                tracing::debug!(target_id, %reason, "drop rejected");
                return Ok(DropOutcome::Rejected(reason));
            }
            Err(err) => return Err(err),
        };

        let Some(assignment) = plan.find(assignment_id) else {
            return Ok(DropOutcome::Rejected(format!(
                "assignment `{assignment_id}` is not in the plan"
            )));
        };

        if assignment.slot() == to {
            return Ok(DropOutcome::Unchanged);
        }

        match self.move_assignment(session, assignment, &to).await {
            Ok(moved) => Ok(DropOutcome::Moved(moved)),
            Err(Error::InputRejected(reason)) => Ok(DropOutcome::Rejected(reason)),
            Err(err) => Err(err),
        }
    }
}

/// Marks an assignment as being moved until dropped.
struct MoveGuard {
    moving: Arc<Mutex<HashSet<String>>>,
    id: String,
}

impl MoveGuard {
    fn acquire(moving: &Arc<Mutex<HashSet<String>>>, id: &str) -> Result<Self> {
        let mut ids = moving
            .lock()
            .map_err(|_| Error::Server("move registry poisoned".to_owned()))?;

        if !ids.insert(id.to_owned()) {
            mealdeck_shared::reject!("assignment `{id}` is already being moved");
        }

        Ok(Self {
            moving: Arc::clone(moving),
            id: id.to_owned(),
        })
    }
}

impl Drop for MoveGuard {
    fn drop(&mut self) {
        if let Ok(mut ids) = self.moving.lock() {
            ids.remove(&self.id);
        }
    }
}
