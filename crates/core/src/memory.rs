// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-memory repositories.
//!
//! They honour the same contract as the database-backed ones: updates of a
//! single hour or training are serialized by a per-entity lock acquired with
//! a timeout, and a failed transition writes nothing.

use crate::clock::Clock;
use crate::error::{AppError, StorageError};
use crate::ports::{
    AvailableHoursReadModel, HourRepository, HourTransition, TrainingRepository,
    TrainingTransition, TrainingsReadModel, UserRepository,
};
use gymhours_domain::{
    Hour, HourFactory, Training, User, UserAccount, can_user_see_training,
};
use parking_lot::{Mutex, MutexGuard};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;

/// Default time to wait for a per-entity lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

type Slot<T> = Arc<Mutex<Option<T>>>;

fn lock_slot<'a, T>(
    slot: &'a Mutex<Option<T>>,
    timeout: Duration,
    what: &str,
) -> Result<MutexGuard<'a, Option<T>>, AppError> {
    slot.try_lock_for(timeout)
        .ok_or_else(|| StorageError::LockTimeout(what.to_string()).into())
}

/// Trainer hours keyed by unix timestamp.
///
/// A slot holding `None` is a lock placeholder for an hour that has not been
/// written yet; it is invisible to readers.
pub struct MemoryHourRepository {
    factory: HourFactory,
    clock: Arc<dyn Clock>,
    lock_timeout: Duration,
    hours: Mutex<BTreeMap<i64, Slot<Hour>>>,
}

impl MemoryHourRepository {
    pub fn new(factory: HourFactory, clock: Arc<dyn Clock>) -> Self {
        Self::with_lock_timeout(factory, clock, DEFAULT_LOCK_TIMEOUT)
    }

    pub fn with_lock_timeout(
        factory: HourFactory,
        clock: Arc<dyn Clock>,
        lock_timeout: Duration,
    ) -> Self {
        Self {
            factory,
            clock,
            lock_timeout,
            hours: Mutex::new(BTreeMap::new()),
        }
    }

    /// Number of hours that have been written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slots held by the map, placeholders included.
    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.hours.lock().len()
    }

    fn slot(&self, time: OffsetDateTime) -> Slot<Hour> {
        let mut hours = self.hours.lock();
        Arc::clone(hours.entry(time.unix_timestamp()).or_default())
    }

    fn existing_slot(&self, time: OffsetDateTime) -> Option<Slot<Hour>> {
        self.hours.lock().get(&time.unix_timestamp()).cloned()
    }

    /// Drops a placeholder nobody else is waiting on.
    fn release_placeholder(&self, time: OffsetDateTime, slot: &Slot<Hour>) {
        let mut hours = self.hours.lock();
        let key = time.unix_timestamp();
        let unused = hours.get(&key).is_some_and(|held| {
            Arc::ptr_eq(held, slot)
                && Arc::strong_count(slot) == 2
                && slot.try_lock().is_some_and(|guard| guard.is_none())
        });
        if unused {
            hours.remove(&key);
        }
    }

    fn snapshot(&self) -> Vec<Hour> {
        let slots: Vec<Slot<Hour>> = self.hours.lock().values().cloned().collect();
        slots
            .iter()
            .filter_map(|slot| slot.lock().clone())
            .collect()
    }
}

impl HourRepository for MemoryHourRepository {
    fn get_hour(&self, time: OffsetDateTime) -> Result<Option<Hour>, AppError> {
        let Some(slot) = self.existing_slot(time) else {
            return Ok(None);
        };
        let guard = lock_slot(&slot, self.lock_timeout, "trainer hour")?;
        Ok(guard.clone())
    }

    fn update_hour(
        &self,
        time: OffsetDateTime,
        update: HourTransition<'_>,
    ) -> Result<Hour, AppError> {
        let slot = self.slot(time);
        let result = {
            let mut guard = lock_slot(&slot, self.lock_timeout, "trainer hour")?;
            let current = match guard.as_ref() {
                Some(hour) => Ok(hour.clone()),
                None => self
                    .factory
                    .new_not_available_hour(time, self.clock.now())
                    .map_err(AppError::from),
            };
            current.and_then(update).inspect(|updated| {
                *guard = Some(updated.clone());
            })
        };

        if result.is_err() {
            self.release_placeholder(time, &slot);
        }
        result
    }
}

impl AvailableHoursReadModel for MemoryHourRepository {
    fn hours_between(
        &self,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<Hour>, AppError> {
        let range = from.unix_timestamp()..=to.unix_timestamp();
        let slots: Vec<Slot<Hour>> = self
            .hours
            .lock()
            .range(range)
            .map(|(_, slot)| Arc::clone(slot))
            .collect();

        let mut hours = Vec::with_capacity(slots.len());
        for slot in slots {
            if let Some(hour) = lock_slot(&slot, self.lock_timeout, "trainer hour")?.clone() {
                hours.push(hour);
            }
        }
        Ok(hours)
    }
}

/// Trainings keyed by id.
pub struct MemoryTrainingRepository {
    lock_timeout: Duration,
    trainings: Mutex<HashMap<String, Slot<Training>>>,
}

impl MemoryTrainingRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::with_lock_timeout(DEFAULT_LOCK_TIMEOUT)
    }

    #[must_use]
    pub fn with_lock_timeout(lock_timeout: Duration) -> Self {
        Self {
            lock_timeout,
            trainings: Mutex::new(HashMap::new()),
        }
    }

    fn existing_slot(&self, training_uuid: &str) -> Result<Slot<Training>, AppError> {
        self.trainings
            .lock()
            .get(training_uuid)
            .cloned()
            .ok_or_else(|| AppError::not_found("training", training_uuid))
    }

    fn sorted(&self, keep: impl Fn(&Training) -> bool) -> Vec<Training> {
        let slots: Vec<Slot<Training>> = self.trainings.lock().values().cloned().collect();
        let mut trainings: Vec<Training> = slots
            .iter()
            .filter_map(|slot| slot.lock().clone())
            .filter(|training| keep(training))
            .collect();
        trainings.sort_by(|a, b| a.time().cmp(&b.time()).then(a.uuid().cmp(b.uuid())));
        trainings
    }
}

impl Default for MemoryTrainingRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingRepository for MemoryTrainingRepository {
    fn add_training(&self, training: &Training) -> Result<(), AppError> {
        let mut trainings = self.trainings.lock();
        if trainings.contains_key(training.uuid()) {
            return Err(StorageError::UniqueViolation(format!(
                "training '{}' already exists",
                training.uuid()
            ))
            .into());
        }
        trainings.insert(
            training.uuid().to_string(),
            Arc::new(Mutex::new(Some(training.clone()))),
        );
        Ok(())
    }

    fn get_training(&self, training_uuid: &str, user: &User) -> Result<Training, AppError> {
        let slot = self.existing_slot(training_uuid)?;
        let guard = lock_slot(&slot, self.lock_timeout, "training")?;
        let training = guard
            .clone()
            .ok_or_else(|| AppError::not_found("training", training_uuid))?;
        can_user_see_training(user, &training)?;
        Ok(training)
    }

    fn update_training(
        &self,
        training_uuid: &str,
        user: &User,
        update: TrainingTransition<'_>,
    ) -> Result<Training, AppError> {
        let slot = self.existing_slot(training_uuid)?;
        let mut guard = lock_slot(&slot, self.lock_timeout, "training")?;
        let training = guard
            .clone()
            .ok_or_else(|| AppError::not_found("training", training_uuid))?;

        can_user_see_training(user, &training)?;

        let updated = update(training)?;
        *guard = Some(updated.clone());
        Ok(updated)
    }
}

impl TrainingsReadModel for MemoryTrainingRepository {
    fn all_trainings(&self) -> Result<Vec<Training>, AppError> {
        Ok(self.sorted(|_| true))
    }

    fn find_trainings_for_user(&self, user_uuid: &str) -> Result<Vec<Training>, AppError> {
        Ok(self.sorted(|t| t.user_uuid() == user_uuid && !t.is_canceled()))
    }
}

/// User accounts; every operation runs under one lock, so balance changes
/// are atomic.
#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<HashMap<String, UserAccount>>,
}

impl MemoryUserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for MemoryUserRepository {
    fn add_user(&self, account: &UserAccount) -> Result<(), AppError> {
        let mut users = self.users.lock();
        if users.contains_key(account.uuid()) {
            return Err(StorageError::UniqueViolation(format!(
                "user '{}' already exists",
                account.uuid()
            ))
            .into());
        }
        users.insert(account.uuid().to_string(), account.clone());
        Ok(())
    }

    fn get_user(&self, user_uuid: &str) -> Result<UserAccount, AppError> {
        self.users
            .lock()
            .get(user_uuid)
            .cloned()
            .ok_or_else(|| AppError::not_found("user", user_uuid))
    }

    fn update_balance(&self, user_uuid: &str, amount_change: i64) -> Result<i64, AppError> {
        let mut users = self.users.lock();
        let account = users
            .get_mut(user_uuid)
            .ok_or_else(|| AppError::not_found("user", user_uuid))?;
        Ok(account.change_balance(amount_change)?)
    }

    fn update_last_ip(&self, user_uuid: &str, ip: &str) -> Result<(), AppError> {
        let mut users = self.users.lock();
        let account = users
            .get_mut(user_uuid)
            .ok_or_else(|| AppError::not_found("user", user_uuid))?;
        account.update_last_ip(ip);
        Ok(())
    }
}

/// All in-memory repositories behind one value, for wiring through
/// [`crate::Repositories::from_store`].
pub struct MemoryStore {
    pub hours: MemoryHourRepository,
    pub trainings: MemoryTrainingRepository,
    pub users: MemoryUserRepository,
}

impl MemoryStore {
    pub fn new(factory: HourFactory, clock: Arc<dyn Clock>) -> Self {
        Self {
            hours: MemoryHourRepository::new(factory, clock),
            trainings: MemoryTrainingRepository::new(),
            users: MemoryUserRepository::new(),
        }
    }
}

impl HourRepository for MemoryStore {
    fn get_hour(&self, time: OffsetDateTime) -> Result<Option<Hour>, AppError> {
        self.hours.get_hour(time)
    }

    fn update_hour(
        &self,
        time: OffsetDateTime,
        update: HourTransition<'_>,
    ) -> Result<Hour, AppError> {
        self.hours.update_hour(time, update)
    }
}

impl AvailableHoursReadModel for MemoryStore {
    fn hours_between(
        &self,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<Hour>, AppError> {
        self.hours.hours_between(from, to)
    }
}

impl TrainingRepository for MemoryStore {
    fn add_training(&self, training: &Training) -> Result<(), AppError> {
        self.trainings.add_training(training)
    }

    fn get_training(&self, training_uuid: &str, user: &User) -> Result<Training, AppError> {
        self.trainings.get_training(training_uuid, user)
    }

    fn update_training(
        &self,
        training_uuid: &str,
        user: &User,
        update: TrainingTransition<'_>,
    ) -> Result<Training, AppError> {
        self.trainings.update_training(training_uuid, user, update)
    }
}

impl TrainingsReadModel for MemoryStore {
    fn all_trainings(&self) -> Result<Vec<Training>, AppError> {
        self.trainings.all_trainings()
    }

    fn find_trainings_for_user(&self, user_uuid: &str) -> Result<Vec<Training>, AppError> {
        self.trainings.find_trainings_for_user(user_uuid)
    }
}

impl UserRepository for MemoryStore {
    fn add_user(&self, account: &UserAccount) -> Result<(), AppError> {
        self.users.add_user(account)
    }

    fn get_user(&self, user_uuid: &str) -> Result<UserAccount, AppError> {
        self.users.get_user(user_uuid)
    }

    fn update_balance(&self, user_uuid: &str, amount_change: i64) -> Result<i64, AppError> {
        self.users.update_balance(user_uuid, amount_change)
    }

    fn update_last_ip(&self, user_uuid: &str, ip: &str) -> Result<(), AppError> {
        self.users.update_last_ip(user_uuid, ip)
    }
}
