//! Schedule storage contract
//!
//! The engine never stores anything itself. The surrounding application
//! implements `ScheduleGateway` against its data store; `InMemoryGateway` is
//! the reference implementation used by the binaries and tests.
//!
//! Several schedules may be stored for one asset. The current one is the most
//! recently created (`latest`).

use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::GatewayError;
use crate::schedule::Schedule;

/// A schedule as persisted for an asset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredSchedule {
    pub id: u64,
    pub asset_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub schedule: Schedule,
}

/// Storage operations the application provides for computed schedules
pub trait ScheduleGateway {
    /// Store a new schedule for an asset
    fn create(&mut self, asset_id: &str, schedule: Schedule) -> Result<StoredSchedule, GatewayError>;

    /// Replace the content of an existing stored schedule
    fn update(
        &mut self,
        asset_id: &str,
        schedule_id: u64,
        schedule: Schedule,
    ) -> Result<StoredSchedule, GatewayError>;

    /// All schedules stored for an asset, in no particular order
    fn list(&self, asset_id: &str) -> Result<Vec<StoredSchedule>, GatewayError>;

    /// The current schedule for an asset, if any
    fn current(&self, asset_id: &str) -> Result<Option<StoredSchedule>, GatewayError> {
        Ok(latest(self.list(asset_id)?))
    }
}

/// Most recent schedule by creation time; ties go to the higher id
pub fn latest(mut stored: Vec<StoredSchedule>) -> Option<StoredSchedule> {
    sort_newest_first(&mut stored);
    stored.into_iter().next()
}

/// Order by `created_at` descending (then id descending)
pub fn sort_newest_first(stored: &mut [StoredSchedule]) {
    stored.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Process-local gateway keyed by schedule id
pub struct InMemoryGateway {
    next_id: u64,
    schedules: BTreeMap<u64, StoredSchedule>,
    clock: Clock,
}

impl std::fmt::Debug for InMemoryGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryGateway")
            .field("next_id", &self.next_id)
            .field("stored", &self.schedules.len())
            .finish()
    }
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::with_clock(Utc::now)
    }

    /// Gateway with an injected timestamp source
    pub fn with_clock<F>(clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        Self {
            next_id: 1,
            schedules: BTreeMap::new(),
            clock: Box::new(clock),
        }
    }

    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }
}

impl ScheduleGateway for InMemoryGateway {
    fn create(&mut self, asset_id: &str, schedule: Schedule) -> Result<StoredSchedule, GatewayError> {
        let stored = StoredSchedule {
            id: self.next_id,
            asset_id: asset_id.to_string(),
            created_at: (self.clock)(),
            updated_at: None,
            schedule,
        };
        self.next_id += 1;

        debug!("stored schedule {} for asset {}", stored.id, asset_id);
        self.schedules.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn update(
        &mut self,
        asset_id: &str,
        schedule_id: u64,
        schedule: Schedule,
    ) -> Result<StoredSchedule, GatewayError> {
        let now = (self.clock)();
        let stored = self
            .schedules
            .get_mut(&schedule_id)
            .ok_or_else(|| GatewayError::NotFound {
                asset_id: asset_id.to_string(),
                schedule_id,
            })?;

        if stored.asset_id != asset_id {
            return Err(GatewayError::AssetMismatch {
                schedule_id,
                stored: stored.asset_id.clone(),
                requested: asset_id.to_string(),
            });
        }

        stored.schedule = schedule;
        stored.updated_at = Some(now);
        Ok(stored.clone())
    }

    fn list(&self, asset_id: &str) -> Result<Vec<StoredSchedule>, GatewayError> {
        Ok(self
            .schedules
            .values()
            .filter(|s| s.asset_id == asset_id)
            .cloned()
            .collect())
    }
}
