use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Repository, StoreError};
use crate::models::Record;

/// In-process store. Records live as long as the process does.
/// Insertion order doubles as creation order.
pub struct MemoryStore<R> {
    records: RwLock<Vec<R>>,
}

impl<R> MemoryStore<R> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl<R> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> Repository<R> for MemoryStore<R> {
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<R>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.owner_id() == owner_id)
            .cloned()
            .collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<R>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    async fn save(&self, id: Option<Uuid>, fields: R::Fields) -> Result<Option<R>, StoreError> {
        let mut records = self.records.write().await;
        let now = Utc::now();

        match id {
            Some(id) => {
                let Some(slot) = records.iter_mut().find(|r| r.id() == id) else {
                    return Ok(None);
                };
                *slot = R::assemble(id, fields, slot.created_at(), now);
                Ok(Some(slot.clone()))
            }
            None => {
                let record = R::assemble(Uuid::new_v4(), fields, now, now);
                records.push(record.clone());
                Ok(Some(record))
            }
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id() != id);
        Ok(records.len() != before)
    }
}
