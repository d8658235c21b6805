// State store for a recording session
//
// Owns status, blocks and settings. Every mutation changes memory first and
// then writes the touched keys through to storage. A failed write is returned
// to the caller; memory is not rolled back.

use crate::core::BlockList;
use crate::db::{Block, RecState, Settings, StorageItems, StorageKey};
use crate::error::Result;
use crate::storage::KeyValueStore;
use std::sync::Arc;

pub struct Model {
    store: Arc<dyn KeyValueStore>,
    status: RecState,
    processed_code: BlockList,
    settings: Settings,
}

impl Model {
    /// Build a store and reconcile it with what's persisted
    pub async fn new(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let mut model = Self {
            store,
            status: RecState::Off,
            processed_code: BlockList::new(),
            settings: Settings::default(),
        };
        model.sync().await?;
        Ok(model)
    }

    pub fn status(&self) -> RecState {
        self.status
    }

    pub fn blocks(&self) -> &BlockList {
        &self.processed_code
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The full in-memory state as a storage record
    pub fn snapshot(&self) -> StorageItems {
        StorageItems {
            status: Some(self.status),
            code_blocks: Some(self.processed_code.to_vec()),
            settings: Some(self.settings.clone()),
        }
    }

    /// Reload from storage and write the reconciled state back.
    ///
    /// Nothing survives a reload to keep producing blocks, so a persisted
    /// `on` comes back as `paused`. Any status without a session clears
    /// the blocks.
    pub async fn sync(&mut self) -> Result<()> {
        let persisted = self.store.get(&StorageKey::ALL).await?;

        let had_session = persisted.status.is_some_and(RecState::has_session);
        if had_session {
            self.status = RecState::Paused;
            self.processed_code = persisted.code_blocks.unwrap_or_default().into();
        } else {
            self.status = RecState::Off;
            self.processed_code.clear();
        }
        self.settings = persisted.settings.unwrap_or_default();

        tracing::info!(
            status = %self.status,
            blocks = self.processed_code.len(),
            "synced recording state"
        );

        self.persist("sync", &StorageKey::ALL).await
    }

    /// Back to `off` with no blocks. Settings are kept.
    pub async fn reset(&mut self) -> Result<()> {
        self.status = RecState::Off;
        self.processed_code.clear();
        self.persist("reset", &[StorageKey::Status, StorageKey::CodeBlocks])
            .await
    }

    /// Append a new block
    pub async fn push_block(&mut self, value: impl Into<String>) -> Result<Block> {
        let block = Block::new(value);
        self.processed_code.push(block.clone());
        self.persist("push_block", &[StorageKey::CodeBlocks]).await?;
        Ok(block)
    }

    /// Prepend a server block unless one with the same value exists.
    ///
    /// Returns `None` for the duplicate case, which neither mutates nor writes.
    pub async fn add_server(&mut self, value: impl Into<String>) -> Result<Option<Block>> {
        let value = value.into();
        if self.processed_code.contains_value(&value) {
            tracing::debug!(op = "add_server", "server block already recorded");
            return Ok(None);
        }

        let block = Block::new(value);
        self.processed_code.unshift(block.clone());
        self.persist("add_server", &[StorageKey::CodeBlocks]).await?;
        Ok(Some(block))
    }

    /// Record a route: the `at` block goes right after the server block (once),
    /// the `wait` block is always appended. Returns the wait block.
    pub async fn add_route(&mut self, at: &str, wait: &str) -> Result<Block> {
        if !self.processed_code.contains_value(at) {
            self.processed_code.insert_clamped(1, Block::new(at));
        }

        let wait_block = Block::new(wait);
        self.processed_code.push(wait_block.clone());
        self.persist("add_route", &[StorageKey::CodeBlocks]).await?;
        Ok(wait_block)
    }

    /// Remove the block at `index` and return it
    pub async fn delete_block(&mut self, index: usize) -> Result<Block> {
        let removed = self.processed_code.remove(index)?;
        self.persist("delete_block", &[StorageKey::CodeBlocks]).await?;
        Ok(removed)
    }

    /// Drag the block at `from` to position `to`
    pub async fn move_block(&mut self, from: usize, to: usize) -> Result<()> {
        self.processed_code.move_block(from, to)?;
        self.persist("move_block", &[StorageKey::CodeBlocks]).await
    }

    pub async fn update_status(&mut self, status: RecState) -> Result<()> {
        self.status = status;
        self.persist("update_status", &[StorageKey::Status]).await
    }

    pub async fn update_settings(&mut self, settings: Settings) -> Result<()> {
        self.settings = settings;
        self.persist("update_settings", &[StorageKey::Settings]).await
    }

    pub async fn update_code_blocks(&mut self, blocks: Vec<Block>) -> Result<()> {
        self.processed_code = blocks.into();
        self.persist("update_code_blocks", &[StorageKey::CodeBlocks])
            .await
    }

    async fn persist(&self, op: &'static str, keys: &[StorageKey]) -> Result<()> {
        let items = self.snapshot().select(keys);

        match self.store.set(items).await {
            Ok(()) => {
                tracing::debug!(
                    op,
                    status = %self.status,
                    len = self.processed_code.len(),
                    "persisted"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(op, error = %e, "write-through failed");
                Err(e.into())
            }
        }
    }
}
