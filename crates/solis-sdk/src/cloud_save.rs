//! Cloud save
//!
//! A pass-through keyed store; the durable copy lives on the platform and
//! nothing is cached locally. In development mode `load` always returns a
//! fresh default value rather than what was saved.

use crate::context::SdkContext;
use crate::validate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use solis_bridge::{Operation, marshal};
use solis_core::{ModuleResult, SaveRecord};
use std::sync::Arc;

const MODULE: &str = "CloudSave";

pub struct CloudSave {
    ctx: Arc<SdkContext>,
}

impl CloudSave {
    pub(crate) fn new(ctx: Arc<SdkContext>) -> Self {
        Self { ctx }
    }

    /// Store `data` under `key`, replacing any previous value
    pub async fn save<T: Serialize + ?Sized>(&self, key: &str, data: &T) -> ModuleResult<bool> {
        let op = Operation::CloudSaveSave;
        let args = self.ctx.prepare(MODULE, op, || {
            validate::required("key", key)?;
            Ok(vec![key.into(), marshal::encode(data)?.into()])
        })?;
        self.ctx.call_flag(MODULE, op, args).await
    }

    /// Saved value for `key`, or `T::default()` when nothing is stored
    pub async fn load<T: DeserializeOwned + Default>(&self, key: &str) -> ModuleResult<T> {
        let op = Operation::CloudSaveLoad;
        match self.load_text(key).await? {
            Some(text) => marshal::decode(&text).inspect_err(|e| self.ctx.report(MODULE, op, e)),
            None => Ok(T::default()),
        }
    }

    /// Saved value for `key` as a record, `null` when nothing is stored
    pub async fn load_record(&self, key: &str) -> ModuleResult<SaveRecord> {
        let value: Value = self.load(key).await?;
        Ok(SaveRecord::new(key, value))
    }

    /// Whether anything is stored under `key`
    pub async fn exists(&self, key: &str) -> ModuleResult<bool> {
        Ok(self.load_text(key).await?.is_some())
    }

    pub async fn delete(&self, key: &str) -> ModuleResult<bool> {
        let op = Operation::CloudSaveDelete;
        let args = self.ctx.prepare(MODULE, op, || {
            validate::required("key", key)?;
            Ok(vec![key.into()])
        })?;
        self.ctx.call_flag(MODULE, op, args).await
    }

    /// Raw JSON text for `key`; empty and `null` payloads mean nothing stored
    async fn load_text(&self, key: &str) -> ModuleResult<Option<String>> {
        let op = Operation::CloudSaveLoad;
        let args = self.ctx.prepare(MODULE, op, || {
            validate::required("key", key)?;
            Ok(vec![key.into()])
        })?;

        let text: String = self.ctx.call(MODULE, op, args, String::new).await?;
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == "null" {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }
}
