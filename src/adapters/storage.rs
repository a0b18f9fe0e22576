use crate::domain::model::Distribution;
use crate::domain::ports::SettingsStore;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: BTreeMap<String, Distribution>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<Distribution> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Distribution) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// 設定檔內容
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsDocument {
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub values: BTreeMap<String, Distribution>,
}

/// JSON 檔案設定儲存，每次 `set` 都會寫回檔案
#[derive(Debug, Clone)]
pub struct JsonFileSettings {
    path: PathBuf,
    document: SettingsDocument,
}

impl JsonFileSettings {
    /// 開啟設定檔；檔案不存在時從空白設定開始
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let document = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let document: SettingsDocument = serde_json::from_str(&content)?;
            tracing::debug!(
                "Loaded {} stored settings from {}",
                document.values.len(),
                path.display()
            );
            document
        } else {
            tracing::info!("📁 Settings file {} not found, starting empty", path.display());
            SettingsDocument::default()
        };

        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 暫存檔路徑，與設定檔位於同一目錄
    fn staging_path(&self) -> PathBuf {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        PathBuf::from(staging)
    }

    /// 先寫入暫存檔再改名覆蓋，寫入中斷時舊設定檔仍完整
    fn flush(&self, document: &SettingsDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(document)?;
        let staging = self.staging_path();
        if let Err(e) = fs::write(&staging, json) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

impl SettingsStore for JsonFileSettings {
    fn get(&self, key: &str) -> Option<Distribution> {
        self.document.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Distribution) -> Result<()> {
        let mut document = self.document.clone();
        document.values.insert(key.to_string(), value);
        document.updated_at = Some(Utc::now());

        self.flush(&document)?;
        self.document = document;
        Ok(())
    }
}
