use crate::events::model::{EventMeta, LogEvent, LogLevel};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

#[async_trait]
pub trait LogSink: Send + Sync {
    async fn handle(&self, event: &LogEvent);
    async fn flush(&self) {}
}

pub struct ConsoleSink {
    level_filter: Option<LogLevel>,
}

impl ConsoleSink {
    pub fn new(level_filter: Option<LogLevel>) -> Self {
        Self { level_filter }
    }
}

fn level_rank(level: LogLevel) -> u8 {
    match level {
        LogLevel::Trace => 0,
        LogLevel::Debug => 1,
        LogLevel::Info => 2,
        LogLevel::Warn => 3,
        LogLevel::Error => 4,
    }
}

fn event_meta(event: &LogEvent) -> &EventMeta {
    match event {
        LogEvent::Network(e) => &e.meta,
        LogEvent::Protocol(e) => &e.meta,
        LogEvent::System(e) => &e.meta,
    }
}

#[async_trait]
impl LogSink for ConsoleSink {
    async fn handle(&self, event: &LogEvent) {
        let meta = event_meta(event);
        if meta.suppress_console {
            return;
        }
        if let Some(min) = self.level_filter {
            if level_rank(meta.level) < level_rank(min) {
                return;
            }
        }
        match event {
            LogEvent::Network(n) => {
                println!(
                    "NET action={} addr={:?} detail={:?} corr={:?}",
                    n.action, n.addr, n.detail, n.meta.corr_id
                );
            }
            LogEvent::Protocol(p) => {
                println!(
                    "PROTO action={} command={:?} detail={:?} corr={:?}",
                    p.action, p.command, p.detail, p.meta.corr_id
                );
            }
            LogEvent::System(s) => {
                println!(
                    "SYS action={} detail={:?} corr={:?}",
                    s.action, s.detail, s.meta.corr_id
                );
            }
        }
    }
}

/// Append-only JSON-lines audit log with size-based rotation. Backups are
/// numbered `<path>.1` (newest) through `<path>.N`; the oldest falls off.
pub struct JsonFileSink {
    path: std::path::PathBuf,
    rotate: bool,
    max_bytes: u64,
    backups: u32,
    file: tokio::sync::Mutex<Option<tokio::fs::File>>,
}

async fn open_append(path: &std::path::Path) -> std::io::Result<tokio::fs::File> {
    tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
}

impl JsonFileSink {
    pub async fn new<P: Into<std::path::PathBuf>>(
        path: P,
        rotate: bool,
        max_bytes: u64,
        backups: u32,
    ) -> std::io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.ok();
        }
        let file = open_append(&path).await.ok();
        Ok(Self {
            path,
            rotate,
            max_bytes,
            backups,
            file: tokio::sync::Mutex::new(file),
        })
    }

    fn backup_path(&self, idx: u32) -> std::path::PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{}", idx));
        name.into()
    }

    async fn rotate_files(&self) -> std::io::Result<()> {
        let mut guard = self.file.lock().await;
        *guard = None;
        for idx in (1..self.backups).rev() {
            let from = self.backup_path(idx);
            if from.exists() {
                let _ = std::fs::rename(&from, self.backup_path(idx + 1));
            }
        }
        std::fs::rename(&self.path, self.backup_path(1))?;
        *guard = Some(open_append(&self.path).await?);
        Ok(())
    }

    async fn over_limit(&self) -> bool {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) => meta.len() >= self.max_bytes,
            Err(_) => false,
        }
    }
}

#[async_trait]
impl LogSink for JsonFileSink {
    async fn handle(&self, event: &LogEvent) {
        if self.rotate && self.over_limit().await {
            let _ = self.rotate_files().await;
        }
        let Ok(mut line) = serde_json::to_string(event) else {
            return;
        };
        line.push('\n');
        let mut guard = self.file.lock().await;
        if let Some(f) = guard.as_mut() {
            let _ = f.write_all(line.as_bytes()).await;
        }
    }

    async fn flush(&self) {
        let guard = self.file.lock().await;
        if let Some(f) = guard.as_ref() {
            let _ = f.sync_all().await;
        }
    }
}
