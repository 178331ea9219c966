//! 下载对账服务 - 业务能力层
//!
//! 浏览器下载的文件名由浏览器决定（GUID），这里在下载目录中找出刚写入的文件，
//! 并把它重命名为调用方期望的规范文件名。
//!
//! 前提：同一时刻只有一个下载在进行，由工作流的串行执行保证，这里不加锁。
//! 点击下载前先对目录拍快照，对账时只考虑快照之后新出现或被改写的文件。

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::fs;
use tracing::{debug, info};

use crate::error::DownloadError;

/// Chrome 下载中的临时文件扩展名
const PARTIAL_DOWNLOAD_EXTENSION: &str = "crdownload";

/// 对账时在目录中观察到的文件
#[derive(Debug, Clone)]
pub struct DownloadCandidate {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// 点击下载之前目录中已有的文件
#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    entries: HashMap<PathBuf, SystemTime>,
}

impl DirectorySnapshot {
    /// 路径和修改时间都没变的文件不是本次下载
    fn contains(&self, candidate: &DownloadCandidate) -> bool {
        self.entries.get(&candidate.path) == Some(&candidate.modified)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 下载对账服务
pub struct DownloadReconciler {
    recency_window: Duration,
}

impl DownloadReconciler {
    pub fn new(recency_window: Duration) -> Self {
        Self { recency_window }
    }

    /// 记录目录当前的文件，在点击下载之前调用
    pub async fn snapshot(&self, directory: &Path) -> Result<DirectorySnapshot, DownloadError> {
        let entries = self
            .scan(directory)
            .await?
            .into_iter()
            .map(|c| (c.path, c.modified))
            .collect();
        Ok(DirectorySnapshot { entries })
    }

    /// 找出快照之后最新下载的文件并重命名为 `target`
    pub async fn reconcile(
        &self,
        directory: &Path,
        target: &Path,
        before: &DirectorySnapshot,
    ) -> Result<PathBuf, DownloadError> {
        let candidates: Vec<DownloadCandidate> = self
            .scan(directory)
            .await?
            .into_iter()
            .filter(|c| !before.contains(c))
            .collect();
        let winner = select_newest(candidates, directory, self.recency_window)?;

        debug!(
            "最新文件: {} -> {}",
            winner.path.display(),
            target.display()
        );

        fs::rename(&winner.path, target)
            .await
            .map_err(|source| DownloadError::RenameFailed {
                from: winner.path.clone(),
                to: target.to_path_buf(),
                source,
            })?;

        if !fs::try_exists(target).await.unwrap_or(false) {
            return Err(DownloadError::RenameVerificationFailed {
                path: target.to_path_buf(),
            });
        }

        info!("✓ 已保存: {}", target.display());
        Ok(target.to_path_buf())
    }

    /// 列出目录中的普通文件及其修改时间
    async fn scan(&self, directory: &Path) -> Result<Vec<DownloadCandidate>, DownloadError> {
        let read_dir_failed = |source| DownloadError::ReadDirFailed {
            dir: directory.to_path_buf(),
            source,
        };

        let mut entries = fs::read_dir(directory).await.map_err(read_dir_failed)?;
        let mut candidates = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(read_dir_failed)? {
            let metadata = entry.metadata().await.map_err(read_dir_failed)?;
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata.modified().map_err(read_dir_failed)?;
            candidates.push(DownloadCandidate {
                path: entry.path(),
                modified,
            });
        }
        Ok(candidates)
    }
}

/// 在时间窗口内选出修改时间最新的文件
///
/// 多个文件并列最新时报错，而不是按目录遍历顺序随便挑一个。
pub fn select_newest(
    candidates: Vec<DownloadCandidate>,
    directory: &Path,
    recency_window: Duration,
) -> Result<DownloadCandidate, DownloadError> {
    let now = SystemTime::now();
    let mut recent: Vec<DownloadCandidate> = candidates
        .into_iter()
        .filter(|c| {
            // 修改时间在未来（时钟偏差）按刚刚写入处理
            let age = now.duration_since(c.modified).unwrap_or(Duration::ZERO);
            age < recency_window
        })
        .collect();

    let newest = recent
        .iter()
        .map(|c| c.modified)
        .max()
        .ok_or_else(|| DownloadError::NoDownloadFound {
            dir: directory.to_path_buf(),
            window_secs: recency_window.as_secs(),
        })?;

    recent.retain(|c| c.modified == newest);
    if recent.len() > 1 {
        return Err(DownloadError::AmbiguousDownload {
            candidates: recent.into_iter().map(|c| c.path).collect(),
        });
    }

    let winner = recent.remove(0);
    if winner.path.extension().and_then(|e| e.to_str()) == Some(PARTIAL_DOWNLOAD_EXTENSION) {
        return Err(DownloadError::DownloadIncomplete { path: winner.path });
    }
    Ok(winner)
}
