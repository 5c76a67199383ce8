use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 支持的答卷文件扩展名
pub const BOOKLET_EXTENSIONS: [&str; 4] = ["pdf", "png", "jpg", "jpeg"];

fn is_booklet(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            BOOKLET_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// 扫描文件夹中的所有答卷文件，按文件名排序
pub async fn scan_booklets(folder_path: &Path) -> Result<Vec<PathBuf>> {
    if !folder_path.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path.display());
    }

    let mut booklets = Vec::new();
    let mut entries = fs::read_dir(folder_path)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path.display()))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && is_booklet(&path) {
            booklets.push(path);
        }
    }

    booklets.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    if booklets.is_empty() {
        tracing::warn!("在文件夹 {} 中没有找到答卷文件", folder_path.display());
    } else {
        tracing::info!("✓ 在 {} 中找到 {} 份答卷", folder_path.display(), booklets.len());
    }

    Ok(booklets)
}
