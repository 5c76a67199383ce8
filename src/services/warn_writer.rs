//! 警告写入服务 - 业务能力层
//!
//! 只负责"写 warn.txt"能力，记录需要人工复核的答卷，不关心流程

use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

/// 警告写入服务
///
/// 职责：
/// - 将批改失败的答卷、分数不自洽的题目写入 warn.txt
/// - 每次写入一条，追加模式
/// - 不修改批改结果
pub struct WarnWriter {
    warn_file_path: String,
}

impl WarnWriter {
    /// 使用指定文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            warn_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.warn_file_path
    }

    /// 写入一条警告
    ///
    /// # 参数
    /// - `student_id`: 学生身份（或文件名）
    /// - `reason`: 原因
    pub fn write(&self, student_id: &str, reason: &str) -> Result<()> {
        debug!("写入警告: {} | {}", student_id, reason);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.warn_file_path)?;

        let warn_msg = format!(
            "[{}] {} | {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            student_id,
            reason
        );

        file.write_all(warn_msg.as_bytes())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warn.txt");
        let writer = WarnWriter::with_path(path.to_string_lossy().to_string());

        writer.write("alice.pdf", "ERROR: File read error").unwrap();
        writer.write("Bob", "题目 2 总分不一致").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("alice.pdf | ERROR: File read error"));
        assert!(lines[1].ends_with("Bob | 题目 2 总分不一致"));
    }
}
