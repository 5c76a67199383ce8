//! 答卷处理上下文
//!
//! 封装"我正在处理这一批中的第几份答卷"这一信息

use std::fmt::Display;
use std::path::{Path, PathBuf};

use crate::services::payload_encoder::file_name_of;

/// 答卷处理上下文
#[derive(Debug, Clone)]
pub struct SubmissionCtx {
    /// 答卷文件路径
    pub path: PathBuf,

    /// 文件名，失败时作为学生身份
    pub file_name: String,

    /// 答卷在批次中的序号（从1开始）
    pub index: usize,

    /// 批次总数
    pub total: usize,
}

impl SubmissionCtx {
    /// 创建新的答卷上下文
    pub fn new(path: &Path, index: usize, total: usize) -> Self {
        Self {
            path: path.to_path_buf(),
            file_name: file_name_of(path),
            index,
            total,
        }
    }

    /// 是否为批次中的最后一份
    pub fn is_last(&self) -> bool {
        self.index >= self.total
    }
}

impl Display for SubmissionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[答卷 {}/{} {}]", self.index, self.total, self.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_last() {
        let ctx = SubmissionCtx::new(Path::new("/tmp/booklets/alice.pdf"), 2, 3);
        assert_eq!(ctx.to_string(), "[答卷 2/3 alice.pdf]");
        assert!(!ctx.is_last());
        assert!(SubmissionCtx::new(Path::new("b.pdf"), 3, 3).is_last());
    }
}
