/// 可传输的文件内容
///
/// `content` 为 base64 编码后的文件字节，`mime_type` 为媒体类型标签
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFile {
    /// 原始文件名，批改时作为学生身份的兜底
    pub file_name: String,
    pub content: String,
    pub mime_type: String,
}

impl EncodedFile {
    pub fn new(
        file_name: impl Into<String>,
        content: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
            mime_type: mime_type.into(),
        }
    }
}
