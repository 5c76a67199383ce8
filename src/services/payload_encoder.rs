//! 文件编码服务 - 业务能力层
//!
//! 只负责"把文件变成可传输内容"的能力

use std::path::Path;

use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use tokio::fs;
use tracing::debug;

use crate::error::EncodingError;
use crate::models::EncodedFile;

/// 读取文件并编码为 base64，附带媒体类型
///
/// 读取失败返回 `EncodingError`，由调用方决定如何兜底
pub async fn encode_file(path: &Path) -> Result<EncodedFile, EncodingError> {
    let bytes = fs::read(path).await.map_err(|source| EncodingError {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(encode_bytes(file_name_of(path), &bytes, media_type_of(path)))
}

/// 编码内存中的文件内容
pub fn encode_bytes(file_name: impl Into<String>, bytes: &[u8], mime_type: impl Into<String>) -> EncodedFile {
    let file_name = file_name.into();
    let mime_type = mime_type.into();
    debug!(
        "编码文件 {} ({} 字节, {})",
        file_name,
        bytes.len(),
        mime_type
    );
    EncodedFile::new(file_name, B64.encode(bytes), mime_type)
}

/// 文件名（不含目录），用作身份兜底
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// 根据扩展名推断媒体类型
pub fn media_type_of(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_encode_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alice.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let encoded = encode_file(&path).await.unwrap();

        assert_eq!(encoded.file_name, "alice.pdf");
        assert_eq!(encoded.mime_type, "application/pdf");
        assert_eq!(encoded.content, "JVBERi0xLjQ=");
    }

    #[tokio::test]
    async fn test_missing_file_is_encoding_error() {
        let path = PathBuf::from("/no/such/booklet.png");
        let err = encode_file(&path).await.unwrap_err();
        assert_eq!(err.path, path);
        assert_eq!(err.source.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_media_types() {
        assert_eq!(media_type_of(Path::new("a.png")), "image/png");
        assert_eq!(media_type_of(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(
            media_type_of(Path::new("a.unknownext")),
            "application/octet-stream"
        );
    }
}
