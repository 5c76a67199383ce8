use crate::error::FileError;
use crate::models::answer_key::{AnswerKey, AnswerKeyItem};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// TOML 根节点必须是表，题目放在 `[[questions]]` 下
#[derive(Debug, Serialize, Deserialize)]
struct TomlAnswerKey {
    questions: Vec<AnswerKeyItem>,
}

enum KeyFormat {
    Json,
    Toml,
}

fn key_format(path: &Path) -> Result<KeyFormat, FileError> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => Ok(KeyFormat::Json),
        Some("toml") => Ok(KeyFormat::Toml),
        _ => Err(FileError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// 从 `.json` 或 `.toml` 文件加载标准答案
pub async fn load_answer_key(path: &Path) -> Result<AnswerKey, FileError> {
    let format = key_format(path)?;

    if !path.exists() {
        return Err(FileError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|source| FileError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

    let parse_failed = |message: String| FileError::ParseFailed {
        path: path.to_path_buf(),
        message,
    };

    let key = match format {
        KeyFormat::Json => serde_json::from_str::<AnswerKey>(&content)
            .map_err(|e| parse_failed(e.to_string()))?,
        KeyFormat::Toml => toml::from_str::<TomlAnswerKey>(&content)
            .map(|file| AnswerKey::new(file.questions))
            .map_err(|e| parse_failed(e.to_string()))?,
    };

    tracing::info!(
        "已加载标准答案: {} ({} 道题)",
        path.file_name().unwrap_or_default().to_string_lossy(),
        key.len()
    );

    Ok(key)
}

/// 保存标准答案，按扩展名选择 JSON 或 TOML
pub async fn save_answer_key(key: &AnswerKey, path: &Path) -> Result<(), FileError> {
    let serialize_failed = |message: String| FileError::ParseFailed {
        path: path.to_path_buf(),
        message,
    };

    let content = match key_format(path)? {
        KeyFormat::Json => {
            serde_json::to_string_pretty(key).map_err(|e| serialize_failed(e.to_string()))?
        }
        KeyFormat::Toml => toml::to_string_pretty(&TomlAnswerKey {
            questions: key.items().to_vec(),
        })
        .map_err(|e| serialize_failed(e.to_string()))?,
    };

    fs::write(path, content)
        .await
        .map_err(|source| FileError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::info!("标准答案已保存至: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::answer_key::item;

    fn sample_key() -> AnswerKey {
        AnswerKey::new(vec![
            item(1, &[("Formula", 5.0), ("Final Answer", 5.0)]),
            item(2, &[("Definition", 2.5), ("Example", 1.5), ("Diagram", 1.0)]),
        ])
    }

    #[tokio::test]
    async fn test_json_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.json");

        save_answer_key(&sample_key(), &path).await.unwrap();
        let loaded = load_answer_key(&path).await.unwrap();

        assert_eq!(loaded, sample_key());
    }

    #[tokio::test]
    async fn test_toml_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.toml");
        std::fs::write(
            &path,
            r#"
[[questions]]
question_no = 1
question_text = "Solve 2x + 4 = 10."
type = "Numerical"
ideal_answer = "x = 3"

[[questions.parameters]]
name = "Method"
weightage = 2.0

[[questions.parameters]]
name = "Final Answer"
weightage = 1.0
"#,
        )
        .unwrap();

        let key = load_answer_key(&path).await.unwrap();
        assert_eq!(key.len(), 1);
        assert_eq!(key.items()[0].parameters.len(), 2);
        assert_eq!(key.items()[0].max_score(), 3.0);
    }

    #[tokio::test]
    async fn test_unsupported_extension() {
        let result = load_answer_key(Path::new("key.yaml")).await;
        assert!(matches!(result, Err(FileError::UnsupportedFormat { .. })));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_answer_key(&dir.path().join("absent.json")).await;
        assert!(matches!(result, Err(FileError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.json");
        std::fs::write(&path, "{not json").unwrap();
        let result = load_answer_key(&path).await;
        assert!(matches!(result, Err(FileError::ParseFailed { .. })));
    }
}
