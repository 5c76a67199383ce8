//! 标准答案与评分细则
//!
//! 由答案生成服务一次性产出，之后在整个批改过程中只读

use serde::{Deserialize, Serialize};

/// 评分参数（一个得分点）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationParameter {
    pub name: String,
    /// 该得分点的满分
    pub weightage: f64,
}

/// 题目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    Numerical,
    Theory,
    Coding,
    Diagram,
    Other,
}

impl QuestionType {
    pub const ALL: [QuestionType; 5] = [
        QuestionType::Numerical,
        QuestionType::Theory,
        QuestionType::Coding,
        QuestionType::Diagram,
        QuestionType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Numerical => "Numerical",
            QuestionType::Theory => "Theory",
            QuestionType::Coding => "Coding",
            QuestionType::Diagram => "Diagram",
            QuestionType::Other => "Other",
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 单道题的标准答案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerKeyItem {
    pub question_no: u32,
    pub question_text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub ideal_answer: String,
    /// 通常 2-5 个得分点，不强制
    pub parameters: Vec<EvaluationParameter>,
}

impl AnswerKeyItem {
    /// 本题满分：所有得分点满分之和
    pub fn max_score(&self) -> f64 {
        self.parameters.iter().map(|p| p.weightage).sum()
    }
}

/// 整份标准答案，按题号顺序排列
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerKey {
    items: Vec<AnswerKeyItem>,
}

impl AnswerKey {
    pub fn new(items: Vec<AnswerKeyItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[AnswerKeyItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 按题号查找
    pub fn find(&self, question_no: u32) -> Option<&AnswerKeyItem> {
        self.items.iter().find(|item| item.question_no == question_no)
    }

    /// 所有题目中得分点数量的最大值，决定导出表格的列数
    pub fn max_parameter_count(&self) -> usize {
        self.items
            .iter()
            .map(|item| item.parameters.len())
            .max()
            .unwrap_or(0)
    }

    /// 整份试卷满分
    pub fn total_marks(&self) -> f64 {
        self.items.iter().map(AnswerKeyItem::max_score).sum()
    }

    /// 重复出现的题号（题号应唯一，但不强制）
    pub fn duplicate_question_numbers(&self) -> Vec<u32> {
        let mut seen = std::collections::HashSet::new();
        let mut duplicates = Vec::new();
        for item in &self.items {
            if !seen.insert(item.question_no) && !duplicates.contains(&item.question_no) {
                duplicates.push(item.question_no);
            }
        }
        duplicates
    }
}

impl From<Vec<AnswerKeyItem>> for AnswerKey {
    fn from(items: Vec<AnswerKeyItem>) -> Self {
        Self::new(items)
    }
}

#[cfg(test)]
pub(crate) fn item(question_no: u32, params: &[(&str, f64)]) -> AnswerKeyItem {
    AnswerKeyItem {
        question_no,
        question_text: format!("Question {}", question_no),
        question_type: QuestionType::Numerical,
        ideal_answer: "ideal".to_string(),
        parameters: params
            .iter()
            .map(|(name, weightage)| EvaluationParameter {
                name: name.to_string(),
                weightage: *weightage,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_remote_shape() {
        let json = r#"[{
            "question_no": 1,
            "question_text": "Define gravity.",
            "type": "Theory",
            "ideal_answer": "Gravity is ...",
            "parameters": [
                {"name": "Definition", "weightage": 3},
                {"name": "Example", "weightage": 2}
            ]
        }]"#;

        let key: AnswerKey = serde_json::from_str(json).unwrap();
        assert_eq!(key.len(), 1);
        let first = &key.items()[0];
        assert_eq!(first.question_type, QuestionType::Theory);
        assert_eq!(first.max_score(), 5.0);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let json = r#"[{"question_no":1,"question_text":"q","type":"Essay","ideal_answer":"a","parameters":[]}]"#;
        assert!(serde_json::from_str::<AnswerKey>(json).is_err());
    }

    #[test]
    fn test_max_parameter_count() {
        let key = AnswerKey::new(vec![
            item(1, &[("a", 1.0), ("b", 1.0)]),
            item(2, &[("a", 1.0), ("b", 1.0), ("c", 1.0), ("d", 1.0), ("e", 1.0)]),
            item(3, &[("a", 1.0), ("b", 1.0), ("c", 1.0)]),
        ]);
        assert_eq!(key.max_parameter_count(), 5);
        assert_eq!(AnswerKey::default().max_parameter_count(), 0);
        assert_eq!(key.total_marks(), 10.0);
    }

    #[test]
    fn test_duplicate_question_numbers() {
        let key = AnswerKey::new(vec![item(1, &[]), item(2, &[]), item(1, &[]), item(1, &[])]);
        assert_eq!(key.duplicate_question_numbers(), vec![1]);
        assert!(key.find(2).is_some());
        assert!(key.find(9).is_none());
    }
}
