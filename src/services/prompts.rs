//! 提示词与输出结构
//!
//! 评分细则设计策略、批改策略，以及约束模型输出的 JSON schema

use serde_json::{json, Value as JsonValue};

use crate::models::QuestionType;

/// 答案生成指令：题目提取、标准答案、部分得分的评分点设计、题型分类
pub const KEY_SYNTHESIS_INSTRUCTION: &str = r#"You are the Booklet Review System, preparing an answer key for automated grading.

TASKS:
1. Extract every question from the supplied text and/or documents. Keep the original numbering; if none exists, number them in order starting at 1.
2. Write a complete ideal answer for each question.
   - Numerical: formula, working steps and the final result.
   - Coding: clean, correct code.
   - Theory: the key concepts and the keywords a full answer must contain.
3. Define 2 to 5 evaluation parameters per question that allow partial credit. Prefer granular parameters such as "Formula", "Method", "Calculation", "Final Answer" over a single "Correctness" parameter.
4. Give every parameter a weightage (its maximum marks). The question's maximum marks is the sum of its parameter weightages.
5. Classify each question as Numerical, Theory, Coding, Diagram or Other.

OUTPUT:
A JSON array with one object per question, matching the response schema."#;

/// 批改指令：模型自行识别文字、按上下文对应题号、给部分分、分数求和规则
pub const GRADING_INSTRUCTION: &str = r#"You are the Booklet Review System, grading one student's answer booklet against the answer key below.

RULES:
1. Text extraction: the booklet is a raw document (PDF or image). Read all handwritten and printed text yourself.
2. Answer mapping: answers may not be numbered. Use the content to map each answer to the right question number.
3. Partial credit:
   - A wrong final answer alone is not a reason to give zero.
   - Award marks for correct formulas, correct logic or approach, valid definitions and correct partial steps.
   - total_score is the sum of the awarded parameter scores.
   - max_score is the sum of the parameter weightages of the matching answer key question.
   - Give zero only when the response is blank or unrelated to the question.
4. Score each question against its evaluation parameters, using the parameter names from the answer key.
5. Remark: give a specific, constructive reason for the score.
6. student_id: the student's name or roll number if it is visible in the booklet, otherwise "unknown".

OUTPUT:
A JSON object matching the response schema."#;

/// 题目文本段前缀
pub fn question_text_part(questions_text: &str) -> String {
    format!("Question Text Input:\n{}", questions_text)
}

/// 标准答案段
pub fn answer_key_part(answer_key_json: &str) -> String {
    format!("[ANSWER KEY & PARAMETERS]\n{}", answer_key_json)
}

/// 文件名提示段，仅作为身份的弱提示
pub fn file_name_part(file_name: &str) -> String {
    format!("Filename: {}", file_name)
}

/// 标准答案数组的输出结构
pub fn answer_key_schema() -> JsonValue {
    let types: Vec<&str> = QuestionType::ALL.iter().map(|t| t.as_str()).collect();
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "question_no": { "type": "INTEGER" },
                "question_text": { "type": "STRING" },
                "type": { "type": "STRING", "enum": types },
                "ideal_answer": { "type": "STRING" },
                "parameters": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "name": { "type": "STRING" },
                            "weightage": { "type": "NUMBER" }
                        },
                        "required": ["name", "weightage"]
                    }
                }
            },
            "required": ["question_no", "question_text", "type", "ideal_answer", "parameters"]
        }
    })
}

/// 单份答卷批改结果的输出结构
pub fn student_result_schema() -> JsonValue {
    json!({
        "type": "OBJECT",
        "properties": {
            "student_id": {
                "type": "STRING",
                "description": "Student name or ID if visible in the booklet, otherwise \"unknown\""
            },
            "evaluations": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "question_no": { "type": "INTEGER" },
                        "parameter_scores": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "name": { "type": "STRING" },
                                    "score": { "type": "NUMBER" }
                                },
                                "required": ["name", "score"]
                            }
                        },
                        "total_score": {
                            "type": "NUMBER",
                            "description": "Sum of parameter_scores (marks obtained)"
                        },
                        "max_score": {
                            "type": "NUMBER",
                            "description": "Sum of parameter weightages (marks available)"
                        },
                        "remark": { "type": "STRING" }
                    },
                    "required": ["question_no", "parameter_scores", "total_score", "max_score", "remark"]
                }
            }
        },
        "required": ["student_id", "evaluations"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_key_schema_lists_all_types() {
        let schema = answer_key_schema();
        let types = schema["items"]["properties"]["type"]["enum"]
            .as_array()
            .unwrap();
        assert_eq!(types.len(), 5);
        assert!(types.contains(&json!("Diagram")));
    }

    #[test]
    fn test_student_schema_required_fields() {
        let schema = student_result_schema();
        assert_eq!(schema["required"], json!(["student_id", "evaluations"]));
    }
}
