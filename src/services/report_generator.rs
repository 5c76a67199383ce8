//! 报表生成服务 - 业务能力层
//!
//! 把各题数量不一的得分点展开成固定列宽的 CSV：
//!
//! ```text
//! student_id,question_no,parameter_1_name,parameter_1_marks,...,
//! total_score,total_marks_obtained,total_marks_available,remark
//! ```
//!
//! 得分点列数取标准答案中各题得分点数量的最大值。
//! 纯函数，相同输入产生逐字节相同的输出。

use crate::models::{AnswerKey, GradedQuestion, StudentResult};

/// 空占位字段
const EMPTY_FIELD: &str = "\"\"";

/// 加引号并把内部的引号加倍
fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// 数值字段不加引号，整数不带小数点
fn number(value: f64) -> String {
    format!("{}", value)
}

/// 表头
pub fn header(max_params: usize) -> Vec<String> {
    let mut columns = vec!["student_id".to_string(), "question_no".to_string()];
    for i in 1..=max_params {
        columns.push(format!("parameter_{}_name", i));
        columns.push(format!("parameter_{}_marks", i));
    }
    columns.extend(
        [
            "total_score",
            "total_marks_obtained",
            "total_marks_available",
            "remark",
        ]
        .iter()
        .map(|c| c.to_string()),
    );
    columns
}

/// 单道题的一行
pub fn row(student_id: &str, evaluation: &GradedQuestion, max_params: usize) -> Vec<String> {
    let mut fields = vec![quote(student_id), evaluation.question_no.to_string()];

    for i in 0..max_params {
        match evaluation.parameter_scores.get(i) {
            Some(param) => {
                fields.push(quote(&param.name));
                fields.push(number(param.score));
            }
            None => {
                fields.push(EMPTY_FIELD.to_string());
                fields.push(EMPTY_FIELD.to_string());
            }
        }
    }

    // total_score 与 total_marks_obtained 取同一个值
    fields.push(number(evaluation.total_score));
    fields.push(number(evaluation.total_score));
    fields.push(number(evaluation.max_score));
    fields.push(quote(&evaluation.remark));
    fields
}

/// 生成完整的 CSV 文本
///
/// 按结果顺序遍历学生，再按题目顺序逐行输出
pub fn generate_csv(results: &[StudentResult], answer_key: &AnswerKey) -> String {
    let max_params = answer_key.max_parameter_count();

    let mut csv = header(max_params).join(",");
    csv.push('\n');

    for student in results {
        for evaluation in &student.evaluations {
            csv.push_str(&row(&student.student_id, evaluation, max_params).join(","));
            csv.push('\n');
        }
    }

    csv
}

/// 批改汇总中的单个学生
#[derive(Debug, Clone, PartialEq)]
pub struct StudentSummary {
    pub student_id: String,
    pub obtained: f64,
    pub available: f64,
    pub failed: bool,
}

/// 批改汇总
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportSummary {
    pub students: usize,
    pub failed: usize,
    pub rows: usize,
    pub per_student: Vec<StudentSummary>,
}

impl ReportSummary {
    pub fn graded(&self) -> usize {
        self.students - self.failed
    }
}

/// 汇总批改结果
pub fn summarize(results: &[StudentResult]) -> ReportSummary {
    let per_student: Vec<StudentSummary> = results
        .iter()
        .map(|student| StudentSummary {
            student_id: student.student_id.clone(),
            obtained: student.total_obtained(),
            available: student.total_available(),
            failed: student.is_failed(),
        })
        .collect();

    ReportSummary {
        students: results.len(),
        failed: per_student.iter().filter(|s| s.failed).count(),
        rows: results.iter().map(|s| s.evaluations.len()).sum(),
        per_student,
    }
}

/// 分数不一致的类型
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MismatchKind {
    /// total_score 与各得分点之和不一致
    TotalScore { reported: f64, expected: f64 },
    /// max_score 与标准答案中该题满分不一致
    MaxScore { reported: f64, expected: f64 },
    /// 标准答案中没有这道题
    UnknownQuestion,
}

/// 一处分数不一致
#[derive(Debug, Clone, PartialEq)]
pub struct TotalMismatch {
    pub student_id: String,
    pub question_no: u32,
    pub kind: MismatchKind,
}

impl std::fmt::Display for TotalMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            MismatchKind::TotalScore { reported, expected } => write!(
                f,
                "学生 {} | 题目 {} | total_score={} 但得分点之和为 {}",
                self.student_id, self.question_no, reported, expected
            ),
            MismatchKind::MaxScore { reported, expected } => write!(
                f,
                "学生 {} | 题目 {} | max_score={} 但标准答案满分为 {}",
                self.student_id, self.question_no, reported, expected
            ),
            MismatchKind::UnknownQuestion => write!(
                f,
                "学生 {} | 题目 {} | 标准答案中没有该题",
                self.student_id, self.question_no
            ),
        }
    }
}

const TOLERANCE: f64 = 1e-6;

/// 检查模型给出的总分是否自洽
///
/// 只报告不修改，报表仍使用模型返回的原值。失败的哨兵结果不参与检查。
pub fn audit_totals(results: &[StudentResult], answer_key: &AnswerKey) -> Vec<TotalMismatch> {
    let mut mismatches = Vec::new();

    for student in results.iter().filter(|s| !s.is_failed()) {
        for evaluation in &student.evaluations {
            let mismatch = |kind| TotalMismatch {
                student_id: student.student_id.clone(),
                question_no: evaluation.question_no,
                kind,
            };

            let sum = evaluation.parameter_sum();
            if (sum - evaluation.total_score).abs() > TOLERANCE {
                mismatches.push(mismatch(MismatchKind::TotalScore {
                    reported: evaluation.total_score,
                    expected: sum,
                }));
            }

            match answer_key.find(evaluation.question_no) {
                Some(item) => {
                    let expected = item.max_score();
                    if (expected - evaluation.max_score).abs() > TOLERANCE {
                        mismatches.push(mismatch(MismatchKind::MaxScore {
                            reported: evaluation.max_score,
                            expected,
                        }));
                    }
                }
                None => mismatches.push(mismatch(MismatchKind::UnknownQuestion)),
            }
        }
    }

    mismatches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::answer_key::item;
    use crate::models::result::REMARK_FILE_READ_ERROR;
    use crate::models::ParameterScore;

    fn graded(question_no: u32, scores: &[(&str, f64)], total: f64, max: f64, remark: &str) -> GradedQuestion {
        GradedQuestion {
            question_no,
            parameter_scores: scores
                .iter()
                .map(|(name, score)| ParameterScore {
                    name: name.to_string(),
                    score: *score,
                })
                .collect(),
            total_score: total,
            max_score: max,
            remark: remark.to_string(),
        }
    }

    fn alice() -> StudentResult {
        StudentResult {
            student_id: "Alice".to_string(),
            evaluations: vec![graded(
                1,
                &[("Formula", 5.0), ("Final Answer", 0.0)],
                5.0,
                10.0,
                "Correct method, wrong final value.",
            )],
        }
    }

    #[test]
    fn test_single_question_scenario() {
        let key = AnswerKey::new(vec![item(1, &[("Formula", 5.0), ("Final Answer", 5.0)])]);

        let csv = generate_csv(&[alice()], &key);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "student_id,question_no,parameter_1_name,parameter_1_marks,parameter_2_name,parameter_2_marks,total_score,total_marks_obtained,total_marks_available,remark"
        );
        assert_eq!(
            lines[1],
            r#""Alice",1,"Formula",5,"Final Answer",0,5,5,10,"Correct method, wrong final value.""#
        );
        assert_eq!(lines.len(), 2);
        assert!(csv.ends_with('\n'));
    }

    #[test]
    fn test_missing_parameters_are_padded() {
        let key = AnswerKey::new(vec![
            item(1, &[("a", 1.0), ("b", 1.0)]),
            item(2, &[("a", 1.0), ("b", 1.0), ("c", 1.0), ("d", 1.0), ("e", 1.0)]),
            item(3, &[("a", 1.0), ("b", 1.0), ("c", 1.0)]),
        ]);
        let student = StudentResult {
            student_id: "Bob".to_string(),
            evaluations: vec![
                graded(1, &[("a", 1.0), ("b", 0.5)], 1.5, 2.0, "ok"),
                graded(2, &[("a", 1.0), ("b", 1.0)], 2.0, 5.0, "partial"),
                graded(3, &[("a", 1.0), ("b", 1.0), ("c", 1.0)], 3.0, 3.0, "full"),
            ],
        };

        let csv = generate_csv(&[student], &key);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[2],
            r#""Bob",2,"a",1,"b",1,"","","","","","",2,2,5,"partial""#
        );

        let widths: Vec<usize> = lines.iter().map(|l| l.split(',').count()).collect();
        assert!(widths.iter().all(|w| *w == 2 + 5 * 2 + 4));
    }

    #[test]
    fn test_remark_quotes_are_doubled() {
        let student = StudentResult {
            student_id: "Carol".to_string(),
            evaluations: vec![graded(1, &[], 0.0, 1.0, r#"He said "done""#)],
        };
        let key = AnswerKey::new(vec![item(1, &[("a", 1.0)])]);

        let csv = generate_csv(&[student], &key);

        assert!(csv.ends_with(",\"He said \"\"done\"\"\"\n"));
    }

    #[test]
    fn test_failed_result_row() {
        let key = AnswerKey::new(vec![item(1, &[("a", 1.0), ("b", 1.0)])]);
        let failed = StudentResult::failed("scan.png", REMARK_FILE_READ_ERROR);

        let csv = generate_csv(&[failed], &key);

        assert_eq!(
            csv.lines().nth(1).unwrap(),
            r#""scan.png",0,"","","","",0,0,0,"ERROR: File read error or client-side failure.""#
        );
    }

    #[test]
    fn test_fractional_scores() {
        let key = AnswerKey::new(vec![item(1, &[("a", 2.5)])]);
        let student = StudentResult {
            student_id: "D".to_string(),
            evaluations: vec![graded(1, &[("a", 1.5)], 1.5, 2.5, "")],
        };
        let csv = generate_csv(&[student], &key);
        assert_eq!(csv.lines().nth(1).unwrap(), r#""D",1,"a",1.5,1.5,1.5,2.5,"""#);
    }

    #[test]
    fn test_idempotent() {
        let key = AnswerKey::new(vec![item(1, &[("Formula", 5.0), ("Final Answer", 5.0)])]);
        let results = vec![alice(), StudentResult::failed("x.pdf", "ERROR")];
        assert_eq!(generate_csv(&results, &key), generate_csv(&results, &key));
    }

    #[test]
    fn test_empty_results_only_header() {
        let csv = generate_csv(&[], &AnswerKey::default());
        assert_eq!(
            csv,
            "student_id,question_no,total_score,total_marks_obtained,total_marks_available,remark\n"
        );
    }

    #[test]
    fn test_summarize() {
        let results = vec![alice(), StudentResult::failed("x.pdf", "ERROR")];
        let summary = summarize(&results);
        assert_eq!(summary.students, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.graded(), 1);
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.per_student[0].obtained, 5.0);
        assert_eq!(summary.per_student[0].available, 10.0);
    }

    #[test]
    fn test_audit_totals() {
        let key = AnswerKey::new(vec![item(1, &[("Formula", 5.0), ("Final Answer", 5.0)])]);
        let results = vec![
            alice(),
            StudentResult {
                student_id: "Eve".to_string(),
                evaluations: vec![
                    graded(1, &[("Formula", 3.0), ("Final Answer", 3.0)], 7.0, 8.0, ""),
                    graded(4, &[], 0.0, 0.0, ""),
                ],
            },
            StudentResult::failed("x.pdf", "ERROR"),
        ];

        let mismatches = audit_totals(&results, &key);

        assert_eq!(mismatches.len(), 3);
        assert_eq!(
            mismatches[0].kind,
            MismatchKind::TotalScore {
                reported: 7.0,
                expected: 6.0
            }
        );
        assert_eq!(
            mismatches[1].kind,
            MismatchKind::MaxScore {
                reported: 8.0,
                expected: 10.0
            }
        );
        assert_eq!(mismatches[2].kind, MismatchKind::UnknownQuestion);
        assert!(mismatches.iter().all(|m| m.student_id == "Eve"));
    }
}
