//! 答案对齐
//!
//! 模型回答时返回的是整份字段 JSON。这里按 `field_id` 把答案挂回原字段上，
//! 字段本身（顺序、类型、选项）始终以提取出的结构为准。

use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tracing::debug;

use crate::models::{Answer, Field};

/// 用模型返回的记录为字段填上答案
///
/// - 模型没有返回的字段、没有 `answer` 或 `answer` 为 null 的字段记为 "N/A"
/// - 未知的 `field_id` 被忽略
/// - 同一 `field_id` 出现多次时以第一次为准
pub fn reconcile_answers(schema: &[Field], records: &[JsonValue]) -> Vec<Field> {
    let mut answers: HashMap<&str, Option<Answer>> = HashMap::new();

    for record in records {
        let Some(id) = record.get("field_id").and_then(JsonValue::as_str) else {
            debug!("忽略没有 field_id 的回答记录");
            continue;
        };
        let id = id.trim();
        if !schema.iter().any(|f| f.field_id == id) {
            debug!("忽略未知字段的回答: {}", id);
            continue;
        }
        answers
            .entry(id)
            .or_insert_with(|| record.get("answer").and_then(Answer::from_value));
    }

    schema
        .iter()
        .map(|field| {
            let answer = match answers.get(field.field_id.as_str()) {
                Some(Some(answer)) => answer.clone(),
                Some(None) => {
                    debug!("字段 {} 没有答案，记为 N/A", field.field_id);
                    Answer::not_available()
                }
                None => {
                    debug!("模型未返回字段 {}，记为 N/A", field.field_id);
                    Answer::not_available()
                }
            };
            field.without_answer().with_answer(answer)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldType;
    use serde_json::json;

    fn schema() -> Vec<Field> {
        vec![
            Field::new("entry.1", FieldType::ShortText, "Name"),
            Field::new("entry.2", FieldType::Checkbox, "Colours").with_options(["Red", "Blue"]),
            Field::new("entry.3", FieldType::Date, "Birthday"),
        ]
    }

    #[test]
    fn test_answers_attached_by_id() {
        let records = vec![
            json!({"field_id": "entry.2", "field_type": "Checkbox", "answer": ["Red", "Blue"]}),
            json!({"field_id": "entry.1", "field_type": "Paragraph", "answer": "Ada"}),
            json!({"field_id": "entry.3", "answer": "1815-12-10"}),
        ];
        let fields = reconcile_answers(&schema(), &records);

        let ids: Vec<_> = fields.iter().map(|f| f.field_id.as_str()).collect();
        assert_eq!(ids, vec!["entry.1", "entry.2", "entry.3"]);
        assert_eq!(fields[0].field_type, FieldType::ShortText);
        assert_eq!(fields[0].answer, Some(Answer::Text("Ada".into())));
        assert_eq!(
            fields[1].answer,
            Some(Answer::Choices(vec!["Red".into(), "Blue".into()]))
        );
        assert_eq!(fields[1].field_options, vec!["Red", "Blue"]);
    }

    #[test]
    fn test_omitted_and_null_become_not_available() {
        let records = vec![
            json!({"field_id": "entry.1", "answer": null}),
            json!({"field_id": "entry.3"}),
        ];
        let fields = reconcile_answers(&schema(), &records);
        assert!(fields.iter().all(|f| f.answer == Some(Answer::not_available())));
    }

    #[test]
    fn test_unknown_and_duplicate_ids() {
        let records = vec![
            json!({"field_id": "entry.99", "answer": "ghost"}),
            json!({"field_id": "entry.1", "answer": "first"}),
            json!({"field_id": "entry.1", "answer": "second"}),
            json!({"answer": "no id"}),
        ];
        let fields = reconcile_answers(&schema(), &records);
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].answer, Some(Answer::Text("first".into())));
    }

    #[test]
    fn test_empty_string_is_not_coerced() {
        let records = vec![json!({"field_id": "entry.1", "answer": ""})];
        let fields = reconcile_answers(&schema(), &records);
        assert_eq!(fields[0].answer, Some(Answer::Text(String::new())));
    }
}
