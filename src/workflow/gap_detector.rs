//! 未回答字段的检测与合并

use std::collections::HashMap;
use tracing::debug;

use crate::models::Field;

/// 返回答案缺失或为 "N/A" 的字段（保持原顺序）
pub fn find_unanswered(fields: &[Field]) -> Vec<Field> {
    fields
        .iter()
        .filter(|f| f.is_unanswered())
        .cloned()
        .collect()
}

/// 把补充回答合并回完整字段列表
///
/// 按 `field_id` 匹配，只覆盖原先未回答的条目；新答案仍为 "N/A" 时保持不变。
/// 返回被更新的字段数。
pub fn merge_resolved(fields: &mut [Field], resolved: &[Field]) -> usize {
    let answers: HashMap<&str, &Field> = resolved
        .iter()
        .rev()
        .map(|f| (f.field_id.as_str(), f))
        .collect();

    let mut updated = 0;
    for field in fields.iter_mut().filter(|f| f.is_unanswered()) {
        if let Some(new) = answers.get(field.field_id.as_str()) {
            if !new.is_unanswered() {
                debug!("补充回答: {}", field.field_id);
                field.answer = new.answer.clone();
                updated += 1;
            }
        }
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Answer, FieldType};

    fn answered(id: &str, answer: &str) -> Field {
        Field::new(id, FieldType::ShortText, id).with_answer(Answer::Text(answer.into()))
    }

    fn schema() -> Vec<Field> {
        vec![
            answered("entry.1", "Ada"),
            answered("entry.2", "N/A"),
            answered("entry.3", "London"),
            answered("entry.4", "N/A"),
            answered("entry.5", "1815"),
        ]
    }

    #[test]
    fn test_find_unanswered_keeps_order() {
        let gaps = find_unanswered(&schema());
        let ids: Vec<_> = gaps.iter().map(|f| f.field_id.as_str()).collect();
        assert_eq!(ids, vec!["entry.2", "entry.4"]);
    }

    #[test]
    fn test_find_unanswered_includes_missing_answer() {
        let fields = vec![Field::new("entry.1", FieldType::Date, "When")];
        assert_eq!(find_unanswered(&fields).len(), 1);
        assert!(find_unanswered(&[]).is_empty());
    }

    #[test]
    fn test_merge_updates_only_gaps() {
        let mut fields = schema();
        let before = fields.clone();
        let resolved = vec![
            answered("entry.4", "Mathematician"),
            answered("entry.1", "Someone else"),
            answered("entry.2", "N/A"),
        ];

        assert_eq!(merge_resolved(&mut fields, &resolved), 1);
        assert_eq!(fields[3].answer, Some(Answer::Text("Mathematician".into())));
        for i in [0, 1, 2, 4] {
            assert_eq!(fields[i], before[i]);
        }
    }

    #[test]
    fn test_merge_first_occurrence_wins() {
        let mut fields = vec![answered("entry.2", "N/A")];
        let resolved = vec![answered("entry.2", "first"), answered("entry.2", "second")];
        merge_resolved(&mut fields, &resolved);
        assert_eq!(fields[0].answer, Some(Answer::Text("first".into())));
    }
}
