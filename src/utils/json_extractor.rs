//! 从模型的自由文本输出中提取 JSON 对象
//!
//! 模型输出可能夹杂说明文字、Markdown 代码块、截断或语法错误的片段。
//! 这里按 `{` / `}` 计数找出每个最外层的平衡片段，逐个尝试解析：
//! 解析失败的片段直接跳过，不影响后面的片段。

use serde_json::Value as JsonValue;
use tracing::debug;

/// 按出现顺序返回文本中所有能成功解析的最外层 JSON 对象
///
/// - 嵌套对象只作为外层对象的一部分返回，不单独返回
/// - 在任何 `{` 之前出现的多余 `}` 被忽略
/// - 没有平衡片段时返回空列表
pub fn extract_json_objects(text: &str) -> Vec<JsonValue> {
    let mut objects = Vec::new();
    let mut depth = 0usize;
    let mut start: Option<usize> = None;

    for (i, ch) in text.char_indices() {
        match ch {
            '{' => {
                depth += 1;
                if depth == 1 {
                    start = Some(i);
                }
            }
            '}' => {
                if depth == 0 {
                    continue;
                }
                depth -= 1;
                if depth == 0 {
                    if let Some(begin) = start.take() {
                        let candidate = &text[begin..=i];
                        match serde_json::from_str::<JsonValue>(candidate) {
                            Ok(value) => objects.push(value),
                            Err(e) => debug!("跳过无法解析的 JSON 片段 ({}): {}", e, candidate),
                        }
                    }
                }
            }
            _ => {}
        }
    }

    objects
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_skips_malformed_middle_span() {
        let text = r#"prefix {"a":1} middle {bad} {"b":2} suffix"#;
        let objects = extract_json_objects(text);
        assert_eq!(objects, vec![json!({"a": 1}), json!({"b": 2})]);
    }

    #[test]
    fn test_nested_objects_are_returned_once() {
        let text = r#"{"outer": {"inner": {"x": 1}}, "y": 2}"#;
        let objects = extract_json_objects(text);
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0]["outer"]["inner"]["x"], 1);
    }

    #[test]
    fn test_objects_inside_array_are_returned_individually() {
        let text = "```json\n[\n  {\"field_id\": \"entry.1\"},\n  {\"field_id\": \"entry.2\"}\n]\n```";
        let objects = extract_json_objects(text);
        assert_eq!(
            objects,
            vec![json!({"field_id": "entry.1"}), json!({"field_id": "entry.2"})]
        );
    }

    #[test]
    fn test_leading_unmatched_close_is_ignored() {
        let text = r#"}} oops {"ok": true}"#;
        assert_eq!(extract_json_objects(text), vec![json!({"ok": true})]);
    }

    #[test]
    fn test_empty_and_unbalanced_input() {
        assert!(extract_json_objects("").is_empty());
        assert!(extract_json_objects("no braces here").is_empty());
        assert!(extract_json_objects(r#"{"never": "closed""#).is_empty());
    }

    #[test]
    fn test_multibyte_prose_around_objects() {
        let text = "以下是结果 → {\"answer\": \"café\"} 完成 ✓";
        assert_eq!(extract_json_objects(text), vec![json!({"answer": "café"})]);
    }

    #[test]
    fn test_output_never_exceeds_balanced_spans() {
        let text = "{1} {\"a\": {\"b\": 2}} {} {,}";
        let objects = extract_json_objects(text);
        // 四个平衡片段，其中 `{}` 和第二个合法
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[1], json!({}));
    }
}
