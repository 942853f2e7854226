//! 表单字段与答案
//!
//! 字段由模型输出的 JSON 记录转换而来：缺少必需键或类型无法识别的记录会被丢弃，
//! 不会影响同一批次中的其他记录。

use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use tracing::debug;

use crate::models::field_type::FieldType;

/// 无法确定答案时使用的哨兵值
pub const NOT_AVAILABLE: &str = "N/A";

/// 字段答案
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Answer {
    /// 单个值（包括哨兵 "N/A"）
    Text(String),
    /// 多选值，保持顺序
    Choices(Vec<String>),
}

impl Answer {
    /// 哨兵答案
    pub fn not_available() -> Self {
        Answer::Text(NOT_AVAILABLE.to_string())
    }

    /// 是否为哨兵 "N/A"
    pub fn is_not_available(&self) -> bool {
        matches!(self, Answer::Text(s) if s.trim() == NOT_AVAILABLE)
    }

    /// 从模型返回的任意 JSON 值转换答案
    ///
    /// `null` 视为没有答案；数字和布尔值按字符串形式保存；数组中的 `null` 被跳过。
    pub fn from_value(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Null => None,
            JsonValue::String(s) => Some(Answer::Text(s.clone())),
            JsonValue::Array(items) => Some(Answer::Choices(
                items
                    .iter()
                    .filter(|v| !v.is_null())
                    .map(json_to_text)
                    .collect(),
            )),
            other => Some(Answer::Text(json_to_text(other))),
        }
    }
}

fn json_to_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 表单字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// 字段标识，表单内唯一，提取后不再改变
    pub field_id: String,
    pub field_type: FieldType,
    /// 问题标题和描述（网格题包含行标签）
    pub field_text: String,
    /// 选项列表，只有带选项的类型才非空
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub field_options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<Answer>,
}

impl Field {
    pub fn new(
        field_id: impl Into<String>,
        field_type: FieldType,
        field_text: impl Into<String>,
    ) -> Self {
        Self {
            field_id: field_id.into(),
            field_type,
            field_text: field_text.into(),
            field_options: Vec::new(),
            answer: None,
        }
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field_options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_answer(mut self, answer: Answer) -> Self {
        self.answer = Some(answer);
        self
    }

    /// 尝试把一条 JSON 记录转换为字段
    ///
    /// 必须包含非空的 `field_id`、可识别的 `field_type` 和字符串 `field_text`。
    /// 记录中已有的 `answer` 会被忽略。
    pub fn from_record(record: &JsonValue) -> Option<Self> {
        let field_id = record.get("field_id")?.as_str()?.trim();
        if field_id.is_empty() {
            return None;
        }
        let raw_type = record.get("field_type")?.as_str()?;
        let field_type = match FieldType::parse(raw_type) {
            Some(ty) => ty,
            None => {
                debug!("丢弃字段 {}: 无法识别的类型 '{}'", field_id, raw_type);
                return None;
            }
        };
        let field_text = record.get("field_text")?.as_str()?.to_string();

        let field_options = if field_type.has_options() {
            match record.get("field_options") {
                Some(JsonValue::Array(items)) => items
                    .iter()
                    .filter(|v| !v.is_null())
                    .map(json_to_text)
                    .collect(),
                _ => Vec::new(),
            }
        } else {
            Vec::new()
        };

        Some(Self {
            field_id: field_id.to_string(),
            field_type,
            field_text,
            field_options,
            answer: None,
        })
    }

    /// 是否仍未回答（答案缺失或为 "N/A"）
    pub fn is_unanswered(&self) -> bool {
        self.answer.as_ref().map_or(true, Answer::is_not_available)
    }

    /// 去掉答案的副本，用于重新提问
    pub fn without_answer(&self) -> Self {
        Self {
            answer: None,
            ..self.clone()
        }
    }
}

/// 把一批 JSON 记录转换为字段，丢弃无效记录和重复的 `field_id`（保留第一次出现）
pub fn coerce_fields(records: &[JsonValue]) -> Vec<Field> {
    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(records.len());

    for record in records {
        match Field::from_record(record) {
            Some(field) => {
                if seen.insert(field.field_id.clone()) {
                    fields.push(field);
                } else {
                    debug!("丢弃重复字段: {}", field.field_id);
                }
            }
            None => debug!("丢弃无效字段记录: {}", record),
        }
    }

    fields
}
