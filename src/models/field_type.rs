//! 表单字段类型

use phf::phf_map;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 字段类型枚举（封闭集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// 简答
    ShortText,
    /// 段落
    Paragraph,
    /// 单选
    MultipleChoice,
    /// 复选框
    Checkbox,
    /// 下拉列表
    Dropdown,
    /// 文件上传
    FileUpload,
    /// 线性量表
    Scale,
    /// 单选网格
    MultipleChoiceGrid,
    /// 复选框网格
    TickboxGrid,
    /// 日期
    Date,
    /// 时间
    Time,
}

/// 名称别名表，键为去掉空白/标点并转小写后的名称
static FIELD_TYPE_ALIASES: phf::Map<&'static str, FieldType> = phf_map! {
    "shorttext" => FieldType::ShortText,
    "shortanswer" => FieldType::ShortText,
    "text" => FieldType::ShortText,
    "paragraph" => FieldType::Paragraph,
    "paragraphtext" => FieldType::Paragraph,
    "longanswer" => FieldType::Paragraph,
    "multiplechoice" => FieldType::MultipleChoice,
    "radio" => FieldType::MultipleChoice,
    "checkbox" => FieldType::Checkbox,
    "checkboxes" => FieldType::Checkbox,
    "dropdown" => FieldType::Dropdown,
    "listofchoices" => FieldType::Dropdown,
    "list" => FieldType::Dropdown,
    "fileupload" => FieldType::FileUpload,
    "scale" => FieldType::Scale,
    "linearscale" => FieldType::Scale,
    "multiplechoicegrid" => FieldType::MultipleChoiceGrid,
    "tickboxgrid" => FieldType::TickboxGrid,
    "checkboxgrid" => FieldType::TickboxGrid,
    "date" => FieldType::Date,
    "time" => FieldType::Time,
};

impl FieldType {
    /// 所有字段类型，按提示词中的顺序排列
    pub const ALL: [FieldType; 11] = [
        FieldType::ShortText,
        FieldType::Paragraph,
        FieldType::MultipleChoice,
        FieldType::Checkbox,
        FieldType::Dropdown,
        FieldType::FileUpload,
        FieldType::Scale,
        FieldType::MultipleChoiceGrid,
        FieldType::TickboxGrid,
        FieldType::Date,
        FieldType::Time,
    ];

    /// 提示词和 JSON 中使用的标准名称
    pub fn label(self) -> &'static str {
        match self {
            FieldType::ShortText => "Short Text",
            FieldType::Paragraph => "Paragraph",
            FieldType::MultipleChoice => "Multiple Choice",
            FieldType::Checkbox => "Checkbox",
            FieldType::Dropdown => "Dropdown",
            FieldType::FileUpload => "File Upload",
            FieldType::Scale => "Scale",
            FieldType::MultipleChoiceGrid => "Multiple Choice Grid",
            FieldType::TickboxGrid => "Tick Box Grid",
            FieldType::Date => "Date",
            FieldType::Time => "Time",
        }
    }

    /// 该类型是否带有选项列表
    pub fn has_options(self) -> bool {
        matches!(
            self,
            FieldType::MultipleChoice
                | FieldType::Checkbox
                | FieldType::Dropdown
                | FieldType::Scale
                | FieldType::MultipleChoiceGrid
                | FieldType::TickboxGrid
        )
    }

    /// 模型可能返回的任意写法 → 字段类型，无法识别时返回 None
    pub fn parse(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        FIELD_TYPE_ALIASES.get(key.as_str()).copied()
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::parse(s).ok_or_else(|| format!("未知的字段类型: {}", s))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels_round_trip() {
        for ty in FieldType::ALL {
            assert_eq!(FieldType::parse(ty.label()), Some(ty));
        }
    }

    #[test]
    fn test_parse_tolerates_spelling_variants() {
        assert_eq!(FieldType::parse("short_text"), Some(FieldType::ShortText));
        assert_eq!(FieldType::parse("ShortText"), Some(FieldType::ShortText));
        assert_eq!(FieldType::parse("List of Choices"), Some(FieldType::Dropdown));
        assert_eq!(FieldType::parse("tick-box grid"), Some(FieldType::TickboxGrid));
        assert_eq!(FieldType::parse(" Checkboxes "), Some(FieldType::Checkbox));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(FieldType::parse("Signature"), None);
        assert_eq!(FieldType::parse(""), None);
        assert!("Rating".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_only_choice_types_have_options() {
        assert!(FieldType::Checkbox.has_options());
        assert!(FieldType::Scale.has_options());
        assert!(!FieldType::ShortText.has_options());
        assert!(!FieldType::Date.has_options());
    }

    #[test]
    fn test_serializes_as_label() {
        let json = serde_json::to_string(&FieldType::TickboxGrid).unwrap();
        assert_eq!(json, "\"Tick Box Grid\"");
    }
}
