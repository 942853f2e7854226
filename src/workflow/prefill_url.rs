//! 预填链接生成
//!
//! 每个字段按类型生成若干 `field_id=value` 参数，按字段顺序用 `&` 连接后接在基础地址的 `?` 之后：
//!
//! | 答案 / 类型 | 参数 |
//! |---|---|
//! | "N/A" | 不生成 |
//! | 多个值 | 每个值一个 `field_id=value` |
//! | Date | `field_id_year` / `field_id_month` / `field_id_day` |
//! | Time | `field_id_hour` / `field_id_minute` |
//! | 其他 | 一个 `field_id=value` |
//!
//! 日期或时间无法解析时跳过该字段。没有年份的日期取 `reference` 所在的年份。

use chrono::{Datelike, NaiveDate, Timelike};
use tracing::debug;
use urlencoding::encode;

use crate::models::{Answer, Field, FieldType};
use crate::utils::{parse_date, parse_time};

/// 生成预填链接
pub fn build_prefilled_url(fields: &[Field], base_url: &str, reference: NaiveDate) -> String {
    let params: Vec<String> = fields
        .iter()
        .flat_map(|field| field_params(field, reference))
        .collect();
    format!("{}?{}", base_url, params.join("&"))
}

fn pair(key: &str, value: &str) -> String {
    format!("{}={}", key, encode(value))
}

fn field_params(field: &Field, reference: NaiveDate) -> Vec<String> {
    let id = field.field_id.as_str();

    let text = match &field.answer {
        None => return Vec::new(),
        Some(answer) if answer.is_not_available() => return Vec::new(),
        Some(Answer::Choices(values)) => return values.iter().map(|v| pair(id, v)).collect(),
        Some(Answer::Text(text)) => text,
    };

    match field.field_type {
        FieldType::Date => match parse_date(text, reference) {
            Some(date) => vec![
                pair(&format!("{}_year", id), &date.year().to_string()),
                pair(&format!("{}_month", id), &date.month().to_string()),
                pair(&format!("{}_day", id), &date.day().to_string()),
            ],
            None => {
                debug!("无法解析日期 '{}'，跳过字段 {}", text, id);
                Vec::new()
            }
        },
        FieldType::Time => match parse_time(text) {
            Some(time) => vec![
                pair(&format!("{}_hour", id), &time.hour().to_string()),
                pair(&format!("{}_minute", id), &time.minute().to_string()),
            ],
            None => {
                debug!("无法解析时间 '{}'，跳过字段 {}", text, id);
                Vec::new()
            }
        },
        _ => vec![pair(id, text)],
    }
}
