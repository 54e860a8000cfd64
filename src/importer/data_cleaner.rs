// ==========================================
// 卖家补货决策系统 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 本地化数值清洗 / 日期解析
// ==========================================

use chrono::NaiveDate;

use crate::config::numeric::{parse_config_int, parse_config_number};
use crate::importer::error::{ImportError, ImportResult};

pub struct DataCleaner;

impl DataCleaner {
    /// 清洗文本字段（TRIM,可选 UPPER）
    pub fn clean_text(&self, value: &str, uppercase: bool) -> String {
        let trimmed = value.trim();
        if uppercase {
            trimmed.to_uppercase()
        } else {
            trimmed.to_string()
        }
    }

    /// 空白串标准化为 None
    pub fn normalize_null(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// 解析日期（YYYY-MM-DD 或 YYYYMMDD）
    pub fn parse_date(&self, value: &str, row: usize, field: &str) -> ImportResult<NaiveDate> {
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(value.trim(), "%Y%m%d"))
            .map_err(|_| ImportError::DateFormatError {
                row,
                field: field.to_string(),
                value: value.to_string(),
            })
    }

    /// 解析数量字段（本地化数字串容错,失败报行级错误）
    pub fn parse_quantity(&self, value: &str, row: usize, field: &str) -> ImportResult<i64> {
        parse_config_int(value).ok_or_else(|| ImportError::TypeConversionError {
            row,
            field: field.to_string(),
            message: format!("无法解析整数: {:?}", value),
        })
    }

    /// 解析金额字段（本地化数字串容错,失败报行级错误）
    pub fn parse_amount(&self, value: &str, row: usize, field: &str) -> ImportResult<f64> {
        parse_config_number(value).ok_or_else(|| ImportError::TypeConversionError {
            row,
            field: field.to_string(),
            message: format!("无法解析数值: {:?}", value),
        })
    }

    /// 解析可缺省的数量字段（空白回落默认值,脏值报错）
    pub fn parse_quantity_or(
        &self,
        value: &str,
        default: i64,
        row: usize,
        field: &str,
    ) -> ImportResult<i64> {
        if value.trim().is_empty() {
            return Ok(default);
        }
        self.parse_quantity(value, row, field)
    }
}
