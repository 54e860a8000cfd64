// ==========================================
// 卖家补货决策系统 - 必备商品规则导入器
// ==========================================
// 支持: 卖家维护的 Excel 配置表 (.xlsx)
// 容错: 本地化数字串（不间断空格/逗号小数点）
// ==========================================

use std::path::Path;

use calamine::{open_workbook, Reader, Xlsx};
use tracing::warn;

use crate::config::numeric::parse_config_int;
use crate::domain::product::MandatoryRule;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};

// ==========================================
// RulesImporter - 必备规则导入器
// ==========================================
pub struct RulesImporter {
    cleaner: DataCleaner,
}

impl RulesImporter {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    /// 从 Excel 第一个工作表读取必备商品规则
    ///
    /// 期望表头: offer_id, required_total_quantity
    ///
    /// # 返回
    /// 规则列表; 数量列无法解析的行记日志后跳过
    pub fn parse_rules_xlsx(&self, path: &Path) -> ImportResult<Vec<MandatoryRule>> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if ext != "xlsx" {
            return Err(ImportError::UnsupportedFormat(ext.to_string()));
        }

        let mut workbook: Xlsx<_> = open_workbook(path)
            .map_err(|e: calamine::XlsxError| ImportError::ExcelParseError(e.to_string()))?;

        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(ImportError::ExcelParseError(
                "Excel 文件无工作表".to_string(),
            ));
        }
        let sheet_name = sheet_names[0].clone();
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无数据行".to_string()))?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let offer_idx = headers
            .iter()
            .position(|h| h == "offer_id")
            .ok_or_else(|| ImportError::FieldMissing {
                row: 1,
                field: "offer_id".to_string(),
            })?;
        let qty_idx = headers
            .iter()
            .position(|h| h == "required_total_quantity")
            .ok_or_else(|| ImportError::FieldMissing {
                row: 1,
                field: "required_total_quantity".to_string(),
            })?;

        let mut rules = Vec::new();
        for (i, data_row) in rows.enumerate() {
            let row = i + 2;
            let cell = |idx: usize| {
                data_row
                    .get(idx)
                    .map(|c| c.to_string())
                    .unwrap_or_default()
            };

            let offer_id = self.cleaner.clean_text(&cell(offer_idx), false);
            if offer_id.is_empty() {
                continue; // 空行
            }

            // 数量单元格可能带不间断空格千分位/逗号小数点
            match parse_config_int(&cell(qty_idx)) {
                Some(quantity) if quantity > 0 => rules.push(MandatoryRule {
                    offer_id,
                    required_total_quantity: quantity,
                }),
                Some(_) => warn!(row, offer_id = %offer_id, "必备数量非正,已跳过"),
                None => warn!(row, offer_id = %offer_id, "必备数量无法解析,已跳过"),
            }
        }

        Ok(rules)
    }
}

impl Default for RulesImporter {
    fn default() -> Self {
        Self::new()
    }
}
