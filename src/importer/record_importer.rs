// ==========================================
// 卖家补货决策系统 - 销售/库存报表导入器
// ==========================================
// 支持: 平台导出的 CSV 报表
// 职责: 文件 → 领域记录; 落库由调用方走仓储层
// ==========================================

use std::fs::File;
use std::path::Path;

use chrono::Utc;
use csv::ReaderBuilder;
use tracing::warn;

use crate::domain::sales::SalesRecord;
use crate::domain::stock::StockRecord;
use crate::domain::types::StockScheme;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};

// ==========================================
// RecordImporter - 报表导入器
// ==========================================
pub struct RecordImporter {
    cleaner: DataCleaner,
}

impl RecordImporter {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    fn open_csv(&self, path: &Path) -> ImportResult<csv::Reader<File>> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        if let Some(ext) = path.extension() {
            if ext != "csv" {
                return Err(ImportError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                ));
            }
        }

        let file = File::open(path)?;
        Ok(ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file))
    }

    /// 解析销售报表 CSV
    ///
    /// 期望表头: sku, offer_id, cluster_to, quantity, revenue_amount, observation_date
    ///
    /// # 返回
    /// 领域销售记录; 单行解析失败记日志后跳过,不中断整个文件
    pub fn parse_sales_csv(
        &self,
        seller_id: &str,
        path: &Path,
    ) -> ImportResult<Vec<SalesRecord>> {
        let mut reader = self.open_csv(path)?;
        let headers = reader.headers()?.clone();
        let col = |name: &str| headers.iter().position(|h| h.trim() == name);

        let sku_idx = col("sku").ok_or_else(|| ImportError::FieldMissing {
            row: 0,
            field: "sku".to_string(),
        })?;
        let offer_idx = col("offer_id").ok_or_else(|| ImportError::FieldMissing {
            row: 0,
            field: "offer_id".to_string(),
        })?;
        let cluster_idx = col("cluster_to");
        let qty_idx = col("quantity").ok_or_else(|| ImportError::FieldMissing {
            row: 0,
            field: "quantity".to_string(),
        })?;
        let revenue_idx = col("revenue_amount").ok_or_else(|| ImportError::FieldMissing {
            row: 0,
            field: "revenue_amount".to_string(),
        })?;
        let date_idx = col("observation_date").ok_or_else(|| ImportError::FieldMissing {
            row: 0,
            field: "observation_date".to_string(),
        })?;

        let mut records = Vec::new();
        for (i, result) in reader.records().enumerate() {
            let row = i + 2; // 含表头的文件行号
            let record = result?;
            let field = |idx: usize| record.get(idx).unwrap_or("").to_string();

            let parsed = (|| -> ImportResult<SalesRecord> {
                Ok(SalesRecord {
                    seller_id: seller_id.to_string(),
                    sku: self.cleaner.parse_quantity(&field(sku_idx), row, "sku")?,
                    offer_id: self.cleaner.clean_text(&field(offer_idx), false),
                    cluster_to: self
                        .cleaner
                        .normalize_null(cluster_idx.map(|idx| field(idx))),
                    quantity: self
                        .cleaner
                        .parse_quantity(&field(qty_idx), row, "quantity")?,
                    revenue_amount: self.cleaner.parse_amount(
                        &field(revenue_idx),
                        row,
                        "revenue_amount",
                    )?,
                    observation_date: self.cleaner.parse_date(
                        &field(date_idx),
                        row,
                        "observation_date",
                    )?,
                })
            })();

            match parsed {
                Ok(record) => records.push(record),
                Err(e) => warn!(row, error = %e, "销售报表行解析失败,已跳过"),
            }
        }

        Ok(records)
    }

    /// 解析库存报表 CSV
    ///
    /// 期望表头: sku, cluster, scheme, free_to_sell, reserved,
    ///           in_transit, requested_supply
    pub fn parse_stock_csv(
        &self,
        seller_id: &str,
        path: &Path,
    ) -> ImportResult<Vec<StockRecord>> {
        let mut reader = self.open_csv(path)?;
        let headers = reader.headers()?.clone();
        let col = |name: &str| headers.iter().position(|h| h.trim() == name);

        let sku_idx = col("sku").ok_or_else(|| ImportError::FieldMissing {
            row: 0,
            field: "sku".to_string(),
        })?;
        let cluster_idx = col("cluster").ok_or_else(|| ImportError::FieldMissing {
            row: 0,
            field: "cluster".to_string(),
        })?;
        let scheme_idx = col("scheme");
        let free_idx = col("free_to_sell").ok_or_else(|| ImportError::FieldMissing {
            row: 0,
            field: "free_to_sell".to_string(),
        })?;
        let reserved_idx = col("reserved");
        let transit_idx = col("in_transit");
        let supply_idx = col("requested_supply");

        let observed_at = Utc::now();
        let mut records = Vec::new();
        for (i, result) in reader.records().enumerate() {
            let row = i + 2;
            let record = result?;
            let field = |idx: usize| record.get(idx).unwrap_or("").to_string();
            let optional = |idx: Option<usize>| idx.map(|i| field(i)).unwrap_or_default();

            let parsed = (|| -> ImportResult<StockRecord> {
                let scheme = match self.cleaner.clean_text(&optional(scheme_idx), true).as_str() {
                    "FBS" => StockScheme::Fbs,
                    _ => StockScheme::Fbo,
                };
                Ok(StockRecord {
                    seller_id: seller_id.to_string(),
                    sku: self.cleaner.parse_quantity(&field(sku_idx), row, "sku")?,
                    cluster: self.cleaner.clean_text(&field(cluster_idx), false),
                    scheme,
                    free_to_sell: self.cleaner.parse_quantity(
                        &field(free_idx),
                        row,
                        "free_to_sell",
                    )?,
                    reserved: self.cleaner.parse_quantity_or(
                        &optional(reserved_idx),
                        0,
                        row,
                        "reserved",
                    )?,
                    in_transit: self.cleaner.parse_quantity_or(
                        &optional(transit_idx),
                        0,
                        row,
                        "in_transit",
                    )?,
                    requested_supply: self.cleaner.parse_quantity_or(
                        &optional(supply_idx),
                        0,
                        row,
                        "requested_supply",
                    )?,
                    observed_at,
                })
            })();

            match parsed {
                Ok(record) => records.push(record),
                Err(e) => warn!(row, error = %e, "库存报表行解析失败,已跳过"),
            }
        }

        Ok(records)
    }
}

impl Default for RecordImporter {
    fn default() -> Self {
        Self::new()
    }
}
