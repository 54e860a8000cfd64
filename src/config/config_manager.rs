// ==========================================
// 卖家补货决策系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、卖家级覆写
// 存储: config_kv 表 (key-value + scope)
// 作用域: scope_id = 卖家账号,逐键回落到 'global'
// ==========================================

use crate::config::config_reader_trait::PlannerConfigReader;
use crate::config::numeric::{parse_config_int_or, parse_config_number, parse_config_number_or};
use crate::config::planner_settings::PlannerSettings;
use crate::db::open_sqlite_connection;
use crate::domain::types::{AllocationMode, BudgetMode, SortKey};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致,会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值
    ///
    /// 查找顺序: scope_id = seller_id → scope_id = 'global'
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 两级作用域都不存在
    fn get_config_value(
        &self,
        seller_id: &str,
        key: &str,
    ) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        for scope in [seller_id, "global"] {
            let result = conn.query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![scope, key],
                |row| row.get::<_, String>(0),
            );

            match result {
                Ok(value) => return Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => continue,
                Err(e) => return Err(Box::new(e)),
            }
        }

        Ok(None)
    }

    /// 读取配置值,带默认值
    fn get_config_or_default(
        &self,
        seller_id: &str,
        key: &str,
        default: &str,
    ) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_config_value(seller_id, key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 获取卖家生效配置的快照（JSON格式,含 global 回落后的合并视图）
    ///
    /// # 用途
    /// - 运行落库时记录配置快照,保证结果可追溯
    pub fn get_config_snapshot(&self, seller_id: &str) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id IN (?1, 'global')
             ORDER BY CASE scope_id WHEN 'global' THEN 0 ELSE 1 END, key",
        )?;

        // global 先写入,卖家级覆写后写入的同名键
        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map(params![seller_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 写入卖家作用域的配置值（UPSERT）
    pub fn set_config_value(
        &self,
        seller_id: &str,
        key: &str,
        value: &str,
    ) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3",
            params![seller_id, key, value],
        )?;

        Ok(())
    }

    // ===== 分析窗口配置 =====

    /// 追溯天数（默认 30）
    pub fn get_lookback_days(&self, seller_id: &str) -> Result<i64, Box<dyn Error>> {
        let value = self.get_config_or_default(seller_id, config_keys::LOOKBACK_DAYS, "30")?;
        Ok(parse_config_int_or(&value, 30).max(0))
    }

    /// 备货覆盖天数（默认 10）
    pub fn get_supply_period_days(&self, seller_id: &str) -> Result<i64, Box<dyn Error>> {
        let value =
            self.get_config_or_default(seller_id, config_keys::SUPPLY_PERIOD_DAYS, "10")?;
        Ok(parse_config_int_or(&value, 10).max(0))
    }

    // ===== 补货分配配置 =====

    /// 分配模式（默认 EVEN）
    pub fn get_allocation_mode(&self, seller_id: &str) -> Result<AllocationMode, Box<dyn Error>> {
        // 加权开关与模式串合并为单一口径: weighting_enabled 优先生效
        let weighting =
            self.get_config_or_default(seller_id, config_keys::WEIGHTING_ENABLED, "")?;
        match weighting.trim() {
            "1" | "true" | "TRUE" => return Ok(AllocationMode::Weighted),
            _ => {}
        }

        let value = self.get_config_or_default(seller_id, config_keys::ALLOCATION_MODE, "EVEN")?;
        Ok(AllocationMode::from_config_str(&value))
    }

    /// 加权模式份额阈值（默认 0.1）
    pub fn get_share_threshold(&self, seller_id: &str) -> Result<f64, Box<dyn Error>> {
        let value = self.get_config_or_default(seller_id, config_keys::SHARE_THRESHOLD, "0.1")?;
        Ok(parse_config_number_or(&value, 0.1))
    }

    /// 是否保留非正建议行（默认 false）
    pub fn get_include_all(&self, seller_id: &str) -> Result<bool, Box<dyn Error>> {
        let value = self.get_config_or_default(seller_id, config_keys::INCLUDE_ALL, "0")?;
        Ok(matches!(value.trim(), "1" | "true" | "TRUE"))
    }

    // ===== 商品筛选配置 =====

    /// 价格带（任一侧缺省即不设限）
    pub fn get_price_band(
        &self,
        seller_id: &str,
    ) -> Result<(Option<f64>, Option<f64>), Box<dyn Error>> {
        let min = self
            .get_config_value(seller_id, config_keys::PRICE_MIN)?
            .as_deref()
            .and_then(parse_config_number);
        let max = self
            .get_config_value(seller_id, config_keys::PRICE_MAX)?
            .as_deref()
            .and_then(parse_config_number);
        Ok((min, max))
    }

    /// 周转带（任一侧缺省即不设限）
    pub fn get_turnover_band(
        &self,
        seller_id: &str,
    ) -> Result<(Option<f64>, Option<f64>), Box<dyn Error>> {
        let min = self
            .get_config_value(seller_id, config_keys::MIN_TURNOVER)?
            .as_deref()
            .and_then(parse_config_number);
        let max = self
            .get_config_value(seller_id, config_keys::MAX_TURNOVER)?
            .as_deref()
            .and_then(parse_config_number);
        Ok((min, max))
    }

    /// 展示口径库存下限（默认 0）
    pub fn get_min_required_stock(&self, seller_id: &str) -> Result<i64, Box<dyn Error>> {
        let value =
            self.get_config_or_default(seller_id, config_keys::MIN_REQUIRED_STOCK, "0")?;
        Ok(parse_config_int_or(&value, 0).max(0))
    }

    /// 排除货号清单（逗号分隔）
    pub fn get_excluded_offer_ids(&self, seller_id: &str) -> Result<Vec<String>, Box<dyn Error>> {
        let value =
            self.get_config_or_default(seller_id, config_keys::EXCLUDED_OFFER_IDS, "")?;

        let offer_ids: Vec<String> = value
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(offer_ids)
    }

    // ===== ABC 分级配置 =====

    /// ABC 三档营收份额（默认 0.8 / 0.15 / 0.05）
    pub fn get_abc_shares(&self, seller_id: &str) -> Result<(f64, f64, f64), Box<dyn Error>> {
        let a = self.get_config_or_default(seller_id, config_keys::ABC_A_SHARE, "0.8")?;
        let b = self.get_config_or_default(seller_id, config_keys::ABC_B_SHARE, "0.15")?;
        let c = self.get_config_or_default(seller_id, config_keys::ABC_C_SHARE, "0.05")?;

        Ok((
            parse_config_number_or(&a, 0.8),
            parse_config_number_or(&b, 0.15),
            parse_config_number_or(&c, 0.05),
        ))
    }

    // ===== 输出配置 =====

    /// 结果排序口径（默认按销量）
    pub fn get_sort_key(&self, seller_id: &str) -> Result<SortKey, Box<dyn Error>> {
        let value = self.get_config_or_default(seller_id, config_keys::SORT_KEY, "QUANTITY")?;
        Ok(SortKey::from_config_str(&value))
    }

    // ===== 广告预算配置 =====

    /// 周预算目标（默认 0 = 不分配）
    pub fn get_week_budget(&self, seller_id: &str) -> Result<i64, Box<dyn Error>> {
        let value = self.get_config_or_default(seller_id, config_keys::WEEK_BUDGET, "0")?;
        Ok(parse_config_int_or(&value, 0).max(0))
    }

    /// 单品最低周投放（默认 500）
    pub fn get_min_budget(&self, seller_id: &str) -> Result<i64, Box<dyn Error>> {
        let value = self.get_config_or_default(seller_id, config_keys::MIN_BUDGET, "500")?;
        Ok(parse_config_int_or(&value, 500).max(0))
    }

    /// 候选数硬性上限（缺省即按预算推导）
    pub fn get_max_items(&self, seller_id: &str) -> Result<Option<usize>, Box<dyn Error>> {
        let value = self.get_config_value(seller_id, config_keys::MAX_ITEMS)?;
        Ok(value
            .as_deref()
            .and_then(parse_config_number)
            .filter(|v| *v > 0.0)
            .map(|v| v.round() as usize))
    }

    /// 预算分配模式（默认 EVEN）
    pub fn get_budget_mode(&self, seller_id: &str) -> Result<BudgetMode, Box<dyn Error>> {
        let value = self.get_config_or_default(seller_id, config_keys::BUDGET_MODE, "EVEN")?;
        Ok(BudgetMode::from_config_str(&value))
    }

    /// 预算候选筛选开关（价格带 / 库存下限 / 已有广告排除,默认全开）
    pub fn get_budget_filters(&self, seller_id: &str) -> Result<(bool, bool, bool), Box<dyn Error>> {
        let flag = |key: &str| -> Result<bool, Box<dyn Error>> {
            let value = self.get_config_or_default(seller_id, key, "1")?;
            Ok(matches!(value.trim(), "1" | "true" | "TRUE"))
        };

        Ok((
            flag(config_keys::BUDGET_FILTER_PRICE)?,
            flag(config_keys::BUDGET_FILTER_STOCK)?,
            flag(config_keys::BUDGET_FILTER_CAMPAIGNED)?,
        ))
    }
}

// ==========================================
// PlannerConfigReader Trait 实现
// ==========================================
#[async_trait]
impl PlannerConfigReader for ConfigManager {
    async fn load_planner_settings(
        &self,
        seller_id: &str,
    ) -> Result<PlannerSettings, Box<dyn Error>> {
        let (price_min, price_max) = self.get_price_band(seller_id)?;
        let (min_turnover, max_turnover) = self.get_turnover_band(seller_id)?;
        let (abc_a_share, abc_b_share, abc_c_share) = self.get_abc_shares(seller_id)?;
        let (budget_filter_price, budget_filter_stock, budget_filter_campaigned) =
            self.get_budget_filters(seller_id)?;

        Ok(PlannerSettings {
            lookback_days: self.get_lookback_days(seller_id)?,
            supply_period_days: self.get_supply_period_days(seller_id)?,
            allocation_mode: self.get_allocation_mode(seller_id)?,
            share_threshold: self.get_share_threshold(seller_id)?,
            include_all: self.get_include_all(seller_id)?,
            price_min,
            price_max,
            min_turnover,
            max_turnover,
            min_required_stock: self.get_min_required_stock(seller_id)?,
            excluded_offer_ids: self.get_excluded_offer_ids(seller_id)?,
            abc_a_share,
            abc_b_share,
            abc_c_share,
            sort_key: self.get_sort_key(seller_id)?,
            week_budget: self.get_week_budget(seller_id)?,
            min_budget: self.get_min_budget(seller_id)?,
            max_items: self.get_max_items(seller_id)?,
            budget_mode: self.get_budget_mode(seller_id)?,
            budget_filter_price,
            budget_filter_stock,
            budget_filter_campaigned,
        })
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 分析窗口
    pub const LOOKBACK_DAYS: &str = "lookback_days";
    pub const SUPPLY_PERIOD_DAYS: &str = "supply_period_days";

    // 补货分配
    pub const ALLOCATION_MODE: &str = "allocation_mode";
    pub const WEIGHTING_ENABLED: &str = "weighting_enabled";
    pub const SHARE_THRESHOLD: &str = "share_threshold";
    pub const INCLUDE_ALL: &str = "include_all";

    // 商品筛选
    pub const PRICE_MIN: &str = "price_min";
    pub const PRICE_MAX: &str = "price_max";
    pub const MIN_TURNOVER: &str = "min_turnover";
    pub const MAX_TURNOVER: &str = "max_turnover";
    pub const MIN_REQUIRED_STOCK: &str = "min_required_stock";
    pub const EXCLUDED_OFFER_IDS: &str = "excluded_offer_ids";

    // ABC 分级
    pub const ABC_A_SHARE: &str = "abc_a_share";
    pub const ABC_B_SHARE: &str = "abc_b_share";
    pub const ABC_C_SHARE: &str = "abc_c_share";

    // 输出
    pub const SORT_KEY: &str = "sort_key";

    // 广告预算
    pub const WEEK_BUDGET: &str = "week_budget";
    pub const MIN_BUDGET: &str = "min_budget";
    pub const MAX_ITEMS: &str = "max_items";
    pub const BUDGET_MODE: &str = "budget_mode";
    pub const BUDGET_FILTER_PRICE: &str = "budget_filter_price";
    pub const BUDGET_FILTER_STOCK: &str = "budget_filter_stock";
    pub const BUDGET_FILTER_CAMPAIGNED: &str = "budget_filter_campaigned";
}
