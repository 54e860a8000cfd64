// ==========================================
// 卖家补货决策系统 - 配置数值解析
// ==========================================
// 职责: 表格来源的本地化数字串标准化
// 输入形态: 不间断空格千分位 / 逗号小数点 / 已是数值
// 红线: 解析失败回落默认值,不中断整轮运行
// ==========================================

/// 解析表格配置中的数值
///
/// 处理的输入形态:
/// - 普通数字: "123.45"
/// - 逗号小数点: "123,45"
/// - 不间断空格千分位: "12\u{a0}345,60"、窄不间断空格 "\u{202f}"
/// - 普通空格千分位: "12 345"
/// - 空串 / 纯空白
///
/// # 返回
/// - Some(f64): 解析成功
/// - None: 无法解析（调用方回落默认值）
pub fn parse_config_number(raw: &str) -> Option<f64> {
    let mut cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}' | '\u{202f}' | '\t'))
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    // 逗号与点同时出现时视逗号为千分位,否则视逗号为小数点
    if cleaned.contains(',') && cleaned.contains('.') {
        cleaned = cleaned.replace(',', "");
    } else {
        cleaned = cleaned.replace(',', ".");
    }

    cleaned.parse::<f64>().ok()
}

/// 解析表格配置中的整数值（小数部分四舍五入）
pub fn parse_config_int(raw: &str) -> Option<i64> {
    parse_config_number(raw).map(|v| v.round() as i64)
}

/// 带默认值的数值解析
pub fn parse_config_number_or(raw: &str, default: f64) -> f64 {
    parse_config_number(raw).unwrap_or(default)
}

/// 带默认值的整数解析
pub fn parse_config_int_or(raw: &str, default: i64) -> i64 {
    parse_config_int(raw).unwrap_or(default)
}
