//! 仪表盘数据推导
//!
//! 后端只返回按分类、按月的原始合计（支出为负数），
//! 总支出、分类占比和月份标签都在这里计算。

use budgetwise_shared::date::MonthKey;
use budgetwise_shared::{SpendingAnalysis, TransactionSummary};

/// 单个分类的支出
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub name: String,
    pub transaction_count: u32,
    /// 绝对值
    pub total: f64,
    /// 占总支出的百分比（0..=100）
    pub percent: f64,
}

/// 单月支出
#[derive(Debug, Clone, PartialEq)]
pub struct MonthTotal {
    /// 无法解析的月份为 `None`，排在最后
    pub key: Option<MonthKey>,
    pub label: String,
    pub total: f64,
}

/// 仪表盘概览
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpendingOverview {
    pub total_expense: f64,
    /// 按金额从大到小
    pub categories: Vec<CategoryShare>,
    /// 按时间先后
    pub months: Vec<MonthTotal>,
}

impl SpendingOverview {
    pub fn from_summary(summary: &TransactionSummary) -> Self {
        // 空列表的 f64 求和是 -0.0，从 0.0 开始累加
        let total_expense = summary
            .category_summary
            .iter()
            .fold(0.0, |acc, c| acc + c.total_amount.abs());

        let mut categories: Vec<CategoryShare> = summary
            .category_summary
            .iter()
            .map(|c| {
                let total = c.total_amount.abs();
                CategoryShare {
                    name: c.expense_category.clone(),
                    transaction_count: c.transaction_count,
                    total,
                    percent: percent_of(total, total_expense),
                }
            })
            .collect();
        categories.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.name.cmp(&b.name)));

        let mut months: Vec<MonthTotal> = summary
            .monthly_spending
            .iter()
            .map(|m| {
                let key = MonthKey::parse(&m.month);
                MonthTotal {
                    key,
                    label: key.map(|k| k.label()).unwrap_or_else(|| m.month.clone()),
                    total: m.total.abs(),
                }
            })
            .collect();
        // None 排在 Some 之后
        months.sort_by_key(|m| (m.key.is_none(), m.key));

        Self {
            total_expense,
            categories,
            months,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.months.is_empty()
    }

    /// 月度最高支出，用于柱状条的比例
    pub fn peak_month(&self) -> f64 {
        self.months.iter().map(|m| m.total).fold(0.0, f64::max)
    }
}

fn percent_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}

/// 金额两位小数，如 `50.00`
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// 带货币符号的绝对金额，如 `$12.50`
pub fn format_currency(amount: f64) -> String {
    format!("${}", format_amount(amount.abs()))
}

/// 展示的分析文本：`formatted_analysis` 优先，空白文本视为不存在
pub fn analysis_text(analysis: &SpendingAnalysis) -> Option<&str> {
    fn non_blank(s: &Option<String>) -> Option<&str> {
        s.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
    non_blank(&analysis.formatted_analysis).or_else(|| non_blank(&analysis.analysis))
}
