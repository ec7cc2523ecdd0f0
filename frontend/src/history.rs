//! 交易记录分组与筛选

use std::collections::{BTreeMap, BTreeSet};

use budgetwise_shared::Transaction;
use budgetwise_shared::date::{MonthKey, long_date_label, parse_transaction_date};
use chrono::NaiveDate;

/// 同一天的交易
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup {
    /// 日期无法解析时为 `None`
    pub date: Option<NaiveDate>,
    pub label: String,
    pub transactions: Vec<Transaction>,
}

impl DayGroup {
    pub fn month(&self) -> Option<MonthKey> {
        self.date.map(MonthKey::from_date)
    }
}

/// 按天分组，最近的日期在前，无法解析的日期按原始文本归组放在最后
pub fn group_by_day(transactions: &[Transaction]) -> Vec<DayGroup> {
    let mut dated: BTreeMap<NaiveDate, Vec<Transaction>> = BTreeMap::new();
    let mut undated: BTreeMap<String, Vec<Transaction>> = BTreeMap::new();

    for t in transactions {
        match parse_transaction_date(&t.transaction_date) {
            Some(date) => dated.entry(date).or_default().push(t.clone()),
            None => undated
                .entry(t.transaction_date.trim().to_string())
                .or_default()
                .push(t.clone()),
        }
    }

    let dated = dated.into_iter().rev().map(|(date, transactions)| DayGroup {
        date: Some(date),
        label: long_date_label(date),
        transactions,
    });
    let undated = undated.into_iter().map(|(raw, transactions)| DayGroup {
        date: None,
        label: if raw.is_empty() {
            "Unknown date".to_string()
        } else {
            raw
        },
        transactions,
    });
    dated.chain(undated).collect()
}

/// 出现过的月份，最近的在前
pub fn available_months(transactions: &[Transaction]) -> Vec<MonthKey> {
    let months: BTreeSet<MonthKey> = transactions
        .iter()
        .filter_map(|t| parse_transaction_date(&t.transaction_date))
        .map(MonthKey::from_date)
        .collect();
    months.into_iter().rev().collect()
}

/// 出现过的分类，按字母排序
pub fn available_categories(transactions: &[Transaction]) -> Vec<String> {
    let categories: BTreeSet<&str> = transactions
        .iter()
        .map(|t| t.expense_category.as_str())
        .collect();
    categories.into_iter().map(str::to_string).collect()
}

/// 月份 / 分类筛选，`None` 表示全部
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub month: Option<MonthKey>,
    pub category: Option<String>,
}

impl TransactionFilter {
    /// 应用筛选，去掉筛选后为空的日期组
    pub fn apply(&self, groups: &[DayGroup]) -> Vec<DayGroup> {
        groups
            .iter()
            .filter(|g| self.month.is_none() || g.month() == self.month)
            .filter_map(|g| {
                let transactions: Vec<Transaction> = g
                    .transactions
                    .iter()
                    .filter(|t| {
                        self.category
                            .as_deref()
                            .is_none_or(|c| t.expense_category == c)
                    })
                    .cloned()
                    .collect();
                (!transactions.is_empty()).then(|| DayGroup {
                    date: g.date,
                    label: g.label.clone(),
                    transactions,
                })
            })
            .collect()
    }
}

/// 下拉框的取值：`all` 表示不过滤
pub const ALL: &str = "all";

pub fn parse_month_choice(raw: &str) -> Option<MonthKey> {
    if raw == ALL { None } else { MonthKey::parse(raw) }
}

pub fn parse_category_choice(raw: &str) -> Option<String> {
    (raw != ALL && !raw.is_empty()).then(|| raw.to_string())
}

/// 分类色标
pub fn category_color(category: &str) -> &'static str {
    match category {
        "Food" => "#00C49F",
        "Dining" => "#FF8042",
        "Transportation" => "#0088FE",
        "Utilities" => "#FFBB28",
        "Shopping" => "#FF4444",
        "Entertainment" => "#AA66CC",
        "Health" => "#7C3AED",
        "Rent" => "#00b48f",
        _ => "#94A3B8",
    }
}
