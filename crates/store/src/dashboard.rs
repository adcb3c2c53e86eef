//! Spending aggregates for the charts page (`/api/dashboard-data`).

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Slice count of both donuts; the tail is folded into `Other`.
pub const MAX_DONUT_SLICES: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub donut_labels: Vec<String>,
    pub donut_values: Vec<f64>,
    pub mini_labels: Vec<String>,
    pub mini_values: Vec<f64>,
    pub line_labels: Vec<String>,
    pub line_values: Vec<f64>,
}

/// Ordered label -> total accumulator (first-seen order)
#[derive(Default)]
struct Totals(Vec<(String, f64)>);

impl Totals {
    fn add(&mut self, label: &str, amount: f64) {
        match self.0.iter_mut().find(|(l, _)| l == label) {
            Some((_, total)) => *total += amount,
            None => self.0.push((label.to_string(), amount)),
        }
    }

    fn sorted_desc(mut self) -> Self {
        self.0.sort_by(|a, b| b.1.total_cmp(&a.1));
        self
    }

    fn fold_tail(mut self, max: usize) -> Self {
        if self.0.len() > max {
            let other: f64 = self.0.drain(max - 1..).map(|(_, v)| v).sum();
            self.0.push(("Other".to_string(), other));
        }
        self
    }

    fn split(self) -> (Vec<String>, Vec<f64>) {
        self.0.into_iter().map(|(l, v)| (l, round2(v))).unzip()
    }
}

pub fn build_dashboard(records: &[Value]) -> Result<DashboardData> {
    let number_re = Regex::new(r"-?\d[\d,]*(?:\.\d+)?")?;

    let mut categories = Totals::default();
    let mut channels = Totals::default();
    let mut by_date = Totals::default();

    for record in records {
        if is_credit(field(record, "type")) {
            continue;
        }
        let Some(amount) = field(record, "amount").and_then(|a| parse_amount(&number_re, a)) else {
            continue;
        };

        categories.add(field(record, "category").unwrap_or("Uncategorized"), amount);
        channels.add(field(record, "payment_channel").unwrap_or("Unknown"), amount);
        if let Some(date) = field(record, "date") {
            by_date.add(date, amount);
        }
    }

    let (donut_labels, donut_values) = categories.sorted_desc().fold_tail(MAX_DONUT_SLICES).split();
    let (mini_labels, mini_values) = channels.sorted_desc().fold_tail(MAX_DONUT_SLICES).split();
    let (line_labels, line_values) = by_date.split();

    Ok(DashboardData {
        donut_labels,
        donut_values,
        mini_labels,
        mini_values,
        line_labels,
        line_values,
    })
}

/// Non-empty string field of a stored record.
fn field<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn is_credit(kind: Option<&str>) -> bool {
    match kind {
        Some(kind) => {
            let kind = kind.to_lowercase();
            kind.contains("credit") || kind == "cr"
        }
        None => false,
    }
}

/// First number in the text, absolute value: "Rs 1,554.50" -> 1554.5
fn parse_amount(number_re: &Regex, text: &str) -> Option<f64> {
    let m = number_re.find(text)?;
    m.as_str().replace(',', "").parse::<f64>().ok().map(f64::abs)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn number_re() -> Regex {
        Regex::new(r"-?\d[\d,]*(?:\.\d+)?").unwrap()
    }

    #[test]
    fn test_parse_amount() {
        let re = number_re();
        assert_eq!(parse_amount(&re, "554.50"), Some(554.5));
        assert_eq!(parse_amount(&re, "Rs 1,554.50"), Some(1554.5));
        assert_eq!(parse_amount(&re, "-15.00"), Some(15.0));
        assert_eq!(parse_amount(&re, "unknown"), None);
    }

    #[test]
    fn test_skips_credits_and_unparsable_amounts() {
        let records = vec![
            json!({"amount": "554.50", "type": "debit", "category": "Travel", "payment_channel": "UPI", "date": "01 Apr"}),
            json!({"amount": "2000", "type": "Credit", "category": "Salary", "date": "01 Apr"}),
            json!({"amount": "n/a", "type": "debit", "category": "Food"}),
            json!({"amount": "45.50", "category": "Travel", "date": "02 Apr"}),
        ];

        let data = build_dashboard(&records).unwrap();
        assert_eq!(data.donut_labels, vec!["Travel"]);
        assert_eq!(data.donut_values, vec![600.0]);
        assert_eq!(data.mini_labels, vec!["UPI", "Unknown"]);
        assert_eq!(data.mini_values, vec![554.5, 45.5]);
        assert_eq!(data.line_labels, vec!["01 Apr", "02 Apr"]);
        assert_eq!(data.line_values, vec![554.5, 45.5]);
    }

    #[test]
    fn test_folds_small_categories_into_other() {
        let records: Vec<Value> = ["A", "B", "C", "D", "E", "F"]
            .iter()
            .enumerate()
            .map(|(i, c)| json!({"amount": format!("{}", (i + 1) * 10), "category": c}))
            .collect();

        let data = build_dashboard(&records).unwrap();
        assert_eq!(data.donut_labels, vec!["F", "E", "D", "C", "Other"]);
        assert_eq!(data.donut_values, vec![60.0, 50.0, 40.0, 30.0, 30.0]);
    }

    #[test]
    fn test_cr_type_missing_category_and_rounding() {
        let records = vec![
            json!({"amount": "10.004", "type": "debit", "payment_channel": "UPI", "date": "01 Apr"}),
            json!({"amount": "0.333", "type": "Debit", "category": "", "payment_channel": "UPI", "date": "01 Apr"}),
            json!({"amount": "999", "type": "CR", "category": "Refund", "payment_channel": "UPI"}),
        ];

        let data = build_dashboard(&records).unwrap();
        assert_eq!(data.donut_labels, vec!["Uncategorized"]);
        assert_eq!(data.donut_values, vec![10.34]);
        assert_eq!(data.mini_values, vec![10.34]);
        assert_eq!(data.line_labels, vec!["01 Apr"]);
        assert_eq!(data.line_values, vec![10.34]);
    }

    #[test]
    fn test_folds_small_channels_into_other() {
        let records: Vec<Value> = (1..=7)
            .map(|i| json!({"amount": format!("{}", i), "payment_channel": format!("C{}", i)}))
            .collect();

        let data = build_dashboard(&records).unwrap();
        assert_eq!(data.mini_labels, vec!["C7", "C6", "C5", "C4", "Other"]);
        assert_eq!(data.mini_values, vec![7.0, 6.0, 5.0, 4.0, 6.0]);
        assert_eq!(data.donut_labels, vec!["Uncategorized"]);
    }

    #[test]
    fn test_empty_store() {
        let data = build_dashboard(&[]).unwrap();
        assert_eq!(data, DashboardData::default());
    }
}
