use std::collections::BTreeMap;

use adm_store::Product;
use serde::Serialize;

use crate::trend::percent_change;

/// Visits for one calendar day, summed across all products
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionDay {
    pub date: String,
    pub organic: i64,
    pub referral: i64,
    pub paid: i64,
}

impl SessionDay {
    pub fn total(&self) -> i64 {
        self.organic
            .saturating_add(self.referral)
            .saturating_add(self.paid)
    }
}

/// Sessions card data
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub series: Vec<SessionDay>,
    pub total_sessions: i64,
    pub percent_change: i64,
}

/// Group every product's traffic entries by date, summing each channel.
///
/// The series is ordered by date ascending. Dates compare as strings, which
/// is chronological for `yyyy-mm-dd`.
pub fn daily_sessions(products: &[Product]) -> Vec<SessionDay> {
    let mut by_date: BTreeMap<&str, SessionDay> = BTreeMap::new();

    for entry in products.iter().flat_map(|p| p.traffic.iter()) {
        let day = by_date
            .entry(entry.date.as_str())
            .or_insert_with(|| SessionDay {
                date: entry.date.clone(),
                ..SessionDay::default()
            });
        day.organic = day.organic.saturating_add(entry.organic);
        day.referral = day.referral.saturating_add(entry.referral);
        day.paid = day.paid.saturating_add(entry.paid);
    }

    by_date.into_values().collect()
}

/// Daily sessions plus the card's headline numbers.
pub fn aggregate_sessions(products: &[Product]) -> SessionSummary {
    let series = daily_sessions(products);
    let totals: Vec<f64> = series.iter().map(|d| d.total() as f64).collect();

    SessionSummary {
        total_sessions: series
            .iter()
            .fold(0i64, |total, day| total.saturating_add(day.total())),
        percent_change: percent_change(&totals),
        series,
    }
}
