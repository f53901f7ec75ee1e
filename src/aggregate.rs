//! Revenue aggregation by product and by date.
//!
//! Both maps accumulate `quantity * price` in input order with plain
//! floating-point addition.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::domain::SaleRecord;
use crate::select::max_entry;

/// Revenue per product, in the order products were first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductTotals(IndexMap<String, f64>);

impl ProductTotals {
    /// Insert `product` with zero if absent, then add `amount`.
    pub fn add(&mut self, product: &str, amount: f64) {
        match self.0.get_mut(product) {
            Some(total) => *total += amount,
            None => {
                self.0.insert(product.to_string(), amount);
            }
        }
    }

    pub fn get(&self, product: &str) -> Option<f64> {
        self.0.get(product).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Product with the highest revenue; the first-seen product wins ties.
    pub fn max(&self) -> Option<(&str, f64)> {
        max_entry(self.iter())
    }
}

/// Revenue per date, iterated in ascending date order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateTotals(BTreeMap<NaiveDate, f64>);

impl DateTotals {
    /// Insert `date` with zero if absent, then add `amount`.
    pub fn add(&mut self, date: NaiveDate, amount: f64) {
        *self.0.entry(date).or_insert(0.0) += amount;
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.0.get(&date).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.0.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.0.keys().next_back().copied()
    }

    /// Date with the highest revenue; the earliest date wins ties.
    pub fn max(&self) -> Option<(NaiveDate, f64)> {
        max_entry(self.iter())
    }
}

/// Sum revenue per distinct product name.
pub fn total_sales_per_product(records: &[SaleRecord]) -> ProductTotals {
    let mut totals = ProductTotals::default();
    for sale in records {
        totals.add(&sale.product_name, sale.revenue());
    }
    totals
}

/// Sum revenue per distinct date.
pub fn sales_over_time(records: &[SaleRecord]) -> DateTotals {
    let mut totals = DateTotals::default();
    for sale in records {
        totals.add(sale.date, sale.revenue());
    }
    totals
}
