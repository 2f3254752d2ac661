//! Profit/loss reductions.
//!
//! Everything here is pure arithmetic over yearly ledger rows; money
//! stays in whole currency units (`i64`) and ROI is the only derived
//! float. Net profit and ROI are computed on read, never stored.

use std::collections::{BTreeMap, HashMap, HashSet};

use entity::{employee, pnl_record};
use uuid::Uuid;

pub const TOP_PERFORMERS_LIMIT: usize = 10;

/// Return on investment in percent: net profit over cost, zero when
/// there is no cost to measure against.
pub fn roi(net_profit: i64, total_cost: i64) -> f64 {
    if total_cost > 0 {
        net_profit as f64 / total_cost as f64 * 100.0
    } else {
        0.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PnlSummary {
    pub total_revenue: i64,
    pub total_cost: i64,
    pub net_profit: i64,
    pub roi: f64,
    pub years_count: usize,
}

/// Reduce one employee's yearly rows into a summary.
pub fn summarize(records: &[pnl_record::Model]) -> PnlSummary {
    let total_revenue: i64 = records.iter().map(|r| r.attributed_revenue).sum();
    let total_cost: i64 = records.iter().map(|r| r.total_cost).sum();
    let net_profit = total_revenue - total_cost;
    PnlSummary {
        total_revenue,
        total_cost,
        net_profit,
        roi: roi(net_profit, total_cost),
        years_count: records.len(),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DepartmentSummary {
    pub department: String,
    pub total_revenue: i64,
    pub total_cost: i64,
    pub net_profit: i64,
    pub roi: f64,
    pub employee_count: usize,
}

/// Group records by the owning employee's department, ordered by
/// department name. Records whose employee is absent from `employees`
/// are skipped.
pub fn department_breakdown(
    records: &[pnl_record::Model],
    employees: &[employee::Model],
) -> Vec<DepartmentSummary> {
    let departments: HashMap<Uuid, &str> = employees
        .iter()
        .map(|e| (e.id, e.department.as_str()))
        .collect();

    let mut grouped: BTreeMap<&str, (i64, i64, HashSet<Uuid>)> = BTreeMap::new();
    for record in records {
        let Some(department) = departments.get(&record.employee_id) else {
            continue;
        };
        let entry = grouped.entry(department).or_default();
        entry.0 += record.attributed_revenue;
        entry.1 += record.total_cost;
        entry.2.insert(record.employee_id);
    }

    grouped
        .into_iter()
        .map(|(department, (total_revenue, total_cost, members))| {
            let net_profit = total_revenue - total_cost;
            DepartmentSummary {
                department: department.to_string(),
                total_revenue,
                total_cost,
                net_profit,
                roi: roi(net_profit, total_cost),
                employee_count: members.len(),
            }
        })
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CompanySummary {
    pub total_revenue: i64,
    pub total_cost: i64,
    pub net_profit: i64,
    pub roi: f64,
    pub record_count: usize,
}

pub fn company_summary(records: &[pnl_record::Model]) -> CompanySummary {
    let reduced = summarize(records);
    CompanySummary {
        total_revenue: reduced.total_revenue,
        total_cost: reduced.total_cost,
        net_profit: reduced.net_profit,
        roi: reduced.roi,
        record_count: records.len(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmployeePerformance {
    pub employee_id: Uuid,
    pub total_revenue: i64,
    pub total_cost: i64,
    pub net_profit: i64,
    pub roi: f64,
    pub years_count: usize,
}

/// Per-employee totals sorted descending by ROI, truncated to `limit`.
/// The sort is stable, so ties keep first-seen record order.
pub fn top_performers(records: &[pnl_record::Model], limit: usize) -> Vec<EmployeePerformance> {
    let mut order: Vec<Uuid> = Vec::new();
    let mut grouped: HashMap<Uuid, (i64, i64, usize)> = HashMap::new();
    for record in records {
        let entry = grouped.entry(record.employee_id).or_insert_with(|| {
            order.push(record.employee_id);
            (0, 0, 0)
        });
        entry.0 += record.attributed_revenue;
        entry.1 += record.total_cost;
        entry.2 += 1;
    }

    let mut performances: Vec<EmployeePerformance> = order
        .into_iter()
        .map(|employee_id| {
            let (total_revenue, total_cost, years_count) = grouped[&employee_id];
            let net_profit = total_revenue - total_cost;
            EmployeePerformance {
                employee_id,
                total_revenue,
                total_cost,
                net_profit,
                roi: roi(net_profit, total_cost),
                years_count,
            }
        })
        .collect();
    performances.sort_by(|a, b| b.roi.partial_cmp(&a.roi).unwrap_or(std::cmp::Ordering::Equal));
    performances.truncate(limit);
    performances
}
