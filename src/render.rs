use analytics::{DashboardSnapshot, KpiReport, MonthlyTrend, PivotTable, ProductRevenue, QuarterlyCustomers};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use core_types::FilterCriteria;
use dataset::Dataset;
use rust_decimal::Decimal;

/// Formats an amount as whole dollars with thousands separators, e.g. `$12,345`.
pub fn format_currency(value: Decimal) -> String {
    let whole = value.abs().round_dp(0).trunc().to_string();
    let digits = whole.split('.').next().unwrap_or("0");

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value.is_sign_negative() && grouped != "0" {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Formats a 0-100 percentage with one decimal, e.g. `3.2%`.
pub fn format_pct(value: Decimal) -> String {
    format!("{:.1}%", value.round_dp(1))
}

fn new_table(header: Vec<String>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

fn amount_cell(value: Decimal) -> Cell {
    Cell::new(format_currency(value)).set_alignment(CellAlignment::Right)
}

pub fn kpi_table(kpis: &KpiReport) -> Table {
    let mut table = new_table(vec!["Metric".into(), "Value".into()]);
    let growth_label = match (kpis.latest_month, kpis.previous_month) {
        (Some(latest), Some(previous)) => format!("Monthly Growth ({latest} vs {previous})"),
        _ => "Monthly Growth".to_string(),
    };
    let rows = vec![
        ("Total Revenue".to_string(), format_currency(kpis.total_revenue)),
        ("Total Profit".to_string(), format_currency(kpis.total_profit)),
        ("Profit Margin".to_string(), format_pct(kpis.profit_margin_pct)),
        ("Active Customers".to_string(), kpis.active_customers.to_string()),
        ("Average Deal Size".to_string(), format_currency(kpis.average_deal_size)),
        ("Repeat Rate".to_string(), format_pct(kpis.repeat_rate_pct)),
        (growth_label, format_pct(kpis.monthly_growth_pct)),
    ];
    for (metric, value) in rows {
        table.add_row(vec![Cell::new(metric), Cell::new(value).set_alignment(CellAlignment::Right)]);
    }
    table
}

pub fn trend_table(trend: &MonthlyTrend) -> Table {
    let mut header = vec!["Month".to_string()];
    header.extend(trend.products.iter().cloned());
    let mut table = new_table(header);

    for chunk in trend.points.chunks(trend.products.len().max(1)) {
        let Some(first) = chunk.first() else { continue };
        let mut row = vec![Cell::new(first.month)];
        row.extend(chunk.iter().map(|p| amount_cell(p.revenue)));
        table.add_row(row);
    }
    table
}

pub fn pivot_table(pivot: &PivotTable) -> Table {
    let mut header = vec!["Country".to_string()];
    header.extend(pivot.columns.iter().cloned());
    header.push("Total".to_string());
    let mut table = new_table(header);

    for (country, values) in pivot.rows.iter().zip(&pivot.values) {
        let mut row = vec![Cell::new(country)];
        row.extend(values.iter().map(|v| amount_cell(*v)));
        row.push(amount_cell(values.iter().copied().sum()));
        table.add_row(row);
    }
    table
}

pub fn top_products_table(products: &[ProductRevenue]) -> Table {
    let mut table = new_table(vec!["Rank".into(), "Product".into(), "Revenue".into()]);
    for (rank, p) in products.iter().enumerate() {
        table.add_row(vec![Cell::new(rank + 1), Cell::new(&p.product), amount_cell(p.revenue)]);
    }
    table
}

pub fn quarterly_table(series: &[QuarterlyCustomers]) -> Table {
    let mut table = new_table(vec!["Quarter".into(), "Active Customers".into()]);
    for q in series {
        table.add_row(vec![
            Cell::new(q.quarter),
            Cell::new(q.customers).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

fn describe_criteria(criteria: &FilterCriteria) -> String {
    let bound = |d: Option<chrono::NaiveDate>| d.map_or_else(|| "*".to_string(), |d| d.to_string());
    let selection = |s: &core_types::Selection| match s {
        core_types::Selection::Only(values) if !values.is_empty() => {
            values.iter().cloned().collect::<Vec<_>>().join(", ")
        }
        _ => "all".to_string(),
    };
    format!(
        "Date range: {} .. {} | Regions: {} | Industries: {}",
        bound(criteria.start_date),
        bound(criteria.end_date),
        selection(&criteria.regions),
        selection(&criteria.industries)
    )
}

/// The full dashboard as terminal tables.
pub fn render_snapshot(snapshot: &DashboardSnapshot) -> String {
    let top_title = format!("Top {} Products by Revenue", snapshot.top_products.len());
    let sections = [
        ("Key Metrics", kpi_table(&snapshot.kpis)),
        ("Monthly Revenue Trend by Product", trend_table(&snapshot.monthly_trend)),
        ("Revenue by Country & Segment", pivot_table(&snapshot.country_segment)),
        (top_title.as_str(), top_products_table(&snapshot.top_products)),
        ("Quarterly Active Customers", quarterly_table(&snapshot.quarterly_customers)),
    ];

    let mut out = describe_criteria(&snapshot.criteria);
    out.push('\n');
    for (title, table) in sections {
        out.push_str(&format!("\n{title}\n{table}\n"));
    }
    out
}

/// The filter options a user can choose from, like the dashboard's sidebar.
pub fn render_filter_options(dataset: &Dataset) -> String {
    let mut table = new_table(vec!["Filter".into(), "Options".into()]);
    let range = match dataset.date_bounds() {
        Some((first, last)) => format!("{first} .. {last}"),
        None => "(no rows)".to_string(),
    };
    table.add_row(vec![Cell::new("Date Range"), Cell::new(range)]);
    table.add_row(vec![Cell::new("Region"), Cell::new(dataset.regions().join(", "))]);
    table.add_row(vec![Cell::new("Industry"), Cell::new(dataset.industries().join(", "))]);

    let report = dataset.load_report();
    format!(
        "{table}\nLoaded {} of {} rows ({} skipped)\n",
        report.rows_loaded,
        report.rows_read,
        report.skipped.len()
    )
}
