use crate::dataset::Dataset;
use crate::error::DatasetError;
use chrono::{NaiveDate, NaiveDateTime};
use core_types::Transaction;
use csv::StringRecord;
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::Path;
use std::str::FromStr;

const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"];

/// A row that was dropped while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the source file.
    pub line: u64,
    pub reason: String,
}

/// Outcome of a load: how many data rows were seen and which were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rows_read: usize,
    pub rows_loaded: usize,
    pub skipped: Vec<SkippedRow>,
}

/// Header positions of the columns the dashboard reads.
struct Columns {
    order_id: Option<usize>,
    order_date: usize,
    customer_id: usize,
    product: usize,
    region: usize,
    industry: usize,
    country: usize,
    segment: usize,
    sales: usize,
    profit: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, DatasetError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{FEFF}').trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &'static str| find(name).ok_or(DatasetError::MissingColumn(name));

        Ok(Self {
            order_id: find("Order ID"),
            order_date: require("Order Date")?,
            customer_id: require("Customer ID")?,
            product: require("Product")?,
            region: require("Region")?,
            industry: require("Industry")?,
            country: require("Country")?,
            segment: require("Segment")?,
            sales: require("Sales")?,
            profit: find("Profit"),
        })
    }
}

/// Loads a sales export from disk into an immutable `Dataset`.
pub fn load_csv(path: &Path) -> Result<Dataset, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (transactions, report) = read_transactions(file)?;

    tracing::info!(
        path = %path.display(),
        loaded = report.rows_loaded,
        skipped = report.skipped.len(),
        "Dataset loaded"
    );

    Ok(Dataset::new(transactions, report))
}

/// Parses CSV rows into transactions.
///
/// Rows with a missing or unparseable order date or sales amount are skipped
/// and recorded in the `LoadReport`; a missing profit value becomes zero.
pub fn read_transactions<R: io::Read>(reader: R) -> Result<(Vec<Transaction>, LoadReport), DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::resolve(reader.headers()?)?;
    let mut transactions = Vec::new();
    let mut report = LoadReport::default();

    for result in reader.records() {
        report.rows_read += 1;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                let line = e.position().map_or(0, |p| p.line());
                tracing::warn!(line, "Skipping malformed CSV record: {}", e);
                report.skipped.push(SkippedRow {
                    line,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let line = record.position().map_or(0, |p| p.line());
        match parse_record(&record, &columns) {
            Ok(transaction) => transactions.push(transaction),
            Err(reason) => {
                tracing::warn!(line, "Skipping CSV row: {}", reason);
                report.skipped.push(SkippedRow { line, reason });
            }
        }
    }

    report.rows_loaded = transactions.len();
    Ok((transactions, report))
}

fn parse_record(record: &StringRecord, columns: &Columns) -> Result<Transaction, String> {
    let field = |i: usize| record.get(i).map(str::trim).filter(|v| !v.is_empty());
    let text = |i: usize| field(i).unwrap_or_default().to_string();

    let raw_date = field(columns.order_date).ok_or("missing order date")?;
    let order_date = parse_order_date(raw_date).ok_or_else(|| format!("unparseable order date '{raw_date}'"))?;

    let raw_sales = field(columns.sales).ok_or("missing sales amount")?;
    let sales = parse_amount(raw_sales).ok_or_else(|| format!("unparseable sales amount '{raw_sales}'"))?;
    if sales.is_sign_negative() && !sales.is_zero() {
        return Err(format!("negative sales amount '{raw_sales}'"));
    }

    let profit = match columns.profit.and_then(field) {
        Some(raw) => parse_amount(raw).ok_or_else(|| format!("unparseable profit amount '{raw}'"))?,
        None => Decimal::ZERO,
    };

    Ok(Transaction {
        order_id: columns.order_id.and_then(field).map(str::to_string),
        order_date,
        customer_id: text(columns.customer_id),
        product: text(columns.product),
        region: text(columns.region),
        industry: text(columns.industry),
        country: text(columns.country),
        segment: text(columns.segment),
        sales,
        profit,
    })
}

/// Parses the order-date formats seen in sales exports (`11/2/2022`, `2022-11-02`,
/// and timestamps whose time part is dropped).
pub fn parse_order_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned = raw.trim().trim_start_matches('$').replace(',', "");
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}
