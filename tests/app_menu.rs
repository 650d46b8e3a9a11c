//! End-to-end runs of the Yahoo Finance menu against a stubbed price source.

use std::fs;

use async_trait::async_trait;
use time::macros::date;
use time::Date;

use market_menu::app::{build_main_menu, run_menu, AppCtx};
use market_menu::market::{Bar, FetchError, PriceSeries, PriceSource};
use market_menu::ui::console::Console;

struct Stub;

fn bar(v: f64) -> Bar {
    Bar { open: Some(v), high: Some(v), low: Some(v), close: Some(v), adj_close: Some(v), volume: Some(1000.0) }
}

#[async_trait]
impl PriceSource for Stub {
    async fn fetch_series(&self, ticker: &str, _start: Date, _end: Date) -> Result<PriceSeries, FetchError> {
        let prices = match ticker {
            "AAA" => [100.0, 125.0, 250.0],
            "BBB" => [50.0, 100.0, 150.0],
            _ => return Err(FetchError::Status { ticker: ticker.into(), status: 404 }),
        };
        Ok(PriceSeries {
            ticker: ticker.into(),
            bars: vec![
                (date!(2024 - 01 - 15), bar(prices[0])),
                (date!(2024 - 02 - 15), bar(prices[1])),
                (date!(2024 - 03 - 15), bar(prices[2])),
            ],
        })
    }
}

fn ctx(dir: &tempfile::TempDir) -> AppCtx {
    AppCtx::new(Box::new(Stub)).with_dirs(dir.path().join("data-in"), dir.path().join("data-out"))
}

#[test]
fn main_menu_layout() {
    let menu = build_main_menu();
    assert_eq!(menu.name(), "Yahoo Finance");
    assert_eq!(menu.keys().collect::<Vec<_>>(), vec!["1", "2", "3", "0"]);
    let query = menu.child("1").unwrap();
    assert_eq!(query.name(), "Make query");
    assert_eq!(query.keys().collect::<Vec<_>>(), vec!["1", "2", "0"]);
    assert_eq!(menu.child("2").unwrap().keys().collect::<Vec<_>>(), vec!["1", "0"]);
    assert_eq!(menu.child("3").unwrap().child("1").unwrap().name(), "Save to TSV");
}

#[tokio::test]
async fn empty_payload_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = ctx(&dir);
    let (mut console, out) = Console::scripted(["2", "1", "0", "3", "1", "0", "0"]);

    run_menu(&mut console, &mut ctx).await.unwrap();

    assert_eq!(out.text().matches("Data is empty").count(), 2);
    assert!(!dir.path().join("data-out").exists());
}

#[tokio::test]
async fn query_from_file_then_export() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("data-in");
    fs::create_dir_all(&input).unwrap();
    fs::write(input.join("query.yaml"), "tickers: [AAA, BBB]\nfrom: 2024-01-01\nto: 2024-04-01\n").unwrap();

    let mut ctx = ctx(&dir);
    let script = [
        "1", "2", "1", "0", // Make query > from file > query.yaml > back
        "2", "1", "0", // visualize > show columns > back
        "3", "1", "0", // generate file > Save to TSV > back
        "0", // exit
    ];
    let (mut console, out) = Console::scripted(script);

    run_menu(&mut console, &mut ctx).await.unwrap();

    let text = out.text();
    assert!(text.contains("Yahoo Finance >> Make query\n"));
    assert!(text.contains("Select a file\n    1. query.yaml\n    0. cancel\n"));
    assert!(text.contains("loading query.yaml"));
    assert!(text.contains("Adj Close  AAA"));
    assert!(text.contains("Volume     BBB"));
    assert!(text.contains("BBB: mean "));

    let table = ctx.payload.as_ref().unwrap();
    assert_eq!(table.tickers(), &["AAA".to_string(), "BBB".to_string()]);

    let tsv = fs::read_to_string(dir.path().join("data-out").join("monthly-returns.tsv")).unwrap();
    let lines: Vec<&str> = tsv.lines().collect();
    assert_eq!(lines[0], "Date\tAAA\tBBB");
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "2024-02-29\t0.25\t1");
    assert_eq!(lines[2], "2024-03-31\t1\t0.5");
    assert!(text.contains("AAA: mean 0.625, std "));
}

#[tokio::test]
async fn manual_query_replaces_payload_and_reports_bad_tickers() {
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = ctx(&dir);
    let (mut console, out) =
        Console::scripted(["1", "1", "aaa   zzz", "2024-01-01", "2024-04-01", "0", "0"]);

    run_menu(&mut console, &mut ctx).await.unwrap();

    let text = out.text();
    assert!(text.contains("give tickers separated by spaces:"));
    assert!(text.contains("failed to download ZZZ"));
    assert!(text.contains("loaded 3 rows for AAA"));
    assert_eq!(ctx.payload.as_ref().map(|t| t.tickers().len()), Some(1));
}

#[tokio::test]
async fn bad_manual_dates_leave_payload_alone() {
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = ctx(&dir);
    let (mut console, out) = Console::scripted(["1", "1", "AAA", "01/01/2024", "2024-04-01", "0", "0"]);

    run_menu(&mut console, &mut ctx).await.unwrap();

    assert!(out.text().contains("invalid start date '01/01/2024'"));
    assert!(ctx.payload.is_none());
}

#[tokio::test]
async fn file_query_failures_are_recoverable() {
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = ctx(&dir);

    // input directory missing
    let (mut console, out) = Console::scripted(["1", "2", "0", "0"]);
    run_menu(&mut console, &mut ctx).await.unwrap();
    assert!(out.text().contains("does not exist"));

    let input = dir.path().join("data-in");
    fs::create_dir_all(&input).unwrap();
    fs::write(input.join("a-empty.yaml"), "tickers: []\nfrom: 2024-01-01\nto: 2024-04-01\n").unwrap();
    fs::write(input.join("b-broken.yaml"), "tickers: [AAA\nfrom").unwrap();

    let (mut console, out) = Console::scripted([
        "1", "2", "1", // malformed
        "2", "2", // broken yaml
        "2", "0", // cancel picker
        "0", "0",
    ]);
    run_menu(&mut console, &mut ctx).await.unwrap();

    let text = out.text();
    assert!(text.contains("source file is malformed"));
    assert!(text.contains("could not be loaded"));
    assert!(text.contains("the data was not modified"));
    assert!(text.contains("Operation was canceled"));
    assert!(ctx.payload.is_none());
}
