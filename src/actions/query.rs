// src/actions/query.rs

use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};

use crate::actions::file_picker::pick_file;
use crate::app::AppCtx;
use crate::market::query_file::{self, QueryFileError};
use crate::market::{download, parse_date, parse_tickers, PriceRequest};
use crate::menu::{MenuAction, MenuCursor, Selection};
use crate::ui::console::Console;
use crate::util::list_files;

/// Prompts for tickers and a date range, then downloads.
pub struct QueryManual;

#[async_trait]
impl MenuAction<AppCtx> for QueryManual {
    async fn select(&self, _at: &mut MenuCursor<'_, AppCtx>, console: &mut Console, ctx: &mut AppCtx) -> Result<Selection> {
        let Some(tickers) = console.prompt("give tickers separated by spaces:\n")? else {
            return Ok(Selection::Stay);
        };
        let Some(from) = console.prompt("input date start yyyy-mm-dd:\n")? else {
            return Ok(Selection::Stay);
        };
        let Some(to) = console.prompt("input date end yyyy-mm-dd:\n")? else {
            return Ok(Selection::Stay);
        };

        let (start, end) = match (parse_date(&from), parse_date(&to)) {
            (Ok(s), Ok(e)) => (s, e),
            (Err(_), _) => {
                console.error(format!("invalid start date '{from}', expected yyyy-mm-dd"))?;
                return Ok(Selection::Stay);
            }
            (_, Err(_)) => {
                console.error(format!("invalid end date '{to}', expected yyyy-mm-dd"))?;
                return Ok(Selection::Stay);
            }
        };

        match PriceRequest::new(parse_tickers(&tickers), start, end) {
            Ok(req) => fetch_into(ctx, &req, console).await?,
            Err(e) => console.error(format!("ERROR: {e}"))?,
        }
        Ok(Selection::Stay)
    }
}

/// Picks a YAML query from the input directory, then downloads.
pub struct QueryFromFile;

#[async_trait]
impl MenuAction<AppCtx> for QueryFromFile {
    async fn select(&self, _at: &mut MenuCursor<'_, AppCtx>, console: &mut Console, ctx: &mut AppCtx) -> Result<Selection> {
        console.blank()?;
        let files = match list_files(&ctx.input_dir) {
            Ok(files) => files,
            Err(e) => {
                warn!("query file listing failed: {e}");
                console.error(e.to_string())?;
                return Ok(Selection::Stay);
            }
        };

        let Some(file) = pick_file(&files, console).await? else {
            console.line("Operation was canceled")?;
            return Ok(Selection::Stay);
        };

        console.line(format!("loading {file}"))?;
        let path = ctx.input_dir.join(&file);
        match query_file::load(&path) {
            Ok(req) => fetch_into(ctx, &req, console).await?,
            Err(QueryFileError::Yaml { source, .. }) => {
                warn!(path = %path.display(), "query file rejected: {source}");
                console.error(format!("ERROR: {} could not be loaded", path.display()))?;
                console.line("the data was not modified")?;
            }
            Err(QueryFileError::Malformed { reason, .. }) => {
                console.error(format!("source file is malformed: {reason}"))?;
            }
            Err(e) => console.error(e.to_string())?,
        }
        Ok(Selection::Stay)
    }
}

/// Downloads `req` and replaces the payload. Failures leave it untouched.
pub async fn fetch_into(ctx: &mut AppCtx, req: &PriceRequest, console: &mut Console) -> Result<()> {
    match download(&*ctx.source, req).await {
        Ok(dl) => {
            for (ticker, err) in &dl.failed {
                console.error(format!("failed to download {ticker}: {err}"))?;
            }
            let table = dl.table;
            console.line(format!(
                "loaded {} rows for {} ({} to {})",
                table.len(),
                table.tickers().join(" "),
                req.start,
                req.end
            ))?;
            info!(rows = table.len(), "payload replaced");
            ctx.set(table);
        }
        Err(e) => {
            console.error(format!("ERROR: {e}"))?;
            console.line("the data was not modified")?;
        }
    }
    Ok(())
}
