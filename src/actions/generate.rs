// src/actions/generate.rs

use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

use crate::app::AppCtx;
use crate::defaults::Defaults;
use crate::market::export::write_tsv;
use crate::menu::{MenuAction, MenuCursor, Selection};
use crate::ui::console::Console;

/// Exports monthly returns of the adjusted close and prints per-ticker
/// mean and standard deviation.
pub struct SaveReturnsTsv;

#[async_trait]
impl MenuAction<AppCtx> for SaveReturnsTsv {
    async fn select(&self, _at: &mut MenuCursor<'_, AppCtx>, console: &mut Console, ctx: &mut AppCtx) -> Result<Selection> {
        let Some(table) = ctx.payload.as_ref() else {
            console.line("Data is empty")?;
            return Ok(Selection::Stay);
        };

        let returns = table.monthly_returns();
        if returns.is_empty() {
            console.line("not enough data for monthly returns")?;
            return Ok(Selection::Stay);
        }

        match write_tsv(&returns, &ctx.output_dir, Defaults::RETURNS_FILE) {
            Ok(path) => console.line(format!("saved {}", path.display()))?,
            Err(e) => {
                warn!("export failed: {e}");
                console.error(e.to_string())?;
                return Ok(Selection::Stay);
            }
        }

        for s in returns.stats() {
            console.line(format!("{}: mean {}, std {}", s.ticker, s.mean, s.std))?;
        }
        Ok(Selection::Stay)
    }
}
