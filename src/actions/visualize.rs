// src/actions/visualize.rs

use anyhow::Result;
use async_trait::async_trait;

use crate::app::AppCtx;
use crate::menu::{MenuAction, MenuCursor, Selection};
use crate::ui::console::Console;

/// Prints the (field, ticker) column index of the loaded table.
pub struct ShowColumns;

#[async_trait]
impl MenuAction<AppCtx> for ShowColumns {
    async fn select(&self, _at: &mut MenuCursor<'_, AppCtx>, console: &mut Console, ctx: &mut AppCtx) -> Result<Selection> {
        let Some(table) = ctx.payload.as_ref() else {
            console.line("Data is empty")?;
            return Ok(Selection::Stay);
        };

        let width = table
            .columns()
            .iter()
            .map(|(f, _)| f.label().len())
            .max()
            .unwrap_or(0)
            .max("Price".len());
        console.line(format!("{:<width$}  Ticker", "Price"))?;
        for (field, ticker) in table.columns() {
            console.line(format!("{:<width$}  {ticker}", field.label()))?;
        }
        if let (Some(first), Some(last)) = (table.dates().first(), table.dates().last()) {
            console.line(format!("{} rows, {first} to {last}", table.len()))?;
        }
        Ok(Selection::Stay)
    }
}
