use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::actions::{QueryFromFile, QueryManual, SaveReturnsTsv, ShowColumns};
use crate::defaults::Defaults;
use crate::keys::KeySequence;
use crate::market::{PriceSource, PriceTable};
use crate::menu::{MenuNode, Navigator};
use crate::ui::console::Console;

/// Shared state every menu action can reach, whatever its depth.
pub struct AppCtx {
    /// Last downloaded table. Replaced by every successful query.
    pub payload: Option<PriceTable>,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub source: Box<dyn PriceSource>,
}

impl AppCtx {
    pub fn new(source: Box<dyn PriceSource>) -> Self {
        Self {
            payload: None,
            input_dir: PathBuf::from(Defaults::INPUT_DIR),
            output_dir: PathBuf::from(Defaults::OUTPUT_DIR),
            source,
        }
    }

    pub fn with_dirs(mut self, input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        self.input_dir = input_dir.into();
        self.output_dir = output_dir.into();
        self
    }

    pub fn set(&mut self, table: PriceTable) {
        self.payload = Some(table);
    }
}

pub fn build_main_menu() -> MenuNode<AppCtx> {
    let mut idx = KeySequence::new(Defaults::FIRST_KEY);

    let mut query = MenuNode::submenu("Make query");
    query.append_next(&mut idx, MenuNode::command("input manually", QueryManual));
    query.append_next(&mut idx, MenuNode::command("from file", QueryFromFile));
    query.append_exit("back to main");

    idx.reset(None, None);
    let mut visualize = MenuNode::submenu("visualize");
    visualize.append_next(&mut idx, MenuNode::command("show columns", ShowColumns));
    visualize.append_exit("back to main");

    idx.reset(None, None);
    let mut generate = MenuNode::submenu("generate file");
    generate.append_next(&mut idx, MenuNode::command("Save to TSV", SaveReturnsTsv));
    generate.append_exit("back to main");

    idx.reset(None, None);
    let mut main = MenuNode::submenu("Yahoo Finance");
    main.append_next(&mut idx, query);
    main.append_next(&mut idx, visualize);
    main.append_next(&mut idx, generate);
    main.append_exit("exit");
    main
}

pub async fn run_menu(console: &mut Console, ctx: &mut AppCtx) -> Result<()> {
    let mut main = build_main_menu();
    info!(input = %ctx.input_dir.display(), output = %ctx.output_dir.display(), "menu started");
    Navigator::new(&mut main).run(console, ctx).await?;
    info!("menu closed");
    Ok(())
}
