// src/actions/file_picker.rs

use anyhow::Result;
use async_trait::async_trait;

use crate::defaults::Defaults;
use crate::keys::KeySequence;
use crate::menu::{MenuAction, MenuCursor, MenuNode, Navigator, Selection};
use crate::ui::console::Console;

/// Records the selected node's name and leaves the picker.
pub struct PickFile;

#[async_trait]
impl MenuAction<Option<String>> for PickFile {
    async fn select(&self, at: &mut MenuCursor<'_, Option<String>>, _console: &mut Console, picked: &mut Option<String>) -> Result<Selection> {
        *picked = at.node().map(|n| n.name().to_string());
        Ok(Selection::Back)
    }
}

/// "Select a file" menu: one numbered entry per file plus `0. cancel`.
pub fn file_menu(files: &[String]) -> MenuNode<Option<String>> {
    let mut menu = MenuNode::submenu("Select a file");
    let mut keys = KeySequence::new(Defaults::FIRST_KEY);
    for f in files {
        menu.append_next(&mut keys, MenuNode::command(f.as_str(), PickFile));
    }
    menu.append_exit("cancel");
    menu
}

/// Runs the picker as its own menu session. `None` when cancelled.
pub async fn pick_file(files: &[String], console: &mut Console) -> Result<Option<String>> {
    let mut menu = file_menu(files);
    let mut picked = None;
    Navigator::new(&mut menu).run(console, &mut picked).await?;
    Ok(picked)
}
