// src/menu.rs
//! Stack-based menu navigation.
//!
//! A [`MenuNode`] is both a keyed container of child nodes and an action
//! that runs when the node is picked from its parent. The [`Navigator`]
//! keeps the path of open menus as a stack of keys from the root and moves
//! along it according to the [`Selection`] each action returns. The tree
//! stays mutable while a session is running: actions get the menu they were
//! picked from, and callers can reach it between steps.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::defaults::Defaults;
use crate::keys::KeySequence;
use crate::ui::console::Console;

/// What the navigator should do after a node has been selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Open the selected node as a menu.
    Descend,
    /// Command finished; keep showing the current menu.
    Stay,
    /// Leave the current menu (ends navigation at the root).
    Back,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MenuError {
    #[error("no option registered under key '{0}'")]
    UnknownKey(String),
}

#[async_trait]
pub trait MenuAction<C>: Send + Sync {
    async fn select(&self, at: &mut MenuCursor<'_, C>, console: &mut Console, ctx: &mut C) -> Result<Selection>;
}

/// The menu an action was picked from, plus the key it was picked under.
pub struct MenuCursor<'m, C> {
    menu: &'m mut MenuNode<C>,
    key: String,
}

impl<'m, C> MenuCursor<'m, C> {
    pub fn key(&self) -> &str { &self.key }

    /// The selected node. `None` once the action has removed it.
    pub fn node(&self) -> Option<&MenuNode<C>> {
        self.menu.child(&self.key)
    }

    pub fn menu(&self) -> &MenuNode<C> { &*self.menu }

    pub fn menu_mut(&mut self) -> &mut MenuNode<C> { &mut *self.menu }
}

/// Adapter for synchronous closures.
pub struct FnAction<F>(pub F);

impl<F> FnAction<F> {
    pub fn new<C>(f: F) -> Self
    where
        C: Send,
        F: Fn(&mut Console, &mut C) -> Result<Selection> + Send + Sync,
    {
        Self(f)
    }
}

#[async_trait]
impl<C, F> MenuAction<C> for FnAction<F>
where
    C: Send,
    F: Fn(&mut Console, &mut C) -> Result<Selection> + Send + Sync,
{
    async fn select(&self, _at: &mut MenuCursor<'_, C>, console: &mut Console, ctx: &mut C) -> Result<Selection> {
        (self.0)(console, ctx)
    }
}

enum Action<C> {
    Enter,
    Exit,
    Run(Arc<dyn MenuAction<C>>),
}

impl<C> Clone for Action<C> {
    fn clone(&self) -> Self {
        match self {
            Action::Enter => Action::Enter,
            Action::Exit => Action::Exit,
            Action::Run(a) => Action::Run(Arc::clone(a)),
        }
    }
}

pub struct MenuNode<C> {
    name: String,
    children: Vec<(String, MenuNode<C>)>,
    action: Action<C>,
}

impl<C> MenuNode<C> {
    pub fn name(&self) -> &str { &self.name }

    pub fn child(&self, key: &str) -> Option<&MenuNode<C>> {
        self.children.iter().find(|(k, _)| k == key).map(|(_, n)| n)
    }

    pub fn child_mut(&mut self, key: &str) -> Option<&mut MenuNode<C>> {
        self.children.iter_mut().find(|(k, _)| k == key).map(|(_, n)| n)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize { self.children.len() }

    pub fn is_empty(&self) -> bool { self.children.is_empty() }

    /// Registers `child` under `key`. An existing key is replaced in place.
    pub fn append(&mut self, key: impl Into<String>, child: MenuNode<C>) -> &mut Self {
        let key = key.into();
        match self.children.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = child,
            None => self.children.push((key, child)),
        }
        self
    }

    /// Appends `child` under the next key drawn from `keys`.
    pub fn append_next(&mut self, keys: &mut KeySequence, child: MenuNode<C>) -> &mut Self {
        let key = keys.count();
        self.append(key, child)
    }

    pub fn remove(&mut self, key: &str) -> Result<MenuNode<C>, MenuError> {
        let pos = self
            .children
            .iter()
            .position(|(k, _)| k == key)
            .ok_or_else(|| MenuError::UnknownKey(key.to_string()))?;
        Ok(self.children.remove(pos).1)
    }

    /// Breadcrumb of `path` followed by this node's options.
    pub fn render(&self, path: &[&MenuNode<C>], console: &mut Console) -> std::io::Result<()> {
        console.breadcrumb(path.iter().map(|n| n.name()))?;
        for (key, child) in &self.children {
            console.option(key, child.name())?;
        }
        Ok(())
    }
}

impl<C: Send> MenuNode<C> {
    /// A node that opens as a menu when selected.
    pub fn submenu(name: impl Into<String>) -> Self {
        Self::with_action(name, Action::Enter)
    }

    /// A node that always leaves the menu it is listed in.
    pub fn exit(name: impl Into<String>) -> Self {
        Self::with_action(name, Action::Exit)
    }

    pub fn command(name: impl Into<String>, action: impl MenuAction<C> + 'static) -> Self {
        Self::with_action(name, Action::Run(Arc::new(action)))
    }

    fn with_action(name: impl Into<String>, action: Action<C>) -> Self {
        Self { name: name.into(), children: Vec::new(), action }
    }

    /// Appends the conventional `0. <name>` exit entry.
    pub fn append_exit(&mut self, name: impl Into<String>) -> &mut Self {
        self.append(Defaults::EXIT_KEY, MenuNode::exit(name))
    }

    /// Selects the child under `key`. Command actions run with a cursor on
    /// this menu, so they may add or remove entries while it is open.
    pub async fn select(&mut self, key: &str, console: &mut Console, ctx: &mut C) -> Result<Selection> {
        let action = self
            .child(key)
            .map(|n| n.action.clone())
            .ok_or_else(|| MenuError::UnknownKey(key.to_string()))?;
        match action {
            Action::Enter => Ok(Selection::Descend),
            Action::Exit => Ok(Selection::Back),
            Action::Run(action) => {
                let mut at = MenuCursor { menu: self, key: key.to_string() };
                action.select(&mut at, console, ctx).await
            }
        }
    }
}

/// Result of feeding one key to the [`Navigator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Invalid,
    Descended,
    Stayed,
    Ascended,
    Terminated,
}

fn resolve_mut<'m, C>(mut node: &'m mut MenuNode<C>, path: &[String]) -> Option<&'m mut MenuNode<C>> {
    for key in path {
        let idx = node.children.iter().position(|(k, _)| k == key)?;
        node = &mut node.children[idx].1;
    }
    Some(node)
}

pub struct Navigator<'a, C> {
    root: &'a mut MenuNode<C>,
    /// Keys from the root to the open menu; the root itself is implicit.
    path: Vec<String>,
    running: bool,
}

impl<'a, C: Send> Navigator<'a, C> {
    pub fn new(root: &'a mut MenuNode<C>) -> Self {
        Self { root, path: Vec::new(), running: true }
    }

    pub fn depth(&self) -> usize { self.stack().len() }

    pub fn is_running(&self) -> bool { self.running }

    /// Open menus from the root down. Stops early at a key whose node has
    /// been removed since it was entered.
    fn stack(&self) -> Vec<&MenuNode<C>> {
        if !self.running {
            return Vec::new();
        }
        let mut node = &*self.root;
        let mut nodes = vec![node];
        for key in &self.path {
            match node.child(key) {
                Some(next) => {
                    nodes.push(next);
                    node = next;
                }
                None => break,
            }
        }
        nodes
    }

    pub fn current(&self) -> Option<&MenuNode<C>> {
        self.stack().pop()
    }

    pub fn root_mut(&mut self) -> &mut MenuNode<C> { &mut *self.root }

    /// The open menu, for callers that change it between steps.
    pub fn current_mut(&mut self) -> Option<&mut MenuNode<C>> {
        if !self.running {
            return None;
        }
        self.prune();
        resolve_mut(&mut *self.root, &self.path)
    }

    pub fn path(&self) -> Vec<&str> {
        self.stack().into_iter().map(|n| n.name()).collect()
    }

    /// Drops path entries whose menus no longer exist.
    fn prune(&mut self) {
        let live = self.stack().len().saturating_sub(1);
        if live < self.path.len() {
            warn!(from = self.path.len() + 1, to = live + 1, "open menu was removed, moving up");
            self.path.truncate(live);
        }
    }

    pub fn render(&self, console: &mut Console) -> std::io::Result<()> {
        let stack = self.stack();
        match stack.last() {
            Some(top) => top.render(&stack, console),
            None => Ok(()),
        }
    }

    /// Applies one key to the top of the stack.
    pub async fn step(&mut self, key: &str, console: &mut Console, ctx: &mut C) -> Result<Step> {
        if !self.running {
            return Ok(Step::Terminated);
        }
        self.prune();
        let Some(top) = resolve_mut(&mut *self.root, &self.path) else {
            return Ok(Step::Terminated);
        };
        let Some(name) = top.child(key).map(|n| n.name().to_string()) else {
            console.error(format!("'{key}' is not a valid option"))?;
            return Ok(Step::Invalid);
        };

        let selection = match top.select(key, console, ctx).await {
            Ok(s) => s,
            Err(e) => {
                error!(option = %name, "action failed: {e:#}");
                console.error(format!("ERROR: {e:#}"))?;
                Selection::Stay
            }
        };
        console.blank()?;

        let step = match selection {
            Selection::Descend if top.child(key).is_some() => {
                self.path.push(key.to_string());
                Step::Descended
            }
            Selection::Descend => {
                warn!(key, option = %name, "selected option is gone, staying");
                Step::Stayed
            }
            Selection::Stay => Step::Stayed,
            Selection::Back => {
                if self.path.pop().is_some() {
                    Step::Ascended
                } else {
                    self.running = false;
                    Step::Terminated
                }
            }
        };
        debug!(key, option = %name, depth = self.depth(), ?step, "menu transition");
        Ok(step)
    }

    /// Drives the menu until the stack empties or input runs out.
    pub async fn run(&mut self, console: &mut Console, ctx: &mut C) -> Result<()> {
        while self.is_running() {
            self.render(console)?;
            let Some(key) = console.prompt(Defaults::PROMPT)? else {
                debug!(depth = self.depth(), "input closed, leaving menu");
                self.path.clear();
                self.running = false;
                break;
            };
            self.step(&key, console, ctx).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter_cmd(name: &str) -> MenuNode<u32> {
        MenuNode::command(name, FnAction::new(|_: &mut Console, hits: &mut u32| -> Result<Selection> {
            *hits += 1;
            Ok(Selection::Stay)
        }))
    }

    #[test]
    fn append_replaces_existing_key_in_place() {
        let mut root: MenuNode<u32> = MenuNode::submenu("root");
        root.append("1", counter_cmd("first"));
        root.append("2", counter_cmd("second"));
        root.append("1", counter_cmd("replacement"));

        assert_eq!(root.len(), 2);
        assert_eq!(root.keys().collect::<Vec<_>>(), vec!["1", "2"]);
        assert_eq!(root.child("1").map(|n| n.name()), Some("replacement"));
        assert_eq!(root.child("2").map(|n| n.name()), Some("second"));
    }

    #[test]
    fn remove_unknown_key_fails() {
        let mut root: MenuNode<u32> = MenuNode::submenu("root");
        root.append("1", counter_cmd("only"));
        assert_eq!(root.remove("7").err(), Some(MenuError::UnknownKey("7".into())));
        assert_eq!(root.remove("1").map(|n| n.name().to_string()), Ok("only".to_string()));
        assert!(root.is_empty());
    }

    #[test]
    fn append_next_draws_keys() {
        let mut keys = KeySequence::new(1);
        let mut root: MenuNode<u32> = MenuNode::submenu("root");
        root.append_next(&mut keys, counter_cmd("a"));
        root.append_next(&mut keys, counter_cmd("b"));
        root.append_exit("exit");
        assert_eq!(root.keys().collect::<Vec<_>>(), vec!["1", "2", "0"]);
    }

    #[test]
    fn render_lists_breadcrumb_and_options_in_order() {
        let mut sub: MenuNode<u32> = MenuNode::submenu("Sub");
        sub.append("1", counter_cmd("run"));
        sub.append_exit("back");
        let root: MenuNode<u32> = MenuNode::submenu("Main");

        let (mut console, out) = Console::scripted(Vec::<String>::new());
        sub.render(&[&root, &sub], &mut console).unwrap();
        assert_eq!(out.text(), "Main >> Sub\n    1. run\n    0. back\n");
    }

    #[tokio::test]
    async fn select_maps_node_kind_to_selection() {
        let (mut console, _) = Console::scripted(Vec::<String>::new());
        let mut hits = 0u32;
        let mut root: MenuNode<u32> = MenuNode::submenu("root");
        root.append("s", MenuNode::submenu("s"));
        root.append("e", MenuNode::exit("e"));
        root.append("c", counter_cmd("c"));

        assert_eq!(root.select("s", &mut console, &mut hits).await.unwrap(), Selection::Descend);
        assert_eq!(root.select("e", &mut console, &mut hits).await.unwrap(), Selection::Back);
        assert_eq!(root.select("c", &mut console, &mut hits).await.unwrap(), Selection::Stay);
        assert_eq!(hits, 1);

        let err = root.select("9", &mut console, &mut hits).await.unwrap_err();
        assert_eq!(err.downcast_ref::<MenuError>(), Some(&MenuError::UnknownKey("9".into())));
    }

    struct RemoveSelf;

    #[async_trait]
    impl MenuAction<u32> for RemoveSelf {
        async fn select(&self, at: &mut MenuCursor<'_, u32>, _: &mut Console, _: &mut u32) -> Result<Selection> {
            let key = at.key().to_string();
            at.menu_mut().remove(&key)?;
            assert!(at.node().is_none());
            Ok(Selection::Descend)
        }
    }

    #[tokio::test]
    async fn descending_into_a_removed_option_stays() {
        let mut root: MenuNode<u32> = MenuNode::submenu("root");
        root.append("1", MenuNode::command("once", RemoveSelf));
        root.append_exit("exit");

        let (mut console, _) = Console::scripted(Vec::<String>::new());
        let mut nav = Navigator::new(&mut root);
        assert_eq!(nav.step("1", &mut console, &mut 0).await.unwrap(), Step::Stayed);
        assert_eq!(nav.depth(), 1);
        assert_eq!(nav.current().map(|m| m.keys().collect::<Vec<_>>()), Some(vec!["0"]));
    }

    #[tokio::test]
    async fn failing_action_is_reported_and_stays() {
        let mut root: MenuNode<u32> = MenuNode::submenu("root");
        root.append(
            "1",
            MenuNode::command("boom", FnAction::new(|_: &mut Console, _: &mut u32| -> Result<Selection> {
                anyhow::bail!("collaborator unavailable")
            })),
        );
        root.append_exit("exit");

        let (mut console, out) = Console::scripted(Vec::<String>::new());
        let mut nav = Navigator::new(&mut root);
        let step = nav.step("1", &mut console, &mut 0).await.unwrap();
        assert_eq!(step, Step::Stayed);
        assert_eq!(nav.depth(), 1);
        assert!(out.text().contains("ERROR: collaborator unavailable"));
    }
}
