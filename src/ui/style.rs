// style.rs
use crossterm::style::{StyledContent, Stylize};

pub fn span_key(s: &str) -> StyledContent<&str> {
    s.cyan().bold()
}
pub fn span_sep(s: &str) -> StyledContent<&str> {
    s.dark_grey()
}
pub fn span_crumb(s: &str) -> StyledContent<&str> {
    s.yellow()
}
pub fn span_error(s: &str) -> StyledContent<&str> {
    s.red().bold()
}
