// src/keys.rs

/// Formats the raw counter value into the label the user types.
pub type KeyFormat = Box<dyn Fn(i64) -> String + Send + Sync>;

/// Sequential option labels for building menus.
///
/// Every `count()` hands out `transform(counter)` and then advances the
/// counter by `step`. `reset()` rewinds so several menus can be numbered
/// independently with the same generator.
pub struct KeySequence {
    start: i64,
    counter: i64,
    step: i64,
    transform: KeyFormat,
}

impl KeySequence {
    /// Numeric keys starting at `start`, step 1.
    pub fn new(start: i64) -> Self {
        Self::with_step(start, 1)
    }

    pub fn with_step(start: i64, step: i64) -> Self {
        Self { start, counter: start, step, transform: Box::new(numeric) }
    }

    /// Builder form of [`KeySequence::set_transform`].
    pub fn with_transform<F>(mut self, f: F) -> Self
    where
        F: Fn(i64) -> String + Send + Sync + 'static,
    {
        self.transform = Box::new(f);
        self
    }

    /// Next key. The counter wraps at the ends of the `i64` range, so
    /// drawing never fails.
    pub fn count(&mut self) -> String {
        let n = self.counter;
        self.counter = self.counter.wrapping_add(self.step);
        (self.transform)(n)
    }

    /// Rewind to `start` (or the original start). A new `step` applies from
    /// here on; `None` keeps the current one.
    pub fn reset(&mut self, start: Option<i64>, step: Option<i64>) {
        self.counter = start.unwrap_or(self.start);
        if let Some(step) = step {
            self.step = step;
        }
    }

    /// Only affects keys drawn after this call.
    pub fn set_transform<F>(&mut self, f: F)
    where
        F: Fn(i64) -> String + Send + Sync + 'static,
    {
        self.transform = Box::new(f);
    }

    pub fn step(&self) -> i64 { self.step }
}

pub fn numeric(n: i64) -> String {
    n.to_string()
}

/// Spreadsheet-style letters: 1 -> "a", 26 -> "z", 27 -> "aa".
/// Values below 1 fall back to the numeric form.
pub fn alphabetic(n: i64) -> String {
    if n < 1 {
        return numeric(n);
    }
    let mut n = n;
    let mut out = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        out.push((b'a' + rem) as char);
        n = (n - 1) / 26;
    }
    out.iter().rev().collect()
}
