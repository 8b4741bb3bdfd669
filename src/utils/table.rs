//! Table rendering utilities for CLI outputs.

use crate::utils::ansi::{display_width, pad_right};

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column widths fit the widest cell as shown on screen (colour codes
    /// excluded); missing cells render empty.
    pub fn render(&self) -> String {
        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| display_width(c))
                    .chain(std::iter::once(display_width(h)))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();

        // Header
        for (h, w) in self.headers.iter().zip(&widths) {
            out.push_str(&pad_right(h, *w));
            out.push_str("  ");
        }
        out.push('\n');
        for w in &widths {
            out.push_str(&format!("{}  ", "-".repeat(*w)));
        }
        out.push('\n');

        // Rows
        for row in &self.rows {
            for (i, w) in widths.iter().enumerate() {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                out.push_str(&pad_right(cell, *w));
                out.push_str("  ");
            }
            out.push('\n');
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ansi::strip_ansi;
    use crate::utils::colors::colorize_flag;

    #[test]
    fn widths_follow_widest_cell() {
        let mut t = Table::new(["ID", "TITLE"]);
        t.add_row(vec!["1".into(), "Opening keynote".into()]);
        let out = t.render();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "ID  TITLE            ");
        assert_eq!(lines[2], "1   Opening keynote  ");
    }

    #[test]
    fn coloured_cells_align_with_plain_ones() {
        let mut t = Table::new(["FLAG", "NEXT"]);
        t.add_row(vec![colorize_flag(true), "x".into()]);
        t.add_row(vec!["plainvalue".into(), "y".into()]);

        let out = strip_ansi(&t.render());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[2].find('x'), Some(12));
        assert_eq!(lines[3].find('y'), Some(12));
    }

    #[test]
    fn wide_characters_use_display_width() {
        let mut t = Table::new(["T", "N"]);
        t.add_row(vec!["会議".into(), "1".into()]);
        t.add_row(vec!["abcd".into(), "2".into()]);

        let out = t.render();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[2], "会議  1  ");
        assert_eq!(lines[3], "abcd  2  ");
    }
}
