//
//  sourcecraft-cli
//  output/table.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Table Output Formatting
//!
//! Tabular terminal output built on `comfy_table`, plus status colouring
//! shared by every list command.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sourcecraft_cli::output::TableBuilder;
//!
//! TableBuilder::new()
//!     .headers(["SLUG", "TITLE", "STATUS"])
//!     .row(["12", "Add retries", "open"])
//!     .print();
//! ```

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

/// A value that renders as one row of a list table.
pub trait TableRow {
    fn headers() -> &'static [&'static str];

    fn row(&self, color: bool) -> Vec<String>;
}

pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub struct TableBuilder {
    table: Table,
    color: bool,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self {
            table: create_table(),
            color: console::colors_enabled(),
        }
    }

    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        if self.color {
            self.table
                .set_header(headers.iter().map(|h| Cell::new(h).fg(Color::Cyan)));
        } else {
            self.table.set_header(headers);
        }
        self
    }

    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = cells.into_iter().map(Into::into).collect();
        self.table.add_row(row);
        self
    }

    /// Builds a table of `items` from their [`TableRow`] impl.
    pub fn from_rows<T: TableRow>(items: &[T], color: bool) -> Self {
        let mut builder = Self::new().color(color).headers(T::headers().iter().copied());
        for item in items {
            builder = builder.row(item.row(color));
        }
        builder
    }

    pub fn print(self) {
        println!("{}", self.table);
    }

    pub fn build(self) -> Table {
        self.table
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Colours a run, pull request, issue or milestone status.
pub fn format_status(status: &str, color: bool) -> String {
    if !color {
        return status.to_string();
    }

    use console::style;
    match status.to_lowercase().as_str() {
        "open" | "opened" | "running" | "in_progress" | "created" => {
            style(status).green().to_string()
        }
        "merged" | "success" | "succeeded" | "completed" | "closed" => {
            style(status).blue().to_string()
        }
        "failure" | "failed" | "error" | "cancelled" | "declined" => {
            style(status).red().to_string()
        }
        "draft" | "pending" | "queued" | "waiting" | "paused" => {
            style(status).yellow().to_string()
        }
        _ => status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair(&'static str, &'static str);

    impl TableRow for Pair {
        fn headers() -> &'static [&'static str] {
            &["KEY", "VALUE"]
        }

        fn row(&self, _color: bool) -> Vec<String> {
            vec![self.0.to_string(), self.1.to_string()]
        }
    }

    #[test]
    fn test_from_rows_renders_headers_and_cells() {
        let rendered = TableBuilder::from_rows(&[Pair("a", "1"), Pair("b", "2")], false)
            .build()
            .to_string();
        assert!(rendered.contains("KEY"));
        assert!(rendered.contains("VALUE"));
        assert!(rendered.contains('b'));
    }

    #[test]
    fn test_status_plain_without_color() {
        assert_eq!(format_status("running", false), "running");
    }
}
