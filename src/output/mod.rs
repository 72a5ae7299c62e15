//
//  sourcecraft-cli
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Module
//!
//! Renders command results either for humans (tables and field lists) or
//! for scripts (`--json`). Status messages always go to stderr so JSON on
//! stdout stays parseable.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sourcecraft_cli::output::{OutputFormat, OutputWriter};
//!
//! let writer = OutputWriter::new(OutputFormat::Json);
//! writer.write(&my_data)?;
//! writer.write_success("Operation completed successfully");
//! ```

mod table;

pub use table::*;

use serde::Serialize;

use crate::api::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub struct OutputWriter {
    format: OutputFormat,
    color: bool,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: console::colors_enabled(),
        }
    }

    pub fn from_json_flag(json: bool) -> Self {
        Self::new(if json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        })
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    pub fn write<T: Serialize + TableOutput>(&self, value: &T) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(value)?,
            OutputFormat::Table => value.print_table(self.color),
        }
        Ok(())
    }

    /// Writes one list page. Table output ends with a hint when more pages
    /// exist on the server.
    pub fn write_page<T: Serialize + TableRow>(
        &self,
        page: &Page<T>,
        empty_message: &str,
    ) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(page)?,
            OutputFormat::Table => {
                if page.is_empty() {
                    println!("{}", empty_message);
                } else {
                    TableBuilder::from_rows(&page.items, self.color).print();
                }
                if page.has_next() {
                    self.write_info("More results are available; only the first page is shown.");
                }
            }
        }
        Ok(())
    }

    pub fn write_warning(&self, msg: &str) {
        use console::style;
        if self.color {
            eprintln!("{} {}", style("warning:").yellow().bold(), msg);
        } else {
            eprintln!("warning: {}", msg);
        }
    }

    pub fn write_info(&self, msg: &str) {
        use console::style;
        if self.color {
            eprintln!("{}", style(msg).dim());
        } else {
            eprintln!("{}", msg);
        }
    }

    pub fn write_success(&self, msg: &str) {
        use console::style;
        if self.color {
            eprintln!("{} {}", style("✓").green().bold(), msg);
        } else {
            eprintln!("✓ {}", msg);
        }
    }
}

pub fn write_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// A value with a detailed human-readable view.
pub trait TableOutput {
    fn print_table(&self, color: bool);
}

pub fn print_header(text: &str) {
    use console::style;
    println!("{}", style(text).bold());
    println!("{}", "-".repeat(text.chars().count()));
}

pub fn print_field(key: &str, value: &str, color: bool) {
    use console::style;
    if color {
        println!("{}: {}", style(key).dim(), value);
    } else {
        println!("{}: {}", key, value);
    }
}

/// Prints `key: value` when `value` is present and non-empty.
pub fn print_optional_field(key: &str, value: Option<&str>, color: bool) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        print_field(key, v, color);
    }
}
