//! Text and JSON rendering of domain records.
//!
//! Enabled with the `output` feature.
//!
//! # Example
//!
//! ```rust,no_run
//! use nlwifi::netlink::genl::nl80211::Nl80211Connection;
//! use nlwifi::output::{OutputFormat, OutputOptions, Printable};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut nl = Nl80211Connection::new()?;
//! let interfaces = nl.interfaces()?;
//!
//! let opts = OutputOptions { pretty: true, ..Default::default() };
//! interfaces.print(&mut std::io::stdout().lock(), OutputFormat::Json, &opts)?;
//! # Ok(())
//! # }
//! ```

pub mod formatting;
mod printable;

use std::io::Write;

/// Output format options.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Show extra details (bands, channels, commands).
    pub details: bool,
    /// Pretty print (for JSON).
    pub pretty: bool,
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text output.
    #[default]
    Text,
    /// JSON output.
    Json,
}

/// Trait for types that can be printed.
pub trait Printable {
    /// Print as plain text.
    fn print_text<W: Write>(&self, w: &mut W, opts: &OutputOptions) -> std::io::Result<()>;

    /// Convert to JSON value.
    fn to_json(&self) -> serde_json::Value;

    /// Print in the specified format.
    fn print<W: Write>(
        &self,
        w: &mut W,
        format: OutputFormat,
        opts: &OutputOptions,
    ) -> std::io::Result<()> {
        match format {
            OutputFormat::Text => self.print_text(w, opts),
            OutputFormat::Json => {
                let json = self.to_json();
                if opts.pretty {
                    serde_json::to_writer_pretty(&mut *w, &json)?;
                } else {
                    serde_json::to_writer(&mut *w, &json)?;
                }
                writeln!(w)?;
                Ok(())
            }
        }
    }
}

/// Lists print item by item as text and as one JSON array.
impl<T: Printable> Printable for [T] {
    fn print_text<W: Write>(&self, w: &mut W, opts: &OutputOptions) -> std::io::Result<()> {
        for item in self {
            item.print_text(w, opts)?;
        }
        Ok(())
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.iter().map(Printable::to_json).collect())
    }
}

impl<T: Printable> Printable for Vec<T> {
    fn print_text<W: Write>(&self, w: &mut W, opts: &OutputOptions) -> std::io::Result<()> {
        self.as_slice().print_text(w, opts)
    }

    fn to_json(&self) -> serde_json::Value {
        self.as_slice().to_json()
    }
}
