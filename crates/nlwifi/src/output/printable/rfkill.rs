//! Printable implementation for RfkillEvent.

use std::io::Write;

use crate::output::formatting::yes_no;
use crate::output::{OutputOptions, Printable};
use crate::rfkill::{Rfkill, RfkillEvent};

impl Printable for RfkillEvent {
    fn print_text<W: Write>(&self, w: &mut W, _opts: &OutputOptions) -> std::io::Result<()> {
        match Rfkill::name(self.index) {
            Ok(name) => writeln!(w, "{}: {}: {}", self.index, name, self.kind)?,
            Err(_) => writeln!(w, "{}: {}", self.index, self.kind)?,
        }
        writeln!(w, "\tSoft blocked: {}", yes_no(self.soft))?;
        writeln!(w, "\tHard blocked: {}", yes_no(self.hard))
    }

    fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::json!({
            "id": self.index,
            "type": self.kind.to_string(),
            "soft": if self.soft { "blocked" } else { "unblocked" },
            "hard": if self.hard { "blocked" } else { "unblocked" },
        });
        if let Ok(name) = Rfkill::name(self.index) {
            obj["device"] = serde_json::json!(name);
        }
        obj
    }
}
