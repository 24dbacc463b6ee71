//! Ordered INI document builder.
//!
//! Keys are emitted exactly in insertion order. Nothing is sorted and nothing
//! is escaped: the daemons we generate configs for read values verbatim to
//! the end of the line.

use std::fmt::{Display, Write};

/// A named `[section]` and its `key = value` lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    pub name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Append a `key = value` line.
    pub fn set(&mut self, key: impl Into<String>, value: impl Display) -> &mut Self {
        self.entries.push((key.into(), value.to_string()));
        self
    }

    /// Append a line only when a value is present.
    pub fn set_opt<V: Display>(&mut self, key: impl Into<String>, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.set(key, value);
        }
        self
    }

    fn write_lines(&self, out: &mut String) {
        for (key, value) in &self.entries {
            // Writing into a String cannot fail
            let _ = writeln!(out, "{} = {}", key, value);
        }
    }
}

/// Unnamed global keys followed by named sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IniDocument {
    global: Section,
    sections: Vec<Section>,
}

impl IniDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// The unnamed section whose keys appear bare at the top of the file.
    pub fn global(&mut self) -> &mut Section {
        &mut self.global
    }

    /// Start a new named section. Sections are rendered in the order they
    /// were added, even if two share a name.
    pub fn section(&mut self, name: impl Into<String>) -> &mut Section {
        self.sections.push(Section::new(name));
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }

    /// Render the document. Blocks are separated by one blank line and the
    /// output always ends with a newline (or is empty).
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.global.write_lines(&mut out);

        for section in &self.sections {
            if !out.is_empty() {
                out.push('\n');
            }
            let _ = writeln!(out, "[{}]", section.name);
            section.write_lines(&mut out);
        }

        out
    }
}
