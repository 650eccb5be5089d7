//! The [`output`](self) module contains the writer the engine renders
//! human readable descriptions to, and the formatter that turns argument
//! values into text.

use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::error::{guard_callback, Error, Result};
use crate::types::{Type, Value};

/// Append only sink for human readable text.
pub trait OutputWriter {
    /// Append `text` to the output.
    fn write(&mut self, text: &str);
}

impl OutputWriter for String {
    fn write(&mut self, text: &str) {
        self.push_str(text);
    }
}

/// [`OutputWriter`] that collects the written text in a [`String`].
///
/// Text written after a newline is indented by the current indentation level.
#[must_use]
#[derive(Debug)]
pub struct StringOutputWriter {
    buffer: String,
    indent: usize,
    at_line_start: bool,
}

impl StringOutputWriter {
    /// Create a new empty writer.
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            indent: 0,
            at_line_start: true,
        }
    }

    /// Increase the indentation of all following lines by two spaces.
    pub fn indent(&mut self) {
        self.indent += 1;
    }

    /// Revert one level of indentation.
    pub fn unindent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Write a line break.
    pub fn write_line(&mut self) {
        self.buffer.push('\n');
        self.at_line_start = true;
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl Default for StringOutputWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputWriter for StringOutputWriter {
    fn write(&mut self, text: &str) {
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.write_line();
            }

            if line.is_empty() {
                continue;
            }

            if self.at_line_start {
                for _ in 0..self.indent {
                    self.buffer.push_str("  ");
                }
                self.at_line_start = false;
            }

            self.buffer.push_str(line);
        }
    }
}

/// User supplied function that renders values of one specific type.
pub type FormatFn = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Renders argument values for descriptions and diagnostic messages.
///
/// Values render as follows: `NULL`, strings in double quotes, chars in
/// single quotes, numbers and booleans using their [`Display`](std::fmt::Display)
/// implementation, sequences as `[a, b, c]`. Sequences with more than
/// five elements only show the first and the last two elements. Objects
/// use a registered custom formatter, the display name if the object is a
/// test double, or [`ObjectArgument::render`](crate::types::ObjectArgument::render).
#[derive(Default, Clone)]
pub struct ArgumentValueFormatter {
    custom: HashMap<Type, FormatFn>,
}

impl ArgumentValueFormatter {
    const MAX_SHOWN_ELEMENTS: usize = 5;
    const EDGE_ELEMENTS: usize = 2;

    /// Create a new formatter without custom formatters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom formatter for values of the runtime type `ty`.
    #[must_use]
    pub fn with_formatter<F>(mut self, ty: Type, f: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.custom.insert(ty, Arc::new(f));

        self
    }

    /// Render `value` into a new string.
    ///
    /// # Errors
    /// Returns [`Error::UserCallback`] if a custom formatter failed, and
    /// [`Error::Render`] if an object could not render itself.
    pub fn format(&self, value: &Value) -> Result<String> {
        let mut out = String::new();
        self.write_value(&mut out, value)?;

        Ok(out)
    }

    /// Render `value`, falling back to the display name of a test double or
    /// the name of the runtime type if the value could not be rendered.
    ///
    /// # Errors
    /// Faults of custom formatters are not recovered and returned as
    /// [`Error::UserCallback`].
    pub fn format_or_fallback(&self, value: &Value) -> Result<String> {
        match self.format(value) {
            Ok(s) => Ok(s),
            Err(err) if err.is_user_callback() => Err(err),
            Err(err) => {
                tracing::debug!(error = %err, "unable to render value, using fallback");

                Ok(Self::fallback(value))
            }
        }
    }

    fn fallback(value: &Value) -> String {
        if let Value::Object(o) = value {
            if let Some(name) = o.fake_display_name() {
                return name;
            }
        }

        value
            .runtime_type()
            .map_or_else(|| "NULL".to_owned(), |ty| ty.to_string())
    }

    /// Render `value` to the passed `writer`.
    ///
    /// # Errors
    /// See [`format`](Self::format).
    pub fn write_value(&self, writer: &mut dyn OutputWriter, value: &Value) -> Result<()> {
        if let Some(ty) = value.runtime_type() {
            if let Some(f) = self.custom.get(&ty) {
                let text = guard_callback(
                    || Ok(format!("Argument value formatter for {ty}")),
                    || Ok(f(value)),
                )?;
                writer.write(&text);

                return Ok(());
            }
        }

        match value {
            Value::Null => writer.write("NULL"),
            Value::Bool(x) => writer.write(&x.to_string()),
            Value::I32(x) => writer.write(&x.to_string()),
            Value::I64(x) => writer.write(&x.to_string()),
            Value::U8(x) => writer.write(&x.to_string()),
            Value::F64(x) => writer.write(&x.to_string()),
            Value::Char(x) => writer.write(&format!("'{x}'")),
            Value::Str(x) => writer.write(&format!("\"{x}\"")),
            Value::Seq(seq) => self.write_elements(writer, seq.items())?,
            Value::Object(o) => {
                if let Some(name) = o.fake_display_name() {
                    writer.write(&name);
                } else {
                    let text = o.render().map_err(|err| Error::Render {
                        ty: o.runtime_type(),
                        reason: err.to_string(),
                    })?;
                    writer.write(&text);
                }
            }
        }

        Ok(())
    }

    fn write_elements(&self, writer: &mut dyn OutputWriter, items: &[Value]) -> Result<()> {
        writer.write("[");

        if items.len() > Self::MAX_SHOWN_ELEMENTS {
            let (head, rest) = items.split_at(Self::EDGE_ELEMENTS);
            let (skipped, tail) = rest.split_at(rest.len() - Self::EDGE_ELEMENTS);

            self.write_list(writer, head)?;
            writer.write(&format!(", … ({} more elements) …, ", skipped.len()));
            self.write_list(writer, tail)?;
        } else {
            self.write_list(writer, items)?;
        }

        writer.write("]");

        Ok(())
    }

    /// Write the passed values separated by `, `.
    ///
    /// # Errors
    /// See [`format`](Self::format).
    pub fn write_list(&self, writer: &mut dyn OutputWriter, items: &[Value]) -> Result<()> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                writer.write(", ");
            }

            self.write_value(writer, item)?;
        }

        Ok(())
    }
}

impl Debug for ArgumentValueFormatter {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ArgumentValueFormatter")
            .field("custom", &self.custom.keys().collect::<Vec<_>>())
            .finish()
    }
}
