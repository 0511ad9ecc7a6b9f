// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Streaming build log writers

use std::io::Write;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors from writing a build log
#[derive(Debug, Error)]
pub enum BuildLogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid build log state: {0}")]
    InvalidState(String),
}

/// Element-oriented sink for build log output
pub trait LogWriter: Send {
    fn write_start_element(&mut self, name: &str) -> Result<(), BuildLogError>;
    fn write_attribute(&mut self, name: &str, value: &str) -> Result<(), BuildLogError>;
    fn write_string(&mut self, text: &str) -> Result<(), BuildLogError>;
    fn write_end_element(&mut self) -> Result<(), BuildLogError>;
    /// Close every element still open
    fn write_end_document(&mut self) -> Result<(), BuildLogError>;
    fn close(&mut self) -> Result<(), BuildLogError>;

    /// Write `<name>value</name>`
    fn write_element_string(&mut self, name: &str, value: &str) -> Result<(), BuildLogError> {
        self.write_start_element(name)?;
        self.write_string(value)?;
        self.write_end_element()
    }
}

/// XML writer over any byte sink
pub struct XmlLogWriter<W: Write + Send> {
    out: W,
    open: Vec<String>,
    tag_open: bool,
    closed: bool,
}

impl<W: Write + Send> XmlLogWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            open: Vec::new(),
            tag_open: false,
            closed: false,
        }
    }

    /// Write the XML declaration. Must precede the root element.
    pub fn write_declaration(&mut self) -> Result<(), BuildLogError> {
        self.out
            .write_all(b"<?xml version=\"1.0\" encoding=\"utf-8\"?>\n")?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn finish_start_tag(&mut self) -> Result<(), BuildLogError> {
        if self.tag_open {
            self.out.write_all(b">")?;
            self.tag_open = false;
        }
        Ok(())
    }

    fn ensure_writable(&self) -> Result<(), BuildLogError> {
        if self.closed {
            return Err(BuildLogError::InvalidState("writer is closed".to_string()));
        }
        Ok(())
    }
}

impl<W: Write + Send> LogWriter for XmlLogWriter<W> {
    fn write_start_element(&mut self, name: &str) -> Result<(), BuildLogError> {
        self.ensure_writable()?;
        self.finish_start_tag()?;
        write!(self.out, "<{}", name)?;
        self.open.push(name.to_string());
        self.tag_open = true;
        Ok(())
    }

    fn write_attribute(&mut self, name: &str, value: &str) -> Result<(), BuildLogError> {
        self.ensure_writable()?;
        if !self.tag_open {
            return Err(BuildLogError::InvalidState(format!(
                "attribute '{}' written outside a start tag",
                name
            )));
        }
        write!(self.out, " {}=\"{}\"", name, escape(value, true))?;
        Ok(())
    }

    fn write_string(&mut self, text: &str) -> Result<(), BuildLogError> {
        self.ensure_writable()?;
        self.finish_start_tag()?;
        self.out.write_all(escape(text, false).as_bytes())?;
        Ok(())
    }

    fn write_end_element(&mut self) -> Result<(), BuildLogError> {
        self.ensure_writable()?;
        let name = self
            .open
            .pop()
            .ok_or_else(|| BuildLogError::InvalidState("no element to end".to_string()))?;
        if self.tag_open {
            self.out.write_all(b"/>")?;
            self.tag_open = false;
        } else {
            write!(self.out, "</{}>", name)?;
        }
        Ok(())
    }

    fn write_end_document(&mut self) -> Result<(), BuildLogError> {
        if self.closed {
            return Ok(());
        }
        while !self.open.is_empty() {
            self.write_end_element()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), BuildLogError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.out.flush()?;
        Ok(())
    }
}

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\t' | '\n' | '\r' => out.push(c),
            // Not representable in XML 1.0
            c if c < ' ' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Writer that discards everything
#[derive(Clone, Copy, Debug, Default)]
pub struct NullLogWriter;

impl LogWriter for NullLogWriter {
    fn write_start_element(&mut self, _name: &str) -> Result<(), BuildLogError> {
        Ok(())
    }

    fn write_attribute(&mut self, _name: &str, _value: &str) -> Result<(), BuildLogError> {
        Ok(())
    }

    fn write_string(&mut self, _text: &str) -> Result<(), BuildLogError> {
        Ok(())
    }

    fn write_end_element(&mut self) -> Result<(), BuildLogError> {
        Ok(())
    }

    fn write_end_document(&mut self) -> Result<(), BuildLogError> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), BuildLogError> {
        Ok(())
    }
}

/// A recorded writer call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriterCall {
    StartElement(String),
    Attribute(String, String),
    String(String),
    EndElement,
    EndDocument,
    Close,
}

/// Writer that records every call for assertions
#[derive(Clone, Default)]
pub struct RecordingLogWriter {
    calls: Arc<Mutex<Vec<WriterCall>>>,
}

impl RecordingLogWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls recorded so far, shared across clones
    pub fn calls(&self) -> Vec<WriterCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// How many recorded calls equal `call`
    pub fn count(&self, call: &WriterCall) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: WriterCall) -> Result<(), BuildLogError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
        Ok(())
    }
}

impl LogWriter for RecordingLogWriter {
    fn write_start_element(&mut self, name: &str) -> Result<(), BuildLogError> {
        self.record(WriterCall::StartElement(name.to_string()))
    }

    fn write_attribute(&mut self, name: &str, value: &str) -> Result<(), BuildLogError> {
        self.record(WriterCall::Attribute(name.to_string(), value.to_string()))
    }

    fn write_string(&mut self, text: &str) -> Result<(), BuildLogError> {
        self.record(WriterCall::String(text.to_string()))
    }

    fn write_end_element(&mut self) -> Result<(), BuildLogError> {
        self.record(WriterCall::EndElement)
    }

    fn write_end_document(&mut self) -> Result<(), BuildLogError> {
        self.record(WriterCall::EndDocument)
    }

    fn close(&mut self) -> Result<(), BuildLogError> {
        self.record(WriterCall::Close)
    }
}

#[cfg(test)]
#[path = "build_log_tests.rs"]
mod tests;
