// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Error types for kmersketch operations

use std::fmt;

use needletail::errors::ParseError;
use needletail::errors::ParseErrorKind;

/// ErrorKind is all kinds of Error of kmersketch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The config for sketches, hashers or sources is invalid.
    ConfigInvalid,
    /// A k-mer source could not be opened or parsed.
    SourceRead,
}

impl ErrorKind {
    /// Convert this error kind instance into static str.
    pub const fn into_static(self) -> &'static str {
        match self {
            ErrorKind::ConfigInvalid => "ConfigInvalid",
            ErrorKind::SourceRead => "SourceRead",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_static())
    }
}

/// Error is the error struct returned by all kmersketch functions.
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<(&'static str, String)>,
    source: Option<anyhow::Error>,
}

impl Error {
    /// Create a new Error with error kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: Vec::default(),
            source: None,
        }
    }

    /// Create a [`ErrorKind::ConfigInvalid`] error.
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a [`ErrorKind::SourceRead`] error for the named source.
    pub fn source_read(source: impl ToString, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SourceRead, message).with_context("source", source)
    }

    /// Add more context in error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Set source for error.
    ///
    /// # Panics
    ///
    /// Panics if the source has been set.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::error::Error as _;
    /// use kmersketch::error::{Error, ErrorKind};
    ///
    /// let mut error = Error::new(ErrorKind::SourceRead, "failed to open reads");
    /// assert!(error.source().is_none());
    /// error = error.set_source(std::io::Error::new(std::io::ErrorKind::NotFound, "IO error"));
    /// assert!(error.source().is_some());
    /// ```
    pub fn set_source(mut self, src: impl Into<anyhow::Error>) -> Self {
        assert!(self.source.is_none(), "the source error has been set");
        self.source = Some(src.into());
        self
    }

    /// Return error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return error's message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Return the value recorded for a context key, if any.
    pub fn context(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Reader errors become [`ErrorKind::SourceRead`] with the parser's error as
/// source. Callers add the `source` context.
impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        let message = match err.kind {
            ParseErrorKind::Io => "cannot read sequence file",
            ParseErrorKind::EmptyFile => "empty sequence stream",
            ParseErrorKind::UnknownFormat | ParseErrorKind::InvalidStart => {
                "unrecognized sequence format"
            }
            _ => "malformed sequence record",
        };
        Error::new(ErrorKind::SourceRead, message).set_source(err)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // If alternate has been specified, we will print like Debug.
        if f.alternate() {
            let mut de = f.debug_struct("Error");
            de.field("kind", &self.kind);
            de.field("message", &self.message);
            de.field("context", &self.context);
            de.field("source", &self.source);
            return de.finish();
        }

        write!(f, "{}", self.kind)?;
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        writeln!(f)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "Context:")?;
            for (k, v) in self.context.iter() {
                writeln!(f, "   {k}: {v}")?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "Source:")?;
            writeln!(f, "   {source:#}")?;
        }

        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if !self.context.is_empty() {
            write!(f, ", context: {{ ")?;
            write!(
                f,
                "{}",
                self.context
                    .iter()
                    .map(|(k, v)| format!("{k}: {v}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )?;
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        if let Some(source) = &self.source {
            write!(f, ", source: {source}")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|v| v.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_context_and_message() {
        let err = Error::source_read("reads.fa", "file not found");
        assert_eq!(err.kind(), ErrorKind::SourceRead);
        assert_eq!(err.context("source"), Some("reads.fa"));
        assert_eq!(
            err.to_string(),
            "SourceRead, context: { source: reads.fa } => file not found"
        );
    }

    fn parse_error(content: &'static [u8]) -> ParseError {
        needletail::parse_fastx_reader(std::io::Cursor::new(content))
            .err()
            .unwrap()
    }

    #[test]
    fn test_from_parse_error() {
        let err = Error::from(parse_error(b"not a sequence"));
        assert_eq!(err.kind(), ErrorKind::SourceRead);
        assert_eq!(err.message(), "unrecognized sequence format");
        assert!(std::error::Error::source(&err).is_some());

        let err = Error::from(parse_error(b"")).with_context("source", "empty.fa");
        assert_eq!(err.message(), "empty sequence stream");
        assert_eq!(err.context("source"), Some("empty.fa"));
    }

    #[test]
    fn test_config_invalid_without_context() {
        let err = Error::config_invalid("scale must be in (0, 1], got 2");
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_eq!(err.to_string(), "ConfigInvalid => scale must be in (0, 1], got 2");
    }
}
