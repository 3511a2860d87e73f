// Copyright 2025 the Widjet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Helpers for rendering `data-*` attributes and form input names.

use alloc::borrow::Cow;
use alloc::string::String;

/// Value of a `data-*` attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataValue<'a> {
    /// Rendered as a bare `data-key` when `true`, omitted when `false`.
    Flag(bool),
    /// Rendered as `data-key="value"`.
    Text(Cow<'a, str>),
}

impl From<bool> for DataValue<'_> {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl<'a> From<&'a str> for DataValue<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(Cow::Borrowed(value))
    }
}

impl From<String> for DataValue<'_> {
    fn from(value: String) -> Self {
        Self::Text(Cow::Owned(value))
    }
}

/// Render key/value pairs as space-separated `data-*` attributes.
///
/// ```
/// use widjet_dom::data_attributes;
///
/// let html = data_attributes([("id", "12".into()), ("open", true.into()), ("off", false.into())]);
/// assert_eq!(html, r#"data-id="12" data-open"#);
/// ```
pub fn data_attributes<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, DataValue<'a>)>,
{
    let mut out = String::new();
    for (key, value) in pairs {
        if value == DataValue::Flag(false) {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str("data-");
        out.push_str(key);
        if let DataValue::Text(text) = value {
            out.push_str("=\"");
            for c in text.chars() {
                match c {
                    '"' => out.push_str("&quot;"),
                    '&' => out.push_str("&amp;"),
                    c => out.push(c),
                }
            }
            out.push('"');
        }
    }
    out
}

/// Builder for nested form field names such as `user[address][city]`.
///
/// The first segment is used verbatim; every later segment is wrapped in the
/// prefix and suffix, which default to `[` and `]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputName<'a> {
    prefix: &'a str,
    suffix: &'a str,
}

impl Default for InputName<'_> {
    fn default() -> Self {
        Self::brackets()
    }
}

impl<'a> InputName<'a> {
    /// `[` and `]` affixes.
    pub const fn brackets() -> Self {
        Self {
            prefix: "[",
            suffix: "]",
        }
    }

    /// Custom affixes; pass `""` for none.
    pub const fn with_affixes(prefix: &'a str, suffix: &'a str) -> Self {
        Self { prefix, suffix }
    }

    /// Join `segments` into a single name.
    ///
    /// ```
    /// use widjet_dom::InputName;
    ///
    /// assert_eq!(InputName::brackets().format(["user", "address", "city"]), "user[address][city]");
    /// assert_eq!(InputName::with_affixes(".", "").format(["a", "b"]), "a.b");
    /// ```
    pub fn format<S: AsRef<str>>(&self, segments: impl IntoIterator<Item = S>) -> String {
        let mut out = String::new();
        for (i, segment) in segments.into_iter().enumerate() {
            if i > 0 {
                out.push_str(self.prefix);
            }
            out.push_str(segment.as_ref());
            if i > 0 {
                out.push_str(self.suffix);
            }
        }
        out
    }
}
