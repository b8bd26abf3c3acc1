//! Resolution outcomes.

/// Marker identifying an inlined image in raw resolver output.
pub const INLINE_MARKER: &str = "data:image";

/// Successful resolution of one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Inlined representation (e.g., `data:image/png;base64,...`), used verbatim.
    Inline(String),
    /// Relocated file. The orchestrator reduces this to the file's base name.
    Relocated(String),
}

impl Resolution {
    /// Classify raw output of a string-returning resolution service.
    ///
    /// Text containing [`INLINE_MARKER`] yields `Inline` with everything from
    /// the marker up to the last double quote. Anything else yields `Relocated`
    /// with the final path segment of the last `"..."` literal (or of the whole
    /// text when it has no quoted literal). Returns `None` for empty output.
    ///
    /// ```
    /// use pal_resolve::Resolution;
    ///
    /// let raw = r#"module.exports = __webpack_public_path__ + "img/logo.a1b2.png";"#;
    /// assert_eq!(
    ///     Resolution::from_raw(raw),
    ///     Some(Resolution::Relocated("logo.a1b2.png".to_owned()))
    /// );
    /// ```
    #[must_use]
    pub fn from_raw(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }

        if let Some(start) = raw.find(INLINE_MARKER) {
            let end = raw
                .rfind('"')
                .filter(|&end| end > start)
                .unwrap_or(raw.len());
            return Some(Self::Inline(raw[start..end].to_owned()));
        }

        let literal = last_quoted(raw).unwrap_or(raw);
        let name = literal.rsplit(is_separator).next().unwrap_or(literal);
        Some(Self::Relocated(name.to_owned()))
    }

    /// Reduce a relocated path to its final segment; inline values are kept.
    #[must_use]
    pub fn into_base_name(self) -> Self {
        match self {
            Self::Relocated(path) => {
                let name = path.rsplit(is_separator).next().unwrap_or(&path);
                Self::Relocated(name.to_owned())
            }
            inline @ Self::Inline(_) => inline,
        }
    }

    /// True for inlined representations.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline(_))
    }

    /// The resolved value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Inline(value) | Self::Relocated(value) => value,
        }
    }
}

/// Content of the last `"..."` literal in `raw`.
fn last_quoted(raw: &str) -> Option<&str> {
    let end = raw.rfind('"')?;
    let start = raw[..end].rfind('"')?;
    Some(&raw[start + 1..end])
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_raw_data_uri() {
        let raw = r#"module.exports = "data:image/png;base64,iVBORw0KGgo=";"#;
        assert_eq!(
            Resolution::from_raw(raw),
            Some(Resolution::Inline(
                "data:image/png;base64,iVBORw0KGgo=".to_owned()
            ))
        );
    }

    #[test]
    fn test_from_raw_data_uri_without_quotes() {
        let raw = "data:image/gif;base64,R0lGOD";
        assert_eq!(
            Resolution::from_raw(raw),
            Some(Resolution::Inline(raw.to_owned()))
        );
    }

    #[test]
    fn test_from_raw_file_name() {
        let raw = r#"module.exports = __webpack_public_path__ + "static/img/logo.a1b2.png";"#;
        assert_eq!(
            Resolution::from_raw(raw),
            Some(Resolution::Relocated("logo.a1b2.png".to_owned()))
        );
    }

    #[test]
    fn test_from_raw_quoted_name_without_directory() {
        let raw = r#"module.exports = __webpack_public_path__ + "logo.a1b2.png";"#;
        assert_eq!(
            Resolution::from_raw(raw),
            Some(Resolution::Relocated("logo.a1b2.png".to_owned()))
        );
    }

    #[test]
    fn test_from_raw_path_outside_last_literal() {
        let raw = r#"require("./loader/index.js")("fonts/inter.ff00.woff2")"#;
        assert_eq!(
            Resolution::from_raw(raw),
            Some(Resolution::Relocated("inter.ff00.woff2".to_owned()))
        );
    }

    #[test]
    fn test_from_raw_bare_name() {
        assert_eq!(
            Resolution::from_raw("logo.a1b2.png"),
            Some(Resolution::Relocated("logo.a1b2.png".to_owned()))
        );
    }

    #[test]
    fn test_from_raw_windows_separator() {
        assert_eq!(
            Resolution::from_raw(r"dist\assets\logo.a1b2.png"),
            Some(Resolution::Relocated("logo.a1b2.png".to_owned()))
        );
    }

    #[test]
    fn test_from_raw_empty() {
        assert_eq!(Resolution::from_raw(""), None);
    }

    #[test]
    fn test_into_base_name() {
        let relocated = Resolution::Relocated("dist/assets/logo.a1b2.png".to_owned());
        assert_eq!(
            relocated.into_base_name(),
            Resolution::Relocated("logo.a1b2.png".to_owned())
        );

        let inline = Resolution::Inline("data:image/png;base64,AA/BB".to_owned());
        assert_eq!(inline.clone().into_base_name(), inline);
    }

    #[test]
    fn test_accessors() {
        let inline = Resolution::Inline("data:image/png;base64,AA".to_owned());
        assert!(inline.is_inline());
        assert_eq!(inline.as_str(), "data:image/png;base64,AA");

        let relocated = Resolution::Relocated("a.png".to_owned());
        assert!(!relocated.is_inline());
        assert_eq!(relocated.as_str(), "a.png");
    }
}
