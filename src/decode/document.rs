//! Markup documents.
//!
//! XML flavours must be well-formed (checked with `roxmltree`); HTML is
//! accepted as-is. Selector queries run on `tl` for both.

use std::sync::Arc;

use crate::decode::mime::MimeType;

/// A parsed XML/HTML/SVG body.
///
/// The source text is kept and re-parsed per query; `tl` DOMs borrow their
/// input, which would otherwise pin the document to one owner.
#[derive(Clone)]
pub struct Document {
    source: Arc<str>,
    media_type: MimeType,
}

impl Document {
    /// Parse `source`, failing if it is not a valid document of `media_type`.
    pub fn parse(source: String, media_type: MimeType) -> Result<Self, String> {
        if media_type.is_xml() {
            let mut options = roxmltree::ParsingOptions::default();
            options.allow_dtd = true;
            roxmltree::Document::parse_with_options(&source, options).map_err(|e| e.to_string())?;
        } else {
            tl::parse(&source, tl::ParserOptions::default()).map_err(|e| format!("{e:?}"))?;
        }

        Ok(Self {
            source: Arc::from(source),
            media_type,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn media_type(&self) -> MimeType {
        self.media_type
    }

    /// Number of nodes matching a CSS selector.
    pub fn query_count(&self, selector: &str) -> usize {
        self.query_text(selector).len()
    }

    /// Inner text of every node matching a CSS selector, in document order.
    pub fn query_text(&self, selector: &str) -> Vec<String> {
        let Ok(dom) = tl::parse(&self.source, tl::ParserOptions::default()) else {
            return Vec::new();
        };
        let parser = dom.parser();

        match dom.query_selector(selector) {
            Some(nodes) => nodes
                .filter_map(|handle| handle.get(parser))
                .map(|node| node.inner_text(parser).into_owned())
                .collect(),
            None => Vec::new(),
        }
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("media_type", &self.media_type)
            .field("len", &self.source.len())
            .finish()
    }
}
