//! Font injection side channel.
//!
//! An optional user-uploaded TTF is base64-embedded into a `@font-face` rule
//! and becomes the active font family for the page and every chart's text
//! layer. Without an upload the fixed fallback stack applies. The bytes are
//! not validated; a broken font is the browser's problem and never blocks the
//! charts.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};

/// System font stack used when no font has been uploaded.
pub const FALLBACK_FONT_STACK: &str = "-apple-system, 'Segoe UI', Roboto, \
'Helvetica Neue', Arial, 'Noto Sans', 'Apple SD Gothic Neo', 'Malgun Gothic', \
sans-serif";

const UPLOADED_FONT_NAME: &str = "UploadedFont";

/// A user-uploaded TTF font held for the current session.
#[derive(Debug, Clone)]
pub struct FontAsset {
    name: String,
    data: Vec<u8>,
}

impl FontAsset {
    pub fn new(data: Vec<u8>) -> FontAsset {
        FontAsset {
            name: UPLOADED_FONT_NAME.to_string(),
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// CSS that declares the embedded font face and applies it page-wide.
    pub fn face_css(&self) -> String {
        let encoded = BASE64.encode(&self.data);
        format!(
            "@font-face {{\n\
             \x20 font-family: '{name}';\n\
             \x20 src: url(data:font/ttf;base64,{encoded}) format('truetype');\n\
             \x20 font-weight: normal;\n\
             \x20 font-style: normal;\n\
             \x20 font-display: swap;\n\
             }}\n\
             html, body {{\n\
             \x20 font-family: '{name}', {fallback};\n\
             }}\n",
            name = self.name,
            fallback = FALLBACK_FONT_STACK,
        )
    }
}

/// The font family string charts and page text should render with.
///
/// With an uploaded font the generated face name leads the stack; otherwise
/// this is exactly [`FALLBACK_FONT_STACK`].
pub fn font_family(font: Option<&FontAsset>) -> String {
    match font {
        Some(asset) => format!("'{}', {}", asset.name(), FALLBACK_FONT_STACK),
        None => FALLBACK_FONT_STACK.to_string(),
    }
}

/// The CSS block to inject into the page, empty when no font is present.
pub fn page_css(font: Option<&FontAsset>) -> String {
    font.map(FontAsset::face_css).unwrap_or_default()
}
