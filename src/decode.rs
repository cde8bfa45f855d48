//! HTML entity decoding used for question, category and answer text.

/// Converts text containing HTML character entities into plain text.
pub trait EntityDecoder {
    fn decode(&self, text: &str) -> String;
}

/// Decoder backed by `html-escape`; handles named (`&eacute;`) and numeric
/// (`&#039;`, `&#x27;`) entities.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlEntityDecoder;

impl EntityDecoder for HtmlEntityDecoder {
    fn decode(&self, text: &str) -> String {
        html_escape::decode_html_entities(text).into_owned()
    }
}

impl<F> EntityDecoder for F
where
    F: Fn(&str) -> String,
{
    fn decode(&self, text: &str) -> String {
        self(text)
    }
}
