//! HTML and XML generators.
//!
//! Both formats get a fixed, well-formed skeleton. Small remainders
//! grow a text node (any byte count works); larger ones become a
//! comment so the bulk of the padding is clearly marked as such. The
//! comment filler avoids `-` so no `--` sequence can terminate the
//! comment early.

use rand::RngCore;

use crate::application::ports::FileGenerator;
use crate::domain::errors::GenError;

/// `<!--` plus `-->`.
const COMMENT_OVERHEAD: usize = 7;

fn pad_document(
    target_bytes: u64,
    head: &str,
    text_close: &str,
    tail: &str,
) -> Result<Vec<u8>, GenError> {
    let target = target_bytes as usize;
    let minimum = head.len() + text_close.len() + tail.len();
    if target < minimum {
        return Err(GenError::SizeTooSmall {
            target: target_bytes,
            minimum: minimum as u64,
        });
    }

    let needed = target - minimum;
    let mut out = String::with_capacity(target);
    out.push_str(head);
    if needed < COMMENT_OVERHEAD {
        out.extend(std::iter::repeat('x').take(needed));
        out.push_str(text_close);
    } else {
        out.push_str(text_close);
        out.push_str("<!--");
        out.extend(std::iter::repeat('x').take(needed - COMMENT_OVERHEAD));
        out.push_str("-->");
    }
    out.push_str(tail);
    Ok(out.into_bytes())
}

pub struct HtmlGenerator;

const HTML_HEAD: &str = "<!DOCTYPE html>\n<html>\n<head><title>Placeholder</title></head>\n<body>\n<p>Generated placeholder document.";
const HTML_TEXT_CLOSE: &str = "</p>\n";
const HTML_TAIL: &str = "</body>\n</html>\n";

impl FileGenerator for HtmlGenerator {
    fn generate(&self, target_bytes: u64, _rng: &mut dyn RngCore) -> Result<Vec<u8>, GenError> {
        pad_document(target_bytes, HTML_HEAD, HTML_TEXT_CLOSE, HTML_TAIL)
    }
}

pub struct XmlGenerator;

const XML_HEAD: &str =
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<placeholder>\n  <item>generated";
const XML_TEXT_CLOSE: &str = "</item>\n";
const XML_TAIL: &str = "</placeholder>\n";

impl FileGenerator for XmlGenerator {
    fn generate(&self, target_bytes: u64, _rng: &mut dyn RngCore) -> Result<Vec<u8>, GenError> {
        pad_document(target_bytes, XML_HEAD, XML_TEXT_CLOSE, XML_TAIL)
    }
}
