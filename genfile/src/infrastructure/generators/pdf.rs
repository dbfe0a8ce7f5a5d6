//! PDF generator.
//!
//! A five-object document with one content stream. The stream is
//! padded with trailing spaces (whitespace is legal in content
//! streams), but the `/Length` value and the `startxref` offset change
//! digit width as the padding grows, so the final size is found by
//! fixed-point iteration rather than arithmetic.

use std::fmt::Write as _;

use rand::RngCore;

use crate::application::ports::FileGenerator;
use crate::domain::errors::GenError;
use crate::engine::planner::fixed_point;

pub struct PdfGenerator;

const CONTENT_BASE: &str = "BT /F1 12 Tf 72 720 Td (Placeholder) Tj ET";

fn render(pad: u64, marker_comment: bool) -> Vec<u8> {
    let mut out = String::new();
    let mut offsets = [0usize; 6];

    out.push_str("%PDF-1.4\n");
    if marker_comment {
        out.push_str("%g\n");
    }
    offsets[1] = out.len();
    out.push_str("1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");
    offsets[2] = out.len();
    out.push_str("2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n");
    offsets[3] = out.len();
    out.push_str(
        "3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>\nendobj\n",
    );
    offsets[4] = out.len();
    let content_len = CONTENT_BASE.len() + pad as usize;
    let _ = write!(out, "4 0 obj\n<< /Length {content_len} >>\nstream\n");
    out.push_str(CONTENT_BASE);
    out.extend(std::iter::repeat(' ').take(pad as usize));
    out.push_str("\nendstream\nendobj\n");
    offsets[5] = out.len();
    out.push_str("5 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>\nendobj\n");

    let xref_at = out.len();
    out.push_str("xref\n0 6\n0000000000 65535 f \n");
    for offset in &offsets[1..] {
        let _ = write!(out, "{offset:010} 00000 n \n");
    }
    let _ = write!(
        out,
        "trailer\n<< /Size 6 /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n"
    );
    out.into_bytes()
}

impl FileGenerator for PdfGenerator {
    fn generate(&self, target_bytes: u64, _rng: &mut dyn RngCore) -> Result<Vec<u8>, GenError> {
        let minimum = render(0, false).len() as u64;
        if target_bytes < minimum {
            return Err(GenError::SizeTooSmall {
                target: target_bytes,
                minimum,
            });
        }

        // When the padding crosses a digit-width boundary in /Length,
        // one total becomes unreachable; a 3-byte header comment
        // shifts the boundary and covers the gap.
        for marker_comment in [false, true] {
            let initial = (target_bytes - minimum).saturating_sub(3);
            let found = fixed_point(target_bytes, initial, 8, |p| {
                Ok(render(p, marker_comment).len() as u64)
            });
            if let Ok(pad) = found {
                let out = render(pad, marker_comment);
                debug_assert_eq!(out.len() as u64, target_bytes);
                return Ok(out);
            }
        }
        Err(GenError::ConvergenceFailure { iterations: 16 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(target: u64) -> Vec<u8> {
        let mut rng = rand::rng();
        PdfGenerator.generate(target, &mut rng).unwrap()
    }

    #[test]
    fn exact_including_digit_width_boundaries() {
        let min = render(0, false).len() as u64;
        // Crossing a power of ten in the pad length shifts /Length's
        // digit count; the fixed point must absorb that.
        for target in [min, min + 1, min + 9, min + 10, min + 100, min + 99_999] {
            assert_eq!(run(target).len() as u64, target, "target {target}");
        }
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let bytes = run(2000);
        let text = String::from_utf8(bytes).unwrap();
        let xref = text.find("xref\n").unwrap();
        // Skip the subsection header and the free-list entry.
        for (i, line) in text[xref + 5..].lines().skip(2).take(5).enumerate() {
            let offset: usize = line[..10].parse().unwrap();
            let expect = format!("{} 0 obj", i + 1);
            assert!(
                text[offset..].starts_with(&expect),
                "object {} not at its xref offset",
                i + 1
            );
        }
    }

    #[test]
    fn declared_stream_length_matches() {
        let bytes = run(1500);
        let text = String::from_utf8(bytes).unwrap();
        let decl: usize = text
            .split("/Length ")
            .nth(1)
            .unwrap()
            .split(' ')
            .next()
            .unwrap()
            .parse()
            .unwrap();
        let start = text.find("stream\n").unwrap() + 7;
        let end = text.find("\nendstream").unwrap();
        assert_eq!(end - start, decl);
    }

    #[test]
    fn ends_with_eof_marker() {
        assert!(run(1000).ends_with(b"%%EOF\n"));
    }
}
