//! XLSX and DOCX generators.
//!
//! Both are OOXML packages: a handful of fixed XML parts plus one body
//! part that grows by whole units (spreadsheet rows, document
//! paragraphs). Entries are stored, never deflated, so the archive
//! size is deterministic and the planner can pick the unit count. The
//! remainder becomes either an EOCD comment (small) or a `pad.bin`
//! entry (large).

use rand::RngCore;

use crate::application::ports::FileGenerator;
use crate::domain::errors::GenError;
use crate::engine::cost_model::CostModel;
use crate::engine::planner::plan_unit_count;
use crate::engine::zip::{entry_overhead, ZipWriter};

const PAD_ENTRY: &str = "pad.bin";

struct PackageSpec {
    fixed_parts: &'static [(&'static str, &'static str)],
    body_name: &'static str,
    body: fn(u64) -> String,
}

fn build_package(spec: &PackageSpec, units: u64) -> ZipWriter {
    let mut zip = ZipWriter::new();
    for (name, content) in spec.fixed_parts {
        zip.add_entry(name, content.as_bytes());
    }
    zip.add_entry(spec.body_name, (spec.body)(units).as_bytes());
    zip
}

fn generate_package(spec: &PackageSpec, target_bytes: u64) -> Result<Vec<u8>, GenError> {
    let measure = |units: u64| Ok(build_package(spec, units).size_when_finished());
    let model = CostModel::probe(measure, 16)?;
    // Every remainder is expressible: comments cover 1..90, the pad
    // entry everything from its own overhead up.
    let plan = plan_unit_count(target_bytes, &model, 0, measure)?;

    let mut zip = build_package(spec, plan.units);
    let needed = plan.padding_needed;
    let out = if needed == 0 {
        zip.finish(b"")
    } else if needed < entry_overhead(PAD_ENTRY) {
        zip.finish(&vec![b'x'; needed as usize])
    } else {
        let payload = vec![0u8; (needed - entry_overhead(PAD_ENTRY)) as usize];
        zip.add_entry(PAD_ENTRY, &payload);
        zip.finish(b"")
    };
    debug_assert_eq!(out.len() as u64, target_bytes);
    Ok(out)
}

const XLSX_PARTS: &[(&str, &str)] = &[
    (
        "[Content_Types].xml",
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#,
    ),
    (
        "_rels/.rels",
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#,
    ),
    (
        "xl/workbook.xml",
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
    ),
    (
        "xl/_rels/workbook.xml.rels",
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#,
    ),
];

fn xlsx_sheet(rows: u64) -> String {
    let mut body = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for i in 1..=rows {
        body.push_str(&format!(
            r#"<row r="{i}"><c r="A{i}"><v>{}</v></c></row>"#,
            i % 9 + 1
        ));
    }
    body.push_str("</sheetData></worksheet>");
    body
}

pub struct XlsxGenerator;

impl FileGenerator for XlsxGenerator {
    fn generate(&self, target_bytes: u64, _rng: &mut dyn RngCore) -> Result<Vec<u8>, GenError> {
        generate_package(
            &PackageSpec {
                fixed_parts: XLSX_PARTS,
                body_name: "xl/worksheets/sheet1.xml",
                body: xlsx_sheet,
            },
            target_bytes,
        )
    }
}

const DOCX_PARTS: &[(&str, &str)] = &[
    (
        "[Content_Types].xml",
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#,
    ),
    (
        "_rels/.rels",
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#,
    ),
];

fn docx_document(paragraphs: u64) -> String {
    let mut body = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
    );
    for i in 1..=paragraphs {
        body.push_str(&format!(
            "<w:p><w:r><w:t>Placeholder paragraph {i}</w:t></w:r></w:p>"
        ));
    }
    body.push_str("<w:sectPr/></w:body></w:document>");
    body
}

pub struct DocxGenerator;

impl FileGenerator for DocxGenerator {
    fn generate(&self, target_bytes: u64, _rng: &mut dyn RngCore) -> Result<Vec<u8>, GenError> {
        generate_package(
            &PackageSpec {
                fixed_parts: DOCX_PARTS,
                body_name: "word/document.xml",
                body: docx_document,
            },
            target_bytes,
        )
    }
}
