use anyhow::{Context, Result};
use docx_rust::document::{BodyContent, Paragraph, ParagraphContent, Run, RunContent};
use docx_rust::DocxFile;
use std::path::Path;

pub struct DocxData {
    /// DocxFile owns the raw data; Docx borrows from it.
    /// We store the file so it lives long enough, then parse on demand.
    file: DocxFile,
}

impl DocxData {
    pub fn open(path: &Path) -> Result<Self> {
        let file = DocxFile::from_file(path)
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("Failed to open DOCX: {}", path.display()))?;
        Ok(Self { file })
    }

    fn parse(&self) -> Result<docx_rust::Docx<'_>> {
        self.file
            .parse()
            .map_err(|e| anyhow::anyhow!("{}", e))
            .context("Failed to parse DOCX content")
    }

    /// Plain text of every body paragraph, in document order.
    ///
    /// Tables, images and headers are skipped. Empty paragraphs are kept as
    /// empty strings so vertical spacing survives the conversion.
    pub fn paragraphs(&self) -> Result<Vec<String>> {
        let docx = self.parse()?;
        let mut paragraphs = Vec::new();

        for content in &docx.document.body.content {
            collect_body_content(content, &mut paragraphs);
        }

        Ok(paragraphs)
    }
}

fn collect_body_content(content: &BodyContent, out: &mut Vec<String>) {
    match content {
        BodyContent::Paragraph(para) => out.push(paragraph_text(para)),
        BodyContent::Sdt(sdt) => {
            // Content controls wrap ordinary paragraphs
            if let Some(ref sdt_content) = sdt.content {
                for item in &sdt_content.content {
                    collect_body_content(item, out);
                }
            }
        }
        _ => {}
    }
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();

    for pc in &para.content {
        match pc {
            ParagraphContent::Run(run) => push_run_text(run, &mut text),
            ParagraphContent::Link(link) => {
                if let Some(ref run) = link.content {
                    push_run_text(run, &mut text);
                }
            }
            _ => {}
        }
    }

    text
}

fn push_run_text(run: &Run, text: &mut String) {
    for rc in &run.content {
        match rc {
            RunContent::Text(t) => text.push_str(&t.text),
            RunContent::Break(_) => text.push('\n'),
            RunContent::Tab(_) => text.push('\t'),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rust::Docx;

    fn write_docx(path: &Path, paragraphs: &[&str]) {
        let mut docx = Docx::default();
        for text in paragraphs {
            let para = if text.is_empty() {
                Paragraph::default()
            } else {
                Paragraph::default().push_text(*text)
            };
            docx.document.push(para);
        }
        docx.write_file(path).expect("write docx fixture");
    }

    #[test]
    fn paragraphs_come_back_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("letter.docx");
        write_docx(&path, &["Dear reader,", "", "Second paragraph.", "Regards"]);

        let doc = DocxData::open(&path).unwrap();
        assert_eq!(
            doc.paragraphs().unwrap(),
            vec!["Dear reader,", "", "Second paragraph.", "Regards"]
        );
    }

    #[test]
    fn opening_a_non_docx_file_fails_with_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.docx");
        std::fs::write(&path, "not a zip archive").unwrap();

        let err = match DocxData::open(&path).and_then(|d| d.paragraphs()) {
            Ok(_) => panic!("expected an error"),
            Err(e) => e,
        };
        assert!(format!("{:#}", err).contains("DOCX"));
    }
}
