use blogtag_common::OutputFormat;
use serde::Serialize;
use std::io::{self, Write};

const SEPARATOR: &str = "-----";

#[derive(Serialize)]
struct ReportLine<'a> {
    url: &'a str,
    tags: &'a [String],
}

/// Writes one report per article to an output stream.
pub struct ReportWriter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn write(&mut self, url: &str, tags: &[String]) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(self.out, "URL: {url}")?;
                writeln!(self.out, "Tags: {}", tags.join(", "))?;
                writeln!(self.out, "{SEPARATOR}")?;
            }
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, &ReportLine { url, tags })?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(format: OutputFormat, tags: &[String]) -> String {
        let mut w = ReportWriter::new(Vec::new(), format);
        w.write("https://blog.example/day1", tags).unwrap();
        String::from_utf8(w.into_inner()).unwrap()
    }

    #[test]
    fn text_report_is_three_lines() {
        let out = render(OutputFormat::Text, &["Name A".into(), "Name B".into()]);
        assert_eq!(
            out,
            "URL: https://blog.example/day1\nTags: Name A, Name B\n-----\n"
        );
    }

    #[test]
    fn text_report_with_no_tags() {
        let out = render(OutputFormat::Text, &[]);
        assert_eq!(out, "URL: https://blog.example/day1\nTags: \n-----\n");
    }

    #[test]
    fn json_report_is_one_line() {
        let out = render(OutputFormat::Json, &["Jane Doe".into()]);
        assert_eq!(
            out,
            "{\"url\":\"https://blog.example/day1\",\"tags\":[\"Jane Doe\"]}\n"
        );
    }
}
