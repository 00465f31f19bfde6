//! HTML report assembly for the diagnostic figures and text summaries.
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use maud::{html, PreEscaped, DOCTYPE};
use plotly::Plot;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";

/// One titled block of preformatted text and/or figures.
pub struct ReportSection {
    title: String,
    blocks: Vec<Block>,
}

enum Block {
    Text(String),
    Figure(String),
}

impl ReportSection {
    pub fn new(title: &str) -> Self {
        ReportSection {
            title: title.to_string(),
            blocks: Vec::new(),
        }
    }

    /// Add preformatted text (summaries, score tables).
    pub fn add_text(&mut self, text: &str) {
        self.blocks.push(Block::Text(text.to_string()));
    }

    /// Add a plotly figure, rendered inline.
    pub fn add_plot(&mut self, plot: &Plot, div_id: &str) {
        self.blocks
            .push(Block::Figure(plot.to_inline_html(Some(div_id))));
    }
}

/// A titled, timestamped collection of sections written as one
/// self-contained HTML page.
pub struct Report {
    title: String,
    sections: Vec<ReportSection>,
}

impl Report {
    pub fn new(title: &str) -> Self {
        Report {
            title: title.to_string(),
            sections: Vec::new(),
        }
    }

    pub fn add_section(&mut self, section: ReportSection) {
        self.sections.push(section);
    }

    pub fn render(&self) -> String {
        let generated = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let markup = html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="utf-8";
                    title { (self.title) }
                    script src=(PLOTLY_CDN) {}
                    style {
                        "body { font-family: sans-serif; margin: 2em; } "
                        "pre { background: #f5f5f5; padding: 1em; overflow-x: auto; } "
                        "h2 { border-bottom: 1px solid #ccc; }"
                    }
                }
                body {
                    h1 { (self.title) }
                    p { "Generated " (generated) }
                    @for section in &self.sections {
                        h2 { (section.title) }
                        @for block in &section.blocks {
                            @match block {
                                Block::Text(text) => { pre { (text) } }
                                Block::Figure(figure) => { (PreEscaped(figure.clone())) }
                            }
                        }
                    }
                }
            }
        };
        markup.into_string()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(&path, self.render())
            .with_context(|| format!("Failed to write report: {}", path.as_ref().display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_includes_sections_and_text() {
        let mut report = Report::new("Housing diagnostics");
        let mut section = ReportSection::new("Summary");
        section.add_text("rows: 3");
        report.add_section(section);

        let html = report.render();
        assert!(html.contains("Housing diagnostics"));
        assert!(html.contains("Summary"));
        assert!(html.contains("rows: 3"));
    }
}
