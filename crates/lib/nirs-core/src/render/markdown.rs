/// Append-only markdown document builder.
#[derive(Debug, Default, Clone)]
pub struct Markdown {
    buf: String,
}

impl Markdown {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heading(&mut self, level: usize, text: impl AsRef<str>) -> &mut Self {
        self.buf.push_str(&"#".repeat(level.clamp(1, 6)));
        self.buf.push(' ');
        self.buf.push_str(text.as_ref());
        self.buf.push_str("\n\n");
        self
    }

    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.buf.push_str(text.as_ref());
        self.buf.push('\n');
        self
    }

    /// Text followed by an empty line.
    pub fn paragraph(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.line(text).blank()
    }

    pub fn bullet(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.buf.push_str("- ");
        self.line(text)
    }

    pub fn blank(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    pub fn code_block(&mut self, lang: &str, body: impl AsRef<str>) -> &mut Self {
        let body = body.as_ref();
        self.buf.push_str("```");
        self.buf.push_str(lang);
        self.buf.push('\n');
        self.buf.push_str(body);
        if !body.ends_with('\n') {
            self.buf.push('\n');
        }
        self.buf.push_str("```\n\n");
        self
    }

    pub fn table_header(&mut self, columns: &[&str]) -> &mut Self {
        self.table_row(columns.iter().copied());
        let divider = vec!["---"; columns.len()];
        self.table_row(divider)
    }

    pub fn table_row<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.buf.push('|');
        for cell in cells {
            self.buf.push(' ');
            self.buf.push_str(&escape_cell(cell.as_ref()));
            self.buf.push_str(" |");
        }
        self.buf.push('\n');
        self
    }

    pub fn rule(&mut self) -> &mut Self {
        self.line("---")
    }

    #[must_use]
    pub fn finish(self) -> String {
        self.buf
    }
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

/// Wraps a value in backticks for inline code.
#[must_use]
pub fn code(value: &str) -> String {
    format!("`{value}`")
}
