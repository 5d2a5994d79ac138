use anyhow::Context;
use bcq_query::OutputSink;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};


/// Prints rows to stdout, fields joined by a single space.
pub struct ConsoleSink;


impl OutputSink for ConsoleSink {
    fn write_row(&mut self, fields: &[String]) -> anyhow::Result<()> {
        println!("{}", fields.join(" ").trim());
        Ok(())
    }

    fn write_line(&mut self, text: &str) -> anyhow::Result<()> {
        println!("{}", text);
        Ok(())
    }
}


/// Appends rows to a file, fields joined by `;`.
pub struct CsvSink {
    file: File,
    path: PathBuf,
}


impl CsvSink {
    /// Opens the target in append mode. Failing here, before any scanning
    /// starts, is how an unwritable output path is rejected early.
    pub fn create(path: &Path) -> anyhow::Result<Self> {
        let file = File::options()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("output file {} is not writable", path.display()))?;
        Ok(Self {
            file,
            path: path.to_owned(),
        })
    }

    fn append(&mut self, line: &str) -> anyhow::Result<()> {
        writeln!(self.file, "{}", line)
            .with_context(|| format!("failed to write to {}", self.path.display()))?;
        self.file.flush()?;
        Ok(())
    }
}


impl OutputSink for CsvSink {
    fn write_row(&mut self, fields: &[String]) -> anyhow::Result<()> {
        self.append(&fields.join(";"))
    }

    fn write_line(&mut self, text: &str) -> anyhow::Result<()> {
        self.append(text)
    }
}
