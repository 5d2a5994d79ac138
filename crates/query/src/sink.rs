/// Destination of formatted result rows.
///
/// Implemented by the console and delimited-file providers in the binary
/// crate. Rows can arrive from concurrently running scan callbacks, so the
/// engine serializes access; implementations only need `Send`.
pub trait OutputSink: Send {
    fn write_row(&mut self, fields: &[String]) -> anyhow::Result<()>;

    fn write_line(&mut self, text: &str) -> anyhow::Result<()>;
}
