use crate::model::Block;
use anyhow::{bail, ensure, Context};
use regex::Regex;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;


/// Naming scheme of container files: `blk00000.dat`, `blk00001.dat`, ...
pub const CONTAINER_FILE_REGEX: &str = r"^blk(\d{5})\.dat$";

/// Little-endian "BCQ1", prefixes every block record.
const MAGIC: u32 = u32::from_le_bytes(*b"BCQ1");

// Guards against a corrupt length prefix allocating gigabytes.
const MAX_RECORD_SIZE: u32 = 128 * 1024 * 1024;


fn file_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(CONTAINER_FILE_REGEX).unwrap())
}


/// Lists container files in `dir` whose names match the expected scheme,
/// ordered by file name.
pub fn list_container_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read data directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        if let Some(name) = name.to_str() {
            if file_regex().is_match(name) {
                files.push(entry.path());
            }
        }
    }
    files.sort();
    Ok(files)
}


/// Lazily decodes the sequence of blocks stored in one container file,
/// in on-disk order.
pub struct ContainerReader {
    input: BufReader<File>,
    path: PathBuf,
    offset: u64,
}


impl ContainerReader {
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let file = File::open(&path)
            .with_context(|| format!("failed to open container file {}", path.display()))?;
        Ok(Self {
            input: BufReader::new(file),
            path,
            offset: 0,
        })
    }

    fn read_block(&mut self) -> anyhow::Result<Option<Block>> {
        let mut header = [0u8; 8];
        match self.input.read_exact(&mut header) {
            Ok(()) => {}
            // EOF on a frame boundary is the normal end of the file
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        let magic = u32::from_le_bytes(header[0..4].try_into().unwrap());
        let len = u32::from_le_bytes(header[4..8].try_into().unwrap());
        if magic != MAGIC {
            bail!(
                "bad record magic at offset {} in {}",
                self.offset,
                self.path.display()
            );
        }
        ensure!(
            len <= MAX_RECORD_SIZE,
            "record of {} bytes at offset {} in {} exceeds the size limit",
            len,
            self.offset,
            self.path.display()
        );

        let mut payload = vec![0u8; len as usize];
        self.input.read_exact(&mut payload).with_context(|| {
            format!(
                "torn record at offset {} in {}",
                self.offset,
                self.path.display()
            )
        })?;
        self.offset += 8 + len as u64;

        let block = borsh::from_slice(&payload)
            .with_context(|| format!("undecodable block record in {}", self.path.display()))?;
        Ok(Some(block))
    }
}


impl Iterator for ContainerReader {
    type Item = anyhow::Result<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_block().transpose()
    }
}


/// Appends framed block records to a container file. Used to mint fixtures
/// and by external producers of the format.
pub struct ContainerWriter {
    output: BufWriter<File>,
}


impl ContainerWriter {
    pub fn create(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::options()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open container file {}", path.display()))?;
        Ok(Self {
            output: BufWriter::new(file),
        })
    }

    pub fn append(&mut self, block: &Block) -> anyhow::Result<()> {
        let payload = borsh::to_vec(block)?;
        self.output.write_all(&MAGIC.to_le_bytes())?;
        self.output.write_all(&(payload.len() as u32).to_le_bytes())?;
        self.output.write_all(&payload)?;
        Ok(())
    }

    pub fn finish(mut self) -> anyhow::Result<()> {
        self.output.flush()?;
        Ok(())
    }
}
