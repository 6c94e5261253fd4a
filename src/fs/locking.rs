//! File locking utilities for the checksum ledger
//!
//! Advisory `fs2` locks serialise readers and writers that go through these
//! helpers. Hook scripts or users editing the ledger by hand are not covered.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Read file contents with a shared lock. A missing file reads as empty.
pub fn locked_read(path: &Path) -> io::Result<String> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(String::new()),
        Err(e) => return Err(e),
    };
    file.lock_shared()?;
    let mut content = String::new();
    BufReader::new(&file).read_to_string(&mut content)?;
    Ok(content)
}

/// Rewrite file contents in place under one exclusive lock.
///
/// The sequence is: open → lock → read → `rewrite` → truncate → write →
/// flush, all through the same handle. Appenders block until the new
/// content is in place, and the file keeps its inode and permissions.
pub fn locked_update<F>(path: &Path, rewrite: F) -> io::Result<String>
where
    F: FnOnce(&str) -> String,
{
    #[allow(clippy::suspicious_open_options)]
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .open(path)?;
    file.lock_exclusive()?;

    let mut content = String::new();
    file.read_to_string(&mut content)?;
    let updated = rewrite(&content);

    file.seek(SeekFrom::Start(0))?;
    file.set_len(0)?;
    let mut writer = BufWriter::new(&file);
    writer.write_all(updated.as_bytes())?;
    writer.flush()?;
    Ok(updated)
}

/// Append one line under an exclusive lock, creating the file if needed.
pub fn locked_append_line(path: &Path, line: &str) -> io::Result<()> {
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    file.lock_exclusive()?;
    let mut writer = BufWriter::new(&file);
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
