//! Write log export
//!
//! The log is written as CSV with an `addr,val` header, one row per write.
//! Frame boundaries appear as rows with address `4294967295`.

use std::io;
use std::path::Path;

use crate::error::Result;
use crate::register_pool::RegWrite;

/// Write `entries` as CSV to `writer`.
pub fn write_log_csv<W: io::Write>(entries: &[RegWrite], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for entry in entries {
        csv.serialize(entry)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write `entries` as CSV to the file at `path`.
pub fn export_write_log(entries: &[RegWrite], path: impl AsRef<Path>) -> Result<()> {
    let file = std::fs::File::create(path.as_ref())?;
    write_log_csv(entries, io::BufWriter::new(file))?;
    log::debug!(
        "exported {} register writes to {}",
        entries.len(),
        path.as_ref().display()
    );
    Ok(())
}

/// Read a write log back from CSV.
pub fn read_log_csv<R: io::Read>(reader: R) -> Result<Vec<RegWrite>> {
    let mut csv = csv::Reader::from_reader(reader);
    let mut entries = Vec::new();
    for row in csv.deserialize() {
        entries.push(row?);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register_pool::LOG_BOUNDARY;

    #[test]
    fn csv_layout() {
        let entries = [RegWrite::new(LOG_BOUNDARY, 0), RegWrite::new(0x8a, 15)];
        let mut out = Vec::new();
        write_log_csv(&entries, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "addr,val\n4294967295,0\n138,15\n");
        assert_eq!(read_log_csv(text.as_bytes()).unwrap(), entries);
    }
}
