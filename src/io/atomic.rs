//! Atomic file writes with automatic parent creation.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

pub fn atomic_write(dest: impl AsRef<Path>, bytes: impl AsRef<[u8]>) -> io::Result<()> {
    let dest = dest.as_ref();
    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes.as_ref())?;
    tmp.flush()?;
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_into_fresh_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested").join("state.json");
        atomic_write(&dest, "{}").unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "{}");
        atomic_write(&dest, "[]").unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "[]");
    }
}
