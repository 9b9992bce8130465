// File: src/persistence.rs
use crate::core::morph::{DictionaryAnalyzer, IdentityAnalyzer, MorphAnalyzer};
use crate::error::Result;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::{Builder, NamedTempFile};
use tracing::info;

/// Temp file carrying the mode the target should end up with: the existing
/// target's mode when overwriting, otherwise the usual 0o666 minus umask.
fn temp_file_for(parent_dir: &Path, path: &Path) -> Result<NamedTempFile> {
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let temp_file = builder.tempfile_in(parent_dir)?;
    if let Ok(existing) = fs::metadata(path) {
        temp_file.as_file().set_permissions(existing.permissions())?;
    }
    Ok(temp_file)
}

/// Writes through a temp file in the target directory and renames it over
/// `path`, so readers never observe a half-written file.
pub(crate) fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&File>) -> Result<()>,
{
    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = temp_file_for(parent_dir, path)?;
    {
        let mut writer = BufWriter::new(temp_file.as_file());
        write(&mut writer)?;
        writer.flush()?;
    }

    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Saves a compiled dictionary as a compact bincode cache.
pub fn save_dictionary(dict: &DictionaryAnalyzer, path: &Path) -> Result<()> {
    write_atomically(path, |writer| Ok(bincode::serialize_into(writer, dict)?))?;
    info!(path = %path.display(), wordforms = dict.len(), "saved dictionary cache");
    Ok(())
}

pub fn load_dictionary(path: &Path) -> Result<DictionaryAnalyzer> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let dict: DictionaryAnalyzer = bincode::deserialize_from(reader)?;
    info!(path = %path.display(), wordforms = dict.len(), "loaded dictionary cache");
    Ok(dict)
}

/// Builds the analyzer for a dictionary path: `.bin` files are caches, any
/// other file is a TSV source. Without a path every word is its own lemma.
pub fn open_analyzer(path: Option<&Path>) -> Result<Box<dyn MorphAnalyzer + Send>> {
    match path {
        Some(p) if p.extension().is_some_and(|ext| ext == "bin") => Ok(Box::new(load_dictionary(p)?)),
        Some(p) => Ok(Box::new(DictionaryAnalyzer::from_tsv_file(p)?)),
        None => Ok(Box::new(IdentityAnalyzer)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::morph::resolve_lemma;

    #[test]
    fn test_dictionary_cache_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dict.bin");

        let dict = DictionaryAnalyzer::parse_tsv("кота\tкот\nстали\tсталь\t0.7\nстали\tстать\t0.3\n").unwrap();
        save_dictionary(&dict, &path).unwrap();

        let loaded = load_dictionary(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(resolve_lemma(&loaded, "кота"), "кот");
        assert_eq!(resolve_lemma(&loaded, "стали"), "сталь");
    }

    #[test]
    fn test_open_analyzer_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let tsv = dir.path().join("dict.tsv");
        fs::write(&tsv, "кота\tкот\n").unwrap();
        let bin = dir.path().join("dict.bin");
        save_dictionary(&DictionaryAnalyzer::parse_tsv("псы\tпёс\n").unwrap(), &bin).unwrap();

        let from_tsv = open_analyzer(Some(&tsv)).unwrap();
        assert_eq!(resolve_lemma(&*from_tsv, "кота"), "кот");

        let from_bin = open_analyzer(Some(&bin)).unwrap();
        assert_eq!(resolve_lemma(&*from_bin, "псы"), "пёс");

        let identity = open_analyzer(None).unwrap();
        assert_eq!(resolve_lemma(&*identity, "псы"), "псы");
    }

    #[test]
    fn test_failed_write_leaves_no_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let result = write_atomically(&path, |_| Err(crate::error::LexiconError::EmptyStore));
        assert!(result.is_err());
        assert!(!path.exists());
    }
}
