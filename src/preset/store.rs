use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::PresetError;
use crate::preset::{Preset, DEFAULT_PRESET_DIR, PRESET_SUFFIX};

/// A directory of `.synthpreset` files.
#[derive(Debug, Clone)]
pub struct PresetStore {
    dir: PathBuf,
}

impl PresetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Preset names (file stems), sorted. A missing directory lists as empty.
    pub fn list(&self) -> Result<Vec<String>, PresetError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(PresetError::io(&self.dir, err)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| PresetError::io(&self.dir, err))?;
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }
            let file_name = entry.file_name();
            let Some(stem) = file_name
                .to_str()
                .and_then(|name| name.strip_suffix(PRESET_SUFFIX))
            else {
                continue;
            };
            if !stem.is_empty() {
                names.push(stem.to_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Where `name` lives on disk. Characters outside `[A-Za-z0-9_-]` become `_`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        let name = name.trim();
        let name = name.strip_suffix(PRESET_SUFFIX).unwrap_or(name);
        let mut file_name: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        if file_name.is_empty() {
            file_name.push_str("preset");
        }
        file_name.push_str(PRESET_SUFFIX);
        self.dir.join(file_name)
    }

    /// Load a preset by name.
    ///
    /// A name from [`list`](Self::list) resolves to its file as is, so files
    /// copied in by hand load even when their names would not survive
    /// [`path_for`](Self::path_for). Anything else goes through `path_for`.
    pub fn load(&self, name: &str) -> Result<Preset, PresetError> {
        match self.existing_path(name) {
            Some(path) => load_path(path),
            None => load_path(self.path_for(name)),
        }
    }

    /// `dir/<name>.synthpreset` if `name` is a single path component and that
    /// file exists.
    fn existing_path(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() || Path::new(name).file_name() != Some(OsStr::new(name)) {
            return None;
        }
        let path = self.dir.join(format!("{name}{PRESET_SUFFIX}"));
        path.is_file().then_some(path)
    }

    /// Write `preset` under `name`, creating the directory if needed.
    pub fn save(&self, name: &str, preset: &Preset) -> Result<PathBuf, PresetError> {
        fs::create_dir_all(&self.dir).map_err(|err| PresetError::io(&self.dir, err))?;
        let path = self.path_for(name);
        fs::write(&path, preset.to_string()).map_err(|err| PresetError::io(&path, err))?;
        info!(path = %path.display(), "preset saved");
        Ok(path)
    }
}

impl Default for PresetStore {
    fn default() -> Self {
        Self::new(DEFAULT_PRESET_DIR)
    }
}

/// Read and parse a preset file at an explicit path.
pub fn load_path(path: impl AsRef<Path>) -> Result<Preset, PresetError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|err| PresetError::io(path, err))?;
    let preset: Preset = text.parse()?;
    debug!(path = %path.display(), "preset loaded");
    Ok(preset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_for_sanitises_names() {
        let store = PresetStore::new("presets");

        assert_eq!(
            store.path_for("warm pad/2"),
            Path::new("presets").join("warm_pad_2.synthpreset")
        );
        assert_eq!(
            store.path_for("lead.synthpreset"),
            Path::new("presets").join("lead.synthpreset")
        );
        assert_eq!(
            store.path_for("  "),
            Path::new("presets").join("preset.synthpreset")
        );
    }

    #[test]
    fn missing_directory_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = PresetStore::new(dir.path().join("nope"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn listed_names_load_even_when_unsanitised() {
        let dir = tempfile::tempdir().unwrap();
        let store = PresetStore::new(dir.path());
        fs::write(
            dir.path().join("warm pad.synthpreset"),
            Preset::default().to_string(),
        )
        .unwrap();

        let names = store.list().unwrap();
        assert_eq!(names, vec!["warm pad"]);
        for name in &names {
            assert_eq!(store.load(name).unwrap(), Preset::default());
        }
    }

    #[test]
    fn load_does_not_leave_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = PresetStore::new(dir.path().join("presets"));
        fs::write(dir.path().join("outside.synthpreset"), Preset::default().to_string()).unwrap();

        assert!(matches!(store.load("../outside"), Err(PresetError::Io { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = PresetStore::new(dir.path());
        assert!(matches!(store.load("ghost"), Err(PresetError::Io { .. })));
    }
}
