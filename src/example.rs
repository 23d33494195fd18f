//! Code for working with the bundled example data sets
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use include_dir::{Dir, DirEntry, include_dir};

/// The directory containing the example data sets.
const EXAMPLES_DIR: Dir = include_dir!("demos");

/// Get the names of all examples
pub fn get_example_names() -> impl Iterator<Item = &'static str> {
    EXAMPLES_DIR.dirs().map(|dir| {
        dir.path()
            .as_os_str()
            .to_str()
            .expect("Invalid unicode in path")
    })
}

/// A bundled example data set
pub struct Example(Dir<'static>);

impl Example {
    /// Get the example with the specified name
    pub fn from_name(name: &str) -> Result<Self> {
        let dir = EXAMPLES_DIR
            .get_dir(name)
            .with_context(|| format!("Example '{name}' not found"))?;

        Ok(Self(dir.clone()))
    }

    /// Get the contents of the readme file for this example
    pub fn get_readme(&self) -> Result<&'static str> {
        self.0
            .get_file(self.0.path().join("README.txt"))
            .context("Missing file")?
            .contents_utf8()
            .context("File not UTF-8 encoded")
    }

    /// Extract this example to a specified destination
    pub fn extract(&self, new_path: &Path) -> Result<()> {
        fs::create_dir(new_path)
            .with_context(|| format!("Could not create directory {}", new_path.display()))?;
        for entry in self.0.entries() {
            let DirEntry::File(file) = entry else {
                bail!("Subdirectories in examples are not supported");
            };

            let file_name = file.path().file_name().context("Invalid file name")?;
            fs::write(new_path.join(file_name), file.contents())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{CsvDataSource, validate::validate_data};
    use tempfile::tempdir;

    #[test]
    fn all_examples_have_readme() {
        for example in get_example_names() {
            let readme = Example::from_name(example)
                .unwrap()
                .get_readme()
                .with_context(|| format!("Could not load readme for {example}"))
                .unwrap();

            assert!(!readme.trim().is_empty());
        }
    }

    #[test]
    fn all_examples_are_valid() {
        for example in get_example_names() {
            let dir = tempdir().unwrap();
            let path = dir.path().join(example);
            Example::from_name(example).unwrap().extract(&path).unwrap();

            let report = validate_data(&CsvDataSource::new(&path)).unwrap();
            assert!(report.is_valid(), "{example}: {:?}", report.issues);
        }
    }

    #[test]
    fn unknown_example() {
        assert!(Example::from_name("no_such_example").is_err());
    }
}
