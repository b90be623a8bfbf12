//! Reference fixtures loaded from the payload directory.
//!
//! Fixtures are JSON documents describing entities the live service is
//! expected to hold. Scenarios compare live responses against them and fall
//! back to them when a shared-sandbox lookup comes back empty.

use crate::error::{HarnessError, Result};
use crate::model::{Pet, decode_entity};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use serde::de::DeserializeOwned;
use std::io;

/// File name of the well-known reference pet.
pub const KNOWN_PET: &str = "known_pet.json";

/// Loader for reference fixtures under one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureLoader {
    dir: Utf8PathBuf,
}

impl FixtureLoader {
    /// Create a loader reading from `dir`.
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory fixtures are read from.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Load and decode the fixture named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::FixtureNotFound`] when the directory or file
    /// is missing, [`HarnessError::FixtureRead`] for other I/O failures and
    /// [`HarnessError::FixtureParse`] when the file is not a non-empty JSON
    /// object decoding into `T`.
    pub fn load_reference<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let text = self.read(name)?;
        decode_entity(&text).map_err(|source| HarnessError::FixtureParse {
            name: name.to_owned(),
            source,
        })
    }

    /// Load the well-known reference pet.
    ///
    /// # Errors
    ///
    /// See [`FixtureLoader::load_reference`].
    pub fn load_known_pet(&self) -> Result<Pet> {
        self.load_reference(KNOWN_PET)
    }

    fn read(&self, name: &str) -> Result<String> {
        let classify = |source: io::Error| {
            if source.kind() == io::ErrorKind::NotFound {
                HarnessError::FixtureNotFound {
                    name: name.to_owned(),
                    dir: self.dir.clone(),
                }
            } else {
                HarnessError::FixtureRead {
                    name: name.to_owned(),
                    source,
                }
            }
        };
        let dir = Dir::open_ambient_dir(&self.dir, ambient_authority()).map_err(classify)?;
        let text = dir.read_to_string(name).map_err(classify)?;
        tracing::debug!(fixture = name, dir = %self.dir, "loaded reference fixture");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn payloads() -> (TempDir, FixtureLoader) {
        let temp = tempfile::tempdir().expect("create temp dir");
        let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf-8 temp path");
        (temp, FixtureLoader::new(dir))
    }

    #[rstest]
    fn decodes_known_pet(payloads: (TempDir, FixtureLoader)) {
        let (temp, loader) = payloads;
        std::fs::write(
            temp.path().join(KNOWN_PET),
            r#"{"id":7,"name":"Rex","status":"available","photoUrls":[]}"#,
        )
        .expect("write fixture");
        let pet = loader.load_known_pet().expect("fixture decodes");
        assert_eq!(pet.id, Some(7));
        assert_eq!(pet.name.as_deref(), Some("Rex"));
        assert!(pet.tags.is_none());
    }

    #[rstest]
    fn missing_file_is_not_found(payloads: (TempDir, FixtureLoader)) {
        let (_temp, loader) = payloads;
        let err = loader
            .load_reference::<Pet>("absent.json")
            .expect_err("no such fixture");
        assert!(
            matches!(err, HarnessError::FixtureNotFound { ref name, .. } if name == "absent.json"),
            "unexpected error: {err:?}"
        );
    }

    #[rstest]
    fn missing_directory_is_not_found() {
        let loader = FixtureLoader::new("does/not/exist");
        assert!(matches!(
            loader.load_known_pet(),
            Err(HarnessError::FixtureNotFound { .. })
        ));
    }

    #[rstest]
    fn malformed_json_is_a_parse_error(payloads: (TempDir, FixtureLoader)) {
        let (temp, loader) = payloads;
        std::fs::write(temp.path().join(KNOWN_PET), "{ not json").expect("write fixture");
        assert!(matches!(
            loader.load_known_pet(),
            Err(HarnessError::FixtureParse { .. })
        ));
    }

    #[rstest]
    #[case(r#"{"id":"seven"}"#)]
    #[case("[]")]
    #[case("{}")]
    fn shape_mismatch_is_a_parse_error(
        payloads: (TempDir, FixtureLoader),
        #[case] contents: &str,
    ) {
        let (temp, loader) = payloads;
        std::fs::write(temp.path().join(KNOWN_PET), contents).expect("write fixture");
        assert!(matches!(
            loader.load_known_pet(),
            Err(HarnessError::FixtureParse { .. })
        ));
    }
}
