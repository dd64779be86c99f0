//! File-level conversion: validate the input, render it, write the output.

use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ConvertError, Result};
use crate::render::render_message;

/// Result of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Where the document was written.
    pub output: PathBuf,
    /// Size of the written document.
    pub bytes_written: u64,
    /// Number of header fields shown above the body.
    pub metadata_fields: usize,
}

/// Check that `input` has the `expected` extension (ASCII case-insensitive).
///
/// Only the path is inspected; the file is not touched.
pub fn validate_input(input: &Path, expected: &str) -> Result<()> {
    let matches = input
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case(expected));

    if matches {
        Ok(())
    } else {
        Err(ConvertError::InvalidExtension {
            path: input.to_path_buf(),
            expected: expected.to_string(),
        })
    }
}

/// Default output: the input's file stem with `extension`, inside `cwd`.
pub fn default_output_path(input: &Path, cwd: &Path, extension: &str) -> PathBuf {
    let mut name = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "message".into());
    name.push(".");
    name.push(extension);
    cwd.join(name)
}

/// Resolve the output path from an optional override.
///
/// Relative overrides are taken relative to `cwd`; absolute ones are kept.
pub fn resolve_output_path(
    requested: Option<&Path>,
    input: &Path,
    cwd: &Path,
    extension: &str,
) -> PathBuf {
    match requested {
        Some(path) => cwd.join(path),
        None => default_output_path(input, cwd, extension),
    }
}

/// Convert `input` into an HTML document at `output`.
///
/// The whole document is rendered in memory first, so a malformed message or
/// an undecodable payload never creates the output file. A file that fails
/// part-way through writing is removed.
pub fn convert_file(input: &Path, output: &Path) -> Result<Conversion> {
    let raw = std::fs::read(input).map_err(|source| ConvertError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    debug!(path = %input.display(), size = raw.len(), "Read input");

    let document = render_message(&raw)?;
    let metadata_fields = document.metadata_fields();

    write_output(output, document.as_bytes())?;
    info!(
        input = %input.display(),
        output = %output.display(),
        size = document.as_bytes().len(),
        "Converted message"
    );

    Ok(Conversion {
        output: output.to_path_buf(),
        bytes_written: document.as_bytes().len() as u64,
        metadata_fields,
    })
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = std::fs::File::create(path).map_err(|source| ConvertError::Create {
        path: path.to_path_buf(),
        source,
    })?;

    let written = file.write_all(bytes).and_then(|()| file.flush());
    if let Err(source) = written {
        drop(file);
        if let Err(e) = std::fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "Could not remove partial output");
        }
        return Err(ConvertError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_input_extension() {
        assert!(validate_input(Path::new("mail.eml"), "eml").is_ok());
        assert!(validate_input(Path::new("dir/Mail.EML"), "eml").is_ok());
        assert!(matches!(
            validate_input(Path::new("mail.txt"), "eml"),
            Err(ConvertError::InvalidExtension { .. })
        ));
        assert!(validate_input(Path::new("mail"), "eml").is_err());
        assert!(validate_input(Path::new("mail.eml.bak"), "eml").is_err());
    }

    #[test]
    fn test_default_output_path() {
        let cwd = Path::new("/work");
        assert_eq!(
            default_output_path(Path::new("inbox/note.eml"), cwd, "html"),
            PathBuf::from("/work/note.html")
        );
        assert_eq!(
            default_output_path(Path::new("v1.2.eml"), cwd, "html"),
            PathBuf::from("/work/v1.2.html")
        );
    }

    #[test]
    fn test_resolve_output_override() {
        let cwd = Path::new("/work");
        let input = Path::new("note.eml");
        assert_eq!(
            resolve_output_path(Some(Path::new("custom.html")), input, cwd, "html"),
            PathBuf::from("/work/custom.html")
        );
        assert_eq!(
            resolve_output_path(Some(Path::new("/tmp/x.html")), input, cwd, "html"),
            PathBuf::from("/tmp/x.html")
        );
        assert_eq!(
            resolve_output_path(None, input, cwd, "html"),
            PathBuf::from("/work/note.html")
        );
    }

    #[test]
    fn test_convert_missing_input() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out.html");
        let err = convert_file(&tmp.path().join("missing.eml"), &out).unwrap_err();
        assert!(matches!(err, ConvertError::Read { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn test_convert_into_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("in.eml");
        std::fs::write(&input, "ct; a; enc\n\nx\n\nPGgxPkhpPC9oMT4=").unwrap();

        let out = tmp.path().join("no-such-dir").join("out.html");
        let err = convert_file(&input, &out).unwrap_err();
        assert!(matches!(err, ConvertError::Create { .. }));
    }
}
