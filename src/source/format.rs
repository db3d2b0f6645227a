//! Source location and format detection

use crate::error::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// File formats the loader can read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Comma-separated text with a header row
    Csv,
    /// Apache Parquet
    Parquet,
}

impl SourceFormat {
    /// Decide the format from the location's suffix alone
    ///
    /// Only `.csv` and `.parquet` are accepted, case-sensitively. For URLs
    /// the query string and fragment are not part of the suffix.
    pub fn detect(location: &str) -> Result<Self> {
        let path = match SourceLocation::parse(location)? {
            SourceLocation::Remote(url) => url.path().to_string(),
            SourceLocation::Local(path) => path.to_string_lossy().into_owned(),
        };

        if path.ends_with(".csv") {
            Ok(Self::Csv)
        } else if path.ends_with(".parquet") {
            Ok(Self::Parquet)
        } else {
            Err(Error::unsupported_format(extension_of(&path)))
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => f.write_str("csv"),
            Self::Parquet => f.write_str("parquet"),
        }
    }
}

/// `.ext` of the last path segment, or `none`
fn extension_of(path: &str) -> String {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() => name[idx..].to_string(),
        _ => "none".to_string(),
    }
}

/// Where a source file lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// Path on the local filesystem
    Local(PathBuf),
    /// `http://` or `https://` URL
    Remote(Url),
}

impl SourceLocation {
    /// Classify `location` by its scheme
    pub fn parse(location: &str) -> Result<Self> {
        let scheme = location
            .split_once("://")
            .map(|(scheme, _)| scheme.to_ascii_lowercase());
        if matches!(scheme.as_deref(), Some("http" | "https")) {
            Ok(Self::Remote(Url::parse(location)?))
        } else {
            Ok(Self::Local(PathBuf::from(location)))
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => write!(f, "{url}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("data/people.csv", SourceFormat::Csv ; "local csv")]
    #[test_case("/abs/trips.parquet", SourceFormat::Parquet ; "local parquet")]
    #[test_case("https://example.com/x/zones.csv", SourceFormat::Csv ; "remote csv")]
    #[test_case("https://example.com/y.parquet?token=abc#frag", SourceFormat::Parquet ; "remote with query")]
    fn test_detect(location: &str, expected: SourceFormat) {
        assert_eq!(SourceFormat::detect(location).unwrap(), expected);
    }

    #[test_case("data/people.json", ".json" ; "json")]
    #[test_case("trips.csv.gz", ".gz" ; "compressed csv")]
    #[test_case("TRIPS.CSV", ".CSV" ; "upper case")]
    #[test_case("https://example.com/file.csv/", "none" ; "trailing slash")]
    #[test_case("no_extension", "none" ; "bare name")]
    #[test_case("https://example.com/data?f=x.csv", "none" ; "suffix only in query")]
    fn test_detect_rejects(location: &str, extension: &str) {
        match SourceFormat::detect(location).unwrap_err() {
            Error::UnsupportedFormat { extension: got } => assert_eq!(got, extension),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_location_parse() {
        assert!(matches!(
            SourceLocation::parse("./a.csv").unwrap(),
            SourceLocation::Local(_)
        ));
        assert!(matches!(
            SourceLocation::parse("http://host/a.csv").unwrap(),
            SourceLocation::Remote(_)
        ));
        assert!(SourceLocation::parse("https://").is_err());
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let location = SourceLocation::parse("HTTPS://example.com/x/zones.csv").unwrap();
        match location {
            SourceLocation::Remote(url) => {
                assert_eq!(url.as_str(), "https://example.com/x/zones.csv");
            }
            SourceLocation::Local(path) => panic!("treated as local path {}", path.display()),
        }
        assert_eq!(
            SourceFormat::detect("Http://example.com/y.parquet").unwrap(),
            SourceFormat::Parquet
        );
    }
}
