use std::{fs::File, io::Read, path::Path};

use csv::{ErrorKind, ReaderBuilder, StringRecord, Trim};
use log::debug;

use crate::{
    config::LoaderConfig,
    error::{MatchError, Result},
    profile::Profile,
};

/// Loads a semicolon-separated `symbol;value` file with a header row
pub fn load_profile<P: AsRef<Path>>(path: P) -> Result<Profile> {
    load_profile_with(path, &LoaderConfig::default())
}

pub fn load_profile_with<P: AsRef<Path>>(path: P, config: &LoaderConfig) -> Result<Profile> {
    let file = File::open(path.as_ref())?;
    debug!("Reading expression profile from {}", path.as_ref().display());
    read_profile(file, config)
}

/// Parses a two-column (identifier, value) table into a [`Profile`]
///
/// Every record must hold exactly two cells and every value cell must be a
/// finite number. A single bad row fails the whole load; no partial profile
/// is returned.
pub fn read_profile<R: Read>(reader: R, config: &LoaderConfig) -> Result<Profile> {
    let mut reader = ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(config.has_headers)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    if config.has_headers {
        let headers = reader.headers().map_err(|e| utf8_as_format(e, 1))?;
        if headers.len() != 2 {
            return Err(MatchError::Format {
                row: 1,
                reason: format!("expected 2 header columns, found {}", headers.len()),
            });
        }
    }

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| utf8_as_format(e, idx + 1))?;
        let row = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 1);
        rows.push(parse_record(&record, row)?);
    }

    let n_rows = rows.len();
    let profile = Profile::from_pairs(rows);
    debug!(
        "Loaded {} rows into {} unique genes",
        n_rows,
        profile.len()
    );
    Ok(profile)
}

/// Undecodable bytes are malformed input, not a reader failure
fn utf8_as_format(err: csv::Error, fallback_row: usize) -> MatchError {
    let (row, field) = match err.kind() {
        ErrorKind::Utf8 { pos, err: utf8 } => (
            pos.as_ref().map_or(fallback_row, |p| p.line() as usize),
            utf8.field() + 1,
        ),
        _ => return MatchError::Csv(err),
    };
    MatchError::Format {
        row,
        reason: format!("invalid UTF-8 in field {field}"),
    }
}

fn parse_record(record: &StringRecord, row: usize) -> Result<(String, f64)> {
    if record.len() != 2 {
        return Err(MatchError::Format {
            row,
            reason: format!("expected 2 columns, found {}", record.len()),
        });
    }

    let identifier = &record[0];
    if identifier.is_empty() {
        return Err(MatchError::Format {
            row,
            reason: "missing gene identifier".to_string(),
        });
    }

    let cell = &record[1];
    if cell.is_empty() {
        return Err(MatchError::Format {
            row,
            reason: format!("missing value for '{identifier}'"),
        });
    }
    match cell.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok((identifier.to_string(), value)),
        _ => Err(MatchError::Format {
            row,
            reason: format!("non-numeric value '{cell}' for '{identifier}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn read(input: &str) -> Result<Profile> {
        read_profile(input.as_bytes(), &LoaderConfig::default())
    }

    #[test]
    fn test_read_profile_basic() {
        let profile = read("symbol;value\nTP53;2.5\nBRCA1;1\n").unwrap();
        assert_eq!(profile.identifiers(), &["BRCA1", "TP53"]);
        assert_eq!(profile.values(), &[1.0, 2.5]);
    }

    #[test]
    fn test_read_profile_averages_duplicates() {
        let profile = read("symbol;value\ng1;1\ng2;4\ng1;3\ng1;5\n").unwrap();
        assert_eq!(profile.len(), 2);
        assert_relative_eq!(profile.get("g1").unwrap(), 3.0);
        assert_relative_eq!(profile.get("g2").unwrap(), 4.0);
    }

    #[test]
    fn test_read_profile_duplicate_order_does_not_matter() {
        let a = read("symbol;value\ng1;1\ng2;4\ng1;3\n").unwrap();
        let b = read("symbol;value\ng1;3\ng1;1\ng2;4\n").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_read_profile_trims_cells() {
        let profile = read("symbol;value\n  EGFR ; 7.5 \n").unwrap();
        assert_relative_eq!(profile.get("EGFR").unwrap(), 7.5);
    }

    #[test]
    fn test_read_profile_rejects_wrong_header_width() {
        let err = read("symbol;value;extra\ng1;1;2\n").unwrap_err();
        assert!(matches!(err, MatchError::Format { row: 1, .. }));
    }

    #[test]
    fn test_read_profile_rejects_wrong_row_width() {
        let err = read("symbol;value\ng1;1\ng2\n").unwrap_err();
        assert!(matches!(err, MatchError::Format { row: 3, .. }));
    }

    #[test]
    fn test_read_profile_rejects_non_numeric() {
        let err = read("symbol;value\ng1;1\ng1;high\n").unwrap_err();
        match err {
            MatchError::Format { row, reason } => {
                assert_eq!(row, 3);
                assert!(reason.contains("high"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_profile_rejects_missing_and_nan() {
        assert!(matches!(
            read("symbol;value\ng1;\n"),
            Err(MatchError::Format { .. })
        ));
        assert!(matches!(
            read("symbol;value\ng1;NaN\n"),
            Err(MatchError::Format { .. })
        ));
    }

    #[test]
    fn test_read_profile_rejects_invalid_utf8() {
        let err = read_profile(&b"symbol;value\ng\xff1;2\n"[..], &LoaderConfig::default())
            .unwrap_err();
        assert!(matches!(err, MatchError::Format { row: 2, .. }));

        let err = read_profile(&b"sym\xffbol;value\ng1;2\n"[..], &LoaderConfig::default())
            .unwrap_err();
        assert!(matches!(err, MatchError::Format { row: 1, .. }));
    }

    #[test]
    fn test_read_profile_header_only() {
        let profile = read("symbol;value\n").unwrap();
        assert!(profile.is_empty());
    }

    #[test]
    fn test_read_profile_tab_separated_without_header() {
        let config = LoaderConfig::builder()
            .delimiter(b'\t')
            .has_headers(false)
            .build();
        let profile = read_profile("g2\t4\ng1\t1\ng2\t6\n".as_bytes(), &config).unwrap();
        assert_eq!(profile.identifiers(), &["g1", "g2"]);
        assert_relative_eq!(profile.get("g2").unwrap(), 5.0);
    }

    #[test]
    fn test_load_profile_missing_file() {
        let err = load_profile("/nonexistent/profile.csv").unwrap_err();
        assert!(matches!(err, MatchError::Io(_)));
    }
}
