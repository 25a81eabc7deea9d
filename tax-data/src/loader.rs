use std::collections::BTreeMap;
use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{FilingStatus, TablesError, TaxBracket, TaxYearTables};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading tax bracket data.
#[derive(Debug, Error)]
pub enum TaxBracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("CSV row is for tax year {found}, but the tables are for {expected}")]
    TaxYearMismatch { expected: i32, found: i32 },

    #[error(
        "Schedule {schedule} bracket starting at {min_income} has base tax {found}; \
         the lower brackets add up to {expected}"
    )]
    InconsistentBaseTax {
        schedule: String,
        min_income: Decimal,
        expected: Decimal,
        found: Decimal,
    },

    #[error("Loaded brackets are invalid: {0}")]
    Tables(#[from] TablesError),
}

impl From<csv::Error> for TaxBracketLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxBracketLoaderError::CsvParse(err.to_string())
    }
}

/// Maps IRS schedule codes to filing statuses.
///
/// - Schedule X → Single
/// - Schedule Y-1 → Married Filing Jointly and Qualifying Surviving Spouse
/// - Schedule Y-2 → Married Filing Separately
/// - Schedule Z → Head of Household
fn schedule_to_filing_statuses(
    schedule: &str
) -> Result<&'static [FilingStatus], TaxBracketLoaderError> {
    match schedule {
        "X" => Ok(&[FilingStatus::Single]),
        "Y-1" => Ok(&[
            FilingStatus::MarriedFilingJointly,
            FilingStatus::QualifyingSurvivingSpouse,
        ]),
        "Y-2" => Ok(&[FilingStatus::MarriedFilingSeparately]),
        "Z" => Ok(&[FilingStatus::HeadOfHousehold]),
        _ => Err(TaxBracketLoaderError::InvalidSchedule(schedule.to_string())),
    }
}

/// A single record from the tax brackets CSV file.
///
/// The CSV format uses IRS schedule designations:
/// - `tax_year`: The tax year (e.g., 2025)
/// - `schedule`: The IRS schedule code (X, Y-1, Y-2, Z)
/// - `min_income`: The minimum income for this bracket
/// - `max_income`: The maximum income for this bracket (empty for unlimited)
/// - `base_tax`: Tax on all income below `min_income`
/// - `rate`: The marginal tax rate as a decimal (e.g., 0.10 for 10%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBracketRecord {
    pub tax_year: i32,
    pub schedule: String,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub base_tax: Decimal,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for tax bracket schedules from CSV files.
///
/// Parsed records replace the bracket schedules of an in-memory
/// [`TaxYearTables`]; everything else in the tables is left alone.
pub struct TaxBracketLoader;

impl TaxBracketLoader {
    /// Parse tax bracket records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a string slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxBracketRecord>, TaxBracketLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxBracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Replace bracket schedules in `tables` with `records`.
    ///
    /// For each schedule present in the records, this method will:
    /// 1. Check every row belongs to the tables' tax year
    /// 2. Sort the rows by `min_income` and check each `base_tax` equals the
    ///    tax on all lower brackets
    /// 3. Replace the brackets of every filing status the schedule maps to
    ///
    /// Schedules absent from the records keep their existing brackets. The
    /// resulting tables are validated before returning; on error `tables`
    /// may be partially updated and should be discarded.
    ///
    /// Returns the number of brackets written. Schedule Y-1 maps to both
    /// MFJ and QSS, so its brackets count twice.
    pub fn load(
        tables: &mut TaxYearTables,
        records: &[TaxBracketRecord],
    ) -> Result<usize, TaxBracketLoaderError> {
        let mut groups: BTreeMap<&str, Vec<&TaxBracketRecord>> = BTreeMap::new();
        for record in records {
            if record.tax_year != tables.tax_year {
                return Err(TaxBracketLoaderError::TaxYearMismatch {
                    expected: tables.tax_year,
                    found: record.tax_year,
                });
            }
            groups.entry(record.schedule.as_str()).or_default().push(record);
        }

        let mut written = 0;
        for (schedule, mut group_records) in groups {
            let statuses = schedule_to_filing_statuses(schedule)?;
            group_records.sort_by(|a, b| a.min_income.cmp(&b.min_income));
            verify_base_tax(schedule, &group_records)?;

            let brackets: Vec<TaxBracket> = group_records
                .iter()
                .map(|r| TaxBracket::new(r.min_income, r.max_income, r.rate))
                .collect();

            for status in statuses {
                debug!(
                    schedule,
                    status = status.as_str(),
                    brackets = brackets.len(),
                    "replacing bracket schedule"
                );
                *tables.brackets.get_mut(*status) = brackets.clone();
                written += brackets.len();
            }
        }

        tables.validate()?;
        Ok(written)
    }
}

/// Each row's `base_tax` must equal the tax on every bracket below it.
fn verify_base_tax(
    schedule: &str,
    sorted: &[&TaxBracketRecord],
) -> Result<(), TaxBracketLoaderError> {
    let mut cumulative = Decimal::ZERO;
    for record in sorted {
        if record.base_tax != cumulative {
            return Err(TaxBracketLoaderError::InconsistentBaseTax {
                schedule: schedule.to_string(),
                min_income: record.min_income,
                expected: cumulative,
                found: record.base_tax,
            });
        }
        if let Some(max) = record.max_income {
            cumulative += (max - record.min_income) * record.rate;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const TEST_CSV: &str = include_str!("../test-data/tax_brackets_2025.csv");

    const HEADER: &str = "tax_year,schedule,min_income,max_income,base_tax,rate\n";

    fn tables_2025() -> TaxYearTables {
        TaxYearTables::for_year(2025).expect("2025 tables are built in")
    }

    #[test]
    fn test_parse_csv_single_bracket() {
        let csv = "tax_year,schedule,min_income,max_income,base_tax,rate\n2025,X,0,11925,0,0.10";

        let records = TaxBracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0],
            TaxBracketRecord {
                tax_year: 2025,
                schedule: "X".to_string(),
                min_income: dec!(0),
                max_income: Some(dec!(11925)),
                base_tax: dec!(0),
                rate: dec!(0.10),
            }
        );
    }

    #[test]
    fn test_parse_csv_unlimited_max_income() {
        let csv =
            "tax_year,schedule,min_income,max_income,base_tax,rate\n2025,X,626350,,188769.75,0.37";

        let records = TaxBracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].max_income, None);
        assert_eq!(records[0].base_tax, dec!(188769.75));
    }

    #[test]
    fn test_parse_csv_all_schedules() {
        let records = TaxBracketLoader::parse(TEST_CSV.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records.len(), 28);
        for schedule in ["X", "Y-1", "Y-2", "Z"] {
            let count = records.iter().filter(|r| r.schedule == schedule).count();
            assert_eq!(count, 7, "Expected 7 brackets for schedule {}", schedule);
        }
    }

    #[test]
    fn test_parse_invalid_csv_missing_column() {
        let csv = "tax_year,schedule,min_income\n2025,X,0";

        let err = TaxBracketLoader::parse(csv.as_bytes()).expect_err("Should fail for missing column");

        let TaxBracketLoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(
            msg.contains("missing field"),
            "Expected 'missing field' in error, got: {}",
            msg
        );
    }

    #[test]
    fn test_parse_invalid_csv_bad_decimal() {
        let csv = "tax_year,schedule,min_income,max_income,base_tax,rate\n2025,X,0,abc,0,0.10";

        let err = TaxBracketLoader::parse(csv.as_bytes()).expect_err("Should fail for invalid decimal");

        assert!(matches!(err, TaxBracketLoaderError::CsvParse(_)));
    }

    #[test]
    fn test_parse_empty_csv() {
        let records = TaxBracketLoader::parse(HEADER.as_bytes()).expect("Failed to parse CSV");

        assert!(records.is_empty());
    }

    #[test]
    fn test_schedule_to_filing_statuses() {
        assert_eq!(
            schedule_to_filing_statuses("X").expect("Should map X"),
            &[FilingStatus::Single]
        );
        assert_eq!(
            schedule_to_filing_statuses("Y-1").expect("Should map Y-1"),
            &[
                FilingStatus::MarriedFilingJointly,
                FilingStatus::QualifyingSurvivingSpouse
            ]
        );
        assert_eq!(
            schedule_to_filing_statuses("Y-2").expect("Should map Y-2"),
            &[FilingStatus::MarriedFilingSeparately]
        );
        assert_eq!(
            schedule_to_filing_statuses("Z").expect("Should map Z"),
            &[FilingStatus::HeadOfHousehold]
        );
    }

    #[test]
    fn test_schedule_to_filing_statuses_invalid() {
        match schedule_to_filing_statuses("INVALID") {
            Err(TaxBracketLoaderError::InvalidSchedule(ref schedule)) => {
                assert_eq!(schedule, "INVALID");
            }
            other => panic!("expected InvalidSchedule, got {other:?}"),
        }
    }

    #[test]
    fn test_load_matches_builtin_tables() {
        let records = TaxBracketLoader::parse(TEST_CSV.as_bytes()).expect("Failed to parse CSV");
        let mut tables = tables_2025();

        let written = TaxBracketLoader::load(&mut tables, &records).expect("Failed to load");

        // 28 rows, Y-1 counted for both MFJ and QSS
        assert_eq!(written, 35);
        assert_eq!(tables, tables_2025());
    }

    #[test]
    fn test_load_accepts_unsorted_rows() {
        let csv = format!("{HEADER}2025,X,11925,,1192.50,0.15\n2025,X,0,11925,0,0.10\n");
        let records = TaxBracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");
        let mut tables = tables_2025();

        TaxBracketLoader::load(&mut tables, &records).expect("Failed to load");

        let single = tables.brackets_for(FilingStatus::Single);
        assert_eq!(single.len(), 2);
        assert_eq!(single[1], TaxBracket::new(dec!(11925), None, dec!(0.15)));
        // Other schedules untouched
        assert_eq!(
            tables.brackets_for(FilingStatus::HeadOfHousehold),
            tables_2025().brackets_for(FilingStatus::HeadOfHousehold)
        );
    }

    #[test]
    fn test_load_rejects_wrong_year() {
        let csv = format!("{HEADER}2024,X,0,,0,0.10\n");
        let records = TaxBracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");
        let mut tables = tables_2025();

        let err = TaxBracketLoader::load(&mut tables, &records).expect_err("Should reject 2024");

        assert!(matches!(
            err,
            TaxBracketLoaderError::TaxYearMismatch {
                expected: 2025,
                found: 2024
            }
        ));
    }

    #[test]
    fn test_load_rejects_inconsistent_base_tax() {
        let csv = format!("{HEADER}2025,Z,0,17000,0,0.10\n2025,Z,17000,,1800,0.12\n");
        let records = TaxBracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");
        let mut tables = tables_2025();

        let err = TaxBracketLoader::load(&mut tables, &records).expect_err("Should reject");

        let TaxBracketLoaderError::InconsistentBaseTax {
            schedule,
            expected,
            found,
            ..
        } = err
        else {
            panic!("Expected InconsistentBaseTax, got: {:?}", err);
        };
        assert_eq!(schedule, "Z");
        assert_eq!(expected, dec!(1700));
        assert_eq!(found, dec!(1800));
    }

    #[test]
    fn test_load_rejects_gap_between_brackets() {
        let csv = format!("{HEADER}2025,Y-2,0,10000,0,0.10\n2025,Y-2,12000,,1000,0.12\n");
        let records = TaxBracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");
        let mut tables = tables_2025();

        let err = TaxBracketLoader::load(&mut tables, &records).expect_err("Should reject gap");

        assert!(matches!(
            err,
            TaxBracketLoaderError::Tables(TablesError::NonContiguousBrackets { .. })
        ));
    }
}
