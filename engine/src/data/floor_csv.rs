use csv::{ReaderBuilder, StringRecord};
use shared::models::{FloorRow, TypeRangeTable};
use shared::utils::brazilian_format;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::EngineError;

pub struct FloorCsvParser;

impl FloorCsvParser {
    // CSV Header: Nome;Tipo;Rep;Coef;Area;Constr
    // Example Row: Pavimento Tipo;Área Privativa (Autônoma);12;1,00;320,50;sim
    pub fn load_floors_from_csv(file_path: impl AsRef<Path>, ranges: &TypeRangeTable) -> Result<Vec<FloorRow>, EngineError> {
        let file_path = file_path.as_ref();
        let file = File::open(file_path)?;
        let floors = Self::read_floors(BufReader::new(file), ranges)?;
        tracing::info!(path = %file_path.display(), floors = floors.len(), "Loaded floor table");
        Ok(floors)
    }

    /// `Rep` defaults to 1 and `Coef` to the minimum of the floor type's range
    /// (1 for unknown types). Coefficients are kept as written; clamping is the
    /// form's job.
    pub fn read_floors<R: Read>(reader: R, ranges: &TypeRangeTable) -> Result<Vec<FloorRow>, EngineError> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut floors = Vec::new();

        for (idx, result) in rdr.records().enumerate() {
            let record = result?;
            let line = idx + 2;

            let name = Self::get_field(&record, &headers, "Nome").unwrap_or("").trim().to_string();
            let floor_type = Self::required(&record, &headers, "Tipo", line)?.trim().to_string();
            let area = Self::number(Self::required(&record, &headers, "Area", line)?, "Area", line)?;

            let repetitions = match Self::get_field(&record, &headers, "Rep").map(str::trim) {
                Some(raw) if !raw.is_empty() => Self::number(raw, "Rep", line)?,
                _ => 1.0,
            };
            let coefficient = match Self::get_field(&record, &headers, "Coef").map(str::trim) {
                Some(raw) if !raw.is_empty() => Self::number(raw, "Coef", line)?,
                _ => ranges.get(&floor_type).map_or(1.0, |range| range.min),
            };
            let excluded = match Self::get_field(&record, &headers, "Constr") {
                Some(raw) => !Self::parse_constr(raw).ok_or_else(|| {
                    EngineError::CsvDataFormatError(format!(
                        "Error parsing 'Constr' at line {}: expected sim/não, got '{}'",
                        line, raw
                    ))
                })?,
                None => false,
            };

            if area < 0.0 || repetitions < 0.0 {
                return Err(EngineError::CsvDataFormatError(format!(
                    "Negative area or repetitions at line {}",
                    line
                )));
            }

            floors.push(FloorRow {
                row_id: (idx + 1).to_string(),
                name,
                floor_type,
                area,
                repetitions,
                coefficient,
                excluded,
            });
        }
        Ok(floors)
    }

    // `true` when the floor counts towards the built area.
    fn parse_constr(raw: &str) -> Option<bool> {
        match raw.trim().to_lowercase().as_str() {
            "" | "sim" | "s" | "true" | "1" | "x" => Some(true),
            "não" | "nao" | "n" | "false" | "0" => Some(false),
            _ => None,
        }
    }

    fn number(raw: &str, column: &str, line: usize) -> Result<f64, EngineError> {
        brazilian_format::try_parse_decimal(raw).map_err(|e| {
            EngineError::CsvDataFormatError(format!("Error parsing '{}' at line {}: {}", column, line, e))
        })
    }

    fn required<'a>(record: &'a StringRecord, headers: &'a StringRecord, name: &str, line: usize) -> Result<&'a str, EngineError> {
        Self::get_field(record, headers, name).ok_or_else(|| {
            EngineError::CsvDataFormatError(format!("Missing '{}' field in CSV record at line {}", name, line))
        })
    }

    // Looks a field up by header name so column order does not matter.
    fn get_field<'a>(record: &'a StringRecord, headers: &'a StringRecord, name: &str) -> Option<&'a str> {
        headers
            .iter()
            .position(|header| header.trim().eq_ignore_ascii_case(name))
            .and_then(|pos| record.get(pos))
    }
}
