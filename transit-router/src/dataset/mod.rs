//! Loading stops and lines from a directory of CSV files.
//!
//! Layout:
//! - `stops.csv`: header `Code,Name,Zone,Latitude,Longitude`
//! - `lines.csv`: header `Code,Name`
//! - `line_<code>_<direction>.csv` for directions 0 and 1: the number of
//!   stops on the first row, then one stop code per row

mod error;

pub use error::DatasetError;

use std::fs::File;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::domain::{Coordinate, Line, LineCode, Stop, StopCode};

pub const STOPS_FILE: &str = "stops.csv";
pub const LINES_FILE: &str = "lines.csv";

/// Directions every line is looked up in.
pub const DIRECTIONS: [u8; 2] = [0, 1];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StopRow {
    code: String,
    name: String,
    zone: String,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LineRow {
    code: String,
    name: String,
}

/// Stops and lines read from disk, ready to build graphs from.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub stops: Vec<Stop>,
    /// One entry per line direction found on disk
    pub lines: Vec<Line>,
}

/// Path of the stop sequence file for one direction of a line.
pub fn line_file_name(code: &LineCode, direction: u8) -> String {
    format!("line_{code}_{direction}.csv")
}

/// Reads a dataset directory.
///
/// A missing direction file is skipped with a warning, since some lines
/// only run one way. Stop references inside lines are not checked here;
/// graph construction reports unknown ones.
pub fn load(dir: impl AsRef<Path>) -> Result<Dataset, DatasetError> {
    let dir = dir.as_ref();
    let metadata = std::fs::metadata(dir).map_err(|source| DatasetError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(DatasetError::Io {
            path: dir.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
        });
    }

    let stops = read_stops(&dir.join(STOPS_FILE))?;
    let lines = read_lines(dir)?;

    info!(
        dir = %dir.display(),
        stops = stops.len(),
        line_directions = lines.len(),
        "Loaded dataset"
    );

    Ok(Dataset { stops, lines })
}

fn csv_reader(path: &Path, has_headers: bool) -> Result<csv::Reader<File>, DatasetError> {
    csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(!has_headers)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| csv_error(path, source))
}

fn csv_error(path: &Path, source: csv::Error) -> DatasetError {
    DatasetError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

fn invalid_code(path: &Path, source: crate::domain::InvalidCode) -> DatasetError {
    DatasetError::InvalidCode {
        path: path.to_path_buf(),
        source,
    }
}

fn read_stops(path: &Path) -> Result<Vec<Stop>, DatasetError> {
    let mut reader = csv_reader(path, true)?;
    let mut stops = Vec::new();

    for row in reader.deserialize::<StopRow>() {
        let row = row.map_err(|source| csv_error(path, source))?;
        let code = StopCode::parse(&row.code).map_err(|source| invalid_code(path, source))?;

        let coordinate = Coordinate::new(row.latitude, row.longitude);
        if !coordinate.is_valid() {
            return Err(DatasetError::Malformed {
                path: path.to_path_buf(),
                message: format!("stop {code} has out-of-range coordinate {coordinate}"),
            });
        }

        stops.push(Stop::new(code, row.name, row.zone, coordinate));
    }

    Ok(stops)
}

fn read_lines(dir: &Path) -> Result<Vec<Line>, DatasetError> {
    let path = dir.join(LINES_FILE);
    let mut reader = csv_reader(&path, true)?;
    let mut lines = Vec::new();

    for row in reader.deserialize::<LineRow>() {
        let row = row.map_err(|source| csv_error(&path, source))?;
        let code = LineCode::parse(&row.code).map_err(|source| invalid_code(&path, source))?;

        for direction in DIRECTIONS {
            let file = dir.join(line_file_name(&code, direction));
            if !file.exists() {
                warn!(
                    line = %code,
                    direction,
                    path = %file.display(),
                    "Line direction file missing, skipping"
                );
                continue;
            }

            let stops = read_line_stops(&file)?;
            debug!(line = %code, direction, stops = stops.len(), "Read line direction");
            lines.push(Line::new(code.clone(), row.name.clone(), direction, stops));
        }
    }

    Ok(lines)
}

/// Reads a direction file: a stop count followed by that many stop codes.
///
/// Rows after the declared count are ignored.
fn read_line_stops(path: &Path) -> Result<Vec<StopCode>, DatasetError> {
    let malformed = |message: String| DatasetError::Malformed {
        path: path.to_path_buf(),
        message,
    };

    let mut reader = csv_reader(path, false)?;
    let mut records = reader.records();

    let count = match records.next() {
        Some(record) => {
            let record = record.map_err(|source| csv_error(path, source))?;
            let field = record.get(0).unwrap_or_default();
            field
                .parse::<usize>()
                .map_err(|_| malformed(format!("stop count {field:?} is not a number")))?
        }
        None => return Err(malformed("empty file".to_string())),
    };

    let mut stops = Vec::with_capacity(count);
    for record in records.take(count) {
        let record = record.map_err(|source| csv_error(path, source))?;
        let field = record.get(0).unwrap_or_default();
        stops.push(StopCode::parse(field).map_err(|source| invalid_code(path, source))?);
    }

    if stops.len() < count {
        return Err(malformed(format!(
            "declares {count} stops but lists {}",
            stops.len()
        )));
    }

    Ok(stops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ServiceCategory;
    use tempfile::{TempDir, tempdir};

    const STOPS: &str = "\
Code,Name,Zone,Latitude,Longitude
1AL2,AV.ALIADOS,PRT1,41.14954216,-8.610023615
AAL1, ALAMEDA ,GDM1,41.1136,-8.5936
ABL1,AV.BOAVISTA,PRT2,41.1579,-8.6291
";

    fn write(dir: &TempDir, name: &str, contents: &str) {
        std::fs::write(dir.path().join(name), contents).unwrap();
    }

    fn dataset_dir() -> TempDir {
        let dir = tempdir().unwrap();
        write(&dir, STOPS_FILE, STOPS);
        write(&dir, LINES_FILE, "Code,Name\n200,200 - BOLHAO-CAST.QUEIJO\n1M,1M - ALIADOS-HOSP.S.JOAO\n");
        write(&dir, "line_200_0.csv", "3\n1AL2\nAAL1\nABL1\n");
        write(&dir, "line_200_1.csv", "2\nABL1\n1AL2\n");
        write(&dir, "line_1M_0.csv", "2\nAAL1\nABL1\n");
        dir
    }

    #[test]
    fn loads_stops_and_lines() {
        let dir = dataset_dir();
        let dataset = load(dir.path()).unwrap();

        assert_eq!(dataset.stops.len(), 3);
        let alameda = &dataset.stops[1];
        assert_eq!(alameda.code().as_str(), "AAL1");
        assert_eq!(alameda.name(), "ALAMEDA");
        assert_eq!(alameda.zone(), "GDM1");

        let summary: Vec<(&str, u8, usize)> = dataset
            .lines
            .iter()
            .map(|l| (l.code().as_str(), l.direction(), l.stops().len()))
            .collect();
        assert_eq!(summary, vec![("200", 0, 3), ("200", 1, 2), ("1M", 0, 2)]);
        assert_eq!(dataset.lines[2].category(), ServiceCategory::Night);
        assert_eq!(dataset.lines[0].name(), "200 - BOLHAO-CAST.QUEIJO");
    }

    #[test]
    fn missing_direction_is_skipped() {
        let dir = dataset_dir();
        let dataset = load(dir.path()).unwrap();

        assert!(
            !dataset
                .lines
                .iter()
                .any(|l| l.code().as_str() == "1M" && l.direction() == 1)
        );
    }

    #[test]
    fn rows_past_the_count_are_ignored() {
        let dir = dataset_dir();
        write(&dir, "line_200_1.csv", "1\nABL1\n1AL2\n");

        let dataset = load(dir.path()).unwrap();
        assert_eq!(dataset.lines[1].stops().len(), 1);
    }

    #[test]
    fn short_direction_file_is_malformed() {
        let dir = dataset_dir();
        write(&dir, "line_200_0.csv", "5\n1AL2\nAAL1\n");

        let err = load(dir.path()).unwrap_err();
        assert!(matches!(err, DatasetError::Malformed { .. }));
        assert!(err.to_string().contains("declares 5 stops but lists 2"));
    }

    #[test]
    fn non_numeric_count_is_malformed() {
        let dir = dataset_dir();
        write(&dir, "line_200_0.csv", "three\n1AL2\n");

        let err = load(dir.path()).unwrap_err();
        assert!(matches!(err, DatasetError::Malformed { .. }));
        assert!(err.to_string().contains("line_200_0.csv"));
    }

    #[test]
    fn empty_direction_file_is_malformed() {
        let dir = dataset_dir();
        write(&dir, "line_1M_0.csv", "");

        assert!(matches!(
            load(dir.path()),
            Err(DatasetError::Malformed { .. })
        ));
    }

    #[test]
    fn invalid_stop_code_in_line_is_reported() {
        let dir = dataset_dir();
        write(&dir, "line_1M_0.csv", "2\nAAL1\nAB L1\n");

        let err = load(dir.path()).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidCode { .. }));
    }

    #[test]
    fn bad_latitude_is_a_csv_error() {
        let dir = dataset_dir();
        write(&dir, STOPS_FILE, "Code,Name,Zone,Latitude,Longitude\nX,X,Z,north,-8.6\n");

        let err = load(dir.path()).unwrap_err();
        assert!(matches!(err, DatasetError::Csv { .. }));
        assert!(err.to_string().contains(STOPS_FILE));
    }

    #[test]
    fn out_of_range_coordinate_is_malformed() {
        let dir = dataset_dir();
        write(&dir, STOPS_FILE, "Code,Name,Zone,Latitude,Longitude\nX,X,Z,91.0,-8.6\n");

        assert!(matches!(
            load(dir.path()),
            Err(DatasetError::Malformed { .. })
        ));
    }

    #[test]
    fn missing_stops_file_is_a_csv_error() {
        let dir = dataset_dir();
        std::fs::remove_file(dir.path().join(STOPS_FILE)).unwrap();

        assert!(matches!(load(dir.path()), Err(DatasetError::Csv { .. })));
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");

        assert!(matches!(load(&missing), Err(DatasetError::Io { .. })));
    }

    #[test]
    fn file_instead_of_directory_is_an_io_error() {
        let dir = dataset_dir();

        assert!(matches!(
            load(dir.path().join(STOPS_FILE)),
            Err(DatasetError::Io { .. })
        ));
    }

    #[test]
    fn line_file_names_follow_code_and_direction() {
        let code = LineCode::parse("1M").unwrap();
        assert_eq!(line_file_name(&code, 1), "line_1M_1.csv");
    }
}
