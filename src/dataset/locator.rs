use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::calendar::YearRange;
use crate::config::DatasetLayout;
use crate::error::{Result, SolarYieldError};

/// One monthly gridded file. Its month is implied by its position in the
/// sequence returned from [`DatasetLocator::retrieve`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridFile {
    pub path: PathBuf,
    pub year: i32,
}

/// Resolves years to dataset files. The directory is listed once, at
/// construction; later changes on disk are not seen.
#[derive(Clone, Debug)]
pub struct DatasetLocator {
    directory: PathBuf,
    layout: DatasetLayout,
    year_range: YearRange,
    file_names: Vec<String>,
}

impl DatasetLocator {
    pub fn scan<P: AsRef<Path>>(
        directory: P,
        layout: DatasetLayout,
        year_range: YearRange,
    ) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        let file_names = fs::read_dir(&directory)?
            .map(|entry| -> Result<String> {
                Ok(entry?.file_name().to_string_lossy().into_owned())
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(
            directory = %directory.display(),
            files = file_names.len(),
            "scanned dataset directory"
        );
        Ok(Self::from_file_names(directory, file_names, layout, year_range))
    }

    /// Build a locator over an already known listing, kept in the given order.
    pub fn from_file_names<P: Into<PathBuf>>(
        directory: P,
        file_names: Vec<String>,
        layout: DatasetLayout,
        year_range: YearRange,
    ) -> Self {
        DatasetLocator {
            directory: directory.into(),
            layout,
            year_range,
            file_names,
        }
    }

    pub fn year_range(&self) -> YearRange {
        self.year_range
    }

    pub fn layout(&self) -> &DatasetLayout {
        &self.layout
    }

    /// Files for the year, in directory-listing order. Callers relying on
    /// month positions must make sure that order is chronological.
    pub fn retrieve(&self, year: i32) -> Result<Vec<GridFile>> {
        if !self.year_range.contains(year) {
            return Err(SolarYieldError::InvalidYear(year));
        }
        let prefix = format!("{}{}", self.layout.file_prefix, year);
        let suffix = self.layout.suffix();
        let files: Vec<GridFile> = self
            .file_names
            .iter()
            .filter(|name| name.starts_with(&prefix) && name.ends_with(&suffix))
            .map(|name| GridFile {
                path: self.directory.join(name),
                year,
            })
            .collect();
        debug!(year, files = files.len(), "resolved dataset files");
        Ok(files)
    }

    /// Files for every year of the inclusive range.
    pub fn retrieve_all(&self, from: i32, to: i32) -> Result<Vec<Vec<GridFile>>> {
        if !self.year_range.contains(from) {
            return Err(SolarYieldError::InvalidYearRangeStart(from));
        }
        if !self.year_range.contains(to) {
            return Err(SolarYieldError::InvalidYearRangeEnd(to));
        }
        (from..=to).map(|year| self.retrieve(year)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use test_strategy::proptest;

    fn names() -> Vec<String> {
        [
            "SDLmm200302010000002311SVMSG01GL.nc",
            "SDLmm200301010000002311SVMSG01GL.nc",
            "SDLmm200401010000002311SVMSG01GL.nc",
            "SDLmm200303010000002311SVMSG01GL.nc.md5",
            "SIDmm200301010000002311SVMSG01GL.nc",
            "README.txt",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn locator() -> DatasetLocator {
        DatasetLocator::from_file_names(
            "/data/nc",
            names(),
            DatasetLayout::default(),
            YearRange::default(),
        )
    }

    #[test]
    fn filters_by_prefix_and_extension() {
        let files = locator().retrieve(2003).unwrap();

        assert_eq!(
            files,
            vec![
                GridFile {
                    path: PathBuf::from("/data/nc/SDLmm200302010000002311SVMSG01GL.nc"),
                    year: 2003
                },
                GridFile {
                    path: PathBuf::from("/data/nc/SDLmm200301010000002311SVMSG01GL.nc"),
                    year: 2003
                },
            ]
        );
    }

    #[test]
    fn no_files_is_not_an_error() {
        assert!(locator().retrieve(1990).unwrap().is_empty());
    }

    #[proptest]
    fn rejects_years_outside_range(
        #[strategy(-3000i32..1979)] before: i32,
        #[strategy(2025i32..5000)] after: i32,
    ) {
        let locator = locator();
        assert_matches!(locator.retrieve(before), Err(SolarYieldError::InvalidYear(y)) if y == before);
        assert_matches!(locator.retrieve(after), Err(SolarYieldError::InvalidYear(y)) if y == after);
    }

    #[test]
    fn retrieve_all_by_year() {
        let all = locator().retrieve_all(2003, 2005).unwrap();

        assert_eq!(all.len(), 3);
        assert_eq!(all[0].len(), 2);
        assert_eq!(all[1].len(), 1);
        assert!(all[2].is_empty());
    }

    #[test]
    fn retrieve_all_validates_both_ends() {
        assert_matches!(
            locator().retrieve_all(1970, 2003),
            Err(SolarYieldError::InvalidYearRangeStart(1970))
        );
        assert_matches!(
            locator().retrieve_all(2003, 2030),
            Err(SolarYieldError::InvalidYearRangeEnd(2030))
        );
    }

    #[test]
    fn scan_directory() {
        let dir = tempfile::tempdir().unwrap();
        for name in names() {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let locator =
            DatasetLocator::scan(dir.path(), DatasetLayout::default(), YearRange::default())
                .unwrap();
        let mut files = locator.retrieve(2003).unwrap();
        files.sort_by(|a, b| a.path.cmp(&b.path));

        assert_eq!(files.len(), 2);
        assert_eq!(
            files[0].path,
            dir.path().join("SDLmm200301010000002311SVMSG01GL.nc")
        );
    }

    #[test]
    fn scan_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        assert_matches!(
            DatasetLocator::scan(missing, DatasetLayout::default(), YearRange::default()),
            Err(SolarYieldError::Io(_))
        );
    }

    #[test]
    fn configurable_upper_bound() {
        let locator = DatasetLocator::from_file_names(
            "/data",
            names(),
            DatasetLayout::default(),
            YearRange::new(1979, 2030),
        );
        assert!(locator.retrieve(2030).is_ok());
    }
}
