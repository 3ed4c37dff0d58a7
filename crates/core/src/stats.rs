//! Aggregate statistics over the file catalogue.

use crate::catalog::FileDescriptor;
use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileStats {
    pub total_files: usize,
    pub total_size: u64,
    /// Files per extension (empty string for none), sorted by extension.
    pub type_distribution: Vec<(String, usize)>,
    /// Files per UTC creation date, oldest first.
    pub upload_trend: Vec<(NaiveDate, usize)>,
}

/// Summarises a catalogue listing.
pub fn compute_stats(files: &[FileDescriptor]) -> FileStats {
    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();

    for file in files {
        *by_type.entry(file.file_type.to_lowercase()).or_default() += 1;
        *by_day.entry(file.created_at.date_naive()).or_default() += 1;
    }

    FileStats {
        total_files: files.len(),
        total_size: files.iter().map(|f| f.size).sum(),
        type_distribution: by_type.into_iter().collect(),
        upload_trend: by_day.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn file(name: &str, file_type: &str, size: u64, day: u32) -> FileDescriptor {
        FileDescriptor {
            id: name.into(),
            file_name: name.into(),
            original_name: name.into(),
            url: format!("/uploads/{}", name),
            size,
            file_type: file_type.into(),
            created_at: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_empty_catalogue() {
        assert_eq!(compute_stats(&[]), FileStats::default());
    }

    #[test]
    fn test_aggregates() {
        let files = vec![
            file("a.pdf", "pdf", 100, 2),
            file("b.PDF", "PDF", 50, 1),
            file("c.png", "png", 10, 2),
            file("README", "", 1, 2),
        ];

        let stats = compute_stats(&files);

        assert_eq!(stats.total_files, 4);
        assert_eq!(stats.total_size, 161);
        assert_eq!(
            stats.type_distribution,
            vec![("".into(), 1), ("pdf".into(), 2), ("png".into(), 1)]
        );
        assert_eq!(
            stats.upload_trend,
            vec![
                (NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 1),
                (NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(), 3),
            ]
        );
    }
}
