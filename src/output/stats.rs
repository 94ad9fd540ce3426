//! Statistics over a finished catalogue

use crate::catalogue::CourseRecord;

/// How complete the enrichment of a catalogue turned out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogueStatistics {
    /// Number of records
    pub total_courses: usize,

    /// Records with an eligibility section
    pub with_eligibility: usize,

    /// Records with a fees section
    pub with_fees: usize,

    /// Records where neither section was found
    pub without_details: usize,
}

impl CatalogueStatistics {
    /// Counts field coverage over the records
    pub fn from_records(records: &[CourseRecord]) -> Self {
        let mut stats = Self {
            total_courses: records.len(),
            ..Self::default()
        };

        for record in records {
            let eligibility = record.eligibility.is_some();
            let fees = record.fees.is_some();
            stats.with_eligibility += usize::from(eligibility);
            stats.with_fees += usize::from(fees);
            stats.without_details += usize::from(!eligibility && !fees);
        }

        stats
    }

    fn percentage(&self, count: usize) -> f64 {
        if self.total_courses == 0 {
            return 0.0;
        }
        (count as f64 / self.total_courses as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CatalogueStatistics) {
    println!("=== Catalogue Statistics ===\n");
    println!("  Courses: {}", stats.total_courses);
    println!(
        "  With eligibility: {} ({:.1}%)",
        stats.with_eligibility,
        stats.percentage(stats.with_eligibility)
    );
    println!(
        "  With fees: {} ({:.1}%)",
        stats.with_fees,
        stats.percentage(stats.with_fees)
    );
    println!(
        "  Without details: {} ({:.1}%)",
        stats.without_details,
        stats.percentage(stats.without_details)
    );
}
