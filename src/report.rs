use std::sync::Arc;

use crate::data::aggregate::{
    self, FormatCounts, GroupCount, GroupKey, YearBucketCount, YearCount, YearFlagCounts,
};
use crate::data::export::{self, DisplayTable, DOWNLOAD_MIME};
use crate::data::filter::{filtered_indices, Filters};
use crate::data::model::TitleDataset;
use crate::error::ChartError;

// ---------------------------------------------------------------------------
// Catalog – the loaded dataset plus its precomputed download
// ---------------------------------------------------------------------------

/// A file offered for download.
#[derive(Debug, Clone)]
pub struct Download {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Arc<[u8]>,
}

/// Immutable base data shared by every render. Built once at startup.
#[derive(Debug)]
pub struct Catalog {
    dataset: TitleDataset,
    download: Download,
}

impl Catalog {
    pub fn new(dataset: TitleDataset, file_name: impl Into<String>) -> Result<Self, csv::Error> {
        let bytes = export::export_csv(&dataset)?;
        Ok(Catalog {
            dataset,
            download: Download {
                file_name: file_name.into(),
                mime: DOWNLOAD_MIME,
                bytes: bytes.into(),
            },
        })
    }

    pub fn dataset(&self) -> &TitleDataset {
        &self.dataset
    }

    pub fn download(&self) -> &Download {
        &self.download
    }
}

// ---------------------------------------------------------------------------
// Report – everything the page shows for one set of filters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub top_n: usize,
}

/// Summaries backing each chart panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Charts {
    pub year_by_flag: Vec<YearFlagCounts>,
    pub year_by_pct: Vec<YearBucketCount>,
    pub top_modules: Vec<GroupCount>,
    pub top_presses: Vec<GroupCount>,
    pub formats: FormatCounts,
    pub missing: Vec<YearCount>,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub filters: Filters,
    /// Number of titles passing the year filter.
    pub visible: usize,
    /// Chart data, or the message shown instead when the subset is too thin.
    pub charts: Result<Charts, ChartError>,
    pub table: DisplayTable,
    /// Full, unfiltered dataset regardless of `filters`.
    pub csv: Download,
}

/// Filter, aggregate and format for one set of user selections.
pub fn render(catalog: &Catalog, filters: &Filters, options: &ReportOptions) -> Report {
    let dataset = catalog.dataset();
    let rows = filtered_indices(dataset, filters.years);
    log::debug!(
        "Rendering {} for {}: {} of {} titles",
        filters.selection,
        filters.years,
        rows.len(),
        dataset.len()
    );

    let charts = build_charts(dataset, &rows, filters, options);
    if let Err(e) = &charts {
        log::warn!("{e}");
    }

    Report {
        filters: *filters,
        visible: rows.len(),
        charts,
        table: export::display_table(dataset, &rows),
        csv: catalog.download().clone(),
    }
}

fn build_charts(
    dataset: &TitleDataset,
    rows: &[usize],
    filters: &Filters,
    options: &ReportOptions,
) -> Result<Charts, ChartError> {
    let sel = filters.selection;
    let year_by_flag = aggregate::year_by_flag(dataset, rows, sel);

    // The grouped Yes/No chart needs both categories present.
    let (no, yes) = year_by_flag
        .iter()
        .fold((0, 0), |(n, y), r| (n + r.no, y + r.yes));
    if no == 0 || yes == 0 {
        return Err(ChartError::Degenerate {
            institution: sel.label(),
            lo: filters.years.lo,
            hi: filters.years.hi,
        });
    }

    Ok(Charts {
        year_by_pct: aggregate::year_by_pct(dataset, rows),
        top_modules: aggregate::top_by(dataset, rows, sel, GroupKey::Module, options.top_n),
        top_presses: aggregate::top_by(dataset, rows, sel, GroupKey::Press, options.top_n),
        formats: aggregate::format_counts(dataset, rows, sel),
        missing: aggregate::missing_holdings(dataset, rows, sel),
        year_by_flag,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::data::aggregate::FormatClass;
    use crate::data::filter::YearRange;
    use crate::data::fixtures::{dataset, TitleRow};
    use crate::data::model::{Institution, Selection};

    const OPTIONS: ReportOptions = ReportOptions { top_n: 10 };

    fn catalog(rows: &[TitleRow]) -> Catalog {
        Catalog::new(dataset(rows), "TRLN_OUP_duplication.csv").unwrap()
    }

    fn filters(lo: i32, hi: i32, selection: Selection) -> Filters {
        Filters {
            years: YearRange::new(lo, hi),
            selection,
        }
    }

    #[test]
    fn two_row_example() {
        let cat = catalog(&[TitleRow::year("old", 2014), TitleRow::year("new", 2016).dup(0.5)]);

        let report = render(&cat, &filters(2015, 2016, Selection::All), &OPTIONS);
        assert_eq!(report.visible, 1);
        assert_eq!(report.table.rows[0][0], "new");

        let report = render(&cat, &filters(2015, 2015, Selection::All), &OPTIONS);
        assert_eq!(report.visible, 0);
        assert!(report.table.is_empty());
        let message = report.charts.unwrap_err().to_string();
        assert!(message.contains("2015 to 2015"), "{message}");
        assert!(message.contains("TRLN"), "{message}");
    }

    #[test]
    fn inverted_range_falls_back_without_panicking() {
        let cat = catalog(&[TitleRow::year("a", 2016), TitleRow::year("b", 2016).dup(0.25)]);
        let report = render(&cat, &filters(2017, 2015, Selection::All), &OPTIONS);
        assert_eq!(report.visible, 0);
        assert_matches!(
            report.charts,
            Err(ChartError::Degenerate { lo: 2017, hi: 2015, .. })
        );
    }

    #[test]
    fn single_category_subset_names_institution() {
        let mut a = TitleRow::year("a", 2016);
        a.unc = (1, 0, 1);
        let cat = catalog(&[a, TitleRow::year("b", 2016).dup(0.25)]);

        let ok = render(&cat, &filters(2016, 2016, Selection::All), &OPTIONS);
        assert!(ok.charts.is_ok());

        let report = render(&cat, &filters(2016, 2016, Selection::One(Institution::Duke)), &OPTIONS);
        assert_matches!(
            report.charts,
            Err(ChartError::Degenerate { institution: "Duke", .. })
        );
        // The table is still produced.
        assert_eq!(report.table.len(), 2);
    }

    #[test]
    fn charts_follow_the_selected_institution() {
        let mut a = TitleRow::year("a", 2016).module("Law");
        a.nccu = (1, 2, 1);
        let b = TitleRow::year("b", 2017).module("Music").dup(0.25);
        let cat = catalog(&[a, b]);

        let charts = render(&cat, &filters(2016, 2017, Selection::One(Institution::Nccu)), &OPTIONS)
            .charts
            .unwrap();
        assert_eq!(charts.top_modules[0], GroupCount { key: "Law".into(), dups: 1 });
        assert_eq!(charts.formats.total(), 1);
        assert_eq!(charts.missing, vec![YearCount { year: 2017, count: 1 }]);
    }

    #[test]
    fn huge_holding_counts_are_summed_without_overflow() {
        let mut big = TitleRow::year("big", 2016).dup(0.75);
        big.duke = (2_000_000_000, 0, 1);
        big.nccu = (2_000_000_000, 0, 1);
        big.ncsu = (2_000_000_000, 0, 1);
        let cat = catalog(&[big, TitleRow::year("none", 2016)]);

        let charts = render(&cat, &filters(2016, 2016, Selection::All), &OPTIONS)
            .charts
            .unwrap();
        assert_eq!(charts.formats.counts[0], (FormatClass::Print, 1));
        assert_eq!(charts.formats.unclassified, 0);
        assert_eq!(charts.missing, vec![YearCount { year: 2016, count: 1 }]);
    }

    #[test]
    fn download_ignores_filters() {
        let cat = catalog(&[
            TitleRow::year("a", 2012),
            TitleRow::year("b", 2016).dup(0.25),
            TitleRow::year("c", 2019),
        ]);
        let report = render(&cat, &filters(2016, 2016, Selection::All), &OPTIONS);
        assert_eq!(report.csv.file_name, "TRLN_OUP_duplication.csv");
        assert_eq!(report.csv.mime, "text/csv");

        let mut reader = csv::Reader::from_reader(report.csv.bytes.as_ref());
        assert_eq!(reader.records().count(), 3);
        assert_eq!(reader.headers().unwrap().len(), cat.dataset().columns.len());
    }
}
