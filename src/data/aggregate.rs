use std::collections::BTreeMap;
use std::fmt;

use super::model::{Selection, TitleDataset, TitleRecord};

// ---------------------------------------------------------------------------
// Summary row types
// ---------------------------------------------------------------------------

/// Crosstab row: titles uploaded in `year`, split by the duplicate flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearFlagCounts {
    pub year: i32,
    pub no: usize,
    pub yes: usize,
}

/// Titles uploaded in `year` sharing one duplicate-percentage value.
#[derive(Debug, Clone, PartialEq)]
pub struct YearBucketCount {
    pub year: i32,
    pub pct: f64,
    /// The pct rendered as a categorical label, e.g. `0.5`.
    pub bucket: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub key: String,
    pub dups: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// Which descriptive field a top-N list groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Module,
    Press,
}

impl GroupKey {
    fn of(self, rec: &TitleRecord) -> &str {
        match self {
            GroupKey::Module => &rec.module,
            GroupKey::Press => &rec.press,
        }
    }
}

// ---------------------------------------------------------------------------
// Year × duplicate flag
// ---------------------------------------------------------------------------

/// Count titles per (year, flag), zero-filled, sorted by year.
pub fn year_by_flag(dataset: &TitleDataset, rows: &[usize], sel: Selection) -> Vec<YearFlagCounts> {
    let mut by_year: BTreeMap<i32, (usize, usize)> = BTreeMap::new();
    for &i in rows {
        let rec = &dataset.records[i];
        let entry = by_year.entry(rec.upload_year).or_default();
        if rec.is_duplicate(sel) {
            entry.1 += 1;
        } else {
            entry.0 += 1;
        }
    }
    by_year
        .into_iter()
        .map(|(year, (no, yes))| YearFlagCounts { year, no, yes })
        .collect()
}

// ---------------------------------------------------------------------------
// Year × duplicate-percentage bucket
// ---------------------------------------------------------------------------

/// Count titles per distinct (year, consortium dup pct) pair.
///
/// Percentages are categorical: `0.25` and `0.5` are separate buckets, nothing
/// is binned.
pub fn year_by_pct(dataset: &TitleDataset, rows: &[usize]) -> Vec<YearBucketCount> {
    let mut pairs: Vec<(i32, f64)> = rows
        .iter()
        .map(|&i| {
            let rec = &dataset.records[i];
            (rec.upload_year, rec.trln_dup_pct)
        })
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));

    pairs
        .chunk_by(|a, b| a == b)
        .map(|chunk| {
            let (year, pct) = chunk[0];
            YearBucketCount {
                year,
                pct,
                bucket: pct_label(pct),
                count: chunk.len(),
            }
        })
        .collect()
}

/// Render a percentage the way it appears in the source file (`1.0`, `0.25`).
pub fn pct_label(pct: f64) -> String {
    format!("{pct:?}")
}

// ---------------------------------------------------------------------------
// Top-N by module / press
// ---------------------------------------------------------------------------

/// Sum the active duplicate flag per group and keep the `n` largest.
///
/// Blank keys are not a group and are skipped. Groups are visited in
/// ascending key order and sorted stably, so equal counts keep alphabetical
/// order.
pub fn top_by(
    dataset: &TitleDataset,
    rows: &[usize],
    sel: Selection,
    key: GroupKey,
    n: usize,
) -> Vec<GroupCount> {
    let mut groups: BTreeMap<&str, usize> = BTreeMap::new();
    for &i in rows {
        let rec = &dataset.records[i];
        let group = key.of(rec);
        if group.trim().is_empty() {
            continue;
        }
        *groups.entry(group).or_default() += usize::from(rec.is_duplicate(sel));
    }

    let mut ranked: Vec<GroupCount> = groups
        .into_iter()
        .map(|(key, dups)| GroupCount {
            key: key.to_string(),
            dups,
        })
        .collect();
    ranked.sort_by(|a, b| b.dups.cmp(&a.dups));
    ranked.truncate(n);
    ranked
}

// ---------------------------------------------------------------------------
// Format classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormatClass {
    Print,
    Ebook,
    PrintAndEbook,
}

impl FormatClass {
    pub const ALL: [FormatClass; 3] = [
        FormatClass::Print,
        FormatClass::Ebook,
        FormatClass::PrintAndEbook,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormatClass::Print => "Print",
            FormatClass::Ebook => "Ebook",
            FormatClass::PrintAndEbook => "Print + Ebook",
        }
    }
}

impl fmt::Display for FormatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a duplicated title by its print and online holding counts.
///
/// The consortium and single-institution rules use different thresholds.
/// Both are kept exactly as the collection managers defined them.
pub fn classify(sel: Selection, print: u64, online: u64) -> Option<FormatClass> {
    match sel {
        Selection::All => {
            if print > 0 && online > 1 {
                Some(FormatClass::PrintAndEbook)
            } else if print >= 1 && online <= 4 {
                Some(FormatClass::Print)
            } else if print == 0 && online >= 4 {
                Some(FormatClass::Ebook)
            } else {
                None
            }
        }
        Selection::One(_) => {
            if online > 1 && print > 0 {
                Some(FormatClass::PrintAndEbook)
            } else if online == 1 && print > 0 {
                Some(FormatClass::Print)
            } else if online > 1 && print == 0 {
                Some(FormatClass::Ebook)
            } else {
                None
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormatCounts {
    /// One entry per [`FormatClass`], in [`FormatClass::ALL`] order.
    pub counts: Vec<(FormatClass, usize)>,
    /// Duplicated titles matching no rule.
    pub unclassified: usize,
}

impl FormatCounts {
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum::<usize>() + self.unclassified
    }
}

/// Classify every title flagged as a duplicate under `sel`.
pub fn format_counts(dataset: &TitleDataset, rows: &[usize], sel: Selection) -> FormatCounts {
    let mut tally: BTreeMap<FormatClass, usize> = BTreeMap::new();
    let mut unclassified = 0;
    for &i in rows {
        let rec = &dataset.records[i];
        if !rec.is_duplicate(sel) {
            continue;
        }
        match classify(sel, rec.print_total(sel), rec.online_total(sel)) {
            Some(class) => *tally.entry(class).or_default() += 1,
            None => unclassified += 1,
        }
    }
    FormatCounts {
        counts: FormatClass::ALL
            .iter()
            .map(|&c| (c, tally.get(&c).copied().unwrap_or(0)))
            .collect(),
        unclassified,
    }
}

// ---------------------------------------------------------------------------
// Missing holdings
// ---------------------------------------------------------------------------

/// Per year, titles with neither print nor online holdings under `sel`.
pub fn missing_holdings(dataset: &TitleDataset, rows: &[usize], sel: Selection) -> Vec<YearCount> {
    let mut by_year: BTreeMap<i32, usize> = BTreeMap::new();
    for &i in rows {
        let rec = &dataset.records[i];
        if rec.print_total(sel) == 0 && rec.online_total(sel) == 0 {
            *by_year.entry(rec.upload_year).or_default() += 1;
        }
    }
    by_year
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{dataset, TitleRow};
    use crate::data::model::Institution;

    fn all_rows(ds: &TitleDataset) -> Vec<usize> {
        (0..ds.len()).collect()
    }

    #[test]
    fn crosstab_sums_to_row_count() {
        let ds = dataset(&[
            TitleRow::year("a", 2015).dup(0.25),
            TitleRow::year("b", 2015),
            TitleRow::year("c", 2016).dup(0.5),
            TitleRow::year("d", 2016).dup(1.0),
            TitleRow::year("e", 2017),
        ]);
        let rows = all_rows(&ds);
        let table = year_by_flag(&ds, &rows, Selection::All);

        assert_eq!(
            table,
            vec![
                YearFlagCounts { year: 2015, no: 1, yes: 1 },
                YearFlagCounts { year: 2016, no: 0, yes: 2 },
                YearFlagCounts { year: 2017, no: 1, yes: 0 },
            ]
        );
        let total: usize = table.iter().map(|r| r.no + r.yes).sum();
        assert_eq!(total, rows.len());
    }

    #[test]
    fn crosstab_reads_institution_flag() {
        let mut row = TitleRow::year("a", 2015);
        row.ncsu = (1, 0, 1);
        let ds = dataset(&[row, TitleRow::year("b", 2015).dup(0.25)]);
        let table = year_by_flag(&ds, &all_rows(&ds), Selection::One(Institution::Ncsu));
        assert_eq!(table, vec![YearFlagCounts { year: 2015, no: 1, yes: 1 }]);
    }

    #[test]
    fn pct_buckets_are_categorical() {
        let ds = dataset(&[
            TitleRow::year("a", 2016).dup(0.5),
            TitleRow::year("b", 2016).dup(0.5),
            TitleRow::year("c", 2016).dup(0.25),
            TitleRow::year("d", 2015),
            TitleRow::year("e", 2016).dup(1.0),
        ]);
        let buckets = year_by_pct(&ds, &all_rows(&ds));
        let got: Vec<(i32, &str, usize)> = buckets
            .iter()
            .map(|b| (b.year, b.bucket.as_str(), b.count))
            .collect();
        assert_eq!(
            got,
            vec![
                (2015, "0.0", 1),
                (2016, "0.25", 1),
                (2016, "0.5", 2),
                (2016, "1.0", 1),
            ]
        );
    }

    #[test]
    fn top_n_sorted_descending_and_capped() {
        let mut rows = Vec::new();
        for m in 0..12 {
            for k in 0..=m {
                rows.push(TitleRow::year(&format!("{m}-{k}"), 2016).module(&format!("M{m:02}")).dup(0.25));
            }
        }
        let ds = dataset(&rows);
        let top = top_by(&ds, &all_rows(&ds), Selection::All, GroupKey::Module, 10);

        assert_eq!(top.len(), 10);
        assert_eq!(top[0], GroupCount { key: "M11".into(), dups: 12 });
        assert!(top.windows(2).all(|w| w[0].dups >= w[1].dups));
    }

    #[test]
    fn top_n_returns_all_groups_when_few_and_breaks_ties_by_name() {
        let ds = dataset(&[
            TitleRow::year("a", 2016).press("Zeta").dup(0.25),
            TitleRow::year("b", 2016).press("Alpha").dup(0.25),
            TitleRow::year("c", 2016).press("Mid"),
        ]);
        let top = top_by(&ds, &all_rows(&ds), Selection::All, GroupKey::Press, 10);
        let keys: Vec<(&str, usize)> = top.iter().map(|g| (g.key.as_str(), g.dups)).collect();
        assert_eq!(keys, vec![("Alpha", 1), ("Zeta", 1), ("Mid", 0)]);
    }

    #[test]
    fn top_n_skips_blank_keys() {
        let ds = dataset(&[
            TitleRow::year("a", 2016).module("").dup(0.25),
            TitleRow::year("b", 2016).module("  ").dup(0.5),
            TitleRow::year("c", 2016).module("Law"),
        ]);
        let top = top_by(&ds, &all_rows(&ds), Selection::All, GroupKey::Module, 10);
        assert_eq!(top, vec![GroupCount { key: "Law".into(), dups: 0 }]);
    }

    #[test]
    fn consortium_classification_boundaries() {
        assert_eq!(classify(Selection::All, 1, 1), Some(FormatClass::Print));
        assert_eq!(classify(Selection::All, 0, 4), Some(FormatClass::Ebook));
        assert_eq!(classify(Selection::All, 1, 2), Some(FormatClass::PrintAndEbook));
        assert_eq!(classify(Selection::All, 3, 0), Some(FormatClass::Print));
        assert_eq!(classify(Selection::All, 0, 3), None);
        assert_eq!(classify(Selection::All, 0, 0), None);
        assert_eq!(classify(Selection::All, 6_000_000_000, 0), Some(FormatClass::Print));
    }

    #[test]
    fn institution_classification_boundaries() {
        let sel = Selection::One(Institution::Duke);
        assert_eq!(classify(sel, 1, 1), Some(FormatClass::Print));
        assert_eq!(classify(sel, 1, 2), Some(FormatClass::PrintAndEbook));
        assert_eq!(classify(sel, 0, 2), Some(FormatClass::Ebook));
        assert_eq!(classify(sel, 2, 0), None);
        assert_eq!(classify(sel, 0, 1), None);
    }

    #[test]
    fn format_counts_only_consider_duplicates() {
        let mut print_only = TitleRow::year("a", 2016).dup(0.25);
        print_only.duke = (1, 1, 1);
        let mut both = TitleRow::year("b", 2016).dup(0.5);
        both.duke = (1, 1, 1);
        both.unc = (2, 1, 1);
        let mut nothing = TitleRow::year("c", 2016).dup(0.25);
        nothing.nccu = (0, 1, 1);
        let mut not_dup = TitleRow::year("d", 2016);
        not_dup.duke = (5, 5, 0);
        let ds = dataset(&[print_only, both, nothing, not_dup]);

        let counts = format_counts(&ds, &all_rows(&ds), Selection::All);
        assert_eq!(
            counts.counts,
            vec![
                (FormatClass::Print, 1),
                (FormatClass::Ebook, 0),
                (FormatClass::PrintAndEbook, 1),
            ]
        );
        assert_eq!(counts.unclassified, 1);
        assert_eq!(counts.total(), 3);

        let duke = format_counts(&ds, &all_rows(&ds), Selection::One(Institution::Duke));
        assert_eq!(duke.counts[0], (FormatClass::Print, 2));
        assert_eq!(duke.total(), 2);
    }

    #[test]
    fn missing_holdings_per_year() {
        let mut held = TitleRow::year("a", 2016);
        held.unc = (0, 1, 1);
        let ds = dataset(&[
            held,
            TitleRow::year("b", 2016),
            TitleRow::year("c", 2016),
            TitleRow::year("d", 2018),
        ]);
        let rows = all_rows(&ds);
        assert_eq!(
            missing_holdings(&ds, &rows, Selection::All),
            vec![YearCount { year: 2016, count: 2 }, YearCount { year: 2018, count: 1 }]
        );
        assert_eq!(
            missing_holdings(&ds, &rows, Selection::One(Institution::Unc)),
            vec![YearCount { year: 2016, count: 2 }, YearCount { year: 2018, count: 1 }]
        );
        assert_eq!(
            missing_holdings(&ds, &rows, Selection::One(Institution::Duke)),
            vec![YearCount { year: 2016, count: 3 }, YearCount { year: 2018, count: 1 }]
        );
    }

    #[test]
    fn empty_subset_yields_empty_summaries() {
        let ds = dataset(&[TitleRow::year("a", 2016).dup(0.25)]);
        assert!(year_by_flag(&ds, &[], Selection::All).is_empty());
        assert!(year_by_pct(&ds, &[]).is_empty());
        assert!(top_by(&ds, &[], Selection::All, GroupKey::Module, 10).is_empty());
        assert_eq!(format_counts(&ds, &[], Selection::All).total(), 0);
        assert!(missing_holdings(&ds, &[], Selection::All).is_empty());
    }
}
