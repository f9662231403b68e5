use super::aggregate::pct_label;
use super::model::{Column, TitleDataset, TitleRecord};

pub const DOWNLOAD_MIME: &str = "text/csv";

/// Source column → header shown in the detail table.
const COLUMN_LABELS: [(&str, &str); 22] = [
    ("doi", "DOI"),
    ("title", "Title"),
    ("module", "Module"),
    ("press", "Press"),
    ("print_pubdate", "Print pub. year"),
    ("isbn", "ISBN"),
    ("eisbn", "eISBN"),
    ("upload_year", "Upload year"),
    ("print_duke", "Duke print"),
    ("online_duke", "Duke online"),
    ("print_nccu", "NCCU print"),
    ("online_nccu", "NCCU online"),
    ("print_ncsu", "NCSU print"),
    ("online_ncsu", "NCSU online"),
    ("print_unc", "UNC print"),
    ("online_unc", "UNC online"),
    ("duke_dup_flag", "Duke dup"),
    ("nccu_dup_flag", "NCCU dup"),
    ("ncsu_dup_flag", "NCSU dup"),
    ("unc_dup_flag", "UNC dup"),
    ("TRLN_dup_flag", "TRLN dup"),
    ("TRLN_dup_pct", "TRLN dup %"),
];

/// Human-readable header for a source column; unknown names pass through.
pub fn column_label(name: &str) -> &str {
    COLUMN_LABELS
        .iter()
        .find(|(raw, _)| *raw == name)
        .map(|(_, label)| *label)
        .unwrap_or(name)
}

// ---------------------------------------------------------------------------
// Display table
// ---------------------------------------------------------------------------

/// Filtered titles formatted for on-screen display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DisplayTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Format the given rows: flags as Yes/No, dup pct as a whole percentage,
/// headers relabelled.
pub fn display_table(dataset: &TitleDataset, rows: &[usize]) -> DisplayTable {
    DisplayTable {
        headers: dataset
            .columns
            .iter()
            .map(|c| column_label(dataset.column_name(c)).to_string())
            .collect(),
        rows: rows
            .iter()
            .map(|&i| {
                let rec = &dataset.records[i];
                dataset
                    .columns
                    .iter()
                    .map(|c| display_cell(rec, c))
                    .collect()
            })
            .collect(),
    }
}

fn yes_no(flag: bool) -> String {
    let label = if flag { "Yes" } else { "No" };
    label.to_string()
}

fn display_cell(rec: &TitleRecord, column: &Column) -> String {
    match column {
        Column::DupFlag(inst) => yes_no(rec.holdings.get(*inst).duplicate),
        Column::TrlnDupFlag => yes_no(rec.trln_dup_flag),
        Column::TrlnDupPct => format!("{}%", (rec.trln_dup_pct * 100.0).round() as i64),
        other => raw_cell(rec, other),
    }
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Unformatted cell text, as written to the download.
fn raw_cell(rec: &TitleRecord, column: &Column) -> String {
    let flag = |b: bool| u8::from(b).to_string();
    match column {
        Column::Doi => rec.doi.clone(),
        Column::Module => rec.module.clone(),
        Column::Press => rec.press.clone(),
        Column::PrintPubdate => rec.print_pubdate.to_string(),
        Column::Isbn => rec.isbn.clone(),
        Column::Eisbn => rec.eisbn.clone(),
        Column::Print(inst) => rec.holdings.get(*inst).print.to_string(),
        Column::Online(inst) => rec.holdings.get(*inst).online.to_string(),
        Column::DupFlag(inst) => flag(rec.holdings.get(*inst).duplicate),
        Column::TrlnDupFlag => flag(rec.trln_dup_flag),
        Column::TrlnDupPct => pct_label(rec.trln_dup_pct),
        Column::UploadYear => rec.upload_year.to_string(),
        Column::Extra(i) => rec.extra.get(*i).cloned().unwrap_or_default(),
    }
}

/// Serialize the whole dataset (every title, every retained column) as
/// UTF-8 CSV with a header row. Independent of any filter.
pub fn export_csv(dataset: &TitleDataset) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(dataset.columns.iter().map(|c| dataset.column_name(c)))?;
    for rec in &dataset.records {
        writer.write_record(dataset.columns.iter().map(|c| raw_cell(rec, c)))?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{dataset, TitleRow};

    fn sample() -> TitleDataset {
        let mut a = TitleRow::year("10.1/a", 2014).dup(0.25);
        a.duke = (1, 0, 1);
        a.title = "Commas, quotes \"and\" all".into();
        dataset(&[a, TitleRow::year("10.1/b", 2016)])
    }

    #[test]
    fn display_formats_flags_and_pct() {
        let ds = sample();
        let table = display_table(&ds, &[0]);
        let col = |label: &str| table.headers.iter().position(|h| h == label).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0][col("TRLN dup %")], "25%");
        assert_eq!(table.rows[0][col("TRLN dup")], "Yes");
        assert_eq!(table.rows[0][col("Duke dup")], "Yes");
        assert_eq!(table.rows[0][col("NCCU dup")], "No");
        assert_eq!(table.rows[0][col("Upload year")], "2014");
    }

    #[test]
    fn unknown_columns_keep_their_name() {
        assert_eq!(column_label("TRLN_dup_pct"), "TRLN dup %");
        assert_eq!(column_label("series"), "series");
    }

    #[test]
    fn display_only_includes_selected_rows() {
        let ds = sample();
        assert!(display_table(&ds, &[]).is_empty());
        assert_eq!(display_table(&ds, &[1]).rows[0][0], "10.1/b");
    }

    #[test]
    fn export_round_trips_row_count_and_columns() {
        let ds = sample();
        let bytes = export_csv(&ds).unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        let expected: Vec<&str> = ds.columns.iter().map(|c| ds.column_name(c)).collect();
        assert_eq!(headers, expected);

        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), ds.len());
        // The DOI stays in the download as its first column.
        assert_eq!(headers[0], "doi");
        assert_eq!(&rows[1][0], "10.1/b");
        let title = headers.iter().position(|h| h == "title").unwrap();
        assert_eq!(&rows[0][title], "Commas, quotes \"and\" all");
        let pct = headers.iter().position(|h| h == "TRLN_dup_pct").unwrap();
        assert_eq!(&rows[0][pct], "0.25");
        let flag = headers.iter().position(|h| h == "TRLN_dup_flag").unwrap();
        assert_eq!(&rows[1][flag], "0");
    }
}
