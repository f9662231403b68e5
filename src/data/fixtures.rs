//! Builders for small in-memory title CSVs used across the test modules.

use super::loader::read_csv;
use super::model::TitleDataset;

const HEADER: [&str; 27] = [
    "doi",
    "title",
    "authors",
    "module",
    "sub_discipline",
    "press",
    "print_pubdate",
    "isbn",
    "eisbn",
    "oa",
    "discontinued",
    "upload_date",
    "link",
    "print_duke",
    "online_duke",
    "print_nccu",
    "online_nccu",
    "print_ncsu",
    "online_ncsu",
    "print_unc",
    "online_unc",
    "duke_dup_flag",
    "nccu_dup_flag",
    "ncsu_dup_flag",
    "unc_dup_flag",
    "TRLN_dup_flag",
    "TRLN_dup_pct",
];

pub fn header() -> String {
    HEADER.join(",")
}

/// One CSV row. Holdings are `(print, online, dup_flag)`.
#[derive(Debug, Clone)]
pub struct TitleRow {
    pub doi: String,
    pub title: String,
    pub module: String,
    pub press: String,
    pub isbn: String,
    pub upload_date: String,
    pub duke: (u32, u32, u8),
    pub nccu: (u32, u32, u8),
    pub ncsu: (u32, u32, u8),
    pub unc: (u32, u32, u8),
    pub trln_flag: u8,
    pub trln_pct: f64,
}

impl TitleRow {
    pub fn new(doi: &str, upload_date: &str) -> Self {
        TitleRow {
            doi: doi.to_string(),
            title: format!("Title {doi}"),
            module: "History".to_string(),
            press: "Oxford University Press".to_string(),
            isbn: "9780190000000".to_string(),
            upload_date: upload_date.to_string(),
            duke: (0, 0, 0),
            nccu: (0, 0, 0),
            ncsu: (0, 0, 0),
            unc: (0, 0, 0),
            trln_flag: 0,
            trln_pct: 0.0,
        }
    }

    pub fn year(doi: &str, year: i32) -> Self {
        Self::new(doi, &format!("{year}-06-15"))
    }

    pub fn module(mut self, module: &str) -> Self {
        self.module = module.to_string();
        self
    }

    pub fn press(mut self, press: &str) -> Self {
        self.press = press.to_string();
        self
    }

    /// Mark as a consortium duplicate with the given pct.
    pub fn dup(mut self, pct: f64) -> Self {
        self.trln_flag = 1;
        self.trln_pct = pct;
        self
    }

    fn fields(&self) -> Vec<String> {
        let mut out = vec![
            self.doi.clone(),
            self.title.clone(),
            "Doe, J.".to_string(),
            self.module.clone(),
            "General".to_string(),
            self.press.clone(),
            "2010".to_string(),
            self.isbn.clone(),
            "9780190000001".to_string(),
            "False".to_string(),
            "False".to_string(),
            self.upload_date.clone(),
            format!("https://example.org/{}", self.doi),
        ];
        for (p, o, _) in [self.duke, self.nccu, self.ncsu, self.unc] {
            out.push(p.to_string());
            out.push(o.to_string());
        }
        for (_, _, f) in [self.duke, self.nccu, self.ncsu, self.unc] {
            out.push(f.to_string());
        }
        out.push(self.trln_flag.to_string());
        out.push(format!("{:?}", self.trln_pct));
        out
    }
}

pub fn csv_text(rows: &[TitleRow]) -> String {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER).unwrap();
    for row in rows {
        writer.write_record(row.fields()).unwrap();
    }
    String::from_utf8(writer.into_inner().unwrap()).unwrap()
}

pub fn dataset(rows: &[TitleRow]) -> TitleDataset {
    read_csv(csv_text(rows).as_bytes()).unwrap()
}
