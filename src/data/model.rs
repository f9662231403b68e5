use std::fmt;

// ---------------------------------------------------------------------------
// Institution – a TRLN member library
// ---------------------------------------------------------------------------

/// One of the four TRLN member institutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Institution {
    Duke,
    Nccu,
    Ncsu,
    Unc,
}

impl Institution {
    pub const ALL: [Institution; 4] = [
        Institution::Duke,
        Institution::Nccu,
        Institution::Ncsu,
        Institution::Unc,
    ];

    /// Human-readable name used in labels and messages.
    pub fn label(self) -> &'static str {
        match self {
            Institution::Duke => "Duke",
            Institution::Nccu => "NCCU",
            Institution::Ncsu => "NCSU",
            Institution::Unc => "UNC",
        }
    }

    pub fn print_column(self) -> &'static str {
        match self {
            Institution::Duke => "print_duke",
            Institution::Nccu => "print_nccu",
            Institution::Ncsu => "print_ncsu",
            Institution::Unc => "print_unc",
        }
    }

    pub fn online_column(self) -> &'static str {
        match self {
            Institution::Duke => "online_duke",
            Institution::Nccu => "online_nccu",
            Institution::Ncsu => "online_ncsu",
            Institution::Unc => "online_unc",
        }
    }

    pub fn dup_flag_column(self) -> &'static str {
        match self {
            Institution::Duke => "duke_dup_flag",
            Institution::Nccu => "nccu_dup_flag",
            Institution::Ncsu => "ncsu_dup_flag",
            Institution::Unc => "unc_dup_flag",
        }
    }
}

impl fmt::Display for Institution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Selection – consortium-wide or a single institution
// ---------------------------------------------------------------------------

/// Which duplicate flag and holdings the aggregators read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// Consortium-wide (TRLN) view.
    #[default]
    All,
    One(Institution),
}

impl Selection {
    /// Dropdown options, in display order.
    pub const ALL_CHOICES: [Selection; 5] = [
        Selection::All,
        Selection::One(Institution::Duke),
        Selection::One(Institution::Nccu),
        Selection::One(Institution::Ncsu),
        Selection::One(Institution::Unc),
    ];

    pub fn label(self) -> &'static str {
        match self {
            Selection::All => "TRLN",
            Selection::One(inst) => inst.label(),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Holdings
// ---------------------------------------------------------------------------

/// Print/online holding counts and the duplicate flag at one institution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Holding {
    pub print: u32,
    pub online: u32,
    pub duplicate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Holdings {
    pub duke: Holding,
    pub nccu: Holding,
    pub ncsu: Holding,
    pub unc: Holding,
}

impl Holdings {
    pub fn get(&self, inst: Institution) -> &Holding {
        match inst {
            Institution::Duke => &self.duke,
            Institution::Nccu => &self.nccu,
            Institution::Ncsu => &self.ncsu,
            Institution::Unc => &self.unc,
        }
    }

    pub fn get_mut(&mut self, inst: Institution) -> &mut Holding {
        match inst {
            Institution::Duke => &mut self.duke,
            Institution::Nccu => &mut self.nccu,
            Institution::Ncsu => &mut self.ncsu,
            Institution::Unc => &mut self.unc,
        }
    }

    /// Summed in `u64`; four `u32` counts cannot overflow it.
    pub fn print_total(&self) -> u64 {
        Institution::ALL.iter().map(|&i| u64::from(self.get(i).print)).sum()
    }

    pub fn online_total(&self) -> u64 {
        Institution::ALL.iter().map(|&i| u64::from(self.get(i).online)).sum()
    }
}

// ---------------------------------------------------------------------------
// TitleRecord – one row of the processed CSV
// ---------------------------------------------------------------------------

/// A single title (one row of the source CSV, keyed by DOI).
#[derive(Debug, Clone, PartialEq)]
pub struct TitleRecord {
    pub doi: String,
    pub module: String,
    pub press: String,
    pub print_pubdate: i32,
    pub isbn: String,
    pub eisbn: String,
    /// Calendar year of the platform upload date.
    pub upload_year: i32,
    pub holdings: Holdings,
    pub trln_dup_flag: bool,
    /// Fraction of member institutions holding a duplicate, in `[0, 1]`.
    pub trln_dup_pct: f64,
    /// Values of retained columns without a typed field, in
    /// [`TitleDataset::extra_columns`] order.
    pub extra: Vec<String>,
}

impl TitleRecord {
    pub fn is_duplicate(&self, sel: Selection) -> bool {
        match sel {
            Selection::All => self.trln_dup_flag,
            Selection::One(inst) => self.holdings.get(inst).duplicate,
        }
    }

    pub fn print_total(&self, sel: Selection) -> u64 {
        match sel {
            Selection::All => self.holdings.print_total(),
            Selection::One(inst) => u64::from(self.holdings.get(inst).print),
        }
    }

    pub fn online_total(&self, sel: Selection) -> u64 {
        match sel {
            Selection::All => self.holdings.online_total(),
            Selection::One(inst) => u64::from(self.holdings.get(inst).online),
        }
    }
}

// ---------------------------------------------------------------------------
// Column – a retained column of the loaded table
// ---------------------------------------------------------------------------

/// A column of the loaded table, in the order it is displayed and exported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Doi,
    Module,
    Press,
    PrintPubdate,
    Isbn,
    Eisbn,
    Print(Institution),
    Online(Institution),
    DupFlag(Institution),
    TrlnDupFlag,
    TrlnDupPct,
    UploadYear,
    /// Pass-through column, index into [`TitleRecord::extra`].
    Extra(usize),
}

// ---------------------------------------------------------------------------
// TitleDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset. Never mutated after loading.
#[derive(Debug, Clone)]
pub struct TitleDataset {
    pub records: Vec<TitleRecord>,
    /// Retained columns in source order, `upload_year` last.
    pub columns: Vec<Column>,
    /// Header names of pass-through columns.
    pub extra_columns: Vec<String>,
    pub min_year: i32,
    pub max_year: i32,
}

impl TitleDataset {
    /// Build the dataset and its year bounds. Returns `None` when empty.
    pub fn new(
        records: Vec<TitleRecord>,
        columns: Vec<Column>,
        extra_columns: Vec<String>,
    ) -> Option<Self> {
        let min_year = records.iter().map(|r| r.upload_year).min()?;
        let max_year = records.iter().map(|r| r.upload_year).max()?;
        Some(TitleDataset {
            records,
            columns,
            extra_columns,
            min_year,
            max_year,
        })
    }

    /// Number of titles.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a loaded dataset; [`TitleDataset::new`] rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Source header name of a retained column.
    pub fn column_name<'a>(&'a self, column: &Column) -> &'a str {
        match column {
            Column::Doi => "doi",
            Column::Module => "module",
            Column::Press => "press",
            Column::PrintPubdate => "print_pubdate",
            Column::Isbn => "isbn",
            Column::Eisbn => "eisbn",
            Column::Print(inst) => inst.print_column(),
            Column::Online(inst) => inst.online_column(),
            Column::DupFlag(inst) => inst.dup_flag_column(),
            Column::TrlnDupFlag => "TRLN_dup_flag",
            Column::TrlnDupPct => "TRLN_dup_pct",
            Column::UploadYear => "upload_year",
            Column::Extra(i) => self.extra_columns.get(*i).map(String::as_str).unwrap_or(""),
        }
    }
}
