//! Writes a synthetic `oup_upso_processed.csv` for trying out the viewer.

use std::error::Error;

const MODULES: [&str; 14] = [
    "History",
    "Philosophy",
    "Religion",
    "Political Science",
    "Economics and Finance",
    "Literature",
    "Music",
    "Law",
    "Psychology",
    "Classical Studies",
    "Linguistics",
    "Sociology",
    "Biology",
    "Business and Management",
];

const PRESSES: [&str; 8] = [
    "Oxford University Press",
    "University Press of Kentucky",
    "Fordham University Press",
    "Edinburgh University Press",
    "Policy Press",
    "Manchester University Press",
    "University of Illinois Press",
    "Bristol University Press",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    /// Holding count skewed towards zero.
    fn holdings(&mut self, p_any: f64) -> u32 {
        if self.next_f64() < p_any {
            1 + self.below(3) as u32
        } else {
            0
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "oup_upso_processed.csv".to_string());

    let mut writer = csv::Writer::from_path(&output_path)?;
    writer.write_record([
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
    ])?;

    let n_titles = 2000;
    for i in 0..n_titles {
        let upload_year = 2011 + rng.below(13) as i32;
        let pubdate = upload_year - rng.below(15) as i32;
        let module = MODULES[rng.below(MODULES.len() as u64) as usize];
        let press = PRESSES[rng.below(PRESSES.len() as u64) as usize];

        // Older uploads are more likely to be held already.
        let p_any = 0.15 + 0.03 * (2023 - upload_year) as f64;
        let mut cols: Vec<String> = Vec::with_capacity(8);
        let mut flags: Vec<u8> = Vec::with_capacity(4);
        for _ in 0..4 {
            let print = rng.holdings(p_any);
            let online = rng.holdings(p_any * 0.6);
            cols.push(print.to_string());
            cols.push(online.to_string());
            flags.push(u8::from(print + online > 0));
        }
        let n_dup = flags.iter().filter(|&&f| f == 1).count();
        let trln_flag = u8::from(n_dup > 0);
        let trln_pct = n_dup as f64 / 4.0;

        let doi = format!("10.1093/oso/{:013}.001.0001", 9780190000000u64 + i);
        let mut row = vec![
            doi.clone(),
            format!("Sample title {i}"),
            "Doe, Jane; Roe, Richard".to_string(),
            module.to_string(),
            format!("{module} (general)"),
            press.to_string(),
            pubdate.to_string(),
            format!("{:010}", rng.below(10_000_000_000)),
            format!("978{:010}", rng.below(10_000_000_000)),
            "False".to_string(),
            "False".to_string(),
            format!("{upload_year}-{:02}-{:02}", 1 + rng.below(12), 1 + rng.below(28)),
            format!("https://doi.org/{doi}"),
        ];
        row.extend(cols);
        row.extend(flags.iter().map(|f| f.to_string()));
        row.push(trln_flag.to_string());
        row.push(format!("{trln_pct:?}"));
        writer.write_record(&row)?;
    }
    writer.flush()?;

    log::info!("Wrote {n_titles} titles to {output_path}");
    println!("Wrote {n_titles} titles to {output_path}");
    Ok(())
}
