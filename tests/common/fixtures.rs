//! CSV fixtures and helpers for writing them to disk

use std::path::Path;

/// Three Simpsons: ages 39, 39 and 8
pub const SIMPSONS_CSV: &str =
    "name,surname,age\nHomer,Simpson,39\nMarge,Simpson,39\nLisa,Simpson,8\n";

/// Header line used by generated fixtures
pub const HEADER: &str = "first_name,last_name,age";

/// Write `contents` to `dir/name` and return the path as a String
pub fn write_csv(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("failed to write fixture");
    path.to_str().expect("fixture path is not UTF-8").to_string()
}

/// CSV with `valid` well-formed rows (ages 20, 21, ...) followed by
/// `malformed` broken rows of three different shapes.
pub fn generate_csv(valid: usize, malformed: usize) -> String {
    let mut csv = String::from(HEADER);
    csv.push('\n');
    for i in 0..valid {
        csv.push_str(&format!("First{i}, Last{i} , {}\n", 20 + i));
    }
    for i in 0..malformed {
        match i % 3 {
            0 => csv.push_str(&format!("Broken{i},NoAge\n")),
            1 => csv.push_str(&format!("Broken{i},Last,not-a-number\n")),
            _ => csv.push_str(&format!("Broken{i},Middle,Last,30\n")),
        }
    }
    csv
}
