use crate::models::sample::Sample;
use crate::util::human::{fmt_bytes, fmt_diff};

const TOTAL_LABEL: &str = "total";
const REMOVED: &str = "(removed)";
const HEADERS: [&str; 4] = ["Mountpoint", "Oldest", "Current", "Difference"];

/// One line of the comparison table, already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub mount:   String,
    pub oldest:  String,
    pub current: String,
    pub diff:    String,
}

impl Row {
    fn cells(&self) -> [&str; 4] {
        [self.mount.as_str(), self.oldest.as_str(), self.current.as_str(), self.diff.as_str()]
    }
}

/// Current sample only: one line per mount plus a total line.
pub fn render_current(sample: &Sample) -> String {
    let width = sample.mounts.keys()
        .map(|m| m.len())
        .chain(std::iter::once(TOTAL_LABEL.len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (mount, bytes) in &sample.mounts {
        out.push_str(&format!("{:<width$}  {}\n", mount, fmt_bytes(*bytes)));
    }
    out.push_str(&format!("{:<width$}  {}\n", TOTAL_LABEL, fmt_bytes(sample.total)));
    out
}

/// Rows comparing `oldest` against `current`: mounts still present, then
/// mounts that disappeared, then the total.
pub fn comparison_rows(oldest: &Sample, current: &Sample) -> Vec<Row> {
    let mut rows = Vec::new();

    for (mount, &cur) in &current.mounts {
        let old = oldest.mounts.get(mount).copied().unwrap_or(0);
        rows.push(Row {
            mount:   mount.clone(),
            oldest:  fmt_bytes(old),
            current: fmt_bytes(cur),
            diff:    fmt_diff(cur.saturating_sub(old)),
        });
    }

    for (mount, &old) in &oldest.mounts {
        if current.mounts.contains_key(mount) { continue; }
        rows.push(Row {
            mount:   mount.clone(),
            oldest:  fmt_bytes(old),
            current: REMOVED.to_string(),
            diff:    fmt_diff(old.saturating_neg()),
        });
    }

    rows.push(Row {
        mount:   TOTAL_LABEL.to_string(),
        oldest:  fmt_bytes(oldest.total),
        current: fmt_bytes(current.total),
        diff:    fmt_diff(current.total.saturating_sub(oldest.total)),
    });
    rows
}

/// Four-column table: header, dashed rule, one line per row.
pub fn render_comparison(oldest: &Sample, current: &Sample) -> String {
    let rows = comparison_rows(oldest, current);

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.cells()) {
            *w = (*w).max(cell.len());
        }
    }

    let dashes = widths.map(|w| "-".repeat(w));
    let mut out = String::new();
    push_line(&mut out, &widths, HEADERS);
    push_line(&mut out, &widths, [dashes[0].as_str(), dashes[1].as_str(), dashes[2].as_str(), dashes[3].as_str()]);
    for row in &rows {
        push_line(&mut out, &widths, row.cells());
    }
    out
}

fn push_line(out: &mut String, w: &[usize; 4], cells: [&str; 4]) {
    out.push_str(&format!(
        "{:<w0$}  {:>w1$}  {:>w2$}  {:>w3$}\n",
        cells[0], cells[1], cells[2], cells[3],
        w0 = w[0], w1 = w[1], w2 = w[2], w3 = w[3],
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    const GIB: i64 = 1_073_741_824;

    fn sample(pairs: &[(&str, i64)]) -> Sample {
        Sample::new(0, pairs.iter().map(|(m, b)| (m.to_string(), *b)).collect::<BTreeMap<_, _>>())
    }

    fn row(m: &str, o: &str, c: &str, d: &str) -> Row {
        Row { mount: m.into(), oldest: o.into(), current: c.into(), diff: d.into() }
    }

    #[test]
    fn current_only_aligns_on_longest_mount() {
        let s = sample(&[("/mnt/b", 2 * GIB), ("/mnt/alpha", GIB)]);
        assert_eq!(
            render_current(&s),
            "/mnt/alpha  1.00 GiB\n\
             /mnt/b      2.00 GiB\n\
             total       3.00 GiB\n"
        );
    }

    #[test]
    fn current_only_total_label_sets_minimum_width() {
        let s = sample(&[("/a", GIB)]);
        assert_eq!(render_current(&s), "/a     1.00 GiB\ntotal  1.00 GiB\n");
        assert_eq!(render_current(&sample(&[])), "total  0.00 GiB\n");
    }

    #[test]
    fn comparison_rows_for_grown_and_new_mounts() {
        let oldest  = sample(&[("/mnt/a", GIB)]);
        let current = sample(&[("/mnt/a", 2 * GIB), ("/mnt/b", GIB)]);
        assert_eq!(comparison_rows(&oldest, &current), vec![
            row("/mnt/a", "1.00 GiB", "2.00 GiB", "+1.00 GiB"),
            row("/mnt/b", "0.00 GiB", "1.00 GiB", "+1.00 GiB"),
            row("total",  "1.00 GiB", "3.00 GiB", "+2.00 GiB"),
        ]);
    }

    #[test]
    fn comparison_rows_mark_removed_mounts() {
        let oldest  = sample(&[("/mnt/a", GIB), ("/mnt/gone", 3 * GIB)]);
        let current = sample(&[("/mnt/a", GIB)]);
        let rows = comparison_rows(&oldest, &current);
        assert_eq!(rows[1], row("/mnt/gone", "3.00 GiB", "(removed)", "-3.00 GiB"));
        assert_eq!(rows[2], row("total", "4.00 GiB", "1.00 GiB", "-3.00 GiB"));
    }

    #[test]
    fn comparison_rows_survive_extreme_history_values() {
        let oldest  = sample(&[("/mnt/a", i64::MIN), ("/mnt/gone", i64::MIN)]);
        let current = sample(&[("/mnt/a", i64::MAX)]);
        let rows = comparison_rows(&oldest, &current);
        assert_eq!(rows.len(), 3);
        assert!(rows[0].diff.starts_with('+'));
        assert!(rows[1].diff.starts_with('+'));
    }

    #[test]
    fn comparison_table_layout() {
        let oldest  = sample(&[("/mnt/a", GIB)]);
        let current = sample(&[("/mnt/a", 2 * GIB), ("/mnt/b", GIB)]);
        let expected = "\
Mountpoint    Oldest   Current  Difference
----------  --------  --------  ----------
/mnt/a      1.00 GiB  2.00 GiB   +1.00 GiB
/mnt/b      0.00 GiB  1.00 GiB   +1.00 GiB
total       1.00 GiB  3.00 GiB   +2.00 GiB
";
        assert_eq!(render_comparison(&oldest, &current), expected);
    }

    #[test]
    fn comparison_columns_widen_for_long_cells() {
        let oldest  = sample(&[("/mnt/projects/very/long/path", 2_000 * GIB)]);
        let current = sample(&[]);
        let table = render_comparison(&oldest, &current);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "----------------------------  --------  ---------  ----------");
        assert_eq!(lines[2], "/mnt/projects/very/long/path  1.95 TiB  (removed)   -1.95 TiB");
        assert!(lines.iter().all(|l| l.len() == lines[1].len()));
    }
}
