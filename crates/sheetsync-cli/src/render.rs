use sheetsync_client::DecodeError;
use sheetsync_view::{Notice, ViewSnapshot};

/// Plain-text table of the displayed rows with a leading position column.
pub fn table(snapshot: &ViewSnapshot) -> String {
    let mut out = format!("Total IDs: {}\n", snapshot.total_count);
    if snapshot.rows.is_empty() {
        out.push_str("No data available\n");
        return out;
    }

    let mut header = vec!["#".to_string()];
    header.extend(snapshot.columns.iter().cloned());
    let lines: Vec<Vec<String>> = snapshot
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut line = vec![(i + 1).to_string()];
            line.extend(row.iter().cloned());
            line
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for line in &lines {
        for (i, cell) in line.iter().enumerate() {
            let width = cell.chars().count();
            match widths.get_mut(i) {
                Some(w) => *w = (*w).max(width),
                None => widths.push(width),
            }
        }
    }

    out.push_str(&format_line(&header, &widths));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format_line(&rule, &widths));
    for line in &lines {
        out.push_str(&format_line(line, &widths));
    }

    if snapshot.total_pages > 1 {
        out.push_str(&format!(
            "Page {} of {}\n",
            snapshot.page, snapshot.total_pages
        ));
    }
    out
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            format!("{cell:<w$}")
        })
        .collect();
    format!("| {} |\n", padded.join(" | "))
}

pub fn notice(notice: &Notice) -> Vec<String> {
    match notice {
        Notice::Uploaded { .. } => vec!["File uploaded and saved successfully.".to_string()],
        Notice::Deleted { record_id } => vec![format!("Record {record_id} deleted.")],
        Notice::NoMatches { term } => vec![format!("No record found for '{term}'.")],
        Notice::RowsRejected(rejected) => rejected.iter().map(rejected_row).collect(),
    }
}

fn rejected_row(e: &DecodeError) -> String {
    format!("Skipped row: {e}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetsync_client::RecordId;

    fn snapshot(rows: Vec<Vec<&str>>, total_pages: usize) -> ViewSnapshot {
        ViewSnapshot {
            columns: vec!["ID".into(), "Name".into()],
            record_ids: (1..=rows.len() as u64).map(RecordId::from).collect(),
            rows: rows
                .into_iter()
                .map(|r| r.into_iter().map(str::to_string).collect())
                .collect(),
            total_count: 12,
            page: 1,
            total_pages,
            search_term: String::new(),
            ready: true,
            in_flight: 0,
        }
    }

    #[test]
    fn aligns_columns() {
        let text = table(&snapshot(vec![vec!["A-1", "Ann"], vec!["B", "Bartholomew"]], 2));
        let expected = "\
Total IDs: 12
| # | ID  | Name        |
| - | --- | ----------- |
| 1 | A-1 | Ann         |
| 2 | B   | Bartholomew |
Page 1 of 2
";
        assert_eq!(text, expected);
    }

    #[test]
    fn empty_table() {
        let text = table(&snapshot(vec![], 0));
        assert_eq!(text, "Total IDs: 12\nNo data available\n");
    }

    #[test]
    fn single_page_has_no_footer() {
        let text = table(&snapshot(vec![vec!["A", "x"]], 1));
        assert!(!text.contains("Page"));
    }
}
