use crate::core::catalog::MarkCatalog;
use crate::domain::model::Leg;

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn total_distance_nm(legs: &[Leg]) -> f64 {
    legs.iter().map(|leg| leg.distance_nm).sum()
}

/// Number → name legend for the terminal.
pub fn legend_text(catalog: &MarkCatalog) -> String {
    let width = catalog
        .iter()
        .map(|m| m.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Mark".len());

    let mut out = format!("{:>4}  {:<width$}\n", "#", "Mark", width = width);
    for mark in catalog.iter() {
        out.push_str(&format!(
            "{:>4}  {:<width$}\n",
            mark.sequence,
            mark.name,
            width = width
        ));
    }
    out
}

pub fn legs_text(legs: &[Leg]) -> String {
    let start_w = column_width(legs.iter().map(|l| l.start.as_str()), "StartMark");
    let end_w = column_width(legs.iter().map(|l| l.end.as_str()), "EndMark");

    let mut out = format!(
        "{:<start_w$}  {:<end_w$}  {:>10}  {}\n",
        "StartMark", "EndMark", "DistanceNM", "Color"
    );
    for leg in legs {
        out.push_str(&format!(
            "{:<start_w$}  {:<end_w$}  {:>10.2}  {}\n",
            leg.start, leg.end, leg.distance_nm, leg.color
        ));
    }
    out.push_str(&format!(
        "{:<start_w$}  {:<end_w$}  {:>10.2}\n",
        "Total",
        "",
        total_distance_nm(legs)
    ));
    out
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}

pub fn legend_html(catalog: &MarkCatalog) -> String {
    let mut out = String::from(
        "<table class=\"legend\">\n<thead><tr><th>#</th><th>Mark</th></tr></thead>\n<tbody>\n",
    );
    for mark in catalog.iter() {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            mark.sequence,
            escape_html(&mark.name)
        ));
    }
    out.push_str("</tbody>\n</table>\n");
    out
}

pub fn legs_html(legs: &[Leg]) -> String {
    let mut out = String::from(
        "<table class=\"legs\">\n<thead><tr><th>StartMark</th><th>EndMark</th><th>DistanceNM</th><th>Color</th></tr></thead>\n<tbody>\n",
    );
    for leg in legs {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{:.2}</td><td>{}</td></tr>\n",
            escape_html(&leg.start),
            escape_html(&leg.end),
            leg.distance_nm,
            escape_html(leg.color.as_str())
        ));
    }
    out.push_str(&format!(
        "</tbody>\n<tfoot><tr><td colspan=\"2\">Total</td><td>{:.2}</td><td></td></tr></tfoot>\n</table>\n",
        total_distance_nm(legs)
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::LegColor;

    fn legs() -> Vec<Leg> {
        vec![
            Leg {
                start: "R 4".to_string(),
                end: "R3".to_string(),
                distance_nm: 1.234,
                color: LegColor::Red,
            },
            Leg {
                start: "R3".to_string(),
                end: "X-Ray".to_string(),
                distance_nm: 2.0,
                color: LegColor::Black,
            },
        ]
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>\"A&B\"</b>"), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
    }

    #[test]
    fn test_legs_text_has_total_row() {
        let text = legs_text(&legs());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("StartMark"));
        assert!(lines[1].contains("1.23"));
        assert!(lines[1].ends_with("red"));
        assert!(lines[3].starts_with("Total"));
        assert!(lines[3].ends_with("3.23"));
    }

    #[test]
    fn test_legend_lists_marks_by_number() {
        let csv = "Mark Name,Description,Light,Lat,Long\nR 4,,,50.0,0.0\n<Odd>,,,50.1,0.1\n";
        let catalog = MarkCatalog::from_csv(csv.as_bytes()).unwrap();

        let text = legend_text(&catalog);
        assert!(text.contains("   1  R 4"));
        assert!(text.contains("   2  <Odd>"));

        let html = legend_html(&catalog);
        assert!(html.contains("<td>2</td><td>&lt;Odd&gt;</td>"));
    }

    #[test]
    fn test_legs_html_rows() {
        let html = legs_html(&legs());
        assert!(html.contains("<td>R 4</td><td>R3</td><td>1.23</td><td>red</td>"));
        assert!(html.contains("<td>3.23</td>"));
    }
}
