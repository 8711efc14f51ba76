use std::fmt::Write as _;

use judge_pairing::RankResolver;

use crate::sched::{issue_label, TableReport};

const PAGE_HEADER: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Judging Schedule</title>
<style>
body { font-family: sans-serif; margin: 20px; background: #f5f5f0; }
h1 { color: #4a2c0a; }
h2 { color: #4a2c0a; border-bottom: 2px solid #c8a060; padding-bottom: 4px; }
.site { margin: 12px 0; }
.site h3 { color: #6b4a1a; margin-bottom: 6px; }
.table-card { background: #fff; border: 1px solid #ddd; border-radius: 6px;
  padding: 10px 14px; margin: 8px 0; }
.table-card .category { color: #666; font-style: italic; }
.styles { color: #888; font-size: 0.85em; }
.judge { margin: 2px 0; padding-left: 8px; }
.rank-4 { border-left: 4px solid #1a7a1a; }
.rank-3 { border-left: 4px solid #5aa75a; }
.rank-2 { border-left: 4px solid #c8a020; }
.rank-1 { border-left: 4px solid #d07030; }
.rank-0 { border-left: 4px solid #b0b0b0; }
.conflict { color: #b00020; font-weight: bold; }
.pairing { background: #f0f6ff; border-left: 4px solid #4070c0;
  padding: 6px 10px; margin: 6px 0; }
.band-EXCELLENT { color: #1a7a1a; }
.band-ACCEPTABLE { color: #5aa75a; }
.band-OVERWORKED { color: #d07030; }
.band-CRITICAL { color: #b00020; font-weight: bold; }
.issues { color: #b00020; font-size: 0.9em; }
.candidates { background: #fffbe8; border-left: 4px solid #c8a020;
  padding: 6px 10px; margin: 6px 0; font-size: 0.9em; }
</style>
</head>
<body>
<h1>Judging Schedule</h1>
"#;

const PAGE_FOOTER: &str = "</body>\n</html>\n";

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn push_table_card(out: &mut String, resolver: &RankResolver, report: &TableReport) {
    let a = &report.assessment;
    out.push_str("<div class=\"table-card\">\n");
    let session = report
        .session
        .as_deref()
        .map(|s| format!(" ({})", s))
        .unwrap_or_default();
    let _ = writeln!(out, "<h4>T{}{}</h4>", report.key.table, escape(&session));
    if let Some(category) = report.category.as_deref() {
        let _ = writeln!(out, "<div class=\"category\">{}</div>", escape(category));
    }
    if !report.styles.is_empty() {
        let codes: Vec<&str> = report.styles.iter().map(|s| s.as_str()).collect();
        let _ = writeln!(
            out,
            "<div class=\"styles\">Styles: {}</div>",
            escape(&codes.join(", "))
        );
    }

    for row in report.rows.iter() {
        let weight = resolver.weight(&row.rank);
        let conflict = a.conflicts.iter().find(|c| c.judge == row.name);
        let badge = match conflict {
            Some(c) => format!(
                " <span class=\"conflict\">CONFLICT: entered {}</span>",
                escape(&c.overlap.join(", "))
            ),
            None => String::new(),
        };
        let pairing = if row.pairing.is_empty() {
            String::new()
        } else {
            format!(" [pair {}]", escape(&row.pairing))
        };
        let _ = writeln!(
            out,
            "<div class=\"judge rank-{}\">{} &ndash; {}{}{}</div>",
            weight,
            escape(&row.name),
            escape(&row.rank),
            pairing,
            badge
        );
    }

    out.push_str("<div class=\"pairing\">\n");
    let workload = match a.beers_per_pair {
        Some(bpp) => format!("{:.1} beers/pair", bpp),
        None => "no pairing possible".to_string(),
    };
    let _ = writeln!(
        out,
        "<span class=\"band-{band}\">{band}</span> &ndash; {entries} entries, {workload}",
        band = a.band.as_str(),
        entries = a.entry_count,
        workload = workload,
    );
    let shortfall = judge_pairing::certified_shortfall(a.entry_count, a.certified);
    if shortfall > 0 {
        let _ = writeln!(out, "<div>Need {} more certified judge(s)</div>", shortfall);
    }
    for (n, pair) in a.pairs.iter().enumerate() {
        let note = if pair.fallback { " (both certified)" } else { "" };
        let _ = writeln!(
            out,
            "<div>Pair {}: {} + {}{}</div>",
            n + 1,
            escape(&pair.lead.name),
            escape(&pair.partner.name),
            note
        );
    }
    out.push_str("</div>\n");

    if !a.issues.is_empty() {
        let labels: Vec<String> = a.issues.iter().map(issue_label).collect();
        let _ = writeln!(
            out,
            "<div class=\"issues\">{}</div>",
            escape(&labels.join("; "))
        );
    }

    if !report.candidates.is_empty() {
        out.push_str("<div class=\"candidates\">Replacement candidates:\n");
        for c in report.candidates.iter() {
            let cert = if c.certified { " (certified)" } else { "" };
            let _ = writeln!(
                out,
                "<div>{} &ndash; {}{}, {} mi</div>",
                escape(&c.name),
                escape(&c.rank),
                cert,
                c.distance
            );
        }
        out.push_str("</div>\n");
    }
    out.push_str("</div>\n");
}

/// Renders the full HTML schedule: one section per date, one block per
/// site, one card per table. The reports are expected in key order, which
/// is how [crate::sched::run_schedule] builds them.
pub fn render_schedule(reports: &[TableReport]) -> String {
    let resolver = RankResolver::standard();
    let mut out = String::from(PAGE_HEADER);
    let mut current_date: Option<&str> = None;
    let mut current_site: Option<&str> = None;
    for report in reports.iter() {
        if current_date != Some(report.key.date.as_str()) {
            if current_site.is_some() {
                out.push_str("</div>\n");
            }
            let _ = writeln!(out, "<h2>{}</h2>", escape(&report.key.date));
            current_date = Some(report.key.date.as_str());
            current_site = None;
        }
        if current_site != Some(report.key.site.as_str()) {
            if current_site.is_some() {
                out.push_str("</div>\n");
            }
            let _ = writeln!(
                out,
                "<div class=\"site\">\n<h3>{}</h3>",
                escape(&report.key.site)
            );
            current_site = Some(report.key.site.as_str());
        }
        push_table_card(&mut out, &resolver, report);
    }
    if current_site.is_some() {
        out.push_str("</div>\n");
    }
    out.push_str(PAGE_FOOTER);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sched::{AssignmentRow, TableKey};
    use judge_pairing::{assess_table, Judge};
    use std::collections::BTreeSet;

    fn report(date: &str, site: &str, table: u32, judges: &[(&str, &str)]) -> TableReport {
        let resolver = RankResolver::standard();
        let key = TableKey {
            date: date.to_string(),
            site: site.to_string(),
            table,
        };
        let rows: Vec<AssignmentRow> = judges
            .iter()
            .map(|(name, rank)| AssignmentRow {
                name: name.to_string(),
                key: key.clone(),
                session: None,
                pairing: String::new(),
                rank: rank.to_string(),
                substyles: vec![],
            })
            .collect();
        let js: Vec<Judge> = rows
            .iter()
            .map(|r| Judge {
                name: r.name.clone(),
                rank: r.rank.clone(),
                entered_styles: vec![],
            })
            .collect();
        let assessment = assess_table(&resolver, &js, 12, &BTreeSet::new());
        TableReport {
            key,
            session: None,
            category: None,
            styles: BTreeSet::new(),
            rows,
            assessment,
            candidates: vec![],
        }
    }

    #[test]
    fn sections_follow_date_and_site() {
        let reports = vec![
            report("02/06", "ARLINGTON", 1, &[("Anna", "Certified"), ("Bob", "Novice")]),
            report("02/06", "DALLAS", 2, &[("Carol", "National"), ("Dave", "Novice")]),
            report("02/07", "DALLAS", 3, &[("Erin", "Certified"), ("Finn", "Novice")]),
        ];
        let html = render_schedule(&reports);
        assert_eq!(html.matches("<h2>").count(), 2);
        assert_eq!(html.matches("<h3>").count(), 3);
        assert!(html.contains("<h4>T1</h4>"));
        let d6 = html.find("<h2>02/06</h2>").unwrap();
        let d7 = html.find("<h2>02/07</h2>").unwrap();
        assert!(d6 < d7);
    }

    #[test]
    fn judges_are_colored_by_rank_weight() {
        let html = render_schedule(&[report(
            "02/06",
            "ARLINGTON",
            1,
            &[("Anna", "Level 4: National"), ("Bob", "left fielder")],
        )]);
        assert!(html.contains("judge rank-4"));
        assert!(html.contains("judge rank-0"));
    }

    #[test]
    fn names_are_escaped() {
        let html = render_schedule(&[report(
            "02/06",
            "ARLINGTON",
            1,
            &[("<Anna>", "Certified"), ("Bob & Co", "Novice")],
        )]);
        assert!(html.contains("&lt;Anna&gt;"));
        assert!(html.contains("Bob &amp; Co"));
        assert!(!html.contains("<Anna>"));
    }
}
