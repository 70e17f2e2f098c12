//! Plain-text and JSON renderings of [`DerivedViews`] for `--report`.

use std::fmt;

use anyhow::{Context, Result};

use crate::data::aggregate::{format_percent, DerivedViews};

const NO_MATCH: &str = "No passengers match the current filters.";

/// Render every view as an aligned plain-text report.
pub fn text_report(views: &DerivedViews) -> Result<String> {
    let mut out = String::new();
    write_text(&mut out, views).context("formatting report")?;
    Ok(out)
}

/// Write the plain-text report to any formatter sink.
pub fn write_text(out: &mut impl fmt::Write, views: &DerivedViews) -> fmt::Result {
    let s = &views.summary;

    writeln!(out, "Filtered rows: {}", views.row_count)?;
    writeln!(out)?;
    writeln!(out, "Survival insights")?;
    writeln!(out, "  Passengers     {}", s.total)?;
    writeln!(
        out,
        "  Survivors      {} ({})",
        s.survived,
        format_percent(s.survival_rate)
    )?;
    writeln!(out, "  Deaths         {}", s.died)?;
    writeln!(out, "  Male rate      {}", format_percent(views.by_sex.male))?;
    writeln!(out, "  Female rate    {}", format_percent(views.by_sex.female))?;

    if views.is_empty() {
        writeln!(out)?;
        return writeln!(out, "{NO_MATCH}");
    }

    writeln!(out)?;
    writeln!(out, "Survival by age group and class")?;
    for cell in &views.heatmap {
        writeln!(
            out,
            "  {:<6} class {}  {:>6}  (n={})",
            cell.age_group.label(),
            cell.class,
            format_percent(cell.survival_rate),
            cell.passengers
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Survival by port of embarkation")?;
    for row in &views.embarkation {
        writeln!(
            out,
            "  {} {:<12} {:>6}  (n={})",
            row.port,
            row.port.town(),
            format_percent(row.survival_rate),
            row.passengers
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Age groups with the most survivors")?;
    for row in &views.top_age_groups {
        writeln!(out, "  {:<6} {}", row.age_group.label(), row.survivors)?;
    }

    writeln!(out)?;
    writeln!(out, "Highest fares")?;
    for row in &views.top_fares {
        writeln!(
            out,
            "  {:>9}  {}  {:<6}  {:>5}  {:<8}  {}",
            row.fare.map(|f| format!("{f:.2}")).unwrap_or_else(|| "-".into()),
            row.class,
            row.sex,
            row.age.map(|a| format!("{a:.0}")).unwrap_or_else(|| "-".into()),
            if row.survived { "survived" } else { "died" },
            row.name
        )?;
    }
    Ok(())
}

pub fn json_report(views: &DerivedViews) -> Result<String> {
    serde_json::to_string_pretty(views).context("serialising report")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::data::filter::FilteredView;
    use crate::data::loader::read_csv;
    use crate::data::model::PassengerDataset;

    const CSV: &str = "\
Survived,Pclass,Sex,Age,Fare,Embarked,Name
1,1,female,29,100,C,Allen
0,3,male,22,7,S,Braund
";

    #[test]
    fn text_report_lists_every_view() {
        let ds = read_csv(CSV.as_bytes()).unwrap();
        let views = DerivedViews::compute(&FilteredView::all(&ds), &DashboardConfig::default());
        let text = text_report(&views).unwrap();
        assert!(text.contains("Filtered rows: 2"));
        assert!(text.contains("Survivors      1 (50.0%)"));
        assert!(text.contains("Cherbourg"));
        assert!(text.contains("20-29"));
        assert!(text.contains("100.00"));
        assert!(!text.contains(NO_MATCH));
    }

    #[test]
    fn empty_report_shows_notice() {
        let ds = PassengerDataset::default();
        let views = DerivedViews::compute(&FilteredView::all(&ds), &DashboardConfig::default());
        let text = text_report(&views).unwrap();
        assert!(text.contains("Survivors      0 (0.0%)"));
        assert!(text.contains(NO_MATCH));
    }

    struct FullSink;

    impl fmt::Write for FullSink {
        fn write_str(&mut self, _: &str) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn write_errors_are_propagated() {
        let ds = read_csv(CSV.as_bytes()).unwrap();
        let views = DerivedViews::compute(&FilteredView::all(&ds), &DashboardConfig::default());
        assert!(write_text(&mut FullSink, &views).is_err());
    }

    #[test]
    fn json_report_uses_bucket_labels() {
        let ds = read_csv(CSV.as_bytes()).unwrap();
        let views = DerivedViews::compute(&FilteredView::all(&ds), &DashboardConfig::default());
        let json: serde_json::Value = serde_json::from_str(&json_report(&views).unwrap()).unwrap();
        assert_eq!(json["row_count"], 2);
        assert_eq!(json["heatmap"][0]["age_group"], "20-29");
        assert_eq!(json["embarkation"][0]["port"], "C");
        assert_eq!(json["top_fares"][0]["class"], 1);
        assert_eq!(json["by_sex"]["female"], 100.0);
    }
}
