/*!
format.rs

Text rendering for tool responses.

  - format_offenses(report)                      : lint report -> offense listing
  - format_cop_list(stdout, dept, limit, offset) : `--show-cops` -> one department, paginated
  - format_department_summary(stdout)            : `--show-cops` -> department counts

All scraping of rubocop's human-readable `--show-cops` output happens in
this module (`extract_cops_for_department`, `parse_department_headers`) so
drift in that format shows up in these tests first.

Functions here never log or print; they return strings.
*/

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;

use crate::rubocop::report::{LintReport, Offense};

/// Upper bound on cops returned per page.
pub const MAX_PAGE_LIMIT: usize = 100;
pub const DEFAULT_PAGE_LIMIT: usize = 50;

pub const NO_OFFENSES: &str = "✓ No offenses found!";

static COP_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z][a-zA-Z]+/[A-Za-z0-9]+):").expect("valid cop regex"));

static DEPARTMENT_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^# Department '([^']+)' \((\d+)\):").expect("valid department regex")
});

static DEPARTMENT_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^# Department '([^']+)'").expect("valid department regex"));

/* -------------------------------------------------------------------------- */
/* Offenses                                                                   */
/* -------------------------------------------------------------------------- */

fn offense_tags(offense: &Offense) -> String {
    let mut tags = String::new();
    if offense.correctable {
        tags.push_str(" [Auto-correctable]");
    }
    if offense.corrected {
        tags.push_str(" [Corrected]");
    }
    tags
}

fn write_offense(out: &mut String, offense: &Offense) {
    let _ = writeln!(
        out,
        "  {} Line {}:{}: {}",
        offense.severity.icon(),
        offense.location.line,
        offense.location.column,
        offense.message
    );
    let _ = writeln!(out, "     Cop: {}{}", offense.cop_name, offense_tags(offense));
}

/// Render a lint report. Files without offenses are skipped; order follows
/// the linter's output.
pub fn format_offenses(report: &LintReport) -> String {
    if report.summary.offense_count == 0 {
        return NO_OFFENSES.to_string();
    }

    let mut out = format!(
        "Found {} offense(s) in {} file(s):\n\n",
        report.summary.offense_count,
        report.files.len()
    );

    for file in report.files.iter().filter(|f| !f.offenses.is_empty()) {
        let _ = writeln!(out, "📄 {}", file.path);
        for offense in &file.offenses {
            write_offense(&mut out, offense);
        }
        out.push('\n');
    }

    out
}

/* -------------------------------------------------------------------------- */
/* Cop listing                                                                */
/* -------------------------------------------------------------------------- */

/// Pagination window over a list of cops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
    pub total: usize,
}

impl Page {
    /// `limit` is clamped to `MAX_PAGE_LIMIT`.
    pub fn new(offset: usize, limit: usize, total: usize) -> Self {
        Self {
            offset,
            limit: limit.min(MAX_PAGE_LIMIT),
            total,
        }
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        let start = self.offset.min(self.total);
        let end = self.offset.saturating_add(self.limit).min(self.total);
        start..end
    }

    pub fn has_more(&self) -> bool {
        self.offset.saturating_add(self.limit) < self.total
    }

    pub fn next_offset(&self) -> usize {
        self.offset.saturating_add(self.limit)
    }

    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.next_offset())
    }
}

/// Collect `Dept/Cop` names listed under `department`.
///
/// A line counts when it starts with `<department>/`, matches the cop
/// pattern, and is not inside another department's section.
pub fn extract_cops_for_department(stdout: &str, department: &str) -> Vec<String> {
    let prefix = format!("{department}/");
    let mut in_other_department = false;
    let mut cops = Vec::new();

    for line in stdout.lines() {
        if let Some(caps) = DEPARTMENT_START.captures(line) {
            in_other_department = &caps[1] != department;
            continue;
        }
        if in_other_department || !line.starts_with(&prefix) {
            continue;
        }
        if let Some(caps) = COP_LINE.captures(line) {
            cops.push(caps[1].to_string());
        }
    }

    cops
}

fn pagination_footer(page: &Page, department: &str) -> String {
    if !page.has_more() {
        return format!("✓ All cops displayed for {department} department.\n");
    }
    format!(
        "📄 More results available. To see the next page:\n   Use limit: {}, offset: {}\n   Remaining: {} cops\n",
        page.limit,
        page.next_offset(),
        page.remaining()
    )
}

/// Render one department's cops from raw `--show-cops` output.
pub fn format_cop_list(stdout: &str, department: &str, limit: usize, offset: usize) -> String {
    let cops = extract_cops_for_department(stdout, department);
    if cops.is_empty() {
        return format!(
            "No cops found for department: {department}\n\n\
             Available departments can be seen by calling rubocop_list_cops without a department parameter."
        );
    }

    let page = Page::new(offset, limit, cops.len());
    let shown = &cops[page.range()];

    let mut out = format!("RuboCop Cops ({department} department):\n");
    if shown.is_empty() {
        let _ = writeln!(
            out,
            "Showing 0 of {} total cops (offset {} is past the end)\n",
            page.total, page.offset
        );
    } else {
        let _ = writeln!(
            out,
            "Showing {}-{} of {} total cops\n",
            page.offset + 1,
            page.offset + shown.len(),
            page.total
        );
    }

    for cop in shown {
        let _ = writeln!(out, "• {cop}");
    }
    out.push('\n');
    out.push_str(&pagination_footer(&page, department));
    out
}

/* -------------------------------------------------------------------------- */
/* Department summary                                                         */
/* -------------------------------------------------------------------------- */

/// Parse `# Department 'Name' (count):` headers into a sorted map.
pub fn parse_department_headers(stdout: &str) -> BTreeMap<String, usize> {
    stdout
        .lines()
        .filter_map(|line| DEPARTMENT_HEADER.captures(line))
        .filter_map(|caps| {
            let count = caps[2].parse::<usize>().ok()?;
            Some((caps[1].to_string(), count))
        })
        .collect()
}

pub fn format_department_summary(stdout: &str) -> String {
    let departments = parse_department_headers(stdout);
    let total: usize = departments.values().sum();

    let mut out = format!(
        "RuboCop has {total} total cops across {} departments:\n\n",
        departments.len()
    );
    for (name, count) in &departments {
        let _ = writeln!(out, "• {name}: {count} cops");
    }
    out.push_str("\n💡 To see cops for a specific department, use the 'department' parameter.\n");
    out.push_str("   Example: { \"department\": \"Style\" }\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubocop::report::parse_report;

    /// Trimmed capture of `rubocop --show-cops`.
    const SHOW_COPS: &str = "\
# Available cops (4) + config for /home/dev/app:
# Department 'Bundler' (2):
Bundler/DuplicatedGem:
  Description: Checks for duplicate gem entries in Gemfile.
  Enabled: true
  Include:
  - \"**/*.gemfile\"

Bundler/OrderedGems:
  Description: Gems within groups in the Gemfile should be alphabetically sorted.
  Enabled: true

# Department 'Style' (3):
Style/Alias:
  Description: Use alias instead of alias_method.
  StyleGuide: \"#prefer-alias\"
  Enabled: true

Style/AndOr:
  Description: Use &&/|| instead of and/or.
  Enabled: true

Style/ArrayJoin:
  Description: Use Array#join instead of Array#*.
  Enabled: true

# Department 'Lint' (1):
Lint/AmbiguousOperator:
  Description: Checks for ambiguous operators in the first argument of a method invocation.
  Enabled: true
";

    fn report(json: &str) -> LintReport {
        parse_report(json).unwrap()
    }

    #[test]
    fn zero_offenses_is_fixed_message() {
        let r = report(
            r#"{"files":[{"path":"a.rb","offenses":[{"severity":"warning","message":"x",
                "cop_name":"Lint/X","location":{"line":1,"column":1}}]}],
                "summary":{"offense_count":0}}"#,
        );
        assert_eq!(format_offenses(&r), NO_OFFENSES);
    }

    #[test]
    fn single_offense_rendering() {
        let r = report(
            r#"{"files":[{"path":"a.rb","offenses":[{"severity":"warning","message":"bad",
                "cop_name":"Style/Foo","correctable":true,"corrected":false,
                "location":{"line":3,"column":5}}]}],
                "summary":{"offense_count":1,"target_file_count":1,"inspected_file_count":1}}"#,
        );
        let out = format_offenses(&r);
        assert!(out.starts_with("Found 1 offense(s) in 1 file(s):\n\n"));
        assert!(out.contains("📄 a.rb\n"));
        assert!(out.contains("  ⚠️ Line 3:5: bad\n"));
        assert!(out.contains("     Cop: Style/Foo [Auto-correctable]\n"));
        assert!(!out.contains("[Corrected]"));
    }

    #[test]
    fn skips_clean_files_and_keeps_order() {
        let r = report(
            r#"{"files":[
                {"path":"b.rb","offenses":[
                    {"severity":"error","message":"first","cop_name":"Lint/A","location":{"line":1,"column":2}},
                    {"severity":"convention","message":"second","cop_name":"Style/B","corrected":true,"correctable":true,"location":{"line":9,"column":1}}
                ]},
                {"path":"clean.rb","offenses":[]},
                {"path":"a.rb","offenses":[
                    {"severity":"warning","message":"third","cop_name":"Lint/C","location":{"line":4,"column":4}}
                ]}
            ],"summary":{"offense_count":3}}"#,
        );
        let out = format_offenses(&r);
        assert!(out.starts_with("Found 3 offense(s) in 3 file(s):"));
        assert!(!out.contains("clean.rb"));
        assert_eq!(out.matches("     Cop: ").count(), 3);

        let first = out.find("first").unwrap();
        let second = out.find("second").unwrap();
        let third = out.find("third").unwrap();
        assert!(first < second && second < third);
        assert!(out.find("b.rb").unwrap() < out.find("a.rb").unwrap());
        assert!(out.contains("❌ Line 1:2: first"));
        assert!(out.contains("Cop: Style/B [Auto-correctable] [Corrected]"));
    }

    #[test]
    fn extracts_department_cops() {
        assert_eq!(
            extract_cops_for_department(SHOW_COPS, "Style"),
            vec!["Style/Alias", "Style/AndOr", "Style/ArrayJoin"]
        );
        assert_eq!(
            extract_cops_for_department(SHOW_COPS, "Bundler"),
            vec!["Bundler/DuplicatedGem", "Bundler/OrderedGems"]
        );
    }

    #[test]
    fn department_match_is_case_sensitive() {
        assert!(extract_cops_for_department(SHOW_COPS, "style").is_empty());
    }

    #[test]
    fn lines_without_header_are_matched_by_prefix() {
        let raw = "Style/Alias:\n  Enabled: true\nStyle/Not-A-Cop:\nStyle/AndOr:\n";
        assert_eq!(
            extract_cops_for_department(raw, "Style"),
            vec!["Style/Alias", "Style/AndOr"]
        );
    }

    #[test]
    fn cop_lines_in_other_department_sections_are_skipped() {
        let raw = "# Department 'Lint' (1):\nStyle/Stray:\n# Department 'Style' (1):\nStyle/Alias:\n";
        assert_eq!(extract_cops_for_department(raw, "Style"), vec!["Style/Alias"]);
        assert!(extract_cops_for_department(raw, "Lint").is_empty());
    }

    #[test]
    fn unknown_department_message() {
        let out = format_cop_list(SHOW_COPS, "Rails", 50, 0);
        assert!(out.starts_with("No cops found for department: Rails"));
        assert!(out.contains("without a department parameter"));
    }

    #[test]
    fn full_page_lists_everything() {
        let out = format_cop_list(SHOW_COPS, "Style", 50, 0);
        assert!(out.starts_with("RuboCop Cops (Style department):\nShowing 1-3 of 3 total cops\n\n"));
        assert!(out.contains("• Style/Alias\n• Style/AndOr\n• Style/ArrayJoin\n"));
        assert!(out.ends_with("✓ All cops displayed for Style department.\n"));
    }

    #[test]
    fn partial_page_has_next_page_hint() {
        let out = format_cop_list(SHOW_COPS, "Style", 2, 0);
        assert!(out.contains("Showing 1-2 of 3 total cops"));
        assert_eq!(out.matches("• ").count(), 2);
        assert!(out.contains("Use limit: 2, offset: 2\n"));
        assert!(out.contains("Remaining: 1 cops\n"));

        let next = format_cop_list(SHOW_COPS, "Style", 2, 2);
        assert!(next.contains("Showing 3-3 of 3 total cops"));
        assert!(next.contains("• Style/ArrayJoin"));
        assert!(next.contains("All cops displayed"));
    }

    #[test]
    fn offset_past_end_shows_nothing() {
        let out = format_cop_list(SHOW_COPS, "Style", 10, 7);
        assert!(out.contains("Showing 0 of 3 total cops (offset 7 is past the end)"));
        assert_eq!(out.matches("• ").count(), 0);
        assert!(out.contains("All cops displayed"));
    }

    #[test]
    fn page_window_arithmetic() {
        for total in [0usize, 1, 5, 150, 250] {
            for limit in [0usize, 1, 10, 100, 500] {
                for offset in [0usize, 3, 100, 240, 400] {
                    let page = Page::new(offset, limit, total);
                    let clamped = limit.min(MAX_PAGE_LIMIT);
                    assert_eq!(
                        page.range().len(),
                        clamped.min(total.saturating_sub(offset))
                    );
                    assert_eq!(page.has_more(), offset + clamped < total);
                }
            }
        }
    }

    #[test]
    fn limit_is_clamped_to_max() {
        let raw: String = (0..150).map(|i| format!("Style/Cop{i}:\n")).collect();
        let out = format_cop_list(&raw, "Style", 500, 0);
        assert_eq!(out.matches("• ").count(), MAX_PAGE_LIMIT);
        assert!(out.contains("Showing 1-100 of 150 total cops"));
        assert!(out.contains("Use limit: 100, offset: 100"));
        assert!(out.contains("Remaining: 50 cops"));
    }

    #[test]
    fn department_summary_sorted_with_total() {
        let out = format_department_summary(SHOW_COPS);
        assert!(out.starts_with("RuboCop has 6 total cops across 3 departments:\n\n"));
        let bundler = out.find("• Bundler: 2 cops").unwrap();
        let lint = out.find("• Lint: 1 cops").unwrap();
        let style = out.find("• Style: 3 cops").unwrap();
        assert!(bundler < lint && lint < style);
        assert!(out.contains(r#"Example: { "department": "Style" }"#));
    }

    #[test]
    fn summary_total_matches_parsed_counts() {
        let parsed = parse_department_headers(SHOW_COPS);
        assert_eq!(parsed.values().sum::<usize>(), 6);
        assert_eq!(parsed.get("Style"), Some(&3));
    }

    #[test]
    fn summary_of_empty_output() {
        let out = format_department_summary("");
        assert!(out.starts_with("RuboCop has 0 total cops across 0 departments:"));
    }
}
