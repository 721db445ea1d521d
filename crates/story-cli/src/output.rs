//! Terminal rendering

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;
use story_model::{Project, Story};
use story_service::{CategorizeReport, GenerateReport};

/// Stories grouped by category
///
/// # Errors
/// Write failures
pub fn story_groups(
    out: &mut impl Write,
    groups: &BTreeMap<String, Vec<Story>>,
    has_summary: bool,
) -> io::Result<()> {
    if groups.is_empty() {
        if has_summary {
            return writeln!(out, "No user stories found in the file (summary is present).");
        }
        return writeln!(out, "No user stories found in the file.");
    }

    writeln!(out, "User Stories:")?;
    for (label, stories) in groups {
        writeln!(out, "\n{label}")?;
        for story in stories {
            writeln!(out, "  - {}", story.description)?;
        }
    }
    Ok(())
}

/// Result of a bulk classification
///
/// # Errors
/// Write failures
pub fn categorize_report(out: &mut impl Write, report: &CategorizeReport) -> io::Result<()> {
    if report.stories.is_empty() {
        return writeln!(out, "No stories to categorize.");
    }
    if !report.hints.is_empty() {
        writeln!(out, "Suggested categories: {}", report.hints.join(", "))?;
    }
    writeln!(out, "Current stories and their categories:")?;
    for story in &report.stories {
        writeln!(out, "  - \"{}\" [Category: {}]", story.description, story.category)?;
    }
    if report.failures > 0 {
        writeln!(
            out,
            "{} stories could not be categorized and were left uncategorized.",
            report.failures
        )?;
    }
    Ok(())
}

/// Newly written summary
///
/// # Errors
/// Write failures
pub fn summary(out: &mut impl Write, summary: &str) -> io::Result<()> {
    if summary.is_empty() {
        return writeln!(out, "Generated summary was empty; the summary section was cleared.");
    }
    writeln!(out, "# Summary\n{summary}")
}

/// Result of story generation
///
/// # Errors
/// Write failures
pub fn generate_report(out: &mut impl Write, report: &GenerateReport, file: &Path) -> io::Result<()> {
    if report.added.is_empty() {
        return writeln!(out, "No new stories were added.");
    }
    for story in &report.added {
        writeln!(out, "Kept: \"{}\" [Category: {}]", story.description, story.category)?;
    }
    writeln!(
        out,
        "{} of {} generated stories added to {}.",
        report.added.len(),
        report.proposed,
        file.display()
    )
}

/// Projects on the remote server
///
/// # Errors
/// Write failures
pub fn remote_projects(out: &mut impl Write, projects: &[Project]) -> io::Result<()> {
    if projects.is_empty() {
        return writeln!(out, "No remote projects found.");
    }
    writeln!(out, "Remote Projects:")?;
    for project in projects {
        writeln!(out, "- {} (UUID: {})", project.name, project.id)?;
    }
    Ok(())
}

/// One remote project with its stories
///
/// # Errors
/// Write failures
pub fn remote_project(out: &mut impl Write, project: &Project) -> io::Result<()> {
    writeln!(out, "Project: {} (UUID: {})", project.name, project.id)?;
    if project.records.is_empty() {
        return writeln!(out, "No user stories found for this project.");
    }
    writeln!(out, "User Stories:")?;
    for story in &project.records {
        writeln!(out, "- {} [Category: {}]", story.description, story.effective_category())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use story_model::ProjectId;
    use story_test_utils::{sample_project, sample_stories};

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn groups_render_in_label_order() {
        let mut groups = BTreeMap::new();
        for story in sample_stories() {
            groups.entry(story.category.clone()).or_insert_with(Vec::new).push(story);
        }

        let text = render(|out| story_groups(out, &groups, false));
        assert_eq!(
            text,
            "User Stories:\n\nAuth\n  - As a user I log in\n  - As a user I reset my password\n\
             \nBilling\n  - As a user I download invoices\n"
        );
    }

    #[test]
    fn empty_groups_mention_summary() {
        let groups = BTreeMap::new();
        assert_eq!(
            render(|out| story_groups(out, &groups, true)),
            "No user stories found in the file (summary is present).\n"
        );
    }

    #[test]
    fn remote_listing() {
        let projects = vec![sample_project("p-1")];
        assert_eq!(
            render(|out| remote_projects(out, &projects)),
            "Remote Projects:\n- Project p-1 (UUID: p-1)\n"
        );
        assert_eq!(render(|out| remote_projects(out, &[])), "No remote projects found.\n");
    }

    #[test]
    fn remote_project_without_stories() {
        let project = Project::new(ProjectId::from("p-2"), "Empty");
        assert_eq!(
            render(|out| remote_project(out, &project)),
            "Project: Empty (UUID: p-2)\nNo user stories found for this project.\n"
        );
    }

    #[test]
    fn categorize_report_lists_failures() {
        let report = CategorizeReport {
            hints: vec!["Auth".to_string()],
            stories: sample_stories(),
            failures: 1,
        };
        let text = render(|out| categorize_report(out, &report));
        assert!(text.starts_with("Suggested categories: Auth\n"));
        assert!(text.contains("  - \"As a user I download invoices\" [Category: Billing]\n"));
        assert!(text.ends_with("1 stories could not be categorized and were left uncategorized.\n"));
    }
}
