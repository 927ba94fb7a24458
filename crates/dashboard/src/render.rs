//! Widget renderers.
//!
//! Both renderers are pure functions of the records passed in and produce a
//! self-contained HTML fragment.

use alarm_core::IssueTag;
use askama::Template;
use report_store::{DescriptionRecord, IssueGroupRecord};

use crate::error::{Result, WidgetError};
use crate::links::ConsoleLinks;

/// An alarm name with its console deep link.
pub struct AlarmLink {
    pub name: String,
    pub href: String,
}

impl AlarmLink {
    fn new(name: &str, links: &ConsoleLinks) -> Self {
        Self {
            name: name.to_string(),
            href: links.alarm_url(name),
        }
    }
}

pub struct IssueRow {
    pub label: &'static str,
    pub count: usize,
    pub links: Vec<AlarmLink>,
}

#[derive(Template)]
#[template(path = "issues_widget.html")]
pub struct IssuesWidget {
    pub rows: Vec<IssueRow>,
}

pub struct DescriptionRow {
    pub link: AlarmLink,
    pub current: String,
    pub suggested: String,
}

#[derive(Template)]
#[template(path = "descriptions_widget.html")]
pub struct DescriptionsWidget {
    pub rows: Vec<DescriptionRow>,
}

#[derive(Template)]
#[template(path = "widget_error.html")]
pub struct WidgetErrorFragment<'a> {
    pub title: &'a str,
    pub message: String,
}

/// Render the issues table: one row per tag, in taxonomy order.
///
/// Tags missing from `groups` are shown with a zero count.
pub fn render_issues(groups: &[IssueGroupRecord], links: &ConsoleLinks) -> Result<String> {
    let rows = IssueTag::ALL
        .into_iter()
        .map(|tag| {
            let alarms = groups
                .iter()
                .find(|group| group.id == tag)
                .map(|group| group.alarm_list.as_slice())
                .unwrap_or_default();
            IssueRow {
                label: tag.label(),
                count: alarms.len(),
                links: alarms
                    .iter()
                    .map(|alarm| AlarmLink::new(&alarm.alarm_name, links))
                    .collect(),
            }
        })
        .collect();

    Ok(IssuesWidget { rows }.render()?)
}

/// Render the descriptions table: one row per record, unfiltered.
pub fn render_descriptions(records: &[DescriptionRecord], links: &ConsoleLinks) -> Result<String> {
    let rows = records
        .iter()
        .map(|record| DescriptionRow {
            link: AlarmLink::new(&record.alarm_name, links),
            current: record.alarm_description.clone(),
            suggested: record.suggested_description.clone(),
        })
        .collect();

    Ok(DescriptionsWidget { rows }.render()?)
}

/// Render the fragment shown in place of a widget that failed.
pub fn render_error(title: &str, error: &WidgetError) -> String {
    WidgetErrorFragment {
        title,
        message: error.to_string(),
    }
    .render()
    .unwrap_or_else(|_| {
        "<div class=\"alarm-widget widget-error\"><p>Widget could not be loaded.</p></div>".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_store::AlarmRef;

    fn group(tag: IssueTag, names: &[&str]) -> IssueGroupRecord {
        IssueGroupRecord {
            id: tag,
            alarm_list: names.iter().map(|n| AlarmRef::named(*n)).collect(),
        }
    }

    fn rows(html: &str) -> Vec<&str> {
        html.lines().filter(|l| l.trim_start().starts_with("<td>")).collect()
    }

    #[test]
    fn test_all_tags_rendered_with_zero_counts() {
        let html = render_issues(&[group(IssueTag::NoActions, &["a", "b"])], &ConsoleLinks::default())
            .unwrap();

        for tag in IssueTag::ALL {
            assert!(html.contains(tag.label()), "missing row for {}", tag);
        }
        assert_eq!(html.matches("<tr>").count(), IssueTag::ALL.len() + 1);
        assert!(rows(&html).contains(&"      <td>2</td>"));
        assert_eq!(rows(&html).iter().filter(|l| l.trim() == "<td>0</td>").count(), 7);
    }

    #[test]
    fn test_links_without_trailing_separator() {
        let html = render_issues(
            &[group(IssueTag::ShortAlarmCount, &["a", "b", "c"])],
            &ConsoleLinks::default(),
        )
        .unwrap();

        let cell = html
            .lines()
            .find(|l| l.contains(">a</a>"))
            .unwrap()
            .trim();
        assert_eq!(cell.matches(", ").count(), 2);
        assert!(cell.ends_with("</a></td>"));
        assert!(!cell.contains(", </td>"));
    }

    #[test]
    fn test_slash_escaped_in_href() {
        let html = render_issues(
            &[group(IssueTag::NoDescription, &["team/api/errors"])],
            &ConsoleLinks::default(),
        )
        .unwrap();

        assert!(html.contains(
            "href=\"https://console.aws.amazon.com/cloudwatch/home#alarmsV2:alarm/team$2Fapi$2Ferrors\""
        ));
        let fragment_start = html.find("alarm/").unwrap() + "alarm/".len();
        let segment: String = html[fragment_start..].chars().take_while(|c| *c != '"').collect();
        assert!(!segment.contains('/'));
    }

    #[test]
    fn test_descriptions_rendered_and_escaped() {
        let records = vec![
            DescriptionRecord::new("svc/cpu", "", "Fires when CPU > 80%"),
            DescriptionRecord::new("disk", "Disk <full>", "Disk <full>"),
        ];
        let html = render_descriptions(&records, &ConsoleLinks::default()).unwrap();

        assert_eq!(html.matches("<tr>").count(), 3);
        assert!(html.contains("alarm/svc$2Fcpu\""));
        assert!(html.contains("Fires when CPU &gt; 80%"));
        assert!(html.contains("Disk &lt;full&gt;"));
        assert!(!html.contains("<full>"));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let groups = vec![group(IssueTag::HighThreshold, &["x/y", "z"])];
        let records = vec![DescriptionRecord::new("x/y", "", "suggested")];
        let links = ConsoleLinks::default();

        assert_eq!(
            render_issues(&groups, &links).unwrap(),
            render_issues(&groups, &links).unwrap()
        );
        assert_eq!(
            render_descriptions(&records, &links).unwrap(),
            render_descriptions(&records, &links).unwrap()
        );
    }

    #[test]
    fn test_empty_descriptions() {
        let html = render_descriptions(&[], &ConsoleLinks::default()).unwrap();
        assert_eq!(html.matches("<tr>").count(), 1);
    }

    #[test]
    fn test_error_fragment() {
        let html = render_error("Issues", &WidgetError::Timeout(std::time::Duration::from_secs(30)));
        assert!(html.contains("widget-error"));
        assert!(html.contains("Issues could not be loaded."));
        assert!(html.contains("Timed out after 30s"));
        assert!(!html.contains("<table"));
    }
}
