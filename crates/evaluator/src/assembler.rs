//! Report assembly.

use std::collections::{BTreeSet, HashSet};

use alarm_core::{Alarm, IssueTag};
use futures::stream::{self, StreamExt};
use report_store::{AlarmRef, DescriptionRecord, IssueGroupRecord, Report};
use tracing::debug;

use crate::classifier::IssueClassifier;
use crate::config::DescriptionScope;
use crate::suggester::{DescriptionSuggester, SuggestionSource};

/// The assembled report plus counters for the run summary.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    pub report: Report,
    pub generated: usize,
    pub generation_failures: usize,
}

/// Turns classified alarms into issue groups and description records.
pub struct ReportAssembler {
    classifier: IssueClassifier,
    suggester: DescriptionSuggester,
    scope: DescriptionScope,
    concurrency: usize,
}

impl ReportAssembler {
    pub fn new(classifier: IssueClassifier, suggester: DescriptionSuggester) -> Self {
        Self {
            classifier,
            suggester,
            scope: DescriptionScope::default(),
            concurrency: 4,
        }
    }

    pub fn with_scope(mut self, scope: DescriptionScope) -> Self {
        self.scope = scope;
        self
    }

    /// Limit concurrent generation calls.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Build the report for `alarms`.
    ///
    /// Always yields one issue group per tag in [`IssueTag::ALL`] order, each
    /// listing matching alarms in input order without duplicate names.
    /// Description records follow the same order.
    pub async fn assemble(&self, alarms: &[Alarm]) -> Assembly {
        let tags: Vec<BTreeSet<IssueTag>> =
            alarms.iter().map(|alarm| self.classifier.classify(alarm)).collect();

        let issue_groups = IssueTag::ALL
            .into_iter()
            .map(|tag| {
                let mut seen = HashSet::new();
                let alarm_list = alarms
                    .iter()
                    .zip(&tags)
                    .filter(|(_, alarm_tags)| alarm_tags.contains(&tag))
                    .filter(|(alarm, _)| seen.insert(alarm.name.as_str()))
                    .map(|(alarm, _)| AlarmRef::from(alarm))
                    .collect();
                IssueGroupRecord { id: tag, alarm_list }
            })
            .collect();

        let mut seen = HashSet::new();
        let candidates: Vec<&Alarm> = alarms
            .iter()
            .zip(&tags)
            .filter(|(_, alarm_tags)| match self.scope {
                DescriptionScope::MissingOnly => alarm_tags.contains(&IssueTag::NoDescription),
                DescriptionScope::All => true,
            })
            .map(|(alarm, _)| alarm)
            .filter(|alarm| seen.insert(alarm.name.as_str()))
            .collect();

        debug!("Suggesting descriptions for {} alarms", candidates.len());

        let suggestions: Vec<_> = stream::iter(candidates.iter().copied())
            .map(|alarm| self.suggester.suggestion(alarm))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut assembly = Assembly::default();
        for (alarm, suggestion) in candidates.into_iter().zip(suggestions) {
            match suggestion.source {
                SuggestionSource::Generated => assembly.generated += 1,
                SuggestionSource::Fallback => assembly.generation_failures += 1,
                SuggestionSource::Existing => {}
            }
            assembly.report.descriptions.push(DescriptionRecord::new(
                alarm.name.as_str(),
                alarm.description.as_str(),
                suggestion.text,
            ));
        }
        assembly.report.issue_groups = issue_groups;

        assembly
    }
}
