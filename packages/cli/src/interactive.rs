//! Interactive walkthrough of the cascading filters.
//!
//! Prompts for the seven stages in order. Each prompt offers only the values
//! left by the stages before it, then the dashboard is printed and the user
//! picks what to do next. The criteria live in this loop only.

use chrono::NaiveDate;
use dialoguer::{Input, MultiSelect, Select};
use incident_panel_analytics::build_report;
use incident_panel_dataset::DatasetCache;
use incident_panel_filter::{date_bounds, evaluate};
use incident_panel_filter_models::{FilterCriteria, FilterStage, parse_secretariat_choice};
use incident_panel_incident_models::{EnrichedDataset, Secretariat};

use crate::output;

/// Rows printed by the "Show incidents" action.
const ROW_PREVIEW: usize = 50;

/// What to do after a dashboard has been shown.
enum Action {
    Refine,
    StartOver,
    ShowIncidents,
    Reload,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Refine,
        Self::StartOver,
        Self::ShowIncidents,
        Self::Reload,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Refine => "Refine filters",
            Self::StartOver => "Clear filters and start over",
            Self::ShowIncidents => "Show incidents",
            Self::Reload => "Reload data files",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the interactive session until the user quits.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded or a prompt fails.
pub fn run(cache: &DatasetCache) -> Result<(), Box<dyn std::error::Error>> {
    println!("Incident Panel");
    println!();

    let mut loaded = cache.get_or_load()?;
    output::print_load_report(&loaded.report);

    let mut criteria = FilterCriteria::default();
    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        println!();
        criteria = prompt_criteria(&loaded.dataset, &criteria)?;

        println!();
        match evaluate(&loaded.dataset, &criteria) {
            Ok(outcome) => {
                let report = build_report(&outcome.records);
                output::print_dashboard(&report, outcome.options.applied_range.as_ref());
            }
            Err(e) => println!("{e}"),
        }

        println!();
        let idx = Select::new()
            .with_prompt("What next?")
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::Refine => {}
            Action::StartOver => criteria = FilterCriteria::default(),
            Action::ShowIncidents => {
                if let Ok(outcome) = evaluate(&loaded.dataset, &criteria) {
                    let page: Vec<_> =
                        outcome.records.iter().take(ROW_PREVIEW).copied().collect();
                    output::print_incidents(&page, outcome.len(), 0);
                }
            }
            Action::Reload => match cache.reload() {
                Ok(fresh) => {
                    loaded = fresh;
                    output::print_load_report(&loaded.report);
                }
                Err(e) => println!("Reload failed, keeping the previous data: {e}"),
            },
            Action::Quit => break,
        }
    }

    Ok(())
}

/// Walks the stages in order, seeding each prompt from `previous`.
fn prompt_criteria(
    dataset: &EnrichedDataset,
    previous: &FilterCriteria,
) -> Result<FilterCriteria, Box<dyn std::error::Error>> {
    let mut criteria = FilterCriteria::default();

    let Some(bounds) = date_bounds(dataset) else {
        println!("The incident dataset is empty.");
        return Ok(criteria);
    };

    println!("Data available from {} to {}", bounds.min, bounds.max);
    let start: NaiveDate = Input::new()
        .with_prompt("Start date (YYYY-MM-DD)")
        .default(previous.start_date.unwrap_or(bounds.min))
        .interact_text()?;
    let end: NaiveDate = Input::new()
        .with_prompt("End date (YYYY-MM-DD)")
        .default(previous.end_date.unwrap_or(bounds.max).max(start))
        .validate_with(move |end: &NaiveDate| {
            if *end >= start {
                Ok(())
            } else {
                Err(format!("End date must not be before {start}"))
            }
        })
        .interact_text()?;
    criteria.start_date = Some(start);
    criteria.end_date = Some(end);

    for stage in FilterStage::ALL.into_iter().skip(1) {
        let outcome = evaluate(dataset, &criteria)?;
        let Some(options) = outcome.options.for_stage(stage) else {
            continue;
        };

        if !options.available {
            println!("{}: skipped (camera catalog not loaded)", stage.label());
            continue;
        }
        if options.values.is_empty() {
            println!("{}: no values for the current selection", stage.label());
            continue;
        }

        if !stage.is_multi_select() {
            let choices = options.choices();
            let idx = Select::new()
                .with_prompt(stage.label())
                .items(&choices)
                .default(secretariat_default(&choices, previous.secretariat))
                .interact()?;
            criteria.secretariat = parse_secretariat_choice(&choices[idx]).unwrap_or(None);
        } else {
            let defaults = stage_defaults(&options.values, previous.selected(stage));
            let picked = MultiSelect::new()
                .with_prompt(format!(
                    "{} (space=toggle, enter=confirm, none=all)",
                    stage.label()
                ))
                .items(&options.values)
                .defaults(&defaults)
                .max_length(20)
                .interact()?;
            if let Some(slot) = criteria.selected_mut(stage) {
                *slot = picked
                    .into_iter()
                    .map(|i| options.values[i].clone())
                    .collect();
            }
        }

        log::debug!("[{stage}] selection: {criteria:?}");
    }

    Ok(criteria)
}

/// Index of the previously chosen secretariat in `choices`, or of `Todas`.
fn secretariat_default(choices: &[String], previous: Option<Secretariat>) -> usize {
    previous
        .and_then(|s| {
            let label = s.to_string();
            choices.iter().position(|c| *c == label)
        })
        .unwrap_or(0)
}

/// Pre-checks the values that were selected last time and are still offered.
fn stage_defaults(values: &[String], previous: &[String]) -> Vec<bool> {
    values.iter().map(|v| previous.contains(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn secretariat_default_finds_previous_choice() {
        let choices = strings(&["Todas", "Outros", "SCSP", "SG"]);
        assert_eq!(secretariat_default(&choices, None), 0);
        assert_eq!(secretariat_default(&choices, Some(Secretariat::Scsp)), 2);

        let narrowed = strings(&["Todas", "SG"]);
        assert_eq!(secretariat_default(&narrowed, Some(Secretariat::Other)), 0);
    }

    #[test]
    fn stage_defaults_keep_surviving_selections() {
        let values = strings(&["Centro", "Praia", "Trindade"]);
        let previous = strings(&["Praia", "Gone"]);
        assert_eq!(stage_defaults(&values, &previous), vec![false, true, false]);
    }

    #[test]
    fn actions_have_labels() {
        assert!(Action::ALL.iter().all(|a| !a.label().is_empty()));
        assert!(matches!(Action::ALL.last(), Some(Action::Quit)));
    }
}
