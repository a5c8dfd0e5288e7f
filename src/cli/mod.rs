//! CLI command handling
//!
//! Loads the project, dispatches commands and formats output.

mod progress;

use colored::Colorize;
use std::path::Path;

use crate::commands::{Commands, GraphCommands};
use crate::common::paths::ENV_API;
use crate::common::{Error, Result};
use crate::engine::{resolve, RunObserver, RunReport, SequenceExecutor, WorkingGraph};
use crate::http::{ReqwestTransport, Transport};
use crate::project::builder::{build_graph, describe_entry, links_of, LinkSheet};
use crate::project::{InputValues, Project, Scenario};
use crate::results::{summarize, ScenarioSummary};

use progress::TerminalObserver;

/// Load a scenario and run it, recording into the project's result store
///
/// The interaction file is only read. Responses captured by the run live in
/// the returned report and the result store, so the next run starts from the
/// same stored responses as this one.
pub async fn run_scenario<O, F>(
    project: &Project,
    scenario: &str,
    transport: &dyn Transport,
    make_observer: F,
) -> Result<RunReport>
where
    O: RunObserver + 'static,
    F: FnOnce(&Scenario) -> O,
{
    let loaded = project.load_scenario(scenario)?;
    let mut store = project.open_results()?;
    let observer = make_observer(&loaded);
    let report = SequenceExecutor::new(transport, &mut store)
        .with_observer(observer)
        .run(&loaded)
        .await;
    report
}

/// Dispatch a CLI command
///
/// Returns `Ok(false)` when the command ran but found failures, so the
/// caller can exit non-zero.
pub async fn dispatch(project_dir: &Path, verbose: bool, command: Commands) -> Result<bool> {
    let project = Project::open(project_dir)?;

    match command {
        Commands::Run { scenario } => {
            let transport = ReqwestTransport::new(&project.config().http)?;

            println!(
                "\n{} {}",
                "Running Scenario:".blue().bold(),
                scenario.white().bold()
            );

            let report = run_scenario(&project, &scenario, &transport, |loaded| {
                let total_calls: usize = loaded
                    .sequence()
                    .iter()
                    .map(|api| loaded.cases.total(api))
                    .sum();
                TerminalObserver::new(total_calls as u64, verbose)
            })
            .await?;
            println!("\nResults written to {}", project.results_path().display());

            Ok(report.all_passed())
        }

        Commands::Resolve {
            scenario,
            api,
            iteration,
        } => {
            if iteration == 0 {
                return Err(Error::Config(
                    "Test case numbers start at 1".to_string(),
                ));
            }
            let loaded = project.load_scenario(&scenario)?;
            if api == ENV_API || !loaded.registry.contains(&api) {
                return Err(Error::UnknownApi(api));
            }

            let mut working = WorkingGraph::new(&loaded.graph);
            let mut env = loaded.env.clone();
            let no_inputs = InputValues::new();
            if working.pending_waves(ENV_API) > 0 {
                resolve(ENV_API, &loaded.registry, &mut working, &mut env, &no_inputs)?;
            }

            let inputs = match loaded.cases.input(&api, iteration - 1) {
                Some(inputs) => inputs,
                None => {
                    println!(
                        "{} No testcase #{} for {}; resolving without inputs",
                        "⚠".yellow(),
                        iteration,
                        api
                    );
                    &no_inputs
                }
            };

            let request = resolve(&api, &loaded.registry, &mut working, &mut env, inputs)?
                .ok_or_else(|| Error::Internal(format!("No request resolved for {}", api)))?;
            println!("{}", serde_json::to_string_pretty(&request)?);
            Ok(true)
        }

        Commands::Graph(graph_cmd) => match graph_cmd {
            GraphCommands::Build { scenario, links } => {
                let registry = project.load_registry()?;
                let sheet = LinkSheet::load(&links)?;

                let mut apis: Vec<String> = registry.names().map(String::from).collect();
                for api in sheet.apis {
                    if !apis.contains(&api) {
                        apis.push(api);
                    }
                }

                let graph = build_graph(&apis, &sheet.links);
                project.save_graph(&scenario, &graph)?;

                println!(
                    "Interaction graph for '{}' written to {} ({} APIs, {} links)",
                    scenario,
                    project.interactions_path(&scenario).display(),
                    graph.nodes().count(),
                    sheet.links.len()
                );
                Ok(true)
            }

            GraphCommands::Show { scenario } => {
                let graph = project.load_graph(&scenario)?;
                let links = links_of(&graph);

                for (api, node) in graph.nodes() {
                    println!("{} ({} waves)", api.white().bold(), node.levels.len());

                    let mut incoming: Vec<_> = links.iter().filter(|l| l.input == api).collect();
                    incoming.sort_by_key(|l| if l.level == 0 { u32::MAX } else { l.level });

                    if incoming.is_empty() {
                        println!("  {}", "no dependencies".dimmed());
                    }
                    for link in incoming {
                        let level = if link.level == 0 {
                            "--".to_string()
                        } else {
                            format!("L{}", link.level)
                        };
                        println!(
                            "  {} {} {}",
                            level.cyan(),
                            link.output,
                            describe_entry(&link.entry).dimmed()
                        );
                    }
                }
                Ok(true)
            }
        },

        Commands::Report { scenario, json } => {
            let store = project.open_results()?;
            let results = store
                .scenario(&scenario)
                .ok_or_else(|| Error::ScenarioNotFound(scenario.clone()))?;
            let registry = project.load_registry()?;
            let summary = summarize(&scenario, results, &registry);

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
            Ok(summary.failed == 0)
        }
    }
}

fn print_summary(summary: &ScenarioSummary) {
    println!("{} {}", "Scenario:".bold(), summary.scenario);
    println!("  Total no. of APIs:              {}", summary.total_apis);
    println!("  Total no. of testcases per API: {}", summary.max_cases_per_api);
    println!(
        "  Passed: {}  Failed: {}",
        summary.passed.to_string().green(),
        summary.failed.to_string().red()
    );

    println!("\n{}", "Error Code Summary".cyan());
    if summary.error_codes.is_empty() {
        println!("  No failed testcases.");
    }
    for (code, count) in &summary.error_codes {
        println!("  {:>5}  {}", code, count);
    }

    println!("\n{}", "Failed API Endpoints".cyan());
    if summary.failed_endpoints.is_empty() {
        println!("  No failed API endpoints.");
    }
    for failed in &summary.failed_endpoints {
        println!(
            "  {} {} testcases: {}",
            failed.endpoint,
            failed.status_code.to_string().red(),
            failed.iterations.join("; ")
        );
    }
}
