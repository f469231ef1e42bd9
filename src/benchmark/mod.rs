//! Standardised simulation runs against the lab, timed and reported as a table.

pub mod report;

#[cfg(test)]
mod tests;

use crate::common::errors::AppError;
use crate::lab::Lab;
use crate::lab::models::{Connectivity, Operation, OperationStatus, Project, SimulationParams};
use chrono::Local;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Region counts of the connectivities imported into every benchmark project.
pub const CONNECTIVITY_REGIONS: [u32; 3] = [68, 96, 192];

pub const INTEGRATOR: &str = "HeunDeterministic";

/// One combination of model, connectivity, length, step and conduction speed.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchCase<'a> {
    pub model_kw: &'a SimulationParams,
    pub connectivity: &'a Connectivity,
    pub sim_length: u32,
    pub dt: f64,
    pub conduction: f64,
}

impl BenchCase<'_> {
    pub fn model_name(&self) -> &str {
        self.model_kw.get("model").map_or("", String::as_str)
    }

    pub fn launch_params(&self) -> SimulationParams {
        let mut params = self.model_kw.clone();
        params.insert("connectivity".to_string(), self.connectivity.gid.clone());
        params.insert("simulation_length".to_string(), self.sim_length.to_string());
        params.insert("integrator".to_string(), INTEGRATOR.to_string());
        params.insert(
            format!("integrator_parameters_option_{INTEGRATOR}_dt"),
            format!("{:?}", self.dt),
        );
        params.insert("conduction_speed".to_string(), format!("{:?}", self.conduction));
        params
    }
}

#[derive(Debug, Clone)]
pub struct Bench {
    pub title: String,
    pub model_kws: Vec<SimulationParams>,
    pub connectivities: Vec<Connectivity>,
    pub conductions: Vec<f64>,
    pub int_dts: Vec<f64>,
    pub sim_lengths: Vec<u32>,
    running_times: Vec<chrono::Duration>,
}

impl Bench {
    pub fn new(
        title: &str,
        model_kws: Vec<SimulationParams>,
        connectivities: Vec<Connectivity>,
        conductions: Vec<f64>,
        int_dts: Vec<f64>,
        sim_lengths: Vec<u32>,
    ) -> Self {
        Bench {
            title: title.to_string(),
            model_kws,
            connectivities,
            conductions,
            int_dts,
            sim_lengths,
            running_times: Vec::new(),
        }
    }

    /// Every case, model outermost and conduction speed innermost.
    pub fn cases(&self) -> Vec<BenchCase<'_>> {
        let mut cases = Vec::new();
        for model_kw in &self.model_kws {
            for connectivity in &self.connectivities {
                for &sim_length in &self.sim_lengths {
                    for &dt in &self.int_dts {
                        for &conduction in &self.conductions {
                            cases.push(BenchCase {
                                model_kw,
                                connectivity,
                                sim_length,
                                dt,
                                conduction,
                            });
                        }
                    }
                }
            }
        }
        cases
    }

    pub fn running_times(&self) -> &[chrono::Duration] {
        &self.running_times
    }

    /// Launches the cases one after another, waiting for each to finish.
    ///
    /// The first failed or cancelled simulation aborts the run and leaves
    /// previously recorded times untouched.
    pub async fn run<L>(
        &mut self,
        lab: &L,
        project_id: i64,
        poll_interval: Duration,
        cancel: &CancellationToken,
    ) -> Result<(), AppError>
    where
        L: Lab + ?Sized,
    {
        let launches: Vec<SimulationParams> =
            self.cases().iter().map(BenchCase::launch_params).collect();

        let pb = ProgressBar::new(launches.len() as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}/{len:3} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
        );

        let mut times = Vec::with_capacity(launches.len());
        for params in &launches {
            pb.set_message(params.get("model").cloned().unwrap_or_default());
            let launched = lab.fire_simulation(project_id, params).await?;
            tracing::debug!(operation_id = launched.id, ?params, "Launched simulation");

            let operation = match wait_for_operation(lab, launched, poll_interval, cancel).await {
                Ok(operation) => operation,
                Err(e) => {
                    pb.abandon_with_message("failed");
                    return Err(e);
                }
            };
            let elapsed = operation.running_time().ok_or_else(|| AppError::InternalError {
                message: format!("operation {} finished without start/completion dates", operation.id),
            })?;
            times.push(elapsed);
            pb.inc(1);
        }
        pb.finish_with_message("done");

        self.running_times = times;
        Ok(())
    }

    /// Header followed by one row per recorded case, in run order.
    pub fn report(&self) -> String {
        let line = report::separator_line();
        let mut out = String::from(report::HEADER);
        out.push('\n');
        for (case, elapsed) in self.cases().iter().zip(&self.running_times) {
            let row = report::format_row(&[
                case.model_name().to_string(),
                case.sim_length.to_string(),
                case.connectivity.number_of_regions.to_string(),
                format!("{:?}", case.conduction),
                format!("{:?}", case.dt),
                report::format_running_time(*elapsed),
            ]);
            out.push_str(&row);
            out.push('\n');
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

/// Polls the lab until `operation` reaches a terminal state.
///
/// Anything but FINISHED is an error carrying the lab's diagnostic.
pub async fn wait_for_operation<L>(
    lab: &L,
    mut operation: Operation,
    poll_interval: Duration,
    cancel: &CancellationToken,
) -> Result<Operation, AppError>
where
    L: Lab + ?Sized,
{
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // first tick completes immediately
    ticker.tick().await;

    while !operation.has_finished() {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(AppError::Cancelled),
            _ = ticker.tick() => {}
        }
        operation = lab.get_operation_by_id(operation.id).await?;
    }

    if operation.status != OperationStatus::Finished {
        tracing::error!(operation_id = operation.id, status = ?operation.status, "Simulation failed");
        return Err(AppError::SimulationFailed {
            operation_id: operation.id,
            message: operation.additional_info.unwrap_or_default(),
        });
    }
    Ok(operation)
}

/// New project holding the 68, 96 and 192 region connectivities.
pub async fn create_bench_project<L>(
    lab: &L,
    data_dir: &Path,
) -> Result<(Project, Vec<Connectivity>), AppError>
where
    L: Lab + ?Sized,
{
    let name = format!(
        "benchmark_project_ {}",
        Local::now().format("%Y-%m-%d %H:%M:%S%.6f")
    );
    let project = lab.new_project(&name).await?;
    tracing::info!(project_id = project.id, name = %project.name, "Created benchmark project");

    let conn_dir = data_dir.join("connectivity");
    for regions in CONNECTIVITY_REGIONS {
        let zip_path = conn_dir.join(format!("connectivity_{regions}.zip"));
        lab.import_conn_zip(project.id, &zip_path).await?;
    }

    let mut connectivities = Vec::with_capacity(CONNECTIVITY_REGIONS.len());
    for regions in CONNECTIVITY_REGIONS {
        connectivities.push(lab.connectivity_by_regions(project.id, regions).await?);
    }
    Ok((project, connectivities))
}

fn model_kw(pairs: &[(&str, &str)]) -> SimulationParams {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

pub fn default_suites(connectivities: &[Connectivity]) -> Vec<Bench> {
    vec![
        Bench::new(
            "Generic2dOscillator and Epileptor",
            vec![
                model_kw(&[("model", "Generic2dOscillator")]),
                model_kw(&[("model", "Epileptor")]),
            ],
            connectivities.to_vec(),
            vec![30.0, 3.0],
            vec![0.1, 0.05],
            vec![1000],
        ),
        Bench::new(
            "LarterBreakspear",
            vec![model_kw(&[
                ("model", "LarterBreakspear"),
                ("coupling", "HyperbolicTangent"),
            ])],
            connectivities.to_vec(),
            vec![10.0],
            vec![0.2, 0.1],
            vec![10000],
        ),
    ]
}

/// Creates the project, then runs and prints each default suite in turn.
pub async fn run_default_suites<L>(
    lab: &L,
    data_dir: &Path,
    poll_interval: Duration,
    cancel: &CancellationToken,
) -> Result<Vec<Bench>, AppError>
where
    L: Lab + ?Sized,
{
    let (project, connectivities) = create_bench_project(lab, data_dir).await?;

    let mut suites = default_suites(&connectivities);
    for bench in &mut suites {
        println!("{}", style(&bench.title).bold());
        bench.run(lab, project.id, poll_interval, cancel).await?;
        print!("{}", bench.report());
    }
    Ok(suites)
}
