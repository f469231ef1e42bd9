use super::report::{column_widths, format_row, format_running_time, separator_line};
use super::*;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

/// Lab double: every simulation runs for `id` seconds and a half, finishing
/// after `polls_to_finish` status requests.
struct FakeLab {
    next_id: AtomicI64,
    polls_to_finish: usize,
    failure: Option<String>,
    launched: Mutex<Vec<SimulationParams>>,
    imported: Mutex<Vec<PathBuf>>,
    polls: Mutex<HashMap<i64, usize>>,
}

impl FakeLab {
    fn new(polls_to_finish: usize) -> Self {
        FakeLab {
            next_id: AtomicI64::new(1),
            polls_to_finish,
            failure: None,
            launched: Mutex::new(Vec::new()),
            imported: Mutex::new(Vec::new()),
            polls: Mutex::new(HashMap::new()),
        }
    }

    fn failing(message: &str) -> Self {
        FakeLab {
            failure: Some(message.to_string()),
            ..FakeLab::new(1)
        }
    }

    fn operation(id: i64, status: OperationStatus) -> Operation {
        let start = Utc.with_ymd_and_hms(2013, 11, 20, 10, 0, 0).unwrap();
        let finished = status.is_terminal();
        Operation {
            id,
            status,
            start_date: Some(start),
            completion_date: finished
                .then(|| start + chrono::Duration::milliseconds(id * 1000 + 500)),
            additional_info: None,
        }
    }
}

#[async_trait]
impl Lab for FakeLab {
    async fn new_project(&self, name: &str) -> Result<Project, AppError> {
        Ok(Project {
            id: 9,
            name: name.to_string(),
        })
    }

    async fn import_conn_zip(&self, _project_id: i64, path: &Path) -> Result<(), AppError> {
        self.imported.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    async fn connectivity_by_regions(
        &self,
        _project_id: i64,
        number_of_regions: u32,
    ) -> Result<Connectivity, AppError> {
        Ok(conn(number_of_regions))
    }

    async fn fire_simulation(
        &self,
        _project_id: i64,
        params: &SimulationParams,
    ) -> Result<Operation, AppError> {
        self.launched.lock().unwrap().push(params.clone());
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(FakeLab::operation(id, OperationStatus::Started))
    }

    async fn get_operation_by_id(&self, operation_id: i64) -> Result<Operation, AppError> {
        let mut polls = self.polls.lock().unwrap();
        let count = polls.entry(operation_id).or_insert(0);
        *count += 1;
        if *count < self.polls_to_finish {
            return Ok(FakeLab::operation(operation_id, OperationStatus::Started));
        }
        match &self.failure {
            Some(message) => {
                let mut op = FakeLab::operation(operation_id, OperationStatus::Error);
                op.additional_info = Some(message.clone());
                Ok(op)
            }
            None => Ok(FakeLab::operation(operation_id, OperationStatus::Finished)),
        }
    }
}

fn conn(regions: u32) -> Connectivity {
    Connectivity {
        id: i64::from(regions),
        gid: format!("conn-{regions}"),
        number_of_regions: regions,
    }
}

fn small_bench() -> Bench {
    Bench::new(
        "Generic2dOscillator and Epileptor",
        vec![
            model_kw(&[("model", "Generic2dOscillator")]),
            model_kw(&[("model", "Epileptor")]),
        ],
        vec![conn(68), conn(192)],
        vec![30.0, 3.0],
        vec![0.1],
        vec![1000],
    )
}

const FAST_POLL: Duration = Duration::from_millis(1);

#[test]
fn test_header_column_widths() {
    assert_eq!(column_widths(), vec![22, 6, 5, 9, 7, 9]);
    assert_eq!(separator_line().len(), 77);
    assert!(separator_line().starts_with("+---"));
}

#[test]
fn test_format_row_right_aligns() {
    let row = format_row(&["Generic2dOscillator", "1000", "68", "30.0", "0.1", "00:01.5"]);
    assert_eq!(
        row,
        "|    Generic2dOscillator |   1000 |    68 |      30.0 |     0.1 |   00:01.5 |"
    );
    assert_eq!(row.len(), separator_line().len());
}

#[test]
fn test_format_running_time() {
    assert_eq!(format_running_time(chrono::Duration::milliseconds(1_500)), "00:01.5");
    assert_eq!(format_running_time(chrono::Duration::milliseconds(123_590)), "02:03.5");
    assert_eq!(format_running_time(chrono::Duration::seconds(3_725)), "62:05.0");
    assert_eq!(format_running_time(chrono::Duration::milliseconds(-10)), "00:00.0");
}

#[test]
fn test_cases_enumeration_order() {
    let bench = small_bench();
    let order: Vec<(String, u32, String)> = bench
        .cases()
        .iter()
        .map(|c| {
            (
                c.model_name().to_string(),
                c.connectivity.number_of_regions,
                format!("{:?}", c.conduction),
            )
        })
        .collect();

    let expected = [
        ("Generic2dOscillator", 68, "30.0"),
        ("Generic2dOscillator", 68, "3.0"),
        ("Generic2dOscillator", 192, "30.0"),
        ("Generic2dOscillator", 192, "3.0"),
        ("Epileptor", 68, "30.0"),
        ("Epileptor", 68, "3.0"),
        ("Epileptor", 192, "30.0"),
        ("Epileptor", 192, "3.0"),
    ];
    assert_eq!(order.len(), expected.len());
    for (got, want) in order.iter().zip(expected) {
        assert_eq!((got.0.as_str(), got.1, got.2.as_str()), want);
    }
}

#[test]
fn test_launch_params() {
    let suites = default_suites(&[conn(96)]);
    let larter = &suites[1];
    let cases = larter.cases();
    assert_eq!(cases.len(), 2);

    let params = cases[0].launch_params();
    let expected = model_kw(&[
        ("model", "LarterBreakspear"),
        ("coupling", "HyperbolicTangent"),
        ("connectivity", "conn-96"),
        ("simulation_length", "10000"),
        ("integrator", "HeunDeterministic"),
        ("integrator_parameters_option_HeunDeterministic_dt", "0.2"),
        ("conduction_speed", "10.0"),
    ]);
    assert_eq!(params, expected);
}

#[test]
fn test_default_suite_sizes() {
    let conns: Vec<Connectivity> = CONNECTIVITY_REGIONS.iter().map(|&n| conn(n)).collect();
    let suites = default_suites(&conns);
    assert_eq!(suites[0].title, "Generic2dOscillator and Epileptor");
    assert_eq!(suites[0].cases().len(), 2 * 3 * 2 * 2);
    assert_eq!(suites[1].title, "LarterBreakspear");
    assert_eq!(suites[1].cases().len(), 3 * 2);
}

#[tokio::test]
async fn test_create_bench_project() {
    let lab = FakeLab::new(1);
    let data_dir = PathBuf::from("/opt/tvb_data");

    let (project, connectivities) = create_bench_project(&lab, &data_dir).await.unwrap();
    assert!(project.name.starts_with("benchmark_project_ "));
    assert_eq!(
        connectivities
            .iter()
            .map(|c| c.number_of_regions)
            .collect::<Vec<_>>(),
        vec![68, 96, 192]
    );
    assert_eq!(
        *lab.imported.lock().unwrap(),
        vec![
            data_dir.join("connectivity/connectivity_68.zip"),
            data_dir.join("connectivity/connectivity_96.zip"),
            data_dir.join("connectivity/connectivity_192.zip"),
        ]
    );
}

#[tokio::test]
async fn test_run_records_times_and_reports_in_order() {
    let lab = FakeLab::new(2);
    let mut bench = small_bench();

    bench
        .run(&lab, 9, FAST_POLL, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(lab.launched.lock().unwrap().len(), 8);
    assert_eq!(bench.running_times().len(), 8);
    assert_eq!(bench.running_times()[0], chrono::Duration::milliseconds(1_500));

    let report = bench.report();
    let lines: Vec<&str> = report.lines().collect();
    let header_lines = report::HEADER.lines().count();
    assert_eq!(lines.len(), header_lines + 8 * 2);

    let rows = &lines[header_lines..];
    assert_eq!(
        rows[0],
        "|    Generic2dOscillator |   1000 |    68 |      30.0 |     0.1 |   00:01.5 |"
    );
    assert_eq!(rows[1], separator_line());
    assert_eq!(
        rows[14],
        "|              Epileptor |   1000 |   192 |       3.0 |     0.1 |   00:08.5 |"
    );
    assert!(rows.iter().all(|row| row.len() == 77));
}

#[tokio::test]
async fn test_failed_simulation_surfaces_diagnostic() {
    let lab = FakeLab::failing("Integrator diverged at t=12.5");
    let mut bench = small_bench();

    let err = bench
        .run(&lab, 9, FAST_POLL, &CancellationToken::new())
        .await
        .unwrap_err();
    match err {
        AppError::SimulationFailed {
            operation_id,
            message,
        } => {
            assert_eq!(operation_id, 1);
            assert_eq!(message, "Integrator diverged at t=12.5");
        }
        other => panic!("Expected simulation failure, got {other:?}"),
    }
    // no retry and no further launches
    assert_eq!(lab.launched.lock().unwrap().len(), 1);
    assert!(bench.running_times().is_empty());
}

#[tokio::test]
async fn test_wait_returns_immediately_when_finished() {
    let lab = FakeLab::new(1);
    let done = FakeLab::operation(4, OperationStatus::Finished);

    let op = wait_for_operation(&lab, done.clone(), FAST_POLL, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(op, done);
    assert!(lab.polls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_wait_is_cancellable() {
    let lab = FakeLab::new(usize::MAX);
    let cancel = CancellationToken::new();
    let started = FakeLab::operation(3, OperationStatus::Started);

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let err = wait_for_operation(&lab, started, FAST_POLL, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Cancelled));
    assert!(lab.polls.lock().unwrap()[&3] >= 1);
}

#[tokio::test]
async fn test_cancelled_token_stops_run() {
    let lab = FakeLab::new(usize::MAX);
    let cancel = CancellationToken::new();
    cancel.cancel();
    let mut bench = small_bench();

    let err = bench.run(&lab, 9, FAST_POLL, &cancel).await.unwrap_err();
    assert!(matches!(err, AppError::Cancelled));
    assert_eq!(lab.launched.lock().unwrap().len(), 1);
}
