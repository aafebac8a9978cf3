use anyhow::Result;
use korea_democracy::config::Config;
use korea_democracy::error::IntegrationError;
use korea_democracy::pipeline::coverage::YearSpan;
use korea_democracy::pipeline::{run_coverage, run_integration};
use korea_democracy::storage::{FsOutputStore, InMemoryOutputStore};
use korea_democracy::types::FileStatus;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const FREEDOM_HOUSE: &str = "country,year,pr,cl,status
\"Korea, South\",1987,4,4,PF
\"Korea, South\",1988,2,3,F
Japan,1988,1,1,F
\"Korea, North\",1988,7,7,NF
\"Korea, South\",1991,2,2,F
";

const POLITY: &str = "scode;country;year;polity2;democ
ROK;Korea South;1988;6;6
ROK;Korea South;1989;6;6
PRK;Korea North;1989;-10;0
";

// "Corée du Sud" in ISO-8859-1; Japan's lower bound looks like the COW code
const VDEM_LATIN1: &[u8] = b"country_name,year,v2x_polyarchy,v2x_polyarchy_codelow
Cor\xe9e du Sud,1992,0.8,0.701
Japon,1992,0.9,0.732
";

fn write(path: &Path, contents: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn dataset_tree(root: &Path) {
    write(&root.join("freedom_house/fh.csv"), FREEDOM_HOUSE.as_bytes());
    write(&root.join("freedom_house/fh.sample.csv"), b"country,year,pr\nKorea,1950,1\n");
    write(&root.join("freedom_house/notes.csv"), b"just one column\nvalue\n");
    write(&root.join("polity/data/polity.csv"), POLITY.as_bytes());
    write(&root.join("vdem/vdem.csv"), VDEM_LATIN1);
    write(&root.join("other/world.csv"), b"country,year,score\nJapan,2000,50\nFrance,2000,80\nGermany,2000,70,extra\n");
}

fn config_for(root: &Path, output: &Path) -> Config {
    Config {
        dataset_root: root.to_path_buf(),
        output_dir: output.to_path_buf(),
        ..Config::default()
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn test_integration_builds_gap_filled_timeline() -> Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path().join("dataset");
    dataset_tree(&root);

    let store = InMemoryOutputStore::new();
    let config = config_for(&root, &temp_dir.path().join("output"));
    let run = run_integration(&config, &store)?;

    let result = &run.result;
    assert_eq!(result.all_years, vec![1987, 1988, 1989, 1991, 1992]);
    assert_eq!(
        result.time_series.keys().cloned().collect::<Vec<_>>(),
        vec![
            "freedom_house_cl",
            "freedom_house_pr",
            "polity_democ",
            "polity_polity2",
            "vdem_v2x_polyarchy",
        ]
    );

    let web = &result.web_data;
    assert_eq!(web.metadata.total_years, 5);
    assert_eq!(web.metadata.year_range.start, Some(1987));
    assert_eq!(web.metadata.year_range.end, Some(1992));
    assert_eq!(web.metadata.datasets_used, vec!["freedom_house", "polity", "vdem"]);
    assert_eq!(web.metadata.indicators_count, 5);
    assert_eq!(web.metadata.interpolation_applied, Some(true));

    let years: Vec<i32> = web.timeline.iter().map(|t| t.year).collect();
    assert_eq!(years, (1987..=1992).collect::<Vec<_>>());

    let entry = |year: i32| web.timeline.iter().find(|t| t.year == year).unwrap();

    assert!(approx(entry(1987).democracy_score.unwrap(), 0.0));
    // pr 2 and cl 3 on the reversed 1-7 scale, polity2 6 and democ 6
    let e1988 = entry(1988);
    assert!(approx(e1988.democracy_score.unwrap(), 4.5));
    assert_eq!(e1988.data_sources, vec!["freedom_house", "polity"]);
    assert_eq!(e1988.indicators.len(), 4);
    assert!(approx(entry(1989).democracy_score.unwrap(), 4.0));

    let e1990 = entry(1990);
    assert_eq!(e1990.data_sources, vec!["interpolated"]);
    assert!(e1990.indicators.is_empty());
    assert!(approx(e1990.democracy_score.unwrap(), (4.0 + 20.0 / 3.0) / 2.0));

    assert!(approx(entry(1992).democracy_score.unwrap(), 6.0));
    assert_eq!(entry(1992).data_sources, vec!["vdem"]);

    Ok(())
}

#[test]
fn test_integration_reports_every_file() -> Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path().join("dataset");
    dataset_tree(&root);

    let store = InMemoryOutputStore::new();
    let run = run_integration(&config_for(&root, temp_dir.path()), &store)?;
    let results = &run.result.dataset_results;

    let fh = &results["freedom_house"];
    assert_eq!(fh.files_processed, 1);
    assert_eq!(fh.korea_data_found, 1);
    assert_eq!(fh.files.len(), 2);
    assert_eq!(fh.files[0].file, "fh.csv");
    assert_eq!(fh.files[0].status, FileStatus::KoreaData);
    assert_eq!(fh.files[0].korea_rows, 3);
    assert_eq!(fh.files[1].file, "notes.csv");
    assert_eq!(fh.files[1].status, FileStatus::Unreadable);
    // status is recognised but never yields a score
    assert!(fh.indicators_found.contains_key("status"));
    assert!(!fh.time_series_data.contains_key("freedom_house_status"));

    let polity = &results["polity"];
    assert_eq!(polity.files[0].delimiter.as_deref(), Some(";"));
    assert_eq!(polity.years_covered, vec![1988, 1989]);

    let vdem = &results["vdem"];
    assert_eq!(vdem.files[0].encoding.as_deref(), Some("latin-1"));
    assert_eq!(vdem.files[0].korea_columns, vec!["country_name"]);
    assert_eq!(vdem.files[0].korea_rows, 1);

    let other = &results["other"];
    assert_eq!(other.files_processed, 1);
    assert_eq!(other.korea_data_found, 0);
    assert_eq!(other.files[0].status, FileStatus::NoKoreaData);
    assert_eq!(other.files[0].skipped_lines, 1);
    assert_eq!(fh.files[0].skipped_lines, 0);

    Ok(())
}

#[test]
fn test_integration_writes_outputs() -> Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path().join("dataset");
    dataset_tree(&root);

    let store = InMemoryOutputStore::new();
    let run = run_integration(&config_for(&root, temp_dir.path()), &store)?;

    assert_eq!(
        store.names(),
        vec![
            "korea_democracy_data.json",
            "korea_democracy_data_compact.json",
            "korea_democracy_detailed_results.json",
            "korea_democracy_integration_summary.txt",
        ]
    );
    assert_eq!(run.output_files.len(), 4);

    let web: serde_json::Value =
        serde_json::from_str(&store.get("korea_democracy_data.json").unwrap())?;
    assert_eq!(web["metadata"]["interpolation_applied"], true);
    assert_eq!(web["timeline"].as_array().unwrap().len(), 6);
    assert_eq!(web["timeline"][0]["indicators"]["freedom_house_pr"]["raw_value"], 4);
    assert_eq!(web["indicators_info"]["polity_polity2"]["name"], "Polity Score Modified");

    let summary = store.get("korea_democracy_integration_summary.txt").unwrap();
    assert_eq!(summary, run.summary);
    assert!(summary.contains("Time range: 1987 - 1992"));
    assert!(summary.contains("Interpolated data points: 1"));
    assert!(summary.contains("Trend: Improving"));

    Ok(())
}

#[test]
fn test_coverage_over_dataset_tree() -> Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path().join("dataset");
    let output = temp_dir.path().join("output");
    dataset_tree(&root);

    let store = FsOutputStore::new(&output);
    let run = run_coverage(&config_for(&root, &output), &store)?;
    let report = &run.report;

    let fh = &report.datasets["freedom_house"];
    assert_eq!(fh.files_analyzed, 1);
    assert_eq!(fh.files_with_korea, 1);
    assert_eq!(fh.total_korea_rows, 3);
    assert_eq!(fh.years_found, vec![1987, 1988, 1991]);
    assert_eq!(fh.year_range, Some(YearSpan { start: 1987, end: 1991 }));

    assert_eq!(report.datasets["vdem"].file_details["vdem.csv"].encoding, "latin-1");
    assert_eq!(report.datasets["vdem"].total_korea_rows, 1);
    assert_eq!(report.datasets["other"].files_with_korea, 0);
    assert!(!report.dataset_years().contains_key("other"));

    let common = report.common_periods.as_ref().unwrap();
    assert_eq!(common.min_datasets, 2);
    assert_eq!(common.years, vec![1988]);
    assert_eq!(common.longest_period, YearSpan { start: 1988, end: 1988 });
    assert_eq!(
        common.contributing_datasets.keys().cloned().collect::<Vec<_>>(),
        vec!["freedom_house", "polity"]
    );

    let rec = report.recommendations.as_ref().unwrap();
    assert_eq!(rec.overall_range, YearSpan { start: 1987, end: 1992 });
    assert_eq!(rec.unique_years, 5);
    assert_eq!(rec.top_datasets[0].dataset, "freedom_house");
    assert_eq!(rec.focus_period.as_ref().unwrap().min_datasets, 1);

    let text = fs::read_to_string(output.join("korea_data_coverage_report.txt"))?;
    assert_eq!(text, run.report_text);
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output.join("korea_data_coverage.json"))?)?;
    assert_eq!(json["datasets"]["polity"]["unique_years"], 2);

    Ok(())
}

#[test]
fn test_missing_dataset_root_is_an_error() {
    let temp_dir = tempdir().unwrap();
    let config = config_for(&temp_dir.path().join("missing"), temp_dir.path());
    let store = InMemoryOutputStore::new();

    let err = run_integration(&config, &store).unwrap_err();
    assert!(matches!(err, IntegrationError::DatasetRoot(_)));
    assert!(store.names().is_empty());
}
