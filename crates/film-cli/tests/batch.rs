//! End-to-end batch runs against a temporary directory.

use std::fs;
use std::path::{Path, PathBuf};

use film_analytics::queries;
use film_cli::batch::{BatchOptions, run_batch};
use film_cli::types::AnalysisStatus;
use film_output::{MANIFEST_FILE, Manifest, sha256_hex};
use tempfile::TempDir;

const MOVIES: &str = "\
original_title,cast,director,genres,budget,revenue,release_date,release_year,vote_average,vote_count
Alpha,X|Y,Dir A,Drama|Comedy,40,100,3/5/2019,2019,8.25,100
Beta,Y|Y,Dir B,Drama,250,300,12//2018,2018,7.75,50
Gamma,Z,Dir A,Action|Drama,50,200,7/4/2019,2019,6.5,10
Delta,,Dir B,,10,oops,1/1/2018,2018,8.25,300
";

const NO_CAST: &str = "\
original_title,director,genres,budget,revenue,release_date,release_year,vote_average,vote_count
Alpha,Dir A,Drama,40,100,3/5/2019,2019,8.25,100
";

fn write_input(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("movies.csv");
    fs::write(&path, contents).unwrap();
    path
}

fn read_manifest(dir: &Path) -> Manifest {
    let bytes = fs::read(dir.join(MANIFEST_FILE)).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn csv_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn writes_every_artifact_and_a_manifest() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, MOVIES);
    let options = BatchOptions::new(&input);
    let result = run_batch(&options).unwrap();

    assert!(!result.has_errors);
    assert_eq!(result.rows_loaded, 4);
    assert_eq!(result.output_dir, dir.path().join("output"));
    assert_eq!(result.analyses.len(), 10);
    assert!(
        result
            .analyses
            .iter()
            .all(|a| a.status == AnalysisStatus::Written)
    );

    let manifest = read_manifest(&result.output_dir);
    assert_eq!(manifest.artifacts.len(), 10);
    assert!(manifest.failures.is_empty());
    assert_eq!(manifest.input_sha256.as_deref().map(str::len), Some(64));
    for entry in &manifest.artifacts {
        assert!(result.output_dir.join(&entry.file).is_file(), "{}", entry.file);
    }

    let total = csv_lines(&result.output_dir.join("total-revenue.csv"));
    assert_eq!(total, vec!["total_revenue", "600"]);
    let director = csv_lines(&result.output_dir.join("top-director.csv"));
    assert_eq!(director, vec!["director,movie_count", "Dir A,2"]);
}

#[test]
fn manifest_checksum_matches_the_loaded_bytes() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, MOVIES);
    let options = BatchOptions {
        only: vec![queries::TOTAL_REVENUE.to_string()],
        ..BatchOptions::new(&input)
    };
    run_batch(&options).unwrap();
    let manifest = read_manifest(&options.output_dir);
    assert_eq!(manifest.input_sha256, Some(sha256_hex(MOVIES.as_bytes())));
}

#[test]
fn rerun_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, MOVIES);
    let options = BatchOptions::new(&input);

    run_batch(&options).unwrap();
    let first = fs::read(options.output_dir.join(MANIFEST_FILE)).unwrap();
    let first_sorted = fs::read(options.output_dir.join("sorted-by-date.csv")).unwrap();
    run_batch(&options).unwrap();
    let second = fs::read(options.output_dir.join(MANIFEST_FILE)).unwrap();
    let second_sorted = fs::read(options.output_dir.join("sorted-by-date.csv")).unwrap();

    assert_eq!(first, second);
    assert_eq!(first_sorted, second_sorted);
}

#[test]
fn dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, MOVIES);
    let options = BatchOptions {
        dry_run: true,
        ..BatchOptions::new(&input)
    };
    let result = run_batch(&options).unwrap();

    assert!(result.manifest.is_none());
    assert!(!options.output_dir.exists());
    assert!(
        result
            .analyses
            .iter()
            .all(|a| a.status == AnalysisStatus::Computed && a.rows.is_some())
    );
}

#[test]
fn only_limits_the_artifacts() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, MOVIES);
    let options = BatchOptions {
        only: vec![
            queries::GENRE_DISTRIBUTION.to_string(),
            queries::TOTAL_REVENUE.to_string(),
        ],
        jobs: Some(1),
        ..BatchOptions::new(&input)
    };
    let result = run_batch(&options).unwrap();

    let names: Vec<&str> = result.analyses.iter().map(|a| a.name).collect();
    assert_eq!(names, [queries::TOTAL_REVENUE, queries::GENRE_DISTRIBUTION]);
    assert_eq!(read_manifest(&options.output_dir).artifacts.len(), 2);
    assert!(!options.output_dir.join("top-actor.csv").exists());
}

#[test]
fn unknown_analysis_name_is_rejected_before_loading() {
    let dir = TempDir::new().unwrap();
    let options = BatchOptions {
        only: vec!["box-office".to_string()],
        ..BatchOptions::new(dir.path().join("absent.csv"))
    };
    let err = run_batch(&options).unwrap_err();
    assert!(err.to_string().contains("box-office"), "{err}");
}

#[test]
fn missing_input_aborts_the_batch() {
    let dir = TempDir::new().unwrap();
    let options = BatchOptions::new(dir.path().join("absent.csv"));
    let err = run_batch(&options).unwrap_err();
    assert!(format!("{err:#}").contains("absent.csv"));
    assert!(!options.output_dir.exists());
}

#[test]
fn required_columns_are_checked_at_load() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, NO_CAST);
    let err = run_batch(&BatchOptions::new(&input)).unwrap_err();
    assert!(format!("{err:#}").contains("cast"), "{err:#}");
}

#[test]
fn missing_column_fails_one_analysis_and_keeps_the_rest() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, NO_CAST);
    let options = BatchOptions {
        require_movie_columns: false,
        ..BatchOptions::new(&input)
    };
    let result = run_batch(&options).unwrap();

    assert!(result.has_errors);
    let failed: Vec<&str> = result
        .analyses
        .iter()
        .filter(|a| a.status.is_failure())
        .map(|a| a.name)
        .collect();
    assert_eq!(failed, [queries::TOP_ACTOR]);

    let manifest = read_manifest(&options.output_dir);
    assert_eq!(manifest.artifacts.len(), 9);
    assert_eq!(manifest.failures.len(), 1);
    assert_eq!(manifest.failures[0].name, queries::TOP_ACTOR);
    assert!(manifest.failures[0].error.contains("cast"));
    assert!(options.output_dir.join("yearly-rollup.csv").is_file());
}

#[test]
fn fail_fast_skips_everything_after_the_first_failure() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, NO_CAST);
    let options = BatchOptions {
        require_movie_columns: false,
        fail_fast: true,
        ..BatchOptions::new(&input)
    };
    let result = run_batch(&options).unwrap();

    let statuses: Vec<(&str, &AnalysisStatus)> = result
        .analyses
        .iter()
        .map(|a| (a.name, &a.status))
        .collect();
    let actor = statuses
        .iter()
        .position(|(name, _)| *name == queries::TOP_ACTOR)
        .unwrap();
    assert!(statuses[..actor].iter().all(|(_, s)| **s == AnalysisStatus::Written));
    assert!(statuses[actor].1.is_failure());
    assert!(statuses[actor + 1..].iter().all(|(_, s)| **s == AnalysisStatus::Skipped));

    let manifest = read_manifest(&options.output_dir);
    assert_eq!(manifest.artifacts.len(), actor);
    assert!(!options.output_dir.join("genre-distribution.csv").exists());
}

#[test]
fn semicolon_delimited_input() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &MOVIES.replace(',', ";"));
    let options = BatchOptions {
        delimiter: b';',
        only: vec![queries::TOTAL_REVENUE.to_string()],
        ..BatchOptions::new(&input)
    };
    run_batch(&options).unwrap();
    insta::assert_snapshot!(
        fs::read_to_string(options.output_dir.join("total-revenue.csv")).unwrap(),
        @r"
    total_revenue
    600
    "
    );
}
