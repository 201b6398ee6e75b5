use chrono::{NaiveDate, Utc};
use dubai_tenancy_lookup::analysis::{
    price_history, similar_size_distribution, size_distribution, BuildingComparison, Field,
};
use dubai_tenancy_lookup::config::Config;
use dubai_tenancy_lookup::ingestion::fetch::FetchPolicy;
use dubai_tenancy_lookup::report::LookupOutcome;
use dubai_tenancy_lookup::service::TenancyLookup;
use dubai_tenancy_lookup::session::Session;
use std::time::Duration;
use tempfile::{tempdir, TempDir};

const TENANCY_CSV: &str = "\
ECN;PID;REGISTRATION_DATE;START_DATE;END_DATE;VERSION;AREA;CONTRACT_AMOUNT;ANNUAL_AMOUNT;PROPERTY_SIZE;PROJECT;USAGE;PROPERTY_TYPE;PROPERTY_SUBTYPE;NEAREST_METRO;NEAREST_MALL
123456789012345;1001;2020-12-20;2021-01-01;2022-01-01;New;Dubai Marina;90000;90000;85.0;Marina Heights;Residential;Unit;Flat;DMCC Metro Station;Marina Mall
123456789012345;1002;2021-12-28;2022-01-02;2023-01-02;New;Dubai Marina;95000;95000;85.0;Marina Heights;Residential;Unit;Flat;DMCC Metro Station;Marina Mall
111111111111111;1003;2021-03-01;2021-03-01;2022-03-01;New;Dubai Marina;80000;80000;78.5;Marina Heights;Residential;Unit;Flat;DMCC Metro Station;Marina Mall
222222222222222;1004;2021-06-01;2021-06-01;2022-06-01;New;Dubai Marina;300000;300000;85.0;Marina Heights;Commercial;Unit;Office;DMCC Metro Station;Marina Mall
333333333333333;2001;2022-02-01;2022-02-01;;New;Al Barsha;60000;60000;70.0;;Residential;Unit;Flat;;
";

const PROJECTS_CSV: &str = "\
PROJECT_NAME;DEVELOPER_NAME;START_DATE;COMPLETION_DATE;AREA;TOTAL_UNITS;LATITUDE;LONGITUDE
Marina Heights;Emaar;2005-03-01;2008-09-30;Dubai Marina;;25.08;55.14
";

fn service() -> (TempDir, TenancyLookup) {
    let temp = tempdir().unwrap();
    let tenancy = temp.path().join("rent.csv");
    let projects = temp.path().join("projects.csv");
    std::fs::write(&tenancy, TENANCY_CSV).unwrap();
    std::fs::write(&projects, PROJECTS_CSV).unwrap();

    let config = Config {
        tenancy_data_url: tenancy.to_string_lossy().into_owned(),
        projects_data_url: format!("file://{}", projects.display()),
        fetch: FetchPolicy {
            timeout: Duration::from_secs(5),
            max_attempts: 1,
            initial_backoff: Duration::from_millis(1),
        },
    };
    (temp, TenancyLookup::new(config))
}

#[tokio::test]
async fn test_marina_heights_scenario() {
    let (_temp, service) = service();
    let session = Session::expanding([1001]);

    let outcome = service.lookup("123456789012345", &session).await.unwrap();
    let report = match outcome {
        LookupOutcome::Found(report) => report,
        other => panic!("Expected Found, got {:?}", other),
    };

    let today = Utc::now().date_naive();
    let snapshot = &report.snapshot;
    assert_eq!(snapshot.start_date, NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
    assert_eq!(
        snapshot.end_date,
        NaiveDate::from_ymd_opt(2023, 1, 2).unwrap().min(today)
    );
    assert_eq!(snapshot.property_ids, vec![1001, 1002]);
    assert_eq!(report.properties.len(), 2);

    let detail = &report.details[0];
    assert_eq!(detail.property_id, 1001);
    assert_eq!(detail.price_history.len(), 1);

    let project = detail.project.as_ref().unwrap();
    assert_eq!(project.total_units.value, 0);
    assert!(project.total_units.was_missing);

    match &detail.building {
        BuildingComparison::Available { full, similar } => {
            let bucket = full.get(85.0).unwrap();
            assert_eq!(bucket.count, 2);
            assert_eq!(bucket.mean, 92500.0);
            assert_eq!(bucket.median, 92500.0);
            assert!(full.is_reference(bucket));

            let similar = similar.as_ref().unwrap();
            let sizes: Vec<f64> = similar.iter().map(|b| b.property_size).collect();
            assert_eq!(sizes, vec![78.5, 85.0]);
        }
        other => panic!("Expected Available, got {:?}", other),
    }
}

#[tokio::test]
async fn test_distributions_over_loaded_table() {
    let (_temp, service) = service();
    let dataset = service.dataset().await.unwrap();

    let dist = size_distribution(&dataset.tenancy, "Marina Heights", "Residential");
    assert_eq!(dist.len(), 2);
    assert_eq!(dist.get(85.0).unwrap().count, 2);

    let similar = similar_size_distribution(&dataset.tenancy, "Marina Heights", "Residential", 75.0);
    let sizes: Vec<f64> = similar.iter().map(|b| b.property_size).collect();
    assert_eq!(sizes, vec![78.5, 85.0]);

    assert_eq!(price_history(&dataset.tenancy, 1001).len(), 1);
}

#[tokio::test]
async fn test_property_without_building_has_nothing_to_show() {
    let (_temp, service) = service();
    let session = Session::expanding([2001]);

    let outcome = service.lookup("333333333333333", &session).await.unwrap();
    let report = match outcome {
        LookupOutcome::Found(report) => report,
        other => panic!("Expected Found, got {:?}", other),
    };

    assert_eq!(report.snapshot.project, Field::Missing);
    assert!(report.snapshot.is_ongoing);
    assert_eq!(report.snapshot.end_date, Utc::now().date_naive());

    let detail = &report.details[0];
    assert!(matches!(detail.building, BuildingComparison::NothingToShow { .. }));
    assert!(detail.project.is_none());

    let json = serde_json::to_value(&report.snapshot).unwrap();
    assert_eq!(json["project"], "Missing Data");
}

#[tokio::test]
async fn test_unknown_key_is_not_found() {
    let (_temp, service) = service();

    let outcome = service.lookup("999999999999999", &Session::new()).await.unwrap();
    assert!(matches!(outcome, LookupOutcome::NotFound(999999999999999)));
}
