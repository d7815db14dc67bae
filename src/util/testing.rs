//! Test support: one-time logging setup and a small stroke dataset sample

use std::sync::Once;
use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

static TEST_SETUP: Once = Once::new();

/// Rows shaped like the stroke prediction dataset.
///
/// 10 records: 6 Female, 4 Male, 3 with stroke, 2 with hypertension,
/// 3 with heart disease, 1 never married, one `N/A` bmi.
pub const STROKE_SAMPLE: &str = "\
id,gender,age,hypertension,heart_disease,ever_married,work_type,Residence_type,bmi,smoking_status,stroke
9046,Male,67,0,1,Yes,Private,Urban,36.6,formerly smoked,1
51676,Female,61,0,0,Yes,Self-employed,Rural,N/A,never smoked,1
31112,Male,80,0,1,Yes,Private,Rural,32.5,never smoked,1
60182,Female,49,0,0,Yes,Private,Urban,34.4,smokes,0
1665,Female,79,1,0,Yes,Self-employed,Rural,24,never smoked,0
56669,Male,81,0,0,Yes,Private,Urban,29,formerly smoked,0
53882,Male,74,1,1,Yes,Private,Rural,27.4,never smoked,0
10434,Female,69,0,0,No,Private,Urban,22.8,never smoked,0
27419,Female,59,0,0,Yes,Private,Rural,30.2,Unknown,0
60491,Female,78,0,0,Yes,Private,Urban,24.2,Unknown,0
";

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cohort=debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_target(true)
            .with_test_writer()
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else if let Err(e) = subscriber.try_init() {
        eprintln!("Error: Failed to set up logging: {}", e);
    }
}
