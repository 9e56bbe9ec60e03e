use std::fs;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use codonopt_lookup::{run_lookup, LookupConfig, RetryPolicy, Transport, TransportError};
use pretty_assertions::assert_eq;

const ANNOTATIONS: &str = "\
locus\tCOG\tEC_number\tproduct
TCH_0001\tCOG0085\t2.7.7.6\tRNA polymerase subunit beta
TCH_0002\t\t\thypothetical protein
TCH_0003\tCOG0039\t1.1.1.37\tmalate dehydrogenase
";

/// Fake search service; the COG0039 endpoint can be switched off.
struct FakeKegg {
    requests: AtomicUsize,
    cog0039_down: AtomicBool,
}

impl FakeKegg {
    fn new(cog0039_down: bool) -> Self {
        Self {
            requests: AtomicUsize::new(0),
            cog0039_down: AtomicBool::new(cog0039_down),
        }
    }
}

impl Transport for FakeKegg {
    fn fetch(&self, url: &str, _timeout: Duration) -> Result<String, TransportError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let page = if url.contains("keywords=0085") {
            r#"<a href="/entry/K03043">K03043</a>"#
        } else if url.contains("keywords=2.7.7.6") {
            r#"<a href="/entry/K13797">K13797</a><a href="/entry/ec:2.7.7.6">ec</a>"#
        } else if url.contains("keywords=0039") {
            if self.cog0039_down.load(Ordering::SeqCst) {
                return Err(TransportError::Connection("reset by peer".to_string()));
            }
            r#"<a href="/entry/K00024">K00024</a>"#
        } else if url.contains("keywords=1.1.1.37") {
            r#"<a href="/entry/K00024">K00024</a><a href="/entry/K00025">K00025</a>"#
        } else {
            return Err(TransportError::Status(404));
        };
        Ok(page.to_string())
    }
}

fn config() -> LookupConfig {
    LookupConfig {
        workers: 3,
        retry: RetryPolicy {
            retries: 2,
            delay: Duration::ZERO,
        },
        timeout: Duration::from_secs(1),
    }
}

#[test]
fn test_full_run_writes_output_and_drops_checkpoint() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("genes.tsv");
    fs::write(&input, ANNOTATIONS).unwrap();

    let kegg = FakeKegg::new(false);
    let summary = run_lookup(&input, &kegg, &config()).unwrap();
    assert_eq!(summary.rows, 3);
    assert_eq!(summary.resolved, 3);
    assert!(summary.is_complete());
    // the empty row issues no request
    assert_eq!(kegg.requests.load(Ordering::SeqCst), 4);

    let output = fs::read_to_string(dir.path().join("genes_ko.tsv")).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "locus\tCOG\tEC_number\tproduct\tKEGG");
    assert!(lines[1].ends_with("\tK03043;K13797"));
    assert!(lines[2].ends_with("hypothetical protein\t"));
    assert!(lines[3].ends_with("\tK00024;K00024;K00025"));
    assert!(!dir.path().join("genes_ko_checkpoint.sqlite").exists());
}

#[test]
fn test_rerun_only_retries_skipped_rows() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("genes.tsv");
    fs::write(&input, ANNOTATIONS).unwrap();
    let checkpoint = dir.path().join("genes_ko_checkpoint.sqlite");

    let flaky = FakeKegg::new(true);
    let first = run_lookup(&input, &flaky, &config()).unwrap();
    assert_eq!(first.skipped, 1);
    assert!(checkpoint.exists());
    let output = fs::read_to_string(dir.path().join("genes_ko.tsv")).unwrap();
    assert!(output.lines().nth(3).unwrap().ends_with("malate dehydrogenase\t"));

    let healthy = FakeKegg::new(false);
    let second = run_lookup(&input, &healthy, &config()).unwrap();
    assert_eq!(second.reused, 2);
    assert_eq!(second.resolved, 1);
    assert!(second.is_complete());
    // only the COG and EC queries of the skipped row
    assert_eq!(healthy.requests.load(Ordering::SeqCst), 2);
    assert!(!checkpoint.exists());

    let output = fs::read_to_string(dir.path().join("genes_ko.tsv")).unwrap();
    assert!(output.lines().nth(1).unwrap().ends_with("\tK03043;K13797"));
    assert!(output.lines().nth(3).unwrap().ends_with("\tK00024;K00024;K00025"));
}

#[test]
fn test_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_lookup(&dir.path().join("absent.tsv"), FakeKegg::new(false), &config());
    assert!(err.is_err());
}
