use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const CORPUS: &str = ">cds1\nATGGCCGCCGCAAAGAAG\n>cds2\nAAATGGTAA\n";
const GENE: &str = ">gene1 test gene\nATGGCAAAATGGTAA\n";

fn codonopt(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_codonopt"))
        .args(args)
        .env("RUST_LOG", "info")
        .output()
        .unwrap()
}

fn path(p: &Path) -> &str {
    p.to_str().unwrap()
}

#[test]
fn test_usage_then_optimize() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = dir.path().join("cds.fasta");
    let gene = dir.path().join("gene.fasta");
    fs::write(&corpus, CORPUS).unwrap();
    fs::write(&gene, GENE).unwrap();
    let out = dir.path().join("results");

    let usage = codonopt(&["usage", "-i", path(&corpus), "-o", path(&out), "--precision", "4", "--json"]);
    assert!(usage.status.success(), "{}", String::from_utf8_lossy(&usage.stderr));
    let table = fs::read_to_string(out.join("codon_usage.txt")).unwrap();
    assert!(table.starts_with("Amino Acid: *\n    TAA: 1.0000\n\nAmino Acid: A\n    GCA: 0.3333\n    GCC: 0.6667\n"));
    assert!(out.join("codon_usage.json").exists());

    let optimize = codonopt(&[
        "optimize",
        "-g",
        path(&gene),
        "-t",
        path(&out.join("codon_usage.txt")),
        "-o",
        path(&out),
        "--fasta",
    ]);
    assert!(optimize.status.success(), "{}", String::from_utf8_lossy(&optimize.stderr));
    let optimized = fs::read_to_string(out.join("optimized_seq.txt")).unwrap();
    assert_eq!(optimized, "ATGGCCAAGTGGTAA");
    let fasta = fs::read_to_string(out.join("optimized_seq.fasta")).unwrap();
    assert_eq!(fasta, ">gene_optimized\nATGGCCAAGTGGTAA\n");

    let scores = fs::read_to_string(out.join("cai_values.txt")).unwrap();
    let lines: Vec<&str> = scores.lines().collect();
    assert_eq!(lines[0], "Codon\tOriginal CAI\tOptimized CAI");
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[1], "1\t1\t1");

    let stderr = String::from_utf8_lossy(&optimize.stderr);
    assert!(stderr.contains("Original Sequence CAI"));
    assert!(stderr.contains("Optimized Sequence CAI"));
}

#[test]
fn test_optimize_from_reference_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = dir.path().join("cds.fasta");
    let gene = dir.path().join("gene.txt");
    fs::write(&corpus, CORPUS).unwrap();
    fs::write(&gene, "atggca\naaatggtaa\n").unwrap();

    let output = codonopt(&["-q", "optimize", "-g", path(&gene), "-r", path(&corpus), "-o", path(dir.path())]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let optimized = fs::read_to_string(dir.path().join("optimized_seq.txt")).unwrap();
    assert_eq!(optimized, "ATGGCCAAGTGGTAA");
    // quiet drops the info summaries
    assert!(!String::from_utf8_lossy(&output.stderr).contains("Original Sequence CAI"));
}

#[test]
fn test_score_prints_tsv() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = dir.path().join("cds.fasta");
    let gene = dir.path().join("gene.fasta");
    fs::write(&corpus, CORPUS).unwrap();
    fs::write(&gene, GENE).unwrap();

    let output = codonopt(&["score", "-g", path(&gene), "-t", path(&corpus)]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Codon\tOriginal CAI\tOptimized CAI\n"));
    assert_eq!(stdout.lines().count(), 6);
}

#[test]
fn test_unseen_amino_acid_fails() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = dir.path().join("cds.fasta");
    let gene = dir.path().join("gene.txt");
    fs::write(&corpus, CORPUS).unwrap();
    // CGT (Arg) is absent from the corpus
    fs::write(&gene, "ATGCGTTAA").unwrap();

    let output = codonopt(&["optimize", "-g", path(&gene), "-r", path(&corpus), "-o", path(dir.path())]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("CGT"));
    assert!(!dir.path().join("optimized_seq.txt").exists());
}

#[test]
fn test_missing_table_source_is_rejected() {
    let output = codonopt(&["optimize", "-g", "gene.txt"]);
    assert!(!output.status.success());
}

#[test]
fn test_score_gene_with_unseen_amino_acid() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = dir.path().join("cds.fasta");
    let gene = dir.path().join("gene.txt");
    fs::write(&corpus, ">cds1\nATGGCCGCCGCAAAGAAG\n").unwrap();
    // CGT (Arg) scores 0 and blocks optimization
    fs::write(&gene, "ATGCGTGCA").unwrap();

    let output = codonopt(&["score", "-g", path(&gene), "-t", path(&corpus)]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "1\t1\tNA");
    assert_eq!(lines[2], "2\t0\tNA");
    assert!(lines[3].starts_with("3\t0.333"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("CGT"));
    assert!(stderr.contains("Original Sequence CAI"));
}

#[test]
fn test_quiet_overrides_rust_log() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = dir.path().join("cds.fasta");
    fs::write(&corpus, CORPUS).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_codonopt"))
        .args(["--quiet", "usage", "-i", path(&corpus), "-o", path(dir.path())])
        .env("RUST_LOG", "debug")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("INFO"), "{stderr}");
    assert!(!stderr.contains("DEBUG"), "{stderr}");
    assert!(dir.path().join("codon_usage.txt").exists());
}

#[test]
fn test_lookup_rows_without_queries() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("genes.tsv");
    // no COG or EC values, so no request leaves the machine
    fs::write(&input, "locus\tCOG\tEC_number\nTCH_0001\t\t\nTCH_0002\t\t\n").unwrap();

    let output = codonopt(&["lookup", "-i", path(&input), "--workers", "2"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let annotated = fs::read_to_string(dir.path().join("genes_ko.tsv")).unwrap();
    assert_eq!(
        annotated,
        "locus\tCOG\tEC_number\tKEGG\nTCH_0001\t\t\t\nTCH_0002\t\t\t\n"
    );
    assert!(!dir.path().join("genes_ko_checkpoint.sqlite").exists());
}

#[test]
fn test_lookup_rejects_table_without_columns() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("genes.tsv");
    fs::write(&input, "locus\tproduct\nTCH_0001\tpolymerase\n").unwrap();

    let output = codonopt(&["lookup", "-i", path(&input)]);
    assert!(!output.status.success());
    assert!(!dir.path().join("genes_ko.tsv").exists());
}
