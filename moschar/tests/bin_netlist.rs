use std::path::PathBuf;

use moschar::bins::{BinRange, BinSpec, BinTable};
use moschar::rewrite::BinRewriter;
use tempdir::TempDir;

const NETLIST: &str = "* characterization testbench
.include \"models.spice\"
M1 drain gate 0 0 nfet_model w=4.0u l=3.3u
V1 drain 0 1.8
.dc V1 0 1.8 0.01
.end
";

fn rewriter() -> BinRewriter {
    let table = BinTable::new(vec![BinSpec::new(
        "21",
        BinRange::new(3.5e-6, 5.0e-6),
        BinRange::new(3.0e-6, 4.0e-6),
    )]);
    BinRewriter::new("nfet_model", table)
}

fn write_netlist(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("tb.cir");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn rewrites_in_place_with_backup() {
    let tmp = TempDir::new("bin_netlist").unwrap();
    let path = write_netlist(&tmp, NETLIST);

    let summary = rewriter().rewrite_file(&path, true).unwrap();
    assert_eq!(summary.binned, 1);

    let out = std::fs::read_to_string(&path).unwrap();
    assert!(out.contains("M1 drain gate 0 0 nfet_model.21 w=4.0u l=3.3u"));
    // Every other line is untouched.
    assert_eq!(out.replace("nfet_model.21", "nfet_model"), NETLIST);

    // A backup of the original was left next to the netlist.
    let backup = std::fs::read_dir(tmp.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .find(|p| p.file_name().unwrap().to_string_lossy().starts_with("tb.cir."))
        .expect("backup file not found");
    assert_eq!(std::fs::read_to_string(backup).unwrap(), NETLIST);
}

#[test]
fn second_pass_changes_nothing() {
    let tmp = TempDir::new("bin_netlist").unwrap();
    let path = write_netlist(&tmp, NETLIST);

    let rw = rewriter();
    rw.rewrite_file(&path, false).unwrap();
    let first = std::fs::read_to_string(&path).unwrap();

    let summary = rw.rewrite_file(&path, false).unwrap();
    let second = std::fs::read_to_string(&path).unwrap();
    assert_eq!(first, second);
    assert_eq!(summary.unchanged, 1);
    assert_eq!(summary.binned + summary.corrected, 0);
}

#[test]
fn missing_netlist_is_an_error() {
    let tmp = TempDir::new("bin_netlist").unwrap();
    assert!(rewriter()
        .rewrite_file(tmp.path().join("missing.cir"), false)
        .is_err());
}

#[test]
fn malformed_instance_leaves_file_untouched() {
    let tmp = TempDir::new("bin_netlist").unwrap();
    let bad = "M1 drain gate 0 0 nfet_model w=4.0u\n.end\n";
    let path = write_netlist(&tmp, bad);

    assert!(rewriter().rewrite_file(&path, false).is_err());
    // The rewrite aborted before writing anything.
    assert_eq!(std::fs::read_to_string(&path).unwrap(), bad);
}
